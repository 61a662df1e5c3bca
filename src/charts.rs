//! Charts for the traffic dashboard, rendered with plotlars.

use crate::aggregation::trend::{MonthlyTrend, TREND_MONTH, TREND_VEHICLE_COUNT};
use crate::error::TrafficError;
use crate::types::api_error::ApiError;
use crate::types::outcome::QueryOutcome;
use crate::preparation::traffic_frame::{
    TrafficFrame, FRAME_LATITUDE, FRAME_LONGITUDE, FRAME_MEASURED_AT, FRAME_TIME_OF_DAY,
    FRAME_VEHICLE_COUNT,
};
use chrono::NaiveDate;
use log::info;
use plotlars::{BarPlot, Plot, Rgb, ScatterMap, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::io::ErrorKind;
use std::path::Path;

/// Map centre, roughly Zurich main station.
pub const ZURICH_CENTER: [f64; 2] = [47.3769, 8.5417];
pub const MAP_ZOOM: u8 = 11;

pub const QUERY_FAILED_TITLE: &str = "Fehler bei Datenabfrage";
pub const MAP_FILE: &str = "map.html";
pub const DAY_TREND_FILE: &str = "tagestrend.html";
const LABEL: &str = "label";

/// One rendered chart.
pub enum TrafficChart {
    Map(ScatterMap),
    Bar(BarPlot),
    TimeSeries(TimeSeriesPlot),
}

impl TrafficChart {
    /// Opens the chart in the browser.
    pub fn show(&self) {
        match self {
            TrafficChart::Map(plot) => plot.plot(),
            TrafficChart::Bar(plot) => plot.plot(),
            TrafficChart::TimeSeries(plot) => plot.plot(),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            TrafficChart::Map(plot) => plot.to_html(),
            TrafficChart::Bar(plot) => plot.to_html(),
            TrafficChart::TimeSeries(plot) => plot.to_html(),
        }
    }

    /// Writes the chart as a standalone HTML page.
    pub fn write_html(&self, path: impl AsRef<Path>) -> Result<(), TrafficError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_html())
            .map_err(|e| TrafficError::ChartOutput(path.display().to_string(), e))?;
        info!("Wrote chart to {}", path.display());
        Ok(())
    }
}

/// Bubble map of one day's measurements, one trace per time of day.
pub fn day_map(frame: &TrafficFrame, date: NaiveDate) -> Result<TrafficChart, TrafficError> {
    let df = frame.to_dataframe()?;
    let group = (!frame.is_empty()).then_some(FRAME_TIME_OF_DAY);
    let title = format!("Verkehrsaufkommen am {}", date.format("%d.%m.%Y"));

    let plot = ScatterMap::builder()
        .data(&df)
        .latitude(FRAME_LATITUDE)
        .longitude(FRAME_LONGITUDE)
        .center(ZURICH_CENTER)
        .zoom(MAP_ZOOM)
        .maybe_group(group)
        .opacity(0.6)
        .size(8)
        .plot_title(Text::from(title.as_str()).size(18))
        .legend_title("Uhrzeit")
        .build();
    Ok(TrafficChart::Map(plot))
}

/// "Tagestrend": vehicles per measurement time over the day.
pub fn day_trend(frame: &TrafficFrame) -> Result<TrafficChart, TrafficError> {
    let df = frame
        .hourly_totals()?
        .lazy()
        .with_column(col(FRAME_MEASURED_AT).dt().strftime("%H:%M").alias(LABEL))
        .collect()?;

    let plot = BarPlot::builder()
        .data(&df)
        .labels(LABEL)
        .values(FRAME_VEHICLE_COUNT)
        .color(Rgb(31, 119, 180))
        .plot_title(Text::from("Tagestrend").size(18))
        .x_title("Uhrzeit")
        .y_title("Fahrzeuge")
        .build();
    Ok(TrafficChart::Bar(plot))
}

/// Vehicles per month across every partition that answered.
pub fn longterm_trend(trend: &MonthlyTrend) -> Result<TrafficChart, TrafficError> {
    let df = trend
        .to_dataframe()?
        .lazy()
        .with_column(col(TREND_MONTH).dt().strftime("%Y-%m-%d"))
        .collect()?;

    let plot = TimeSeriesPlot::builder()
        .data(&df)
        .x(TREND_MONTH)
        .y(TREND_VEHICLE_COUNT)
        .colors(vec![Rgb(69, 157, 230)])
        .plot_title(Text::from("Langzeittrend (Fahrzeuge je Monat)").size(18))
        .x_title("Monat")
        .y_title("Fahrzeuge")
        .build();
    Ok(TrafficChart::TimeSeries(plot))
}

/// Placeholder shown instead of the map when the datastore rejected the query.
pub fn query_failed() -> Result<TrafficChart, TrafficError> {
    let df = df!(
        LABEL => Vec::<String>::new(),
        FRAME_VEHICLE_COUNT => Vec::<f64>::new()
    )?;

    let plot = BarPlot::builder()
        .data(&df)
        .labels(LABEL)
        .values(FRAME_VEHICLE_COUNT)
        .plot_title(Text::from(QUERY_FAILED_TITLE).size(18))
        .build();
    Ok(TrafficChart::Bar(plot))
}

/// What [`write_day_charts`] left in the output directory.
#[derive(Debug)]
pub enum DayCharts {
    /// Map and daily trend of the prepared measurements.
    Rendered { measurements: usize, vehicles: f64 },
    /// The datastore rejected the query; only the placeholder map exists.
    QueryFailed(ApiError),
}

/// Writes the charts of one day's query result into `out`.
///
/// Whenever the day could not be prepared, [`MAP_FILE`] is replaced by the
/// failure placeholder and any [`DAY_TREND_FILE`] of an earlier run is
/// removed, so the directory never shows charts of another date. Errors of
/// the query itself are returned after the placeholder has been written.
pub fn write_day_charts(
    day: Result<QueryOutcome<TrafficFrame>, TrafficError>,
    date: NaiveDate,
    out: &Path,
) -> Result<DayCharts, TrafficError> {
    match day {
        Ok(QueryOutcome::Ready(frame)) => {
            day_map(&frame, date)?.write_html(out.join(MAP_FILE))?;
            day_trend(&frame)?.write_html(out.join(DAY_TREND_FILE))?;
            Ok(DayCharts::Rendered {
                measurements: frame.len(),
                vehicles: frame.total_vehicles(),
            })
        }
        Ok(QueryOutcome::Failed(err)) => {
            write_day_failure(out)?;
            Ok(DayCharts::QueryFailed(err))
        }
        Err(err) => {
            write_day_failure(out)?;
            Err(err)
        }
    }
}

/// Puts the failure placeholder in place of the day's charts in `out`.
pub fn write_day_failure(out: &Path) -> Result<(), TrafficError> {
    query_failed()?.write_html(out.join(MAP_FILE))?;
    let stale = out.join(DAY_TREND_FILE);
    match std::fs::remove_file(&stale) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TrafficError::ChartOutput(stale.display().to_string(), e)),
    }
}

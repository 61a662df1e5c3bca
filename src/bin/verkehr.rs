//! verkehr - command line front-end for the Zurich MIV traffic counts.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use zurich_traffic::{
    longterm_trend, write_day_charts, write_day_failure, DayCharts, ZurichTraffic,
};

#[derive(Parser)]
#[command(
    name = "verkehr",
    version,
    about = "Traffic counts (MIV) of the city of Zurich"
)]
struct Cli {
    /// datastore_search_sql endpoint to query
    #[arg(long, global = true, env = "ZURICH_TRAFFIC_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the range of dates with data
    Dates,

    /// Render the map and the daily trend of one day
    Day {
        /// Day to show (YYYY-MM-DD), defaults to the latest available date
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Directory the HTML charts are written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Render vehicles per month over all years
    Trend {
        /// Directory the HTML chart is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let client = ZurichTraffic::builder().maybe_endpoint(cli.endpoint).build();

    match cli.command {
        Command::Dates => run_dates(&client).await,
        Command::Day { date, out } => run_day(&client, date, &out).await,
        Command::Trend { out } => run_trend(&client, &out).await,
    }
}

async fn run_dates(client: &ZurichTraffic) -> anyhow::Result<()> {
    let available = client.available_dates().call().await?;
    println!("Daten verfügbar von {} bis {}", available.min, available.max);
    for skipped in &available.skipped {
        println!("Übersprungen: {}", skipped);
    }
    Ok(())
}

async fn run_day(
    client: &ZurichTraffic,
    date: Option<NaiveDate>,
    out: &Path,
) -> anyhow::Result<()> {
    let selected = client
        .available_dates()
        .call()
        .await
        .and_then(|available| available.select(date));
    let date = match selected {
        Ok(date) => date,
        Err(err) => {
            write_day_failure(out)?;
            return Err(err).context("no date to show");
        }
    };

    match write_day_charts(client.day(date).await, date, out)? {
        DayCharts::Rendered {
            measurements,
            vehicles,
        } => {
            println!("{}: {} Messungen, {} Fahrzeuge", date, measurements, vehicles);
        }
        DayCharts::QueryFailed(err) => {
            eprintln!("Datenabfrage fehlgeschlagen: {}", err);
        }
    }
    Ok(())
}

async fn run_trend(client: &ZurichTraffic, out: &Path) -> anyhow::Result<()> {
    let trend = client.monthly_trend().await;
    for skipped in &trend.skipped {
        println!("Übersprungen: {}", skipped);
    }
    longterm_trend(&trend)?.write_html(out.join("langzeittrend.html"))?;
    Ok(())
}

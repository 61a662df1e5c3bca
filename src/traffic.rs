//! The main entry point: a client that runs the download, extract and prepare
//! steps against the Zurich open data datastore.

use crate::aggregation::availability::{dates_from_table, AvailableDates, DateQueryMode};
use crate::aggregation::trend::{monthly_from_table, MonthlyTrend};
use crate::aggregation::{PartitionResult, SkippedPartition};
use crate::datastore::extractor::{extract_records, RecordTable};
use crate::datastore::fetcher::{DatastoreFetcher, FetchOutcome, DEFAULT_ENDPOINT};
use crate::error::TrafficError;
use crate::preparation::error::PrepareError;
use crate::preparation::pipeline::prepare;
use crate::preparation::traffic_frame::TrafficFrame;
use crate::query::sql::{
    date_bounds, distinct_dates, measurements_on, monthly_totals, DatastoreQuery,
};
use crate::types::outcome::QueryOutcome;
use crate::types::partition::{Partition, PartitionCatalog};
use bon::bon;
use chrono::NaiveDate;
use log::info;
use reqwest::Client;

/// Client for the MIV traffic counts of the city of Zurich.
///
/// Every call runs its queries one after another and keeps no state between
/// calls; a client can be shared freely.
///
/// # Examples
///
/// ```no_run
/// # use zurich_traffic::{ZurichTraffic, TrafficError, QueryOutcome};
/// # #[tokio::main]
/// # async fn main() -> Result<(), TrafficError> {
/// let client = ZurichTraffic::builder().build();
///
/// let available = client.available_dates().call().await?;
/// match client.day(available.latest()).await? {
///     QueryOutcome::Ready(frame) => println!("{} measurements", frame.len()),
///     QueryOutcome::Failed(err) => println!("query failed: {}", err),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZurichTraffic {
    fetcher: DatastoreFetcher,
    catalog: PartitionCatalog,
}

#[bon]
impl ZurichTraffic {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.endpoint(String)`: Optional. The `datastore_search_sql` URL.
    ///   Defaults to the public endpoint of data.stadt-zuerich.ch.
    /// * `.catalog(PartitionCatalog)`: Optional. Year to resource mapping.
    ///   Defaults to [`PartitionCatalog::default`].
    /// * `.http(reqwest::Client)`: Optional. HTTP client to issue requests with.
    #[builder]
    pub fn new(
        #[builder(into)] endpoint: Option<String>,
        catalog: Option<PartitionCatalog>,
        http: Option<Client>,
    ) -> Self {
        Self {
            fetcher: DatastoreFetcher::new(
                endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                http.unwrap_or_default(),
            ),
            catalog: catalog.unwrap_or_default(),
        }
    }

    pub fn catalog(&self) -> &PartitionCatalog {
        &self.catalog
    }

    pub fn endpoint(&self) -> &str {
        self.fetcher.endpoint()
    }

    /// Fetches one query and unwraps its records. A `success: false` answer
    /// becomes [`QueryOutcome::Failed`] and is never extracted.
    pub async fn records(
        &self,
        query: &DatastoreQuery,
    ) -> Result<QueryOutcome<RecordTable>, TrafficError> {
        match self.fetcher.fetch(query).await? {
            FetchOutcome::Success(envelope) => Ok(QueryOutcome::Ready(extract_records(&envelope)?)),
            FetchOutcome::Failure(err) => Ok(QueryOutcome::Failed(err)),
        }
    }

    /// Prepared measurements of a single day.
    ///
    /// # Errors
    ///
    /// * [`TrafficError::UnknownPartition`] if no partition covers `date`;
    ///   no request is made in that case.
    /// * [`TrafficError::Datastore`] for transport, decoding and schema errors.
    /// * [`TrafficError::Prepare`] if a row cannot be coerced.
    pub async fn day(&self, date: NaiveDate) -> Result<QueryOutcome<TrafficFrame>, TrafficError> {
        let partition = self
            .catalog
            .resolve(date)
            .ok_or(TrafficError::UnknownPartition { date })?;

        let outcome = self.records(&measurements_on(partition, date)).await?;
        let prepared = outcome.and_then_try(|table| prepare(&table))?;
        if let QueryOutcome::Ready(frame) = &prepared {
            info!("Prepared {} measurements for {}", frame.len(), date);
        }
        Ok(prepared)
    }

    /// Union of the dates with data over all partitions.
    ///
    /// Partitions whose query fails are listed in
    /// [`AvailableDates::skipped`]; only when none answers is an error
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `.mode(DateQueryMode)`: Optional. Defaults to [`DateQueryMode::Bounds`].
    #[builder]
    pub async fn available_dates(
        &self,
        mode: Option<DateQueryMode>,
    ) -> Result<AvailableDates, TrafficError> {
        let mode = mode.unwrap_or_default();
        let mut results = Vec::with_capacity(self.catalog.len());
        for partition in self.catalog.iter() {
            let query = match mode {
                DateQueryMode::Bounds => date_bounds(partition),
                DateQueryMode::Distinct => distinct_dates(partition),
            };
            results.push(
                self.partition_query(partition, &query, |table| dates_from_table(table, mode))
                    .await,
            );
        }
        AvailableDates::combine(results)
            .map_err(|skipped| TrafficError::NoAvailableDates { skipped })
    }

    /// Vehicles per month over all partitions, for the long-term chart.
    pub async fn monthly_trend(&self) -> MonthlyTrend {
        let mut results = Vec::with_capacity(self.catalog.len());
        for partition in self.catalog.iter() {
            results.push(
                self.partition_query(partition, &monthly_totals(partition), monthly_from_table)
                    .await,
            );
        }
        MonthlyTrend::combine(results)
    }

    async fn partition_query<T>(
        &self,
        partition: &Partition,
        query: &DatastoreQuery,
        read: impl FnOnce(&RecordTable) -> Result<T, PrepareError>,
    ) -> PartitionResult<T> {
        match self.records(query).await {
            Ok(QueryOutcome::Ready(table)) => {
                read(&table).map_err(|e| SkippedPartition::new(partition, e))
            }
            Ok(QueryOutcome::Failed(err)) => Err(SkippedPartition::new(partition, err)),
            Err(e) => Err(SkippedPartition::new(partition, e)),
        }
    }
}

//! Fetches one day of traffic counts and opens the map and the daily trend
//! in the browser.
//!
//! To run this example:
//! cargo run --example day_map --features charts

use chrono::NaiveDate;
use std::error::Error;
use zurich_traffic::{day_map, day_trend, query_failed, QueryOutcome, ZurichTraffic};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let client = ZurichTraffic::builder().build();
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).ok_or("invalid date")?;

    match client.day(date).await? {
        QueryOutcome::Ready(frame) => {
            println!("{} measurements on {}", frame.len(), date);
            day_map(&frame, date)?.show();
            day_trend(&frame)?.show();
        }
        QueryOutcome::Failed(err) => {
            println!("Query failed: {}", err);
            query_failed()?.show();
        }
    }

    Ok(())
}

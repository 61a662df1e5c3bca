//! Prints the dates with traffic counts and the partitions that could not be
//! queried.
//!
//! To run this example:
//! cargo run --example available_dates

use zurich_traffic::{DateQueryMode, TrafficError, ZurichTraffic};

#[tokio::main]
async fn main() -> Result<(), TrafficError> {
    let client = ZurichTraffic::builder().build();

    let available = client
        .available_dates()
        .mode(DateQueryMode::Distinct)
        .call()
        .await?;

    println!(
        "{} days with data, from {} to {}",
        available.dates.len(),
        available.min,
        available.max
    );
    for skipped in &available.skipped {
        println!("skipped {}", skipped);
    }

    Ok(())
}

use chrono::{TimeZone, Utc};
use period_counter::{Counter, InMemoryRepository, Interval, Outcome, Period, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
	// Log level comes from RUST_LOG, e.g. `RUST_LOG=period_counter=debug`
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

	let counter = Counter::new(InMemoryRepository::<i64>::new());

	// Plain counter
	counter.increment("page_views", 1).await?;
	counter.increment("page_views", 1).await?;
	info!("Total page views: {}", counter.get("page_views").await?);

	// A single day
	let today = Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap();
	let day = Period::single(today);
	counter.increment_for_period("page_views", 3, &day).await?;
	if let Some(value) = counter.get_for_period("page_views", &day).await?.single() {
		info!("Page views on {}: {}", today.date_naive(), value);
	}

	// Monthly buckets for the first half of the year
	let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
	let months = Period::recurring(start, Interval::Months(1), 6)?;
	counter.increment_for_period("signups", 10, &months).await?;
	counter.decrement_for_period("signups", 2, &months).await?;

	if let Outcome::Many(values) = counter.get_for_period("signups", &months).await? {
		for value in values {
			if let Some(range) = value.range() {
				info!(
					"Signups from {} to {}: {}",
					range.start().date_naive(),
					range.end().date_naive(),
					value
				);
			}
		}
	}

	counter.remove_for_period("signups", &months).await?;
	let exists = counter.has_for_period("signups", &months).await?;
	info!("Any signups left: {}", exists.into_vec().iter().any(|e| e.exists()));

	Ok(())
}

use tracing::{debug, error, instrument, trace};

use crate::{
	period::{decompose, DateRange, Decomposition, Period},
	results::{Exists, Outcome, Value},
	storage::Repository,
	types::{Moment, RepositoryError},
	Result,
};

/// The entry point for reading and writing counters.
///
/// Every operation comes in two flavours: an unscoped one working on the plain counter, and a
/// `*_for_period` one that runs the [`Period`] through [`decompose`] and touches one slot per
/// resulting scope:
///
/// - an empty period touches nothing,
/// - a single moment touches the dated slot of that moment,
/// - otherwise every range touches its own ranged slot, in period order.
///
/// Multi-range writes stop at the first failing range. Ranges written before the failure keep
/// their new values, there is no rollback.
#[derive(Debug, Default)]
pub struct Counter<R: Repository> {
	repository: R,
}

/// A write applied to every scope of a period.
#[derive(Debug, Clone, Copy)]
enum Write<V> {
	Set(V),
	Increment(V),
	Decrement(V),
	Remove,
}

impl<R: Repository> Counter<R> {
	/// Creates a new `Counter` on top of `repository`.
	pub fn new(repository: R) -> Self {
		Self { repository }
	}

	pub fn repository(&self) -> &R {
		&self.repository
	}

	/// Consumes the counter, returning its repository.
	pub fn into_inner(self) -> R {
		self.repository
	}

	/// Overwrites the plain value of `key`.
	#[instrument(skip(self))]
	pub async fn set(&self, key: &str, value: R::Value) -> Result<()> {
		self.repository.set(key, value).await.map_err(|e| {
			error!("Failed to set {}: {}", key, e);
			e
		})?;

		Ok(())
	}

	/// Overwrites the value of `key` for every scope of `period`.
	#[instrument(skip(self, period), fields(moments = period.len()))]
	pub async fn set_for_period(&self, key: &str, value: R::Value, period: &Period) -> Result<()> {
		self.write_for_period(key, Write::Set(value), period).await
	}

	/// Reads the plain value of `key`.
	#[instrument(skip(self))]
	pub async fn get(&self, key: &str) -> Result<Value<R::Value>> {
		Ok(Value::new(self.repository.get(key).await?))
	}

	/// Reads the value of `key` for every scope of `period`.
	///
	/// ```
	/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
	/// use chrono::{TimeZone, Utc};
	/// use period_counter::{Counter, InMemoryRepository, Interval, Outcome, Period};
	///
	/// let counter = Counter::new(InMemoryRepository::<i64>::new());
	/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
	/// let months = Period::recurring(start, Interval::Months(1), 3).unwrap();
	///
	/// counter.increment_for_period("views", 1, &months).await.unwrap();
	///
	/// match counter.get_for_period("views", &months).await.unwrap() {
	///     Outcome::Many(values) => assert!(values.iter().all(|v| v.value() == Some(1))),
	///     other => panic!("unexpected {:?}", other),
	/// }
	/// # });
	/// ```
	#[instrument(skip(self, period), fields(moments = period.len()))]
	pub async fn get_for_period(
		&self,
		key: &str,
		period: &Period,
	) -> Result<Outcome<Value<R::Value>>> {
		let outcome = match decompose(period) {
			Decomposition::Empty => Outcome::Empty,
			Decomposition::Point(moment) =>
				Outcome::Single(Value::for_date(moment, self.repository.get_for(key, &moment).await?)),
			Decomposition::Ranges(ranges) => {
				let mut values = Vec::with_capacity(ranges.len());
				for range in ranges {
					let value = self.repository.get_for_range(key, &range).await?;
					values.push(Value::for_range(range, value));
				}
				Outcome::Many(values)
			},
		};

		trace!("Read {} value(s) for {}", outcome.len(), key);

		Ok(outcome)
	}

	/// Whether a plain value is stored for `key`.
	#[instrument(skip(self))]
	pub async fn has(&self, key: &str) -> Result<Exists> {
		Ok(Exists::new(self.repository.has(key).await?))
	}

	/// Whether a value is stored for `key` in every scope of `period`, scope by scope.
	#[instrument(skip(self, period), fields(moments = period.len()))]
	pub async fn has_for_period(&self, key: &str, period: &Period) -> Result<Outcome<Exists>> {
		let outcome = match decompose(period) {
			Decomposition::Empty => Outcome::Empty,
			Decomposition::Point(moment) =>
				Outcome::Single(Exists::for_date(moment, self.repository.has_for(key, &moment).await?)),
			Decomposition::Ranges(ranges) => {
				let mut exists = Vec::with_capacity(ranges.len());
				for range in ranges {
					let found = self.repository.has_for_range(key, &range).await?;
					exists.push(Exists::for_range(range, found));
				}
				Outcome::Many(exists)
			},
		};

		Ok(outcome)
	}

	/// Adds `delta` to the plain value of `key`.
	#[instrument(skip(self))]
	pub async fn increment(&self, key: &str, delta: R::Value) -> Result<()> {
		self.repository.increment(key, delta).await.map_err(|e| {
			error!("Failed to increment {}: {}", key, e);
			e
		})?;

		Ok(())
	}

	/// Adds `delta` to the value of `key` in every scope of `period`.
	#[instrument(skip(self, period), fields(moments = period.len()))]
	pub async fn increment_for_period(
		&self,
		key: &str,
		delta: R::Value,
		period: &Period,
	) -> Result<()> {
		self.write_for_period(key, Write::Increment(delta), period).await
	}

	/// Subtracts `delta` from the plain value of `key`.
	#[instrument(skip(self))]
	pub async fn decrement(&self, key: &str, delta: R::Value) -> Result<()> {
		self.repository.decrement(key, delta).await.map_err(|e| {
			error!("Failed to decrement {}: {}", key, e);
			e
		})?;

		Ok(())
	}

	/// Subtracts `delta` from the value of `key` in every scope of `period`.
	#[instrument(skip(self, period), fields(moments = period.len()))]
	pub async fn decrement_for_period(
		&self,
		key: &str,
		delta: R::Value,
		period: &Period,
	) -> Result<()> {
		self.write_for_period(key, Write::Decrement(delta), period).await
	}

	/// Deletes the plain value of `key`.
	#[instrument(skip(self))]
	pub async fn remove(&self, key: &str) -> Result<()> {
		self.repository.remove(key).await.map_err(|e| {
			error!("Failed to remove {}: {}", key, e);
			e
		})?;

		Ok(())
	}

	/// Deletes the value of `key` in every scope of `period`.
	#[instrument(skip(self, period), fields(moments = period.len()))]
	pub async fn remove_for_period(&self, key: &str, period: &Period) -> Result<()> {
		self.write_for_period(key, Write::Remove, period).await
	}

	async fn write_for_period(
		&self,
		key: &str,
		write: Write<R::Value>,
		period: &Period,
	) -> Result<()> {
		match decompose(period) {
			Decomposition::Empty => trace!("Empty period, nothing to write for {}", key),
			Decomposition::Point(moment) =>
				self.write_point(key, &moment, write).await.map_err(|e| {
					error!("Failed to write {} at {}: {}", key, moment, e);
					e
				})?,
			Decomposition::Ranges(ranges) => {
				debug!("Writing {} over {} range(s)", key, ranges.len());

				for (index, range) in ranges.iter().enumerate() {
					self.write_range(key, range, write).await.map_err(|e| {
						error!(
							"Failed to write {} over range {} of {} ({} to {}): {}",
							key,
							index + 1,
							ranges.len(),
							range.start(),
							range.end(),
							e
						);
						e
					})?;
				}
			},
		}

		Ok(())
	}

	async fn write_point(
		&self,
		key: &str,
		moment: &Moment,
		write: Write<R::Value>,
	) -> std::result::Result<(), RepositoryError> {
		match write {
			Write::Set(value) => self.repository.set_for(key, moment, value).await,
			Write::Increment(delta) => self.repository.increment_for(key, moment, delta).await,
			Write::Decrement(delta) => self.repository.decrement_for(key, moment, delta).await,
			Write::Remove => self.repository.remove_for(key, moment).await,
		}
	}

	async fn write_range(
		&self,
		key: &str,
		range: &DateRange,
		write: Write<R::Value>,
	) -> std::result::Result<(), RepositoryError> {
		match write {
			Write::Set(value) => self.repository.set_for_range(key, range, value).await,
			Write::Increment(delta) => self.repository.increment_for_range(key, range, delta).await,
			Write::Decrement(delta) => self.repository.decrement_for_range(key, range, delta).await,
			Write::Remove => self.repository.remove_for_range(key, range).await,
		}
	}
}

//! Numeric counters keyed by string, optionally scoped to a moment or to ranges of moments.
//!
//! A counter key owns three independent sets of values:
//!
//! - a plain value,
//! - one value per [`Moment`],
//! - one value per [`DateRange`].
//!
//! The [`Counter`] facade exposes `set`, `get`, `has`, `increment`, `decrement` and `remove`,
//! each with a `*_for_period` twin. A [`Period`] is an ordered sequence of moments which
//! [`decompose`] breaks down before anything is stored:
//!
//! - no moments: nothing happens and reads return [`Outcome::Empty`],
//! - one moment: the dated value of that moment is used, reads return [`Outcome::Single`],
//! - `n` moments: each of the `n - 1` adjacent pairs becomes a range and its ranged value is
//!   used, reads return [`Outcome::Many`] in period order.
//!
//! Values are kept by a [`Repository`]. [`InMemoryRepository`] is the default implementation;
//! database, file or cache backends can be plugged in by implementing the trait.
//!
//! # Example
//!
//! ```
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! use chrono::{TimeZone, Utc};
//! use period_counter::{Counter, InMemoryRepository, Interval, Outcome, Period};
//!
//! let counter = Counter::new(InMemoryRepository::<i64>::new());
//!
//! // Plain counter.
//! counter.increment("views", 1).await.unwrap();
//! assert_eq!(counter.get("views").await.unwrap().value(), Some(1));
//!
//! // A single day.
//! let today = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
//! let day = Period::single(today);
//! counter.set_for_period("views", 5, &day).await.unwrap();
//! let value = counter.get_for_period("views", &day).await.unwrap().single().unwrap();
//! assert_eq!((value.date(), value.value()), (Some(today), Some(5)));
//!
//! // Five monthly buckets.
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let months = Period::recurring(start, Interval::Months(1), 5).unwrap();
//! counter.increment_for_period("views", 1, &months).await.unwrap();
//! let values = counter.get_for_period("views", &months).await.unwrap();
//! assert_eq!(values.len(), 5);
//! # });
//! ```

pub mod architecture;
pub mod counter;
pub mod period;
pub mod results;
pub mod storage;
pub mod types;

#[cfg(test)]
mod mock;

pub use counter::Counter;
pub use period::{decompose, DateRange, Decomposition, Interval, Period};
pub use results::{Exists, Outcome, Scope, Value};
pub use storage::{memory::InMemoryRepository, Repository};
pub use types::{Amount, CounterError, Moment, PeriodError, RepositoryError};

pub type Result<T, E = CounterError> = std::result::Result<T, E>;

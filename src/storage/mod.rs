use async_trait::async_trait;

use crate::{
	period::DateRange,
	types::{Amount, Moment, RepositoryError},
};

pub mod common;
pub mod memory;

/// Storage contract for counter values.
///
/// A backend keeps three independent key spaces for every counter key:
///
/// - the plain value (`set`, `get`, ...),
/// - one value per [`Moment`] (`set_for`, `get_for`, ...),
/// - one value per [`DateRange`] (`set_for_range`, `get_for_range`, ...).
///
/// Writing to one space never affects the others. Two moments, or two ranges, that address the
/// same slot must always resolve to it again.
///
/// # Absence
///
/// Reading a slot that was never written is not an error: `get*` return `Ok(None)` and `has*`
/// return `Ok(false)`. Removing an absent slot is a no-op. `Err` is reserved for arithmetic
/// overflow and backend failures, which are passed through unchanged by
/// [`Counter`](crate::Counter).
///
/// # Concurrency
///
/// `increment*` and `decrement*` are read-modify-write operations. The contract makes no
/// promise across calls, so a backend shared between tasks or processes must make each of them
/// atomic per slot itself (a lock, a transaction, or a native atomic increment).
///
/// [`InMemoryRepository`](memory::InMemoryRepository) is the reference implementation. Database,
/// file or cache backends implement this trait and plug into [`Counter`](crate::Counter)
/// without further changes; [`common`] has the slot layout string keyed stores can reuse.
#[async_trait]
pub trait Repository: Send + Sync {
	/// Numeric type of the stored values.
	type Value: Amount;

	/// Overwrites the plain value of `key`.
	async fn set(&self, key: &str, value: Self::Value) -> Result<(), RepositoryError>;
	/// Overwrites the value of `key` at `moment`.
	async fn set_for(
		&self,
		key: &str,
		moment: &Moment,
		value: Self::Value,
	) -> Result<(), RepositoryError>;
	/// Overwrites the value of `key` over `range`.
	async fn set_for_range(
		&self,
		key: &str,
		range: &DateRange,
		value: Self::Value,
	) -> Result<(), RepositoryError>;

	async fn get(&self, key: &str) -> Result<Option<Self::Value>, RepositoryError>;
	async fn get_for(
		&self,
		key: &str,
		moment: &Moment,
	) -> Result<Option<Self::Value>, RepositoryError>;
	async fn get_for_range(
		&self,
		key: &str,
		range: &DateRange,
	) -> Result<Option<Self::Value>, RepositoryError>;

	async fn has(&self, key: &str) -> Result<bool, RepositoryError>;
	async fn has_for(&self, key: &str, moment: &Moment) -> Result<bool, RepositoryError>;
	async fn has_for_range(&self, key: &str, range: &DateRange) -> Result<bool, RepositoryError>;

	/// Adds `delta` to the plain value of `key`, storing `delta` when there is none.
	async fn increment(&self, key: &str, delta: Self::Value) -> Result<(), RepositoryError>;
	async fn increment_for(
		&self,
		key: &str,
		moment: &Moment,
		delta: Self::Value,
	) -> Result<(), RepositoryError>;
	async fn increment_for_range(
		&self,
		key: &str,
		range: &DateRange,
		delta: Self::Value,
	) -> Result<(), RepositoryError>;

	/// Subtracts `delta` from the plain value of `key`, storing `-delta` when there is none.
	async fn decrement(&self, key: &str, delta: Self::Value) -> Result<(), RepositoryError>;
	async fn decrement_for(
		&self,
		key: &str,
		moment: &Moment,
		delta: Self::Value,
	) -> Result<(), RepositoryError>;
	async fn decrement_for_range(
		&self,
		key: &str,
		range: &DateRange,
		delta: Self::Value,
	) -> Result<(), RepositoryError>;

	/// Deletes the plain value of `key`.
	async fn remove(&self, key: &str) -> Result<(), RepositoryError>;
	async fn remove_for(&self, key: &str, moment: &Moment) -> Result<(), RepositoryError>;
	async fn remove_for_range(&self, key: &str, range: &DateRange) -> Result<(), RepositoryError>;
}

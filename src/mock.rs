use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::*;

/// Repository call as seen by [`RecordingRepository`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
	pub op: Op,
	pub key: String,
	pub scope: Scope,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
	Set(i64),
	Get,
	Has,
	Increment(i64),
	Decrement(i64),
	Remove,
}

/// [`InMemoryRepository`] that records every call, and can be told to fail on one range.
#[derive(Default)]
pub struct RecordingRepository {
	inner: InMemoryRepository<i64>,
	calls: Mutex<Vec<Call>>,
	failing_range: Option<DateRange>,
}

impl RecordingRepository {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every call touching `range` fails with a backend error.
	pub fn failing_on(range: DateRange) -> Self {
		Self { failing_range: Some(range), ..Self::default() }
	}

	pub async fn calls(&self) -> Vec<Call> {
		self.calls.lock().await.clone()
	}

	pub async fn reset(&self) {
		self.calls.lock().await.clear();
	}

	async fn record(&self, op: Op, key: &str, scope: Scope) -> Result<(), RepositoryError> {
		self.calls.lock().await.push(Call { op, key: key.to_string(), scope });

		match (scope, self.failing_range) {
			(Scope::Range(range), Some(failing)) if range == failing =>
				Err(RepositoryError::backend(std::io::Error::new(
					std::io::ErrorKind::Other,
					"backend unavailable",
				))),
			_ => Ok(()),
		}
	}
}

#[async_trait]
impl Repository for RecordingRepository {
	type Value = i64;

	async fn set(&self, key: &str, value: i64) -> Result<(), RepositoryError> {
		self.record(Op::Set(value), key, Scope::Unscoped).await?;
		self.inner.set(key, value).await
	}

	async fn set_for(&self, key: &str, moment: &Moment, value: i64) -> Result<(), RepositoryError> {
		self.record(Op::Set(value), key, Scope::Date(*moment)).await?;
		self.inner.set_for(key, moment, value).await
	}

	async fn set_for_range(
		&self,
		key: &str,
		range: &DateRange,
		value: i64,
	) -> Result<(), RepositoryError> {
		self.record(Op::Set(value), key, Scope::Range(*range)).await?;
		self.inner.set_for_range(key, range, value).await
	}

	async fn get(&self, key: &str) -> Result<Option<i64>, RepositoryError> {
		self.record(Op::Get, key, Scope::Unscoped).await?;
		self.inner.get(key).await
	}

	async fn get_for(&self, key: &str, moment: &Moment) -> Result<Option<i64>, RepositoryError> {
		self.record(Op::Get, key, Scope::Date(*moment)).await?;
		self.inner.get_for(key, moment).await
	}

	async fn get_for_range(
		&self,
		key: &str,
		range: &DateRange,
	) -> Result<Option<i64>, RepositoryError> {
		self.record(Op::Get, key, Scope::Range(*range)).await?;
		self.inner.get_for_range(key, range).await
	}

	async fn has(&self, key: &str) -> Result<bool, RepositoryError> {
		self.record(Op::Has, key, Scope::Unscoped).await?;
		self.inner.has(key).await
	}

	async fn has_for(&self, key: &str, moment: &Moment) -> Result<bool, RepositoryError> {
		self.record(Op::Has, key, Scope::Date(*moment)).await?;
		self.inner.has_for(key, moment).await
	}

	async fn has_for_range(&self, key: &str, range: &DateRange) -> Result<bool, RepositoryError> {
		self.record(Op::Has, key, Scope::Range(*range)).await?;
		self.inner.has_for_range(key, range).await
	}

	async fn increment(&self, key: &str, delta: i64) -> Result<(), RepositoryError> {
		self.record(Op::Increment(delta), key, Scope::Unscoped).await?;
		self.inner.increment(key, delta).await
	}

	async fn increment_for(
		&self,
		key: &str,
		moment: &Moment,
		delta: i64,
	) -> Result<(), RepositoryError> {
		self.record(Op::Increment(delta), key, Scope::Date(*moment)).await?;
		self.inner.increment_for(key, moment, delta).await
	}

	async fn increment_for_range(
		&self,
		key: &str,
		range: &DateRange,
		delta: i64,
	) -> Result<(), RepositoryError> {
		self.record(Op::Increment(delta), key, Scope::Range(*range)).await?;
		self.inner.increment_for_range(key, range, delta).await
	}

	async fn decrement(&self, key: &str, delta: i64) -> Result<(), RepositoryError> {
		self.record(Op::Decrement(delta), key, Scope::Unscoped).await?;
		self.inner.decrement(key, delta).await
	}

	async fn decrement_for(
		&self,
		key: &str,
		moment: &Moment,
		delta: i64,
	) -> Result<(), RepositoryError> {
		self.record(Op::Decrement(delta), key, Scope::Date(*moment)).await?;
		self.inner.decrement_for(key, moment, delta).await
	}

	async fn decrement_for_range(
		&self,
		key: &str,
		range: &DateRange,
		delta: i64,
	) -> Result<(), RepositoryError> {
		self.record(Op::Decrement(delta), key, Scope::Range(*range)).await?;
		self.inner.decrement_for_range(key, range, delta).await
	}

	async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
		self.record(Op::Remove, key, Scope::Unscoped).await?;
		self.inner.remove(key).await
	}

	async fn remove_for(&self, key: &str, moment: &Moment) -> Result<(), RepositoryError> {
		self.record(Op::Remove, key, Scope::Date(*moment)).await?;
		self.inner.remove_for(key, moment).await
	}

	async fn remove_for_range(&self, key: &str, range: &DateRange) -> Result<(), RepositoryError> {
		self.record(Op::Remove, key, Scope::Range(*range)).await?;
		self.inner.remove_for_range(key, range).await
	}
}

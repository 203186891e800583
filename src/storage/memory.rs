use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use crate::{
	period::DateRange,
	types::{Amount, Moment, RepositoryError},
};

use super::{
	common::{date_slot, plain_slot, range_slot},
	Repository,
};

/// In-memory implementation of the storage backend.
///
/// Values live in a map keyed by the slot strings from [`super::common`]. Nothing is persisted.
/// Increments and decrements hold the write lock for the whole read-modify-write, so they are
/// atomic per slot even when the repository is shared between tasks.
#[derive(Debug)]
pub struct InMemoryRepository<V> {
	data: RwLock<HashMap<String, V>>,
}

impl<V: Amount> InMemoryRepository<V> {
	pub fn new() -> Self {
		Self { data: RwLock::new(HashMap::new()) }
	}

	/// Number of occupied slots across all three key spaces.
	pub async fn len(&self) -> usize {
		self.data.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.data.read().await.is_empty()
	}

	/// Drops every stored value.
	pub async fn clear(&self) {
		self.data.write().await.clear();
		debug!("Cleared in-memory repository");
	}

	async fn write(&self, slot: String, value: V) {
		debug!("Setting slot {} to {}", slot, value);
		self.data.write().await.insert(slot, value);
	}

	async fn read(&self, slot: &str) -> Option<V> {
		let value = self.data.read().await.get(slot).copied();
		trace!("Read slot {}: {:?}", slot, value);
		value
	}

	async fn contains(&self, slot: &str) -> bool {
		self.data.read().await.contains_key(slot)
	}

	/// Combines the current value of `slot` (zero when absent) with `delta` under one lock.
	async fn apply(
		&self,
		slot: String,
		delta: V,
		op: fn(V, V) -> Option<V>,
	) -> Result<(), RepositoryError> {
		// The guard must stay held from the read below until the insert.
		let mut data = self.data.write().await;
		let current = data.get(&slot).copied().unwrap_or_else(V::zero);

		let next = op(current, delta).ok_or_else(|| {
			error!("Arithmetic overflow on slot {}: {} with delta {}", slot, current, delta);
			RepositoryError::Overflow { slot: slot.clone() }
		})?;

		debug!("Updating slot {} from {} to {}", slot, current, next);
		data.insert(slot, next);

		Ok(())
	}

	async fn delete(&self, slot: &str) {
		if self.data.write().await.remove(slot).is_some() {
			debug!("Removed slot {}", slot);
		} else {
			trace!("Slot {} was already absent", slot);
		}
	}
}

impl<V: Amount> Default for InMemoryRepository<V> {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl<V: Amount> Repository for InMemoryRepository<V> {
	type Value = V;

	async fn set(&self, key: &str, value: V) -> Result<(), RepositoryError> {
		self.write(plain_slot(key), value).await;
		Ok(())
	}

	async fn set_for(&self, key: &str, moment: &Moment, value: V) -> Result<(), RepositoryError> {
		self.write(date_slot(key, moment), value).await;
		Ok(())
	}

	async fn set_for_range(
		&self,
		key: &str,
		range: &DateRange,
		value: V,
	) -> Result<(), RepositoryError> {
		self.write(range_slot(key, range), value).await;
		Ok(())
	}

	async fn get(&self, key: &str) -> Result<Option<V>, RepositoryError> {
		Ok(self.read(&plain_slot(key)).await)
	}

	async fn get_for(&self, key: &str, moment: &Moment) -> Result<Option<V>, RepositoryError> {
		Ok(self.read(&date_slot(key, moment)).await)
	}

	async fn get_for_range(
		&self,
		key: &str,
		range: &DateRange,
	) -> Result<Option<V>, RepositoryError> {
		Ok(self.read(&range_slot(key, range)).await)
	}

	async fn has(&self, key: &str) -> Result<bool, RepositoryError> {
		Ok(self.contains(&plain_slot(key)).await)
	}

	async fn has_for(&self, key: &str, moment: &Moment) -> Result<bool, RepositoryError> {
		Ok(self.contains(&date_slot(key, moment)).await)
	}

	async fn has_for_range(&self, key: &str, range: &DateRange) -> Result<bool, RepositoryError> {
		Ok(self.contains(&range_slot(key, range)).await)
	}

	async fn increment(&self, key: &str, delta: V) -> Result<(), RepositoryError> {
		self.apply(plain_slot(key), delta, V::checked_plus).await
	}

	async fn increment_for(
		&self,
		key: &str,
		moment: &Moment,
		delta: V,
	) -> Result<(), RepositoryError> {
		self.apply(date_slot(key, moment), delta, V::checked_plus).await
	}

	async fn increment_for_range(
		&self,
		key: &str,
		range: &DateRange,
		delta: V,
	) -> Result<(), RepositoryError> {
		self.apply(range_slot(key, range), delta, V::checked_plus).await
	}

	async fn decrement(&self, key: &str, delta: V) -> Result<(), RepositoryError> {
		self.apply(plain_slot(key), delta, V::checked_minus).await
	}

	async fn decrement_for(
		&self,
		key: &str,
		moment: &Moment,
		delta: V,
	) -> Result<(), RepositoryError> {
		self.apply(date_slot(key, moment), delta, V::checked_minus).await
	}

	async fn decrement_for_range(
		&self,
		key: &str,
		range: &DateRange,
		delta: V,
	) -> Result<(), RepositoryError> {
		self.apply(range_slot(key, range), delta, V::checked_minus).await
	}

	async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
		self.delete(&plain_slot(key)).await;
		Ok(())
	}

	async fn remove_for(&self, key: &str, moment: &Moment) -> Result<(), RepositoryError> {
		self.delete(&date_slot(key, moment)).await;
		Ok(())
	}

	async fn remove_for_range(&self, key: &str, range: &DateRange) -> Result<(), RepositoryError> {
		self.delete(&range_slot(key, range)).await;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use chrono::{TimeZone, Utc};

	use super::*;

	fn moment() -> Moment {
		Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
	}

	fn range() -> DateRange {
		DateRange::new(moment(), Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()).unwrap()
	}

	#[tokio::test]
	async fn absent_until_set() {
		let repo = InMemoryRepository::<i64>::new();

		assert_eq!(repo.get("views").await.unwrap(), None);
		assert!(!repo.has("views").await.unwrap());
		assert_eq!(repo.get_for("views", &moment()).await.unwrap(), None);
		assert!(!repo.has_for_range("views", &range()).await.unwrap());

		repo.set("views", 5).await.unwrap();
		assert_eq!(repo.get("views").await.unwrap(), Some(5));
		assert!(repo.has("views").await.unwrap());
	}

	#[tokio::test]
	async fn set_overwrites() {
		let repo = InMemoryRepository::<i64>::new();

		repo.set_for_range("views", &range(), 1).await.unwrap();
		repo.set_for_range("views", &range(), 9).await.unwrap();
		assert_eq!(repo.get_for_range("views", &range()).await.unwrap(), Some(9));
		assert_eq!(repo.len().await, 1);
	}

	#[tokio::test]
	async fn increment_treats_absent_as_zero() {
		let repo = InMemoryRepository::<i64>::new();

		repo.increment("views", 3).await.unwrap();
		assert_eq!(repo.get("views").await.unwrap(), Some(3));

		repo.increment("views", 4).await.unwrap();
		assert_eq!(repo.get("views").await.unwrap(), Some(7));

		repo.increment_for("views", &moment(), -2).await.unwrap();
		assert_eq!(repo.get_for("views", &moment()).await.unwrap(), Some(-2));
	}

	#[tokio::test]
	async fn decrement_negates_on_absent() {
		let repo = InMemoryRepository::<f64>::new();

		repo.decrement_for_range("views", &range(), 1.5).await.unwrap();
		assert_eq!(repo.get_for_range("views", &range()).await.unwrap(), Some(-1.5));

		repo.decrement_for_range("views", &range(), 0.5).await.unwrap();
		assert_eq!(repo.get_for_range("views", &range()).await.unwrap(), Some(-2.0));

		repo.set_for("views", &moment(), 10.0).await.unwrap();
		repo.decrement_for("views", &moment(), 4.0).await.unwrap();
		assert_eq!(repo.get_for("views", &moment()).await.unwrap(), Some(6.0));
	}

	#[tokio::test]
	async fn remove_is_idempotent() {
		let repo = InMemoryRepository::<i32>::new();

		repo.remove("views").await.unwrap();
		repo.set_for("views", &moment(), 1).await.unwrap();
		repo.remove_for("views", &moment()).await.unwrap();
		repo.remove_for("views", &moment()).await.unwrap();
		repo.remove_for_range("views", &range()).await.unwrap();

		assert!(!repo.has_for("views", &moment()).await.unwrap());
		assert!(repo.is_empty().await);
	}

	#[tokio::test]
	async fn key_spaces_are_independent() {
		let repo = InMemoryRepository::<i64>::new();
		let key = uuid::Uuid::new_v4().to_string();

		repo.set(&key, 1).await.unwrap();
		repo.set_for(&key, &moment(), 2).await.unwrap();
		repo.set_for_range(&key, &range(), 3).await.unwrap();

		assert_eq!(repo.get(&key).await.unwrap(), Some(1));
		assert_eq!(repo.get_for(&key, &moment()).await.unwrap(), Some(2));
		assert_eq!(repo.get_for_range(&key, &range()).await.unwrap(), Some(3));

		repo.remove(&key).await.unwrap();
		assert!(!repo.has(&key).await.unwrap());
		assert!(repo.has_for(&key, &moment()).await.unwrap());
		assert!(repo.has_for_range(&key, &range()).await.unwrap());

		// A range starting at the dated moment is still a separate slot.
		let point = DateRange::new(moment(), moment()).unwrap();
		assert!(!repo.has_for_range(&key, &point).await.unwrap());
	}

	#[tokio::test]
	async fn integer_overflow_leaves_value_untouched() {
		let repo = InMemoryRepository::<i8>::new();

		repo.set("views", i8::MAX).await.unwrap();
		let err = repo.increment("views", 1).await.unwrap_err();
		assert!(matches!(err, RepositoryError::Overflow { ref slot } if slot == "standard:views"));
		assert_eq!(repo.get("views").await.unwrap(), Some(i8::MAX));

		let err = repo.decrement("floor", i8::MIN).await.unwrap_err();
		assert!(matches!(err, RepositoryError::Overflow { .. }));
		assert!(!repo.has("floor").await.unwrap());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_increments_are_not_lost() {
		let repo = Arc::new(InMemoryRepository::<i64>::new());

		let tasks = (0..64).map(|_| {
			let repo = repo.clone();
			tokio::spawn(async move { repo.increment_for_range("views", &range(), 1).await })
		});

		for result in futures::future::join_all(tasks).await {
			result.expect("task panicked").unwrap();
		}

		assert_eq!(repo.get_for_range("views", &range()).await.unwrap(), Some(64));
	}
}

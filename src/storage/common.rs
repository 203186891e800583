// common.rs

use crate::{period::DateRange, types::Moment};

/// Namespace of plain, unscoped counters.
pub const PLAIN_NAMESPACE: &str = "standard";
/// Namespace of counters scoped to a single moment.
pub const DATE_NAMESPACE: &str = "date";
/// Namespace of counters scoped to a range of moments.
pub const RANGE_NAMESPACE: &str = "range";

/// Slot of the plain counter `key`: `standard:<key>`.
pub fn plain_slot(key: &str) -> String {
	format!("{}:{}", PLAIN_NAMESPACE, key)
}

/// Slot of `key` at `moment`: `date:<key>_<epoch seconds>`.
///
/// Moments are truncated to whole seconds, two moments within the same second share a slot.
pub fn date_slot(key: &str, moment: &Moment) -> String {
	format!("{}:{}_{}", DATE_NAMESPACE, key, moment.timestamp())
}

/// Slot of `key` over `range`: `range:<key>_<start epoch seconds>_<end epoch seconds>`.
pub fn range_slot(key: &str, range: &DateRange) -> String {
	format!("{}:{}_{}_{}", RANGE_NAMESPACE, key, range.start().timestamp(), range.end().timestamp())
}

#[cfg(test)]
mod tests {
	use chrono::{Duration, TimeZone, Utc};

	use super::*;

	#[test]
	fn slots_follow_namespace_layout() {
		let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
		let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
		let range = DateRange::new(start, end).unwrap();

		assert_eq!(plain_slot("views"), "standard:views");
		assert_eq!(date_slot("views", &start), "date:views_1704067200");
		assert_eq!(range_slot("views", &range), "range:views_1704067200_1706745600");
	}

	#[test]
	fn namespaces_never_collide() {
		let moment = Utc.timestamp_opt(7, 0).unwrap();
		let range = DateRange::new(moment, moment).unwrap();

		// A plain key shaped like a scoped slot still lands in its own namespace.
		assert_ne!(plain_slot("views_7"), date_slot("views", &moment));
		assert_ne!(date_slot("views_7", &moment), range_slot("views", &range));
		assert_ne!(plain_slot("date:views"), date_slot("views", &moment));
	}

	#[test]
	fn sub_second_precision_is_dropped() {
		let moment = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
		let later = moment + Duration::milliseconds(999);
		assert_eq!(date_slot("views", &moment), date_slot("views", &later));
	}

	#[test]
	fn moments_before_the_epoch_are_addressable() {
		let moment = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 0).unwrap();
		assert_eq!(date_slot("views", &moment), "date:views_-60");
	}
}

//! Values returned by counter reads.
//!
//! A result carries its payload together with the [`Scope`] it was read from, so a caller
//! iterating over the results of a multi-range read always knows which range each value
//! belongs to.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{period::DateRange, types::Moment};

/// What a result pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Scope {
	/// The plain, unscoped counter.
	Unscoped,
	/// The counter for a single moment.
	Date(Moment),
	/// The counter for a range of moments.
	Range(DateRange),
}

impl Scope {
	pub fn date(&self) -> Option<Moment> {
		match self {
			Self::Date(moment) => Some(*moment),
			_ => None,
		}
	}

	pub fn range(&self) -> Option<DateRange> {
		match self {
			Self::Range(range) => Some(*range),
			_ => None,
		}
	}
}

/// A counter value, `None` when nothing is stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Value<V> {
	scope: Scope,
	value: Option<V>,
}

impl<V: Copy> Value<V> {
	pub fn new(value: Option<V>) -> Self {
		Self { scope: Scope::Unscoped, value }
	}

	pub fn for_date(date: Moment, value: Option<V>) -> Self {
		Self { scope: Scope::Date(date), value }
	}

	pub fn for_range(range: DateRange, value: Option<V>) -> Self {
		Self { scope: Scope::Range(range), value }
	}

	pub fn value(&self) -> Option<V> {
		self.value
	}

	pub fn is_set(&self) -> bool {
		self.value.is_some()
	}

	pub fn scope(&self) -> Scope {
		self.scope
	}

	pub fn date(&self) -> Option<Moment> {
		self.scope.date()
	}

	pub fn range(&self) -> Option<DateRange> {
		self.scope.range()
	}
}

/// Prints the number, or nothing when the value is absent.
impl<V: Display> Display for Value<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.value {
			Some(value) => write!(f, "{}", value),
			None => Ok(()),
		}
	}
}

/// Whether a counter value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exists {
	scope: Scope,
	exists: bool,
}

impl Exists {
	pub fn new(exists: bool) -> Self {
		Self { scope: Scope::Unscoped, exists }
	}

	pub fn for_date(date: Moment, exists: bool) -> Self {
		Self { scope: Scope::Date(date), exists }
	}

	pub fn for_range(range: DateRange, exists: bool) -> Self {
		Self { scope: Scope::Range(range), exists }
	}

	pub fn exists(&self) -> bool {
		self.exists
	}

	pub fn scope(&self) -> Scope {
		self.scope
	}

	pub fn date(&self) -> Option<Moment> {
		self.scope.date()
	}

	pub fn range(&self) -> Option<DateRange> {
		self.scope.range()
	}
}

/// Result of a period scoped read.
///
/// The shape follows the period's [`Decomposition`](crate::Decomposition): nothing for an empty
/// period, one date scoped result for a single moment, and one range scoped result per range
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
	/// The period had no moments, nothing was read.
	Empty,
	/// The period was a single moment.
	Single(T),
	/// One result per range, in period order.
	Many(Vec<T>),
}

impl<T> Outcome<T> {
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}

	/// Number of results carried.
	pub fn len(&self) -> usize {
		match self {
			Self::Empty => 0,
			Self::Single(_) => 1,
			Self::Many(results) => results.len(),
		}
	}

	/// The date scoped result, if the period was a single moment.
	pub fn single(self) -> Option<T> {
		match self {
			Self::Single(result) => Some(result),
			_ => None,
		}
	}

	/// Flattens the outcome, whatever its shape.
	pub fn into_vec(self) -> Vec<T> {
		match self {
			Self::Empty => Vec::new(),
			Self::Single(result) => vec![result],
			Self::Many(results) => results,
		}
	}
}

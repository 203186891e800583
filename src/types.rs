use std::fmt::{Debug, Display};

use chrono::{DateTime, Utc};
use num_traits::{CheckedAdd, CheckedSub, Num, Signed};

/// A point in time a counter value can be scoped to.
///
/// Storage backends address moments with second precision, see [`crate::storage::common`].
pub type Moment = DateTime<Utc>;

/// Numeric type a counter can hold.
///
/// Implemented for the signed integers and the floats. Unsigned types are left out on purpose:
/// decrementing a slot that was never written stores the negated delta.
///
/// Integer arithmetic is checked so an overflowing increment surfaces as
/// [`RepositoryError::Overflow`] instead of wrapping or panicking. Floats follow IEEE 754.
pub trait Amount:
	Num + Signed + Copy + PartialOrd + Debug + Display + Send + Sync + 'static
{
	/// `self + rhs`, or `None` when the result is not representable.
	fn checked_plus(self, rhs: Self) -> Option<Self>;

	/// `self - rhs`, or `None` when the result is not representable.
	fn checked_minus(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_amount_for_integers {
	($($t:ty),*) => {
		$(
			impl Amount for $t {
				fn checked_plus(self, rhs: Self) -> Option<Self> {
					CheckedAdd::checked_add(&self, &rhs)
				}

				fn checked_minus(self, rhs: Self) -> Option<Self> {
					CheckedSub::checked_sub(&self, &rhs)
				}
			}
		)*
	};
}

macro_rules! impl_amount_for_floats {
	($($t:ty),*) => {
		$(
			impl Amount for $t {
				fn checked_plus(self, rhs: Self) -> Option<Self> {
					Some(self + rhs)
				}

				fn checked_minus(self, rhs: Self) -> Option<Self> {
					Some(self - rhs)
				}
			}
		)*
	};
}

impl_amount_for_integers!(i8, i16, i32, i64, i128, isize);
impl_amount_for_floats!(f32, f64);

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
	Period(#[from] PeriodError),
	Repository(#[from] RepositoryError),
}

impl Display for CounterError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Period(e) => write!(f, "{}", e),
			Self::Repository(e) => write!(f, "{}", e),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
	/// A range whose end is earlier than its start.
	InvalidRange { start: Moment, end: Moment },
	/// The moment at `index` is earlier than the one before it.
	Unordered { index: usize },
	/// A recurrence interval that does not move time forward.
	NonPositiveInterval,
	/// Calendar arithmetic left the representable range of [`Moment`].
	OutOfRange,
}

impl Display for PeriodError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRange { start, end } => write!(
				f,
				"Invalid range: end {} is before start {}",
				end.to_rfc3339(),
				start.to_rfc3339()
			),
			Self::Unordered { index } =>
				write!(f, "Period moment at index {} is earlier than its predecessor", index),
			Self::NonPositiveInterval => write!(f, "Period interval must move time forward"),
			Self::OutOfRange => write!(f, "Period moment is out of the supported date range"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
	/// Checked arithmetic on the value stored in `slot` failed.
	Overflow { slot: String },
	/// Failure reported by the storage backend itself.
	Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
	/// Wraps a backend specific error.
	pub fn backend<E>(err: E) -> Self
	where
		E: Into<Box<dyn std::error::Error + Send + Sync>>,
	{
		Self::Backend(err.into())
	}
}

impl Display for RepositoryError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Overflow { slot } => write!(f, "Arithmetic overflow on slot {}", slot),
			Self::Backend(e) => write!(f, "Backend error: {}", e),
		}
	}
}

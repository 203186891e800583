//! Calendar periods and their decomposition into storage scopes.
//!
//! A [`Period`] is an ordered sequence of [`Moment`]s. Counters never store a period as a whole:
//! [`decompose`] turns it into nothing at all, a single moment, or one [`DateRange`] per pair of
//! adjacent moments, and every piece is then addressed on its own by the
//! [`Repository`](crate::Repository).

use chrono::{Days, Duration, Months};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::types::{Moment, PeriodError};

/// A closed pair of moments with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
	start: Moment,
	end: Moment,
}

impl DateRange {
	/// Creates a range, rejecting an `end` earlier than `start`.
	///
	/// Zero length ranges (`start == end`) are valid.
	pub fn new(start: Moment, end: Moment) -> Result<Self, PeriodError> {
		if end < start {
			return Err(PeriodError::InvalidRange { start, end })
		}

		Ok(Self { start, end })
	}

	pub fn start(&self) -> Moment {
		self.start
	}

	pub fn end(&self) -> Moment {
		self.end
	}

	/// Length of the range.
	pub fn duration(&self) -> Duration {
		self.end - self.start
	}
}

#[derive(Deserialize)]
struct RawDateRange {
	start: Moment,
	end: Moment,
}

impl TryFrom<RawDateRange> for DateRange {
	type Error = PeriodError;

	fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
		Self::new(raw.start, raw.end)
	}
}

/// Distance between two consecutive moments of a recurring [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
	/// Fixed amount of time.
	Duration(Duration),
	/// Whole calendar days.
	Days(u64),
	/// Calendar months. Days past the end of a shorter month are clamped to its last day.
	Months(u32),
}

impl Interval {
	fn is_positive(&self) -> bool {
		match self {
			Self::Duration(duration) => *duration > Duration::zero(),
			Self::Days(days) => *days > 0,
			Self::Months(months) => *months > 0,
		}
	}

	/// The moment `n` intervals after `start`.
	///
	/// Offsets are always taken from `start` so month clamping does not drift.
	fn nth_after(&self, start: Moment, n: u32) -> Result<Moment, PeriodError> {
		let moment = match self {
			Self::Duration(duration) => duration
				.num_nanoseconds()
				.and_then(|nanos| nanos.checked_mul(i64::from(n)))
				.and_then(|nanos| start.checked_add_signed(Duration::nanoseconds(nanos))),
			Self::Days(days) =>
				days.checked_mul(u64::from(n)).and_then(|d| start.checked_add_days(Days::new(d))),
			Self::Months(months) => months
				.checked_mul(n)
				.and_then(|m| start.checked_add_months(Months::new(m))),
		};

		moment.ok_or(PeriodError::OutOfRange)
	}
}

/// An ordered, non-decreasing sequence of moments.
///
/// An empty period scopes nothing, a single moment scopes one date, and two or more moments
/// describe adjacent sub-intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Period {
	moments: Vec<Moment>,
}

impl Period {
	/// A period without moments.
	pub fn empty() -> Self {
		Self::default()
	}

	/// A period made of exactly one moment.
	pub fn single(moment: Moment) -> Self {
		Self { moments: vec![moment] }
	}

	/// A period made of the two boundaries of a range, which decomposes into that one range.
	pub fn range(start: Moment, end: Moment) -> Result<Self, PeriodError> {
		let range = DateRange::new(start, end)?;
		Ok(Self { moments: vec![range.start, range.end] })
	}

	/// A period from arbitrary moments.
	///
	/// Fails with [`PeriodError::Unordered`] on the first moment earlier than its predecessor.
	pub fn from_moments<I>(moments: I) -> Result<Self, PeriodError>
	where
		I: IntoIterator<Item = Moment>,
	{
		let moments: Vec<Moment> = moments.into_iter().collect();

		if let Some(index) = moments.windows(2).position(|pair| pair[1] < pair[0]) {
			return Err(PeriodError::Unordered { index: index + 1 })
		}

		Ok(Self { moments })
	}

	/// `start` followed by `recurrences` more moments, each `interval` after the previous one.
	///
	/// ```
	/// use chrono::{TimeZone, Utc};
	/// use period_counter::{Interval, Period};
	///
	/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
	/// // Six month starts, five monthly buckets.
	/// let period = Period::recurring(start, Interval::Months(1), 5).unwrap();
	/// assert_eq!(period.len(), 6);
	/// ```
	pub fn recurring(
		start: Moment,
		interval: Interval,
		recurrences: u32,
	) -> Result<Self, PeriodError> {
		if !interval.is_positive() {
			return Err(PeriodError::NonPositiveInterval)
		}

		// Offsets only grow with `n`: if the last moment is representable, all of them are.
		interval.nth_after(start, recurrences)?;

		let moments = std::iter::once(Ok(start))
			.chain((1..=recurrences).map(|n| interval.nth_after(start, n)))
			.collect::<Result<Vec<_>, _>>()?;

		trace!("Built recurring period of {} moments from {}", moments.len(), start);

		Ok(Self { moments })
	}

	/// `start`, `start + interval`, ... for every moment strictly before `end`.
	pub fn until(start: Moment, interval: Interval, end: Moment) -> Result<Self, PeriodError> {
		if !interval.is_positive() {
			return Err(PeriodError::NonPositiveInterval)
		}

		let mut moments = Vec::new();
		let mut current = start;
		let mut n = 0u32;
		while current < end {
			moments.push(current);
			n = n.checked_add(1).ok_or(PeriodError::OutOfRange)?;
			current = interval.nth_after(start, n)?;
		}

		trace!("Built period of {} moments from {} until {}", moments.len(), start, end);

		Ok(Self { moments })
	}

	pub fn moments(&self) -> &[Moment] {
		&self.moments
	}

	pub fn len(&self) -> usize {
		self.moments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.moments.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Moment> {
		self.moments.iter()
	}
}

impl IntoIterator for Period {
	type Item = Moment;
	type IntoIter = std::vec::IntoIter<Moment>;

	fn into_iter(self) -> Self::IntoIter {
		self.moments.into_iter()
	}
}

impl<'a> IntoIterator for &'a Period {
	type Item = &'a Moment;
	type IntoIter = std::slice::Iter<'a, Moment>;

	fn into_iter(self) -> Self::IntoIter {
		self.moments.iter()
	}
}

/// What a [`Period`] breaks down into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decomposition {
	/// The period has no moments.
	Empty,
	/// The period has exactly one moment.
	Point(Moment),
	/// One range per pair of adjacent moments, in period order.
	Ranges(Vec<DateRange>),
}

/// Breaks `period` down into the scopes a counter operation is applied to.
///
/// `n >= 2` moments produce `n - 1` ranges `(m[i], m[i + 1])`; the last moment only ever
/// appears as the end of the last range.
pub fn decompose(period: &Period) -> Decomposition {
	match period.moments() {
		[] => Decomposition::Empty,
		[moment] => Decomposition::Point(*moment),
		moments => Decomposition::Ranges(
			moments
				.windows(2)
				// `Period` keeps its moments ordered, so every pair is a valid range.
				.map(|pair| DateRange { start: pair[0], end: pair[1] })
				.collect(),
		),
	}
}

pub mod beatmap;
pub mod convert;
pub mod curve;
pub mod file;
pub mod objects;
pub mod point;
pub mod tau_beatmap;
pub mod utils;

use std::ops::{Bound, RangeBounds};

use file::beatmap::Timestamp;

pub trait Timestamped {
	fn timestamp(&self) -> Timestamp;
}

pub trait TimestampedSlice<T: Timestamped> {
	fn between(&self, time_range: impl RangeBounds<Timestamp>) -> &[T];

	/// Last element whose timestamp is at or before `time`.
	fn last_at(&self, time: Timestamp) -> Option<&T> {
		self.between(..=time).last()
	}
}

impl<T: Timestamped> TimestampedSlice<T> for [T] {
	fn between(&self, time_range: impl RangeBounds<Timestamp>) -> &[T] {
		let start_index = match time_range.start_bound() {
			Bound::Included(start) => self.partition_point(|o| o.timestamp() < *start),
			Bound::Excluded(start) => self.partition_point(|o| o.timestamp() <= *start),
			Bound::Unbounded => 0,
		};

		let end_index = match time_range.end_bound() {
			Bound::Included(end) => self.partition_point(|o| o.timestamp() <= *end),
			Bound::Excluded(end) => self.partition_point(|o| o.timestamp() < *end),
			Bound::Unbounded => self.len(),
		};

		if start_index >= end_index {
			return &[];
		}

		&self[start_index..end_index]
	}
}

#[must_use]
pub fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
	(a - b).abs() <= tolerance
}

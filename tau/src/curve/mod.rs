pub mod bezier;

use crate::file::beatmap::{SliderCurveType, SliderPoint};
use crate::point::Point;

use self::bezier::{convert_to_bezier_anchors, flatten_bezier_anchors};

/// The path of an osu! slider, flattened to a polyline relative to the slider's head.
#[derive(Clone, Debug)]
pub struct SliderCurve {
	path: Vec<Point>,
	/// Length of the path up to each of its points.
	cumulative_lengths: Vec<f64>,
}

impl SliderCurve {
	/// Builds the curve of a slider starting at `head` and going through `curve_points`.
	///
	/// When `expected_length` is given and positive, the path is cut or linearly extended to that length.
	#[must_use]
	pub fn new(
		head: Point,
		first_curve_type: SliderCurveType,
		curve_points: &[SliderPoint],
		expected_length: Option<f64>,
	) -> Self {
		#[allow(clippy::cast_possible_truncation)]
		let mut control_points = vec![SliderPoint::new(
			first_curve_type,
			head.x as i32,
			head.y as i32,
		)];
		control_points.extend_from_slice(curve_points);

		let mut path = Vec::new();
		for segment in segments(&control_points) {
			for point in flatten_bezier_anchors(&convert_to_bezier_anchors(segment)) {
				if path.last() != Some(&point) {
					path.push(point);
				}
			}
		}

		let origin = control_points[0].to_point();
		let path: Vec<Point> = if path.is_empty() {
			vec![Point::default()]
		} else {
			path.into_iter().map(|p| p - origin).collect()
		};

		let mut curve = Self::from_path(path);
		if let Some(expected_length) = expected_length.filter(|&l| l > 0.) {
			curve.fit_to_length(expected_length);
		}

		curve
	}

	fn from_path(path: Vec<Point>) -> Self {
		let mut cumulative_lengths = Vec::with_capacity(path.len());
		let mut total = 0.;
		for (i, point) in path.iter().enumerate() {
			if i > 0 {
				total += path[i - 1].distance(*point);
			}
			cumulative_lengths.push(total);
		}

		Self {
			path,
			cumulative_lengths,
		}
	}

	fn fit_to_length(&mut self, expected_length: f64) {
		let length = self.length();

		if length > expected_length {
			let end = self
				.cumulative_lengths
				.partition_point(|&l| l < expected_length);
			let end_point = self.point_at_distance(expected_length);

			self.path.truncate(end);
			self.cumulative_lengths.truncate(end);
			self.path.push(end_point);
			self.cumulative_lengths.push(expected_length);
		} else if length < expected_length && self.path.len() >= 2 {
			let n = self.path.len();
			let last = self.path[n - 1];
			let direction = last - self.path[n - 2];
			let direction_len = direction.len();

			if direction_len > 0. {
				let extension = direction * ((expected_length - length) / direction_len);
				self.path[n - 1] = last + extension;
				self.cumulative_lengths[n - 1] = expected_length;
			}
		}
	}

	/// Length of the path in osu! pixels.
	#[must_use]
	pub fn length(&self) -> f64 {
		self.cumulative_lengths.last().copied().unwrap_or_default()
	}

	/// Position relative to the head at `progress` in `[0, 1]` along the path.
	#[must_use]
	pub fn position_at(&self, progress: f64) -> Point {
		self.point_at_distance(progress.clamp(0., 1.) * self.length())
	}

	fn point_at_distance(&self, distance: f64) -> Point {
		let i = self.cumulative_lengths.partition_point(|&l| l < distance);

		if i == 0 {
			return self.path.first().copied().unwrap_or_default();
		}
		if i >= self.path.len() {
			return self.path.last().copied().unwrap_or_default();
		}

		let segment_start = self.cumulative_lengths[i - 1];
		let segment_length = self.cumulative_lengths[i] - segment_start;
		if segment_length <= 0. {
			return self.path[i];
		}

		let t = (distance - segment_start) / segment_length;
		self.path[i - 1].lerp(self.path[i], t)
	}

	/// The flattened path, relative to the slider's head.
	#[must_use]
	pub fn path(&self) -> &[Point] {
		&self.path
	}
}

/// Splits control points at every point that starts a new curve type.
///
/// Consecutive segments share their boundary point.
fn segments(control_points: &[SliderPoint]) -> Vec<&[SliderPoint]> {
	let mut segments = Vec::new();

	let mut segment_start = 0;
	for (i, point) in control_points.iter().enumerate() {
		if i == segment_start {
			continue;
		}

		if point.curve_type != SliderCurveType::Inherit {
			segments.push(&control_points[segment_start..=i]);
			segment_start = i;
		}
	}

	if segment_start != control_points.len() - 1 || segments.is_empty() {
		segments.push(&control_points[segment_start..]);
	}

	segments
}

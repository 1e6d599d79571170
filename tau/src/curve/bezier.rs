//! Conversion of every slider curve type to bezier anchors, plus bezier flattening.
//!
//! Circle presets adapted from <https://github.com/JPK314/LazerToStable/blob/main/src/bezier_converter.py>

use std::f64::consts::TAU;

use crate::file::beatmap::{SliderCurveType, SliderPoint};
use crate::is_close;
use crate::point::Point;

/// Maximum amount of refinement passes when fitting a circle preset to an arc.
const MAX_ARC_FIT_ITERATIONS: usize = 64;

/// Distance in osu! pixels between two samples of a flattened bezier.
const BEZIER_SAMPLE_SPACING: f64 = 2.;

/// Bezier approximation of a unit circle arc starting at `(1, 0)`.
struct CirclePreset {
	/// Widest arc in radians the preset can be shrunk to.
	max_angle: f64,
	anchors: &'static [Point],
}

#[allow(clippy::unreadable_literal)]
static CIRCLE_PRESETS: [CirclePreset; 5] = [
	CirclePreset {
		max_angle: 0.4993379862754501,
		anchors: &[
			Point::new(1.0, 0.0),
			Point::new(1.0, 0.2549893626632736),
			Point::new(0.8778997558480327, 0.47884446188920726),
		],
	},
	CirclePreset {
		max_angle: 1.7579419829169447,
		anchors: &[
			Point::new(1.0, 0.0),
			Point::new(1.0, 0.6263026),
			Point::new(0.42931178, 1.0990661),
			Point::new(-0.18605515, 0.9825393),
		],
	},
	CirclePreset {
		max_angle: 3.1385246920140215,
		anchors: &[
			Point::new(1.0, 0.0),
			Point::new(1.0, 0.87084764),
			Point::new(0.002304826, 1.5033062),
			Point::new(-0.9973236, 0.8739115),
			Point::new(-0.9999953, 0.0030679568),
		],
	},
	CirclePreset {
		max_angle: 5.69720464620727,
		anchors: &[
			Point::new(1.0, 0.0),
			Point::new(1.0, 1.4137783),
			Point::new(-1.4305235, 2.0779421),
			Point::new(-2.3410065, -0.94017583),
			Point::new(0.05132711, -1.7309346),
			Point::new(0.8331702, -0.5530167),
		],
	},
	CirclePreset {
		max_angle: TAU,
		anchors: &[
			Point::new(1.0, 0.0),
			Point::new(1.0, 1.2447058),
			Point::new(-0.8526471, 2.118367),
			Point::new(-2.6211002, 7.854936_e-06),
			Point::new(-0.8526448, -2.118357),
			Point::new(1.0, -1.2447058),
			Point::new(1.0, 0.0),
		],
	},
];

impl CirclePreset {
	/// Smallest preset covering `angle` radians.
	fn covering(angle: f64) -> &'static Self {
		let widest = &CIRCLE_PRESETS[CIRCLE_PRESETS.len() - 1];
		CIRCLE_PRESETS.iter().find(|preset| angle <= preset.max_angle).unwrap_or(widest)
	}

	/// Anchors of the preset cut down to an arc of `angle` radians.
	fn shrunk_to(&self, angle: f64) -> Vec<Point> {
		let mut anchors = self.anchors.to_vec();
		let last = anchors.len() - 1;
		let mut covered = self.max_angle;

		for _ in 0..MAX_ARC_FIT_ITERATIONS {
			let t = angle / covered;
			if !t.is_finite() || (t - 1.).abs() <= 1e-6 {
				break;
			}

			// keep the part of the bezier before `t`
			for j in 0..last {
				for i in ((j + 1)..=last).rev() {
					anchors[i] = anchors[i - 1].lerp(anchors[i], t);
				}
			}

			let end = anchors[last];
			covered = end.y.atan2(end.x).rem_euclid(TAU);
		}

		anchors
	}
}

/// Arc of the circle going through three points, from the first one to the last one.
struct CircleArc {
	center: Point,
	radius: f64,
	/// Angle of the first point around the center, in radians.
	start: f64,
	/// Angle covered by the arc, in radians.
	range: f64,
	/// `1` if the arc goes towards growing angles, `-1` otherwise.
	direction: f64,
}

impl CircleArc {
	/// `None` if the points are collinear.
	fn through(a: Point, b: Point, c: Point) -> Option<Self> {
		let ab = b - a;
		let ac = c - a;

		let cross = ab.x.mul_add(ac.y, -ab.y * ac.x);
		if is_close(cross, 0., f64::EPSILON) {
			return None;
		}

		let (ab_sq, ac_sq) = (ab.dot(ab), ac.dot(ac));
		let center = a + Point::new(
			ac.y.mul_add(ab_sq, -ab.y * ac_sq),
			ab.x.mul_add(ac_sq, -ac.x * ab_sq),
		) / (2. * cross);

		let from_center = |p: Point| {
			let d = p - center;
			d.y.atan2(d.x)
		};
		let start = from_center(a);
		let range = (from_center(c) - start).rem_euclid(TAU);

		// b is on the other side of ac: go around the other way
		let (range, direction) = if cross < 0. { (TAU - range, -1.) } else { (range, 1.) };

		Some(Self {
			center,
			radius: (a - center).len(),
			start,
			range,
			direction,
		})
	}

	/// Moves a point of the unit circle arc starting at `(1, 0)` onto this arc.
	fn place(&self, unit: Point) -> Point {
		let (sin, cos) = self.start.sin_cos();
		let y = unit.y * self.direction;

		Point::new(unit.x.mul_add(cos, -y * sin), unit.x.mul_add(sin, y * cos)) * self.radius + self.center
	}
}

/// Converts one slider segment to bezier anchors.
///
/// The curve type of the segment is the one of its first point.
/// Repeated consecutive anchors mark the boundary between two bezier pieces.
/// Perfect curves that don't have exactly 3 points are read as beziers, like osu! does.
#[must_use]
pub fn convert_to_bezier_anchors(control_points: &[SliderPoint]) -> Vec<Point> {
	let Some(first_point) = control_points.first() else {
		return Vec::new();
	};

	let points: Vec<Point> = control_points.iter().map(SliderPoint::to_point).collect();

	match (first_point.curve_type, points.as_slice()) {
		(SliderCurveType::Linear, _) | (SliderCurveType::PerfectCurve, [_, _]) => linear_anchors(&points),
		(SliderCurveType::PerfectCurve, &[a, b, c]) => circle_anchors(a, b, c),
		(SliderCurveType::Catmull, _) => catmull_anchors(&points),
		_ => points,
	}
}

fn circle_anchors(a: Point, b: Point, c: Point) -> Vec<Point> {
	let Some(arc) = CircleArc::through(a, b, c) else {
		return linear_anchors(&[a, b, c]);
	};

	let mut anchors: Vec<Point> = CirclePreset::covering(arc.range)
		.shrunk_to(arc.range)
		.into_iter()
		.map(|unit| arc.place(unit))
		.collect();

	if let Some(first) = anchors.first_mut() {
		*first = a;
	}
	if let Some(last) = anchors.last_mut() {
		*last = c;
	}

	anchors
}

/// Centripetal catmull-rom segments become cubic beziers.
fn catmull_anchors(points: &[Point]) -> Vec<Point> {
	if points.len() < 2 {
		return points.to_vec();
	}

	let mut anchors = vec![points[0]];
	for (i, segment) in points.windows(2).enumerate() {
		let (p1, p2) = (segment[0], segment[1]);
		let p0 = if i == 0 { p1 } else { points[i - 1] };
		let p3 = points.get(i + 2).copied().unwrap_or(p2 * 2. - p1);

		anchors.extend([p1 + (p2 - p0) / 6., p2 - (p3 - p1) / 6., p2, p2]);
	}
	anchors.pop();

	anchors
}

/// Every inner point is doubled so that each line is its own bezier piece.
fn linear_anchors(points: &[Point]) -> Vec<Point> {
	let Some((&first, rest)) = points.split_first() else {
		return Vec::new();
	};

	let mut anchors: Vec<Point> = std::iter::once(first).chain(rest.iter().flat_map(|&p| [p, p])).collect();
	anchors.pop();

	anchors
}

/// Point on the bezier curve defined by `control_points` at `t` in `[0, 1]` (de Casteljau).
#[must_use]
pub fn bezier_point_at(control_points: &[Point], t: f64) -> Point {
	let mut points = control_points.to_vec();
	let n = points.len();

	for level in 1..n {
		for i in 0..(n - level) {
			points[i] = points[i].lerp(points[i + 1], t);
		}
	}

	points.first().copied().unwrap_or_default()
}

/// Flattens bezier anchors into a polyline.
///
/// A repeated anchor splits the anchors into independent bezier pieces.
#[must_use]
pub fn flatten_bezier_anchors(anchors: &[Point]) -> Vec<Point> {
	let mut polyline: Vec<Point> = Vec::new();

	let mut piece_start = 0;
	for i in 0..anchors.len() {
		let is_last = i == anchors.len() - 1;
		let is_split = !is_last && anchors[i] == anchors[i + 1];

		if is_split || is_last {
			flatten_piece(&anchors[piece_start..=i], &mut polyline);
			piece_start = i + 1;
		}
	}

	polyline
}

fn flatten_piece(piece: &[Point], polyline: &mut Vec<Point>) {
	match piece {
		[] => {}
		[point] => push_distinct(polyline, *point),
		[start, end] => {
			push_distinct(polyline, *start);
			push_distinct(polyline, *end);
		}
		_ => {
			let control_length: f64 = piece.windows(2).map(|w| w[0].distance(w[1])).sum();

			#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
			let steps = ((control_length / BEZIER_SAMPLE_SPACING).ceil() as usize).clamp(2, 1000);

			push_distinct(polyline, piece[0]);
			for step in 1..steps {
				#[allow(clippy::cast_precision_loss)]
				let t = step as f64 / steps as f64;
				push_distinct(polyline, bezier_point_at(piece, t));
			}
			push_distinct(polyline, piece[piece.len() - 1]);
		}
	}
}

fn push_distinct(polyline: &mut Vec<Point>, point: Point) {
	if polyline.last() != Some(&point) {
		polyline.push(point);
	}
}

#[cfg(test)]
mod tests {
	use super::{bezier_point_at, convert_to_bezier_anchors, flatten_bezier_anchors};
	use crate::file::beatmap::{SliderCurveType, SliderPoint};
	use crate::is_close;
	use crate::point::Point;

	#[test]
	fn linear_anchors_are_doubled() {
		let anchors = convert_to_bezier_anchors(&[
			SliderPoint::new(SliderCurveType::Linear, 0, 0),
			SliderPoint::new(SliderCurveType::Inherit, 100, 0),
			SliderPoint::new(SliderCurveType::Inherit, 100, 100),
		]);

		assert_eq!(anchors, vec![
			Point::new(0., 0.),
			Point::new(100., 0.),
			Point::new(100., 0.),
			Point::new(100., 100.),
		]);

		let polyline = flatten_bezier_anchors(&anchors);
		assert_eq!(polyline, vec![Point::new(0., 0.), Point::new(100., 0.), Point::new(100., 100.)]);
	}

	#[test]
	fn perfect_circle_stays_on_circle() {
		let anchors = convert_to_bezier_anchors(&[
			SliderPoint::new(SliderCurveType::PerfectCurve, 0, 100),
			SliderPoint::new(SliderCurveType::Inherit, 100, 0),
			SliderPoint::new(SliderCurveType::Inherit, 200, 100),
		]);

		assert_eq!(anchors.first(), Some(&Point::new(0., 100.)));
		assert_eq!(anchors.last(), Some(&Point::new(200., 100.)));

		let center = Point::new(100., 100.);
		for point in flatten_bezier_anchors(&anchors) {
			assert!(is_close(point.distance(center), 100., 1.5), "{point:?} is off the circle");
		}
	}

	#[test]
	fn collinear_perfect_curve_is_linear() {
		let anchors = convert_to_bezier_anchors(&[
			SliderPoint::new(SliderCurveType::PerfectCurve, 0, 0),
			SliderPoint::new(SliderCurveType::Inherit, 50, 0),
			SliderPoint::new(SliderCurveType::Inherit, 100, 0),
		]);

		for point in flatten_bezier_anchors(&anchors) {
			assert!(is_close(point.y, 0., 1e-9));
		}
	}

	#[test]
	fn catmull_passes_through_points() {
		let anchors = convert_to_bezier_anchors(&[
			SliderPoint::new(SliderCurveType::Catmull, 0, 0),
			SliderPoint::new(SliderCurveType::Inherit, 100, 50),
			SliderPoint::new(SliderCurveType::Inherit, 200, 0),
		]);

		let polyline = flatten_bezier_anchors(&anchors);
		assert!(polyline.contains(&Point::new(100., 50.)));
		assert_eq!(polyline.last(), Some(&Point::new(200., 0.)));
	}

	#[test]
	fn quadratic_midpoint() {
		let control_points = [Point::new(0., 0.), Point::new(50., 100.), Point::new(100., 0.)];
		let mid = bezier_point_at(&control_points, 0.5);

		assert!(is_close(mid.x, 50., 1e-9));
		assert!(is_close(mid.y, 50., 1e-9));
	}
}

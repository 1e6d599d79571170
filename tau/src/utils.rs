//! Angle and difficulty helpers shared by the converter and the polar path.

/// Signed rotation in `(-180, 180]` degrees going the short way from `from` to `to`.
#[must_use]
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
	let delta = (to - from).rem_euclid(360.);
	if delta > 180. {
		delta - 360.
	} else {
		delta
	}
}

/// Linearly maps `value` from `[from_min, from_max]` onto `[to_min, to_max]`.
#[must_use]
pub fn remap(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
	to_min + (value - from_min) * (to_max - to_min) / (from_max - from_min)
}

/// Piecewise-linear lookup of a difficulty setting (0–10) over three anchor values.
///
/// - `0` maps to `min`
/// - `5` maps to `mid`
/// - `10` maps to `max`
#[must_use]
pub fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
	if difficulty > 5. {
		mid + (max - mid) * (difficulty - 5.) / 5.
	} else if difficulty < 5. {
		mid - (mid - min) * (5. - difficulty) / 5.
	} else {
		mid
	}
}

#[cfg(test)]
mod tests {
	use super::{difficulty_range, remap, shortest_angle_delta};
	use crate::is_close;

	#[test]
	fn delta_takes_short_way() {
		assert!(is_close(shortest_angle_delta(350., 10.), 20., 1e-9));
		assert!(is_close(shortest_angle_delta(10., 350.), -20., 1e-9));
		assert!(is_close(shortest_angle_delta(0., 720.), 0., 1e-9));
		assert!(is_close(shortest_angle_delta(-90., 90.), 180., 1e-9));
		assert!(is_close(shortest_angle_delta(90., -90.), 180., 1e-9));
	}

	#[test]
	fn delta_is_antisymmetric_and_bounded() {
		let angles = [-725., -360., -179.5, -45., 0., 12.25, 90., 181., 359., 1000.];

		for &a in &angles {
			for &b in &angles {
				let ab = shortest_angle_delta(a, b);
				let ba = shortest_angle_delta(b, a);

				assert!(ab.abs() <= 180.);
				assert!(ab > -180.);
				if !is_close(ab.abs(), 180., 1e-9) {
					assert!(is_close(ab, -ba, 1e-9), "delta({a}, {b}) = {ab}, delta({b}, {a}) = {ba}");
				}
			}
		}
	}

	#[test]
	fn remap_extents() {
		assert!(is_close(remap(0., 0., 512., 0., 360.), 0., 1e-9));
		assert!(is_close(remap(256., 0., 512., 0., 360.), 180., 1e-9));
		assert!(is_close(remap(96., 0., 384., 0., 360.), 90., 1e-9));
	}

	#[test]
	fn approach_rate_range() {
		assert!(is_close(difficulty_range(0., 1800., 1200., 450.), 1800., 1e-9));
		assert!(is_close(difficulty_range(5., 1800., 1200., 450.), 1200., 1e-9));
		assert!(is_close(difficulty_range(10., 1800., 1200., 450.), 450., 1e-9));
		assert!(is_close(difficulty_range(9., 1800., 1200., 450.), 600., 1e-9));
		assert!(is_close(difficulty_range(2.5, 1800., 1200., 450.), 1500., 1e-9));
	}
}

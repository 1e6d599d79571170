use std::ops::{Add, Div, Mul, Neg, Sub};

/// Width of the osu! playfield in osu! pixels.
pub const PLAYFIELD_WIDTH: f64 = 512.;
/// Height of the osu! playfield in osu! pixels.
pub const PLAYFIELD_HEIGHT: f64 = 384.;
/// Centre of the osu! playfield, which is the centre of the tau circle.
pub const PLAYFIELD_CENTER: Point = Point::new(PLAYFIELD_WIDTH / 2., PLAYFIELD_HEIGHT / 2.);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	#[must_use]
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	#[must_use]
	pub fn dot(self, rhs: Self) -> f64 {
		self.x.mul_add(rhs.x, self.y * rhs.y)
	}

	#[must_use]
	pub fn len(self) -> f64 {
		self.x.hypot(self.y)
	}

	#[must_use]
	pub fn distance(self, other: Self) -> f64 {
		(other - self).len()
	}

	#[must_use]
	pub fn lerp(self, other: Self, t: f64) -> Self {
		self + (other - self) * t
	}

	/// Angle in degrees of this point around the playfield centre.
	///
	/// `0` points straight up and angles grow clockwise,
	/// so the result lies in `(-180, 180]` with the right half of the playfield positive.
	#[must_use]
	pub fn playfield_angle(self) -> f64 {
		let right = self.x - PLAYFIELD_CENTER.x;
		let up = PLAYFIELD_CENTER.y - self.y;
		right.atan2(up).to_degrees()
	}
}

impl Neg for Point {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Self { x: -self.x, y: -self.y }
	}
}

impl Add for Point {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Self {
			x: self.x + rhs.x,
			y: self.y + rhs.y,
		}
	}
}

impl Sub for Point {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		Self {
			x: self.x - rhs.x,
			y: self.y - rhs.y,
		}
	}
}

impl Mul<f64> for Point {
	type Output = Self;

	fn mul(self, rhs: f64) -> Self::Output {
		Self {
			x: self.x * rhs,
			y: self.y * rhs,
		}
	}
}

impl Div<f64> for Point {
	type Output = Self;

	fn div(self, rhs: f64) -> Self::Output {
		Self {
			x: self.x / rhs,
			y: self.y / rhs,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Point, PLAYFIELD_CENTER};
	use crate::is_close;

	#[test]
	fn playfield_angles() {
		let up = Point::new(256., 0.);
		let right = Point::new(512., 192.);
		let down = Point::new(256., 384.);
		let left = Point::new(0., 192.);

		assert!(is_close(up.playfield_angle(), 0., 1e-9));
		assert!(is_close(right.playfield_angle(), 90., 1e-9));
		assert!(is_close(down.playfield_angle(), 180., 1e-9));
		assert!(is_close(left.playfield_angle(), -90., 1e-9));
		assert!(is_close(Point::new(356., 92.).playfield_angle(), 45., 1e-9));
	}

	#[test]
	fn centre_has_no_direction() {
		assert!(is_close(PLAYFIELD_CENTER.playfield_angle(), 0., 1e-9));
	}

	#[test]
	fn lerp_and_distance() {
		let a = Point::new(0., 0.);
		let b = Point::new(30., 40.);

		assert!(is_close(a.distance(b), 50., 1e-9));
		assert_eq!(a.lerp(b, 0.5), Point::new(15., 20.));
	}
}

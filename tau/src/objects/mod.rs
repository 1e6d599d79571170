//! Hit objects of the tau ruleset.

pub mod polar_slider_path;
pub mod slider;

pub use polar_slider_path::{EmptyPathError, PolarSliderPath, SliderNode};
pub use slider::{Slider, SliderComponent, SliderComponentKind};

use std::fmt;

use crate::beatmap::Samples;
use crate::file::beatmap::Timestamp;

#[derive(Clone, Debug)]
pub enum TauHitObjectKind {
	/// A momentary hit at an angle.
	Beat { angle: f64 },
	/// A momentary hit in every direction at once.
	HardBeat,
	Slider(Slider),
}

impl fmt::Display for TauHitObjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Self::Beat { .. } => "beat",
			Self::HardBeat => "hard beat",
			Self::Slider(_) => "slider",
		};
		write!(f, "{s}")
	}
}

#[derive(Clone, Debug)]
pub struct TauHitObject {
	pub start_time: Timestamp,
	pub samples: Samples,
	pub new_combo: bool,
	pub combo_offset: u8,
	pub kind: TauHitObjectKind,
}

impl TauHitObject {
	#[must_use]
	pub const fn is_beat(&self) -> bool {
		matches!(self.kind, TauHitObjectKind::Beat { .. })
	}

	#[must_use]
	pub const fn is_hard_beat(&self) -> bool {
		matches!(self.kind, TauHitObjectKind::HardBeat)
	}

	#[must_use]
	pub const fn is_slider(&self) -> bool {
		matches!(self.kind, TauHitObjectKind::Slider(_))
	}

	#[must_use]
	pub fn as_slider(&self) -> Option<&Slider> {
		match &self.kind {
			TauHitObjectKind::Slider(slider) => Some(slider),
			_ => None,
		}
	}

	/// Time at which the object is fully judged.
	#[must_use]
	pub fn end_time(&self) -> Timestamp {
		match &self.kind {
			TauHitObjectKind::Slider(slider) => self.start_time + slider.duration(),
			_ => self.start_time,
		}
	}
}

use crate::beatmap::Samples;
use crate::file::beatmap::Timestamp;

use super::polar_slider_path::PolarSliderPath;

/// Ticks closer than this to the end of a span are dropped, in milliseconds.
const TICK_END_MARGIN: f64 = 10.;

/// A continuous hit following a polar path.
#[derive(Clone, Debug)]
pub struct Slider {
	/// Absolute angle of the slider's head. Path angles are relative to it.
	pub angle: f64,
	pub path: PolarSliderPath,
	pub repeat_count: u32,
	/// Samples played on every edge, from head to tail.
	pub node_samples: Vec<Samples>,
	/// Scales the distance between ticks.
	pub tick_distance_multiplier: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderComponentKind {
	Head,
	Tick { span_index: u32 },
	Repeat { repeat_index: u32 },
}

/// An object nested in a slider, placed at an absolute time and angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderComponent {
	pub kind: SliderComponentKind,
	pub time: Timestamp,
	pub angle: f64,
}

impl Slider {
	#[must_use]
	pub fn duration(&self) -> f64 {
		self.path.duration()
	}

	#[must_use]
	pub const fn span_count(&self) -> u32 {
		self.repeat_count + 1
	}

	/// Absolute angle `offset` milliseconds after the slider's start.
	#[must_use]
	pub fn angle_at(&self, offset: Timestamp) -> f64 {
		self.angle + self.path.angle_at(offset)
	}

	/// Head, ticks and repeats of a slider starting at `start_time`, sorted by time.
	#[must_use]
	pub fn nested_hit_objects(
		&self,
		start_time: Timestamp,
		beat_length: f64,
		slider_tick_rate: f64,
	) -> Vec<SliderComponent> {
		let component = |kind, offset| SliderComponent {
			kind,
			time: start_time + offset,
			angle: self.angle_at(offset),
		};

		let mut components = vec![component(SliderComponentKind::Head, 0.)];

		let span_count = self.span_count();
		let span_duration = self.duration() / f64::from(span_count);
		let tick_interval = beat_length * self.tick_distance_multiplier / slider_tick_rate;

		let mut tick_offsets = Vec::new();
		if tick_interval.is_finite() && tick_interval > 0. {
			let mut offset = tick_interval;
			while offset < span_duration - TICK_END_MARGIN {
				tick_offsets.push(offset);
				offset += tick_interval;
			}
		}

		for span_index in 0..span_count {
			let span_start = f64::from(span_index) * span_duration;
			let tick = SliderComponentKind::Tick { span_index };

			if span_index % 2 == 0 {
				for &offset in &tick_offsets {
					components.push(component(tick, span_start + offset));
				}
			} else {
				for &offset in tick_offsets.iter().rev() {
					components.push(component(tick, span_start + span_duration - offset));
				}
			}

			if span_index + 1 < span_count {
				let repeat = SliderComponentKind::Repeat {
					repeat_index: span_index,
				};
				components.push(component(repeat, span_start + span_duration));
			}
		}

		components
	}
}

#[cfg(test)]
mod tests {
	use super::{Slider, SliderComponentKind};
	use crate::is_close;
	use crate::objects::polar_slider_path::{PolarSliderPath, SliderNode};

	fn slider(repeat_count: u32) -> Slider {
		let path = PolarSliderPath::new(
			vec![SliderNode::new(0., 0.), SliderNode::new(1000., 90.)],
			None,
		)
		.unwrap();

		Slider {
			angle: 30.,
			path,
			repeat_count,
			node_samples: Vec::new(),
			tick_distance_multiplier: 1.,
		}
	}

	#[test]
	fn angles_are_relative_to_head() {
		let slider = slider(0);

		assert!(is_close(slider.angle_at(0.), 30., 1e-9));
		assert!(is_close(slider.angle_at(500.), 75., 1e-9));
		assert!(is_close(slider.angle_at(1000.), 120., 1e-9));
	}

	#[test]
	fn nested_objects_single_span() {
		let components = slider(0).nested_hit_objects(2000., 300., 1.);
		let kinds: Vec<_> = components.iter().map(|c| c.kind).collect();
		let times: Vec<_> = components.iter().map(|c| c.time).collect();

		assert_eq!(kinds, vec![
			SliderComponentKind::Head,
			SliderComponentKind::Tick { span_index: 0 },
			SliderComponentKind::Tick { span_index: 0 },
			SliderComponentKind::Tick { span_index: 0 },
		]);
		assert_eq!(times, vec![2000., 2300., 2600., 2900.]);
		assert!(is_close(components[1].angle, 57., 1e-9));
	}

	#[test]
	fn nested_objects_with_repeats() {
		let components = slider(1).nested_hit_objects(0., 200., 1.);
		let times: Vec<_> = components.iter().map(|c| c.time).collect();

		// spans of 500ms, ticks at 200 and 400, mirrored in the reversed span
		assert_eq!(times, vec![0., 200., 400., 500., 600., 800.]);
		assert_eq!(components[3].kind, SliderComponentKind::Repeat { repeat_index: 0 });
		assert_eq!(components[4].kind, SliderComponentKind::Tick { span_index: 1 });
	}

	#[test]
	fn ticks_near_span_end_are_dropped() {
		let components = slider(0).nested_hit_objects(0., 995., 1.);

		assert_eq!(components.len(), 1);
		assert_eq!(components[0].kind, SliderComponentKind::Head);
	}
}

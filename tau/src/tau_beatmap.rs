use std::fmt;

use crate::beatmap::{ControlPoints, Difficulty};
use crate::objects::{SliderComponent, TauHitObject};

/// A converted beatmap.
#[derive(Clone, Debug, Default)]
pub struct TauBeatmap {
	pub format_version: u32,
	pub difficulty: Difficulty,
	pub control_points: ControlPoints,
	pub hit_objects: Vec<TauHitObject>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeatmapStatistic {
	pub name: &'static str,
	pub content: String,
}

impl fmt::Display for BeatmapStatistic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.name, self.content)
	}
}

impl TauBeatmap {
	/// Beat, slider and hard beat counts.
	#[must_use]
	pub fn statistics(&self) -> Vec<BeatmapStatistic> {
		let count = |pred: fn(&TauHitObject) -> bool| self.hit_objects.iter().filter(|&h| pred(h)).count();

		vec![
			BeatmapStatistic {
				name: "Beat count",
				content: count(TauHitObject::is_beat).to_string(),
			},
			BeatmapStatistic {
				name: "Slider count",
				content: count(TauHitObject::is_slider).to_string(),
			},
			BeatmapStatistic {
				name: "Hard Beat count",
				content: count(TauHitObject::is_hard_beat).to_string(),
			},
		]
	}

	/// Nested objects of a hit object, empty unless it is a slider with a timing point.
	#[must_use]
	pub fn slider_components(&self, hit_object: &TauHitObject) -> Vec<SliderComponent> {
		let Some(slider) = hit_object.as_slider() else {
			return Vec::new();
		};

		let Some(timing_point) = self.control_points.timing_point_at(hit_object.start_time) else {
			return Vec::new();
		};

		slider.nested_hit_objects(
			hit_object.start_time,
			timing_point.beat_length,
			self.difficulty.slider_tick_rate,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::{BeatmapStatistic, TauBeatmap};
	use crate::beatmap::{ControlPoints, Samples};
	use crate::file::beatmap::TimingPoint;
	use crate::objects::{PolarSliderPath, Slider, SliderComponentKind, SliderNode, TauHitObject, TauHitObjectKind};

	fn hit_object(start_time: f64, kind: TauHitObjectKind) -> TauHitObject {
		TauHitObject {
			start_time,
			samples: Samples::default(),
			new_combo: false,
			combo_offset: 0,
			kind,
		}
	}

	fn slider(start_time: f64) -> TauHitObject {
		let path = PolarSliderPath::new(vec![SliderNode::new(0., 0.), SliderNode::new(1000., 45.)], None).unwrap();

		hit_object(
			start_time,
			TauHitObjectKind::Slider(Slider {
				angle: 0.,
				path,
				repeat_count: 0,
				node_samples: Vec::new(),
				tick_distance_multiplier: 1.,
			}),
		)
	}

	fn tau_beatmap() -> TauBeatmap {
		TauBeatmap {
			control_points: ControlPoints::new(vec![TimingPoint {
				beat_length: 400.,
				..TimingPoint::default()
			}]),
			hit_objects: vec![
				hit_object(0., TauHitObjectKind::Beat { angle: 0. }),
				hit_object(100., TauHitObjectKind::HardBeat),
				slider(200.),
				hit_object(1500., TauHitObjectKind::Beat { angle: 90. }),
				slider(2000.),
				hit_object(3500., TauHitObjectKind::Beat { angle: 180. }),
			],
			..TauBeatmap::default()
		}
	}

	#[test]
	fn statistics() {
		let statistics = tau_beatmap().statistics();

		assert_eq!(statistics, vec![
			BeatmapStatistic {
				name: "Beat count",
				content: "3".to_owned(),
			},
			BeatmapStatistic {
				name: "Slider count",
				content: "2".to_owned(),
			},
			BeatmapStatistic {
				name: "Hard Beat count",
				content: "1".to_owned(),
			},
		]);
		assert_eq!(statistics[0].to_string(), "Beat count: 3");
	}

	#[test]
	fn slider_components_are_not_counted() {
		let beatmap = tau_beatmap();
		let components = beatmap.slider_components(&beatmap.hit_objects[2]);

		assert_eq!(components.len(), 3);
		assert_eq!(components[0].kind, SliderComponentKind::Head);
		assert_eq!(components[1].time, 600.);
		assert!(beatmap.slider_components(&beatmap.hit_objects[0]).is_empty());
		assert_eq!(beatmap.statistics()[0].content, "3");
	}
}

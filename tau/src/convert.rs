//! Conversion of generic notes into tau hit objects.

use std::sync::atomic::{AtomicBool, Ordering};

use error_stack::{Report, ResultExt};
use thiserror::Error;
use tracing::{debug, trace};

use crate::beatmap::{Beatmap, Note, NoteConversionError, NoteKind, NotePosition, PathNote};
use crate::file::beatmap::Timestamp;
use crate::objects::{PolarSliderPath, Slider, SliderNode, TauHitObject, TauHitObjectKind};
use crate::tau_beatmap::TauBeatmap;
use crate::utils::{difficulty_range, shortest_angle_delta};

/// Time between two samples of a slider's curve, in milliseconds.
const SLIDER_SAMPLE_INTERVAL: u32 = 20;

/// Fastest angular speed a slider may have, in degrees per millisecond.
const MAX_SLIDER_ANGULAR_SPEED: f64 = 0.6;

/// First format version whose slider ticks follow the slider velocity.
const TICK_VELOCITY_FORMAT_VERSION: u32 = 8;

const BASE_TICK_DISTANCE_MULTIPLIER: f64 = 4.;

/// Quarter turns per spinner revolution.
const NODES_PER_REVOLUTION: u32 = 4;

/// Time of the `index`-th sample of a slider's curve, relative to its start.
fn sample_time(index: u32) -> f64 {
	f64::from(index) * f64::from(SLIDER_SAMPLE_INTERVAL)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConverterSettings {
	/// Accented notes become hard beats.
	pub can_convert_to_hard_beats: bool,
	/// Path and duration notes become sliders.
	pub can_convert_to_sliders: bool,
	/// Keep sliders that turn faster than a player can follow.
	pub can_convert_impossible_sliders: bool,
	/// Divides the approach time to get the shortest slider duration.
	pub slider_divisor: u32,
}

impl Default for ConverterSettings {
	fn default() -> Self {
		Self {
			can_convert_to_hard_beats: true,
			can_convert_to_sliders: true,
			can_convert_impossible_sliders: false,
			slider_divisor: 4,
		}
	}
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
	#[error("Could not convert a note of the beatmap")]
	InvalidNote,
	#[error("Conversion was cancelled")]
	Cancelled,
}

#[derive(Clone, Debug, Default)]
pub struct TauBeatmapConverter {
	pub settings: ConverterSettings,
}

impl TauBeatmapConverter {
	#[must_use]
	pub const fn new(settings: ConverterSettings) -> Self {
		Self { settings }
	}

	/// Converts every note of the beatmap, in order.
	///
	/// # Errors
	///
	/// This function will return an error if a note lacks the timing data it needs.
	/// The report says which note failed.
	pub fn convert(&self, beatmap: &Beatmap) -> error_stack::Result<TauBeatmap, ConversionError> {
		self.convert_with_cancel(beatmap, &AtomicBool::new(false))
	}

	/// Converts every note of the beatmap, checking `cancel` before each note.
	///
	/// # Errors
	///
	/// This function will return an error if a note lacks the timing data it needs,
	/// or [`ConversionError::Cancelled`] if `cancel` was set.
	pub fn convert_with_cancel(
		&self,
		beatmap: &Beatmap,
		cancel: &AtomicBool,
	) -> error_stack::Result<TauBeatmap, ConversionError> {
		let mut hit_objects = Vec::with_capacity(beatmap.notes.len());

		for (index, note) in beatmap.notes.iter().enumerate() {
			if cancel.load(Ordering::Relaxed) {
				return Err(Report::new(ConversionError::Cancelled)
					.attach_printable(format!("Cancelled before note #{index}")));
			}

			let hit_object = self
				.convert_note(beatmap, index)
				.change_context_lazy(|| ConversionError::InvalidNote)
				.attach_printable_lazy(|| format!("Note #{index} at {}ms", note.start_time))?;

			hit_objects.push(hit_object);
		}

		Ok(TauBeatmap {
			format_version: beatmap.format_version,
			difficulty: beatmap.difficulty,
			control_points: beatmap.control_points.clone(),
			hit_objects,
		})
	}

	/// Converts the note at `index` in the beatmap.
	///
	/// # Errors
	///
	/// This function will return an error if the note lacks the timing data it needs.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn convert_note(
		&self,
		beatmap: &Beatmap,
		index: usize,
	) -> error_stack::Result<TauHitObject, NoteConversionError> {
		let note = &beatmap.notes[index];

		match &note.kind {
			NoteKind::Path(path) => {
				trace!(index, time = note.start_time, "Converting path note");
				Ok(self.to_slider(beatmap, note, path)?)
			}
			NoteKind::Duration { duration } => {
				trace!(index, time = note.start_time, "Converting duration note");
				Ok(self.to_slider_spinner(beatmap, index, *duration)?)
			}
			NoteKind::Hit => {
				trace!(index, time = note.start_time, "Converting hit note");
				Ok(self.to_simple_hit(note))
			}
		}
	}

	/// Shortest duration a note needs to become a slider.
	fn slider_threshold(&self, beatmap: &Beatmap) -> f64 {
		difficulty_range(beatmap.difficulty.approach_rate, 1800., 1200., 450.)
			/ f64::from(self.settings.slider_divisor.max(1))
	}

	fn tick_distance_multiplier(beatmap: &Beatmap, time: Timestamp) -> f64 {
		if beatmap.format_version < TICK_VELOCITY_FORMAT_VERSION {
			BASE_TICK_DISTANCE_MULTIPLIER / beatmap.control_points.slider_velocity_at(time)
		} else {
			BASE_TICK_DISTANCE_MULTIPLIER
		}
	}

	fn to_simple_hit(&self, note: &Note) -> TauHitObject {
		let kind = if self.settings.can_convert_to_hard_beats && note.accent_samples().has_finish() {
			TauHitObjectKind::HardBeat
		} else {
			TauHitObjectKind::Beat {
				angle: note.position.angle(),
			}
		};

		TauHitObject {
			start_time: note.start_time,
			samples: note.samples,
			new_combo: note.new_combo,
			combo_offset: note.combo_offset,
			kind,
		}
	}

	fn to_slider(&self, beatmap: &Beatmap, note: &Note, path: &PathNote) -> Result<TauHitObject, NoteConversionError> {
		if !self.settings.can_convert_to_sliders {
			debug!(time = note.start_time, "Sliders are disabled");
			return Ok(self.to_simple_hit(note));
		}

		let duration = beatmap.path_duration(note.start_time, path)?;
		if duration < self.slider_threshold(beatmap) {
			debug!(time = note.start_time, duration, "Slider is too short");
			return Ok(self.to_simple_hit(note));
		}

		let NotePosition::Point(head) = note.position else {
			debug!(time = note.start_time, "Path note has no position on the playfield");
			return Ok(self.to_simple_hit(note));
		};

		let raw_angle_at = |progress: f64| (head + path.curve_position_at(progress)).playfield_angle();

		let first_angle = raw_angle_at(0.);
		let mut prev_raw_angle = first_angle;
		let mut nodes: Vec<SliderNode> = Vec::new();

		let sample_times = (0..)
			.map(sample_time)
			.take_while(|&t| t < duration)
			.map(|t| (t, t / duration))
			.chain(std::iter::once((duration, 1.)));

		for (time, progress) in sample_times {
			let raw_angle = raw_angle_at(progress);
			let angle = match nodes.last() {
				Some(last) => last.angle + shortest_angle_delta(prev_raw_angle, raw_angle),
				None => 0.,
			};

			if !self.settings.can_convert_impossible_sliders {
				if let Some(last) = nodes.last() {
					let speed = shortest_angle_delta(last.angle, angle).abs() / (time - last.time).abs();
					if speed > MAX_SLIDER_ANGULAR_SPEED {
						debug!(time = note.start_time, at = time, speed, "Slider turns too fast");
						return Ok(self.to_simple_hit(note));
					}
				}
			}

			prev_raw_angle = raw_angle;
			nodes.push(SliderNode::new(time, angle));
		}

		Ok(TauHitObject {
			start_time: note.start_time,
			samples: note.samples,
			new_combo: note.new_combo,
			combo_offset: note.combo_offset,
			kind: TauHitObjectKind::Slider(Slider {
				angle: first_angle,
				path: PolarSliderPath::new(nodes, None)?,
				repeat_count: path.repeat_count,
				node_samples: path.node_samples.clone(),
				tick_distance_multiplier: Self::tick_distance_multiplier(beatmap, note.start_time),
			}),
		})
	}

	/// Makes a slider spinning around the circle out of a note that only has a duration.
	fn to_slider_spinner(
		&self,
		beatmap: &Beatmap,
		index: usize,
		duration: f64,
	) -> Result<TauHitObject, NoteConversionError> {
		let note = &beatmap.notes[index];

		if !self.settings.can_convert_to_sliders {
			debug!(time = note.start_time, "Sliders are disabled");
			return Ok(self.to_simple_hit(note));
		}

		if duration < self.slider_threshold(beatmap) {
			debug!(time = note.start_time, duration, "Spinner is too short");
			return Ok(self.to_simple_hit(note));
		}

		let previous_angle = index
			.checked_sub(1)
			.and_then(|i| beatmap.notes.get(i))
			.map_or(0., |previous| previous.position.angle());
		let direction = if previous_angle < 0. { -1. } else { 1. };

		let timing_point = beatmap.timing_point_at(note.start_time)?;
		let revolution_duration = timing_point.beat_length * f64::from(timing_point.meter);
		let revolutions = (duration / revolution_duration).floor();

		if !(revolutions >= 1.) || !revolutions.is_finite() {
			debug!(time = note.start_time, duration, revolution_duration, "Spinner is shorter than a revolution");
			return Ok(self.to_simple_hit(note));
		}

		let node_duration = duration / revolutions / f64::from(NODES_PER_REVOLUTION);

		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let node_count = revolutions as u32 * NODES_PER_REVOLUTION;

		let nodes = (0..node_count)
			.map(|i| SliderNode::new(node_duration * f64::from(i), 90. * direction * f64::from(i)))
			.collect();

		Ok(TauHitObject {
			start_time: note.start_time,
			samples: note.samples,
			new_combo: note.new_combo,
			combo_offset: note.combo_offset,
			kind: TauHitObjectKind::Slider(Slider {
				angle: 0.,
				path: PolarSliderPath::new(nodes, None)?,
				repeat_count: 0,
				node_samples: Vec::new(),
				tick_distance_multiplier: Self::tick_distance_multiplier(beatmap, note.start_time),
			}),
		})
	}
}

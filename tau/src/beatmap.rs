//! Generic notes read from beatmap storage, as the converter consumes them.

use thiserror::Error;

use crate::curve::SliderCurve;
use crate::file::beatmap::{
	BeatmapFile, GameMode, HitObject, HitObjectParams, HitSampleSet, HitSound, Timestamp, TimingPoint,
};
use crate::objects::EmptyPathError;
use crate::point::{Point, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::utils::remap;
use crate::{Timestamped, TimestampedSlice};

/// Base distance in osu! pixels a slider covers in one beat at a slider multiplier of `1`.
pub const BASE_SCORING_DISTANCE: f64 = 100.;

/// Bounds of the slider velocity an inherited timing point can set.
const SLIDER_VELOCITY_RANGE: (f64, f64) = (0.1, 10.);

#[derive(Clone, Debug, Error)]
pub enum NoteConversionError {
	#[error("No timing point is active at {time}ms")]
	NoTimingPoint { time: Timestamp },
	#[error("Invalid beat length {beat_length} for the timing point at {time}ms")]
	InvalidBeatLength { time: Timestamp, beat_length: f64 },
	#[error("Invalid meter {meter} for the timing point at {time}ms")]
	InvalidMeter { time: Timestamp, meter: i32 },
	#[error("Slider velocity at {time}ms is not positive ({velocity} px/ms)")]
	NonPositiveVelocity { time: Timestamp, velocity: f64 },
	#[error(transparent)]
	EmptyPath(#[from] EmptyPathError),
}

/// Hitsound flags and sample banks played by a note or a slider node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Samples {
	pub hit_sound: HitSound,
	pub sample_set: HitSampleSet,
}

impl Samples {
	#[must_use]
	pub const fn new(hit_sound: HitSound, sample_set: HitSampleSet) -> Self {
		Self { hit_sound, sample_set }
	}

	/// Whether the finish accent plays with these samples.
	#[must_use]
	pub const fn has_finish(&self) -> bool {
		self.hit_sound.has_finish()
	}
}

/// Positional information a note exposes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NotePosition {
	/// Full position on the playfield.
	Point(Point),
	/// Horizontal position only.
	X(f64),
	/// Vertical position only.
	Y(f64),
	/// Explicit angle in degrees.
	Angle(f64),
	None,
}

impl NotePosition {
	/// Angle in degrees at which a simple hit for this note lands.
	#[must_use]
	pub fn angle(&self) -> f64 {
		match *self {
			Self::Point(point) => point.playfield_angle(),
			Self::X(x) => remap(x, 0., PLAYFIELD_WIDTH, 0., 360.),
			Self::Y(y) => remap(y, 0., PLAYFIELD_HEIGHT, 0., 360.),
			Self::Angle(angle) => angle,
			Self::None => 0.,
		}
	}
}

/// A note following a planar curve, possibly going back and forth on it.
#[derive(Clone, Debug)]
pub struct PathNote {
	pub curve: SliderCurve,
	/// Amount of times the note goes back along its curve.
	pub repeat_count: u32,
	/// Samples played on every edge of the curve, from head to tail.
	pub node_samples: Vec<Samples>,
}

impl PathNote {
	#[must_use]
	pub const fn span_count(&self) -> u32 {
		self.repeat_count + 1
	}

	/// Position relative to the head at `progress` in `[0, 1]` of the whole note.
	///
	/// Odd spans travel the curve backwards.
	#[must_use]
	pub fn curve_position_at(&self, progress: f64) -> Point {
		let scaled = progress.clamp(0., 1.) * f64::from(self.span_count());
		let mut span_progress = scaled.rem_euclid(1.);

		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let span = scaled.floor() as u64;
		if span % 2 == 1 {
			span_progress = 1. - span_progress;
		}

		self.curve.position_at(span_progress)
	}
}

#[derive(Clone, Debug)]
pub enum NoteKind {
	Hit,
	Path(PathNote),
	Duration { duration: f64 },
}

/// A timed note from the source timeline.
#[derive(Clone, Debug)]
pub struct Note {
	pub start_time: Timestamp,
	pub samples: Samples,
	pub new_combo: bool,
	/// Amount of combo colours to skip.
	pub combo_offset: u8,
	pub position: NotePosition,
	pub kind: NoteKind,
}

impl Note {
	/// Samples that decide whether the note is accented.
	///
	/// Path notes use the samples of their head.
	#[must_use]
	pub fn accent_samples(&self) -> &Samples {
		match &self.kind {
			NoteKind::Path(path) => path.node_samples.first().unwrap_or(&self.samples),
			NoteKind::Hit | NoteKind::Duration { .. } => &self.samples,
		}
	}

	fn from_hit_object(hit_object: &HitObject, mode: GameMode) -> Self {
		let position = match mode {
			GameMode::Osu => NotePosition::Point(hit_object.position()),
			GameMode::Taiko => NotePosition::None,
			GameMode::Catch | GameMode::Mania => NotePosition::X(f64::from(hit_object.x)),
		};

		let kind = match &hit_object.params {
			HitObjectParams::HitCircle => NoteKind::Hit,
			HitObjectParams::Slider {
				first_curve_type,
				curve_points,
				slides,
				length,
				edge_hitsounds,
				edge_samplesets,
			} => {
				let curve = SliderCurve::new(
					hit_object.position(),
					*first_curve_type,
					curve_points,
					Some(*length),
				);

				let span_count = (*slides).max(1);
				let node_samples = (0..=span_count as usize)
					.map(|i| {
						Samples::new(
							edge_hitsounds.get(i).copied().unwrap_or(hit_object.hit_sound),
							edge_samplesets.get(i).copied().unwrap_or_default(),
						)
					})
					.collect();

				NoteKind::Path(PathNote {
					curve,
					repeat_count: span_count - 1,
					node_samples,
				})
			}
			HitObjectParams::Spinner { end_time } | HitObjectParams::Hold { end_time } => {
				NoteKind::Duration {
					duration: (end_time - hit_object.time).max(0.),
				}
			}
		};

		Self {
			start_time: hit_object.time,
			samples: Samples::new(hit_object.hit_sound, hit_object.sample_set),
			new_combo: hit_object.new_combo,
			combo_offset: hit_object.combo_color_skip,
			position,
			kind,
		}
	}
}

impl Timestamped for Note {
	fn timestamp(&self) -> Timestamp {
		self.start_time
	}
}

/// Beatmap-wide difficulty settings the converter reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
	pub approach_rate: f64,
	pub slider_multiplier: f64,
	pub slider_tick_rate: f64,
}

impl Default for Difficulty {
	fn default() -> Self {
		Self {
			approach_rate: 5.,
			slider_multiplier: 1.4,
			slider_tick_rate: 1.,
		}
	}
}

/// Timing table of a beatmap, sorted by time.
#[derive(Clone, Debug, Default)]
pub struct ControlPoints {
	timing_points: Vec<TimingPoint>,
}

impl ControlPoints {
	#[must_use]
	pub fn new(mut timing_points: Vec<TimingPoint>) -> Self {
		timing_points.sort_by(|a, b| a.time.total_cmp(&b.time));
		Self { timing_points }
	}

	#[must_use]
	pub fn timing_points(&self) -> &[TimingPoint] {
		&self.timing_points
	}

	/// Uninherited timing point active at `time`.
	///
	/// Notes placed before the first timing point use the first one.
	#[must_use]
	pub fn timing_point_at(&self, time: Timestamp) -> Option<&TimingPoint> {
		self.timing_points
			.between(..=time)
			.iter()
			.rev()
			.find(|tp| tp.uninherited)
			.or_else(|| self.timing_points.iter().find(|tp| tp.uninherited))
	}

	/// Slider velocity multiplier active at `time`.
	#[must_use]
	pub fn slider_velocity_at(&self, time: Timestamp) -> f64 {
		match self.timing_points.last_at(time) {
			Some(tp) if !tp.uninherited => {
				let (min, max) = SLIDER_VELOCITY_RANGE;
				(100. / -tp.beat_length).clamp(min, max)
			}
			_ => 1.,
		}
	}
}

/// Everything the converter needs from a beatmap.
#[derive(Clone, Debug, Default)]
pub struct Beatmap {
	pub format_version: u32,
	pub mode: GameMode,
	pub difficulty: Difficulty,
	pub control_points: ControlPoints,
	pub notes: Vec<Note>,
}

impl Beatmap {
	/// Reads the notes and context of a parsed `.osu` file.
	///
	/// Notes are sorted by start time.
	#[must_use]
	pub fn from_file(file: &BeatmapFile) -> Self {
		let mode = file.general.mode;

		let mut notes: Vec<Note> = file
			.hit_objects
			.iter()
			.map(|ho| Note::from_hit_object(ho, mode))
			.collect();
		// some old maps list their hit objects out of order
		notes.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));

		Self {
			format_version: file.osu_file_format,
			mode,
			difficulty: Difficulty {
				approach_rate: f64::from(file.difficulty.approach_rate()),
				slider_multiplier: file.difficulty.slider_multiplier,
				slider_tick_rate: file.difficulty.slider_tick_rate,
			},
			control_points: ControlPoints::new(file.timing_points.clone()),
			notes,
		}
	}

	/// Uninherited timing point active at `time`, with a usable beat length.
	///
	/// # Errors
	///
	/// This function will return an error if the beatmap has no uninherited timing point,
	/// if its beat length is not a positive number or if its meter is below 1.
	pub fn timing_point_at(&self, time: Timestamp) -> Result<&TimingPoint, NoteConversionError> {
		let timing_point = self
			.control_points
			.timing_point_at(time)
			.ok_or(NoteConversionError::NoTimingPoint { time })?;

		if !timing_point.beat_length.is_finite() || timing_point.beat_length <= 0. {
			return Err(NoteConversionError::InvalidBeatLength {
				time: timing_point.time,
				beat_length: timing_point.beat_length,
			});
		}

		if timing_point.meter < 1 {
			return Err(NoteConversionError::InvalidMeter {
				time: timing_point.time,
				meter: timing_point.meter,
			});
		}

		Ok(timing_point)
	}

	/// Duration in milliseconds of a path note starting at `start_time`, all spans included.
	///
	/// # Errors
	///
	/// This function will return an error if there is no usable timing point at `start_time`
	/// or if the slider velocity there is not positive.
	pub fn path_duration(&self, start_time: Timestamp, path: &PathNote) -> Result<f64, NoteConversionError> {
		let beat_length = self.timing_point_at(start_time)?.beat_length;
		let slider_velocity = self.control_points.slider_velocity_at(start_time);

		let velocity = BASE_SCORING_DISTANCE * self.difficulty.slider_multiplier * slider_velocity / beat_length;
		if !velocity.is_finite() || velocity <= 0. {
			return Err(NoteConversionError::NonPositiveVelocity {
				time: start_time,
				velocity,
			});
		}

		Ok(f64::from(path.span_count()) * path.curve.length() / velocity)
	}
}

#[cfg(test)]
mod tests {
	use super::{Beatmap, ControlPoints, NoteConversionError, NoteKind, NotePosition};
	use crate::file::beatmap::{BeatmapFile, GameMode, TimingPoint};
	use crate::is_close;
	use crate::point::Point;

	const SLIDER_MAP: &str = "osu file format v14

[General]
Mode: 0

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:8
ApproachRate:9
SliderMultiplier:1
SliderTickRate:1

[TimingPoints]
0,500,4,2,0,60,1,0
1000,-50,4,2,0,60,0,0

[HitObjects]
256,100,0,5,4,0:0:0:0:
100,192,500,2,0,L|200:192,2,100,4|0|2,1:0|0:0|2:0,0:0:0:0:
256,192,1500,2,0,L|356:192,1,100
256,192,3000,12,0,7000,0:0:0:0:
";

	fn slider_map() -> Beatmap {
		let file = BeatmapFile::from_reader("slider_map", SLIDER_MAP.as_bytes()).unwrap();
		Beatmap::from_file(&file)
	}

	fn timing_point(time: f64, beat_length: f64, uninherited: bool) -> TimingPoint {
		TimingPoint {
			time,
			beat_length,
			uninherited,
			..TimingPoint::default()
		}
	}

	#[test]
	fn notes_from_file() {
		let beatmap = slider_map();

		assert_eq!(beatmap.format_version, 14);
		assert!(is_close(beatmap.difficulty.approach_rate, 9., 1e-6));
		assert_eq!(beatmap.notes.len(), 4);

		let circle = &beatmap.notes[0];
		assert!(circle.new_combo);
		assert!(circle.samples.has_finish());
		assert_eq!(circle.position, NotePosition::Point(Point::new(256., 100.)));
		assert!(matches!(circle.kind, NoteKind::Hit));

		let NoteKind::Path(path) = &beatmap.notes[1].kind else {
			panic!("second note should be a path note");
		};
		assert_eq!(path.repeat_count, 1);
		assert_eq!(path.node_samples.len(), 3);
		assert!(path.node_samples[0].has_finish());
		assert!(beatmap.notes[1].accent_samples().has_finish());
		assert!(!beatmap.notes[1].samples.has_finish());

		let NoteKind::Duration { duration } = beatmap.notes[3].kind else {
			panic!("fourth note should be a duration note");
		};
		assert!(is_close(duration, 4000., 1e-9));
	}

	#[test]
	fn ping_pong_curve_positions() {
		let beatmap = slider_map();
		let NoteKind::Path(path) = &beatmap.notes[1].kind else {
			panic!("second note should be a path note");
		};

		assert_eq!(path.curve_position_at(0.), Point::new(0., 0.));
		assert_eq!(path.curve_position_at(0.25), Point::new(50., 0.));
		assert_eq!(path.curve_position_at(0.5), Point::new(100., 0.));
		assert_eq!(path.curve_position_at(0.75), Point::new(50., 0.));
		assert_eq!(path.curve_position_at(1.), Point::new(0., 0.));
	}

	#[test]
	fn path_durations() {
		let beatmap = slider_map();

		// 2 spans of 100px at 100px per beat
		let NoteKind::Path(path) = &beatmap.notes[1].kind else {
			panic!("second note should be a path note");
		};
		let duration = beatmap.path_duration(beatmap.notes[1].start_time, path).unwrap();
		assert!(is_close(duration, 1000., 1e-6));

		// twice as fast after the inherited timing point
		let NoteKind::Path(path) = &beatmap.notes[2].kind else {
			panic!("third note should be a path note");
		};
		let duration = beatmap.path_duration(beatmap.notes[2].start_time, path).unwrap();
		assert!(is_close(duration, 250., 1e-6));
	}

	#[test]
	fn control_point_lookups() {
		let control_points = ControlPoints::new(vec![
			timing_point(1000., -200., false),
			timing_point(0., 500., true),
			timing_point(2000., 400., true),
			timing_point(3000., -10., false),
		]);

		assert!(is_close(control_points.timing_point_at(-100.).unwrap().beat_length, 500., 1e-9));
		assert!(is_close(control_points.timing_point_at(1500.).unwrap().beat_length, 500., 1e-9));
		assert!(is_close(control_points.timing_point_at(2500.).unwrap().beat_length, 400., 1e-9));

		assert!(is_close(control_points.slider_velocity_at(500.), 1., 1e-9));
		assert!(is_close(control_points.slider_velocity_at(1500.), 0.5, 1e-9));
		assert!(is_close(control_points.slider_velocity_at(2500.), 1., 1e-9));
		assert!(is_close(control_points.slider_velocity_at(3500.), 10., 1e-9));
	}

	#[test]
	fn missing_timing_point_is_malformed() {
		let beatmap = Beatmap {
			control_points: ControlPoints::new(vec![timing_point(0., -100., false)]),
			..Beatmap::default()
		};

		assert!(matches!(
			beatmap.timing_point_at(100.),
			Err(NoteConversionError::NoTimingPoint { .. })
		));

		let beatmap = Beatmap {
			control_points: ControlPoints::new(vec![timing_point(0., 0., true)]),
			..Beatmap::default()
		};

		assert!(matches!(
			beatmap.timing_point_at(100.),
			Err(NoteConversionError::InvalidBeatLength { .. })
		));

		let beatmap = Beatmap {
			control_points: ControlPoints::new(vec![TimingPoint {
				meter: 0,
				..timing_point(0., 500., true)
			}]),
			..Beatmap::default()
		};

		assert!(matches!(
			beatmap.timing_point_at(100.),
			Err(NoteConversionError::InvalidMeter { meter: 0, .. })
		));
	}

	#[test]
	fn notes_are_sorted_by_time() {
		let content = "osu file format v14

[TimingPoints]
0,500,4,2,0,60,1,0

[HitObjects]
400,192,500,1,0,0:0:0:0:
100,192,9000,1,0,0:0:0:0:
256,192,1000,12,0,5000,0:0:0:0:
300,192,1000,1,0,0:0:0:0:
";
		let file = BeatmapFile::from_reader("unsorted", content.as_bytes()).unwrap();
		let beatmap = Beatmap::from_file(&file);

		let times: Vec<_> = beatmap.notes.iter().map(|n| n.start_time).collect();
		assert_eq!(times, vec![500., 1000., 1000., 9000.]);

		// equal times keep their file order
		assert!(matches!(beatmap.notes[1].kind, NoteKind::Duration { .. }));
		assert!(matches!(beatmap.notes[2].kind, NoteKind::Hit));
	}

	#[test]
	fn positions_follow_game_mode() {
		assert!(is_close(NotePosition::X(256.).angle(), 180., 1e-9));
		assert!(is_close(NotePosition::Y(96.).angle(), 90., 1e-9));
		assert!(is_close(NotePosition::Angle(42.).angle(), 42., 1e-9));
		assert!(is_close(NotePosition::None.angle(), 0., 1e-9));
		assert!(is_close(NotePosition::Point(Point::new(512., 192.)).angle(), 90., 1e-9));

		let mut file = BeatmapFile::from_reader("slider_map", SLIDER_MAP.as_bytes()).unwrap();
		file.general.mode = GameMode::Mania;
		let beatmap = Beatmap::from_file(&file);
		assert_eq!(beatmap.notes[0].position, NotePosition::X(256.));
	}
}

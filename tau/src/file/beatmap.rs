use std::io::BufRead;
use std::num::ParseIntError;
use std::ops::BitOr;
use std::path::Path;
use std::str::FromStr;

pub mod errors;
pub mod parsing;

use crate::point::Point;
use crate::Timestamped;
pub use errors::*;
use parsing::{parse_osu_file, parse_osu_reader, BeatmapFileParseError};

pub type Timestamp = f64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameMode {
	#[default]
	Osu,
	Taiko,
	Catch,
	Mania,
}

impl FromStr for GameMode {
	type Err = InvalidGameModeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"0" => Ok(Self::Osu),
			"1" => Ok(Self::Taiko),
			"2" => Ok(Self::Catch),
			"3" => Ok(Self::Mania),
			s => Err(InvalidGameModeError::from(s)),
		}
	}
}

/// `[General]` section, reduced to the game mode.
#[derive(Clone, Debug, Default)]
pub struct GeneralSection {
	pub mode: GameMode,
}

/// `[Difficulty]` section.
#[derive(Clone, Debug)]
pub struct DifficultySection {
	pub overall_difficulty: f32,
	/// Missing from old beatmaps, which use the overall difficulty instead.
	pub approach_rate: Option<f32>,
	/// Hundreds of osu! pixels a slider travels per beat.
	pub slider_multiplier: f64,
	/// Slider ticks per beat.
	pub slider_tick_rate: f64,
}

impl DifficultySection {
	#[must_use]
	pub fn approach_rate(&self) -> f32 {
		self.approach_rate.unwrap_or(self.overall_difficulty)
	}
}

impl Default for DifficultySection {
	fn default() -> Self {
		Self {
			overall_difficulty: 5.,
			approach_rate: None,
			slider_multiplier: 1.4,
			slider_tick_rate: 1.,
		}
	}
}

/// A line of the `[TimingPoints]` section.
///
/// Uninherited points start a new beat length. Inherited points only change the slider velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingPoint {
	pub time: Timestamp,
	/// Beat duration in milliseconds for uninherited points.
	/// For inherited points, `-100` divided by the slider velocity multiplier.
	pub beat_length: f64,
	/// Beats per measure.
	pub meter: i32,
	pub sample_set: SampleBank,
	pub sample_index: u32,
	pub volume: u8,
	pub uninherited: bool,
	/// Kiai and omitted barline flags.
	pub effects: u32,
}

impl Default for TimingPoint {
	fn default() -> Self {
		Self {
			time: 0.,
			beat_length: 0.,
			meter: 4,
			sample_set: SampleBank::Auto,
			sample_index: 0,
			volume: 100,
			uninherited: true,
			effects: 0,
		}
	}
}

impl Timestamped for TimingPoint {
	fn timestamp(&self) -> Timestamp {
		self.time
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SampleBank {
	/// Whatever the timing point says.
	#[default]
	Auto,
	Normal,
	Soft,
	Drum,
}

impl FromStr for SampleBank {
	type Err = InvalidSampleBankError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"0" => Ok(Self::Auto),
			"1" => Ok(Self::Normal),
			"2" => Ok(Self::Soft),
			"3" => Ok(Self::Drum),
			s => Err(InvalidSampleBankError::from(s)),
		}
	}
}

/// Sample banks of a hit, written `normal:addition`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitSampleSet {
	pub normal_set: SampleBank,
	/// Bank of the whistle, finish and clap sounds.
	pub addition_set: SampleBank,
}

impl FromStr for HitSampleSet {
	type Err = InvalidHitSampleSetError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (normal_set, addition_set) = s.split_once(':').ok_or_else(|| InvalidHitSampleSetError::from(s))?;

		let bank = |value: &str, which: &str| {
			value.parse().map_err(|e: InvalidSampleBankError| InvalidHitSampleSetError {
				hss_string: s.to_owned(),
				context: format!("{which}: {e}"),
			})
		};

		Ok(Self {
			normal_set: bank(normal_set, "normal set")?,
			addition_set: bank(addition_set, "addition set")?,
		})
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SliderCurveType {
	/// Same curve as the previous point.
	Inherit,
	Bezier,
	/// Centripetal catmull-rom
	Catmull,
	Linear,
	/// Arc of the circle going through 3 points.
	PerfectCurve,
}

impl SliderCurveType {
	/// Curve type written as a single letter in a slider's curve.
	#[must_use]
	pub fn from_letter(letter: &str) -> Option<Self> {
		match letter {
			"B" => Some(Self::Bezier),
			"C" => Some(Self::Catmull),
			"L" => Some(Self::Linear),
			"P" => Some(Self::PerfectCurve),
			_ => None,
		}
	}
}

/// Anchor of a slider's curve, in osu! pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliderPoint {
	/// Curve type of the segment starting at this anchor.
	pub curve_type: SliderCurveType,
	pub x: i32,
	pub y: i32,
}

impl SliderPoint {
	#[must_use]
	pub const fn new(curve_type: SliderCurveType, x: i32, y: i32) -> Self {
		Self { curve_type, x, y }
	}

	#[must_use]
	pub fn to_point(&self) -> Point {
		Point::new(f64::from(self.x), f64::from(self.y))
	}
}

#[derive(Clone, Debug)]
pub enum HitObjectParams {
	HitCircle,
	Slider {
		first_curve_type: SliderCurveType,
		/// Anchors after the slider's head.
		curve_points: Vec<SliderPoint>,
		/// Spans of the slider, one more than its repeats.
		slides: u32,
		/// Pixel length of the slider's curve.
		length: f64,
		/// One hitsound per edge, head first.
		edge_hitsounds: Vec<HitSound>,
		/// One sample set per edge, head first.
		edge_samplesets: Vec<HitSampleSet>,
	},
	Spinner {
		end_time: Timestamp,
	},
	/// osu!mania hold note
	Hold {
		end_time: Timestamp,
	},
}

/// Hitsound flags of a hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct HitSound(u8);

impl FromStr for HitSound {
	type Err = ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(s.parse()?))
	}
}

impl HitSound {
	pub const NONE: Self = Self(0b0000);
	pub const NORMAL: Self = Self(0b0001);
	pub const WHISTLE: Self = Self(0b0010);
	pub const FINISH: Self = Self(0b0100);
	pub const CLAP: Self = Self(0b1000);

	/// Whether every flag of `flags` is set. [`HitSound::NONE`] is never contained.
	#[must_use]
	pub const fn contains(self, flags: Self) -> bool {
		flags.0 != 0 && self.0 & flags.0 == flags.0
	}

	#[must_use]
	pub const fn has_finish(self) -> bool {
		self.contains(Self::FINISH)
	}
}

impl BitOr for HitSound {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self::Output {
		Self(self.0 | rhs.0)
	}
}

/// A line of the `[HitObjects]` section.
#[derive(Clone, Debug)]
pub struct HitObject {
	pub x: i32,
	pub y: i32,
	pub time: Timestamp,
	pub new_combo: bool,
	/// Combo colours skipped when starting a new combo.
	pub combo_color_skip: u8,
	pub hit_sound: HitSound,
	pub params: HitObjectParams,
	pub sample_set: HitSampleSet,
}

impl HitObject {
	#[must_use]
	pub fn position(&self) -> Point {
		Point::new(f64::from(self.x), f64::from(self.y))
	}
}

/// The parts of a `.osu` file that conversion reads.
#[derive(Clone, Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct BeatmapFile {
	/// Version from the `osu file format vN` header.
	pub osu_file_format: u32,
	pub general: GeneralSection,
	pub difficulty: DifficultySection,
	/// Sorted by time.
	pub timing_points: Vec<TimingPoint>,
	pub hit_objects: Vec<HitObject>,
}

impl BeatmapFile {
	/// Parses a `.osu` file.
	///
	/// # Errors
	///
	/// This function will return an error if the file can't be read or isn't a valid beatmap.
	pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, BeatmapFileParseError> {
		parse_osu_file(path)
	}

	/// Parses `.osu` content from a reader. `name` only shows up in errors.
	///
	/// # Errors
	///
	/// This function will return an error if the content isn't a valid beatmap.
	pub fn from_reader<R: BufRead>(name: &str, reader: R) -> Result<Self, BeatmapFileParseError> {
		parse_osu_reader(name, reader)
	}
}

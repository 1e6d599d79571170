use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::marker::PhantomData;
use std::num::{ParseFloatError, ParseIntError};
use std::path::Path;
use std::str::FromStr;

use super::{
	BeatmapFile, DifficultySection, GeneralSection, HitObject, HitObjectParams, HitSampleSet, HitSound,
	InvalidGameModeError, InvalidSampleBankError, SliderCurveType, SliderPoint, TimingPoint,
};

#[derive(Debug, thiserror::Error)]
#[error("Could not split line with {split_char:?}")]
pub struct InvalidKeyValuePairError {
	pub split_char: char,
}

/// Parse a `field:value` pair (arbitrary spaces allowed).
pub(crate) fn parse_field_value_pair(line: &str) -> Result<(&str, &str), InvalidKeyValuePairError> {
	let (field, value) = line.split_once(':').ok_or(InvalidKeyValuePairError { split_char: ':' })?;
	Ok((field.trim(), value.trim()))
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid list of {type_name}")]
pub struct InvalidListError<T> {
	type_name: &'static str,
	_phantom_data: PhantomData<T>,
}

impl<T> Default for InvalidListError<T> {
	fn default() -> Self {
		Self {
			type_name: std::any::type_name::<T>(),
			_phantom_data: PhantomData,
		}
	}
}

/// Parse a list of values separated by `sep`, skipping empty items.
pub(crate) fn parse_list_of_with_sep<T: FromStr>(line: &str, sep: char) -> Result<Vec<T>, InvalidListError<T>> {
	line.split(sep)
		.filter(|value| !value.is_empty())
		.map(|value| value.parse().map_err(|_| InvalidListError::default()))
		.collect()
}

const SECTION_GENERAL: &str = "[General]";
const SECTION_DIFFICULTY: &str = "[Difficulty]";
const SECTION_TIMING_POINTS: &str = "[TimingPoints]";
const SECTION_HIT_OBJECTS: &str = "[HitObjects]";

/// Sections that exist in the format but carry nothing the converter reads.
const IGNORED_SECTIONS: &[&str] = &["[Editor]", "[Metadata]", "[Events]", "[Colours]"];

#[derive(Debug, thiserror::Error)]
#[error("Couldn't parse section {section} at line {line:?}")]
pub struct SectionParseError {
	pub section: &'static str,
	pub line: String,
	#[source]
	pub kind: SectionParseErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum SectionParseErrorKind {
	#[error(transparent)]
	Io(#[from] io::Error),

	#[error("Invalid key-value pair")]
	InvalidKeyValuePair(
		#[from]
		#[source]
		InvalidKeyValuePairError,
	),

	#[error(transparent)]
	FieldValueParse(#[from] FieldValueParseError),

	#[error("Could not parse timing point")]
	TimingPointParse(
		#[from]
		#[source]
		TimingPointParseError,
	),

	#[error("Could not parse hit object")]
	HitObjectParse(
		#[from]
		#[source]
		HitObjectParseError,
	),
}

#[derive(Debug, thiserror::Error)]
#[error("Couldn't parse value of field {field:?}")]
pub struct FieldValueParseError {
	pub field: &'static str,
	#[source]
	pub kind: FieldValueParseErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum FieldValueParseErrorKind {
	#[error("Invalid float")]
	InvalidFloat(
		#[from]
		#[source]
		ParseFloatError,
	),

	#[error("Invalid game mode")]
	InvalidGameMode(
		#[from]
		#[source]
		InvalidGameModeError,
	),
}

fn field_err<T: Into<FieldValueParseErrorKind>>(field: &'static str) -> impl FnOnce(T) -> FieldValueParseError {
	move |kind| FieldValueParseError {
		field,
		kind: kind.into(),
	}
}

fn is_section_header(line: &str) -> bool {
	line.starts_with('[') && line.ends_with(']')
}

/// Feed every line of the current section to `parse_line`.
///
/// Reading stops at the next section header, which is stored in `next_header`.
/// `next_header` is `None` once the file has been read entirely.
fn read_section<I, E>(
	lines: &mut I,
	next_header: &mut Option<String>,
	section: &'static str,
	mut parse_line: impl FnMut(&str) -> Result<(), E>,
) -> Result<(), SectionParseError>
where
	I: Iterator<Item = io::Result<String>>,
	E: Into<SectionParseErrorKind>,
{
	*next_header = None;

	for line in lines {
		let line = line.map_err(|err| SectionParseError {
			section,
			line: "(corrupted line)".to_owned(),
			kind: err.into(),
		})?;

		if is_section_header(&line) {
			*next_header = Some(line);
			break;
		}

		if let Err(err) = parse_line(&line) {
			return Err(SectionParseError {
				section,
				line,
				kind: err.into(),
			});
		}
	}

	Ok(())
}

fn parse_general_section<I>(lines: &mut I, next_header: &mut Option<String>) -> Result<GeneralSection, SectionParseError>
where
	I: Iterator<Item = io::Result<String>>,
{
	let mut general = GeneralSection::default();

	read_section(lines, next_header, SECTION_GENERAL, |line| {
		match parse_field_value_pair(line)? {
			("Mode", value) => general.mode = value.parse().map_err(field_err("Mode"))?,
			(field, _) => tracing::trace!("[General] section: skipping field {field:?}"),
		}

		Ok::<_, SectionParseErrorKind>(())
	})?;

	Ok(general)
}

fn parse_difficulty_section<I>(
	lines: &mut I,
	next_header: &mut Option<String>,
) -> Result<DifficultySection, SectionParseError>
where
	I: Iterator<Item = io::Result<String>>,
{
	let mut difficulty = DifficultySection::default();

	read_section(lines, next_header, SECTION_DIFFICULTY, |line| {
		match parse_field_value_pair(line)? {
			("OverallDifficulty", value) => {
				difficulty.overall_difficulty = value.parse().map_err(field_err("OverallDifficulty"))?;
			}
			("ApproachRate", value) => {
				difficulty.approach_rate = Some(value.parse().map_err(field_err("ApproachRate"))?);
			}
			("SliderMultiplier", value) => {
				difficulty.slider_multiplier = value.parse().map_err(field_err("SliderMultiplier"))?;
			}
			("SliderTickRate", value) => {
				difficulty.slider_tick_rate = value.parse().map_err(field_err("SliderTickRate"))?;
			}
			(field @ ("HPDrainRate" | "CircleSize"), _) => {
				tracing::trace!("[Difficulty] section: skipping field {field:?}");
			}
			(field, _) => tracing::warn!("[Difficulty] section: unknown field {field:?}"),
		}

		Ok::<_, SectionParseErrorKind>(())
	})?;

	Ok(difficulty)
}

#[derive(Debug, thiserror::Error)]
pub enum TimingPointParseError {
	#[error("Expected at least 2 values, got {0}")]
	TooFewValues(usize),

	#[error("Expected at most 8 values, got {0}")]
	TooManyValues(usize),

	#[error("Invalid float")]
	InvalidFloat(
		#[from]
		#[source]
		ParseFloatError,
	),

	#[error("Invalid int")]
	InvalidInt(
		#[from]
		#[source]
		ParseIntError,
	),

	#[error(transparent)]
	InvalidSampleBank(#[from] InvalidSampleBankError),
}

/// Parse a `time,beatLength,meter,sampleSet,sampleIndex,volume,uninherited,effects` line.
///
/// Only the first two values are required.
fn parse_timing_point(line: &str) -> Result<TimingPoint, TimingPointParseError> {
	let values: Vec<&str> = line.split(',').map(str::trim).collect();

	let [time, beat_length, optional @ ..] = values.as_slice() else {
		return Err(TimingPointParseError::TooFewValues(values.len()));
	};
	if optional.len() > 6 {
		return Err(TimingPointParseError::TooManyValues(values.len()));
	}

	let mut timing_point = TimingPoint {
		time: time.parse()?,
		beat_length: beat_length.parse()?,
		..TimingPoint::default()
	};

	for (i, value) in optional.iter().enumerate().filter(|(_, v)| !v.is_empty()) {
		match i {
			0 => timing_point.meter = value.parse()?,
			1 => timing_point.sample_set = value.parse()?,
			2 => timing_point.sample_index = value.parse()?,
			3 => timing_point.volume = value.parse()?,
			4 => timing_point.uninherited = value.parse::<u8>()? != 0,
			_ => timing_point.effects = value.parse()?,
		}
	}

	Ok(timing_point)
}

fn parse_timing_points_section<I>(
	lines: &mut I,
	next_header: &mut Option<String>,
) -> Result<Vec<TimingPoint>, SectionParseError>
where
	I: Iterator<Item = io::Result<String>>,
{
	let mut timing_points = Vec::new();

	read_section(lines, next_header, SECTION_TIMING_POINTS, |line| {
		parse_timing_point(line).map(|timing_point| timing_points.push(timing_point))
	})?;

	// Lookups binary-search this list, so it has to stay sorted.
	timing_points.sort_by(|a: &TimingPoint, b| a.time.total_cmp(&b.time));

	Ok(timing_points)
}

#[derive(Debug, thiserror::Error)]
pub enum HitSampleParseError {
	#[error("Expected at least 2 colon-separated values, got {0}")]
	NotEnoughValues(usize),

	#[error(transparent)]
	InvalidSampleBank(#[from] InvalidSampleBankError),

	#[error("Invalid int")]
	InvalidInt(
		#[from]
		#[source]
		ParseIntError,
	),
}

/// Parse a `normalSet:additionSet:index:volume:filename` hit sample, keeping the sample banks.
fn parse_hit_sample(hit_sample: &str) -> Result<HitSampleSet, HitSampleParseError> {
	let values: Vec<&str> = hit_sample.split(':').collect();

	let [normal_set, addition_set, rest @ ..] = values.as_slice() else {
		return Err(HitSampleParseError::NotEnoughValues(values.len()));
	};

	// index and volume
	for value in rest.iter().take(2).filter(|v| !v.is_empty()) {
		value.parse::<u32>()?;
	}

	Ok(HitSampleSet {
		normal_set: normal_set.parse()?,
		addition_set: addition_set.parse()?,
	})
}

#[derive(Debug, thiserror::Error)]
pub enum CurvePointsParseError {
	#[error("Unknown curve type: {0:?}")]
	UnknownCurveType(String),

	#[error("Invalid slider point: {0:?}")]
	InvalidSliderPoint(String),
}

/// Parse the `type|x:y|x:y...` curve of a slider.
///
/// A curve letter in the middle of the curve applies to the next anchor.
fn parse_curve_points(curve: &str) -> Result<(SliderCurveType, Vec<SliderPoint>), CurvePointsParseError> {
	let mut tokens = curve.split('|');

	let first_token = tokens.next().unwrap_or_default();
	let first_curve_type = SliderCurveType::from_letter(first_token)
		.ok_or_else(|| CurvePointsParseError::UnknownCurveType(first_token.to_owned()))?;

	let mut curve_points = Vec::new();
	let mut next_curve_type = SliderCurveType::Inherit;

	for token in tokens {
		if let Some(curve_type) = SliderCurveType::from_letter(token) {
			next_curve_type = curve_type;
			continue;
		}

		let invalid_point = || CurvePointsParseError::InvalidSliderPoint(token.to_owned());
		let (x, y) = token.split_once(':').ok_or_else(invalid_point)?;
		let x = x.parse().map_err(|_| invalid_point())?;
		let y = y.parse().map_err(|_| invalid_point())?;

		curve_points.push(SliderPoint::new(next_curve_type, x, y));
		next_curve_type = SliderCurveType::Inherit;
	}

	Ok((first_curve_type, curve_points))
}

#[derive(Debug, thiserror::Error)]
pub enum HitObjectParseError {
	#[error("Unknown hit object type {0:#010b}")]
	UnknownHitObjectType(u8),

	#[error("Expected at least 5 comma-separated values, got {0}")]
	NotEnoughArguments(usize),

	#[error("Expected at least 3 slider parameters, got {0}")]
	WrongSliderParameterCount(usize),

	#[error("Spinner has no end time")]
	MissingSpinnerEndTime,

	#[error("Expected 1 hold parameter, got {0}")]
	WrongHoldParameterCount(usize),

	#[error("Invalid hitsound list")]
	InvalidHitSoundList(
		#[from]
		#[source]
		InvalidListError<HitSound>,
	),

	#[error("Invalid hitsample set list")]
	InvalidHitSampleSetList(
		#[from]
		#[source]
		InvalidListError<HitSampleSet>,
	),

	#[error("Couldn't parse curve points")]
	CurvePointsParse(
		#[from]
		#[source]
		CurvePointsParseError,
	),

	#[error("Couldn't parse hitsample")]
	HitSampleParse(
		#[from]
		#[source]
		HitSampleParseError,
	),

	#[error("Hold parameters are not `endTime:hitSample`")]
	InvalidHold,

	#[error("Invalid float")]
	InvalidFloat(
		#[from]
		#[source]
		ParseFloatError,
	),

	#[error("Invalid int")]
	InvalidInt(
		#[from]
		#[source]
		ParseIntError,
	),
}

const TYPE_HIT_CIRCLE: u8 = 1 << 0;
const TYPE_SLIDER: u8 = 1 << 1;
const TYPE_NEW_COMBO: u8 = 1 << 2;
const TYPE_SPINNER: u8 = 1 << 3;
const TYPE_COMBO_COLOR_SKIP: u8 = 0b0111_0000;
const TYPE_HOLD: u8 = 1 << 7;

/// Object parameters and the trailing hit sample, if any.
type ParsedParams<'a> = (HitObjectParams, Option<&'a str>);

/// Parse a `x,y,time,type,hitSound,objectParams,hitSample` line.
///
/// # Errors
///
/// This function will return an error if a value is missing or malformed.
pub fn parse_hit_object(line: &str) -> Result<HitObject, HitObjectParseError> {
	let values: Vec<&str> = line.split(',').collect();

	let [x, y, time, object_type, hit_sound, params @ ..] = values.as_slice() else {
		return Err(HitObjectParseError::NotEnoughArguments(values.len()));
	};

	let object_type: u8 = object_type.parse()?;
	let hit_sound: HitSound = hit_sound.parse()?;

	let (params, hit_sample) = if object_type & TYPE_HIT_CIRCLE != 0 {
		(HitObjectParams::HitCircle, params.first().copied())
	} else if object_type & TYPE_SLIDER != 0 {
		parse_slider_params(params, hit_sound)?
	} else if object_type & TYPE_SPINNER != 0 {
		parse_spinner_params(params)?
	} else if object_type & TYPE_HOLD != 0 {
		parse_hold_params(params)?
	} else {
		return Err(HitObjectParseError::UnknownHitObjectType(object_type));
	};

	let sample_set = match hit_sample {
		Some(hit_sample) if !hit_sample.is_empty() => parse_hit_sample(hit_sample)?,
		_ => HitSampleSet::default(),
	};

	// Some old maps store positions as floats.
	#[allow(clippy::cast_possible_truncation)]
	let (x, y) = (x.parse::<f64>()? as i32, y.parse::<f64>()? as i32);

	Ok(HitObject {
		x,
		y,
		time: time.parse()?,
		new_combo: object_type & TYPE_NEW_COMBO != 0,
		combo_color_skip: (object_type & TYPE_COMBO_COLOR_SKIP) >> 4,
		hit_sound,
		params,
		sample_set,
	})
}

/// `curve,slides,length[,edgeSounds[,edgeSets[,hitSample]]]`
fn parse_slider_params<'a>(params: &[&'a str], hit_sound: HitSound) -> Result<ParsedParams<'a>, HitObjectParseError> {
	let [curve, slides, length, edges @ ..] = params else {
		return Err(HitObjectParseError::WrongSliderParameterCount(params.len()));
	};

	let (first_curve_type, curve_points) = parse_curve_points(curve)?;
	let slides: u32 = slides.parse()?;
	let edge_count = slides as usize + 1;

	let mut edge_hitsounds: Vec<HitSound> = match edges.first() {
		Some(list) => parse_list_of_with_sep(list, '|')?,
		None => Vec::new(),
	};
	if edge_hitsounds.is_empty() {
		edge_hitsounds = vec![hit_sound; edge_count];
	}

	let mut edge_samplesets: Vec<HitSampleSet> = match edges.get(1) {
		Some(list) => parse_list_of_with_sep(list, '|')?,
		None => Vec::new(),
	};
	if edge_samplesets.is_empty() {
		edge_samplesets = vec![HitSampleSet::default(); edge_count];
	}

	let slider = HitObjectParams::Slider {
		first_curve_type,
		curve_points,
		slides,
		length: length.parse()?,
		edge_hitsounds,
		edge_samplesets,
	};

	Ok((slider, edges.get(2).copied()))
}

/// `endTime[,hitSample]`
fn parse_spinner_params<'a>(params: &[&'a str]) -> Result<ParsedParams<'a>, HitObjectParseError> {
	let [end_time, rest @ ..] = params else {
		return Err(HitObjectParseError::MissingSpinnerEndTime);
	};

	let spinner = HitObjectParams::Spinner {
		end_time: end_time.parse()?,
	};

	Ok((spinner, rest.first().copied()))
}

/// `endTime:hitSample`
fn parse_hold_params<'a>(params: &[&'a str]) -> Result<ParsedParams<'a>, HitObjectParseError> {
	let [params] = params else {
		return Err(HitObjectParseError::WrongHoldParameterCount(params.len()));
	};

	let (end_time, hit_sample) = params.split_once(':').ok_or(HitObjectParseError::InvalidHold)?;
	let hold = HitObjectParams::Hold {
		end_time: end_time.parse()?,
	};

	Ok((hold, Some(hit_sample)))
}

fn parse_hit_objects_section<I>(
	lines: &mut I,
	next_header: &mut Option<String>,
) -> Result<Vec<HitObject>, SectionParseError>
where
	I: Iterator<Item = io::Result<String>>,
{
	let mut hit_objects = Vec::new();

	read_section(lines, next_header, SECTION_HIT_OBJECTS, |line| {
		parse_hit_object(line).map(|hit_object| hit_objects.push(hit_object))
	})?;

	Ok(hit_objects)
}

#[derive(Debug, thiserror::Error)]
#[error("Could not parse osu! beatmap file {filename:?}")]
pub struct BeatmapFileParseError {
	pub filename: String,
	#[source]
	pub kind: BeatmapFileParseErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum BeatmapFileParseErrorKind {
	#[error("File is empty")]
	FileIsEmpty,

	#[error("The path has no file name")]
	InvalidFileName,

	#[error("First line doesn't match \"osu file format v<version>\"")]
	InvalidOsuFileFormat,

	#[error(transparent)]
	SectionParse(#[from] SectionParseError),

	#[error(transparent)]
	Io(#[from] io::Error),
}

fn beatmap_err<T: Into<BeatmapFileParseErrorKind>>(filename: &str) -> impl FnOnce(T) -> BeatmapFileParseError {
	let filename = filename.to_owned();

	move |kind| BeatmapFileParseError {
		filename,
		kind: kind.into(),
	}
}

/// Parses an osu! beatmap file.
///
/// # Errors
///
/// This function will return an error if the file doesn't exist or could not be parsed correctly.
pub fn parse_osu_file<P>(path: P) -> Result<BeatmapFile, BeatmapFileParseError>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let filename = path.file_name().ok_or_else(|| BeatmapFileParseError {
		filename: path.display().to_string(),
		kind: BeatmapFileParseErrorKind::InvalidFileName,
	})?;
	let filename = filename.to_string_lossy();

	let file = File::open(path).map_err(beatmap_err(&filename))?;
	parse_osu_reader(&filename, BufReader::new(file))
}

/// Parses `osu file format vN` into `N`.
fn parse_format_version(header: &str) -> Option<u32> {
	// v128 files can start with a byte order mark
	header
		.trim_start_matches('\u{feff}')
		.strip_prefix("osu file format v")?
		.trim()
		.parse()
		.ok()
}

/// Parses an osu! beatmap from a buffered reader.
///
/// # Errors
///
/// This function will return an error if the content could not be parsed correctly.
pub fn parse_osu_reader<R: BufRead>(filename: &str, reader: R) -> Result<BeatmapFile, BeatmapFileParseError> {
	let mut lines = reader
		.lines()
		.map(|line| line.map(|line| line.trim().to_owned()))
		.filter(|line| line.as_ref().map_or(true, |l| !l.is_empty() && !l.starts_with("//")));

	let header = lines
		.next()
		.ok_or_else(|| beatmap_err(filename)(BeatmapFileParseErrorKind::FileIsEmpty))?
		.map_err(beatmap_err(filename))?;

	let mut beatmap = BeatmapFile {
		osu_file_format: parse_format_version(&header)
			.ok_or_else(|| beatmap_err(filename)(BeatmapFileParseErrorKind::InvalidOsuFileFormat))?,
		..BeatmapFile::default()
	};

	let mut next_header = lines.next().transpose().map_err(beatmap_err(filename))?;

	while let Some(header) = next_header.take() {
		let lines = &mut lines;
		let next_header = &mut next_header;

		match header.as_str() {
			SECTION_GENERAL => {
				beatmap.general = parse_general_section(lines, next_header).map_err(beatmap_err(filename))?;
			}
			SECTION_DIFFICULTY => {
				beatmap.difficulty = parse_difficulty_section(lines, next_header).map_err(beatmap_err(filename))?;
			}
			SECTION_TIMING_POINTS => {
				beatmap.timing_points = parse_timing_points_section(lines, next_header).map_err(beatmap_err(filename))?;
			}
			SECTION_HIT_OBJECTS => {
				beatmap.hit_objects = parse_hit_objects_section(lines, next_header).map_err(beatmap_err(filename))?;
			}
			section => {
				let ignored = IGNORED_SECTIONS.iter().copied().find(|&s| s == section);
				match ignored {
					Some(ignored) => tracing::debug!("Skipping {ignored} section"),
					None => tracing::warn!("Skipping unknown section {section:?}"),
				}

				read_section(lines, next_header, ignored.unwrap_or("(unknown)"), |_| Ok::<_, SectionParseErrorKind>(()))
					.map_err(beatmap_err(filename))?;
			}
		}
	}

	Ok(beatmap)
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::{
		parse_curve_points, parse_hit_object, parse_osu_reader, parse_timing_point, BeatmapFileParseErrorKind,
		HitObjectParseError,
	};
	use crate::file::beatmap::{GameMode, HitObjectParams, SampleBank, SliderCurveType, SliderPoint};

	const SMALL_MAP: &str = "\u{feff}osu file format v14

[General]
AudioFilename: audio.mp3
Mode: 0

[Metadata]
Title:Something
// comment inside a skipped section

[Difficulty]
HPDrainRate:6
CircleSize:4
OverallDifficulty:8
SliderMultiplier:1.8
SliderTickRate:2

[TimingPoints]
1500,-50,4,2,0,80,0,0
1000,500,4,2,0,80,1,0

[HitObjects]
256,192,1000,5,4,0:0:0:0:
100,100,1500,2,0,B|200:100|300:150,2,250,2|0|4,1:2|0:0|0:0,0:0:0:0:
256,192,3000,12,0,5000,0:0:0:0:
";

	#[test]
	fn curve_points() {
		let curve_points = "B|B|465:225|B|473:217|457:121";
		let (curve_type, control_points) = parse_curve_points(curve_points).unwrap();

		assert_eq!(curve_type, SliderCurveType::Bezier);
		assert_eq!(control_points.as_slice(), &[
			SliderPoint::new(SliderCurveType::Bezier, 465, 225),
			SliderPoint::new(SliderCurveType::Bezier, 473, 217),
			SliderPoint::new(SliderCurveType::Inherit, 457, 121),
		]);

		assert!(parse_curve_points("X|1:2").is_err());
		assert!(parse_curve_points("L|1;2").is_err());
	}

	#[test]
	fn timing_point_defaults() {
		let timing_point = parse_timing_point("250, 333.33").unwrap();

		assert!((timing_point.beat_length - 333.33).abs() < f64::EPSILON);
		assert_eq!(timing_point.meter, 4);
		assert!(timing_point.uninherited);

		assert!(parse_timing_point("250").is_err());
		assert!(parse_timing_point("0,1,2,3,4,5,6,7,8").is_err());
	}

	#[test]
	fn small_map() {
		let beatmap = parse_osu_reader("small.osu", Cursor::new(SMALL_MAP)).unwrap();

		assert_eq!(beatmap.osu_file_format, 14);
		assert_eq!(beatmap.general.mode, GameMode::Osu);
		assert!((beatmap.difficulty.slider_multiplier - 1.8).abs() < f64::EPSILON);
		assert!((beatmap.difficulty.approach_rate() - 8.).abs() < f32::EPSILON);

		// sorted by time
		assert_eq!(beatmap.timing_points.len(), 2);
		assert!(beatmap.timing_points[0].uninherited);
		assert_eq!(beatmap.timing_points[1].sample_set, SampleBank::Soft);
		assert!(!beatmap.timing_points[1].uninherited);

		assert_eq!(beatmap.hit_objects.len(), 3);

		let circle = &beatmap.hit_objects[0];
		assert!(matches!(circle.params, HitObjectParams::HitCircle));
		assert!(circle.new_combo);
		assert!(circle.hit_sound.has_finish());

		let slider = &beatmap.hit_objects[1];
		assert!(!slider.new_combo);
		match &slider.params {
			HitObjectParams::Slider {
				curve_points,
				slides,
				edge_hitsounds,
				edge_samplesets,
				..
			} => {
				assert_eq!(curve_points.len(), 2);
				assert_eq!(*slides, 2);
				assert_eq!(edge_hitsounds.len(), 3);
				assert!(edge_hitsounds[2].has_finish());
				assert_eq!(edge_samplesets[0].addition_set, SampleBank::Soft);
			}
			params => panic!("expected slider, got {params:?}"),
		}

		let spinner = &beatmap.hit_objects[2];
		assert!(matches!(spinner.params, HitObjectParams::Spinner { end_time } if end_time == 5000.));
	}

	#[test]
	fn combo_color_skip() {
		let circle = parse_hit_object("0,0,0,37,0").unwrap();

		assert!(circle.new_combo);
		assert_eq!(circle.combo_color_skip, 2);
	}

	#[test]
	fn slider_without_edges() {
		let slider = parse_hit_object("0,0,0,2,8,L|100:0,3,100").unwrap();

		match slider.params {
			HitObjectParams::Slider {
				edge_hitsounds,
				edge_samplesets,
				..
			} => {
				assert_eq!(edge_hitsounds.len(), 4);
				assert!(edge_hitsounds.iter().all(|&hs| hs == slider.hit_sound));
				assert_eq!(edge_samplesets.len(), 4);
			}
			params => panic!("expected slider, got {params:?}"),
		}
	}

	#[test]
	fn mania_hold() {
		let hold = parse_hit_object("64,192,2000,128,0,2500:2:0:0:0:").unwrap();

		assert!(matches!(hold.params, HitObjectParams::Hold { end_time } if end_time == 2500.));
		assert_eq!(hold.sample_set.normal_set, SampleBank::Soft);
	}

	#[test]
	fn unknown_object_type() {
		let err = parse_hit_object("0,0,0,4,0").unwrap_err();

		assert!(matches!(err, HitObjectParseError::UnknownHitObjectType(4)));
	}

	#[test]
	fn missing_header() {
		let err = parse_osu_reader("bad.osu", Cursor::new("[General]\nMode: 0\n")).unwrap_err();

		assert!(matches!(err.kind, BeatmapFileParseErrorKind::InvalidOsuFileFormat));
		assert_eq!(err.filename, "bad.osu");
	}

	#[test]
	fn empty_file() {
		let err = parse_osu_reader("empty.osu", Cursor::new("\n\n")).unwrap_err();

		assert!(matches!(err.kind, BeatmapFileParseErrorKind::FileIsEmpty));
	}

	#[test]
	fn broken_hit_object_names_line() {
		let content = "osu file format v14\n[HitObjects]\n256,192,notatime,1,0\n";
		let err = parse_osu_reader("broken.osu", Cursor::new(content)).unwrap_err();

		match err.kind {
			BeatmapFileParseErrorKind::SectionParse(section) => {
				assert_eq!(section.section, "[HitObjects]");
				assert_eq!(section.line, "256,192,notatime,1,0");
			}
			kind => panic!("expected section error, got {kind:?}"),
		}
	}
}

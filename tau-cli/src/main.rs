use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tau::beatmap::Beatmap;
use tau::convert::{ConverterSettings, TauBeatmapConverter};
use tau::file::beatmap::BeatmapFile;
use tau::objects::{TauHitObject, TauHitObjectKind};
use tau::tau_beatmap::TauBeatmap;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

const PATH_HELP: &str = "Path to beatmap file or folder containing beatmap files.";

#[derive(Subcommand)]
enum Commands {
	/// Convert a beatmap to tau and print every converted object.
	Convert {
		#[arg(long, help = "Also print the head, ticks and repeats of every slider.")]
		nested: bool,

		#[command(flatten)]
		settings: SettingsArgs,

		#[arg(help = "Path to the beatmap file.")]
		path: PathBuf,
	},

	/// Print the statistics of converted beatmaps.
	Stats {
		#[arg(
			short,
			long,
			help = "Whether to recurse in the folder. (option is ignored if the path is a file)."
		)]
		recursive: bool,

		#[command(flatten)]
		settings: SettingsArgs,

		#[arg(help = PATH_HELP)]
		path: PathBuf,
	},
}

#[derive(Args)]
struct SettingsArgs {
	#[arg(long, help = "Don't turn accented notes into hard beats.")]
	no_hard_beats: bool,

	#[arg(long, help = "Don't turn path and duration notes into sliders.")]
	no_sliders: bool,

	#[arg(long, help = "Keep sliders that turn too fast to be followed.")]
	impossible_sliders: bool,

	#[arg(
		long,
		default_value_t = 4,
		help = "Divides the approach time to get the shortest slider duration."
	)]
	slider_divisor: u32,
}

impl From<SettingsArgs> for ConverterSettings {
	fn from(args: SettingsArgs) -> Self {
		Self {
			can_convert_to_hard_beats: !args.no_hard_beats,
			can_convert_to_sliders: !args.no_sliders,
			can_convert_impossible_sliders: args.impossible_sliders,
			slider_divisor: args.slider_divisor,
		}
	}
}

fn main() {
	tracing_subscriber::fmt::init();
	let Cli { command } = Cli::parse();

	match command {
		Commands::Convert {
			nested,
			settings,
			path,
		} => cli_convert(&TauBeatmapConverter::new(settings.into()), nested, &path),

		Commands::Stats {
			recursive,
			settings,
			path,
		} => cli_stats(&TauBeatmapConverter::new(settings.into()), recursive, &path),
	}
}

fn parse_and_convert(converter: &TauBeatmapConverter, path: &Path) -> Option<TauBeatmap> {
	info!("Parsing {}...", path.display());
	let file = match BeatmapFile::parse(path) {
		Ok(file) => file,
		Err(err) => {
			error!("\n{err:?}");
			return None;
		}
	};

	info!("Converting {}...", path.display());
	match converter.convert(&Beatmap::from_file(&file)) {
		Ok(beatmap) => Some(beatmap),
		Err(err) => {
			error!("\n{err:?}");
			None
		}
	}
}

fn describe(hit_object: &TauHitObject) -> String {
	match &hit_object.kind {
		TauHitObjectKind::Beat { angle } => format!("angle {angle:.2}"),
		TauHitObjectKind::HardBeat => String::new(),
		TauHitObjectKind::Slider(slider) => format!(
			"angle {:.2}, {} nodes, {:.2}ms, {:.2} degrees travelled, {} repeats",
			slider.angle,
			slider.path.nodes().len(),
			slider.duration(),
			slider.path.calculated_distance(),
			slider.repeat_count,
		),
	}
}

fn cli_convert(converter: &TauBeatmapConverter, nested: bool, path: &Path) {
	let Some(beatmap) = parse_and_convert(converter, path) else {
		return;
	};

	for hit_object in &beatmap.hit_objects {
		println!(
			"{:>10.2} {:<9} {}",
			hit_object.start_time,
			hit_object.kind.to_string(),
			describe(hit_object)
		);

		if nested {
			for component in beatmap.slider_components(hit_object) {
				println!(
					"{:>10.2}   {:?} angle {:.2}",
					component.time, component.kind, component.angle
				);
			}
		}
	}
}

fn cli_stats(converter: &TauBeatmapConverter, recursive: bool, path: &Path) {
	for entry in WalkDir::new(path)
		.max_depth(if recursive { usize::MAX } else { 1 })
		.follow_links(true)
		.into_iter()
		.filter_map(|e| e.ok())
		.filter(|e| !e.path().is_dir())
	{
		if entry.path().extension().map_or(true, |ext| ext != "osu") {
			warn!("Skipping {}, not a .osu file", entry.path().display());
			continue;
		}

		let Some(beatmap) = parse_and_convert(converter, entry.path()) else {
			continue;
		};

		println!("{}", entry.path().display());
		for statistic in beatmap.statistics() {
			println!("  {statistic}");
		}
	}
}

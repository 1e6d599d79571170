use std::path::PathBuf;

use clap::Parser;
use tau::beatmap::Beatmap;
use tau::convert::TauBeatmapConverter;
use tau::file::beatmap::BeatmapFile;

#[derive(Parser)]
#[command(name = "slider-angles")]
#[command(about = "Print the angle of every converted slider over time.")]
#[command(version = "1.0")]
#[command(author)]
struct Cli {
	#[arg(short, long, default_value_t = 100., help = "Time between two printed angles, in milliseconds.")]
	step: f64,

	#[arg(help = "Path to the beatmap file.")]
	path: PathBuf,
}

fn main() {
	tracing_subscriber::fmt::init();
	let Cli { step, path } = Cli::parse();

	tracing::warn!("Parsing {}...", path.display());
	let file = match BeatmapFile::parse(&path) {
		Ok(file) => file,
		Err(err) => {
			tracing::error!("\n{err:?}");
			return;
		}
	};

	let beatmap = match TauBeatmapConverter::default().convert(&Beatmap::from_file(&file)) {
		Ok(beatmap) => beatmap,
		Err(err) => {
			tracing::error!("\n{err:?}");
			return;
		}
	};

	for hit_object in &beatmap.hit_objects {
		let Some(slider) = hit_object.as_slider() else {
			continue;
		};

		println!("Slider at {}ms", hit_object.start_time);

		let mut offset = 0.;
		while offset < slider.duration() {
			println!("  {:>8.2} {:>8.2}", hit_object.start_time + offset, slider.angle_at(offset));
			offset += step.max(1.);
		}
		println!("  {:>8.2} {:>8.2}", hit_object.end_time(), slider.angle_at(slider.duration()));
	}
}

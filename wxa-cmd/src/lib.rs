//! Command implementations for the WXA CLI.
//!
//! Provides subcommands for converting raw radar files, summarizing radar
//! playback, listing rain gauges, and rendering rainfall animation frames.

use clap::Subcommand;
use std::path::PathBuf;

pub mod convert;
pub mod radar;
pub mod rainfall;

#[derive(Subcommand)]
pub enum Command {
    /// Convert raw NEXRAD files to NetCDF with the external toolsUI jar
    Convert {
        /// Directory of raw radar files
        #[arg(short = 'd', long, default_value = "radar_data")]
        radar_dir: PathBuf,

        /// Path to the toolsUI jar
        #[arg(long, default_value = "toolsUI-4.5.jar")]
        jar: PathBuf,

        /// Java executable
        #[arg(long, default_value = "java")]
        java: String,
    },

    /// Play radar grids over a time range and write one summary row per frame
    Radar {
        /// Directory of converted radar files
        #[arg(short = 'd', long, default_value = "radar_data")]
        radar_dir: PathBuf,

        /// First frame, local time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        start: String,

        /// End of playback, exclusive
        #[arg(long)]
        stop: String,

        /// Time between frames (e.g. 1m, 5m, 1h)
        #[arg(long, default_value = "1m")]
        step: String,

        /// Output CSV path (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// List precipitation gauges in a rainfall archive
    Stations {
        /// Rainfall archive: a .tar.gz or an unpacked directory
        #[arg(short = 'a', long, default_value = "rainfall_data.tar.gz")]
        archive: PathBuf,
    },

    /// Play hourly rainfall over a time range and write every marker of every frame
    Rainfall {
        /// Rainfall archive: a .tar.gz or an unpacked directory
        #[arg(short = 'a', long, default_value = "rainfall_data.tar.gz")]
        archive: PathBuf,

        /// First frame, local time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        start: String,

        /// End of playback, exclusive
        #[arg(long)]
        stop: String,

        /// Time between frames (e.g. 1m, 5m, 1h)
        #[arg(long, default_value = "1m")]
        step: String,

        /// Marker radius for the wettest station, in projected metres
        #[arg(long, default_value_t = wxa_data::rainfall_animator::DEFAULT_SCALE)]
        scale: f64,

        /// Output CSV path (stdout if omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Convert {
            radar_dir,
            jar,
            java,
        } => convert::run_convert(&radar_dir, jar, java),
        Command::Radar {
            radar_dir,
            start,
            stop,
            step,
            output,
        } => radar::run_radar(&radar_dir, &start, &stop, &step, output.as_deref()),
        Command::Stations { archive } => rainfall::run_stations(&archive),
        Command::Rainfall {
            archive,
            start,
            stop,
            step,
            scale,
            output,
        } => rainfall::run_rainfall(&archive, &start, &stop, &step, scale, output.as_deref()),
    }
}

/// Parse the playback schedule shared by the radar and rainfall commands.
pub fn parse_schedule(start: &str, stop: &str, step: &str) -> anyhow::Result<Vec<wxa_core::Timestamp>> {
    let start = wxa_utils::dates::parse_timestamp(start)?;
    let stop = wxa_utils::dates::parse_timestamp(stop)?;
    let step = wxa_utils::dates::parse_step(step)?;
    Ok(wxa_core::time_range::time_range(start, stop, step)?.collect())
}

/// A CSV writer over a file, or stdout when no path is given.
pub fn csv_writer(output: Option<&std::path::Path>) -> anyhow::Result<csv::Writer<Box<dyn std::io::Write>>> {
    let sink: Box<dyn std::io::Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(csv::WriterBuilder::new().has_headers(true).from_writer(sink))
}

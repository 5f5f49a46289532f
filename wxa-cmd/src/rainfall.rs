//! Rain gauge listing and rainfall animation frames.

use crate::{csv_writer, parse_schedule};
use log::info;
use std::path::Path;
use wxa_core::archive::open_archive;
use wxa_core::station_series::StationSeries;
use wxa_core::Timestamp;
use wxa_data::animation::FrameSequencer;
use wxa_data::projection::Mercator;
use wxa_data::rainfall_animator::{RainfallAnimator, RainfallStyle};

/// Column headers of the station listing.
pub const STATION_HEADERS: [&str; 4] = ["station_id", "latitude", "longitude", "samples"];

/// Column headers of the rainfall frame CSV.
pub const FRAME_HEADERS: [&str; 5] = ["label", "station_id", "x", "y", "radius"];

/// Print every precipitation station in the archive as CSV on stdout.
pub fn run_stations(archive: &Path) -> anyhow::Result<()> {
    let stations = StationSeries::load(open_archive(archive)?.as_ref())?;
    write_stations(&stations, None)
}

/// Write the station listing CSV.
pub fn write_stations(stations: &StationSeries, output: Option<&Path>) -> anyhow::Result<()> {
    let mut writer = csv_writer(output)?;
    writer.write_record(STATION_HEADERS)?;
    for station in stations.iter() {
        writer.write_record([
            station.station_id.to_string(),
            format!("{:.5}", station.latitude),
            format!("{:.5}", station.longitude),
            station.len().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Load the archive, play hourly rainfall over the schedule and write every
/// marker of every frame.
pub fn run_rainfall(
    archive: &Path,
    start: &str,
    stop: &str,
    step: &str,
    scale: f64,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let schedule = parse_schedule(start, stop, step)?;
    let stations = StationSeries::load(open_archive(archive)?.as_ref())?;
    let style = RainfallStyle {
        scale,
        ..RainfallStyle::default()
    };
    write_rainfall_frames(&stations, schedule, style, output)
}

/// Play `stations` over `schedule` and write the frame CSV.
pub fn write_rainfall_frames(
    stations: &StationSeries,
    schedule: Vec<Timestamp>,
    style: RainfallStyle,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let projection = Mercator::default();
    let mut sequencer =
        FrameSequencer::new(RainfallAnimator::new(stations, &projection, style), schedule);
    let (_, frames) = sequencer.run()?;
    let max = sequencer.animator().rainfall().max();
    if max == 0.0 {
        log::warn!("No rainfall recorded in the requested range");
    }
    info!(
        "Rendered {} rainfall frames for {} stations, wettest hour {:.2}",
        frames.len(),
        stations.len(),
        max
    );

    let mut writer = csv_writer(output)?;
    writer.write_record(FRAME_HEADERS)?;
    for (_, frame) in &frames {
        for marker in &frame.markers {
            writer.write_record([
                frame.label.clone(),
                marker.station_id.to_string(),
                format!("{:.1}", marker.x),
                format!("{:.1}", marker.y),
                format!("{:.1}", marker.radius),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

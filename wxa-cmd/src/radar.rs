//! Radar playback summary.

use crate::{csv_writer, parse_schedule};
use log::info;
use std::path::Path;
use wxa_core::radar::{GeoTimeSeries, GridReader};
use wxa_data::animation::FrameSequencer;
use wxa_data::projection::Mercator;
use wxa_data::radar_animator::RadarAnimator;
use wxa_utils::dates::format_compact;

/// Column headers of the radar summary CSV.
pub const RADAR_HEADERS: [&str; 5] = ["frame", "shown", "rows", "cols", "max"];

#[cfg(feature = "netcdf")]
fn grid_reader() -> anyhow::Result<Box<dyn GridReader>> {
    Ok(Box::new(wxa_core::netcdf_reader::NetCdfGridReader::default()))
}

#[cfg(not(feature = "netcdf"))]
fn grid_reader() -> anyhow::Result<Box<dyn GridReader>> {
    anyhow::bail!("radar playback needs the `netcdf` feature (libnetcdf) enabled")
}

/// Load converted radar grids and write one summary row per scheduled frame.
pub fn run_radar(
    radar_dir: &Path,
    start: &str,
    stop: &str,
    step: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let schedule = parse_schedule(start, stop, step)?;
    let reader = grid_reader()?;
    let series = GeoTimeSeries::load(radar_dir, reader.as_ref())?;
    write_radar_summary(&series, schedule, output)
}

/// Play `series` over `schedule` and write the frame summary CSV.
pub fn write_radar_summary(
    series: &GeoTimeSeries,
    schedule: Vec<wxa_core::Timestamp>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let projection = Mercator::default();
    let mut sequencer = FrameSequencer::new(RadarAnimator::new(series, &projection), schedule);
    let (first, frames) = sequencer.run()?;
    info!(
        "Radar color scale [{}, {}] over {} frames",
        first.vmin,
        first.vmax,
        frames.len()
    );

    let mut writer = csv_writer(output)?;
    writer.write_record(RADAR_HEADERS)?;
    for (t, frame) in &frames {
        let max = frame.grid.bounds().map(|(_, hi)| hi.to_string()).unwrap_or_default();
        writer.write_record([
            format_compact(t),
            format_compact(&frame.shown),
            frame.grid.rows().to_string(),
            frame.grid.cols().to_string(),
            max,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wxa_core::radar::{Grid, SpatialExtent};
    use wxa_core::Timestamp;

    fn ts(mm: u32) -> Timestamp {
        Timestamp::from_ymd_hm_opt(2014, 9, 8, 5, mm).unwrap()
    }

    #[test]
    fn test_write_radar_summary() {
        let grids = BTreeMap::from([
            (ts(0), Grid::new(1, 2, vec![1.0, 2.0]).unwrap()),
            (ts(2), Grid::new(1, 2, vec![3.0, 4.5]).unwrap()),
        ]);
        let series =
            GeoTimeSeries::from_grids(SpatialExtent::new(-115.0, -109.0, 30.0, 38.0), grids).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("radar.csv");
        write_radar_summary(&series, vec![ts(0), ts(1), ts(2)], Some(&out)).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frame,shown,rows,cols,max");
        assert_eq!(lines[1], "201409080500,201409080500,1,2,2");
        assert_eq!(lines[2], "201409080501,201409080500,1,2,2");
        assert_eq!(lines[3], "201409080502,201409080502,1,2,4.5");
    }
}

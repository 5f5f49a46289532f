//! Conversion of raw radar files ahead of playback.

use log::info;
use std::path::{Path, PathBuf};
use wxa_core::convert::{convert_raw_files, ConverterConfig};

/// Convert every raw radar file in `radar_dir` that has no `.nc` sibling.
pub fn run_convert(radar_dir: &Path, jar: PathBuf, java: String) -> anyhow::Result<()> {
    let config = ConverterConfig {
        java,
        jar,
        ..ConverterConfig::default()
    };
    let written = convert_raw_files(radar_dir, &config)?;
    info!("Converted {} radar files in {}", written.len(), radar_dir.display());
    Ok(())
}

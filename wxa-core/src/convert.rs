//! Conversion of raw NEXRAD files to NetCDF using the external toolsUI jar.
//!
//! Conversion is idempotent: a raw file whose `<name>.nc` sibling already
//! exists is skipped.

use crate::error::{Result, WxaError};
use crate::radar::GRID_EXTENSION;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

/// How to invoke the external converter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    pub java: String,
    pub jar: PathBuf,
    pub heap: String,
    pub main_class: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            jar: PathBuf::from("toolsUI-4.5.jar"),
            heap: "-Xmx512m".to_string(),
            main_class: "ucar.nc2.dataset.NetcdfDataset".to_string(),
        }
    }
}

/// A raw radar file and the converted file it should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConversion {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// The converted path for a raw radar file: the raw name plus `.nc`.
pub fn converted_path(raw: &Path) -> PathBuf {
    let mut name = raw.as_os_str().to_os_string();
    name.push(".");
    name.push(GRID_EXTENSION);
    PathBuf::from(name)
}

/// Raw files in `directory` that have no converted sibling yet.
pub fn pending_conversions(directory: &Path) -> Result<Vec<PendingConversion>> {
    let entries = std::fs::read_dir(directory).map_err(|e| WxaError::io(directory, e))?;
    let mut pending = Vec::new();
    for entry in entries {
        let input = entry.map_err(|e| WxaError::io(directory, e))?.path();
        if !input.is_file() || input.extension().is_some_and(|ext| ext == GRID_EXTENSION) {
            continue;
        }
        let output = converted_path(&input);
        if output.exists() {
            debug!("Skipping {}, already converted", input.display());
            continue;
        }
        pending.push(PendingConversion { input, output });
    }
    pending.sort_by(|a, b| a.input.cmp(&b.input));
    Ok(pending)
}

impl ConverterConfig {
    /// The full command line for one conversion.
    pub fn command(&self, job: &PendingConversion) -> Command {
        let mut command = Command::new(&self.java);
        command
            .arg(&self.heap)
            .arg("-classpath")
            .arg(&self.jar)
            .arg(&self.main_class)
            .arg("-in")
            .arg(&job.input)
            .arg("-out")
            .arg(&job.output);
        command
    }

    /// Run one conversion, failing on a spawn error or non-zero exit.
    pub fn run(&self, job: &PendingConversion) -> Result<()> {
        let status = self
            .command(job)
            .status()
            .map_err(|e| WxaError::Conversion {
                path: job.input.clone(),
                reason: format!("could not start {}: {}", self.java, e),
            })?;
        if !status.success() {
            return Err(WxaError::Conversion {
                path: job.input.clone(),
                reason: format!("converter exited with {}", status),
            });
        }
        Ok(())
    }
}

/// Convert every raw file in `directory` that is not yet converted.
///
/// Returns the paths written.
pub fn convert_raw_files(directory: &Path, config: &ConverterConfig) -> Result<Vec<PathBuf>> {
    let pending = pending_conversions(directory)?;
    info!(
        "Converting {} raw radar files in {}",
        pending.len(),
        directory.display()
    );
    let mut written = Vec::with_capacity(pending.len());
    for job in pending {
        config.run(&job)?;
        written.push(job.output);
    }
    Ok(written)
}

//! Readers for rainfall gauge archives: an unpacked directory or a gzip
//! compressed tar holding the catalog and one text file per station
use crate::error::{Result, WxaError};
use flate2::read::GzDecoder;
use log::debug;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;

/// File name of the sensor catalog inside an archive.
pub const CATALOG_FILE: &str = "ALERT_sensors_all_by_id.csv";

/// File name of a station's data file inside an archive.
pub fn station_file_name(station_id: u32) -> String {
    format!("station_{}.txt", station_id)
}

/// Source of named text files from a rainfall archive.
pub trait RainfallArchive {
    /// Read a file by name, or `None` if the archive has no such file.
    fn read_text(&self, name: &str) -> Result<Option<String>>;
}

/// An archive that has been unpacked into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RainfallArchive for DirectoryArchive {
    fn read_text(&self, name: &str) -> Result<Option<String>> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WxaError::io(path, e)),
        }
    }
}

/// A `.tar.gz` archive, read fully into memory and addressed by file name.
///
/// Directory prefixes inside the tar (e.g. `rainfall_data/`) are ignored.
#[derive(Debug, Clone, Default)]
pub struct TarGzArchive {
    files: HashMap<String, String>,
}

impl TarGzArchive {
    /// Open and decompress an archive on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| WxaError::io(path, e))?;
        Self::from_bytes(&bytes).map_err(|e| match e {
            WxaError::IngestIo { source, .. } => WxaError::io(path, source),
            other => other,
        })
    }

    /// Decompress an archive held in memory.
    pub fn from_bytes(input: &[u8]) -> Result<Self> {
        let io_err = |e: std::io::Error| WxaError::io("<archive>", e);
        let mut archive = Archive::new(GzDecoder::new(input));
        let mut files = HashMap::new();
        for entry in archive.entries().map_err(io_err)? {
            let mut entry = entry.map_err(io_err)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .map_err(io_err)?
                .file_name()
                .map(|n| n.to_string_lossy().to_string());
            let Some(name) = name else { continue };
            let mut text = String::new();
            entry.read_to_string(&mut text).map_err(io_err)?;
            debug!("archive entry {} ({} bytes)", name, text.len());
            files.insert(name, text);
        }
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl RainfallArchive for TarGzArchive {
    fn read_text(&self, name: &str) -> Result<Option<String>> {
        Ok(self.files.get(name).cloned())
    }
}

/// Open an archive path: a directory is read in place, anything else is
/// treated as `.tar.gz`.
pub fn open_archive(path: &Path) -> Result<Box<dyn RainfallArchive>> {
    if path.is_dir() {
        Ok(Box::new(DirectoryArchive::new(path)))
    } else {
        Ok(Box::new(TarGzArchive::open(path)?))
    }
}

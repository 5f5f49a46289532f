/// Error types for radar and rainfall ingestion and playback
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the weather animation libraries
#[derive(Error, Debug)]
pub enum WxaError {
    /// A file could not be opened or read
    #[error("Failed to read {path}: {source}")]
    IngestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A radar file name does not carry a YYYYMMDDHHMM stamp
    #[error("Malformed radar file name: {0}")]
    MalformedPath(String),

    /// A catalog row could not be understood
    #[error("Malformed catalog row {row}: {reason}")]
    CatalogFormat { row: usize, reason: String },

    /// The catalog names a station with no data file in the archive
    #[error("No data file for station {0}")]
    StationFileMissing(u32),

    /// A station file is shorter than its fixed preamble
    #[error("Station file has {lines} lines, shorter than the {preamble} line preamble")]
    TruncatedStationFile { lines: usize, preamble: usize },

    /// A time/value pair appeared before any date line
    #[error("Date not set before time/precipitation data on line {line}")]
    DateNotSet { line: usize },

    /// A military time or calendar date does not exist
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// A station line is neither a date nor a time/value pair
    #[error("Malformed record on line {line}: {text:?}")]
    MalformedRecord { line: usize, text: String },

    /// A degrees/minutes/seconds coordinate could not be parsed
    #[error("Invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    /// A time range was asked to step by zero or backwards
    #[error("Time range step must be strictly positive")]
    InvalidStep,

    /// Two grids in one series report different extents
    #[error("Extent mismatch in {path}: expected {expected}, found {found}")]
    ExtentMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// No grid files were found to build a series from
    #[error("No radar grids found in {0}")]
    EmptyArchive(String),

    /// A grid container lacks the reflectivity variable or extent attributes
    #[error("Missing grid data in {path}: {what}")]
    MissingGridData { path: PathBuf, what: String },

    /// The external radar conversion tool failed
    #[error("Radar conversion failed for {path}: {reason}")]
    Conversion { path: PathBuf, reason: String },

    /// `step` was called before `init`
    #[error("Frame sequencer has not been started")]
    SequencerNotStarted,

    /// `step` was called after the schedule was exhausted
    #[error("Frame sequencer already finished")]
    SequencerFinished,
}

impl WxaError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WxaError::IngestIo {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using WxaError
pub type Result<T> = std::result::Result<T, WxaError>;

//! Core types for aligning radar snapshots and rain gauge samples on a
//! common minute-resolution time axis.

pub mod archive;
pub mod convert;
pub mod error;
#[cfg(feature = "netcdf")]
pub mod netcdf_reader;
pub mod radar;
pub mod station;
pub mod station_series;
pub mod time;
pub mod time_range;

pub use error::{Result, WxaError};
pub use time::Timestamp;

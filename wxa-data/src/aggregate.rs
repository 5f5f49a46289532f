//! Trailing-window rainfall totals and their normalization for display.

use chrono::TimeDelta;
use log::{debug, warn};
use std::collections::BTreeMap;
use wxa_core::station::Station;
use wxa_core::station_series::StationSeries;
use wxa_core::time_range::every_minute;
use wxa_core::Timestamp;

/// Length of the rainfall window, in minutes.
pub const HOURLY_WINDOW_MINUTES: i64 = 60;

/// Sum of a station's per-minute samples over `[t - window, t)`.
///
/// Minutes with no sample contribute zero. A sample at `t` itself is not
/// counted; one at `t - window` is.
pub fn windowed_total(station: &Station, t: Timestamp, window: TimeDelta) -> f64 {
    every_minute(t - window, t).map(|m| station.sample(m)).sum()
}

/// Rainfall over the hour leading up to `t`.
pub fn hourly_total(station: &Station, t: Timestamp) -> f64 {
    windowed_total(station, t, TimeDelta::minutes(HOURLY_WINDOW_MINUTES))
}

/// Hourly totals for every station at `t`, in station order.
pub fn hourly_totals(stations: &StationSeries, t: Timestamp) -> Vec<f64> {
    stations.iter().map(|s| hourly_total(s, t)).collect()
}

/// Hourly totals for a run of timestamps, scaled into `[0, 1]` by the single
/// largest total seen anywhere in the run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRainfall {
    frames: BTreeMap<Timestamp, Vec<f64>>,
    max: f64,
}

impl NormalizedRainfall {
    /// Normalized per-station values at `t`, if `t` was part of the run.
    pub fn get(&self, t: Timestamp) -> Option<&[f64]> {
        self.frames.get(&t).map(Vec::as_slice)
    }

    /// The unscaled global maximum. Zero means every value was zero and
    /// nothing was scaled.
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, &[f64])> {
        self.frames.iter().map(|(t, v)| (*t, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Compute hourly totals for every station at every timestamp, then divide
/// each value by the global maximum.
///
/// When the maximum is zero the values are left at zero.
pub fn normalize_over_range(stations: &StationSeries, timestamps: &[Timestamp]) -> NormalizedRainfall {
    let mut frames = BTreeMap::new();
    let mut max = 0.0_f64;
    for &t in timestamps {
        let hourly = hourly_totals(stations, t);
        max = hourly.iter().copied().fold(max, f64::max);
        frames.insert(t, hourly);
    }
    if max > 0.0 {
        for values in frames.values_mut() {
            for v in values.iter_mut() {
                *v /= max;
            }
        }
    } else {
        warn!(
            "No rainfall over {} timestamps, leaving totals unscaled",
            timestamps.len()
        );
    }
    debug!("normalized {} frames by {}", frames.len(), max);
    NormalizedRainfall { frames, max }
}

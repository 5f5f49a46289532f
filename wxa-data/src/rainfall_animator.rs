use crate::aggregate::{normalize_over_range, NormalizedRainfall};
use crate::animation::Animator;
use crate::projection::Projection;
use log::debug;
use serde::{Deserialize, Serialize};
use wxa_core::station_series::StationSeries;
use wxa_core::{Result, Timestamp};

/// Default marker scale, in plot units per sqrt(normalized rainfall).
pub const DEFAULT_SCALE: f64 = 20000.0;

/// How rainfall markers are sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainfallStyle {
    pub scale: f64,
    pub initial_radius: f64,
}

impl Default for RainfallStyle {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            initial_radius: 1.0,
        }
    }
}

/// A circle drawn over one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub station_id: u32,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// One rainfall frame: a marker per station plus the time label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallFrame {
    pub label: String,
    pub markers: Vec<Marker>,
}

/// Animates hourly rainfall as circles whose area tracks the normalized total.
pub struct RainfallAnimator<'a> {
    stations: &'a StationSeries,
    projection: &'a dyn Projection,
    style: RainfallStyle,
    rainfall: NormalizedRainfall,
}

impl<'a> RainfallAnimator<'a> {
    pub fn new(stations: &'a StationSeries, projection: &'a dyn Projection, style: RainfallStyle) -> Self {
        Self {
            stations,
            projection,
            style,
            rainfall: NormalizedRainfall::default(),
        }
    }

    /// Normalized rainfall computed by the last `init`.
    pub fn rainfall(&self) -> &NormalizedRainfall {
        &self.rainfall
    }
}

impl<'a> Animator for RainfallAnimator<'a> {
    type Frame = RainfallFrame;

    fn init(&mut self, schedule: &[Timestamp]) -> Result<RainfallFrame> {
        self.rainfall = normalize_over_range(self.stations, schedule);
        let markers = self
            .stations
            .iter()
            .map(|s| {
                let (x, y) = self.projection.project(s.longitude, s.latitude);
                Marker {
                    station_id: s.station_id,
                    x,
                    y,
                    radius: self.style.initial_radius,
                }
            })
            .collect();
        Ok(RainfallFrame {
            label: String::new(),
            markers,
        })
    }

    fn animate(&mut self, previous: &RainfallFrame, t: Timestamp) -> Option<RainfallFrame> {
        let weights = self.rainfall.get(t)?;
        debug!("rainfall frame {}", t);
        let markers = previous
            .markers
            .iter()
            .zip(weights)
            .map(|(marker, w)| Marker {
                radius: self.style.scale * w.sqrt(),
                ..marker.clone()
            })
            .collect();
        Some(RainfallFrame {
            label: t.label(),
            markers,
        })
    }
}

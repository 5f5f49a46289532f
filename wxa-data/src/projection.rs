//! The rendering context seen by the animators: a read-only mapping from
//! geographic coordinates to plot coordinates.

use serde::{Deserialize, Serialize};
use wxa_core::radar::SpatialExtent;

/// WGS84 semi-major axis in metres.
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Maps (longitude, latitude) in degrees to plot (x, y).
pub trait Projection {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64);
}

/// Plot coordinates are the geographic coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlateCarree;

impl Projection for PlateCarree {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }
}

/// Spherical Mercator, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub radius: f64,
}

impl Default for Mercator {
    fn default() -> Self {
        Self {
            radius: EARTH_RADIUS_M,
        }
    }
}

impl Projection for Mercator {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.radius * lon.to_radians();
        let y = self.radius * lat.to_radians().tan().asinh();
        (x, y)
    }
}

/// An extent in plot coordinates, as (x_min, x_max, y_min, y_max).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Project the south-west and north-east corners of a grid extent.
pub fn project_extent(projection: &dyn Projection, extent: &SpatialExtent) -> PlotExtent {
    let (x_min, y_min) = projection.project(extent.west, extent.south);
    let (x_max, y_max) = projection.project(extent.east, extent.north);
    PlotExtent {
        x_min,
        x_max,
        y_min,
        y_max,
    }
}

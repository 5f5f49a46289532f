//! Radar reflectivity snapshots keyed by timestamp.
//!
//! A [`GeoTimeSeries`] is built once from a directory of converted grid files
//! and is read-only afterwards. Every grid in a series shares one
//! [`SpatialExtent`].

use crate::error::{Result, WxaError};
use crate::time::{parse_radar_timestamp, Timestamp};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extension of converted radar files.
pub const GRID_EXTENSION: &str = "nc";

/// Name of the composite reflectivity variable inside a grid container.
pub const REFLECTIVITY_VARIABLE: &str = "BaseReflectivityComp_RAW";

/// Geographic bounds of a radar grid, in degrees.
///
/// `west`/`east` are the declared longitude min/max and `south`/`north` the
/// declared latitude min/max, stored as the source reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl SpatialExtent {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }
}

impl fmt::Display for SpatialExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.west, self.east, self.south, self.north
        )
    }
}

/// A dense row-major 2-D grid of reflectivity values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl Grid {
    /// Build a grid, or `None` if `values` does not hold `rows * cols` cells.
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Option<Self> {
        if rows.checked_mul(cols)? != values.len() {
            return None;
        }
        Some(Self { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// Reverse both the row and the column axis.
    pub fn reversed(mut self) -> Self {
        // Row-major storage: reversing the flat buffer flips both axes.
        self.values.reverse();
        self
    }

    /// Smallest and largest finite cell values, or `None` if there are none.
    pub fn bounds(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// One grid container as read from disk, in source orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarFile {
    pub extent: SpatialExtent,
    pub grid: Grid,
}

/// Reads the reflectivity grid and declared extent out of a grid container.
///
/// Implementations must release the file before returning.
pub trait GridReader {
    fn read_grid(&self, path: &Path) -> Result<RadarFile>;
}

/// Timestamp-indexed reflectivity grids sharing a single extent.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTimeSeries {
    extent: SpatialExtent,
    returns: BTreeMap<Timestamp, Grid>,
}

impl GeoTimeSeries {
    /// Load every converted grid file in `directory`.
    ///
    /// Grids are stored with both axes reversed so that increasing row index
    /// runs north to south on screen. Nothing is returned unless every file
    /// loads and all extents agree.
    pub fn load(directory: &Path, reader: &dyn GridReader) -> Result<GeoTimeSeries> {
        let paths = grid_paths(directory)?;
        info!("Loading {} radar grids from {}", paths.len(), directory.display());
        let mut extent: Option<SpatialExtent> = None;
        let mut returns = BTreeMap::new();
        for path in paths {
            let timestamp = parse_radar_timestamp(&path)?;
            let file = reader.read_grid(&path)?;
            match extent {
                None => extent = Some(file.extent),
                Some(expected) if expected != file.extent => {
                    return Err(WxaError::ExtentMismatch {
                        path,
                        expected: expected.to_string(),
                        found: file.extent.to_string(),
                    });
                }
                Some(_) => {}
            }
            debug!("radar grid {} -> {}", path.display(), timestamp);
            returns.insert(timestamp, file.grid.reversed());
        }
        match extent {
            Some(extent) => Ok(GeoTimeSeries { extent, returns }),
            None => Err(WxaError::EmptyArchive(directory.display().to_string())),
        }
    }

    /// Build a series from grids already in display orientation.
    pub fn from_grids(extent: SpatialExtent, returns: BTreeMap<Timestamp, Grid>) -> Result<Self> {
        if returns.is_empty() {
            return Err(WxaError::EmptyArchive("in-memory grids".to_string()));
        }
        Ok(GeoTimeSeries { extent, returns })
    }

    pub fn extent(&self) -> SpatialExtent {
        self.extent
    }

    /// Exact-timestamp lookup. A miss means "no new grid for this frame".
    pub fn nearest_or_missing(&self, timestamp: Timestamp) -> Option<&Grid> {
        self.returns.get(&timestamp)
    }

    /// The earliest grid in the series.
    pub fn first(&self) -> Option<(Timestamp, &Grid)> {
        self.returns.iter().next().map(|(t, g)| (*t, g))
    }

    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.returns.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, &Grid)> {
        self.returns.iter().map(|(t, g)| (*t, g))
    }

    /// Smallest and largest finite value across every grid.
    pub fn value_bounds(&self) -> Option<(f32, f32)> {
        self.returns
            .values()
            .filter_map(Grid::bounds)
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}

/// Converted grid files in `directory`, sorted by name.
pub fn grid_paths(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory).map_err(|e| WxaError::io(directory, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| WxaError::io(directory, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == GRID_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

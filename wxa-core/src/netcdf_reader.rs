//! Native NetCDF grid reading using the netcdf library.
//!
//! Requires libnetcdf (and HDF5) on the system, so it sits behind the
//! `netcdf` cargo feature.

use crate::error::{Result, WxaError};
use crate::radar::{Grid, GridReader, RadarFile, SpatialExtent, REFLECTIVITY_VARIABLE};
use std::path::Path;

/// Reads converted NEXRAD composites.
#[derive(Debug, Clone)]
pub struct NetCdfGridReader {
    pub variable: String,
}

impl Default for NetCdfGridReader {
    fn default() -> Self {
        Self {
            variable: REFLECTIVITY_VARIABLE.to_string(),
        }
    }
}

impl GridReader for NetCdfGridReader {
    fn read_grid(&self, path: &Path) -> Result<RadarFile> {
        let missing = |what: &str| WxaError::MissingGridData {
            path: path.to_path_buf(),
            what: what.to_string(),
        };

        // The handle is dropped, and the file closed, when `nc_file` leaves scope.
        let nc_file = netcdf::open(path).map_err(|e| {
            WxaError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;

        let global_f64 = |name: &str| -> Result<f64> {
            let attr = nc_file.attribute(name).ok_or_else(|| missing(name))?;
            let value = attr.value().map_err(|_| missing(name))?;
            f64::try_from(value).map_err(|_| missing(name))
        };
        let extent = SpatialExtent::new(
            global_f64("geospatial_lon_min")?,
            global_f64("geospatial_lon_max")?,
            global_f64("geospatial_lat_min")?,
            global_f64("geospatial_lat_max")?,
        );

        let var = nc_file
            .variable(&self.variable)
            .ok_or_else(|| missing(&self.variable))?;
        let dims = var.dimensions();
        if dims.len() < 2 {
            return Err(missing("two spatial dimensions"));
        }
        let rows = dims[dims.len() - 2].len();
        let cols = dims[dims.len() - 1].len();

        // With a leading time dimension only the last step is kept.
        let values: Vec<f32> = var
            .get_values(..)
            .map_err(|e| missing(&format!("{} values: {}", self.variable, e)))?;
        let start = values.len().saturating_sub(rows * cols);
        let grid = Grid::new(rows, cols, values[start..].to_vec())
            .ok_or_else(|| missing("grid shape"))?;

        Ok(RadarFile { extent, grid })
    }
}

use crate::animation::Animator;
use crate::projection::{project_extent, PlotExtent, Projection};
use log::debug;
use wxa_core::radar::{GeoTimeSeries, Grid};
use wxa_core::{Result, Timestamp, WxaError};

/// One radar frame: the grid on screen and how to place and color it.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarFrame<'a> {
    /// Timestamp of the grid being shown
    pub shown: Timestamp,
    pub grid: &'a Grid,
    /// Where the grid is drawn, in plot coordinates
    pub extent: PlotExtent,
    /// Color scale bounds across the whole series
    pub vmin: f32,
    pub vmax: f32,
}

/// Animates a radar series by swapping in the grid for each timestamp.
pub struct RadarAnimator<'a> {
    series: &'a GeoTimeSeries,
    projection: &'a dyn Projection,
}

impl<'a> RadarAnimator<'a> {
    pub fn new(series: &'a GeoTimeSeries, projection: &'a dyn Projection) -> Self {
        Self { series, projection }
    }
}

impl<'a> Animator for RadarAnimator<'a> {
    type Frame = RadarFrame<'a>;

    fn init(&mut self, _schedule: &[Timestamp]) -> Result<RadarFrame<'a>> {
        let series: &'a GeoTimeSeries = self.series;
        let (shown, grid) = series
            .first()
            .ok_or_else(|| WxaError::EmptyArchive("radar series".to_string()))?;
        let (vmin, vmax) = series.value_bounds().unwrap_or((0.0, 0.0));
        let extent = project_extent(self.projection, &series.extent());
        debug!("radar color scale [{}, {}], first grid {}", vmin, vmax, shown);
        Ok(RadarFrame {
            shown,
            grid,
            extent,
            vmin,
            vmax,
        })
    }

    fn animate(&mut self, previous: &RadarFrame<'a>, t: Timestamp) -> Option<RadarFrame<'a>> {
        let series: &'a GeoTimeSeries = self.series;
        let grid = series.nearest_or_missing(t)?;
        debug!("radar frame {}", t);
        Some(RadarFrame {
            shown: t,
            grid,
            ..previous.clone()
        })
    }
}

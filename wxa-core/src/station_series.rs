use crate::archive::{station_file_name, RainfallArchive, CATALOG_FILE};
use crate::error::{Result, WxaError};
use crate::station::Station;
use csv::ReaderBuilder;
use log::{info, warn};

/// Instrument type of rain gauges in the sensor catalog.
pub const PRECIP_TYPE: &str = "Precip.";

/// Expected number of columns in a catalog row:
/// id, name, type, date, lat, lon, elevation, location.
pub const CATALOG_ROW_LENGTH: usize = 8;

/// One rain gauge row of the sensor catalog.
#[derive(Debug, PartialEq, Clone)]
pub struct CatalogEntry {
    pub station_id: u32,
    pub name: String,
    pub raw_lat: String,
    pub raw_lon: String,
}

/// Rain gauge stations in catalog order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct StationSeries {
    stations: Vec<Station>,
}

impl StationSeries {
    /// Load every precipitation station listed in the archive's catalog.
    ///
    /// All-or-nothing: the first bad row or missing station file aborts the
    /// load.
    pub fn load(archive: &dyn RainfallArchive) -> Result<StationSeries> {
        let catalog = archive
            .read_text(CATALOG_FILE)?
            .ok_or_else(|| WxaError::CatalogFormat {
                row: 0,
                reason: format!("{} not found in archive", CATALOG_FILE),
            })?;
        let entries = parse_catalog(&catalog)?;
        let mut series = StationSeries::default();
        for entry in entries {
            let text = archive
                .read_text(&station_file_name(entry.station_id))?
                .ok_or(WxaError::StationFileMissing(entry.station_id))?;
            let lines: Vec<&str> = text.lines().collect();
            let station = Station::new(entry.station_id, &entry.raw_lat, &entry.raw_lon, &lines)?;
            series.insert(station);
        }
        info!("Loaded {} precipitation stations", series.len());
        Ok(series)
    }

    /// Add a station, replacing one with the same id in place.
    pub fn insert(&mut self, station: Station) {
        match self
            .stations
            .iter_mut()
            .find(|s| s.station_id == station.station_id)
        {
            Some(existing) => {
                warn!("Station {} listed twice, keeping the later entry", station.station_id);
                *existing = station;
            }
            None => self.stations.push(station),
        }
    }

    pub fn get(&self, station_id: u32) -> Option<&Station> {
        self.stations.iter().find(|s| s.station_id == station_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.stations.iter().map(|s| s.station_id).collect()
    }

    /// (longitude, latitude) of every station, in order.
    pub fn locations(&self) -> Vec<(f64, f64)> {
        self.stations
            .iter()
            .map(|s| (s.longitude, s.latitude))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<Station> for StationSeries {
    fn from_iter<T: IntoIterator<Item = Station>>(iter: T) -> Self {
        let mut series = StationSeries::default();
        for station in iter {
            series.insert(station);
        }
        series
    }
}

/// Parse the sensor catalog, keeping only precipitation gauges.
///
/// Catalog ids carry a spurious fractional part ("6050.00"), which is
/// dropped.
pub fn parse_catalog<B: AsRef<[u8]>>(csv_object: B) -> Result<Vec<CatalogEntry>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_object.as_ref());
    let mut entries = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        let row_no = index + 1;
        let record = row.map_err(|e| WxaError::CatalogFormat {
            row: row_no,
            reason: e.to_string(),
        })?;
        if record.len() != CATALOG_ROW_LENGTH {
            return Err(WxaError::CatalogFormat {
                row: row_no,
                reason: format!(
                    "expected {} columns, found {}",
                    CATALOG_ROW_LENGTH,
                    record.len()
                ),
            });
        }
        if record.get(2).map(str::trim) != Some(PRECIP_TYPE) {
            continue;
        }
        let raw_id = record.get(0).unwrap_or("").trim();
        let station_id = raw_id
            .split('.')
            .next()
            .and_then(|id| id.parse::<u32>().ok())
            .ok_or_else(|| WxaError::CatalogFormat {
                row: row_no,
                reason: format!("bad station id {:?}", raw_id),
            })?;
        entries.push(CatalogEntry {
            station_id,
            name: record.get(1).unwrap_or("").trim().to_string(),
            raw_lat: record.get(4).unwrap_or("").to_string(),
            raw_lon: record.get(5).unwrap_or("").to_string(),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::tar_gz;
    use crate::archive::{DirectoryArchive, TarGzArchive};
    use crate::time::Timestamp;

    const CATALOG_FIXTURE: &str = include_str!("../../fixtures/rainfall/ALERT_sensors_all_by_id.csv");
    const STATION_6050: &str = include_str!("../../fixtures/rainfall/station_6050.txt");
    const STATION_6055: &str = include_str!("../../fixtures/rainfall/station_6055.txt");

    #[test]
    fn test_parse_catalog_filters_precip() {
        let entries = parse_catalog(CATALOG_FIXTURE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].station_id, 6050);
        assert_eq!(entries[0].name, "Cave Creek Dam");
        assert_eq!(entries[0].raw_lat, "33 43 48");
        assert_eq!(entries[1].station_id, 6055);
    }

    #[test]
    fn test_parse_catalog_bad_rows() {
        let short = "ID,NAME,TYPE,DATE,LAT,LON,ELEV,LOC\n6050.00,Cave Creek,Precip.\n";
        assert!(matches!(
            parse_catalog(short),
            Err(WxaError::CatalogFormat { row: 1, .. })
        ));
        let bad_id = "ID,NAME,TYPE,DATE,LAT,LON,ELEV,LOC\nabc,Cave Creek,Precip.,d,1 2 3,4 5 6,7,x\n";
        assert!(matches!(
            parse_catalog(bad_id),
            Err(WxaError::CatalogFormat { row: 1, .. })
        ));
    }

    #[test]
    fn test_parse_catalog_invalid_utf8() {
        let mut bytes = b"ID,NAME,TYPE,DATE,LAT,LON,ELEV,LOC\n".to_vec();
        bytes.extend_from_slice(b"6050.00,Cave \xff Creek,Precip.,d,1 2 3,4 5 6,7,x\n");
        assert!(matches!(
            parse_catalog(&bytes),
            Err(WxaError::CatalogFormat { row: 1, .. })
        ));
    }

    #[test]
    fn test_load_from_tar_gz() {
        let bytes = tar_gz(&[
            (CATALOG_FILE, CATALOG_FIXTURE),
            ("station_6050.txt", STATION_6050),
            ("station_6055.txt", STATION_6055),
        ]);
        let archive = TarGzArchive::from_bytes(&bytes).unwrap();
        let series = StationSeries::load(&archive).unwrap();
        assert_eq!(series.ids(), vec![6050, 6055]);
        let sunnyslope = series.get(6055).unwrap();
        assert!((sunnyslope.latitude - 33.57).abs() < 1e-9);
        assert!((sunnyslope.longitude + 112.08).abs() < 1e-9);
        let t = Timestamp::from_ymd_hm_opt(2014, 9, 8, 5, 20).unwrap();
        assert_eq!(sunnyslope.sample(t), 0.12);
        assert_eq!(series.locations().len(), 2);
    }

    #[test]
    fn test_load_missing_station_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATALOG_FILE), CATALOG_FIXTURE).unwrap();
        std::fs::write(dir.path().join("station_6050.txt"), STATION_6050).unwrap();
        let result = StationSeries::load(&DirectoryArchive::new(dir.path()));
        assert!(matches!(result, Err(WxaError::StationFileMissing(6055))));
    }

    #[test]
    fn test_load_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let result = StationSeries::load(&DirectoryArchive::new(dir.path()));
        assert!(matches!(result, Err(WxaError::CatalogFormat { row: 0, .. })));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let a = Station::from_samples(1, 0.0, 0.0, Default::default());
        let b = Station::from_samples(2, 0.0, 0.0, Default::default());
        let a2 = Station::from_samples(1, 5.0, 5.0, Default::default());
        let series: StationSeries = vec![a, b, a2].into_iter().collect();
        assert_eq!(series.ids(), vec![1, 2]);
        assert_eq!(series.get(1).unwrap().latitude, 5.0);
    }
}

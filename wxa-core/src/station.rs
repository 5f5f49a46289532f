use crate::error::{Result, WxaError};
use crate::time::{to_datetime, Timestamp};
use log::warn;
use std::collections::BTreeMap;

/// Number of header lines at the top of every station file.
pub const PREAMBLE_LINES: usize = 6;

/// Placeholder written by the gauge network for an unknown reading.
pub const MISSING_SAMPLE: &str = "_____";

/// A rain gauge at a fixed location with its per-minute precipitation samples.
///
/// Station files start with a six line preamble, followed by date lines in
/// `M/D/YY` form, each followed by `<military time> <precip>` lines for that
/// date:
///
/// ```text
/// 9/8/14
/// 0615 0.04
/// 0630 _____
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct Station {
    pub station_id: u32,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive
    pub longitude: f64,
    data: BTreeMap<Timestamp, f64>,
}

impl Station {
    /// Build a station from its raw catalog coordinates and file lines.
    ///
    /// The catalog reports longitude as degrees west, so it is negated.
    pub fn new<S: AsRef<str>>(
        station_id: u32,
        raw_lat: &str,
        raw_lon: &str,
        raw_data: &[S],
    ) -> Result<Station> {
        let latitude = coord_to_float(raw_lat)?;
        let longitude = -coord_to_float(raw_lon)?;
        let data = Station::cook(station_id, raw_data)?;
        Ok(Station {
            station_id,
            latitude,
            longitude,
            data,
        })
    }

    /// Build a station directly from samples.
    pub fn from_samples(
        station_id: u32,
        latitude: f64,
        longitude: f64,
        data: BTreeMap<Timestamp, f64>,
    ) -> Station {
        Station {
            station_id,
            latitude,
            longitude,
            data,
        }
    }

    /// Parse the lines of a station file into timestamped samples.
    pub fn cook<S: AsRef<str>>(station_id: u32, raw_data: &[S]) -> Result<BTreeMap<Timestamp, f64>> {
        if raw_data.len() < PREAMBLE_LINES {
            return Err(WxaError::TruncatedStationFile {
                lines: raw_data.len(),
                preamble: PREAMBLE_LINES,
            });
        }
        let mut date: Option<(u32, u32, i32)> = None;
        let mut cooked = BTreeMap::new();
        for (index, raw_line) in raw_data.iter().enumerate().skip(PREAMBLE_LINES) {
            let line_no = index + 1;
            let line = raw_line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || WxaError::MalformedRecord {
                line: line_no,
                text: line.to_string(),
            };
            if line.contains('/') {
                date = Some(parse_date_line(line).ok_or_else(malformed)?);
                continue;
            }
            let (month, day, year2) = date.ok_or(WxaError::DateNotSet { line: line_no })?;
            let mut fields = line.split_whitespace();
            let (time, precip) = match (fields.next(), fields.next(), fields.next()) {
                (Some(time), Some(precip), None) => (time, precip),
                _ => return Err(malformed()),
            };
            let time24 = time.parse::<u32>().map_err(|_| malformed())?;
            let value = if precip == MISSING_SAMPLE {
                0.0
            } else {
                match precip.parse::<f64>() {
                    Ok(v) if v.is_finite() && v >= 0.0 => v,
                    _ => return Err(malformed()),
                }
            };
            let stamp = to_datetime(year2, month, day, time24)?;
            if cooked.insert(stamp, value).is_some() {
                warn!(
                    "Station {}: duplicate sample for {} on line {}, keeping the later value",
                    station_id, stamp, line_no
                );
            }
        }
        Ok(cooked)
    }

    /// The sample at `t`, or 0.0 if none was recorded.
    pub fn sample(&self, t: Timestamp) -> f64 {
        self.data.get(&t).copied().unwrap_or(0.0)
    }

    pub fn data(&self) -> &BTreeMap<Timestamp, f64> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// `M/D/YY` as (month, day, two digit year).
fn parse_date_line(line: &str) -> Option<(u32, u32, i32)> {
    let mut parts = line.split('/').map(str::trim);
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    let year = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((month, day, year))
}

/// Convert `"<degrees> <minutes> <seconds>"` to decimal degrees.
pub fn coord_to_float(text: &str) -> Result<f64> {
    let invalid = || WxaError::InvalidCoordinate(text.to_string());
    let parts = text
        .split_whitespace()
        .map(|p| p.parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<f64>>>()?;
    match parts.as_slice() {
        [degrees, minutes, seconds] => Ok(degrees + minutes / 60.0 + seconds / 3600.0),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATION_FIXTURE: &str = include_str!("../../fixtures/rainfall/station_6050.txt");

    fn preamble() -> Vec<&'static str> {
        vec!["h1", "h2", "h3", "h4", "h5", "h6"]
    }

    fn ts(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> Timestamp {
        Timestamp::from_ymd_hm_opt(y, m, d, hh, mm).unwrap()
    }

    #[test]
    fn test_cook_fixture() {
        let lines: Vec<&str> = STATION_FIXTURE.lines().collect();
        let data = Station::cook(6050, &lines).unwrap();
        assert_eq!(data.len(), 6);
        assert_eq!(data[&ts(2014, 9, 8, 5, 1)], 0.04);
        assert_eq!(data[&ts(2014, 9, 8, 5, 30)], 0.0);
        assert_eq!(data[&ts(2014, 9, 9, 0, 0)], 0.08);
    }

    #[test]
    fn test_cook_sentinel_is_zero() {
        let mut lines = preamble();
        lines.extend(["9/8/14", "1200 _____"]);
        let data = Station::cook(1, &lines).unwrap();
        assert_eq!(data[&ts(2014, 9, 8, 12, 0)], 0.0);
    }

    #[test]
    fn test_cook_truncated() {
        let lines = vec!["h1", "h2", "h3"];
        assert!(matches!(
            Station::cook(1, &lines),
            Err(WxaError::TruncatedStationFile { lines: 3, .. })
        ));
        // Exactly a preamble is a station with no samples.
        assert!(Station::cook(1, &preamble()).unwrap().is_empty());
    }

    #[test]
    fn test_cook_date_not_set() {
        let mut lines = preamble();
        lines.extend(["1200 0.01", "9/8/14"]);
        assert!(matches!(
            Station::cook(1, &lines),
            Err(WxaError::DateNotSet { line: 7 })
        ));
    }

    #[test]
    fn test_cook_malformed_lines() {
        for bad in ["1200", "1200 0.01 extra", "noon 0.01", "1200 lots"] {
            let mut lines = preamble();
            lines.extend(["9/8/14", bad]);
            assert!(
                matches!(Station::cook(1, &lines), Err(WxaError::MalformedRecord { line: 8, .. })),
                "{bad}"
            );
        }
        let mut lines = preamble();
        lines.push("9/8");
        assert!(matches!(
            Station::cook(1, &lines),
            Err(WxaError::MalformedRecord { line: 7, .. })
        ));
    }

    #[test]
    fn test_cook_rejects_unphysical_samples() {
        for bad in ["0531 NaN", "0531 inf", "0531 -0.5"] {
            let mut lines = preamble();
            lines.extend(["9/8/14", "0530 0.1", bad]);
            assert!(
                matches!(Station::cook(1, &lines), Err(WxaError::MalformedRecord { line: 9, .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_cook_huge_year_is_an_error() {
        let mut lines = preamble();
        lines.extend(["1/1/2147483000", "1200 0.1"]);
        assert!(matches!(Station::cook(1, &lines), Err(WxaError::InvalidTime(_))));
    }

    #[test]
    fn test_cook_bad_time() {
        let mut lines = preamble();
        lines.extend(["9/8/14", "2560 0.01"]);
        assert!(matches!(Station::cook(1, &lines), Err(WxaError::InvalidTime(_))));
    }

    #[test]
    fn test_cook_duplicate_keeps_later_value() {
        let mut lines = preamble();
        lines.extend(["9/8/14", "2400 0.01", "9/9/14", "0000 0.02"]);
        let data = Station::cook(1, &lines).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[&ts(2014, 9, 9, 0, 0)], 0.02);
    }

    #[test]
    fn test_coord_to_float() {
        let lat = coord_to_float("33 30 36").unwrap();
        assert!((lat - 33.51).abs() < 1e-9);
        assert!(matches!(coord_to_float("33 30"), Err(WxaError::InvalidCoordinate(_))));
        assert!(matches!(coord_to_float("33 x 1"), Err(WxaError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_station_new_negates_longitude() {
        let station = Station::new(7, "33 30 0", "112 4 48", &preamble()).unwrap();
        assert!((station.latitude - 33.5).abs() < 1e-9);
        assert!((station.longitude + 112.08).abs() < 1e-9);
        assert_eq!(station.sample(ts(2014, 9, 8, 0, 0)), 0.0);
    }
}

use crate::error::{Result, WxaError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::path::Path;

/// Layout of the stamp embedded in radar file names.
pub const RADAR_STAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Width of the radar stamp in characters.
pub const RADAR_STAMP_LEN: usize = 12;

/// Length of the extension that follows the stamp (".nc").
pub const RADAR_SUFFIX_LEN: usize = 3;

/// Radar archives are recorded in GMT; local time is seven hours behind.
pub const RADAR_UTC_OFFSET_HOURS: i64 = 7;

/// Two-digit years in gauge files are offset from this century.
pub const CENTURY: i32 = 2000;

/// A minute-resolution point in time, the key of every time-indexed mapping.
///
/// Seconds and sub-second parts are always zero.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Build a timestamp from calendar parts, or `None` if the date or time
    /// does not exist.
    pub fn from_ymd_hm_opt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(Timestamp)
    }

    /// Wrap a `NaiveDateTime`, dropping anything finer than a minute.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        let truncated = value
            .with_second(0)
            .and_then(|v| v.with_nanosecond(0))
            .unwrap_or(value);
        Timestamp(truncated)
    }

    /// `self + rhs`, or `None` past the representable calendar.
    pub fn checked_add(self, rhs: TimeDelta) -> Option<Self> {
        self.0.checked_add_signed(rhs).map(Timestamp::from_naive)
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Frame label shown next to the rainfall animation, e.g. `2014:09:08:0615`.
    pub fn label(&self) -> String {
        format!(
            "{}:{:02}:{:02}:{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day(),
            self.0.hour(),
            self.0.minute()
        )
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Timestamp::from_naive(value)
    }
}

impl From<Timestamp> for NaiveDateTime {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Add<TimeDelta> for Timestamp {
    type Output = Self;

    fn add(self, rhs: TimeDelta) -> Self::Output {
        Timestamp::from_naive(self.0 + rhs)
    }
}

impl Sub<TimeDelta> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: TimeDelta) -> Self::Output {
        Timestamp::from_naive(self.0 - rhs)
    }
}

impl Sub for Timestamp {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

/// Extract the local timestamp from a converted radar file name.
///
/// The twelve characters before the three character extension hold
/// `YYYYMMDDHHMM` in GMT, e.g. `KIWA_SDUS55_N0R_201409081205.nc`.
pub fn parse_radar_timestamp(path: &Path) -> Result<Timestamp> {
    let text = path.to_string_lossy();
    let malformed = || WxaError::MalformedPath(text.to_string());
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < RADAR_STAMP_LEN + RADAR_SUFFIX_LEN {
        return Err(malformed());
    }
    let end = chars.len() - RADAR_SUFFIX_LEN;
    let stamp: String = chars[end - RADAR_STAMP_LEN..end].iter().collect();
    if !stamp.chars().all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }
    let gmt = NaiveDateTime::parse_from_str(&stamp, RADAR_STAMP_FORMAT).map_err(|_| malformed())?;
    Ok(Timestamp::from_naive(gmt) - TimeDelta::hours(RADAR_UTC_OFFSET_HOURS))
}

/// Convert a gauge file date and military time to a timestamp.
///
/// `year2` is offset by 2000. A `time24` of `24MM` rolls over to `00MM` on the
/// following day; any other hour past 23 is rejected.
pub fn to_datetime(year2: i32, month: u32, day: u32, time24: u32) -> Result<Timestamp> {
    let invalid = || {
        WxaError::InvalidTime(format!(
            "{:02}/{:02}/{:02} {:04}",
            month, day, year2, time24
        ))
    };
    let year = year2.checked_add(CENTURY).ok_or_else(invalid)?;
    let hour = time24 / 100;
    let minute = time24 % 100;
    match hour {
        24 => Timestamp::from_ymd_hm_opt(year, month, day, 0, minute)
            .and_then(|t| t.checked_add(TimeDelta::days(1)))
            .ok_or_else(invalid),
        0..=23 => Timestamp::from_ymd_hm_opt(year, month, day, hour, minute).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> Timestamp {
        Timestamp::from_ymd_hm_opt(y, m, d, hh, mm).unwrap()
    }

    #[test]
    fn test_to_datetime_midnight_rollover() {
        assert_eq!(to_datetime(15, 6, 1, 2400).unwrap(), ts(2015, 6, 2, 0, 0));
        assert_eq!(to_datetime(15, 6, 1, 2415).unwrap(), ts(2015, 6, 2, 0, 15));
        assert_eq!(to_datetime(14, 12, 31, 2400).unwrap(), ts(2015, 1, 1, 0, 0));
    }

    #[test]
    fn test_to_datetime_ordinary() {
        assert_eq!(to_datetime(15, 6, 1, 1230).unwrap(), ts(2015, 6, 1, 12, 30));
        assert_eq!(to_datetime(14, 9, 8, 5).unwrap(), ts(2014, 9, 8, 0, 5));
    }

    #[test]
    fn test_to_datetime_rejects_bad_hours() {
        assert!(matches!(to_datetime(15, 6, 1, 2500), Err(WxaError::InvalidTime(_))));
        assert!(matches!(to_datetime(15, 6, 1, 1260), Err(WxaError::InvalidTime(_))));
        assert!(matches!(to_datetime(15, 2, 30, 1200), Err(WxaError::InvalidTime(_))));
    }

    #[test]
    fn test_to_datetime_year_out_of_range() {
        assert!(matches!(
            to_datetime(2147483000, 1, 1, 1200),
            Err(WxaError::InvalidTime(_))
        ));
        assert!(matches!(to_datetime(300000, 1, 1, 1200), Err(WxaError::InvalidTime(_))));
    }

    #[test]
    fn test_checked_add_overflow() {
        let t = ts(2014, 9, 8, 6, 0);
        assert_eq!(t.checked_add(TimeDelta::minutes(5)), Some(ts(2014, 9, 8, 6, 5)));
        assert_eq!(t.checked_add(TimeDelta::days(1_000_000_000)), None);
    }

    #[test]
    fn test_parse_radar_timestamp() {
        let path = Path::new("radar_data/KIWA_SDUS55_N0R_201409081205.nc");
        assert_eq!(parse_radar_timestamp(path).unwrap(), ts(2014, 9, 8, 5, 5));
    }

    #[test]
    fn test_parse_radar_timestamp_crosses_midnight() {
        let path = Path::new("201409080300.nc");
        assert_eq!(parse_radar_timestamp(path).unwrap(), ts(2014, 9, 7, 20, 0));
    }

    #[test]
    fn test_parse_radar_timestamp_malformed() {
        for bad in ["short.nc", "radar_2014090812xx.nc", "radar_201413081205.nc"] {
            let result = parse_radar_timestamp(Path::new(bad));
            assert!(matches!(result, Err(WxaError::MalformedPath(_))), "{bad}");
        }
    }

    #[test]
    fn test_label_and_truncation() {
        let naive = NaiveDate::from_ymd_opt(2014, 9, 8)
            .unwrap()
            .and_hms_opt(6, 15, 42)
            .unwrap();
        let t = Timestamp::from_naive(naive);
        assert_eq!(t, ts(2014, 9, 8, 6, 15));
        assert_eq!(t.label(), "2014:09:08:0615");
        assert_eq!(t.to_string(), "2014-09-08 06:15");
    }
}

//! Shared utility functions for WXA crates.

/// Date and duration parsing for command line arguments
pub mod dates {
    use chrono::{NaiveDateTime, TimeDelta};
    use wxa_core::Timestamp;

    /// Accepted layouts for timestamps on the command line.
    const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y%m%d%H%M"];

    /// Parse a local timestamp such as "2014-09-08 06:15".
    pub fn parse_timestamp(s: &str) -> anyhow::Result<Timestamp> {
        let s = s.trim();
        for format in TIMESTAMP_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Timestamp::from_naive(parsed));
            }
        }
        anyhow::bail!("timestamp {:?} must look like YYYY-MM-DD HH:MM", s)
    }

    /// Parse a step such as "5", "5m" or "2h" into whole minutes.
    pub fn parse_step(s: &str) -> anyhow::Result<TimeDelta> {
        let s = s.trim();
        let (digits, scale) = match s.strip_suffix('h') {
            Some(hours) => (hours, 60),
            None => (s.strip_suffix('m').unwrap_or(s), 1),
        };
        let count: i64 = digits
            .parse()
            .map_err(|_| anyhow::anyhow!("step {:?} must look like 5m or 1h", s))?;
        count
            .checked_mul(scale)
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| anyhow::anyhow!("step {:?} is too large", s))
    }

    /// Format a timestamp as "YYYYMMDDHHMM" for CSV output.
    pub fn format_compact(t: &Timestamp) -> String {
        t.as_naive().format("%Y%m%d%H%M").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_timestamp_formats() {
            let expected = Timestamp::from_ymd_hm_opt(2014, 9, 8, 6, 15).unwrap();
            assert_eq!(parse_timestamp("2014-09-08 06:15").unwrap(), expected);
            assert_eq!(parse_timestamp("2014-09-08T06:15").unwrap(), expected);
            assert_eq!(parse_timestamp("201409080615").unwrap(), expected);
            assert!(parse_timestamp("09/08/14").is_err());
        }

        #[test]
        fn test_parse_step() {
            assert_eq!(parse_step("5").unwrap(), TimeDelta::minutes(5));
            assert_eq!(parse_step("15m").unwrap(), TimeDelta::minutes(15));
            assert_eq!(parse_step("2h").unwrap(), TimeDelta::minutes(120));
            assert!(parse_step("soon").is_err());
            assert!(parse_step("9223372036854775807h").is_err());
            assert!(parse_step("9223372036854775807").is_err());
        }

        #[test]
        fn test_format_compact() {
            let t = Timestamp::from_ymd_hm_opt(2014, 9, 8, 6, 15).unwrap();
            assert_eq!(format_compact(&t), "201409080615");
        }
    }
}

use crate::error::{Result, WxaError};
use crate::time::Timestamp;
use chrono::TimeDelta;
use std::mem::replace;

/// A half-open time range iterator yielding `start, start + step, ...`
/// strictly before `stop`.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct TimeRange {
    next: Timestamp,
    stop: Timestamp,
    step: TimeDelta,
}

/// Build a time range, failing unless `step` is a strictly positive whole
/// number of minutes.
pub fn time_range(start: Timestamp, stop: Timestamp, step: TimeDelta) -> Result<TimeRange> {
    let minutes = step.num_minutes();
    if minutes < 1 || step != TimeDelta::minutes(minutes) {
        return Err(WxaError::InvalidStep);
    }
    Ok(TimeRange {
        next: start,
        stop,
        step,
    })
}

/// Every minute in `[start, stop)`.
pub fn every_minute(start: Timestamp, stop: Timestamp) -> TimeRange {
    TimeRange {
        next: start,
        stop,
        step: TimeDelta::minutes(1),
    }
}

impl Iterator for TimeRange {
    type Item = Timestamp;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.stop {
            // A step past the end of the calendar ends the range.
            let next = self.next.checked_add(self.step).unwrap_or(self.stop);
            Some(replace(&mut self.next, next))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next < self.stop {
            let span = (self.stop - self.next).num_minutes();
            let step = self.step.num_minutes().max(1);
            ((span + step - 1) / step) as usize
        } else {
            0
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeRange {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(hh: u32, mm: u32) -> Timestamp {
        Timestamp::from_ymd_hm_opt(2014, 9, 8, hh, mm).unwrap()
    }

    #[test]
    fn test_time_range_iteration() {
        let range = time_range(ts(6, 0), ts(6, 5), TimeDelta::minutes(1)).unwrap();
        let times: Vec<Timestamp> = range.collect();
        assert_eq!(times.len(), 5);
        assert_eq!(times[0], ts(6, 0));
        assert_eq!(times[4], ts(6, 4));
    }

    #[test]
    fn test_time_range_length_rounds_up() {
        let range = time_range(ts(6, 0), ts(6, 10), TimeDelta::minutes(3)).unwrap();
        assert_eq!(range.len(), 4);
        let times: Vec<Timestamp> = range.collect();
        assert_eq!(times, vec![ts(6, 0), ts(6, 3), ts(6, 6), ts(6, 9)]);
    }

    #[test]
    fn test_time_range_empty() {
        let same = time_range(ts(6, 0), ts(6, 0), TimeDelta::minutes(1)).unwrap();
        assert_eq!(same.count(), 0);
        let backwards = time_range(ts(6, 5), ts(6, 0), TimeDelta::minutes(1)).unwrap();
        assert_eq!(backwards.len(), 0);
        assert_eq!(backwards.count(), 0);
    }

    #[test]
    fn test_time_range_restartable() {
        let first: Vec<_> = time_range(ts(6, 0), ts(7, 0), TimeDelta::minutes(7))
            .unwrap()
            .collect();
        let second: Vec<_> = time_range(ts(6, 0), ts(7, 0), TimeDelta::minutes(7))
            .unwrap()
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_time_range_rejects_non_positive_step() {
        assert!(matches!(
            time_range(ts(6, 0), ts(7, 0), TimeDelta::zero()),
            Err(WxaError::InvalidStep)
        ));
        assert!(matches!(
            time_range(ts(6, 0), ts(7, 0), TimeDelta::minutes(-1)),
            Err(WxaError::InvalidStep)
        ));
        assert!(matches!(
            time_range(ts(6, 0), ts(7, 0), TimeDelta::seconds(30)),
            Err(WxaError::InvalidStep)
        ));
    }

    #[test]
    fn test_time_range_huge_step_yields_start_only() {
        let range = time_range(ts(6, 0), ts(7, 0), TimeDelta::minutes(1_000_000_000_000)).unwrap();
        assert_eq!(range.len(), 1);
        let times: Vec<Timestamp> = range.collect();
        assert_eq!(times, vec![ts(6, 0)]);
    }

    #[test]
    fn test_every_minute() {
        assert_eq!(every_minute(ts(5, 0), ts(6, 0)).count(), 60);
    }
}

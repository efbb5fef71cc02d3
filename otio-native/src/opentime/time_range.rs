//! Time range - a start time plus a duration

use super::rational_time::RationalTime;
use core::fmt;

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRange {
    start_time: RationalTime,
    duration: RationalTime,
}

impl TimeRange {
    #[inline]
    pub const fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    /// Range of `duration` starting at zero in the duration's rate
    pub fn from_duration(duration: RationalTime) -> Self {
        Self::new(RationalTime::new(0.0, duration.rate()), duration)
    }

    pub fn range_from_start_end_time(start: RationalTime, end_exclusive: RationalTime) -> Self {
        Self::new(
            start,
            RationalTime::duration_from_start_end_time(start, end_exclusive),
        )
    }

    pub fn range_from_start_end_time_inclusive(
        start: RationalTime,
        end_inclusive: RationalTime,
    ) -> Self {
        Self::new(
            start,
            RationalTime::duration_from_start_end_time_inclusive(start, end_inclusive),
        )
    }

    #[inline]
    pub const fn start_time(&self) -> RationalTime {
        self.start_time
    }

    #[inline]
    pub const fn duration(&self) -> RationalTime {
        self.duration
    }

    pub fn end_time_exclusive(&self) -> RationalTime {
        self.duration.rescaled_to_time(self.start_time) + self.start_time
    }

    /// Last whole frame inside the range
    pub fn end_time_inclusive(&self) -> RationalTime {
        let end = self.end_time_exclusive();
        if (end - self.start_time.rescaled_to_time(self.duration)).value() > 1.0 {
            if self.duration.value() != self.duration.value().floor() {
                RationalTime::new(end.value().floor(), end.rate())
            } else {
                end - RationalTime::new(1.0, self.duration.rate())
            }
        } else {
            self.start_time
        }
    }

    pub fn duration_extended_by(&self, other: RationalTime) -> Self {
        Self::new(self.start_time, self.duration + other)
    }

    /// Smallest range covering both
    pub fn extended_by(&self, other: TimeRange) -> Self {
        let start = if other.start_time < self.start_time {
            other.start_time
        } else {
            self.start_time
        };
        let end = if other.end_time_exclusive() > self.end_time_exclusive() {
            other.end_time_exclusive()
        } else {
            self.end_time_exclusive()
        };
        Self::range_from_start_end_time(start, end)
    }

    pub fn clamped_time(&self, time: RationalTime) -> RationalTime {
        let end = self.end_time_inclusive();
        let upper = if time > end { end } else { time };
        if upper < self.start_time {
            self.start_time
        } else {
            upper
        }
    }

    pub fn clamped(&self, other: TimeRange) -> Self {
        let start = if other.start_time > self.start_time {
            other.start_time
        } else {
            self.start_time
        };
        let candidate = Self::new(start, other.duration);
        let end = if candidate.end_time_exclusive() < self.end_time_exclusive() {
            candidate.end_time_exclusive()
        } else {
            self.end_time_exclusive()
        };
        Self::range_from_start_end_time(start, end)
    }

    pub fn contains_time(&self, time: RationalTime) -> bool {
        self.start_time <= time && time < self.end_time_exclusive()
    }

    pub fn contains(&self, other: TimeRange) -> bool {
        self.start_time <= other.start_time && self.end_time_exclusive() >= other.end_time_exclusive()
    }

    pub fn overlaps_time(&self, time: RationalTime) -> bool {
        self.contains_time(time)
    }

    pub fn overlaps(&self, other: TimeRange) -> bool {
        self.start_time < other.end_time_exclusive() && other.start_time < self.end_time_exclusive()
    }

    /// Overlap of both ranges, `None` when they do not touch
    pub fn intersection(&self, other: TimeRange) -> Option<TimeRange> {
        if !self.overlaps(other) {
            return None;
        }
        let start = if other.start_time > self.start_time {
            other.start_time
        } else {
            self.start_time
        };
        let end = if other.end_time_exclusive() < self.end_time_exclusive() {
            other.end_time_exclusive()
        } else {
            self.end_time_exclusive()
        };
        Some(Self::range_from_start_end_time(start, end))
    }

    /// Identical start and duration, bit for bit
    pub fn strictly_equal(&self, other: TimeRange) -> bool {
        self.start_time.strictly_equal(other.start_time) && self.duration.strictly_equal(other.duration)
    }
}

impl PartialEq for TimeRange {
    fn eq(&self, other: &Self) -> bool {
        self.start_time == other.start_time && self.duration == other.duration
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeRange({}, {})", self.start_time, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: f64, duration: f64) -> TimeRange {
        TimeRange::new(RationalTime::new(start, 24.0), RationalTime::new(duration, 24.0))
    }

    #[test]
    fn test_end_times() {
        let r = range(10.0, 20.0);
        assert_eq!(r.end_time_exclusive(), RationalTime::new(30.0, 24.0));
        assert_eq!(r.end_time_inclusive(), RationalTime::new(29.0, 24.0));
    }

    #[test]
    fn test_extended_by() {
        let r = range(10.0, 10.0).extended_by(range(0.0, 5.0));
        assert_eq!(r, range(0.0, 20.0));
    }

    #[test]
    fn test_clamped() {
        let outer = range(0.0, 10.0);
        assert_eq!(outer.clamped(range(5.0, 20.0)), range(5.0, 5.0));
        assert_eq!(
            outer.clamped_time(RationalTime::new(40.0, 24.0)),
            RationalTime::new(9.0, 24.0)
        );
    }

    #[test]
    fn test_overlap_and_intersection() {
        let a = range(0.0, 10.0);
        let b = range(5.0, 10.0);
        let c = range(10.0, 5.0);
        assert!(a.overlaps(b));
        assert!(!a.overlaps(c));
        assert_eq!(a.intersection(b), Some(range(5.0, 5.0)));
        assert_eq!(a.intersection(c), None);
        assert!(a.contains(range(2.0, 3.0)));
        assert!(a.contains_time(RationalTime::new(9.0, 24.0)));
        assert!(!a.contains_time(RationalTime::new(10.0, 24.0)));
    }
}

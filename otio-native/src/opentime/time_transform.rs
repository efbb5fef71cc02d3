//! Time transform - offset, scale and optional target rate

use super::rational_time::RationalTime;
use super::time_range::TimeRange;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeTransform {
    offset: RationalTime,
    scale: f64,
    rate: f64,
}

impl TimeTransform {
    /// A non-positive `rate` keeps whatever rate the input had
    #[inline]
    pub const fn new(offset: RationalTime, scale: f64, rate: f64) -> Self {
        Self {
            offset,
            scale,
            rate,
        }
    }

    #[inline]
    pub const fn offset(&self) -> RationalTime {
        self.offset
    }

    #[inline]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    pub fn applied_to_time(&self, time: RationalTime) -> RationalTime {
        let result = RationalTime::new(time.value() * self.scale, time.rate()) + self.offset;
        let target_rate = if self.rate > 0.0 { self.rate } else { result.rate() };
        if target_rate > 0.0 {
            result.rescaled_to(target_rate)
        } else {
            result
        }
    }

    pub fn applied_to_range(&self, range: TimeRange) -> TimeRange {
        TimeRange::new(
            self.applied_to_time(range.start_time()),
            RationalTime::new(range.duration().value() * self.scale, range.duration().rate()),
        )
    }

    /// Compose with another transform, this one applied last
    pub fn applied_to(&self, other: TimeTransform) -> TimeTransform {
        TimeTransform::new(
            self.offset + other.offset,
            self.scale * other.scale,
            if self.rate > 0.0 { self.rate } else { other.rate },
        )
    }

    /// Identical fields, bit for bit
    pub fn strictly_equal(&self, other: TimeTransform) -> bool {
        self.offset.strictly_equal(other.offset)
            && self.scale.to_bits() == other.scale.to_bits()
            && self.rate.to_bits() == other.rate.to_bits()
    }
}

impl Default for TimeTransform {
    fn default() -> Self {
        Self::new(RationalTime::default(), 1.0, -1.0)
    }
}

impl fmt::Display for TimeTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeTransform({}, {}, {})",
            self.offset, self.scale, self.rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_to_time() {
        let transform = TimeTransform::new(RationalTime::new(10.0, 24.0), 2.0, -1.0);
        let t = transform.applied_to_time(RationalTime::new(5.0, 24.0));
        assert_eq!(t, RationalTime::new(20.0, 24.0));
    }

    #[test]
    fn test_target_rate() {
        let transform = TimeTransform::new(RationalTime::new(0.0, 24.0), 1.0, 48.0);
        let t = transform.applied_to_time(RationalTime::new(12.0, 24.0));
        assert_eq!(t.rate(), 48.0);
        assert_eq!(t.value(), 24.0);
    }

    #[test]
    fn test_compose() {
        let a = TimeTransform::new(RationalTime::new(1.0, 24.0), 2.0, -1.0);
        let b = TimeTransform::new(RationalTime::new(2.0, 24.0), 3.0, 30.0);
        let c = a.applied_to(b);
        assert_eq!(c.offset(), RationalTime::new(3.0, 24.0));
        assert_eq!(c.scale(), 6.0);
        assert_eq!(c.rate(), 30.0);
    }
}

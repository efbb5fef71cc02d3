//! Rational time - a value measured in units of a rate

use super::status::{TimeErrorStatus, TimeOutcome};
use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Rates accepted for SMPTE timecode
pub const VALID_TIMECODE_RATES: [f64; 18] = [
    1.0,
    12.0,
    23.97,
    23.976,
    23.98,
    24000.0 / 1001.0,
    24.0,
    25.0,
    29.97,
    30000.0 / 1001.0,
    30.0,
    47.952,
    48000.0 / 1001.0,
    48.0,
    50.0,
    59.94,
    60000.0 / 1001.0,
    60.0,
];

const DROPFRAME_RATES: [f64; 4] = [29.97, 30000.0 / 1001.0, 59.94, 60000.0 / 1001.0];

/// How to decide whether a timecode uses drop-frame counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsDropFrameRate {
    #[default]
    InferFromRate,
    ForceNo,
    ForceYes,
}

/// A point or duration in time: `value` units of `1 / rate` seconds
#[derive(Debug, Clone, Copy)]
pub struct RationalTime {
    value: f64,
    rate: f64,
}

impl RationalTime {
    #[inline]
    pub const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// NaN anywhere or a non-positive rate makes a time unusable
    pub fn is_invalid_time(&self) -> bool {
        self.value.is_nan() || self.rate.is_nan() || self.rate <= 0.0
    }

    pub fn rescaled_to(&self, new_rate: f64) -> Self {
        Self::new(self.value_rescaled_to(new_rate), new_rate)
    }

    pub fn rescaled_to_time(&self, other: RationalTime) -> Self {
        self.rescaled_to(other.rate)
    }

    pub fn value_rescaled_to(&self, new_rate: f64) -> f64 {
        if new_rate == self.rate {
            self.value
        } else {
            self.value * new_rate / self.rate
        }
    }

    pub fn value_rescaled_to_time(&self, other: RationalTime) -> f64 {
        self.value_rescaled_to(other.rate)
    }

    pub fn almost_equal(&self, other: RationalTime, delta: f64) -> bool {
        (self.value_rescaled_to(other.rate) - other.value).abs() <= delta
    }

    /// Identical value and rate, bit for bit
    pub fn strictly_equal(&self, other: RationalTime) -> bool {
        self.value.to_bits() == other.value.to_bits() && self.rate.to_bits() == other.rate.to_bits()
    }

    pub fn duration_from_start_end_time(start: RationalTime, end_exclusive: RationalTime) -> Self {
        if start.rate == end_exclusive.rate {
            Self::new(end_exclusive.value - start.value, start.rate)
        } else {
            Self::new(
                end_exclusive.value_rescaled_to(start.rate) - start.value,
                start.rate,
            )
        }
    }

    pub fn duration_from_start_end_time_inclusive(
        start: RationalTime,
        end_inclusive: RationalTime,
    ) -> Self {
        if start.rate == end_inclusive.rate {
            Self::new(end_inclusive.value - start.value + 1.0, start.rate)
        } else {
            Self::new(
                end_inclusive.value_rescaled_to(start.rate) - start.value + 1.0,
                start.rate,
            )
        }
    }

    pub fn to_seconds(&self) -> f64 {
        self.value_rescaled_to(1.0)
    }

    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds, 1.0).rescaled_to(rate)
    }

    pub fn to_frames(&self, rate: f64) -> i64 {
        self.value_rescaled_to(rate).floor() as i64
    }

    pub fn from_frames(frame: f64, rate: f64) -> Self {
        Self::new(frame.floor(), rate)
    }

    pub fn is_valid_timecode_rate(rate: f64) -> bool {
        VALID_TIMECODE_RATES.contains(&rate)
    }

    pub fn nearest_valid_timecode_rate(rate: f64) -> f64 {
        VALID_TIMECODE_RATES
            .iter()
            .copied()
            .min_by(|a, b| {
                (a - rate)
                    .abs()
                    .partial_cmp(&(b - rate).abs())
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(rate)
    }

    fn is_dropframe_rate(rate: f64) -> bool {
        DROPFRAME_RATES.contains(&rate)
    }

    fn dropped_frames_per_minute(rate: f64) -> i64 {
        (rate * 0.066666).round() as i64
    }

    /// Parse `HH:MM:SS:FF` (or `HH:MM:SS;FF` for drop frame) at `rate`
    pub fn from_timecode(timecode: &str, rate: f64) -> Result<Self, TimeErrorStatus> {
        if !Self::is_valid_timecode_rate(rate) {
            return Err(TimeErrorStatus::with_details(
                TimeOutcome::InvalidTimecodeRate,
                format!("{} is not a valid timecode rate", rate),
            ));
        }

        let drop_frame = timecode.contains(';');
        if drop_frame && !Self::is_dropframe_rate(rate) {
            return Err(TimeErrorStatus::with_details(
                TimeOutcome::NonDropframeRate,
                format!("timecode '{}' is drop frame but {} is not a drop frame rate", timecode, rate),
            ));
        }

        let fields: Vec<&str> = timecode.split(|c| c == ':' || c == ';').collect();
        let well_formed = fields.len() == 4
            && fields
                .iter()
                .all(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()));
        if !well_formed {
            return Err(TimeErrorStatus::with_details(
                TimeOutcome::InvalidTimecodeString,
                format!("'{}' is not a valid timecode string", timecode),
            ));
        }

        let mut parsed = [0i64; 4];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| {
                TimeErrorStatus::with_details(
                    TimeOutcome::InvalidTimecodeString,
                    format!("'{}' is not a valid timecode string", timecode),
                )
            })?;
        }
        let [hours, minutes, seconds, frames] = parsed;

        let nominal_fps = rate.ceil() as i64;
        if frames >= nominal_fps {
            return Err(TimeErrorStatus::with_details(
                TimeOutcome::TimecodeRateMismatch,
                format!(
                    "frame rate mismatch: timecode '{}' has frames beyond {}",
                    timecode,
                    nominal_fps - 1
                ),
            ));
        }

        let total_frames = || -> Option<i64> {
            let dropped = if drop_frame {
                let total_minutes = hours.checked_mul(60)?.checked_add(minutes)?;
                Self::dropped_frames_per_minute(rate).checked_mul(total_minutes - total_minutes / 10)?
            } else {
                0
            };
            hours
                .checked_mul(3600)?
                .checked_add(minutes.checked_mul(60)?)?
                .checked_add(seconds)?
                .checked_mul(nominal_fps)?
                .checked_add(frames)?
                .checked_sub(dropped)
        };
        let value = total_frames().ok_or_else(|| {
            TimeErrorStatus::with_details(
                TimeOutcome::InvalidTimecodeString,
                format!("timecode '{}' is out of range", timecode),
            )
        })?;
        Ok(Self::new(value as f64, rate))
    }

    /// Format as SMPTE timecode at `rate`
    pub fn to_timecode(
        &self,
        rate: f64,
        drop_frame: IsDropFrameRate,
    ) -> Result<String, TimeErrorStatus> {
        if self.value < 0.0 {
            return Err(TimeErrorStatus::with_details(
                TimeOutcome::NegativeValue,
                format!("cannot format negative time {} as timecode", self.value),
            ));
        }
        if !Self::is_valid_timecode_rate(rate) {
            return Err(TimeErrorStatus::with_details(
                TimeOutcome::InvalidTimecodeRate,
                format!("{} is not a valid timecode rate", rate),
            ));
        }

        let rate_is_dropframe = Self::is_dropframe_rate(rate);
        let drop = match drop_frame {
            IsDropFrameRate::ForceYes if !rate_is_dropframe => {
                return Err(TimeErrorStatus::with_details(
                    TimeOutcome::InvalidRateForDropFrameTimecode,
                    format!("{} cannot be used for drop frame timecode", rate),
                ));
            }
            IsDropFrameRate::ForceYes => true,
            IsDropFrameRate::ForceNo => false,
            IsDropFrameRate::InferFromRate => rate_is_dropframe,
        };

        let out_of_range = || {
            TimeErrorStatus::with_details(
                TimeOutcome::InvalidTimecodeString,
                format!("time {} cannot be formatted as timecode at {}", self.value, rate),
            )
        };

        let nominal_fps = rate.ceil() as i64;
        let rescaled = self.value_rescaled_to(rate).round();
        if !rescaled.is_finite() || rescaled >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        let mut frames = rescaled as i64;

        if drop {
            let dropped = Self::dropped_frames_per_minute(rate);
            let frames_per_ten_minutes = (rate * 600.0).round() as i64;
            let frames_per_minute = nominal_fps * 60 - dropped;

            let tens = frames / frames_per_ten_minutes;
            let remainder = frames % frames_per_ten_minutes;
            let mut extra = dropped.checked_mul(9).and_then(|d| d.checked_mul(tens));
            if remainder > dropped {
                extra = extra.and_then(|e| e.checked_add(dropped * ((remainder - dropped) / frames_per_minute)));
            }
            frames = extra.and_then(|e| frames.checked_add(e)).ok_or_else(out_of_range)?;
        }

        let ff = frames % nominal_fps;
        let total_seconds = frames / nominal_fps;
        let ss = total_seconds % 60;
        let mm = (total_seconds / 60) % 60;
        let hh = total_seconds / 3600;
        let separator = if drop { ';' } else { ':' };

        Ok(format!("{:02}:{:02}:{:02}{}{:02}", hh, mm, ss, separator, ff))
    }

    /// Parse `[[HH:]MM:]SS[.sss]` into a time at `rate`
    pub fn from_time_string(time_string: &str, rate: f64) -> Result<Self, TimeErrorStatus> {
        let invalid = || {
            TimeErrorStatus::with_details(
                TimeOutcome::InvalidTimeString,
                format!("'{}' is not a valid time string", time_string),
            )
        };

        let fields: Vec<&str> = time_string.split(':').collect();
        if fields.is_empty() || fields.len() > 3 {
            return Err(invalid());
        }

        let mut seconds_total = 0.0;
        for (position, field) in fields.iter().rev().enumerate() {
            let valid_chars = !field.is_empty()
                && field.bytes().all(|b| b.is_ascii_digit() || b == b'.')
                && (position == 0 || !field.contains('.'));
            if !valid_chars {
                return Err(invalid());
            }
            let number: f64 = field.parse().map_err(|_| invalid())?;
            seconds_total += number * 60f64.powi(position as i32);
        }

        Ok(Self::from_seconds(seconds_total, rate))
    }

    /// Format as `HH:MM:SS.ssssss`
    pub fn to_time_string(&self) -> String {
        let total = self.to_seconds();
        let sign = if total < 0.0 { "-" } else { "" };
        let total = total.abs();

        let hours = (total / 3600.0).floor();
        let minutes = ((total - hours * 3600.0) / 60.0).floor();
        let seconds = total - hours * 3600.0 - minutes * 60.0;

        format!("{}{:02}:{:02}:{:09.6}", sign, hours as i64, minutes as i64, seconds)
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        self.value_rescaled_to(other.rate) == other.value
    }
}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.value / self.rate).partial_cmp(&(other.value / other.rate))
    }
}

impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, rhs: Self) -> Self {
        if self.rate < rhs.rate {
            Self::new(self.value_rescaled_to(rhs.rate) + rhs.value, rhs.rate)
        } else {
            Self::new(self.value + rhs.value_rescaled_to(self.rate), self.rate)
        }
    }
}

impl Sub for RationalTime {
    type Output = RationalTime;

    fn sub(self, rhs: Self) -> Self {
        if self.rate < rhs.rate {
            Self::new(self.value_rescaled_to(rhs.rate) - rhs.value, rhs.rate)
        } else {
            Self::new(self.value - rhs.value_rescaled_to(self.rate), self.rate)
        }
    }
}

impl AddAssign for RationalTime {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for RationalTime {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for RationalTime {
    type Output = RationalTime;

    fn neg(self) -> Self {
        Self::new(-self.value, self.rate)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RationalTime({}, {})", self.value, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_across_rates() {
        assert_eq!(RationalTime::new(24.0, 24.0), RationalTime::new(48.0, 48.0));
        assert_ne!(RationalTime::new(24.0, 24.0), RationalTime::new(24.0, 48.0));
    }

    #[test]
    fn test_add_picks_higher_rate() {
        let sum = RationalTime::new(1.0, 24.0) + RationalTime::new(2.0, 48.0);
        assert_eq!(sum.rate(), 48.0);
        assert_eq!(sum.value(), 4.0);
    }

    #[test]
    fn test_timecode_round_trip() {
        let t = RationalTime::from_timecode("01:00:13:23", 24.0).unwrap();
        assert_eq!(t.value(), 86735.0);
        assert_eq!(
            t.to_timecode(24.0, IsDropFrameRate::InferFromRate).unwrap(),
            "01:00:13:23"
        );
    }

    #[test]
    fn test_drop_frame_timecode() {
        let t = RationalTime::new(1800.0, 29.97);
        let tc = t.to_timecode(29.97, IsDropFrameRate::InferFromRate).unwrap();
        assert_eq!(tc, "00:01:00;02");
        assert_eq!(RationalTime::from_timecode(&tc, 29.97).unwrap().value(), 1800.0);
    }

    #[test]
    fn test_timecode_errors() {
        let err = RationalTime::from_timecode("00:00:01:00", 23.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeRate);

        let err = RationalTime::from_timecode("00:00:xx:00", 24.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeString);

        let err = RationalTime::from_timecode("00:00:01:24", 24.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::TimecodeRateMismatch);

        let err = RationalTime::from_timecode("00:00:01;00", 24.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::NonDropframeRate);

        let err = RationalTime::new(-1.0, 24.0)
            .to_timecode(24.0, IsDropFrameRate::InferFromRate)
            .unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::NegativeValue);

        let err = RationalTime::new(1.0, 24.0)
            .to_timecode(24.0, IsDropFrameRate::ForceYes)
            .unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidRateForDropFrameTimecode);
    }

    #[test]
    fn test_timecode_out_of_range_is_an_error() {
        let err = RationalTime::from_timecode("9000000000000000:00:00:00", 24.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeString);

        let err = RationalTime::from_timecode("99999999999999999999:00:00:00", 24.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeString);

        let err = RationalTime::from_timecode("3000000000000000:00:00;00", 29.97).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeString);

        let err = RationalTime::new(1e300, 24.0)
            .to_timecode(24.0, IsDropFrameRate::InferFromRate)
            .unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeString);

        let err = RationalTime::new(9.22e18, 29.97)
            .to_timecode(29.97, IsDropFrameRate::InferFromRate)
            .unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimecodeString);
    }

    #[test]
    fn test_time_string() {
        let t = RationalTime::from_time_string("00:01:30.5", 24.0).unwrap();
        assert_eq!(t.to_seconds(), 90.5);
        assert_eq!(t.to_time_string(), "00:01:30.500000");

        let err = RationalTime::from_time_string("1:2:3:4", 24.0).unwrap_err();
        assert_eq!(err.outcome, TimeOutcome::InvalidTimeString);
    }

    #[test]
    fn test_nearest_valid_rate() {
        assert_eq!(RationalTime::nearest_valid_timecode_rate(23.9), 23.97);
        assert_eq!(RationalTime::nearest_valid_timecode_rate(24.1), 24.0);
    }
}

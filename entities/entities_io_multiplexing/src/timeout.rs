//! Timeout Module
//!
//! Provides `timeval`-style timeouts and their conversion to the millisecond
//! resolution of a native multi-object wait.

use std::time::Duration;

/// Seconds + microseconds, equivalent to C's `struct timeval`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimeVal {
    /// Whole seconds
    pub tv_sec: i64,
    /// Microseconds; values of one second or more carry into `tv_sec`
    pub tv_usec: i64,
}

impl TimeVal {
    /// Create a new time value
    pub const fn new(tv_sec: i64, tv_usec: i64) -> Self {
        Self { tv_sec, tv_usec }
    }

    /// Zero duration ("poll, don't block")
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    fn total_micros(&self) -> i128 {
        self.tv_sec as i128 * 1_000_000 + self.tv_usec as i128
    }
}

impl From<Duration> for TimeVal {
    fn from(d: Duration) -> Self {
        let secs = i64::try_from(d.as_secs()).unwrap_or(i64::MAX);
        Self::new(secs, d.subsec_micros() as i64)
    }
}

/// How sub-millisecond remainders are mapped onto the native resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutRounding {
    /// Drop the remainder (1999 µs waits 1 ms)
    #[default]
    Truncate,
    /// Round up to the next millisecond (1001 µs waits 2 ms)
    Ceil,
}

/// Timeout requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until something becomes ready
    Infinite,
    /// Give up after the given duration; zero means poll
    After(TimeVal),
}

/// Timeout in the native wait's unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeTimeout {
    /// Bounded wait in milliseconds, always below [`NativeTimeout::INFINITE_MILLIS`]
    Millis(u32),
    /// Unbounded wait
    Infinite,
}

/// Timeout conversion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutError {
    /// Seconds or microseconds were negative
    Negative(TimeVal),
}

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutError::Negative(tv) => {
                write!(f, "negative timeout ({}s, {}us)", tv.tv_sec, tv.tv_usec)
            }
        }
    }
}

impl std::error::Error for TimeoutError {}

impl Timeout {
    /// Build a timeout from an optional `timeval` (null pointer = infinite)
    pub fn from_timeval(tv: Option<&TimeVal>) -> Self {
        match tv {
            Some(tv) => Timeout::After(*tv),
            None => Timeout::Infinite,
        }
    }

    /// Zero timeout
    pub const fn poll() -> Self {
        Timeout::After(TimeVal::zero())
    }

    /// Convert to the native millisecond resolution
    ///
    /// Microsecond overflow carries into seconds. Values too large for the
    /// native counter saturate just below the infinite sentinel, so a bounded
    /// timeout never turns into an unbounded one.
    ///
    /// # Errors
    ///
    /// Returns `TimeoutError::Negative` if either component is negative.
    pub fn to_native(&self, rounding: TimeoutRounding) -> Result<NativeTimeout, TimeoutError> {
        let tv = match self {
            Timeout::Infinite => return Ok(NativeTimeout::Infinite),
            Timeout::After(tv) => tv,
        };
        if tv.tv_sec < 0 || tv.tv_usec < 0 {
            return Err(TimeoutError::Negative(*tv));
        }
        let micros = tv.total_micros();
        let millis = match rounding {
            TimeoutRounding::Truncate => micros / 1000,
            TimeoutRounding::Ceil => (micros + 999) / 1000,
        };
        let max = (NativeTimeout::INFINITE_MILLIS - 1) as i128;
        Ok(NativeTimeout::Millis(millis.min(max) as u32))
    }
}

impl NativeTimeout {
    /// Native sentinel for "wait forever" (`INFINITE`)
    pub const INFINITE_MILLIS: u32 = u32::MAX;

    /// Raw millisecond value as passed to the native wait
    pub fn as_millis(&self) -> u32 {
        match self {
            NativeTimeout::Millis(ms) => *ms,
            NativeTimeout::Infinite => Self::INFINITE_MILLIS,
        }
    }

    /// Duration of a bounded timeout, `None` when infinite
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            NativeTimeout::Millis(ms) => Some(Duration::from_millis(*ms as u64)),
            NativeTimeout::Infinite => None,
        }
    }

    /// Whether this is a zero (poll) timeout
    pub fn is_zero(&self) -> bool {
        matches!(self, NativeTimeout::Millis(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite() {
        assert_eq!(
            Timeout::Infinite.to_native(TimeoutRounding::Truncate),
            Ok(NativeTimeout::Infinite)
        );
        assert_eq!(Timeout::from_timeval(None), Timeout::Infinite);
        assert_eq!(NativeTimeout::Infinite.as_millis(), u32::MAX);
        assert_eq!(NativeTimeout::Infinite.as_duration(), None);
    }

    #[test]
    fn test_seconds_and_micros() {
        let t = Timeout::After(TimeVal::new(5, 250_000));
        assert_eq!(t.to_native(TimeoutRounding::Truncate), Ok(NativeTimeout::Millis(5250)));
    }

    #[test]
    fn test_truncate_vs_ceil() {
        let t = Timeout::After(TimeVal::new(0, 1_001));
        assert_eq!(t.to_native(TimeoutRounding::Truncate), Ok(NativeTimeout::Millis(1)));
        assert_eq!(t.to_native(TimeoutRounding::Ceil), Ok(NativeTimeout::Millis(2)));

        let sub_ms = Timeout::After(TimeVal::new(0, 999));
        assert_eq!(sub_ms.to_native(TimeoutRounding::Truncate), Ok(NativeTimeout::Millis(0)));
        assert_eq!(sub_ms.to_native(TimeoutRounding::Ceil), Ok(NativeTimeout::Millis(1)));
    }

    #[test]
    fn test_zero_is_poll() {
        let native = Timeout::poll().to_native(TimeoutRounding::Ceil).unwrap();
        assert!(native.is_zero());
        assert_eq!(native.as_duration(), Some(Duration::ZERO));
    }

    #[test]
    fn test_micro_overflow_carries() {
        let t = Timeout::After(TimeVal::new(1, 2_500_000));
        assert_eq!(t.to_native(TimeoutRounding::Truncate), Ok(NativeTimeout::Millis(3500)));
    }

    #[test]
    fn test_saturates_below_infinite() {
        let t = Timeout::After(TimeVal::new(i64::MAX, 999_999));
        assert_eq!(
            t.to_native(TimeoutRounding::Ceil),
            Ok(NativeTimeout::Millis(u32::MAX - 1))
        );
    }

    #[test]
    fn test_negative_rejected() {
        let tv = TimeVal::new(-1, 0);
        assert_eq!(
            Timeout::After(tv).to_native(TimeoutRounding::Truncate),
            Err(TimeoutError::Negative(tv))
        );
        let tv = TimeVal::new(0, -5);
        assert!(Timeout::After(tv).to_native(TimeoutRounding::Truncate).is_err());
    }

    #[test]
    fn test_from_duration() {
        let tv = TimeVal::from(Duration::from_micros(1_500_042));
        assert_eq!(tv, TimeVal::new(1, 500_042));
    }
}

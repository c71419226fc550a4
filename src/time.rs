//! # Time handling
//!
//! Requested instants are normalized into a [`TimeBucket`]: a UTC instant truncated to whole
//! seconds. Two raw time strings that denote the same second produce equal buckets, so they
//! share a cache entry.
//!
//! The current time is read through the [`Clock`] trait so that cache expiry can be driven
//! deterministically ([`ManualClock`]) instead of by the wall clock ([`SystemClock`]).
use std::{
    fmt,
    str::FromStr,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use hifitime::{Duration, Epoch};
use parking_lot::Mutex;

use crate::orrery_errors::OrreryError;

/// A normalized UTC instant with second precision, used as the time half of cache keys.
///
/// The calendar fields are stored directly so equality, hashing and ordering are exact integer
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeBucket {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeBucket {
    /// Truncate an epoch (in any time scale) to its UTC second.
    pub fn from_epoch(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, second, _nanos) = epoch.to_gregorian_utc();
        TimeBucket {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Parse an ISO-8601 instant.
    ///
    /// Arguments
    /// ---------
    /// * `raw`: e.g. `"2024-03-01T12:00:00"`, `"2024-03-01T12:00:00.250Z"` or
    ///   `"2024-03-01T12:00:00 TDB"`. Strings without a time scale are read as UTC and a
    ///   trailing `Z` is accepted as UTC.
    ///
    /// Return
    /// ------
    /// * The bucket containing that instant, or [`OrreryError::InvalidTime`].
    pub fn parse(raw: &str) -> Result<Self, OrreryError> {
        let trimmed = raw.trim();
        let normalized = match trimmed.strip_suffix(['Z', 'z']) {
            Some(without_zulu) => format!("{without_zulu} UTC"),
            None => trimmed.to_string(),
        };

        Epoch::from_str(&normalized)
            .map(TimeBucket::from_epoch)
            .map_err(|err| OrreryError::InvalidTime(format!("{raw:?}: {err}")))
    }

    /// The instant at the start of the bucket.
    pub fn epoch(&self) -> Epoch {
        Epoch::from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
    }

    /// Inclusive day-granularity window `(start, stop)` around the bucket, formatted as
    /// `YYYY-MM-DD`: the bucket's UTC date and the following day.
    pub fn day_window(&self) -> (String, String) {
        let midnight = Epoch::from_gregorian_utc_at_midnight(self.year, self.month, self.day);
        let (year, month, day, ..) = (midnight + Duration::from_days(1.0)).to_gregorian_utc();
        (
            format!("{:04}-{:02}-{:02}", self.year, self.month, self.day),
            format!("{year:04}-{month:02}-{day:02}"),
        )
    }
}

impl FromStr for TimeBucket {
    type Err = OrreryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeBucket::parse(s)
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Epoch;
}

/// Wall clock of the process, advanced monotonically.
///
/// The wall-clock time is read once, at construction. Later readings add the elapsed
/// [`Instant`] time to it, so a backwards step of the system clock never makes cache entries
/// younger.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    anchor: Epoch,
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        SystemClock {
            anchor: Epoch::from_unix_seconds(since_unix.as_secs_f64()),
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Epoch {
        self.anchor + Duration::from_seconds(self.started.elapsed().as_secs_f64())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Epoch>,
}

impl ManualClock {
    pub fn new(start: Epoch) -> Self {
        ManualClock {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: Epoch) {
        *self.now.lock() = instant;
    }

    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock();
        *now += step;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Epoch {
        *self.now.lock()
    }
}

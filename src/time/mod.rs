//! Time handling for the packet encoders
//!
//! Two clocks feed the wire format:
//!
//! - The session clock, a monotonic counter started once per transmission
//!   session, from which every packet's relative time counter (RTC) is taken.
//! - The wall clock, which supplies calendar time for the BCD time packet and
//!   the IENA time tag, and epoch seconds for the iNET-X header.
//!
//! Encoders never read either clock themselves; callers sample the clocks and
//! pass the values in, so every encoder is a pure function of its arguments.

mod bcd;

pub use self::bcd::{encode_bcd, time_packet_payload, TIME_CSDW, TIME_PAYLOAD_LEN};

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::core::{Error, Result};

/// Largest value representable in the 48-bit RTC field
pub const RTC_MAX: u64 = (1 << 48) - 1;

/// RTC ticks per second (100 ns units)
pub const RTC_TICKS_PER_SECOND: u64 = 10_000_000;

/// A 48-bit relative time counter in units of 100 ns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RelativeTimeCounter(u64);

impl RelativeTimeCounter {
    /// Creates a counter, rejecting values wider than 48 bits
    pub fn new(ticks: u64) -> Result<Self> {
        if ticks > RTC_MAX {
            return Err(Error::range("relative_time_counter", ticks, 48));
        }
        Ok(RelativeTimeCounter(ticks))
    }

    /// Converts an elapsed duration to whole 100 ns ticks
    pub fn from_elapsed(elapsed: Duration) -> Result<Self> {
        let ticks = elapsed.as_nanos() / 100;
        match u64::try_from(ticks) {
            Ok(ticks) => Self::new(ticks),
            Err(_) => Err(Error::range("relative_time_counter", ticks as i128, 48)),
        }
    }

    /// Raw tick count
    pub fn ticks(&self) -> u64 {
        self.0
    }
}

/// Session context holding the start instant for RTC computation
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    /// Starts a new session clock at the current instant
    pub fn start() -> Self {
        SessionClock {
            start: Instant::now(),
        }
    }

    /// Creates a session clock anchored at an earlier instant
    pub fn started_at(start: Instant) -> Self {
        SessionClock { start }
    }

    /// Time elapsed since the session started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Current relative time counter
    pub fn rtc(&self) -> Result<RelativeTimeCounter> {
        RelativeTimeCounter::from_elapsed(self.elapsed())
    }
}

/// Wall-clock readings taken together once per transmission tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    /// Local calendar time
    pub local: chrono::NaiveDateTime,
    /// System time for epoch-relative fields
    pub system: SystemTime,
}

impl WallTime {
    /// Reads both clocks
    pub fn now() -> Self {
        WallTime {
            local: local_now(),
            system: SystemTime::now(),
        }
    }

    /// Whole seconds since the Unix epoch, or 0 before the epoch
    pub fn epoch_second(&self) -> u64 {
        self.system
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Splits a wall-clock instant into whole seconds since the Unix epoch and
/// nanoseconds within that second
pub fn epoch_parts(now: SystemTime) -> Result<(u32, u32)> {
    let since_epoch = now
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::timing(format!("Clock is before the Unix epoch: {}", e)))?;

    let seconds = since_epoch.as_secs();
    let seconds =
        u32::try_from(seconds).map_err(|_| Error::range("time_seconds", seconds, 32))?;

    Ok((seconds, since_epoch.subsec_nanos()))
}

/// Current local calendar time
pub fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

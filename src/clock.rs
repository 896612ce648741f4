use chrono::{DateTime, FixedOffset, Local};

/// Wall-clock source for the analyzer.
///
/// The offset of `now()` is the engine's local zone: `HH:MM:SS` trade times
/// resolve against its calendar day.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Pinned time for tests and deterministic replays.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: DateTime<FixedOffset>) {
        self.now = now;
    }

    pub fn advance_ms(&mut self, ms: i64) {
        self.now = self.now + chrono::Duration::milliseconds(ms);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

use std::fmt;
use std::time::SystemTime;

/// Remaining countdown time, broken into whole minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingTime {
    pub minutes: u64,
    pub seconds: u64,
}

impl RemainingTime {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            minutes: secs / 60,
            seconds: secs % 60,
        }
    }

    pub fn as_secs(&self) -> u64 {
        self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}分 {}秒", self.minutes, self.seconds)
    }
}

/// Result of one countdown re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No countdown is running.
    Idle,
    /// The countdown is running with this much time left.
    Remaining(RemainingTime),
    /// The countdown just ran out; the timer has returned to idle.
    Expired,
}

/// Countdown state machine with two states: idle and running.
///
/// The timer never stores remaining time as a mutable counter. It records
/// the start instant and recomputes `focus_secs - elapsed` on every tick,
/// so missed or delayed ticks cannot make the countdown drift.
#[derive(Debug, Default)]
pub struct Timer {
    started_at: Option<SystemTime>,
}

impl Timer {
    pub fn new() -> Self {
        Self { started_at: None }
    }

    /// Running iff a start instant is recorded.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self) {
        self.start_at(SystemTime::now());
    }

    /// Starting while already running restarts the countdown from `now`.
    pub fn start_at(&mut self, now: SystemTime) {
        self.started_at = Some(now);
    }

    /// Forces the timer back to idle from any state. Idempotent.
    pub fn reset(&mut self) {
        self.started_at = None;
    }

    pub fn tick(&mut self, focus_secs: u64) -> Tick {
        self.tick_at(focus_secs, SystemTime::now())
    }

    /// Re-evaluates the countdown against `now`.
    ///
    /// While running with time left, yields the derived remaining time and
    /// stays running. Once the full focus duration has elapsed, yields
    /// `Expired` exactly once and resets to idle; subsequent ticks yield
    /// `Idle` until the timer is started again.
    pub fn tick_at(&mut self, focus_secs: u64, now: SystemTime) -> Tick {
        let Some(started_at) = self.started_at else {
            return Tick::Idle;
        };

        // A clock rolled back before the start instant counts as no time
        // elapsed rather than an error.
        let elapsed_secs = now
            .duration_since(started_at)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        if elapsed_secs >= focus_secs {
            self.started_at = None;
            Tick::Expired
        } else {
            Tick::Remaining(RemainingTime::from_secs(focus_secs - elapsed_secs))
        }
    }
}

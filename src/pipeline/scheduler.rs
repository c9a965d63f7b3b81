//! Frame pacing.
//!
//! The controller never loops on its own: after each cycle it asks a
//! [`FrameScheduler`] for the next tick, and the UI loop runs a cycle when
//! the tick is due.

use std::time::{Duration, Instant};

/// Default refresh rate of the render loop.
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Holds at most one pending tick.
pub trait FrameScheduler {
    /// Arm the next tick, replacing any pending one.
    fn schedule_next_frame(&mut self, now: Instant);

    /// Consume the pending tick if it is due at `now`.
    fn take_due_tick(&mut self, now: Instant) -> bool;

    /// Time left until the pending tick, `None` if nothing is pending.
    fn time_until_due(&self, now: Instant) -> Option<Duration>;

    /// Drop the pending tick.
    fn cancel(&mut self);

    fn is_pending(&self) -> bool;
}

/// Ticks spaced at a fixed refresh rate.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalScheduler {
    /// A refresh rate of 0 is treated as 1 Hz.
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / refresh_hz.max(1),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

impl FrameScheduler for IntervalScheduler {
    fn schedule_next_frame(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    fn take_due_tick(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                self.next = None;
                true
            }
            _ => false,
        }
    }

    fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next.map(|due| due.saturating_duration_since(now))
    }

    fn cancel(&mut self) {
        self.next = None;
    }

    fn is_pending(&self) -> bool {
        self.next.is_some()
    }
}

/// Ticks are due as soon as they are scheduled. Counts schedules for tests.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: bool,
    scheduled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a tick was scheduled.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_frame(&mut self, _now: Instant) {
        self.pending = true;
        self.scheduled += 1;
    }

    fn take_due_tick(&mut self, _now: Instant) -> bool {
        std::mem::take(&mut self.pending)
    }

    fn time_until_due(&self, _now: Instant) -> Option<Duration> {
        self.pending.then_some(Duration::ZERO)
    }

    fn cancel(&mut self) {
        self.pending = false;
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

//! Timed captures.
//!
//! Once the camera runs, a snapshot is taken every `interval` until `count`
//! have been saved, then the session closes after `close_after`.

use std::time::{Duration, Instant};

/// Time between captures when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Time the last capture stays on screen before the session closes.
pub const DEFAULT_CLOSE_AFTER: Duration = Duration::from_secs(5);

/// What the timer wants done at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoCaptureStep {
    Wait,
    Capture,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCapture {
    interval: Duration,
    close_after: Duration,
    total: u32,
    taken: u32,
    next_due: Option<Instant>,
    close_at: Option<Instant>,
}

impl AutoCapture {
    /// `None` when `count` is 0.
    pub fn new(count: u32, interval: Duration, close_after: Duration) -> Option<Self> {
        (count > 0).then_some(Self {
            interval,
            close_after,
            total: count,
            taken: 0,
            next_due: None,
            close_at: None,
        })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn taken(&self) -> u32 {
        self.taken
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some() || self.close_at.is_some()
    }

    /// Start the countdown to the first capture. Later calls do nothing.
    pub fn arm(&mut self, now: Instant) {
        if !self.is_armed() && self.taken < self.total {
            self.next_due = Some(now + self.interval);
            log::debug!("Timed capture armed: {} every {:?}", self.total, self.interval);
        }
    }

    pub fn step(&self, now: Instant) -> AutoCaptureStep {
        if let Some(close_at) = self.close_at {
            return if now >= close_at {
                AutoCaptureStep::Close
            } else {
                AutoCaptureStep::Wait
            };
        }
        match self.next_due {
            Some(due) if now >= due => AutoCaptureStep::Capture,
            _ => AutoCaptureStep::Wait,
        }
    }

    /// Count one capture, successful or not, and schedule what comes next.
    pub fn record(&mut self, now: Instant) {
        self.taken = (self.taken + 1).min(self.total);
        if self.taken == self.total {
            self.next_due = None;
            self.close_at = Some(now + self.close_after);
        } else {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Next instant the timer needs attention.
    pub fn deadline(&self) -> Option<Instant> {
        self.close_at.or(self.next_due)
    }

    /// Countdown text for the status bar, in whole seconds rounded up.
    pub fn countdown(&self, now: Instant) -> Option<String> {
        if let Some(close_at) = self.close_at {
            return Some(format!("closing in {}s", seconds_left(close_at, now)));
        }
        let due = self.next_due?;
        Some(format!(
            "capture {}/{} in {}s",
            self.taken + 1,
            self.total,
            seconds_left(due, now)
        ))
    }
}

fn seconds_left(deadline: Instant, now: Instant) -> u64 {
    let left = deadline.saturating_duration_since(now);
    left.as_secs() + u64::from(left.subsec_nanos() > 0)
}

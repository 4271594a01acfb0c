use std::time::{Duration, Instant};

/// Period of the progress ticker.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Percentage added per tick.
const PROGRESS_STEP: u8 = 2;

/// One-shot timer: fires once after being armed, then waits to be armed again.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// True once the armed deadline has passed; disarms itself when it fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

/// Decorative progress indicator; it loops and is not tied to command completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    percent: u8,
}

impl Progress {
    pub fn reset(&mut self) {
        self.percent = 0;
    }

    pub fn advance(&mut self) {
        if self.percent >= 100 {
            self.percent = 0;
        } else {
            self.percent = self.percent.saturating_add(PROGRESS_STEP).min(100);
        }
    }

    pub fn percent(self) -> u8 {
        self.percent
    }

    pub fn ratio(self) -> f64 {
        f64::from(self.percent) / 100.0
    }
}

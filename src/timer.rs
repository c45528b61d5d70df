use std::time::Duration;

pub const TIMER_DEC_PER_SECOND: u32 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Counts down by one, stopping at zero. Returns whether it was running.
    pub fn decrement(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Fixed-step accumulator: feed it elapsed wall time, get back how many
/// whole steps of `1 / hz` fell due.
#[derive(Debug, Clone)]
pub struct Pacer {
    step: Duration,
    accumulated: Duration,
    max_steps: u32,
}

impl Pacer {
    pub fn new(hz: u32) -> Self {
        let hz = hz.max(1);
        Self {
            step: Duration::from_secs(1) / hz,
            accumulated: Duration::ZERO,
            // at most a quarter second of catch-up per call
            max_steps: (hz / 4).max(1),
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.step && due < self.max_steps {
            self.accumulated -= self.step;
            due += 1;
        }
        if due == self.max_steps {
            self.accumulated = self.accumulated.min(self.step);
        }
        due
    }

    /// Time left until the next step falls due.
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulated)
    }
}

use crate::{stack::DEFAULT_DEPTH, timer::TIMER_DEC_PER_SECOND};

/// CPU: 340 instructions per second by default
/// Timers: 60 times per second
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cpu_hz: u32,
    pub timer_hz: u32,
    /// `None` lets the call stack grow without bound.
    pub stack_depth: Option<usize>,
    /// Treat unknown opcodes as fatal instead of skipping them.
    pub strict_opcodes: bool,
    pub seed: Option<u64>,
    pub scale: usize,
    pub verbose: bool,
    pub mute: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_hz: 340,
            timer_hz: TIMER_DEC_PER_SECOND,
            stack_depth: Some(DEFAULT_DEPTH),
            strict_opcodes: false,
            seed: None,
            scale: 10,
            verbose: false,
            mute: false,
        }
    }
}

//! What the VM needs from whatever is hosting it.

use crate::{display::FrameBuffer, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    KeyDown(u8),
    KeyUp(u8),
    Quit,
}

/// Receives the grid after every CLS or DRW; scaling is up to the implementor.
pub trait Screen {
    fn present(&mut self, fb: &FrameBuffer) -> Result<()>;
}

/// Drained once per driver iteration, so it must never block.
pub trait Input {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>>;
}

/// Sounds while `on` is true, silent otherwise.
pub trait Audio {
    fn set_tone(&mut self, on: bool) -> Result<()>;
}

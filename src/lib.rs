// 16 8-bit data registers named V0 to VF
// I -> address register
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Beep when sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod host;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod rom;
pub mod runner;
pub mod sound;
pub mod stack;
pub mod timer;
pub mod window;

pub use config::Config;
pub use emulator::{Cycle, Emulator, State};
pub use error::{Chip8Error, Result};
pub use runner::Runner;

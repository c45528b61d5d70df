use std::{io, path::PathBuf};

use crate::memory::TypeAddr;

#[derive(Debug, thiserror::Error)]
pub enum RomLoadError {
    #[error("failed to read ROM {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    TooLarge { size: usize, max_size: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum FontLoadError {
    #[error("failed to read font {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("font line {line}: {content:?} is not a hex byte")]
    Malformed { line: usize, content: String },

    #[error("font holds {len} bytes, expected 80 (16 glyphs of 5 bytes)")]
    WrongLength { len: usize },
}

/// Everything that can stop (or, for unknown opcodes, be reported by) the VM.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error(transparent)]
    RomLoad(#[from] RomLoadError),

    #[error(transparent)]
    FontLoad(#[from] FontLoadError),

    #[error("unimplemented opcode {opcode:#06X} at {addr:#05X}")]
    UnimplementedOpcode { opcode: u16, addr: TypeAddr },

    #[error("stack underflow: RET at {addr:#05X} with an empty call stack")]
    StackUnderflow { addr: TypeAddr },

    #[error("stack overflow: CALL exceeds the maximum depth of {depth}")]
    StackOverflow { depth: usize },

    #[error("invalid key index {key:#04X}, keys are 0x0..=0xF")]
    InvalidKeyIndex { key: u8 },

    #[error("memory access out of bounds at address {address:#06X}")]
    AddressOutOfBounds { address: usize },

    #[error("display error: {0}")]
    Display(String),

    #[error("audio error: {0}")]
    Audio(String),
}

impl Chip8Error {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnimplementedOpcode { .. })
    }
}

pub type Result<T, E = Chip8Error> = std::result::Result<T, E>;

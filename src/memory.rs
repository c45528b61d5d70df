use std::{fs, path::Path};

use log::info;

use crate::error::{Chip8Error, FontLoadError, Result, RomLoadError};

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const FONT_START: TypeAddr = 0x000;
pub const GLYPH_BYTES: usize = 5;

pub type FontBytes = [u8; GLYPH_BYTES * 16];

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Parses a font resource: one hex byte per line, blank lines ignored.
pub fn parse_font(text: &str) -> Result<FontBytes, FontLoadError> {
    let mut bytes = Vec::with_capacity(DEFAULT_FONT.len());
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let byte = u8::from_str_radix(digits, 16).map_err(|_| FontLoadError::Malformed {
            line: i + 1,
            content: trimmed.to_string(),
        })?;
        bytes.push(byte);
    }

    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| FontLoadError::WrongLength { len })
}

pub fn read_font_file(path: &Path) -> Result<FontBytes, FontLoadError> {
    let text = fs::read_to_string(path).map_err(|source| FontLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_font(&text)
}

pub struct Memory {
    // 4k bytes
    // font data stored from 000 -> 04F, programs from 200
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.load_font(&DEFAULT_FONT);
        mem
    }

    fn check(addr: usize) -> Result<usize> {
        if addr < MEMORY_SIZE {
            Ok(addr)
        } else {
            Err(Chip8Error::AddressOutOfBounds { address: addr })
        }
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<()> {
        self.bytes[Self::check(addr)?] = val;
        Ok(())
    }

    pub fn get(&self, addr: usize) -> Result<u8> {
        Ok(self.bytes[Self::check(addr)?])
    }

    /// `len` bytes starting at `addr`, all of which must lie inside memory.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        if len == 0 {
            return Ok(&[]);
        }
        Self::check(addr)?;
        Self::check(addr + len - 1)?;
        Ok(&self.bytes[addr..addr + len])
    }

    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        if len == 0 {
            return Ok(&mut []);
        }
        Self::check(addr)?;
        Self::check(addr + len - 1)?;
        Ok(&mut self.bytes[addr..addr + len])
    }

    /// Big-endian instruction word at `addr`.
    pub fn read_word(&self, addr: TypeAddr) -> Result<u16> {
        let pair = self.slice(addr as usize, 2)?;
        Ok(((pair[0] as u16) << 8) | pair[1] as u16)
    }

    pub fn load_font(&mut self, font: &FontBytes) {
        let start = FONT_START as usize;
        self.bytes[start..start + font.len()].copy_from_slice(font);
    }

    // loads program instructions starting at address 0x200
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        let start = PROGRAM_START as usize;
        let max_size = MEMORY_SIZE - start;
        if bytes.len() > max_size {
            return Err(RomLoadError::TooLarge {
                size: bytes.len(),
                max_size,
            }
            .into());
        }
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        info!("loaded {} byte program at {:#05X}", bytes.len(), start);
        Ok(())
    }

    pub fn load_rom_by_file(&mut self, path: &Path) -> Result<()> {
        let program = fs::read(path).map_err(|source| RomLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("read ROM {}", path.display());
        self.load_rom(&program)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

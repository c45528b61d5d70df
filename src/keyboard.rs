use minifb::Key;

use crate::error::{Chip8Error, Result};

pub const KEY_COUNT: usize = 16;

/// Physical layout of the hex keypad:
///
/// ```text
/// 1 2 3 C        1 2 3 4
/// 4 5 6 D   <-   Q W E R
/// 7 8 9 E        A S D F
/// A 0 B F        Z X C V
/// ```
pub const KEY_MAP: [(Key, u8); KEY_COUNT] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

pub fn key_to_num(key: Key) -> Option<u8> {
    KEY_MAP
        .iter()
        .find(|(physical, _)| *physical == key)
        .map(|(_, num)| *num)
}

/// Pressed state of the 16 logical keys.
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    fn index(n: u8) -> Result<usize> {
        if (n as usize) < KEY_COUNT {
            Ok(n as usize)
        } else {
            Err(Chip8Error::InvalidKeyIndex { key: n })
        }
    }

    pub fn update_key(&mut self, n: u8, pressed: bool) -> Result<()> {
        self.keys[Self::index(n)?] = pressed;
        Ok(())
    }

    pub fn get_key_status_from_num(&self, n: u8) -> Result<bool> {
        Ok(self.keys[Self::index(n)?])
    }
}

use minifb::{Key, KeyRepeat, WindowOptions};

use crate::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    error::{Chip8Error, Result},
    host::{HostEvent, Input, Screen},
    keyboard::key_to_num,
};

const OFF: u32 = from_u8_rgb(0, 0, 0);
const ON: u32 = from_u8_rgb(0, 127, 255);

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

pub struct Window {
    window: minifb::Window,
    pixel_buffer: Vec<u32>,
    scale: usize,
}

impl Window {
    pub fn new(title: &str, scale: usize) -> Result<Self> {
        let scale = scale.max(1);
        let mut window = minifb::Window::new(
            title,
            WIDTH * scale,
            HEIGHT * scale,
            WindowOptions::default(),
        )
        .map_err(|e| Chip8Error::Display(e.to_string()))?;
        window.set_position(500, 300);
        Ok(Self {
            window,
            pixel_buffer: vec![OFF; WIDTH * HEIGHT * scale * scale],
            scale,
        })
    }
}

/// Blows the 64x32 grid up into a `scale`-times larger pixel buffer.
pub fn scale_into(fb: &FrameBuffer, scale: usize, pixels: &mut [u32]) {
    let row_len = WIDTH * scale;
    for (y, row) in fb.rows().iter().enumerate() {
        for (x, lit) in row.iter().enumerate() {
            let colour = if *lit { ON } else { OFF };
            for dy in 0..scale {
                let start = (y * scale + dy) * row_len + x * scale;
                pixels[start..start + scale].fill(colour);
            }
        }
    }
}

impl Screen for Window {
    fn present(&mut self, fb: &FrameBuffer) -> Result<()> {
        scale_into(fb, self.scale, &mut self.pixel_buffer);
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH * self.scale, HEIGHT * self.scale)
            .map_err(|e| Chip8Error::Display(e.to_string()))
    }
}

impl Input for Window {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>> {
        self.window.update();

        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return Ok(vec![HostEvent::Quit]);
        }

        let pressed = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(key_to_num)
            .map(HostEvent::KeyDown);
        let released = self
            .window
            .get_keys_released()
            .into_iter()
            .filter_map(key_to_num)
            .map(HostEvent::KeyUp);
        Ok(pressed.chain(released).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_fills_blocks() {
        let mut fb = FrameBuffer::new();
        fb.set(1, 0, true);
        let scale = 3;
        let mut pixels = vec![OFF; WIDTH * HEIGHT * scale * scale];
        scale_into(&fb, scale, &mut pixels);

        let row_len = WIDTH * scale;
        for dy in 0..scale {
            assert_eq!(pixels[dy * row_len + 2], OFF);
            for dx in 3..6 {
                assert_eq!(pixels[dy * row_len + dx], ON);
            }
            assert_eq!(pixels[dy * row_len + 6], OFF);
        }
        assert_eq!(pixels[scale * row_len + 3], OFF);
        assert_eq!(pixels.iter().filter(|p| **p == ON).count(), 9);
    }
}

use std::fmt;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome grid. Presentation lives elsewhere (see `window`).
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: [[bool; WIDTH]; HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [[false; WIDTH]; HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [[false; WIDTH]; HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[y % HEIGHT][x % WIDTH]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.bit_buffer[y % HEIGHT][x % WIDTH] = on;
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.bit_buffer
    }

    pub fn lit(&self) -> usize {
        self.bit_buffer.iter().flatten().filter(|p| **p).count()
    }

    /// XOR `sprite` (one byte per row, MSB leftmost) onto a copy of the grid
    /// at (x, y), wrapping on both axes. The flag is set when any lit pixel
    /// was switched off.
    pub fn draw(&self, x: u8, y: u8, sprite: &[u8]) -> (FrameBuffer, bool) {
        let mut next = self.clone();
        let mut collided = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                if (row >> (7 - j)) & 1 == 0 {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let pixel = &mut next.bit_buffer[ny][nx];
                if *pixel {
                    collided = true;
                }
                *pixel = !*pixel;
            }
        }
        (next, collided)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.bit_buffer.iter() {
            let line: String = row.iter().map(|p| if *p { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameBuffer({} lit)", self.lit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_sets_pixels_msb_first() {
        let (fb, collided) = FrameBuffer::new().draw(0, 0, &[0b1010_0000]);
        assert!(!collided);
        assert!(fb.get(0, 0));
        assert!(!fb.get(1, 0));
        assert!(fb.get(2, 0));
        assert_eq!(fb.lit(), 2);
    }

    #[test]
    fn drawing_twice_restores_and_reports_collision() {
        let mut start = FrameBuffer::new();
        start.set(2, 4, true);
        let sprite = [0xF0, 0x90, 0xF0];

        let (once, first) = start.draw(2, 3, &sprite);
        let (twice, second) = once.draw(2, 3, &sprite);
        assert_eq!(twice, start);
        assert!(first);
        assert_eq!(first, second);
    }

    #[test]
    fn wraps_on_both_axes() {
        let (fb, _) = FrameBuffer::new().draw(63, 31, &[0xFF]);
        for x in [63, 0, 1, 2, 3, 4, 5, 6] {
            assert!(fb.get(x, 31), "column {x}");
        }
        assert!(!fb.get(7, 31));
        assert_eq!(fb.lit(), 8);

        let (fb, _) = FrameBuffer::new().draw(0, 31, &[0x80, 0x80]);
        assert!(fb.get(0, 31));
        assert!(fb.get(0, 0));
    }

    #[test]
    fn origin_beyond_the_grid_wraps_too() {
        let (fb, _) = FrameBuffer::new().draw(64 + 5, 32 + 2, &[0x80]);
        assert!(fb.get(5, 2));
    }

    #[test]
    fn clear_turns_everything_off() {
        let (mut fb, _) = FrameBuffer::new().draw(10, 10, &[0xFF; 15]);
        assert_eq!(fb.lit(), 120);
        fb.clear_buffer();
        assert_eq!(fb.lit(), 0);
    }

    #[test]
    fn renders_as_text() {
        let (fb, _) = FrameBuffer::new().draw(0, 0, &[0xC0]);
        let text = fb.to_string();
        assert_eq!(text.lines().count(), HEIGHT);
        assert!(text.starts_with("##.."));
    }
}

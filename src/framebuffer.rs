use std::sync::{Arc, PoisonError, RwLock};

pub const CHIP8_SCREEN_WIDTH: usize = 64;
pub const CHIP8_SCREEN_HEIGHT: usize = 32;

/// Monochrome pixel grid. Row-major, one bool per pixel; every coordinate
/// wraps, so there is no such thing as an off-screen pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(CHIP8_SCREEN_WIDTH, CHIP8_SCREEN_HEIGHT)
    }
}

impl Framebuffer {
    /// panics if either dimension is zero
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "Framebuffer needs a non-zero size");
        Framebuffer {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }

    /// read a pixel; coordinates wrap
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[self.offset(x, y)]
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// XOR a sprite in, one byte per row, msb leftmost. Returns true if any
    /// pixel that was on got switched off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let (x, y) = (x % self.width, y % self.height);
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for col in 0..8 {
                if (byte >> (7 - col)) & 1 == 0 {
                    continue;
                }
                let px = self.offset(x + col, y + row);
                collision |= self.pixels[px];
                self.pixels[px] = !self.pixels[px];
            }
        }
        collision
    }

    /// rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width)
    }

    /// (x, y) of every lit pixel
    pub fn lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(move |(i, _)| (i % w, i / w))
    }
}

/// Read-only handle on the interpreter's framebuffer for whoever draws it.
///
/// The renderer can run on another thread at its own pace; a snapshot taken
/// between two sprite draws is a torn frame, not a data race.
#[derive(Clone)]
pub struct FrameReader {
    inner: Arc<RwLock<Framebuffer>>,
}

impl FrameReader {
    pub(crate) fn new(inner: Arc<RwLock<Framebuffer>>) -> Self {
        FrameReader { inner }
    }

    /// copy of the whole grid as it is right now
    pub fn snapshot(&self) -> Framebuffer {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let fb = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        (fb.width(), fb.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let fb = Framebuffer::default();
        assert_eq!((fb.width(), fb.height()), (64, 32));
        assert_eq!(fb.lit().count(), 0);
    }

    #[test]
    fn test_draw_msb_first() {
        let mut fb = Framebuffer::default();
        assert!(!fb.draw_sprite(0, 0, &[0b1000_0001]));
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(7, 0));
        assert_eq!(fb.lit().collect::<Vec<_>>(), vec![(0, 0), (7, 0)]);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(3, 3, &[0xff]);
        let before = fb.clone();
        let sprite = [0xf0, 0x90, 0xf0];
        assert!(!fb.draw_sprite(10, 4, &sprite));
        assert!(fb.draw_sprite(10, 4, &sprite));
        assert_eq!(fb, before);
    }

    #[test]
    fn test_collision_only_on_clear() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(0, 0, &[0b1100_0000]);
        // overlaps nothing that's lit
        assert!(!fb.draw_sprite(2, 0, &[0b1000_0000]));
        // switches (0, 0) off
        assert!(fb.draw_sprite(0, 0, &[0b1000_0000]));
        assert!(!fb.pixel(0, 0));
        assert!(fb.pixel(1, 0));
    }

    #[test]
    fn test_wraps_horizontally() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(63, 0, &[0b1110_0000]);
        assert!(fb.pixel(63, 0));
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(1, 0));
        assert_eq!(fb.lit().count(), 3);
    }

    #[test]
    fn test_wraps_vertically() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(5, 31, &[0x80, 0x80, 0x80]);
        assert!(fb.pixel(5, 31));
        assert!(fb.pixel(5, 0));
        assert!(fb.pixel(5, 1));
    }

    #[test]
    fn test_coordinates_beyond_screen_wrap() {
        let mut fb = Framebuffer::default();
        fb.draw_sprite(64 + 2, 32 + 1, &[0x80]);
        assert!(fb.pixel(2, 1));
        assert!(fb.pixel(66, 33));
    }

    #[test]
    fn test_coordinates_near_usize_max_wrap() {
        let mut fb = Framebuffer::default();
        assert!(!fb.draw_sprite(usize::MAX, usize::MAX, &[0xc0, 0xc0]));
        // usize::MAX is 63 mod 64 and 31 mod 32
        assert!(fb.pixel(63, 31));
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(63, 0));
        assert!(fb.pixel(0, 0));
        assert_eq!(fb.lit().count(), 4);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new(8, 4);
        fb.draw_sprite(0, 0, &[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(fb.lit().count(), 32);
        fb.clear();
        assert!(fb.rows().all(|row| row.iter().all(|p| !p)));
    }

    #[test]
    fn test_reader_snapshot() {
        let shared = Arc::new(RwLock::new(Framebuffer::default()));
        let reader = FrameReader::new(Arc::clone(&shared));
        shared.write().unwrap().draw_sprite(1, 1, &[0x80]);
        let snap = reader.snapshot();
        assert!(snap.pixel(1, 1));
        assert_eq!(reader.dimensions(), (64, 32));
    }
}

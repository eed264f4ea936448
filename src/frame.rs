//! Fixed-size RGB surface the renderer draws into.

/// Frame width, in pixels
pub const FRAME_WIDTH: usize = 256;
/// Frame height, in pixels
pub const FRAME_HEIGHT: usize = 256;
/// Frame width, in tiles
pub const FRAME_TILE_WIDTH: usize = FRAME_WIDTH / 16;
/// Frame height, in tiles
pub const FRAME_TILE_HEIGHT: usize = FRAME_HEIGHT / 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// From a `0xRRGGBB` value, the upper byte is ignored.
    pub const fn from_u32(rgb: u32) -> Self {
        Rgb {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }
}

/// Row-major pixel buffer, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// `None` when out of bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Out of bounds pixels are clipped.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Fill a rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: Rgb) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.pixels[start + x.min(x_end)..start + x_end].fill(color);
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new(FRAME_WIDTH, FRAME_HEIGHT)
    }
}

#[cfg(test)]
mod frame_tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let frame = Frame::default();
        assert_eq!(frame.pixels().len(), 256 * 256);
        assert_eq!(FRAME_TILE_WIDTH, 16);
        assert_eq!(frame.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(frame.pixel(256, 0), None);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut frame = Frame::new(4, 3);
        let red = Rgb::from_u32(0xff0000);
        frame.fill_rect(2, 1, 10, 10, red);
        assert_eq!(frame.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(frame.pixel(2, 1), Some(red));
        assert_eq!(frame.pixel(3, 2), Some(red));
        assert_eq!(frame.pixel(3, 0), Some(Rgb::BLACK));

        let before = frame.clone();
        frame.fill_rect(5, 5, 1, 1, Rgb::new(0, 255, 0));
        assert_eq!(frame, before);
    }

    #[test]
    fn test_fill_rect_huge_size_does_not_overflow() {
        let mut frame = Frame::new(4, 3);
        let blue = Rgb::new(0, 0, 255);
        frame.fill_rect(1, 2, usize::MAX, usize::MAX, blue);
        assert_eq!(frame.pixel(0, 2), Some(Rgb::BLACK));
        assert_eq!(frame.pixel(1, 2), Some(blue));
        assert_eq!(frame.pixel(3, 2), Some(blue));
        assert_eq!(frame.pixel(3, 1), Some(Rgb::BLACK));

        frame.fill_rect(usize::MAX, usize::MAX, 2, 2, blue);
        assert_eq!(frame.pixels().iter().filter(|p| **p == blue).count(), 3);
    }
}

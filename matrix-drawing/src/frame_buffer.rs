use core::convert::Infallible;
use embedded_graphics::{Pixel, pixelcolor::Rgb888, prelude::*};

/// A full frame of panel pixels, stored row-major.
///
/// Writes outside of the frame are ignored and reads outside of it return black, so layouts
/// can draw text that runs off an edge without any extra checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb888::BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Rgb888 {
        self.index(x, y).map_or(Rgb888::BLACK, |i| self.pixels[i])
    }

    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Every pixel that is not black, in row-major order.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (Point, Rgb888)> + '_ {
        let width = self.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != Rgb888::BLACK)
            .map(move |(i, c)| (Point::new((i % width) as i32, (i / width) as i32), *c))
    }

    /// Text preview of the frame: bright pixels as full blocks, dim ones as shaded blocks.
    pub fn to_ascii_art(&self) -> String {
        let mut out = String::with_capacity(self.pixels.len() * 3 + self.height as usize);
        for (i, row) in self.pixels.chunks(self.width.max(1) as usize).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for c in row {
                let level = (c.r() as u16 + c.g() as u16 + c.b() as u16) / 3;
                out.push(match level {
                    0 => ' ',
                    1..=128 => '\u{2592}',
                    _ => '\u{2588}',
                });
            }
        }
        out
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

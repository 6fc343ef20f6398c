use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use log::*;
use matrix_drawing::FrameBuffer;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Something that can show a frame: real panel hardware or a stand-in.
///
/// Pixels set between two `present` calls only become visible on `present`.
pub trait DisplaySink {
    fn clear(&mut self);

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888);

    /// `level` is a percentage, values above 100 are treated as 100.
    fn set_brightness(&mut self, level: u8);

    fn present(&mut self) -> Result<(), SinkError>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        (**self).set_pixel(x, y, color)
    }

    fn set_brightness(&mut self, level: u8) {
        (**self).set_brightness(level)
    }

    fn present(&mut self) -> Result<(), SinkError> {
        (**self).present()
    }
}

/// Copies `frame` to `sink` and presents it. Black pixels are left to the preceding clear.
pub fn push_frame<S: DisplaySink + ?Sized>(
    sink: &mut S,
    frame: &FrameBuffer,
) -> Result<(), SinkError> {
    sink.clear();
    for (point, color) in frame.lit_pixels() {
        sink.set_pixel(point.x, point.y, color);
    }
    sink.present()
}

/// Stand-in panel used when no hardware is attached. Presented frames are logged as text at
/// debug level.
#[derive(Debug, Clone)]
pub struct SimPanel {
    staged: FrameBuffer,
    shown: FrameBuffer,
    brightness: u8,
    presents: usize,
}

impl SimPanel {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            staged: FrameBuffer::new(width, height),
            shown: FrameBuffer::new(width, height),
            brightness: 100,
            presents: 0,
        }
    }

    /// The most recently presented frame.
    pub fn shown(&self) -> &FrameBuffer {
        &self.shown
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn presents(&self) -> usize {
        self.presents
    }
}

impl DisplaySink for SimPanel {
    fn clear(&mut self) {
        self.staged.fill(Rgb888::BLACK);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        self.staged.set_pixel(x, y, color);
    }

    fn set_brightness(&mut self, level: u8) {
        let level = level.min(100);
        if level != self.brightness {
            info!("Simulated panel brightness set to {level}%");
        }
        self.brightness = level;
    }

    fn present(&mut self) -> Result<(), SinkError> {
        self.shown.clone_from(&self.staged);
        self.presents += 1;
        if log_enabled!(Level::Debug) {
            debug!(
                "Simulated panel frame {} at {}% brightness:\n{}",
                self.presents,
                self.brightness,
                self.shown.to_ascii_art()
            );
        }
        Ok(())
    }
}

impl OriginDimensions for SimPanel {
    fn size(&self) -> Size {
        self.shown.size()
    }
}

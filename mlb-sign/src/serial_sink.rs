use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use led_panel_sim::{DisplaySink, SinkError};
use log::*;
use matrix_drawing::FrameBuffer;
use std::io;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};

/// Marks the start of every frame sent to the panel controller.
pub const FRAME_MAGIC: [u8; 2] = [0xA5, 0x5A];
const HEADER_LEN: usize = FRAME_MAGIC.len() + 1 + 2 + 2;

/// Non-blocking write: returns how many bytes the port took, or `WouldBlock` when its
/// buffer is full.
pub trait PortWrite {
    fn write_frame(&mut self, bytes: &[u8]) -> io::Result<usize>;
}

impl PortWrite for SerialStream {
    fn write_frame(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.try_write(bytes)
    }
}

/// Encodes a frame for the panel controller: magic, brightness, width and height (both
/// little endian `u16`), then one RGB triple per pixel in row-major order.
pub fn encode_frame(frame: &FrameBuffer, brightness: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + frame.pixels().len() * 3);
    bytes.extend_from_slice(&FRAME_MAGIC);
    bytes.push(brightness);
    bytes.extend_from_slice(&(frame.width() as u16).to_le_bytes());
    bytes.extend_from_slice(&(frame.height() as u16).to_le_bytes());
    for pixel in frame.pixels() {
        bytes.extend_from_slice(&[pixel.r(), pixel.g(), pixel.b()]);
    }
    bytes
}

/// A panel controller attached to a serial port. Pixels are staged locally and the whole
/// frame is sent on `present`.
///
/// A frame is usually larger than the port's write buffer. Whatever the port doesn't take is
/// kept and sent first on the next `present`, so frames always reach the controller whole
/// and in order.
pub struct SerialPanel<W = SerialStream> {
    port: W,
    name: String,
    staged: FrameBuffer,
    brightness: u8,
    pending: Vec<u8>,
}

impl SerialPanel<SerialStream> {
    pub fn open(path: &str, baud_rate: u32, width: u32, height: u32) -> Result<Self, SinkError> {
        info!("Connecting to serial port {path} with baud rate {baud_rate}");
        let port = tokio_serial::new(path, baud_rate)
            .flow_control(FlowControl::None)
            .data_bits(DataBits::Eight)
            .parity(Parity::Even)
            .stop_bits(StopBits::One)
            .open_native_async()
            .map_err(io::Error::from)?;

        Ok(Self::with_port(port, path, width, height))
    }
}

impl<W: PortWrite> SerialPanel<W> {
    pub fn with_port(port: W, name: &str, width: u32, height: u32) -> Self {
        Self {
            port,
            name: name.to_string(),
            staged: FrameBuffer::new(width, height),
            brightness: 100,
            pending: Vec::new(),
        }
    }

    /// Writes as much of the pending bytes as the port takes right now. Returns `true` once
    /// nothing is left.
    fn flush_pending(&mut self) -> io::Result<bool> {
        while !self.pending.is_empty() {
            match self.port.write_frame(&self.pending) {
                Ok(0) => break,
                Ok(written) => {
                    self.pending.drain(..written.min(self.pending.len()));
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    self.pending.clear();
                    return Err(e);
                }
            }
        }
        Ok(self.pending.is_empty())
    }
}

impl<W: PortWrite> DisplaySink for SerialPanel<W> {
    fn clear(&mut self) {
        self.staged.fill(Rgb888::BLACK);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        self.staged.set_pixel(x, y, color);
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(100);
    }

    fn present(&mut self) -> Result<(), SinkError> {
        let sent = match self.flush_pending() {
            Ok(true) => {
                self.pending = encode_frame(&self.staged, self.brightness);
                self.flush_pending()
            }
            Ok(false) => {
                debug!("{} is still receiving the previous frame, skipping", self.name);
                return Ok(());
            }
            Err(e) => Err(e),
        };

        match sent {
            Ok(true) => Ok(()),
            Ok(false) => {
                trace!("{} bytes queued for {}", self.pending.len(), self.name);
                Ok(())
            }
            Err(e) => {
                error!("Error writing to {}: {e:?}", self.name);
                Err(e.into())
            }
        }
    }
}

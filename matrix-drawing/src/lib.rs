//! Turns decoded slides into pixels for a 64x32 RGB panel.

pub mod color_policy;
pub mod drawing;
pub mod frame_buffer;
pub mod pages;
pub mod time_format;

pub use drawing::SlideRenderer;
pub use frame_buffer::FrameBuffer;
pub use time_format::{ClockFormatter, TimeFormatter};

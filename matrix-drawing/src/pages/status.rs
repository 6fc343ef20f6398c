use super::{draw_centered, height};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use fonts::GLYPH_HEIGHT;

pub const LINE_GAP: i32 = 2;

/// Draws each line centered horizontally, with the whole block centered vertically.
pub fn draw_lines<D>(display: &mut D, lines: &[&str], color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let count = lines.len() as i32;
    if count == 0 {
        return Ok(());
    }

    let block = count * GLYPH_HEIGHT as i32 + (count - 1) * LINE_GAP;
    let mut y = (height(display) - block) / 2;
    for line in lines {
        draw_centered(display, line, y, color)?;
        y += GLYPH_HEIGHT as i32 + LINE_GAP;
    }
    Ok(())
}

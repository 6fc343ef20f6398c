#![cfg_attr(not(test), no_std)]

//! A tiny bitmap font sized for 64x32 panels.
//!
//! Every glyph is five rows tall. Most glyphs are three columns wide, punctuation that only
//! needs a single column (`.` and `:`) is one column wide. Lookups are case-insensitive.

use embedded_graphics::{Pixel, pixelcolor::PixelColor, prelude::*};

pub mod font_3x5;

pub use font_3x5::{GLYPH_HEIGHT, Glyph, glyph};

/// Horizontal pixels between two glyphs.
pub const LETTER_SPACING: i32 = 1;

/// Cursor advance used for characters that have no glyph. Nothing is drawn for them.
pub const PLACEHOLDER_ADVANCE: i32 = 4;

fn advance(c: char) -> i32 {
    glyph(c).map_or(PLACEHOLDER_ADVANCE, Glyph::advance)
}

/// Width in pixels that `text` occupies when drawn, without the spacing after the last
/// character.
pub fn measure(text: &str) -> i32 {
    let total: i32 = text.chars().map(advance).sum();
    (total - LETTER_SPACING).max(0)
}

/// Draws `text` with its top left corner at (`x`, `y`) and returns the cursor position just
/// after the last character, so labels and values can be chained.
///
/// Pixels that fall outside of `target` are left to the target to clip.
pub fn draw_text<D, C>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    color: C,
) -> Result<i32, D::Error>
where
    D: DrawTarget<Color = C>,
    C: PixelColor,
{
    let mut cursor = x;
    for c in text.chars() {
        match glyph(c) {
            Some(g) => {
                target.draw_iter(g.points(Point::new(cursor, y)).map(|p| Pixel(p, color)))?;
                cursor += g.advance();
            }
            None => cursor += PLACEHOLDER_ADVANCE,
        }
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{mock_display::MockDisplay, pixelcolor::Rgb888};

    fn lit(display: &MockDisplay<Rgb888>) -> usize {
        let area = display.affected_area();
        area.points().filter(|p| display.get_pixel(*p).is_some()).count()
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure(""), 0);
        assert_eq!(measure("1"), 3);
        assert_eq!(measure("HOU"), 11);
        assert_eq!(measure("90-72"), 19);
        assert_eq!(measure("7:05"), 13);
        assert_eq!(measure("hou"), measure("HOU"));
    }

    #[test]
    fn test_measure_unsupported() {
        assert_eq!(measure("H?U") - measure("HU"), PLACEHOLDER_ADVANCE);
        assert_eq!(measure("H\u{e9}U") - measure("HU"), PLACEHOLDER_ADVANCE);
    }

    #[test]
    fn test_measure_matches_drawn_extent() {
        let mut display = MockDisplay::new();
        let end = draw_text(&mut display, "HOU", 0, 0, Rgb888::WHITE).unwrap();

        let area = display.affected_area();
        assert_eq!(area.top_left, Point::new(0, 0));
        assert_eq!(area.size.width as i32, measure("HOU"));
        assert_eq!(area.size.height, GLYPH_HEIGHT as u32);
        assert_eq!(end, measure("HOU") + LETTER_SPACING);
    }

    #[test]
    fn test_unsupported_draws_nothing() {
        let mut with_gap = MockDisplay::new();
        let end = draw_text(&mut with_gap, "H?U", 0, 0, Rgb888::WHITE).unwrap();
        assert_eq!(end, 4 + 4 + 4);

        let mut without_gap = MockDisplay::new();
        draw_text(&mut without_gap, "HU", 0, 0, Rgb888::WHITE).unwrap();

        assert_eq!(lit(&with_gap), lit(&without_gap));
        assert_eq!(with_gap.affected_area().size.width as i32, measure("H?U"));
        for y in 0..GLYPH_HEIGHT as i32 {
            for x in 4..8 {
                assert_eq!(with_gap.get_pixel(Point::new(x, y)), None);
            }
        }
    }

    #[test]
    fn test_draw_offset() {
        let mut display = MockDisplay::new();
        let end = draw_text(&mut display, "1", 5, 7, Rgb888::RED).unwrap();
        assert_eq!(end, 9);
        assert_eq!(display.get_pixel(Point::new(5, 7)), Some(Rgb888::RED));
        assert_eq!(display.affected_area().top_left, Point::new(5, 7));
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let mut lower = MockDisplay::new();
        draw_text(&mut lower, "nyy", 0, 0, Rgb888::WHITE).unwrap();
        let mut upper = MockDisplay::new();
        draw_text(&mut upper, "NYY", 0, 0, Rgb888::WHITE).unwrap();
        lower.assert_eq(&upper);
    }
}

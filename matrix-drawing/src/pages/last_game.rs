use super::{LABEL, TEXT, draw_right_aligned, draw_rule, width};
use crate::color_policy::{GAME_MIN_BRIGHTNESS, resolve};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use fonts::{GLYPH_HEIGHT, draw_text, measure};
use sign_common::slides::{BoxScoreRow, LastGameSlide};

pub const LABEL_WIDTH: i32 = 22;
pub const COLUMN_WIDTH: i32 = 14;
pub const COLUMN_HEADERS: [&str; 3] = ["H", "R", "E"];

pub const TITLE_Y: i32 = 0;
pub const HEADER_Y: i32 = 7;
pub const FIRST_RULE_Y: i32 = 13;
pub const AWAY_Y: i32 = 15;
pub const SECOND_RULE_Y: i32 = 21;
pub const HOME_Y: i32 = 23;
pub const COLUMN_RULE_TOP: i32 = 6;
pub const COLUMN_RULE_BOTTOM: i32 = HOME_Y + GLYPH_HEIGHT as i32;

/// Left edge of numeric column `index`, which is also where its separator is drawn.
pub fn column_x(index: usize) -> i32 {
    LABEL_WIDTH + COLUMN_WIDTH * index as i32
}

/// Where `text` starts when centered in the space to the right of the column's separator.
pub fn centered_in_column(index: usize, text: &str) -> i32 {
    column_x(index) + (COLUMN_WIDTH - measure(text) + 1) / 2
}

fn draw_team_row<D>(display: &mut D, row: &BoxScoreRow, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let color = resolve(row.colors.as_ref(), GAME_MIN_BRIGHTNESS);
    draw_text(display, &row.abbreviation, 1, y, color)?;

    for (i, value) in [row.hits, row.runs, row.errors].iter().enumerate() {
        let text = value.to_string();
        draw_text(display, &text, centered_in_column(i, &text), y, TEXT)?;
    }
    Ok(())
}

pub fn draw<D>(display: &mut D, slide: &LastGameSlide, date: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let right = width(display) - 1;

    draw_text(display, date, 1, TITLE_Y, LABEL)?;
    draw_right_aligned(display, "FINAL", right - 1, TITLE_Y, TEXT)?;

    for (i, header) in COLUMN_HEADERS.iter().enumerate() {
        draw_text(display, header, centered_in_column(i, header), HEADER_Y, LABEL)?;
    }

    for y in [FIRST_RULE_Y, SECOND_RULE_Y] {
        draw_rule(display, Point::new(0, y), Point::new(right, y))?;
    }
    for i in 0..COLUMN_HEADERS.len() {
        let x = column_x(i);
        draw_rule(
            display,
            Point::new(x, COLUMN_RULE_TOP),
            Point::new(x, COLUMN_RULE_BOTTOM),
        )?;
    }

    draw_team_row(display, &slide.away, AWAY_Y)?;
    draw_team_row(display, &slide.home, HOME_Y)
}

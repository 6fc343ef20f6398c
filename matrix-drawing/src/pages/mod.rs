//! Per-slide layouts. Each `draw` assumes the target has already been cleared.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};
use fonts::{draw_text, measure};

pub mod last_game;
pub mod next_game;
pub mod standings;
pub mod status;

pub(crate) const TEXT: Rgb888 = Rgb888::WHITE;
pub(crate) const LABEL: Rgb888 = Rgb888::new(200, 200, 200);
pub(crate) const RULE: Rgb888 = Rgb888::new(80, 80, 80);
pub(crate) const ALERT: Rgb888 = Rgb888::new(255, 170, 0);

pub(crate) fn width<D: DrawTarget>(display: &D) -> i32 {
    display.bounding_box().size.width as i32
}

pub(crate) fn height<D: DrawTarget>(display: &D) -> i32 {
    display.bounding_box().size.height as i32
}

/// Draws `text` so that its last lit column lands on `right`.
pub(crate) fn draw_right_aligned<D>(
    display: &mut D,
    text: &str,
    right: i32,
    y: i32,
    color: Rgb888,
) -> Result<i32, D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    draw_text(display, text, right - measure(text) + 1, y, color)
}

pub(crate) fn draw_centered<D>(
    display: &mut D,
    text: &str,
    y: i32,
    color: Rgb888,
) -> Result<i32, D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let x = (width(display) - measure(text)) / 2;
    draw_text(display, text, x, y, color)
}

pub(crate) fn draw_rule<D>(display: &mut D, start: Point, end: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Line::new(start, end)
        .into_styled(PrimitiveStyle::with_stroke(RULE, 1))
        .draw(display)
}

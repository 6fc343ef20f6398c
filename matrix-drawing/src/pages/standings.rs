use super::{LABEL, TEXT, draw_right_aligned, width};
use crate::color_policy::{STANDINGS_MIN_BRIGHTNESS, resolve};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use fonts::draw_text;
use sign_common::slides::StandingsSlide;

/// Rows beyond this are not shown.
pub const MAX_ROWS: usize = 5;
pub const LINE_HEIGHT: i32 = 6;
pub const TOP: i32 = 1;
pub const LEFT: i32 = 1;
/// Pixels between the end of the rank and the team abbreviation.
pub const RANK_GAP: i32 = 2;

pub fn draw<D>(display: &mut D, slide: &StandingsSlide) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let right = width(display) - 2;

    for (i, team) in slide.teams.iter().take(MAX_ROWS).enumerate() {
        let y = TOP + i as i32 * LINE_HEIGHT;

        let cursor = draw_text(display, &team.rank.to_string(), LEFT, y, TEXT)?;
        let color = resolve(team.colors.as_ref(), STANDINGS_MIN_BRIGHTNESS);
        draw_text(display, &team.abbreviation, cursor + RANK_GAP, y, color)?;
        draw_right_aligned(display, &team.record(), right, y, LABEL)?;
    }

    Ok(())
}

use super::{LABEL, TEXT, draw_centered};
use crate::color_policy::{GAME_MIN_BRIGHTNESS, resolve};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use fonts::draw_text;
use sign_common::slides::{NextGameSlide, TeamRef};

pub const ROW_Y: [i32; 4] = [1, 9, 17, 25];
pub const LEFT: i32 = 1;
pub const WORD_GAP: i32 = 2;

/// Prefix for the opponent row: home games are "VS", road games are "AT".
pub fn matchup_prefix(is_home: bool) -> &'static str {
    if is_home { "VS" } else { "AT" }
}

fn team_color(team: &TeamRef) -> Rgb888 {
    resolve(team.colors.as_ref(), GAME_MIN_BRIGHTNESS)
}

pub fn draw<D>(
    display: &mut D,
    slide: &NextGameSlide,
    time: &str,
    date: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let cursor = draw_text(
        display,
        &slide.team.abbreviation,
        LEFT,
        ROW_Y[0],
        team_color(&slide.team),
    )?;
    draw_text(display, "NEXT", cursor + WORD_GAP, ROW_Y[0], LABEL)?;

    let cursor = draw_text(display, matchup_prefix(slide.is_home), LEFT, ROW_Y[1], LABEL)?;
    draw_text(
        display,
        &slide.opponent.abbreviation,
        cursor + WORD_GAP,
        ROW_Y[1],
        team_color(&slide.opponent),
    )?;

    draw_centered(display, time, ROW_Y[2], TEXT)?;
    draw_centered(display, date, ROW_Y[3], TEXT)?;
    Ok(())
}

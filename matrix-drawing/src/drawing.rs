use crate::{
    pages::{self, ALERT, TEXT},
    time_format::{ClockFormatter, TimeFormatter},
};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use log::debug;
use sign_common::{slides::Slide, timezone::Timezone};

/// Draws slides and status frames onto any RGB target. Every call starts from a cleared
/// target, so the result never depends on what was drawn before.
#[derive(Debug, Clone)]
pub struct SlideRenderer<T = ClockFormatter> {
    formatter: T,
    timezone: Timezone,
}

impl SlideRenderer<ClockFormatter> {
    pub fn new(timezone: impl Into<Timezone>) -> Self {
        Self::with_formatter(ClockFormatter, timezone)
    }
}

impl<T: TimeFormatter> SlideRenderer<T> {
    pub fn with_formatter(formatter: T, timezone: impl Into<Timezone>) -> Self {
        Self {
            formatter,
            timezone: timezone.into(),
        }
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Game times are shown in this zone, at the offset in effect on the game's date.
    pub fn set_timezone(&mut self, timezone: impl Into<Timezone>) {
        self.timezone = timezone.into();
    }

    pub fn render<D>(&self, slide: &Slide, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        display.clear(Rgb888::BLACK)?;

        match slide {
            Slide::Standings(standings) => pages::standings::draw(display, standings),
            Slide::LastGame(game) => {
                let offset = self.timezone.offset_at(game.game_date);
                let date = self.formatter.format_date(game.game_date, offset);
                pages::last_game::draw(display, game, &date)
            }
            Slide::NextGame(game) => {
                let offset = self.timezone.offset_at(game.game_date);
                let time = self.formatter.format_time(game.game_date, offset);
                let date = self.formatter.format_date(game.game_date, offset);
                pages::next_game::draw(display, game, &time, &date)
            }
            Slide::Unknown(unknown) => {
                debug!("No layout for slide type {:?}", unknown.slide_type);
                pages::status::draw_lines(display, &["UNKNOWN", "SLIDE"], ALERT)
            }
        }
    }

    pub fn render_loading<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        display.clear(Rgb888::BLACK)?;
        pages::status::draw_lines(display, &["LOADING"], TEXT)
    }

    /// Two-line status frame, e.g. `OFFLINE` / `RETRYING`.
    pub fn render_status<D>(
        &self,
        display: &mut D,
        line1: &str,
        line2: &str,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        display.clear(Rgb888::BLACK)?;
        pages::status::draw_lines(display, &[line1, line2], ALERT)
    }
}

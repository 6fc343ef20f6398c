use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use sign_common::slides::TeamColors;

/// Minimum perceived brightness for team abbreviations on the standings slide.
pub const STANDINGS_MIN_BRIGHTNESS: f32 = 60.0;

/// Minimum perceived brightness for team abbreviations on game slides.
pub const GAME_MIN_BRIGHTNESS: f32 = 90.0;

/// Parses `#RRGGBB` (the `#` is optional). Channels that are missing or malformed read as 0.
pub fn parse_hex(hex: &str) -> Rgb888 {
    let digits = hex.trim().trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i * 2..i * 2 + 2)
            .filter(|s| s.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    Rgb888::new(channel(0), channel(1), channel(2))
}

/// Perceived brightness on a 0-255 scale.
pub fn brightness(color: Rgb888) -> f32 {
    0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32
}

fn scale_to(color: Rgb888, target: f32) -> Rgb888 {
    let factor = target / brightness(color);
    let scale = |v: u8| (v as f32 * factor).round().clamp(0.0, 255.0) as u8;
    Rgb888::new(scale(color.r()), scale(color.g()), scale(color.b()))
}

fn is_black(color: Rgb888) -> bool {
    color == Rgb888::BLACK
}

/// Picks a color for a team that stays readable on a black panel.
///
/// The primary color wins if it is bright enough, then the secondary. Otherwise the first
/// non-black of the two is scaled up to `min_brightness` (channels clamp at 255), and if both
/// are black a neutral gray of that brightness is used. Teams without colors are drawn white.
pub fn resolve(colors: Option<&TeamColors>, min_brightness: f32) -> Rgb888 {
    let Some(colors) = colors else {
        return Rgb888::WHITE;
    };

    let primary = parse_hex(&colors.primary);
    let secondary = parse_hex(&colors.secondary);

    if brightness(primary) >= min_brightness {
        primary
    } else if brightness(secondary) >= min_brightness {
        secondary
    } else if let Some(base) = [primary, secondary].into_iter().find(|c| !is_black(*c)) {
        scale_to(base, min_brightness)
    } else {
        let level = min_brightness.round().clamp(0.0, 255.0) as u8;
        Rgb888::new(level, level, level)
    }
}

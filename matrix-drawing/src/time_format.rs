use log::warn;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

const CLOCK_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");
const SHORT_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none]");

/// Turns game timestamps into the short strings the panel has room for.
pub trait TimeFormatter {
    /// Time of day, e.g. `7:05 PM`.
    fn format_time(&self, timestamp: OffsetDateTime, offset: UtcOffset) -> String;

    /// Month and day, e.g. `SEP 14`.
    fn format_date(&self, timestamp: OffsetDateTime, offset: UtcOffset) -> String;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClockFormatter;

fn format_upper(
    timestamp: OffsetDateTime,
    offset: UtcOffset,
    description: &[BorrowedFormatItem<'_>],
) -> String {
    let Some(local) = timestamp.checked_to_offset(offset) else {
        warn!("{timestamp} is out of range at offset {offset}");
        return String::new();
    };
    match local.format(description) {
        Ok(s) => s.to_uppercase(),
        Err(e) => {
            warn!("Failed to format {timestamp}: {e}");
            String::new()
        }
    }
}

impl TimeFormatter for ClockFormatter {
    fn format_time(&self, timestamp: OffsetDateTime, offset: UtcOffset) -> String {
        format_upper(timestamp, offset, CLOCK_TIME)
    }

    fn format_date(&self, timestamp: OffsetDateTime, offset: UtcOffset) -> String {
        format_upper(timestamp, offset, SHORT_DATE)
    }
}

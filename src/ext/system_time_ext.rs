use std::time::SystemTime;

use time::{Duration, OffsetDateTime, UtcOffset, macros::format_description};

pub trait SystemTimeExt {
    /// Formats as `yyyy-MM-dd hh:mm:ss` in the local timezone, falling back
    /// to UTC when the local offset cannot be determined.
    ///
    /// Times outside the years -9999..=9999 format as an empty string.
    fn to_display_string(&self) -> String;

    fn to_display_string_at(&self, offset: UtcOffset) -> String;
}

impl SystemTimeExt for SystemTime {
    fn to_display_string(&self) -> String {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        self.to_display_string_at(offset)
    }

    fn to_display_string_at(&self, offset: UtcOffset) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let epoch = OffsetDateTime::UNIX_EPOCH.to_offset(offset);
        let date_time = match self.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => Duration::try_from(after)
                .ok()
                .and_then(|after| epoch.checked_add(after)),
            Err(e) => Duration::try_from(e.duration())
                .ok()
                .and_then(|before| epoch.checked_sub(before)),
        };

        date_time
            .and_then(|date_time| date_time.format(&format).ok())
            .unwrap_or_default()
    }
}

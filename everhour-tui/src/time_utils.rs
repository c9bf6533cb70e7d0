use time::macros::format_description;
use time::UtcOffset;

pub fn to_local_time(dt: time::OffsetDateTime) -> time::OffsetDateTime {
    if let Ok(local_offset) = UtcOffset::current_local_offset() {
        dt.to_offset(local_offset)
    } else {
        dt
    }
}

/// `HH:MM` in local time, for "started at" labels.
pub fn format_clock(dt: time::OffsetDateTime) -> String {
    to_local_time(dt)
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

//! Rendering helpers for durations measured in seconds.

use std::collections::HashMap;

/// `"{h}h {m}m"`, truncating. Missing or NaN input renders as `"0h 0m"`.
pub fn format_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if !s.is_nan() => format_seconds(s.max(0.0) as i64),
        _ => "0h 0m".to_string(),
    }
}

/// Same as [`format_time`] for whole seconds. Negative input is clamped to zero.
pub fn format_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

/// Format a running duration as HH:MM:SS
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Total of a per-user seconds mapping; the user ids are ignored.
pub fn sum_per_user_seconds(users: Option<&HashMap<String, i64>>) -> i64 {
    users.map(|users| users.values().sum()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_time(Some(0.0)), "0h 0m");
        assert_eq!(format_time(Some(3661.0)), "1h 1m");
        assert_eq!(format_time(Some(59.9)), "0h 0m");
        assert_eq!(format_seconds(7 * 3600 + 59 * 60 + 59), "7h 59m");
    }

    #[test]
    fn missing_nan_and_negative_render_as_zero() {
        assert_eq!(format_time(None), "0h 0m");
        assert_eq!(format_time(Some(f64::NAN)), "0h 0m");
        assert_eq!(format_time(Some(-120.0)), "0h 0m");
        assert_eq!(format_seconds(-1), "0h 0m");
    }

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(3725), "01:02:05");
    }

    #[test]
    fn sums_user_seconds() {
        let users = HashMap::from([("a".to_string(), 60), ("b".to_string(), 90)]);
        assert_eq!(sum_per_user_seconds(Some(&users)), 150);
        assert_eq!(sum_per_user_seconds(None), 0);
    }
}

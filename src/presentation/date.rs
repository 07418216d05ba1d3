use chrono::{DateTime, Local, TimeZone};

use crate::config::DisplayConfig;

/// Renders a millisecond timestamp as a time of day when it falls on the
/// same local day as `now`, as a full date otherwise.
pub fn format_date_or_time(
    timestamp_ms: i64,
    now: DateTime<Local>,
    config: &DisplayConfig,
) -> String {
    let Some(date) = Local.timestamp_millis_opt(timestamp_ms).single() else {
        return String::new();
    };

    if date.date_naive() == now.date_naive() {
        date.format(&config.time_format).to_string()
    } else {
        date.format(&config.date_format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, hour, min, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_same_day_shows_time() {
        let now = at(2024, 3, 9, 18, 0);
        let sent = at(2024, 3, 9, 8, 5).timestamp_millis();
        assert_eq!(format_date_or_time(sent, now, &DisplayConfig::default()), "08:05");
    }

    #[test]
    fn test_other_day_shows_date() {
        let now = at(2024, 3, 9, 18, 0);
        let sent = at(2023, 12, 24, 8, 5).timestamp_millis();
        assert_eq!(
            format_date_or_time(sent, now, &DisplayConfig::default()),
            "24.12.2023"
        );

        let config = DisplayConfig {
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%I:%M %p".to_string(),
        };
        assert_eq!(format_date_or_time(sent, now, &config), "2023-12-24");
    }
}

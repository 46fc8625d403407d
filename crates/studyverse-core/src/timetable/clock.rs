//! 12-hour wall-clock parsing for slot `time` strings.
//!
//! Slot times are free-form display strings such as `"5:00 AM – 6:30 AM"`.
//! Only the `H:MM AM|PM` tokens inside them carry meaning; everything else
//! (separators, stray words) is ignored.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minutes in one day; also the implicit end of the last slot.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockToken {
    hour: u32,
    minute: u32,
    pm: bool,
}

impl ClockToken {
    fn to_minutes(self) -> Option<u32> {
        if !(1..=12).contains(&self.hour) || self.minute > 59 {
            return None;
        }
        let hour24 = match (self.hour, self.pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        Some(hour24 * 60 + self.minute)
    }
}

/// Start and optional end parsed out of a slot `time` string.
///
/// `start` is `None` when the string carries no usable token; such a slot
/// never becomes a resolver boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl TimeRange {
    pub fn parse(text: &str) -> Self {
        let bytes = text.as_bytes();
        let Some((first, next)) = scan_token(bytes, 0) else {
            return Self::default();
        };
        let end = scan_token(bytes, next).and_then(|(token, _)| token.to_minutes());
        Self {
            start: first.to_minutes(),
            end,
        }
    }
}

/// Minutes since midnight of the first `H:MM AM|PM` token in `text`.
///
/// The first token decides: if its hour is outside 1..=12 or its minute
/// outside 0..=59 the result is `None`.
pub fn parse_clock(text: &str) -> Option<u32> {
    scan_token(text.as_bytes(), 0).and_then(|(token, _)| token.to_minutes())
}

/// Minutes since midnight for a chrono time (seconds are dropped).
pub fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Render minutes since midnight as `H:MM AM|PM`.
pub fn format_clock(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    let hour24 = minutes / 60;
    let (hour, suffix) = match hour24 {
        0 => (12, "AM"),
        1..=11 => (hour24, "AM"),
        12 => (12, "PM"),
        _ => (hour24 - 12, "PM"),
    };
    format!("{}:{:02} {}", hour, minutes % 60, suffix)
}

/// Render a slot `time` string, `"5:00 AM – 6:30 AM"` or just the start.
pub fn format_range(start: u32, end: Option<u32>) -> String {
    match end {
        Some(end) => format!("{} – {}", format_clock(start), format_clock(end)),
        None => format_clock(start),
    }
}

/// `"{h}h {m}m"`, hour part omitted when zero.
pub fn format_remaining(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

fn scan_token(bytes: &[u8], from: usize) -> Option<(ClockToken, usize)> {
    (from..bytes.len()).find_map(|i| match_at(bytes, i, 2).or_else(|| match_at(bytes, i, 1)))
}

fn match_at(bytes: &[u8], i: usize, hour_len: usize) -> Option<(ClockToken, usize)> {
    let hour_digits = bytes.get(i..i + hour_len)?;
    if !hour_digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut pos = i + hour_len;
    if bytes.get(pos) != Some(&b':') {
        return None;
    }
    pos += 1;
    let minute_digits = bytes.get(pos..pos + 2)?;
    if !minute_digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    pos += 2;
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    let meridiem = bytes.get(pos..pos + 2)?;
    let pm = if meridiem.eq_ignore_ascii_case(b"AM") {
        false
    } else if meridiem.eq_ignore_ascii_case(b"PM") {
        true
    } else {
        return None;
    };
    let token = ClockToken {
        hour: digits_value(hour_digits),
        minute: digits_value(minute_digits),
        pm,
    };
    Some((token, pos + 2))
}

fn digits_value(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, d| acc * 10 + u32::from(d - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn twelve_hour_conversion_edges() {
        assert_eq!(parse_clock("12:00 AM"), Some(0));
        assert_eq!(parse_clock("12:00 PM"), Some(720));
        assert_eq!(parse_clock("1:00 AM"), Some(60));
        assert_eq!(parse_clock("1:00 PM"), Some(780));
        assert_eq!(parse_clock("11:59 PM"), Some(1439));
    }

    #[test]
    fn first_token_wins() {
        assert_eq!(parse_clock("5:00 AM – 6:30 AM"), Some(300));
        assert_eq!(parse_clock("from 9:15pm until late"), Some(21 * 60 + 15));
    }

    #[test]
    fn rejects_text_without_token() {
        assert_eq!(parse_clock("Morning"), None);
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("5:00"), None);
        assert_eq!(parse_clock("5:0 AM"), None);
    }

    #[test]
    fn out_of_range_first_token_is_invalid() {
        assert_eq!(parse_clock("13:00 PM"), None);
        assert_eq!(parse_clock("0:30 AM"), None);
        assert_eq!(parse_clock("7:75 AM"), None);
    }

    #[test]
    fn hour_digits_are_taken_from_the_right() {
        // "112:30 PM" contains the token "12:30 PM".
        assert_eq!(parse_clock("112:30 PM"), Some(750));
    }

    #[test]
    fn range_accepts_any_dash() {
        let en = TimeRange::parse("5:00 AM – 6:30 AM");
        let hyphen = TimeRange::parse("5:00 AM - 6:30 AM");
        let em = TimeRange::parse("5:00 AM—6:30 AM");
        let expected = TimeRange {
            start: Some(300),
            end: Some(390),
        };
        assert_eq!(en, expected);
        assert_eq!(hyphen, expected);
        assert_eq!(em, expected);
    }

    #[test]
    fn range_without_end() {
        let range = TimeRange::parse("10:00 PM");
        assert_eq!(range.start, Some(1320));
        assert_eq!(range.end, None);
    }

    #[test]
    fn format_clock_edges() {
        assert_eq!(format_clock(0), "12:00 AM");
        assert_eq!(format_clock(720), "12:00 PM");
        assert_eq!(format_clock(1439), "11:59 PM");
        assert_eq!(format_range(300, Some(390)), "5:00 AM – 6:30 AM");
    }

    #[test]
    fn format_remaining_omits_zero_hours() {
        assert_eq!(format_remaining(30), "30m");
        assert_eq!(format_remaining(0), "0m");
        assert_eq!(format_remaining(90), "1h 30m");
        assert_eq!(format_remaining(120), "2h 0m");
    }

    #[test]
    fn minutes_of_drops_seconds() {
        let t = NaiveTime::from_hms_opt(6, 0, 59).unwrap();
        assert_eq!(minutes_of(t), 360);
    }

    proptest! {
        #[test]
        fn every_valid_token_maps_into_the_day(hour in 1u32..=12, minute in 0u32..60, pm in any::<bool>()) {
            let text = format!("{}:{:02} {}", hour, minute, if pm { "PM" } else { "AM" });
            let minutes = parse_clock(&text).unwrap();
            prop_assert!(minutes < MINUTES_PER_DAY);
            prop_assert_eq!(minutes % 60, minute);
            prop_assert_eq!(minutes >= 720, pm);
            prop_assert_eq!(format_clock(minutes), text);
        }
    }
}

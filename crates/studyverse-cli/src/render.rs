//! Terminal rendering of resolver output.

use std::io::IsTerminal;

use studyverse_core::timetable::format_clock;
use studyverse_core::{activity_style, Resolution, Theme, UpcomingSlot};

/// Colour only when writing to a terminal and `NO_COLOR` is unset.
pub fn color_enabled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub fn status_line(
    resolution: &Resolution,
    upcoming: Option<&UpcomingSlot>,
    theme: Theme,
    color: bool,
) -> String {
    let style = activity_style(resolution.activity(), theme);
    let label = paint(resolution.activity(), style.color, color);
    let mut line = match resolution.current() {
        Some(current) => format!(
            "{} {}  {:.0}%  {} left",
            style.icon,
            label,
            current.progress_pct,
            current.remaining_label()
        ),
        None => format!("{} {}", style.icon, label),
    };
    if let Some(next) = upcoming {
        line.push_str(&format!(
            "  · next: {} at {}",
            next.activity,
            format_clock(next.start)
        ));
    }
    line
}

fn paint(text: &str, hex: &str, enabled: bool) -> String {
    match parse_hex(hex) {
        Some((r, g, b)) if enabled => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        _ => text.to_string(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

//! One-shot resolve of the active timetable.

use chrono::{Local, NaiveTime};
use clap::Args;
use studyverse_core::timetable::parse_clock;
use studyverse_core::{Config, LiveView, NullNotifier};

use super::{open_store, print_json, CliResult};
use crate::render::{color_enabled, status_line};

#[derive(Args)]
pub struct NowArgs {
    /// Resolve at this time instead of now ("6:00 AM" or "06:00")
    #[arg(long, value_parser = parse_time)]
    at: Option<NaiveTime>,
    /// Print the snapshot event as JSON
    #[arg(long)]
    json: bool,
}

/// Accepts 12-hour `H:MM AM|PM` or 24-hour `HH:MM`.
pub fn parse_time(text: &str) -> Result<NaiveTime, String> {
    if let Some(minutes) = parse_clock(text) {
        return NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
            .ok_or_else(|| format!("invalid time '{text}'"));
    }
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| format!("invalid time '{text}' (expected \"6:00 AM\" or \"06:00\")"))
}

pub fn run(args: NowArgs) -> CliResult {
    let store = open_store()?;
    let config = Config::load_or_default();
    let now = args.at.unwrap_or_else(|| Local::now().time());

    let mut view = LiveView::new(NullNotifier);
    let update = view.resolve_tick(store.get_active(), now);

    if args.json {
        return print_json(&update.snapshot);
    }

    println!(
        "{}",
        status_line(
            &update.resolution,
            update.upcoming.as_ref(),
            config.ui.theme,
            color_enabled()
        )
    );
    Ok(())
}

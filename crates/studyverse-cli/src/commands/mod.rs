pub mod config;
pub mod now;
pub mod slot;
pub mod theme;
pub mod timetable;
pub mod watch;

use studyverse_core::{Database, ScheduleIssue, TimetableStore};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_store() -> Result<TimetableStore<Database>, Box<dyn std::error::Error>> {
    Ok(TimetableStore::load(Database::open()?))
}

/// Position of the active timetable, or an error telling the user to pick one.
pub fn active_index(store: &TimetableStore<Database>) -> Result<usize, Box<dyn std::error::Error>> {
    store
        .active_id()
        .and_then(|id| store.position(id))
        .ok_or_else(|| "no active timetable; use 'timetable activate NAME' first".into())
}

pub fn print_issues(issues: &[ScheduleIssue]) {
    for issue in issues {
        eprintln!("warning: {issue}");
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

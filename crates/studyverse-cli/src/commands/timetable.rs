//! Timetable management commands for CLI.

use clap::Subcommand;
use serde::Serialize;
use studyverse_core::{validate, Slot};

use super::{open_store, print_issues, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimetableAction {
    /// List all timetables
    List,
    /// Show a timetable as JSON (the active one by default)
    Show {
        /// Timetable name
        name: Option<String>,
    },
    /// Add a timetable and make it active
    Add {
        /// Timetable name
        name: String,
        /// Schedule as a JSON array of slots
        #[arg(long)]
        schedule: Option<String>,
        /// Save even with an empty name or schedule
        #[arg(long)]
        force: bool,
    },
    /// Replace the timetable at INDEX and make it active
    Update {
        /// Position in `timetable list`
        index: usize,
        /// New name
        name: String,
        /// Schedule as a JSON array of slots (keeps the current one if omitted)
        #[arg(long)]
        schedule: Option<String>,
        /// Save even with an empty name or schedule
        #[arg(long)]
        force: bool,
    },
    /// Delete the timetable at INDEX
    Delete {
        /// Position in `timetable list`
        index: usize,
    },
    /// Make the first timetable with NAME active ("" clears)
    Activate {
        /// Timetable name
        name: String,
    },
    /// Report schedule problems (the active timetable by default)
    Validate {
        /// Timetable name
        name: Option<String>,
    },
}

#[derive(Serialize)]
struct ListEntry<'a> {
    index: usize,
    id: &'a str,
    name: &'a str,
    slots: usize,
    active: bool,
}

fn parse_schedule(json: Option<&str>) -> Result<Vec<Slot>, Box<dyn std::error::Error>> {
    match json {
        Some(json) => Ok(serde_json::from_str(json)?),
        None => Ok(Vec::new()),
    }
}

fn confirm_save(name: &str, schedule: &[Slot], force: bool) -> CliResult {
    if force {
        return Ok(());
    }
    if name.trim().is_empty() {
        return Err("timetable name is empty; pass --force to save anyway".into());
    }
    if schedule.is_empty() {
        return Err("schedule is empty; pass --force to save anyway".into());
    }
    Ok(())
}

pub fn run(action: TimetableAction) -> CliResult {
    let mut store = open_store()?;

    match action {
        TimetableAction::List => {
            let active = store.active_id();
            let entries: Vec<ListEntry<'_>> = store
                .timetables()
                .iter()
                .enumerate()
                .map(|(index, t)| ListEntry {
                    index,
                    id: &t.id,
                    name: &t.name,
                    slots: t.schedule.len(),
                    active: active == Some(t.id.as_str()),
                })
                .collect();
            print_json(&entries)?;
        }
        TimetableAction::Show { name } => {
            let timetable = match name.as_deref() {
                Some(name) => store.find_by_name(name),
                None => store.get_active(),
            };
            match timetable {
                Some(t) => print_json(t)?,
                None => println!("No timetable found. Use 'timetable add' to create one."),
            }
        }
        TimetableAction::Add {
            name,
            schedule,
            force,
        } => {
            let schedule = parse_schedule(schedule.as_deref())?;
            confirm_save(&name, &schedule, force)?;
            print_issues(&validate(&schedule));
            let event = store.add(&name, schedule)?;
            print_json(&event)?;
        }
        TimetableAction::Update {
            index,
            name,
            schedule,
            force,
        } => {
            store.check_index(index)?;
            let schedule = match schedule {
                Some(json) => parse_schedule(Some(&json))?,
                None => store.timetables()[index].schedule.clone(),
            };
            confirm_save(&name, &schedule, force)?;
            print_issues(&validate(&schedule));
            let event = store.update(index, &name, schedule)?;
            print_json(&event)?;
        }
        TimetableAction::Delete { index } => {
            let event = store.delete(index)?;
            print_json(&event)?;
        }
        TimetableAction::Activate { name } => {
            let event = store.set_active(&name)?;
            print_json(&event)?;
        }
        TimetableAction::Validate { name } => {
            let timetable = match name.as_deref() {
                Some(name) => store.find_by_name(name),
                None => store.get_active(),
            }
            .ok_or("no such timetable")?;
            let issues = validate(&timetable.schedule);
            print_json(&issues)?;
        }
    }
    Ok(())
}

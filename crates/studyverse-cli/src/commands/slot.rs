//! Slot editing commands; all act on the active timetable.

use clap::Subcommand;
use studyverse_core::timetable::{Priority, Repeat};
use studyverse_core::{validate, Slot};

use super::{active_index, open_store, print_issues, print_json, CliResult};

#[derive(Subcommand)]
pub enum SlotAction {
    /// List slots of the active timetable
    List,
    /// Append a slot
    Add {
        /// Time range, e.g. "5:00 AM – 6:30 AM"
        time: String,
        /// Activity label
        activity: String,
        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,
        /// Planned duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<Priority>,
        /// never, daily, weekdays, weekends or weekly
        #[arg(long)]
        repeat: Option<Repeat>,
        /// Remind this many minutes before start
        #[arg(long)]
        remind: Option<u32>,
        /// Slot may move within the day
        #[arg(long)]
        flexible: bool,
        /// Hide the label in shared views
        #[arg(long)]
        private: bool,
    },
    /// Change fields of the slot at INDEX
    Edit {
        /// Slot position
        index: usize,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        repeat: Option<Repeat>,
    },
    /// Remove the slot at INDEX
    Remove {
        /// Slot position
        index: usize,
    },
    /// Move a slot from one position to another
    Move { from: usize, to: usize },
}

pub fn run(action: SlotAction) -> CliResult {
    let mut store = open_store()?;
    let index = active_index(&store)?;

    let event = match action {
        SlotAction::List => {
            print_json(&store.timetables()[index].schedule)?;
            return Ok(());
        }
        SlotAction::Add {
            time,
            activity,
            note,
            duration,
            priority,
            repeat,
            remind,
            flexible,
            private,
        } => {
            let mut slot = Slot::new(time, activity).with_note(note);
            slot.duration = duration;
            slot.priority = priority.unwrap_or_default();
            slot.repeat = repeat.unwrap_or_default();
            slot.reminder = remind.is_some();
            slot.reminder_time = remind.unwrap_or(0);
            slot.is_flexible = flexible;
            slot.is_private = private;
            store.add_slot(index, slot)?
        }
        SlotAction::Edit {
            index: slot_index,
            time,
            activity,
            note,
            priority,
            repeat,
        } => {
            let mut slot = store.timetables()[index]
                .schedule
                .get(slot_index)
                .cloned()
                .ok_or_else(|| format!("no slot at position {slot_index}"))?;
            if let Some(time) = time {
                slot.time = time;
            }
            if let Some(activity) = activity {
                slot.activity = activity;
            }
            if let Some(note) = note {
                slot.note = note;
            }
            if let Some(priority) = priority {
                slot.priority = priority;
            }
            if let Some(repeat) = repeat {
                slot.repeat = repeat;
            }
            store.update_slot(index, slot_index, slot)?
        }
        SlotAction::Remove { index: slot_index } => store.remove_slot(index, slot_index)?,
        SlotAction::Move { from, to } => store.move_slot(index, from, to)?,
    };

    print_issues(&validate(&store.timetables()[index].schedule));
    print_json(&event)
}

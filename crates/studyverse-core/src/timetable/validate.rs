//! Write-time schedule checks.
//!
//! The resolver tolerates anything; these checks only report what it will
//! silently skip or reorder so callers can warn before saving.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::format_clock;
use super::resolver::IntervalList;
use super::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ScheduleIssue {
    /// No `H:MM AM|PM` token; the slot can never be current.
    UnparsableTime { index: usize, time: String },
    /// Same start as an earlier slot; only `first` will ever resolve.
    DuplicateStart { first: usize, second: usize, start: u32 },
    /// Starts before the slot declared ahead of it.
    OutOfOrder { index: usize },
    /// Explicit end time runs past the start of `next`.
    Overlap { index: usize, next: usize },
    EmptyActivity { index: usize },
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleIssue::UnparsableTime { index, time } => {
                write!(f, "slot {index}: no valid start time in '{time}'")
            }
            ScheduleIssue::DuplicateStart { first, second, start } => write!(
                f,
                "slot {second}: starts at {} like slot {first} and will never be current",
                format_clock(*start)
            ),
            ScheduleIssue::OutOfOrder { index } => {
                write!(f, "slot {index}: starts before the slot listed above it")
            }
            ScheduleIssue::Overlap { index, next } => {
                write!(f, "slot {index}: ends after slot {next} begins")
            }
            ScheduleIssue::EmptyActivity { index } => write!(f, "slot {index}: activity is empty"),
        }
    }
}

pub fn validate(schedule: &[Slot]) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();
    let mut first_at: HashMap<u32, usize> = HashMap::new();
    let mut previous: Option<u32> = None;

    for (index, slot) in schedule.iter().enumerate() {
        if slot.activity.trim().is_empty() {
            issues.push(ScheduleIssue::EmptyActivity { index });
        }
        let Some(start) = slot.start() else {
            issues.push(ScheduleIssue::UnparsableTime {
                index,
                time: slot.time.clone(),
            });
            continue;
        };
        if let Some(&first) = first_at.get(&start) {
            issues.push(ScheduleIssue::DuplicateStart {
                first,
                second: index,
                start,
            });
        } else {
            first_at.insert(start, index);
        }
        if previous.is_some_and(|prev| start < prev) {
            issues.push(ScheduleIssue::OutOfOrder { index });
        }
        previous = Some(start);
    }

    let intervals = IntervalList::build(schedule);
    for interval in intervals.iter() {
        let Some(declared_end) = schedule[interval.index].range().end else {
            continue;
        };
        if declared_end <= interval.start || declared_end <= interval.end {
            continue;
        }
        if let Some(next) = intervals.iter().find(|iv| iv.start == interval.end) {
            issues.push(ScheduleIssue::Overlap {
                index: interval.index,
                next: next.index,
            });
        }
    }

    issues
}

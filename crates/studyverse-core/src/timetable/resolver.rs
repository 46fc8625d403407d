//! Current-slot resolution.
//!
//! A schedule is turned into an [`IntervalList`]: every slot with a valid
//! start time becomes `[start, end)` where `end` is the next strictly later
//! start, or midnight for the last one. The list is sorted by start and the
//! sort is stable, so when two slots share a start the first declared one
//! wins. Slots without a valid start keep their index in the schedule but
//! never appear in the list.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::clock::{format_remaining, minutes_of, MINUTES_PER_DAY};
use super::Slot;

/// Label shown when nothing is scheduled right now.
pub const FREE_TIME: &str = "Free Time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Position of the slot in its schedule.
    pub index: usize,
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    pub fn span(&self) -> u32 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalList {
    intervals: Vec<Interval>,
}

impl IntervalList {
    pub fn build(schedule: &[Slot]) -> Self {
        let mut starts: Vec<(usize, u32)> = schedule
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.start().map(|start| (index, start)))
            .collect();
        starts.sort_by_key(|&(_, start)| start);

        let intervals = starts
            .iter()
            .enumerate()
            .map(|(pos, &(index, start))| {
                let end = starts[pos + 1..]
                    .iter()
                    .map(|&(_, next)| next)
                    .find(|&next| next > start)
                    .unwrap_or(MINUTES_PER_DAY);
                Interval { index, start, end }
            })
            .collect();

        Self { intervals }
    }

    /// First interval containing `minute`.
    pub fn containing(&self, minute: u32) -> Option<&Interval> {
        self.intervals.iter().find(|iv| iv.contains(minute))
    }

    /// First interval starting strictly after `minute`.
    pub fn after(&self, minute: u32) -> Option<&Interval> {
        self.intervals.iter().find(|iv| iv.start > minute)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// The slot in progress at a given minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSlot {
    pub index: usize,
    pub activity: String,
    pub note: String,
    pub start: u32,
    pub end: u32,
    /// 0.0 ..= 100.0
    pub progress_pct: f64,
    pub remaining_minutes: u32,
}

impl CurrentSlot {
    pub fn remaining_label(&self) -> String {
        format_remaining(self.remaining_minutes)
    }
}

/// Outcome of a resolver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Found(CurrentSlot),
    Idle,
}

impl Resolution {
    pub fn is_idle(&self) -> bool {
        matches!(self, Resolution::Idle)
    }

    pub fn current(&self) -> Option<&CurrentSlot> {
        match self {
            Resolution::Found(slot) => Some(slot),
            Resolution::Idle => None,
        }
    }

    /// Activity name, or "Free Time" when idle.
    pub fn activity(&self) -> &str {
        self.current().map_or(FREE_TIME, |slot| slot.activity.as_str())
    }

    pub fn progress_pct(&self) -> f64 {
        self.current().map_or(0.0, |slot| slot.progress_pct)
    }

    /// Empty when idle.
    pub fn remaining_label(&self) -> String {
        self.current()
            .map(CurrentSlot::remaining_label)
            .unwrap_or_default()
    }
}

/// The next slot to begin after a given minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingSlot {
    pub index: usize,
    pub activity: String,
    pub start: u32,
    pub starts_in_minutes: u32,
}

/// Resolve the slot in progress at `now` (minutes since midnight).
pub fn resolve(schedule: &[Slot], now: u32) -> Resolution {
    let intervals = IntervalList::build(schedule);
    let Some(interval) = intervals.containing(now) else {
        return Resolution::Idle;
    };
    let slot = &schedule[interval.index];
    let elapsed = now - interval.start;
    let progress_pct = (f64::from(elapsed) / f64::from(interval.span()) * 100.0).clamp(0.0, 100.0);

    Resolution::Found(CurrentSlot {
        index: interval.index,
        activity: slot.activity.clone(),
        note: slot.note.clone(),
        start: interval.start,
        end: interval.end,
        progress_pct,
        remaining_minutes: interval.end - now,
    })
}

pub fn resolve_at(schedule: &[Slot], now: NaiveTime) -> Resolution {
    resolve(schedule, minutes_of(now))
}

/// Next slot starting strictly after `now`.
pub fn upcoming(schedule: &[Slot], now: u32) -> Option<UpcomingSlot> {
    let intervals = IntervalList::build(schedule);
    let interval = intervals.after(now)?;
    Some(UpcomingSlot {
        index: interval.index,
        activity: schedule[interval.index].activity.clone(),
        start: interval.start,
        starts_in_minutes: interval.start - now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study_day() -> Vec<Slot> {
        vec![
            Slot::new("5:00 AM – 6:30 AM", "Math"),
            Slot::new("6:30 AM – 8:00 AM", "Mind Time"),
        ]
    }

    #[test]
    fn finds_slot_in_progress() {
        let res = resolve(&study_day(), 6 * 60);
        let current = res.current().expect("Math should be running");
        assert_eq!(current.activity, "Math");
        assert_eq!(current.index, 0);
        assert!(current.progress_pct > 66.0 && current.progress_pct < 67.0);
        assert_eq!(current.remaining_minutes, 30);
        assert_eq!(res.remaining_label(), "30m");
    }

    #[test]
    fn idle_before_first_start() {
        let res = resolve(&study_day(), 4 * 60);
        assert!(res.is_idle());
        assert_eq!(res.activity(), FREE_TIME);
        assert_eq!(res.progress_pct(), 0.0);
        assert_eq!(res.remaining_label(), "");
    }

    #[test]
    fn empty_schedule_is_idle() {
        assert!(resolve(&[], 600).is_idle());
    }

    #[test]
    fn last_slot_runs_until_midnight() {
        let res = resolve(&study_day(), 23 * 60);
        let current = res.current().unwrap();
        assert_eq!(current.activity, "Mind Time");
        assert_eq!(current.end, MINUTES_PER_DAY);
        assert_eq!(res.remaining_label(), "1h 0m");
    }

    #[test]
    fn boundary_minute_belongs_to_the_later_slot() {
        let res = resolve(&study_day(), 6 * 60 + 30);
        assert_eq!(res.activity(), "Mind Time");
        assert_eq!(res.progress_pct(), 0.0);
    }

    #[test]
    fn unparsable_slot_is_never_current() {
        let schedule = vec![
            Slot::new("Morning", "Stretch"),
            Slot::new("5:00 AM – 6:30 AM", "Math"),
        ];
        let intervals = IntervalList::build(&schedule);
        assert_eq!(intervals.len(), 1);
        assert_eq!(resolve(&schedule, 2 * 60).activity(), FREE_TIME);
        assert_eq!(resolve(&schedule, 5 * 60).current().unwrap().index, 1);
    }

    #[test]
    fn unparsable_slot_does_not_stretch_its_predecessor() {
        let schedule = vec![
            Slot::new("5:00 AM", "Math"),
            Slot::new("Morning", "Stretch"),
            Slot::new("7:00 AM", "Physics"),
        ];
        assert_eq!(resolve(&schedule, 8 * 60).activity(), "Physics");
        assert_eq!(resolve(&schedule, 6 * 60).current().unwrap().end, 7 * 60);
    }

    #[test]
    fn out_of_order_schedule_is_sorted() {
        let schedule = vec![
            Slot::new("9:00 AM", "Chemistry"),
            Slot::new("7:00 AM", "Physics"),
        ];
        let res = resolve(&schedule, 8 * 60);
        let current = res.current().unwrap();
        assert_eq!(current.activity, "Physics");
        assert_eq!(current.index, 1);
        assert_eq!(current.end, 9 * 60);
    }

    #[test]
    fn duplicate_start_keeps_first_declared() {
        let schedule = vec![
            Slot::new("7:00 AM", "Physics"),
            Slot::new("7:00 AM", "Biology"),
            Slot::new("8:00 AM", "Break"),
        ];
        let res = resolve(&schedule, 7 * 60 + 15);
        let current = res.current().unwrap();
        assert_eq!(current.activity, "Physics");
        assert_eq!(current.end, 8 * 60);
    }

    #[test]
    fn upcoming_reports_next_start() {
        let next = upcoming(&study_day(), 4 * 60).unwrap();
        assert_eq!(next.activity, "Math");
        assert_eq!(next.starts_in_minutes, 60);

        let next = upcoming(&study_day(), 6 * 60).unwrap();
        assert_eq!(next.activity, "Mind Time");
        assert!(upcoming(&study_day(), 7 * 60).is_none());
    }

    #[test]
    fn resolve_at_uses_wall_clock() {
        let now = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
        assert_eq!(resolve_at(&study_day(), now).activity(), "Math");
    }

    #[test]
    fn resolution_serializes_with_status_tag() {
        let json = serde_json::to_value(resolve(&study_day(), 4 * 60)).unwrap();
        assert_eq!(json["status"], "idle");
        let json = serde_json::to_value(resolve(&study_day(), 6 * 60)).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["activity"], "Math");
    }
}

//! Live view state driven by periodic ticks.
//!
//! No threads or timers live here. The caller owns the timers and calls
//! [`LiveView::clock_tick`] (about once a second) and
//! [`LiveView::resolve_tick`] (about once a minute).
//!
//! ## Usage
//!
//! ```ignore
//! let mut view = LiveView::new(DesktopNotifier::new(true));
//! // clock timer:
//! println!("{}", view.clock_tick(now));
//! // resolver timer:
//! let update = view.resolve_tick(store.get_active(), now);
//! ```

use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::notify::{Notifier, Permission};
use crate::timetable::clock::{format_clock, minutes_of};
use crate::timetable::{resolve, upcoming, Resolution, Timetable, UpcomingSlot, FREE_TIME};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityChange {
    /// `None` when coming out of free time.
    pub from: Option<String>,
    pub to: String,
}

/// Remembers the last resolved activity between ticks.
///
/// The first observation only seeds the memory. Later observations report a
/// change when a slot's activity differs from the remembered one; dropping
/// into free time is remembered but not reported.
#[derive(Debug, Default)]
pub struct ActivityWatcher {
    last: Option<Option<String>>,
}

impl ActivityWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, resolution: &Resolution) -> Option<ActivityChange> {
        let current = resolution.current().map(|slot| slot.activity.clone());
        let previous = self.last.replace(current.clone())?;
        match current {
            Some(to) if previous.as_deref() != Some(to.as_str()) => Some(ActivityChange {
                from: previous,
                to,
            }),
            _ => None,
        }
    }

    /// Last observed activity; `None` for free time or before any tick.
    pub fn last_activity(&self) -> Option<&str> {
        self.last.as_ref().and_then(|a| a.as_deref())
    }
}

/// Output of one resolver tick.
#[derive(Debug, Clone)]
pub struct LiveUpdate {
    pub resolution: Resolution,
    pub upcoming: Option<UpcomingSlot>,
    /// Always an `Event::Snapshot`.
    pub snapshot: Event,
    /// `Event::ActivityChanged` when the activity changed this tick.
    pub change: Option<Event>,
}

pub struct LiveView<N> {
    notifier: N,
    watcher: ActivityWatcher,
}

impl<N: Notifier> LiveView<N> {
    /// Create the view and ask the notifier for permission once.
    pub fn new(mut notifier: N) -> Self {
        let permission = notifier.request_permission();
        if permission != Permission::Granted {
            tracing::info!(?permission, "activity notifications disabled");
        }
        Self {
            notifier,
            watcher: ActivityWatcher::new(),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn clock_tick(&self, now: NaiveTime) -> String {
        now.format("%-I:%M:%S %p").to_string()
    }

    pub fn resolve_tick(&mut self, timetable: Option<&Timetable>, now: NaiveTime) -> LiveUpdate {
        let minute = minutes_of(now);
        let schedule = timetable.map(|t| t.schedule.as_slice()).unwrap_or_default();
        let resolution = resolve(schedule, minute);
        let next = upcoming(schedule, minute);

        let change = self.watcher.observe(&resolution).map(|change| {
            self.announce(&change, &resolution);
            Event::ActivityChanged {
                from: change.from,
                to: change.to,
                at: Utc::now(),
            }
        });

        let snapshot = Event::Snapshot {
            timetable: timetable.map(|t| t.name.clone()),
            clock: format_clock(minute),
            resolution: resolution.clone(),
            upcoming: next.clone(),
            at: Utc::now(),
        };

        LiveUpdate {
            resolution,
            upcoming: next,
            snapshot,
            change,
        }
    }

    fn announce(&self, change: &ActivityChange, resolution: &Resolution) {
        let title = format!("Time for {}", change.to);
        let body = match resolution.current() {
            Some(slot) => format!(
                "{} is over. {} runs until {}.",
                change.from.as_deref().unwrap_or(FREE_TIME),
                change.to,
                format_clock(slot.end)
            ),
            None => String::new(),
        };
        if let Err(e) = self.notifier.show(&title, &body) {
            tracing::warn!(error = %e, "could not show activity notification");
        }
    }
}

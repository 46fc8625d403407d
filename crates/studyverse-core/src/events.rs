use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timetable::{Resolution, UpcomingSlot};

/// Every state change in the system produces an Event.
/// The CLI prints them as JSON; the live view emits them on each resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimetableAdded {
        id: String,
        name: String,
        index: usize,
        at: DateTime<Utc>,
    },
    TimetableUpdated {
        id: String,
        name: String,
        index: usize,
        at: DateTime<Utc>,
    },
    TimetableDeleted {
        id: String,
        name: String,
        index: usize,
        /// Active timetable id after the deletion.
        active_id: Option<String>,
        at: DateTime<Utc>,
    },
    ActiveChanged {
        id: Option<String>,
        name: Option<String>,
        at: DateTime<Utc>,
    },
    SlotsChanged {
        timetable_id: String,
        slot_count: usize,
        at: DateTime<Utc>,
    },
    /// The resolved activity differs from the previous resolve.
    ActivityChanged {
        from: Option<String>,
        to: String,
        at: DateTime<Utc>,
    },
    Snapshot {
        timetable: Option<String>,
        clock: String,
        resolution: Resolution,
        upcoming: Option<UpcomingSlot>,
        at: DateTime<Utc>,
    },
}

//! # Studyverse Core Library
//!
//! This library provides the core logic for the Studyverse study planner:
//! named daily timetables, and the resolver that answers "what should I be
//! doing right now, how far through it am I, and how long is left".
//! All operations are exposed through the standalone `studyverse` CLI.
//!
//! ## Architecture
//!
//! - **Timetable**: slots with free-form `"5:00 AM – 6:30 AM"` times, the
//!   12-hour clock parser, and the interval-list resolver
//! - **Store**: the timetable collection plus active pointer, persisted as
//!   one JSON document through a [`LocalStore`]
//! - **Storage**: SQLite key/value table and TOML configuration
//! - **Live view**: tick-driven state that detects activity changes and
//!   raises notifications
//!
//! ## Key Components
//!
//! - [`TimetableStore`]: CRUD over timetables and the active pointer
//! - [`resolve`]: current slot, progress and time remaining
//! - [`LiveView`]: periodic evaluation and change notification
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod live;
pub mod notify;
pub mod storage;
pub mod theme;
pub mod timetable;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use live::{ActivityChange, ActivityWatcher, LiveUpdate, LiveView};
pub use notify::{BackgroundNotifier, DesktopNotifier, Notifier, NullNotifier, Permission};
pub use storage::{Config, Database, LocalStore, MemoryStore};
pub use theme::{activity_style, ActivityStyle, Theme, ThemeChannel, ThemeReceiver};
pub use timetable::{
    resolve, resolve_at, upcoming, validate, CurrentSlot, Resolution, ScheduleIssue, Slot,
    Timetable, TimetableDocument, TimetableStore, UpcomingSlot,
};

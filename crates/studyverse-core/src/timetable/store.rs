//! The timetable collection and its active pointer.
//!
//! The whole collection lives in one JSON document under [`STORAGE_KEY`]
//! and is rewritten after every mutation. Loading never fails: a missing or
//! unreadable document is an empty collection with nothing active.
//!
//! Mutations build the next state aside, write it, and only then replace
//! the in-memory state. A failed write leaves the store as it was.
//!
//! Positional operations (`update`, `delete`, slot edits) address
//! timetables by index in the stored order. The active pointer is a stable
//! id, so duplicate names and renames do not confuse it.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::validate::validate;
use super::{new_id, Slot, Timetable};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::LocalStore;

/// Storage key of the timetable document.
pub const STORAGE_KEY: &str = "studyverse_timetables";

/// Persisted shape of the collection.
///
/// `activeTimetable` carries the active name for readers that only know
/// names; `activeTimetableId` is authoritative when present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDocument {
    #[serde(default)]
    pub timetables: Vec<Timetable>,
    #[serde(default)]
    pub active_timetable: String,
    #[serde(default)]
    pub active_timetable_id: Option<String>,
}

impl TimetableDocument {
    fn from_state(timetables: &[Timetable], active: Option<&str>) -> Self {
        let active = active.and_then(|id| timetables.iter().find(|t| t.id == id));
        Self {
            timetables: timetables.to_vec(),
            active_timetable: active.map(|t| t.name.clone()).unwrap_or_default(),
            active_timetable_id: active.map(|t| t.id.clone()),
        }
    }

    /// Id of the active timetable: by id first, then first name match.
    pub fn resolve_active(&self) -> Option<String> {
        if let Some(id) = &self.active_timetable_id {
            if self.timetables.iter().any(|t| &t.id == id) {
                return Some(id.clone());
            }
        }
        if self.active_timetable.is_empty() {
            return None;
        }
        self.timetables
            .iter()
            .find(|t| t.name == self.active_timetable)
            .map(|t| t.id.clone())
    }

    /// Give every record written without an id a fresh one.
    /// Returns whether any id was assigned.
    pub fn assign_missing_ids(&mut self) -> bool {
        let mut assigned = false;
        for timetable in self.timetables.iter_mut().filter(|t| t.id.is_empty()) {
            timetable.id = new_id();
            assigned = true;
        }
        assigned
    }
}

pub struct TimetableStore<S> {
    storage: S,
    timetables: Vec<Timetable>,
    active: Option<String>,
}

impl<S: LocalStore> TimetableStore<S> {
    /// Read the collection from `storage`, falling back to empty.
    pub fn load(storage: S) -> Self {
        let doc = load_document(&storage);
        let active = doc.resolve_active();
        tracing::debug!(
            timetables = doc.timetables.len(),
            active = ?active,
            "loaded timetables"
        );
        Self {
            storage,
            timetables: doc.timetables,
            active,
        }
    }

    /// Re-read the stored document, dropping in-memory state.
    ///
    /// Another process may have written since we loaded; its write wins.
    pub fn reload(&mut self) {
        let doc = load_document(&self.storage);
        self.active = doc.resolve_active();
        self.timetables = doc.timetables;
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timetables(&self) -> &[Timetable] {
        &self.timetables
    }

    pub fn len(&self) -> usize {
        self.timetables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timetables.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The active timetable, or `None` when nothing is active.
    pub fn get_active(&self) -> Option<&Timetable> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Timetable> {
        self.timetables.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.timetables.iter().position(|t| t.id == id)
    }

    /// First timetable with this name.
    pub fn find_by_name(&self, name: &str) -> Option<&Timetable> {
        self.timetables.iter().find(|t| t.name == name)
    }

    /// Snapshot of the persisted document.
    pub fn document(&self) -> TimetableDocument {
        TimetableDocument::from_state(&self.timetables, self.active.as_deref())
    }

    /// `OutOfBounds` unless `index` addresses a stored timetable.
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.timetables.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "timetables".into(),
                index,
                len: self.timetables.len(),
            }
            .into());
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a timetable and make it active. Names need not be unique.
    pub fn add(&mut self, name: &str, schedule: Vec<Slot>) -> Result<Event> {
        warn_issues(name, &schedule);
        let timetable = Timetable::new(name, schedule);
        let id = timetable.id.clone();
        let mut timetables = self.timetables.clone();
        timetables.push(timetable);
        let index = timetables.len() - 1;
        self.commit(timetables, Some(id.clone()))?;
        Ok(Event::TimetableAdded {
            id,
            name: name.to_string(),
            index,
            at: Utc::now(),
        })
    }

    /// Replace the timetable at `index`, keep its id, and make it active.
    pub fn update(&mut self, index: usize, name: &str, schedule: Vec<Slot>) -> Result<Event> {
        self.check_index(index)?;
        warn_issues(name, &schedule);
        let mut timetables = self.timetables.clone();
        let timetable = &mut timetables[index];
        timetable.name = name.to_string();
        timetable.schedule = schedule;
        let id = timetable.id.clone();
        self.commit(timetables, Some(id.clone()))?;
        Ok(Event::TimetableUpdated {
            id,
            name: name.to_string(),
            index,
            at: Utc::now(),
        })
    }

    /// Remove the timetable at `index`.
    ///
    /// Deleting the active one hands activity to the first remaining
    /// timetable, or to nothing when the collection is now empty.
    pub fn delete(&mut self, index: usize) -> Result<Event> {
        self.check_index(index)?;
        let mut timetables = self.timetables.clone();
        let removed = timetables.remove(index);
        let active = if self.active.as_deref() == Some(removed.id.as_str()) {
            timetables.first().map(|t| t.id.clone())
        } else {
            self.active.clone()
        };
        self.commit(timetables, active)?;
        Ok(Event::TimetableDeleted {
            id: removed.id,
            name: removed.name,
            index,
            active_id: self.active.clone(),
            at: Utc::now(),
        })
    }

    /// Activate the first timetable named `name`; `""` or an unknown name
    /// clears the pointer.
    pub fn set_active(&mut self, name: &str) -> Result<Event> {
        let id = if name.is_empty() {
            None
        } else {
            self.find_by_name(name).map(|t| t.id.clone())
        };
        if id.is_none() && !name.is_empty() {
            tracing::warn!(timetable = name, "no timetable with this name; clearing active");
        }
        self.set_active_id(id.as_deref())
    }

    /// Activate by stable id; an unknown id clears the pointer.
    pub fn set_active_id(&mut self, id: Option<&str>) -> Result<Event> {
        let active = id.and_then(|id| self.get(id)).map(|t| t.id.clone());
        self.commit(self.timetables.clone(), active)?;
        let active = self.get_active();
        Ok(Event::ActiveChanged {
            id: active.map(|t| t.id.clone()),
            name: active.map(|t| t.name.clone()),
            at: Utc::now(),
        })
    }

    pub fn add_slot(&mut self, index: usize, slot: Slot) -> Result<Event> {
        self.edit_schedule(index, |schedule| {
            schedule.push(slot);
            Ok(())
        })
    }

    pub fn update_slot(&mut self, index: usize, slot_index: usize, slot: Slot) -> Result<Event> {
        self.edit_schedule(index, |schedule| {
            check_slot_index(schedule, slot_index)?;
            schedule[slot_index] = slot;
            Ok(())
        })
    }

    pub fn remove_slot(&mut self, index: usize, slot_index: usize) -> Result<Event> {
        self.edit_schedule(index, |schedule| {
            check_slot_index(schedule, slot_index)?;
            schedule.remove(slot_index);
            Ok(())
        })
    }

    /// Move a slot so that it ends up at position `to`.
    pub fn move_slot(&mut self, index: usize, from: usize, to: usize) -> Result<Event> {
        self.edit_schedule(index, |schedule| {
            check_slot_index(schedule, from)?;
            check_slot_index(schedule, to)?;
            let slot = schedule.remove(from);
            schedule.insert(to, slot);
            Ok(())
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn edit_schedule<F>(&mut self, index: usize, edit: F) -> Result<Event>
    where
        F: FnOnce(&mut Vec<Slot>) -> Result<()>,
    {
        self.check_index(index)?;
        let mut timetables = self.timetables.clone();
        let timetable = &mut timetables[index];
        edit(&mut timetable.schedule)?;
        warn_issues(&timetable.name, &timetable.schedule);
        let event = Event::SlotsChanged {
            timetable_id: timetable.id.clone(),
            slot_count: timetable.schedule.len(),
            at: Utc::now(),
        };
        self.commit(timetables, self.active.clone())?;
        Ok(event)
    }

    /// Write the next state, then adopt it.
    fn commit(&mut self, timetables: Vec<Timetable>, active: Option<String>) -> Result<()> {
        let doc = TimetableDocument::from_state(&timetables, active.as_deref());
        write_document(&self.storage, &doc)?;
        self.timetables = timetables;
        self.active = active;
        Ok(())
    }
}

fn check_slot_index(schedule: &[Slot], index: usize) -> Result<()> {
    if index >= schedule.len() {
        return Err(ValidationError::OutOfBounds {
            collection: "schedule".into(),
            index,
            len: schedule.len(),
        }
        .into());
    }
    Ok(())
}

fn warn_issues(name: &str, schedule: &[Slot]) {
    if name.trim().is_empty() || schedule.is_empty() {
        tracing::warn!(timetable = name, slots = schedule.len(), "saving an empty timetable");
    }
    for issue in validate(schedule) {
        tracing::warn!(timetable = name, %issue, "schedule issue");
    }
}

fn write_document<S: LocalStore>(storage: &S, doc: &TimetableDocument) -> Result<()> {
    let json = serde_json::to_string(doc)?;
    storage.set_item(STORAGE_KEY, &json)
}

/// Read the document and save it back once if records lacked ids, so ids
/// stay stable across loads.
fn load_document<S: LocalStore>(storage: &S) -> TimetableDocument {
    let mut doc = read_document(storage);
    if !doc.assign_missing_ids() {
        return doc;
    }
    let doc = TimetableDocument::from_state(&doc.timetables, doc.resolve_active().as_deref());
    match write_document(storage, &doc) {
        Ok(()) => tracing::debug!("assigned ids to timetables written without them"),
        Err(e) => tracing::warn!(error = %e, "could not save assigned timetable ids"),
    }
    doc
}

fn read_document<S: LocalStore>(storage: &S) -> TimetableDocument {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return TimetableDocument::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read timetables; starting empty");
            return TimetableDocument::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "corrupt timetable document; starting empty");
        TimetableDocument::default()
    })
}

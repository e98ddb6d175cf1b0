use std::fmt::Display;

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Stable identifier of an entry for the lifetime of one roster.
    pub struct EntryId;
}

/// Names loaded when nothing has been saved yet.
pub const DEFAULT_NAMES: [&str; 15] = [
    "An", "Bình", "Chi", "Dũng", "Hà", "Hưng", "Linh", "Minh", "Nam", "Nga", "Phúc", "Quân",
    "Sơn", "Thảo", "Vân",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("name is empty")]
    EmptyLabel,
    #[error("name spans several lines")]
    MultiLine,
    #[error("no entry at position {0}")]
    OutOfRange(usize),
}

/// One selectable item on the wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub label: String,
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Ordered set of entries eligible for selection. Order decides slice
/// placement; labels may repeat, ids never do.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    labels: SlotMap<EntryId, String>,
    order: Vec<EntryId>,
}

impl Roster {
    pub fn new() -> Roster {
        Roster::default()
    }

    /// Roster filled with [`DEFAULT_NAMES`].
    pub fn with_defaults() -> Roster {
        let mut roster = Roster::new();
        for name in DEFAULT_NAMES {
            // Defaults are non-empty
            let _ = roster.add(name);
        }
        roster
    }

    /// Builds a roster from pasted text, one name per line.
    pub fn from_text(text: &str) -> Roster {
        let mut roster = Roster::new();
        roster.replace_from_text(text);
        roster
    }

    /// Appends a trimmed name. Names are single-line so that
    /// [`Roster::to_text`] reads back as the same roster.
    pub fn add(&mut self, label: &str) -> Result<EntryId, RosterError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(RosterError::EmptyLabel);
        }
        if label.contains(['\n', '\r']) {
            return Err(RosterError::MultiLine);
        }
        let id = self.labels.insert(label.to_string());
        self.order.push(id);
        log::debug!("Added {:?} as {:?}", label, id);
        Ok(id)
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let label = self.labels.remove(id)?;
        self.order.retain(|&other| other != id);
        log::debug!("Removed {:?} ({:?})", label, id);
        Some(Entry { id, label })
    }

    /// Removes the entry at a 0-based position.
    pub fn remove_at(&mut self, index: usize) -> Result<Entry, RosterError> {
        let id = *self.order.get(index).ok_or(RosterError::OutOfRange(index))?;
        self.remove(id).ok_or(RosterError::OutOfRange(index))
    }

    /// Replaces the whole roster with the non-blank lines of `text`.
    /// Returns the new size.
    pub fn replace_from_text(&mut self, text: &str) -> usize {
        self.labels.clear();
        self.order.clear();
        for line in text.lines() {
            // Blank lines are skipped
            let _ = self.add(line);
        }
        log::info!("Roster replaced; {} names", self.order.len());
        self.order.len()
    }

    /// One name per line, in slice order.
    pub fn to_text(&self) -> String {
        self.iter().map(|e| e.label).collect::<Vec<_>>().join("\n")
    }

    pub fn get(&self, id: EntryId) -> Option<Entry> {
        self.labels.get(id).map(|label| Entry {
            id,
            label: label.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entry> + '_ {
        self.order.iter().map(|&id| Entry {
            id,
            label: self.labels[id].clone(),
        })
    }

    /// Owned copy of the current entries, in order. A spin resolves against
    /// this copy, never against the live roster.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.iter().collect()
    }
}

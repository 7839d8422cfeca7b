//! Bounded, newest-first history of saved badges

use crate::badge::{BadgeSpec, Locator};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of entries kept
pub const HISTORY_LIMIT: usize = 50;

/// A saved badge. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the epoch; doubles as the key
    pub id: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub logo_id: String,
    #[serde(default)]
    pub url: String,
}

impl HistoryEntry {
    pub fn new(id: i64, spec: &BadgeSpec, locator: &Locator) -> Self {
        Self {
            id,
            label: spec.label.clone(),
            message: spec.message.clone(),
            color: spec.color.clone(),
            logo_id: spec.logo_id.clone(),
            url: locator.to_string(),
        }
    }

    /// The editable fields, ready to load back into the form.
    pub fn spec(&self) -> BadgeSpec {
        BadgeSpec {
            label: self.label.clone(),
            message: self.message.clone(),
            color: self.color.clone(),
            logo_id: self.logo_id.clone(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Local>> {
        Utc.timestamp_millis_opt(self.id)
            .single()
            .map(|t| t.with_timezone(&Local))
    }
}

/// Newest-first list with FIFO eviction past `limit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: entries.into(),
            limit: HISTORY_LIMIT,
        }
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(h: History) -> Self {
        h.entries.into()
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Change the cap, dropping the oldest entries that no longer fit.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.entries.truncate(self.limit);
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Insert at the front, evicting the oldest entry when full.
    ///
    /// Ids are kept strictly increasing: an id that does not exceed the
    /// newest one is bumped past it. Past `i64::MAX` the id saturates.
    pub fn push(&mut self, spec: &BadgeSpec, locator: &Locator, now_ms: i64) -> &HistoryEntry {
        let id = match self.entries.front() {
            Some(newest) if now_ms <= newest.id => newest.id.saturating_add(1),
            _ => now_ms,
        };
        self.entries.push_front(HistoryEntry::new(id, spec, locator));
        self.entries.truncate(self.limit);
        &self.entries[0]
    }

    pub fn get(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry by position, newest first.
    pub fn nth(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

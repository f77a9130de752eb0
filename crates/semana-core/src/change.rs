//! Change-log entries and the change-feed computation.
//!
//! The change log is append-only and written by the sync collaborator,
//! not by any HTTP handler here; this crate only defines the record and
//! the pure feed transforms applied on read.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::weekday::Weekday;

/// One recorded edit to a family's schedule. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLogEntry {
  pub id:              Uuid,
  pub fam:             String,
  pub dia:             Weekday,
  pub old_value:       Option<String>,
  pub new_value:       Option<String>,
  pub actor_device_id: Option<String>,
  pub created_at:      DateTime<Utc>,
}

/// Input for appending a change-log entry. The `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewChange {
  pub fam:             String,
  pub dia:             Weekday,
  pub old_value:       Option<String>,
  pub new_value:       Option<String>,
  pub actor_device_id: Option<String>,
}

/// The mode flag value that requests per-day collapsing in the feed.
/// Any other mode value is ignored and yields the plain feed.
pub const MODE_LAST_PER_DAY: &str = "last_per_day";

// ─── Feed transforms ─────────────────────────────────────────────────────────

/// Drop entries authored by the viewer's own device — a device never
/// sees its own edits echoed back. Entries with no recorded actor are
/// kept.
pub fn visible_to(
  entries: Vec<ChangeLogEntry>,
  viewer_device_id: &str,
) -> Vec<ChangeLogEntry> {
  entries
    .into_iter()
    .filter(|c| c.actor_device_id.as_deref() != Some(viewer_device_id))
    .collect()
}

/// Collapse an ascending-ordered feed to the most recent entry per
/// weekday, re-sorted ascending by creation time.
///
/// Relies on the input ordering: a later entry for the same day simply
/// overwrites the earlier one in the map.
pub fn last_per_day(entries: Vec<ChangeLogEntry>) -> Vec<ChangeLogEntry> {
  let mut latest: BTreeMap<Weekday, ChangeLogEntry> = BTreeMap::new();
  for entry in entries {
    latest.insert(entry.dia, entry);
  }
  let mut out: Vec<ChangeLogEntry> = latest.into_values().collect();
  out.sort_by_key(|c| c.created_at);
  out
}

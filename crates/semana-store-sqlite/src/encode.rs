//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings
//! (microsecond precision, `Z` suffix) so that lexicographic order in
//! SQL matches chronological order. UUIDs are stored as hyphenated
//! lowercase strings; the planning mapping is stored as compact JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use semana_core::{change::ChangeLogEntry, weekday::Weekday};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Weekday ─────────────────────────────────────────────────────────────────

pub fn decode_weekday(s: &str) -> Result<Weekday> {
  Weekday::parse(s)
    .ok_or_else(|| semana_core::Error::UnknownWeekday(s.to_owned()).into())
}

// ─── Planning data ───────────────────────────────────────────────────────────

pub fn decode_planning_data(json: &str) -> Result<BTreeMap<Weekday, String>> {
  Ok(serde_json::from_str(json)?)
}

// ─── Change log rows ─────────────────────────────────────────────────────────

/// A `change_log` row as it comes out of SQLite, before decoding.
pub struct RawChange {
  pub id:              String,
  pub fam:             String,
  pub dia:             String,
  pub old_value:       Option<String>,
  pub new_value:       Option<String>,
  pub actor_device_id: Option<String>,
  pub created_at:      String,
}

impl RawChange {
  pub fn decode(self) -> Result<ChangeLogEntry> {
    Ok(ChangeLogEntry {
      id:              decode_uuid(&self.id)?,
      fam:             self.fam,
      dia:             decode_weekday(&self.dia)?,
      old_value:       self.old_value,
      new_value:       self.new_value,
      actor_device_id: self.actor_device_id,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

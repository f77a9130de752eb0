//! The weekly schedule record — one per family.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::weekday::Weekday;

/// A family's weekly schedule.
///
/// `data` maps weekday names to free-text values; an absent key simply
/// means the day has no entry yet. Created lazily on first read or
/// write, so `updated_at` is `None` until a day is first written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planning {
  pub fam:        String,
  pub data:       BTreeMap<Weekday, String>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl Planning {
  /// An empty schedule for `fam`, as materialised on first access.
  pub fn empty(fam: impl Into<String>) -> Planning {
    Planning {
      fam:        fam.into(),
      data:       BTreeMap::new(),
      updated_at: None,
    }
  }
}

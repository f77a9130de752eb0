//! Push subscription records.

use serde::{Deserialize, Serialize};

/// A registered push endpoint for one browser/device.
///
/// The endpoint URL is the uniqueness key — globally, not per family —
/// so re-registration from the same browser updates the existing record
/// instead of duplicating it. `device_id` identifies the owning device
/// when the client supplies one; fan-out uses it to skip echoing a
/// change back to its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
  pub fam:       String,
  pub endpoint:  String,
  pub p256dh:    String,
  pub auth:      String,
  pub device_id: Option<String>,
}

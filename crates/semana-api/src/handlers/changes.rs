//! Handlers for the change feed and its seen-watermark.
//!
//! Together these form the poll/ack cycle a device uses to catch up on
//! edits made elsewhere: `/api/changes` is a pure read, and the caller
//! advances its watermark separately through `/api/changes/seen`.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use semana_core::{
  change::{self, ChangeLogEntry},
  push::PushTransport,
  store::PlanningStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Feed ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedBody {
  pub fam:              Option<String>,
  #[serde(rename = "viewerDeviceId")]
  pub viewer_device_id: Option<String>,
  pub mode:             Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
  #[serde(rename = "lastSeenAt")]
  pub last_seen_at: DateTime<Utc>,
  pub count:        usize,
  pub changes:      Vec<ChangeLogEntry>,
}

/// `POST /api/changes` — body: `{fam, viewerDeviceId, mode?}`
///
/// A viewer that never marked anything seen gets the full history: the
/// watermark defaults to the Unix epoch.
pub async fn feed<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<FeedBody>,
) -> Result<Json<FeedResponse>, ApiError>
where
  S: PlanningStore,
  P: PushTransport,
{
  let missing =
    || ApiError::BadRequest("Missing fam/viewerDeviceId".to_string());
  let fam = body.fam.filter(|f| !f.is_empty()).ok_or_else(missing)?;
  let viewer = body
    .viewer_device_id
    .filter(|d| !d.is_empty())
    .ok_or_else(missing)?;

  let watermark = state
    .store
    .last_seen(&fam, &viewer)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .unwrap_or(DateTime::UNIX_EPOCH);

  let entries = state
    .store
    .changes_since(&fam, watermark)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut out = change::visible_to(entries, &viewer);
  if body.mode.as_deref() == Some(change::MODE_LAST_PER_DAY) {
    out = change::last_per_day(out);
  }

  Ok(Json(FeedResponse {
    last_seen_at: watermark,
    count:        out.len(),
    changes:      out,
  }))
}

// ─── Seen-marker ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SeenBody {
  pub fam:              Option<String>,
  #[serde(rename = "viewerDeviceId")]
  pub viewer_device_id: Option<String>,
  #[serde(rename = "seenAt")]
  pub seen_at:          Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SeenResponse {
  pub ok:           bool,
  pub last_seen_at: DateTime<Utc>,
}

/// `POST /api/changes/seen` — body: `{fam, viewerDeviceId, seenAt?}`
///
/// `seenAt` defaults to now. A timestamp earlier than the recorded
/// watermark silently rewinds it, re-surfacing already-consumed entries
/// on the next feed read; set `reject_seen_rewind` in the server config
/// to turn that into a 409 instead.
pub async fn mark_seen<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<SeenBody>,
) -> Result<Json<SeenResponse>, ApiError>
where
  S: PlanningStore,
  P: PushTransport,
{
  let missing =
    || ApiError::BadRequest("Missing fam/viewerDeviceId".to_string());
  let fam = body.fam.filter(|f| !f.is_empty()).ok_or_else(missing)?;
  let viewer = body
    .viewer_device_id
    .filter(|d| !d.is_empty())
    .ok_or_else(missing)?;

  let at = body.seen_at.unwrap_or_else(Utc::now);

  if state.config.reject_seen_rewind {
    let recorded = state
      .store
      .last_seen(&fam, &viewer)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    if let Some(prev) = recorded
      && at < prev
    {
      return Err(ApiError::Conflict(format!(
        "seenAt {at} rewinds the recorded watermark {prev}"
      )));
    }
  }

  state
    .store
    .set_last_seen(&fam, &viewer, at)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(SeenResponse {
    ok:           true,
    last_seen_at: at,
  }))
}

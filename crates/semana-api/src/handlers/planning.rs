//! Handlers for the weekly schedule.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/planning?fam=` | Creates an empty record on first access |
//! | `POST` | `/api/planning/update` | Body: `{fam, dia, value, url?, deviceId?}` |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use semana_core::{push::PushTransport, store::PlanningStore, weekday::Weekday};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, fanout, handlers::OkResponse};

// ─── Read ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReadParams {
  pub fam: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanningResponse {
  pub data:       BTreeMap<Weekday, String>,
  #[serde(rename = "updatedAt")]
  pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /api/planning?fam=<fam>`
pub async fn read<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<ReadParams>,
) -> Result<Json<PlanningResponse>, ApiError>
where
  S: PlanningStore,
  P: PushTransport,
{
  let fam = params
    .fam
    .filter(|f| !f.is_empty())
    .ok_or_else(|| ApiError::BadRequest("Missing fam".to_string()))?;

  let planning = state
    .store
    .get_or_create_planning(&fam)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(PlanningResponse {
    data:       planning.data,
    updated_at: planning.updated_at,
  }))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub fam:       Option<String>,
  pub dia:       Option<String>,
  #[serde(default)]
  pub value:     serde_json::Value,
  pub url:       Option<String>,
  #[serde(rename = "deviceId")]
  pub device_id: Option<String>,
}

/// `POST /api/planning/update` — body: `{fam, dia, value, url?, deviceId?}`
///
/// Applies one weekday's value and triggers notification fan-out to the
/// rest of the family. The fan-out runs to completion before the
/// response is sent, but its outcome never affects the response.
pub async fn update<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<OkResponse>, ApiError>
where
  S: PlanningStore + 'static,
  P: PushTransport + 'static,
{
  let invalid = || ApiError::BadRequest("Missing fam or invalid dia".to_string());
  let fam = body.fam.filter(|f| !f.is_empty()).ok_or_else(invalid)?;
  let dia = body
    .dia
    .as_deref()
    .and_then(Weekday::parse)
    .ok_or_else(invalid)?;
  let value = coerce_value(&body.value);

  state
    .store
    .set_day(&fam, dia, &value)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  fanout::notify_family(
    &state,
    &fam,
    dia,
    body.device_id.as_deref(),
    body.url.as_deref(),
  )
  .await;

  Ok(Json(OkResponse::new()))
}

/// Coerce the request's `value` to text: strings pass through,
/// absent/null becomes the empty string, anything else is rendered to
/// its compact JSON text.
fn coerce_value(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::Null => String::new(),
    serde_json::Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

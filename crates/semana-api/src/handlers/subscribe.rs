//! Handler for push subscription registration.

use axum::{Json, extract::State};
use semana_core::{
  push::PushTransport, store::PlanningStore, subscription::Subscription,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError, handlers::OkResponse};

/// The browser's `PushSubscription.toJSON()` shape. Everything is
/// optional at the serde level so a partial body yields our 400 rather
/// than a deserialisation rejection.
#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
  pub fam:          Option<String>,
  pub subscription: Option<SubscriptionBody>,
  #[serde(rename = "deviceId")]
  pub device_id:    Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionBody {
  pub endpoint: Option<String>,
  pub keys:     Option<KeysBody>,
}

#[derive(Debug, Deserialize)]
pub struct KeysBody {
  pub p256dh: Option<String>,
  pub auth:   Option<String>,
}

/// `POST /api/subscribe` — upserts on endpoint so re-registration from
/// the same browser updates instead of duplicating.
pub async fn register<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<SubscribeBody>,
) -> Result<Json<OkResponse>, ApiError>
where
  S: PlanningStore,
  P: PushTransport,
{
  let missing = || ApiError::BadRequest("Missing fam/subscription".to_string());

  let fam = body.fam.filter(|f| !f.is_empty()).ok_or_else(missing)?;
  let subscription = body.subscription.ok_or_else(missing)?;
  let endpoint = subscription
    .endpoint
    .filter(|e| !e.is_empty())
    .ok_or_else(missing)?;
  let keys = subscription.keys.ok_or_else(missing)?;
  let p256dh = keys.p256dh.filter(|k| !k.is_empty()).ok_or_else(missing)?;
  let auth = keys.auth.filter(|k| !k.is_empty()).ok_or_else(missing)?;

  state
    .store
    .upsert_subscription(Subscription {
      fam,
      endpoint,
      p256dh,
      auth,
      device_id: body.device_id,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(OkResponse::new()))
}

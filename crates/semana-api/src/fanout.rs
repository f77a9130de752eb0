//! Best-effort notification fan-out after a schedule write.
//!
//! One delivery task per subscription, unbounded and unordered, joined
//! before the caller's response goes out. Tasks report outcome values
//! rather than errors; endpoints that answered with a gone-class status
//! are pruned from storage in a single batch afterwards. Nothing here
//! can fail the triggering request.

use std::sync::Arc;

use semana_core::{
  push::{PushError, PushPayload, PushTransport},
  store::PlanningStore,
  weekday::Weekday,
};
use tokio::task::JoinSet;

use crate::AppState;

/// Outcome of a single delivery attempt.
enum Outcome {
  Delivered,
  Gone { endpoint: String },
  Failed { endpoint: String, message: String },
}

/// Deliver a change notification for `dia` to every subscription of
/// `fam` except the originating device.
pub async fn notify_family<S, P>(
  state: &AppState<S, P>,
  fam: &str,
  dia: Weekday,
  actor_device_id: Option<&str>,
  url_hint: Option<&str>,
) where
  S: PlanningStore + 'static,
  P: PushTransport + 'static,
{
  let subs = match state.store.list_subscriptions(fam).await {
    Ok(subs) => subs,
    Err(e) => {
      tracing::warn!(fam, error = %e, "fan-out: listing subscriptions failed");
      return;
    }
  };

  let payload = Arc::new(PushPayload {
    title: "Planning actualizado".to_string(),
    body:  format!("Se actualizó {dia}"),
    url:   url_hint.map(str::to_owned).unwrap_or_else(|| {
      format!("./?dia={}", urlencoding::encode(dia.as_str()))
    }),
  });

  let mut attempts = JoinSet::new();
  for sub in subs {
    // The author's own device never gets its edit echoed back.
    if actor_device_id.is_some() && sub.device_id.as_deref() == actor_device_id
    {
      continue;
    }
    let push = Arc::clone(&state.push);
    let payload = Arc::clone(&payload);
    attempts.spawn(async move {
      match push.send(&sub, &payload).await {
        Ok(()) => Outcome::Delivered,
        Err(PushError::Gone) => Outcome::Gone { endpoint: sub.endpoint },
        Err(PushError::Delivery(message)) => Outcome::Failed {
          endpoint: sub.endpoint,
          message,
        },
      }
    });
  }

  let mut stale = Vec::new();
  while let Some(joined) = attempts.join_next().await {
    match joined {
      Ok(Outcome::Delivered) => {}
      Ok(Outcome::Gone { endpoint }) => {
        tracing::info!(fam, endpoint, "fan-out: pruning gone subscription");
        stale.push(endpoint);
      }
      Ok(Outcome::Failed { endpoint, message }) => {
        tracing::warn!(fam, endpoint, message, "fan-out: delivery failed");
      }
      Err(e) => {
        tracing::warn!(fam, error = %e, "fan-out: delivery task panicked");
      }
    }
  }

  if !stale.is_empty()
    && let Err(e) = state.store.delete_subscriptions(&stale).await
  {
    tracing::warn!(fam, error = %e, "fan-out: pruning stale subscriptions failed");
  }
}

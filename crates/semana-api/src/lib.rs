//! HTTP layer for the semana family planning board.
//!
//! Exposes an axum [`Router`] with five JSON handlers over any
//! [`PlanningStore`] backend and [`PushTransport`] delivery transport.
//! Each request is handled statelessly; the only cross-request state is
//! the injected store and push client, both constructed once at process
//! start.

pub mod error;
pub mod fanout;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::{get, post},
};
use semana_core::{push::PushTransport, store::PlanningStore};
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` plus
/// `SEMANA_*` environment overrides.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,

  /// Exact origin allowed for CORS, or `"*"` for any.
  #[serde(default = "default_allowed_origin")]
  pub allowed_origin: String,

  /// VAPID subject claim (`mailto:` address or URL).
  pub vapid_subject: String,

  /// VAPID private key, URL-safe base64 without padding.
  pub vapid_private_key: String,

  /// Reject `seenAt` values older than the recorded watermark with a
  /// 409 instead of silently rewinding it.
  #[serde(default)]
  pub reject_seen_rewind: bool,
}

fn default_allowed_origin() -> String {
  "*".to_string()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, P> {
  pub store:  Arc<S>,
  pub push:   Arc<P>,
  pub config: Arc<ServerConfig>,
}

// Manual impl: the `Arc`s clone regardless of whether `S`/`P` do.
impl<S, P> Clone for AppState<S, P> {
  fn clone(&self) -> Self {
    AppState {
      store:  Arc::clone(&self.store),
      push:   Arc::clone(&self.push),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the planning board API.
pub fn router<S, P>(state: AppState<S, P>) -> Router
where
  S: PlanningStore + 'static,
  P: PushTransport + 'static,
{
  let cors = cors_layer(&state.config.allowed_origin);

  Router::new()
    .route("/api/planning", get(handlers::planning::read::<S, P>))
    .route("/api/planning/update", post(handlers::planning::update::<S, P>))
    .route("/api/subscribe", post(handlers::subscribe::register::<S, P>))
    .route("/api/changes", post(handlers::changes::feed::<S, P>))
    .route("/api/changes/seen", post(handlers::changes::mark_seen::<S, P>))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// CORS policy: GET/POST plus preflight, `Content-Type` header, and
/// either a single configured origin or the wildcard.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
  let layer = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE]);

  if allowed_origin == "*" {
    return layer.allow_origin(Any);
  }
  match allowed_origin.parse::<HeaderValue>() {
    Ok(origin) => layer.allow_origin(origin),
    Err(_) => {
      tracing::warn!(
        allowed_origin,
        "configured origin is not a valid header value, allowing any"
      );
      layer.allow_origin(Any)
    }
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

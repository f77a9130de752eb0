//! The push-delivery abstraction and its error classification.

use std::future::Future;

use serde::Serialize;

use crate::subscription::Subscription;

/// The JSON document delivered to every push endpoint on a schedule
/// change.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
  pub title: String,
  pub body:  String,
  pub url:   String,
}

/// Delivery failure classification.
///
/// Only [`PushError::Gone`] has consequences: the subscription is pruned
/// from storage so future fan-outs stop attempting it. Every other
/// failure is logged and dropped — there are no retries.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
  /// The endpoint reported it will never accept another delivery
  /// (HTTP 404/410 class).
  #[error("push endpoint is gone")]
  Gone,

  #[error("push delivery failed: {0}")]
  Delivery(String),
}

/// Abstraction over the Web Push delivery transport.
///
/// Implemented for production by `semana-push`; tests substitute a mock
/// that records payloads and scripts failures.
pub trait PushTransport: Send + Sync {
  /// Attempt exactly one delivery of `payload` to `sub`.
  fn send<'a>(
    &'a self,
    sub: &'a Subscription,
    payload: &'a PushPayload,
  ) -> impl Future<Output = Result<(), PushError>> + Send + 'a;
}

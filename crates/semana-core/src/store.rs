//! The `PlanningStore` trait.
//!
//! Implemented by storage backends (e.g. `semana-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  change::{ChangeLogEntry, NewChange},
  planning::Planning,
  subscription::Subscription,
  weekday::Weekday,
};

/// Abstraction over the semana storage backend.
pub trait PlanningStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Planning ──────────────────────────────────────────────────────────

  /// Return the schedule for `fam`, creating an empty record on first
  /// access. A freshly created schedule has no entries and a `None`
  /// last-updated timestamp.
  fn get_or_create_planning<'a>(
    &'a self,
    fam: &'a str,
  ) -> impl Future<Output = Result<Planning, Self::Error>> + Send + 'a;

  /// Set one weekday's value in `fam`'s schedule and stamp the
  /// last-updated time.
  ///
  /// This must be a single atomic partial-field update at the store
  /// level: two writers touching different weekdays of the same family
  /// may interleave without either update being lost.
  fn set_day<'a>(
    &'a self,
    fam: &'a str,
    dia: Weekday,
    value: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Subscriptions ─────────────────────────────────────────────────────

  /// Insert or update a subscription, keyed by endpoint URL.
  fn upsert_subscription(
    &self,
    sub: Subscription,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All subscriptions registered for `fam`.
  fn list_subscriptions<'a>(
    &'a self,
    fam: &'a str,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + 'a;

  /// Remove the given endpoints in one batch. Returns the number of
  /// rows actually deleted.
  fn delete_subscriptions<'a>(
    &'a self,
    endpoints: &'a [String],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Change log ────────────────────────────────────────────────────────

  /// Append a change-log entry. Used by the sync collaborator that
  /// records edits — no HTTP handler in this repository calls it. The
  /// `id` and `created_at` are assigned by the store.
  fn append_change(
    &self,
    input: NewChange,
  ) -> impl Future<Output = Result<ChangeLogEntry, Self::Error>> + Send + '_;

  /// All change-log entries for `fam` with creation time strictly
  /// greater than `after`, ordered ascending by creation time.
  fn changes_since<'a>(
    &'a self,
    fam: &'a str,
    after: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<ChangeLogEntry>, Self::Error>> + Send + 'a;

  // ── Seen watermarks ───────────────────────────────────────────────────

  /// The last-seen watermark for `(fam, viewer)`, if one was ever
  /// recorded.
  fn last_seen<'a>(
    &'a self,
    fam: &'a str,
    viewer_device_id: &'a str,
  ) -> impl Future<Output = Result<Option<DateTime<Utc>>, Self::Error>> + Send + 'a;

  /// Upsert the last-seen watermark for `(fam, viewer)`.
  ///
  /// No monotonicity is enforced here: an earlier timestamp than the one
  /// recorded silently rewinds the watermark. The HTTP layer can be
  /// configured to reject rewinds before calling this.
  fn set_last_seen<'a>(
    &'a self,
    fam: &'a str,
    viewer_device_id: &'a str,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Utc};
use semana_core::{
  change::NewChange,
  store::PlanningStore,
  subscription::Subscription,
  weekday::Weekday,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sub(endpoint: &str, device: Option<&str>) -> Subscription {
  Subscription {
    fam:       "garcia".to_string(),
    endpoint:  endpoint.to_string(),
    p256dh:    "p256dh-key".to_string(),
    auth:      "auth-key".to_string(),
    device_id: device.map(str::to_string),
  }
}

fn change(dia: Weekday, value: &str, actor: Option<&str>) -> NewChange {
  NewChange {
    fam:             "garcia".to_string(),
    dia,
    old_value:       None,
    new_value:       Some(value.to_string()),
    actor_device_id: actor.map(str::to_string),
  }
}

// ─── Planning ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_access_creates_empty_planning() {
  let s = store().await;

  let planning = s.get_or_create_planning("garcia").await.unwrap();
  assert!(planning.data.is_empty());
  assert!(planning.updated_at.is_none());

  // A second access returns the same empty record, not a new one.
  let again = s.get_or_create_planning("garcia").await.unwrap();
  assert!(again.data.is_empty());
  assert!(again.updated_at.is_none());
}

#[tokio::test]
async fn set_day_merges_with_other_days() {
  let s = store().await;

  s.set_day("garcia", Weekday::Lunes, "Gym").await.unwrap();
  s.set_day("garcia", Weekday::Miercoles, "Piscina").await.unwrap();
  s.set_day("garcia", Weekday::Lunes, "Yoga").await.unwrap();

  let planning = s.get_or_create_planning("garcia").await.unwrap();
  assert_eq!(planning.data.len(), 2);
  assert_eq!(planning.data[&Weekday::Lunes], "Yoga");
  assert_eq!(planning.data[&Weekday::Miercoles], "Piscina");
  assert!(planning.updated_at.is_some());
}

#[tokio::test]
async fn set_day_creates_planning_when_missing() {
  let s = store().await;

  s.set_day("lopez", Weekday::Sabado, "Cine").await.unwrap();

  let planning = s.get_or_create_planning("lopez").await.unwrap();
  assert_eq!(planning.data[&Weekday::Sabado], "Cine");
}

#[tokio::test]
async fn planning_is_scoped_per_family() {
  let s = store().await;

  s.set_day("garcia", Weekday::Lunes, "Gym").await.unwrap();

  let other = s.get_or_create_planning("lopez").await.unwrap();
  assert!(other.data.is_empty());
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_subscription_dedups_on_endpoint() {
  let s = store().await;

  s.upsert_subscription(sub("https://push/one", Some("phone-a")))
    .await
    .unwrap();

  let mut updated = sub("https://push/one", Some("phone-a"));
  updated.p256dh = "rotated-key".to_string();
  s.upsert_subscription(updated).await.unwrap();

  let subs = s.list_subscriptions("garcia").await.unwrap();
  assert_eq!(subs.len(), 1);
  assert_eq!(subs[0].p256dh, "rotated-key");
}

#[tokio::test]
async fn delete_subscriptions_batch() {
  let s = store().await;

  s.upsert_subscription(sub("https://push/one", None)).await.unwrap();
  s.upsert_subscription(sub("https://push/two", None)).await.unwrap();
  s.upsert_subscription(sub("https://push/three", None)).await.unwrap();

  let deleted = s
    .delete_subscriptions(&[
      "https://push/one".to_string(),
      "https://push/three".to_string(),
      "https://push/never-registered".to_string(),
    ])
    .await
    .unwrap();
  assert_eq!(deleted, 2);

  let subs = s.list_subscriptions("garcia").await.unwrap();
  assert_eq!(subs.len(), 1);
  assert_eq!(subs[0].endpoint, "https://push/two");
}

#[tokio::test]
async fn delete_subscriptions_empty_is_noop() {
  let s = store().await;
  assert_eq!(s.delete_subscriptions(&[]).await.unwrap(), 0);
}

// ─── Change log ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn changes_since_is_strict_and_ascending() {
  let s = store().await;

  let first = s
    .append_change(change(Weekday::Lunes, "Gym", Some("phone-a")))
    .await
    .unwrap();
  // Creation times are server-assigned; give the clock room so the two
  // entries cannot land on the same microsecond.
  tokio::time::sleep(std::time::Duration::from_millis(3)).await;
  let second = s
    .append_change(change(Weekday::Martes, "Cena", Some("phone-b")))
    .await
    .unwrap();

  // Strictly greater: a watermark equal to the first entry's creation
  // time must exclude it.
  let after_first = s.changes_since("garcia", first.created_at).await.unwrap();
  assert_eq!(after_first.len(), 1);
  assert_eq!(after_first[0].id, second.id);

  let all = s
    .changes_since("garcia", DateTime::UNIX_EPOCH)
    .await
    .unwrap();
  assert_eq!(all.len(), 2);
  assert!(all[0].created_at <= all[1].created_at);
  assert_eq!(all[0].id, first.id);
}

#[tokio::test]
async fn changes_since_round_trips_fields() {
  let s = store().await;

  let entry = s
    .append_change(NewChange {
      fam:             "garcia".to_string(),
      dia:             Weekday::Miercoles,
      old_value:       Some("Gym".to_string()),
      new_value:       Some("Piscina".to_string()),
      actor_device_id: Some("phone-a".to_string()),
    })
    .await
    .unwrap();

  let got = s
    .changes_since("garcia", DateTime::UNIX_EPOCH)
    .await
    .unwrap();
  assert_eq!(got.len(), 1);
  assert_eq!(got[0].id, entry.id);
  assert_eq!(got[0].dia, Weekday::Miercoles);
  assert_eq!(got[0].old_value.as_deref(), Some("Gym"));
  assert_eq!(got[0].new_value.as_deref(), Some("Piscina"));
  assert_eq!(got[0].actor_device_id.as_deref(), Some("phone-a"));
  assert_eq!(got[0].created_at, entry.created_at);
}

// ─── Seen watermarks ─────────────────────────────────────────────────────────

#[tokio::test]
async fn last_seen_missing_returns_none() {
  let s = store().await;
  let seen = s.last_seen("garcia", "phone-a").await.unwrap();
  assert!(seen.is_none());
}

#[tokio::test]
async fn set_last_seen_upserts_including_rewind() {
  use chrono::TimeZone as _;

  let s = store().await;
  let earlier = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
  let later   = Utc.timestamp_opt(1_700_000_300, 0).unwrap();

  s.set_last_seen("garcia", "phone-a", later).await.unwrap();
  assert_eq!(s.last_seen("garcia", "phone-a").await.unwrap(), Some(later));

  // The store itself never enforces monotonicity — a rewind sticks.
  s.set_last_seen("garcia", "phone-a", earlier).await.unwrap();
  assert_eq!(
    s.last_seen("garcia", "phone-a").await.unwrap(),
    Some(earlier)
  );
}

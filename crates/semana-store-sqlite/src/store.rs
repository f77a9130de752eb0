//! [`SqliteStore`] — the SQLite implementation of [`PlanningStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use semana_core::{
  change::{ChangeLogEntry, NewChange},
  planning::Planning,
  store::PlanningStore,
  subscription::Subscription,
  weekday::Weekday,
};

use crate::{
  Error, Result,
  encode::{RawChange, decode_dt, decode_planning_data, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A semana planning store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PlanningStore impl ──────────────────────────────────────────────────────

impl PlanningStore for SqliteStore {
  type Error = Error;

  // ── Planning ──────────────────────────────────────────────────────────────

  async fn get_or_create_planning(&self, fam: &str) -> Result<Planning> {
    let fam_owned = fam.to_owned();

    let (data_json, updated_at_str): (String, Option<String>) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO planning (fam, data) VALUES (?1, '{}')",
          rusqlite::params![fam_owned],
        )?;
        let row = conn.query_row(
          "SELECT data, updated_at FROM planning WHERE fam = ?1",
          rusqlite::params![fam_owned],
          |r| Ok((r.get::<_, String>(0)?, r.get::<_, Option<String>>(1)?)),
        )?;
        Ok(row)
      })
      .await?;

    Ok(Planning {
      fam:        fam.to_owned(),
      data:       decode_planning_data(&data_json)?,
      updated_at: updated_at_str.as_deref().map(decode_dt).transpose()?,
    })
  }

  async fn set_day(&self, fam: &str, dia: Weekday, value: &str) -> Result<()> {
    let fam_owned   = fam.to_owned();
    let value_owned = value.to_owned();
    // Weekday names come from the fixed enum, so quoting the JSON path
    // with the raw name is safe.
    let path    = format!("$.\"{}\"", dia.as_str());
    let now_str = encode_dt(Utc::now());

    // A single atomic per-field patch. Two writers touching different
    // weekdays of the same family cannot lose each other's update.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO planning (fam, data, updated_at)
           VALUES (?1, json_set('{}', ?2, ?3), ?4)
           ON CONFLICT(fam) DO UPDATE SET
             data       = json_set(planning.data, ?2, ?3),
             updated_at = ?4",
          rusqlite::params![fam_owned, path, value_owned, now_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn upsert_subscription(&self, sub: Subscription) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscriptions (endpoint, fam, p256dh, auth, device_id)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(endpoint) DO UPDATE SET
             fam       = excluded.fam,
             p256dh    = excluded.p256dh,
             auth      = excluded.auth,
             device_id = excluded.device_id",
          rusqlite::params![
            sub.endpoint,
            sub.fam,
            sub.p256dh,
            sub.auth,
            sub.device_id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_subscriptions(&self, fam: &str) -> Result<Vec<Subscription>> {
    let fam_owned = fam.to_owned();

    let subs = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT endpoint, fam, p256dh, auth, device_id
           FROM subscriptions WHERE fam = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fam_owned], |r| {
            Ok(Subscription {
              endpoint:  r.get(0)?,
              fam:       r.get(1)?,
              p256dh:    r.get(2)?,
              auth:      r.get(3)?,
              device_id: r.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(subs)
  }

  async fn delete_subscriptions(&self, endpoints: &[String]) -> Result<usize> {
    if endpoints.is_empty() {
      return Ok(0);
    }
    let endpoints = endpoints.to_vec();

    let deleted = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; endpoints.len()].join(", ");
        let sql = format!(
          "DELETE FROM subscriptions WHERE endpoint IN ({placeholders})"
        );
        let n = conn.execute(&sql, rusqlite::params_from_iter(endpoints.iter()))?;
        Ok(n)
      })
      .await?;

    Ok(deleted)
  }

  // ── Change log ────────────────────────────────────────────────────────────

  async fn append_change(&self, input: NewChange) -> Result<ChangeLogEntry> {
    let entry = ChangeLogEntry {
      id:              Uuid::new_v4(),
      fam:             input.fam,
      dia:             input.dia,
      old_value:       input.old_value,
      new_value:       input.new_value,
      actor_device_id: input.actor_device_id,
      // Truncate to the column's microsecond precision so the returned
      // entry compares equal to what a later read decodes.
      created_at:      Utc::now().trunc_subsecs(6),
    };

    let id_str = encode_uuid(entry.id);
    let at_str = encode_dt(entry.created_at);
    let row    = entry.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO change_log
             (id, fam, dia, old_value, new_value, actor_device_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            row.fam,
            row.dia.as_str(),
            row.old_value,
            row.new_value,
            row.actor_device_id,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn changes_since(
    &self,
    fam: &str,
    after: DateTime<Utc>,
  ) -> Result<Vec<ChangeLogEntry>> {
    let fam_owned = fam.to_owned();
    let after_str = encode_dt(after);

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, fam, dia, old_value, new_value, actor_device_id, created_at
           FROM change_log
           WHERE fam = ?1 AND created_at > ?2
           ORDER BY created_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fam_owned, after_str], |r| {
            Ok(RawChange {
              id:              r.get(0)?,
              fam:             r.get(1)?,
              dia:             r.get(2)?,
              old_value:       r.get(3)?,
              new_value:       r.get(4)?,
              actor_device_id: r.get(5)?,
              created_at:      r.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChange::decode).collect()
  }

  // ── Seen watermarks ───────────────────────────────────────────────────────

  async fn last_seen(
    &self,
    fam: &str,
    viewer_device_id: &str,
  ) -> Result<Option<DateTime<Utc>>> {
    let fam_owned    = fam.to_owned();
    let viewer_owned = viewer_device_id.to_owned();

    let at_str: Option<String> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT last_seen_at FROM change_seen
             WHERE fam = ?1 AND viewer_device_id = ?2",
            rusqlite::params![fam_owned, viewer_owned],
            |r| r.get(0),
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    at_str.as_deref().map(decode_dt).transpose()
  }

  async fn set_last_seen(
    &self,
    fam: &str,
    viewer_device_id: &str,
    at: DateTime<Utc>,
  ) -> Result<()> {
    let fam_owned    = fam.to_owned();
    let viewer_owned = viewer_device_id.to_owned();
    let at_str       = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO change_seen (fam, viewer_device_id, last_seen_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(fam, viewer_device_id) DO UPDATE SET
             last_seen_at = excluded.last_seen_at",
          rusqlite::params![fam_owned, viewer_owned, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

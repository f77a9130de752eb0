//! SQL schema for the semana SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated
//! on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS planning (
    fam        TEXT PRIMARY KEY,
    data       TEXT NOT NULL DEFAULT '{}',  -- JSON object, weekday name -> value
    updated_at TEXT                         -- ISO 8601 UTC; NULL until first write
);

CREATE TABLE IF NOT EXISTS subscriptions (
    endpoint  TEXT PRIMARY KEY,             -- globally unique, not per family
    fam       TEXT NOT NULL,
    p256dh    TEXT NOT NULL,
    auth      TEXT NOT NULL,
    device_id TEXT
);

-- Append-only: written by the sync collaborator, only read here.
-- No UPDATE is ever issued against this table.
CREATE TABLE IF NOT EXISTS change_log (
    id              TEXT PRIMARY KEY,
    fam             TEXT NOT NULL,
    dia             TEXT NOT NULL,
    old_value       TEXT,
    new_value       TEXT,
    actor_device_id TEXT,
    created_at      TEXT NOT NULL           -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS change_seen (
    fam              TEXT NOT NULL,
    viewer_device_id TEXT NOT NULL,
    last_seen_at     TEXT NOT NULL,
    PRIMARY KEY (fam, viewer_device_id)
);

CREATE INDEX IF NOT EXISTS subscriptions_fam_idx   ON subscriptions(fam);
CREATE INDEX IF NOT EXISTS change_log_fam_time_idx ON change_log(fam, created_at);

PRAGMA user_version = 1;
";

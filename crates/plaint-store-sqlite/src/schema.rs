//! SQL schema for the Plaint SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS complaints (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id  TEXT    NOT NULL,
    reporter    TEXT    NOT NULL,
    content     TEXT    NOT NULL,
    created_at  TEXT    NOT NULL,   -- RFC 3339 UTC; write-once
    country     TEXT    NOT NULL,   -- write-once
    counter     INTEGER NOT NULL DEFAULT 1 CHECK (counter >= 1),
    -- The deduplication key. Racing inserts for one key resolve here.
    UNIQUE (product_id, reporter)
);

PRAGMA user_version = 1;
";

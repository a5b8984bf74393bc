//! SQL schema for the Threads SQLite store.
//!
//! Executed once per connection. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    identity_id TEXT NOT NULL UNIQUE,
    username    TEXT NOT NULL UNIQUE,    -- always lower-case
    name        TEXT NOT NULL,
    name_folded TEXT NOT NULL,           -- lower-cased name, for search
    bio         TEXT NOT NULL DEFAULT '',
    image       TEXT NOT NULL DEFAULT '',
    onboarded   INTEGER NOT NULL DEFAULT 0,
    threads     TEXT NOT NULL DEFAULT '[]', -- JSON array of owned thread ids
    created_at  TEXT NOT NULL
);

-- author_id and parent_id are plain references, not foreign keys.
CREATE TABLE IF NOT EXISTS threads (
    thread_id    TEXT PRIMARY KEY,
    text         TEXT NOT NULL,
    author_id    TEXT NOT NULL,
    parent_id    TEXT,                    -- NULL for top-level threads
    community_id TEXT,
    children     TEXT NOT NULL DEFAULT '[]', -- JSON array of reply ids
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS users_created_idx    ON users(created_at);
CREATE INDEX IF NOT EXISTS threads_parent_idx   ON threads(parent_id);
CREATE INDEX IF NOT EXISTS threads_author_idx   ON threads(author_id);
CREATE INDEX IF NOT EXISTS threads_created_idx  ON threads(created_at);

PRAGMA user_version = 2;
";

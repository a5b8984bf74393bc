//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexical order matches chronological order. Id lists are
//! JSON arrays of hyphenated lowercase UUID strings.

use chrono::{DateTime, SecondsFormat, Utc};
use threads_core::{thread::Thread, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_ids(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_ids(s: &str) -> Result<Vec<Uuid>> { Ok(serde_json::from_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current time truncated to the precision stored in the database, so that
/// values returned from writes compare equal to values read back.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── LIKE patterns ────────────────────────────────────────────────────────────

/// Wrap `text` in `%...%` for a substring `LIKE ... ESCAPE '\'`, escaping
/// the pattern metacharacters it contains.
///
/// The text is lower-cased, so it must be matched against lower-cased
/// columns: SQLite's `LIKE` only folds ASCII.
pub fn like_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.to_lowercase().chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, identity_id, username, name, bio, \
                                image, onboarded, threads, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:     String,
  pub identity_id: String,
  pub username:    String,
  pub name:        String,
  pub bio:         String,
  pub image:       String,
  pub onboarded:   bool,
  pub threads:     String,
  pub created_at:  String,
}

impl RawUser {
  /// Map a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:     row.get(0)?,
      identity_id: row.get(1)?,
      username:    row.get(2)?,
      name:        row.get(3)?,
      bio:         row.get(4)?,
      image:       row.get(5)?,
      onboarded:   row.get(6)?,
      threads:     row.get(7)?,
      created_at:  row.get(8)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:     decode_uuid(&self.user_id)?,
      identity_id: self.identity_id,
      username:    self.username,
      name:        self.name,
      bio:         self.bio,
      image:       self.image,
      onboarded:   self.onboarded,
      threads:     decode_ids(&self.threads)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const THREAD_COLUMNS: &str =
  "thread_id, text, author_id, parent_id, community_id, children, created_at";

/// Raw values read directly from a `threads` row.
pub struct RawThread {
  pub thread_id:    String,
  pub text:         String,
  pub author_id:    String,
  pub parent_id:    Option<String>,
  pub community_id: Option<String>,
  pub children:     String,
  pub created_at:   String,
}

impl RawThread {
  /// Map a row selected with [`THREAD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      thread_id:    row.get(0)?,
      text:         row.get(1)?,
      author_id:    row.get(2)?,
      parent_id:    row.get(3)?,
      community_id: row.get(4)?,
      children:     row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn into_thread(self) -> Result<Thread> {
    Ok(Thread {
      thread_id:    decode_uuid(&self.thread_id)?,
      text:         self.text,
      author_id:    decode_uuid(&self.author_id)?,
      parent_id:    self.parent_id.as_deref().map(decode_uuid).transpose()?,
      community_id: self
        .community_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      children:     decode_ids(&self.children)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_metacharacters() {
    assert_eq!(like_pattern("ali"), "%ali%");
    assert_eq!(like_pattern("100%_\\"), "%100\\%\\_\\\\%");
  }

  #[test]
  fn like_pattern_folds_unicode_case() {
    assert_eq!(like_pattern("ÉMILE Zola"), "%émile zola%");
  }

  #[test]
  fn timestamps_are_fixed_width() {
    let a = decode_dt("2024-01-01T00:00:00Z").unwrap();
    let b = decode_dt("2024-01-01T00:00:00.5Z").unwrap();
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
  }
}

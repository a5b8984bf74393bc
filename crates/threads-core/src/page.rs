//! Offset pagination shared by the feed and the user search.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::{Error, Result};

// ─── Request ─────────────────────────────────────────────────────────────────

/// A 1-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub number: u32,
  pub size:   u32,
}

impl PageRequest {
  pub fn new(number: u32, size: u32) -> Self { Self { number, size } }

  /// Number of matching documents skipped before this page.
  ///
  /// Page `0` is treated as page `1`.
  pub fn skip(&self) -> u64 {
    u64::from(self.number.max(1) - 1) * u64::from(self.size)
  }

  pub fn limit(&self) -> u64 { u64::from(self.size) }
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// One page of results plus whether more exist beyond it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:   Vec<T>,
  pub is_next: bool,
}

impl<T> Page<T> {
  /// Build a page from the returned items, the skip amount used to fetch
  /// them, and the total count of matching documents.
  pub fn new(items: Vec<T>, skip: u64, total: u64) -> Self {
    let is_next = total > skip + items.len() as u64;
    Self { items, is_next }
  }
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Direction for ordering by creation time.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
  #[strum(to_string = "asc", serialize = "ascending")]
  Asc,
  #[default]
  #[strum(to_string = "desc", serialize = "descending")]
  Desc,
}

impl SortOrder {
  /// Parse `asc`/`ascending`/`desc`/`descending`, ignoring ASCII case.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::UnknownSortOrder(s.to_owned()))
  }

  /// The SQL keyword for this direction.
  pub fn sql(&self) -> &'static str {
    match self {
      Self::Asc => "ASC",
      Self::Desc => "DESC",
    }
  }
}

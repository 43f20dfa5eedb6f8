//! Record - 追跡対象レコードの読み取りビュー
//!
//! Record はこのシステムが作成・削除することのない、外部所有エンティティの
//! スナップショットです。ID は外部 API が割り当てた不変・不透明な文字列です。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Status;

/// Opaque, externally assigned identifier of a tracked record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A tracked record as observed in one poll.
///
/// Read-only view: this system never creates or destroys records, it only
/// observes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub status: Status,
    pub title: String,
}

impl Record {
    pub fn new(id: RecordId, status: Status, title: impl Into<String>) -> Self {
        Self {
            id,
            status,
            title: title.into(),
        }
    }
}

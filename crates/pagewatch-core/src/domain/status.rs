//! Status - レコードのステータス文字列
//!
//! ステータス集合は外部定義でオープンエンド。ソース側にステータスが
//! 無い場合は番兵値 "No Status" に正規化されます。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a record.
///
/// Statuses come from an open-ended, externally defined set; the only value
/// this system itself introduces is the [`Status::no_status`] sentinel, used
/// when the source record carries no status at all. Comparison is exact
/// string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    /// Sentinel for records whose status field (or its selected value) is absent.
    pub const NO_STATUS: &'static str = "No Status";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn no_status() -> Self {
        Self(Self::NO_STATUS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::no_status()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

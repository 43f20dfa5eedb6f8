//! StatusChange - 検出されたステータス遷移

use serde::{Deserialize, Serialize};

use super::{Record, Status};

/// A detected status transition for one record.
///
/// `previous` is the status recorded at the end of the last tick in which the
/// record appeared; `record.status` is the newly observed one. The two are
/// guaranteed to differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub record: Record,
    pub previous: Status,
}

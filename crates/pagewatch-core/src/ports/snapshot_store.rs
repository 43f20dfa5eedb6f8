//! SnapshotStore port - 前回観測ステータスの保持
//!
//! プロセス生存期間の `RecordId -> Status` マップ。グローバル変数ではなく
//! 注入されるオブジェクトとして扱うことで、ループをグローバル状態なしで
//! テストできます。

use crate::domain::{RecordId, Status};

/// SnapshotStore は各レコードの最終観測ステータスを保持
///
/// # 不変条件
/// - 1 つの id につきエントリは高々 1 つ
/// - エントリの値は、その id が最後に現れた tick で観測されたステータス
/// - エントリは明示的には削除されない（ソースから消えた id は不活性になる）
pub trait SnapshotStore: Send + Sync {
    /// Return the stored status for `id`.
    ///
    /// If the id has never been seen, store `current` as its initial value
    /// and return it — so a freshly seen record is never reported as changed
    /// on first sight.
    fn previous_or_seed(&self, id: &RecordId, current: &Status) -> Status;

    /// Overwrite the stored status unconditionally.
    fn set(&self, id: &RecordId, status: Status);
}

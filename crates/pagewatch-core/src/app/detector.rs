//! ChangeDetector - スナップショットとの突き合わせ
//!
//! # フロー
//! 1. 各レコードについて SnapshotStore::previous_or_seed() で前回値を取得
//!    （未知の id はここで現在値のままシードされ、変更にはならない）
//! 2. 厳密な文字列比較で異なるものだけを入力順のまま返す
//!
//! diff は新しいステータスを書き込みません。書き込み（set）は通知と
//! 合わせて PollLoop が 1 件ずつ行います。

use std::sync::Arc;

use crate::domain::{Record, StatusChange};
use crate::ports::SnapshotStore;

pub struct ChangeDetector {
    store: Arc<dyn SnapshotStore>,
}

impl ChangeDetector {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Compare freshly fetched records against the snapshot and return the
    /// ones whose status differs, preserving input order.
    pub fn diff(&self, records: &[Record]) -> Vec<StatusChange> {
        let mut changes = Vec::new();
        for record in records {
            let previous = self.store.previous_or_seed(&record.id, &record.status);
            if previous != record.status {
                changes.push(StatusChange {
                    record: record.clone(),
                    previous,
                });
            }
        }
        changes
    }
}

//! Impls - ポートの実装
//!
//! # 含まれる実装
//! - **NotionRecordSource**: Notion API を叩く本番用 RecordSource
//! - **SmtpNotifier**: SMTP リレー経由の本番用 Notifier
//! - **InMemorySnapshotStore**: プロセス生存期間のスナップショット

pub mod memory_snapshot;
pub mod notion;
pub mod smtp;

// 主要な型を再エクスポート
pub use self::memory_snapshot::InMemorySnapshotStore;
pub use self::notion::NotionRecordSource;
pub use self::smtp::SmtpNotifier;

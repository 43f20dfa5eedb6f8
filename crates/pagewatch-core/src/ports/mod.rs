//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（ドキュメント DB API, メールリレー）と
//! プロセス内状態（スナップショット）へのインターフェースを提供し、
//! 実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - PollLoop はポートだけに依存する（実装は注入される）
//! - テストではインメモリのフェイクに差し替え可能

pub mod notifier;
pub mod record_source;
pub mod snapshot_store;

// 主要な trait を再エクスポート
pub use self::notifier::Notifier;
pub use self::record_source::RecordSource;
pub use self::snapshot_store::SnapshotStore;

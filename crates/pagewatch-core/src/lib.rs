//! pagewatch-core
//!
//! Core building blocks for the pagewatch status watcher: poll a document
//! database, diff statuses against an in-memory snapshot, and email one
//! notification per detected change.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（record, status, change, errors）
//! - **ports**: 抽象化レイヤー（RecordSource, SnapshotStore, Notifier）
//! - **app**: アプリケーションロジック（detector, poll_loop, builder, counts）
//! - **impls**: 実装（NotionRecordSource, SmtpNotifier, InMemorySnapshotStore）

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;

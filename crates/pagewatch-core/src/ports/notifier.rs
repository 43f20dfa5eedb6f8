//! Notifier port - 変更通知の送信
//!
//! Notifier はメールリレーへの「send message」呼び出しをラップします。
//! 本文サマリの取得は PollLoop の責務で、Notifier は整形と送信だけを行います。

use async_trait::async_trait;

use crate::domain::{NotifyError, StatusChange};

/// Notifier は 1 件のステータス変更を通知する
///
/// # 設計原則
/// - 配送は at-most-once / best-effort。失敗しても再送はしない
/// - 件名・本文のテンプレートは実装側が持つ
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one notification for `change`, embedding the record's body
    /// `summary` in the message.
    async fn notify(&self, change: &StatusChange, summary: &str) -> Result<(), NotifyError>;
}

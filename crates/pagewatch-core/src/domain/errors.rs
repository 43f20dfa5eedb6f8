//! Errors - エラー型と分類
//!
//! 外部コラボレータごとにエラー型を分けます：
//! - **SourceError**: ドキュメント DB API（一覧・詳細取得）の失敗
//! - **NotifyError**: メールリレーの失敗
//! - **WatchError**: 上位 API 向けのラッパー
//!
//! Fetch エラーは tick の外まで伝播し、Send エラーは通知箇所で握って
//! ログに残します（poll_loop を参照）。

use thiserror::Error;

/// Failure while talking to the document-database API.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status code.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected wire shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Failure while sending a notification through the mail relay.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message itself could not be built (bad address, header, body).
    #[error("message build error: {0}")]
    Message(String),

    /// The relay rejected the message or the connection failed.
    #[error("mail transport error: {0}")]
    Transport(String),
}

/// Top-level error for the watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

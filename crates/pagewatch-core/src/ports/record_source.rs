//! RecordSource port - 追跡対象レコードの取得
//!
//! RecordSource はページネーション付きの一覧クエリと、本文取得クエリを
//! ラップします。

use async_trait::async_trait;

use crate::domain::{Record, RecordId, SourceError};

/// RecordSource は外部ドキュメント DB からレコードを読み取る
///
/// # 設計原則
/// - `list_all` はカーソルを最後まで辿り、全ページを 1 つの列に集約する
///   （順序は API の返却順。呼び出し間で安定とは限らない）
/// - リトライはしない。transport/auth エラーはそのまま伝播する
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// List every tracked record, following pagination to the end.
    async fn list_all(&self) -> Result<Vec<Record>, SourceError>;

    /// Fetch the record's body text, one block per line.
    ///
    /// Blocks without text content are skipped; a record with no body at all
    /// yields an empty string.
    async fn detail(&self, id: &RecordId) -> Result<String, SourceError>;
}

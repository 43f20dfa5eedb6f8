//! NotionRecordSource - Notion API を叩く RecordSource 実装
//!
//! # エンドポイント
//! - `POST /v1/databases/{id}/query`: レコード一覧（cursor でページネーション）
//! - `GET /v1/blocks/{id}/children`: 本文ブロック一覧（現スコープでは 1 ページ）
//!
//! # ワイヤ型
//! レスポンスの各フィールドは serde の Option / default で明示的にモデル化
//! します。フィールドの欠落は実行時の形状チェックではなく、型のうえで
//! 「無いかもしれない」ケースとして扱います。

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Record, RecordId, SourceError, Status};
use crate::ports::RecordSource;

const NOTION_API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Property names used when none are configured.
const DEFAULT_STATUS_PROPERTY: &str = "Status";
const DEFAULT_TITLE_PROPERTY: &str = "Name";

pub struct NotionRecordSource {
    client: reqwest::Client,
    token: String,
    database_id: String,
    status_property: String,
    title_property: String,
}

impl NotionRecordSource {
    pub fn new(
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            token: token.into(),
            database_id: database_id.into(),
            status_property: DEFAULT_STATUS_PROPERTY.to_string(),
            title_property: DEFAULT_TITLE_PROPERTY.to_string(),
        })
    }

    /// Override the database property names the status and title are read from.
    pub fn with_properties(
        mut self,
        status_property: impl Into<String>,
        title_property: impl Into<String>,
    ) -> Self {
        self.status_property = status_property.into();
        self.title_property = title_property.into();
        self
    }

    /// Fetch one page of the database query, resuming from `cursor`.
    async fn query_page(&self, cursor: Option<String>) -> Result<QueryResponse, SourceError> {
        let url = format!("{}/databases/{}/query", NOTION_API_BASE, self.database_id);
        let body = QueryRequest {
            start_cursor: cursor,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("database query failed: {e}")))?;

        read_json(response).await
    }

    /// Fetch the child blocks of one record (single page in current scope).
    async fn list_blocks(&self, id: &RecordId) -> Result<BlockChildren, SourceError> {
        let url = format!("{}/blocks/{}/children", NOTION_API_BASE, id.as_str());

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("block listing failed: {e}")))?;

        read_json(response).await
    }

    /// Map one raw page object into a domain [`Record`].
    ///
    /// Status: the configured property's selected value, or the "No Status"
    /// sentinel when the property or its selection is absent.
    /// Title: concatenation of the title property's rich-text runs.
    fn record_from_page(&self, page: PageObject) -> Record {
        let status = page
            .properties
            .get(&self.status_property)
            .and_then(|property| property.select.as_ref())
            .map(|select| Status::new(&select.name))
            .unwrap_or_else(Status::no_status);

        let title: String = page
            .properties
            .get(&self.title_property)
            .map(|property| {
                property
                    .title
                    .iter()
                    .map(|run| run.plain_text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        Record::new(RecordId::new(page.id), status, title)
    }
}

#[async_trait]
impl RecordSource for NotionRecordSource {
    async fn list_all(&self) -> Result<Vec<Record>, SourceError> {
        let pages = collect_pages(|cursor| self.query_page(cursor)).await?;
        Ok(pages
            .into_iter()
            .map(|page| self.record_from_page(page))
            .collect())
    }

    async fn detail(&self, id: &RecordId) -> Result<String, SourceError> {
        let children = self.list_blocks(id).await?;

        let lines: Vec<String> = children
            .results
            .iter()
            .filter_map(Block::plain_text)
            .collect();
        Ok(lines.join("\n"))
    }
}

/// Drain a paginated query: call `fetch` with the cursor from the previous
/// page until the API stops returning one, accumulating every page's results
/// in return order.
async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<PageObject>, SourceError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<QueryResponse, SourceError>>,
{
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let response = fetch(cursor.take()).await?;
        pages.extend(response.results);

        match (response.has_more, response.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            _ => break,
        }
    }

    Ok(pages)
}

/// Decode a response body, turning API-level failures into [`SourceError::Api`].
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(SourceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::Decode(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// ワイヤ型（Notion API のレスポンス形状）
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageObject>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    properties: HashMap<String, PropertyValue>,
}

/// One database property. Only the shapes we read are modeled; anything else
/// deserializes to the defaults and reads as "absent".
#[derive(Debug, Default, Deserialize)]
struct PropertyValue {
    #[serde(default)]
    select: Option<SelectValue>,
    #[serde(default)]
    title: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct SelectValue {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Deserialize)]
struct BlockChildren {
    #[serde(default)]
    results: Vec<Block>,
}

/// One content block. The payload lives under a key named after the block
/// type (`"paragraph"`, `"heading_1"`, ...), so it is captured as a map and
/// resolved per block.
#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(flatten)]
    payload: HashMap<String, serde_json::Value>,
}

/// Text runs inside a block payload. Current blocks carry `rich_text`;
/// pre-2022 payloads used `text`.
#[derive(Debug, Default, Deserialize)]
struct BlockText {
    #[serde(default)]
    rich_text: Vec<RichText>,
    #[serde(default)]
    text: Vec<RichText>,
}

impl Block {
    /// Textual content of this block, or `None` for blocks without text
    /// (dividers, images, unknown types).
    fn plain_text(&self) -> Option<String> {
        let body = self.payload.get(&self.kind)?;
        let text: BlockText = serde_json::from_value(body.clone()).ok()?;

        let runs = if text.rich_text.is_empty() {
            &text.text
        } else {
            &text.rich_text
        };
        if runs.is_empty() {
            return None;
        }

        Some(
            runs.iter()
                .map(|run| run.plain_text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

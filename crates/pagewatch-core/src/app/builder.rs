//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 必須コンポーネント（source / store / notifier）が未設定なら
//!   build() 時に BuildError を返す
//! - 実行が始まってから欠落に気づくより、起動時に落とす

use std::sync::Arc;
use std::time::Duration;

use crate::ports::{Notifier, RecordSource, SnapshotStore};

use super::poll_loop::{DEFAULT_POLL_PERIOD, PollLoop};

/// AppBuilder は PollLoop を組み立てる
///
/// # 使用例
/// ```ignore
/// let poll = AppBuilder::new()
///     .source(source)
///     .store(store)
///     .notifier(notifier)
///     .period(Duration::from_millis(5000))
///     .build()?;
/// ```
pub struct AppBuilder {
    source: Option<Arc<dyn RecordSource>>,
    store: Option<Arc<dyn SnapshotStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    period: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("record source is not configured")]
    MissingSource,

    #[error("snapshot store is not configured")]
    MissingStore,

    #[error("notifier is not configured")]
    MissingNotifier,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            store: None,
            notifier: None,
            period: DEFAULT_POLL_PERIOD,
        }
    }

    pub fn source(mut self, source: Arc<dyn RecordSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn build(self) -> Result<PollLoop, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let notifier = self.notifier.ok_or(BuildError::MissingNotifier)?;
        Ok(PollLoop::new(source, store, notifier, self.period))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::{NotifyError, Record, RecordId, SourceError, StatusChange};
    use crate::impls::InMemorySnapshotStore;

    struct EmptySource;

    #[async_trait]
    impl RecordSource for EmptySource {
        async fn list_all(&self) -> Result<Vec<Record>, SourceError> {
            Ok(vec![])
        }

        async fn detail(&self, _id: &RecordId) -> Result<String, SourceError> {
            Ok(String::new())
        }
    }

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(&self, _change: &StatusChange, _summary: &str) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[test]
    fn build_succeeds_with_all_components() {
        let poll = AppBuilder::new()
            .source(Arc::new(EmptySource))
            .store(Arc::new(InMemorySnapshotStore::new()))
            .notifier(Arc::new(NullNotifier))
            .build();
        assert!(poll.is_ok());
    }

    #[test]
    fn build_fails_fast_on_missing_components() {
        assert!(matches!(
            AppBuilder::new().build(),
            Err(BuildError::MissingSource)
        ));

        assert!(matches!(
            AppBuilder::new().source(Arc::new(EmptySource)).build(),
            Err(BuildError::MissingStore)
        ));

        assert!(matches!(
            AppBuilder::new()
                .source(Arc::new(EmptySource))
                .store(Arc::new(InMemorySnapshotStore::new()))
                .build(),
            Err(BuildError::MissingNotifier)
        ));
    }
}

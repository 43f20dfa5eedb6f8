//! PollLoop - fetch → diff → notify の定期実行
//!
//! # フロー
//! 1. `prime()`（起動時に 1 回だけ）: 全件取得してスナップショットをシード。
//!    通知は発生しない
//! 2. 定常ループ: 周期ごとに `tick()` を実行
//!    - `list_all()` → `diff()` → 変更ごとに set → detail 取得 → notify
//!
//! # スケジューリング
//! タイマーは再アーム式：次の tick は現在の tick の処理が完了してから
//! 予約されます。tick 同士が重なることはなく、処理が周期を超えた場合は
//! 次の tick が遅れるだけです。
//!
//! # エラー方針
//! - fetch エラー（一覧・詳細）は tick を中断してログに残し、次の周期で
//!   自然に再試行する（プロセスは落とさない）
//! - send エラーは通知箇所で握る。スナップショットは既に更新済みなので、
//!   その変更が後の tick で再通知されることはない（at-most-once）

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use crate::domain::{SourceError, WatchError};
use crate::ports::{Notifier, RecordSource, SnapshotStore};

use super::detector::ChangeDetector;
use super::status::PollCounts;

/// Default poll period when none is configured.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(5000);

pub struct PollLoop {
    source: Arc<dyn RecordSource>,
    store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    detector: ChangeDetector,
    period: Duration,
    counts: Mutex<PollCounts>,
}

impl PollLoop {
    pub(crate) fn new(
        source: Arc<dyn RecordSource>,
        store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
        period: Duration,
    ) -> Self {
        let detector = ChangeDetector::new(Arc::clone(&store));
        Self {
            source,
            store,
            notifier,
            detector,
            period,
            counts: Mutex::new(PollCounts::default()),
        }
    }

    /// Snapshot of the running totals.
    pub fn counts(&self) -> PollCounts {
        self.counts.lock().expect("counts lock poisoned").clone()
    }

    /// Populate the snapshot with the statuses currently in the source.
    ///
    /// Runs exactly once at startup, before the polling phase. Seeding goes
    /// through the same `previous_or_seed` path as detection, so nothing is
    /// ever notified here. A failure at this point is fatal to the caller:
    /// without a primed snapshot there is no meaningful baseline to diff
    /// against.
    pub async fn prime(&self) -> Result<usize, SourceError> {
        let records = self.source.list_all().await?;
        for record in &records {
            self.store.previous_or_seed(&record.id, &record.status);
        }
        Ok(records.len())
    }

    /// One full fetch–diff–notify cycle. Returns the number of notifications
    /// actually delivered.
    pub async fn tick(&self) -> Result<usize, WatchError> {
        let records = self.source.list_all().await?;
        let changes = self.detector.diff(&records);
        if !changes.is_empty() {
            tracing::info!(count = changes.len(), "found updated records");
        }

        let mut sent = 0usize;
        for change in &changes {
            // 更新が先、通知が後。送信に失敗しても巻き戻さない。
            self.store.set(&change.record.id, change.record.status.clone());

            let summary = self.source.detail(&change.record.id).await?;
            match self.notifier.notify(change, &summary).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::error!(
                        record = %change.record.id,
                        error = %e,
                        "failed to send notification"
                    );
                    let mut counts = self.counts.lock().expect("counts lock poisoned");
                    counts.send_failures += 1;
                }
            }
        }

        let mut counts = self.counts.lock().expect("counts lock poisoned");
        counts.ticks += 1;
        counts.records_listed += records.len() as u64;
        counts.changes_detected += changes.len() as u64;
        counts.notifications_sent += sent as u64;
        counts.last_tick_at = Some(chrono::Utc::now());
        Ok(sent)
    }

    /// Prime once, then poll until `shutdown` flips to `true`.
    ///
    /// The next tick is armed only after the current one resolves, so ticks
    /// never overlap.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), SourceError> {
        let seeded = self.prime().await?;
        tracing::info!(records = seeded, "snapshot primed, entering polling phase");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = shutdown.changed() => {
                    // 変更が入ったら次のループ先頭で判定
                    continue;
                }
                _ = tokio::time::sleep(self.period) => {}
            }

            if let Err(e) = self.tick().await {
                tracing::error!(error = %e, "tick aborted, retrying on next poll");
                let mut counts = self.counts.lock().expect("counts lock poisoned");
                counts.ticks += 1;
                counts.fetch_failures += 1;
            }
        }

        tracing::info!("poll loop stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{NotifyError, Record, RecordId, Status, StatusChange};
    use crate::impls::InMemorySnapshotStore;

    /// RecordSource fake: each `list_all` pops the next scripted listing.
    struct ScriptedSource {
        listings: Mutex<VecDeque<Vec<Record>>>,
        summary: String,
        fail_detail: bool,
    }

    impl ScriptedSource {
        fn new(listings: Vec<Vec<Record>>) -> Self {
            Self {
                listings: Mutex::new(listings.into()),
                summary: "body summary".to_string(),
                fail_detail: false,
            }
        }
    }

    #[async_trait]
    impl RecordSource for ScriptedSource {
        async fn list_all(&self) -> Result<Vec<Record>, SourceError> {
            self.listings
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| SourceError::Transport("script exhausted".to_string()))
        }

        async fn detail(&self, _id: &RecordId) -> Result<String, SourceError> {
            if self.fail_detail {
                return Err(SourceError::Transport("detail unavailable".to_string()));
            }
            Ok(self.summary.clone())
        }
    }

    /// Notifier fake: records every delivered change, optionally failing.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(StatusChange, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, change: &StatusChange, summary: &str) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Transport("relay rejected".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((change.clone(), summary.to_string()));
            Ok(())
        }
    }

    fn record(id: &str, status: &str) -> Record {
        Record::new(RecordId::new(id), Status::new(status), format!("title-{id}"))
    }

    struct Harness {
        poll: PollLoop,
        store: Arc<InMemorySnapshotStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(source: ScriptedSource, notifier: RecordingNotifier) -> Harness {
        let store = Arc::new(InMemorySnapshotStore::new());
        let notifier = Arc::new(notifier);
        let poll = PollLoop::new(
            Arc::new(source),
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Duration::from_millis(10),
        );
        Harness {
            poll,
            store,
            notifier,
        }
    }

    #[tokio::test]
    async fn priming_seeds_without_notifying() {
        let source = ScriptedSource::new(vec![vec![record("p1", "Todo"), record("p2", "Done")]]);
        let h = harness(source, RecordingNotifier::default());

        let seeded = h.poll.prime().await.unwrap();

        assert_eq!(seeded, 2);
        assert_eq!(h.store.get(&RecordId::new("p1")), Some(Status::new("Todo")));
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_change_notifies_exactly_once() {
        // tick 1: Todo（シード、通知なし）/ tick 2: Done（通知 1 件）/ tick 3: 変化なし
        let source = ScriptedSource::new(vec![
            vec![record("p1", "Todo")],
            vec![record("p1", "Done")],
            vec![record("p1", "Done")],
        ]);
        let h = harness(source, RecordingNotifier::default());

        h.poll.prime().await.unwrap();
        assert_eq!(h.poll.tick().await.unwrap(), 1);
        assert_eq!(h.poll.tick().await.unwrap(), 0);

        let sent = h.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (change, summary) = &sent[0];
        assert_eq!(change.record.title, "title-p1");
        assert_eq!(change.record.status, Status::new("Done"));
        assert_eq!(change.previous, Status::new("Todo"));
        assert_eq!(summary, "body summary");
    }

    #[tokio::test]
    async fn missing_status_then_real_status_notifies_once() {
        let source = ScriptedSource::new(vec![
            vec![Record::new(RecordId::new("p1"), Status::no_status(), "untitled")],
            vec![record("p1", "In Progress")],
        ]);
        let h = harness(source, RecordingNotifier::default());

        h.poll.prime().await.unwrap();
        assert_eq!(h.poll.tick().await.unwrap(), 1);

        let sent = h.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.previous, Status::no_status());
    }

    #[tokio::test]
    async fn send_failure_still_advances_the_snapshot() {
        let source = ScriptedSource::new(vec![
            vec![record("p1", "Todo")],
            vec![record("p1", "Done")],
            vec![record("p1", "Done")],
        ]);
        let h = harness(
            source,
            RecordingNotifier {
                fail: true,
                ..Default::default()
            },
        );

        h.poll.prime().await.unwrap();
        assert_eq!(h.poll.tick().await.unwrap(), 0);

        // スナップショットは更新済み。次の tick で再通知されない。
        assert_eq!(h.store.get(&RecordId::new("p1")), Some(Status::new("Done")));
        assert_eq!(h.poll.tick().await.unwrap(), 0);

        let counts = h.poll.counts();
        assert_eq!(counts.send_failures, 1);
        assert_eq!(counts.notifications_sent, 0);
        assert_eq!(counts.changes_detected, 1);
    }

    #[tokio::test]
    async fn detail_failure_aborts_the_tick_but_keeps_the_set() {
        let mut source = ScriptedSource::new(vec![
            vec![record("p1", "Todo")],
            vec![record("p1", "Done")],
        ]);
        source.fail_detail = true;
        let h = harness(source, RecordingNotifier::default());

        h.poll.prime().await.unwrap();
        let err = h.poll.tick().await.unwrap_err();

        assert!(matches!(err, WatchError::Source(_)));
        // 更新は通知より先に入っているので残る
        assert_eq!(h.store.get(&RecordId::new("p1")), Some(Status::new("Done")));
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_surfaces_as_a_source_error() {
        let source = ScriptedSource::new(vec![]);
        let h = harness(source, RecordingNotifier::default());

        let err = h.poll.tick().await.unwrap_err();
        assert!(matches!(err, WatchError::Source(SourceError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn run_polls_until_shutdown_and_survives_failed_ticks() {
        // prime + 成功 tick 1 回、その後は一覧取得が失敗し続ける
        let source = ScriptedSource::new(vec![
            vec![record("p1", "Todo")],
            vec![record("p1", "Done")],
        ]);
        let store: Arc<InMemorySnapshotStore> = Arc::new(InMemorySnapshotStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let poll = Arc::new(PollLoop::new(
            Arc::new(source),
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Duration::from_millis(10),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn({
            let poll = Arc::clone(&poll);
            async move { poll.run(shutdown_rx).await }
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap().unwrap();

        let counts = poll.counts();
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
        assert!(counts.ticks >= 2);
        assert!(counts.fetch_failures >= 1);
        assert_eq!(counts.notifications_sent, 1);
    }
}

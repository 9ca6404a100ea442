//! Tests for the session host and its persistence worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use strictly_noughts::{
    HISTORY_KEY, HistoryStore, Intent, Mark, MemoryStore, NullStore, Phase, ResultHistory,
    ResultLabel, SessionEvent, SessionHost, StoreError,
};
use tokio::sync::Semaphore;

const X_ROW_WIN: [(usize, usize); 5] = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];

fn play_x_win(host: &mut SessionHost) -> SessionEvent {
    let mut last = SessionEvent::Ignored;
    for (row, col) in X_ROW_WIN {
        last = host
            .handle(Intent::SelectCell { row, col })
            .expect("in range");
    }
    last
}

async fn stored_history(store: &MemoryStore) -> ResultHistory {
    let blob = store.get(HISTORY_KEY).await.expect("memory store read");
    ResultHistory::load(blob.as_deref())
}

/// Store whose reads wait for a permit, so tests can hold a load in flight.
#[derive(Debug)]
struct GatedStore {
    inner: MemoryStore,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl HistoryStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        permit.forget();
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), StoreError> {
        self.inner.set(key, blob).await
    }
}

/// Store that always fails.
#[derive(Debug)]
struct BrokenStore;

#[async_trait]
impl HistoryStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::new("disk on fire"))
    }

    async fn set(&self, _key: &str, _blob: String) -> Result<(), StoreError> {
        Err(StoreError::new("disk on fire"))
    }
}

/// Store that reads normally but can be told to reject writes.
#[derive(Debug)]
struct ReadOnlyStore {
    inner: MemoryStore,
    reject_writes: AtomicBool,
}

impl ReadOnlyStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            reject_writes: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl HistoryStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: String) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::new("read-only"));
        }
        self.inner.set(key, blob).await
    }
}

#[tokio::test]
async fn test_initial_load_surfaces_stored_history() {
    let stored = ResultHistory::new()
        .append(ResultLabel::GameTied)
        .append(ResultLabel::Player2Won);
    let store = MemoryStore::with_entry(HISTORY_KEY, stored.serialize());

    let mut host = SessionHost::new(Arc::new(store));
    host.settle().await;

    let snapshot = host.snapshot();
    assert_eq!(snapshot.history, stored);
    assert_eq!(snapshot.phase, Phase::NotStarted);
}

#[tokio::test]
async fn test_finished_game_is_persisted() {
    let store = MemoryStore::new();
    let mut host = SessionHost::new(Arc::new(store.clone()));

    host.handle(Intent::Start).expect("start");
    let event = play_x_win(&mut host);
    assert!(matches!(
        event,
        SessionEvent::Finished {
            outcome: ResultLabel::Player1Won,
            ..
        }
    ));
    host.settle().await;

    let persisted = stored_history(&store).await;
    assert_eq!(persisted.latest(), Some(ResultLabel::Player1Won));
    assert_eq!(&persisted, host.session().history());
}

#[tokio::test]
async fn test_intermediate_moves_are_not_persisted() {
    let store = MemoryStore::new();
    let mut host = SessionHost::new(Arc::new(store.clone()));

    host.handle(Intent::Start).expect("start");
    host.handle(Intent::SelectCell { row: 1, col: 1 })
        .expect("in range");
    host.settle().await;

    assert_eq!(store.get(HISTORY_KEY).await.expect("read"), None);
}

#[tokio::test]
async fn test_restart_reloads_history() {
    let store = MemoryStore::new();
    let mut host = SessionHost::new(Arc::new(store.clone()));

    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    assert_eq!(host.handle(Intent::Restart), Ok(SessionEvent::Restarted));
    host.settle().await;

    let snapshot = host.snapshot();
    assert_eq!(snapshot.phase, Phase::TurnOf(Mark::X));
    assert_eq!(snapshot.history.latest(), Some(ResultLabel::Player1Won));
}

#[tokio::test]
async fn test_history_carries_across_hosts() {
    let store = MemoryStore::new();

    let mut first = SessionHost::new(Arc::new(store.clone()));
    first.handle(Intent::Start).expect("start");
    play_x_win(&mut first);
    first.shutdown().await;

    let mut second = SessionHost::new(Arc::new(store.clone()));
    second.settle().await;
    assert_eq!(
        second.snapshot().history.latest(),
        Some(ResultLabel::Player1Won)
    );
}

#[tokio::test]
async fn test_stale_load_does_not_overwrite_newer_history() {
    let old = ResultHistory::new().append(ResultLabel::GameTied);
    let gate = Arc::new(Semaphore::new(0));
    let store = GatedStore {
        inner: MemoryStore::with_entry(HISTORY_KEY, old.serialize()),
        gate: Arc::clone(&gate),
    };
    let mut host = SessionHost::new(Arc::new(store));

    // The initial load is still waiting on the gate while a game finishes.
    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    let expected = ResultHistory::new().append(ResultLabel::Player1Won);
    assert_eq!(host.session().history(), &expected);

    gate.add_permits(1);
    host.settle().await;

    assert_eq!(host.snapshot().history, expected);
}

#[tokio::test]
async fn test_store_failures_do_not_disturb_play() {
    let mut host = SessionHost::new(Arc::new(BrokenStore));

    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    host.settle().await;
    assert_eq!(host.handle(Intent::Restart), Ok(SessionEvent::Restarted));
    host.settle().await;

    let snapshot = host.snapshot();
    assert_eq!(snapshot.phase, Phase::TurnOf(Mark::X));
    assert_eq!(snapshot.history.latest(), Some(ResultLabel::Player1Won));
}

#[tokio::test]
async fn test_null_store_keeps_history_in_memory() {
    let mut host = SessionHost::new(Arc::new(NullStore));
    host.settle().await;
    assert_eq!(host.snapshot().history, ResultHistory::new());

    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    host.handle(Intent::Restart).expect("restart");
    host.settle().await;

    assert_eq!(
        host.snapshot().history.latest(),
        Some(ResultLabel::Player1Won)
    );
}

#[tokio::test]
async fn test_out_of_range_reported_by_host() {
    let mut host = SessionHost::new(Arc::new(NullStore));
    host.handle(Intent::Start).expect("start");
    assert!(host.handle(Intent::SelectCell { row: 0, col: 9 }).is_err());
    assert_eq!(host.snapshot().phase, Phase::TurnOf(Mark::X));
}

#[tokio::test]
async fn test_failed_save_keeps_finished_game_across_restart() {
    let old = ResultHistory::new().append(ResultLabel::GameTied);
    let store = ReadOnlyStore::new(MemoryStore::with_entry(HISTORY_KEY, old.serialize()));
    let mut host = SessionHost::new(Arc::new(store));
    host.settle().await;
    assert_eq!(host.snapshot().history, old);

    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    host.settle().await;
    let expected = old.append(ResultLabel::Player1Won);
    assert_eq!(host.snapshot().history, expected);

    host.handle(Intent::Restart).expect("restart");
    host.settle().await;

    assert_eq!(host.snapshot().history, expected);
}

#[tokio::test]
async fn test_malformed_store_does_not_wipe_unsaved_results() {
    let store = ReadOnlyStore::new(MemoryStore::with_entry(HISTORY_KEY, "not json"));
    let mut host = SessionHost::new(Arc::new(store));
    host.settle().await;
    assert_eq!(host.snapshot().history, ResultHistory::new());

    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    host.handle(Intent::Restart).expect("restart");
    host.settle().await;

    assert_eq!(
        host.snapshot().history.latest(),
        Some(ResultLabel::Player1Won)
    );
}

#[tokio::test]
async fn test_reload_resumes_after_a_successful_save() {
    let memory = MemoryStore::new();
    let store = Arc::new(ReadOnlyStore::new(memory.clone()));
    let mut host = SessionHost::new(store.clone());

    host.handle(Intent::Start).expect("start");
    play_x_win(&mut host);
    host.handle(Intent::Restart).expect("restart");
    host.settle().await;
    assert_eq!(stored_history(&memory).await, ResultHistory::new());

    store.reject_writes.store(false, Ordering::SeqCst);
    play_x_win(&mut host);
    host.handle(Intent::Restart).expect("restart");
    host.settle().await;

    let expected = ResultHistory::new()
        .append(ResultLabel::Player1Won)
        .append(ResultLabel::Player1Won);
    assert_eq!(stored_history(&memory).await, expected);
    assert_eq!(host.snapshot().history, expected);
}

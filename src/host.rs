//! Drives a [`GameSession`] against an asynchronous history store.
//!
//! Persistence is fire-and-forget from the session's point of view: intents
//! never wait on the store. Requests go to a single worker task over a channel,
//! so a load issued after a save always observes that save. Load responses are
//! applied before the next intent, and only if the history has not advanced
//! since the load was requested and the store holds the current history.
//! After a failed save the store is behind, so reloads are skipped until a
//! later save succeeds.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::game::{BoardError, GameSession, Intent, SessionEvent, Snapshot};
use crate::history::{HISTORY_KEY, HistoryStore, ResultHistory};

/// Work handed to the persistence worker.
#[derive(Debug)]
enum PersistRequest {
    /// Read the history; tagged with the session revision at request time.
    Load { requested_at: u64 },
    /// Write a serialized history appended at `revision`.
    Save { blob: String, revision: u64 },
    /// Acknowledge once every earlier request has been handled.
    Flush { done: oneshot::Sender<()> },
}

/// What the worker reports back, in request order.
#[derive(Debug)]
enum PersistOutcome {
    /// A stored history was read.
    Loaded {
        history: ResultHistory,
        requested_at: u64,
    },
    /// A save finished; `ok` is false if the store rejected it.
    Saved { revision: u64, ok: bool },
}

/// Owns a session and its persistence worker.
#[derive(Debug)]
pub struct SessionHost {
    session: GameSession,
    requests: mpsc::UnboundedSender<PersistRequest>,
    outcomes: mpsc::UnboundedReceiver<PersistOutcome>,
    /// Latest revision known to be in the store.
    persisted: u64,
    worker: JoinHandle<()>,
}

impl SessionHost {
    /// Creates a host and issues the initial history load.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        let (requests, request_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(store, request_rx, outcome_tx));

        let mut host = Self {
            session: GameSession::new(),
            requests,
            outcomes,
            persisted: 0,
            worker,
        };
        host.request_load();
        info!("Session host ready");
        host
    }

    /// Returns the session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Applies any completed loads and returns the state for rendering.
    pub fn snapshot(&mut self) -> Snapshot {
        self.absorb_outcomes();
        self.session.snapshot()
    }

    /// Applies an intent, then schedules any persistence it calls for.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] for a cell outside the board.
    #[instrument(skip(self))]
    pub fn handle(&mut self, intent: Intent) -> Result<SessionEvent, BoardError> {
        self.absorb_outcomes();
        let event = self.session.apply(intent)?;
        match event {
            SessionEvent::Finished { history, .. } => self.request_save(&history),
            SessionEvent::Restarted => self.request_load(),
            SessionEvent::Ignored | SessionEvent::Started | SessionEvent::Placed { .. } => {}
        }
        Ok(event)
    }

    /// Waits for every outstanding persistence request, then applies loads.
    #[instrument(skip(self))]
    pub async fn settle(&mut self) {
        let (done, wait) = oneshot::channel();
        if self.requests.send(PersistRequest::Flush { done }).is_ok() && wait.await.is_err() {
            warn!("Persistence worker stopped before flushing");
        }
        self.absorb_outcomes();
    }

    /// Settles outstanding work and stops the worker.
    #[instrument(skip(self))]
    pub async fn shutdown(mut self) {
        self.settle().await;
        drop(self.requests);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "Persistence worker panicked");
        }
    }

    fn request_load(&mut self) {
        let requested_at = self.session.history_revision();
        debug!(requested_at, "Requesting history load");
        self.send(PersistRequest::Load { requested_at });
    }

    fn request_save(&mut self, history: &ResultHistory) {
        let revision = self.session.history_revision();
        debug!(revision, "Requesting history save");
        self.send(PersistRequest::Save {
            blob: history.serialize(),
            revision,
        });
    }

    fn send(&self, request: PersistRequest) {
        if self.requests.send(request).is_err() {
            warn!("Persistence worker is gone, request dropped");
        }
    }

    fn absorb_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            match outcome {
                PersistOutcome::Saved { revision, ok: true } => {
                    self.persisted = self.persisted.max(revision);
                }
                PersistOutcome::Saved { revision, ok: false } => {
                    debug!(revision, persisted = self.persisted, "Store is behind");
                }
                PersistOutcome::Loaded {
                    history,
                    requested_at,
                } => {
                    if requested_at != self.persisted {
                        debug!(
                            requested_at,
                            persisted = self.persisted,
                            "Discarding load, store is behind"
                        );
                        continue;
                    }
                    if self.session.apply_loaded_history(history, requested_at) {
                        debug!(requested_at, "Applied loaded history");
                    }
                }
            }
        }
    }
}

/// Handles persistence requests in order until the host goes away.
///
/// Failures are logged and otherwise ignored. A failed or empty read sends no
/// response, leaving the in-memory history as it is.
async fn run_worker(
    store: Arc<dyn HistoryStore>,
    mut requests: mpsc::UnboundedReceiver<PersistRequest>,
    outcomes: mpsc::UnboundedSender<PersistOutcome>,
) {
    while let Some(request) = requests.recv().await {
        match request {
            PersistRequest::Load { requested_at } => match store.get(HISTORY_KEY).await {
                Ok(Some(blob)) => {
                    let history = ResultHistory::load(Some(&blob));
                    // The host may already be gone; nothing to apply then.
                    let _ = outcomes.send(PersistOutcome::Loaded {
                        history,
                        requested_at,
                    });
                }
                Ok(None) => debug!("No stored history"),
                Err(e) => warn!(error = %e, "History load failed"),
            },
            PersistRequest::Save { blob, revision } => {
                let ok = match store.set(HISTORY_KEY, blob).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(error = %e, revision, "History save failed");
                        false
                    }
                };
                let _ = outcomes.send(PersistOutcome::Saved { revision, ok });
            }
            PersistRequest::Flush { done } => {
                let _ = done.send(());
            }
        }
    }
    debug!("Persistence worker stopped");
}

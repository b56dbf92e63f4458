//! Candidate store: fetches the candidate list once on activation and exposes
//! `(candidates, loading, error)` snapshots to the event loop.

pub mod error;
pub mod source;

pub use error::FetchError;
pub use source::{DataSource, HttpDataSource, StaticDataSource};

use crate::core::candidate::Candidate;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

type FetchOutcome<C> = Result<Vec<C>, FetchError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot<C> {
    pub candidates: Vec<C>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl<C> Default for StoreSnapshot<C> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

pub struct CandidateStore<C> {
    source: Arc<dyn DataSource<C>>,
    activated: bool,
    snapshot: StoreSnapshot<C>,
    worker: Option<JoinHandle<()>>,
    completion_tx: Sender<FetchOutcome<C>>,
    completion_rx: Receiver<FetchOutcome<C>>,
}

impl<C: Candidate> CandidateStore<C> {
    pub fn new(source: impl DataSource<C> + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn DataSource<C>>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<FetchOutcome<C>>();
        Self {
            source,
            activated: false,
            snapshot: StoreSnapshot::default(),
            worker: None,
            completion_tx,
            completion_rx,
        }
    }

    pub fn snapshot(&self) -> &StoreSnapshot<C> {
        &self.snapshot
    }

    /// Starts the one and only fetch. Returns `false` when already activated.
    pub fn activate(&mut self) -> bool {
        if self.activated {
            debug!("candidate store already activated; not refetching");
            return false;
        }
        self.activated = true;
        self.snapshot.loading = true;
        self.snapshot.error = None;

        let source = Arc::clone(&self.source);
        let completion_tx = self.completion_tx.clone();
        info!(source = %source.describe(), "fetching candidates");
        self.worker = Some(std::thread::spawn(move || {
            let outcome = source.fetch();
            let _ = completion_tx.send(outcome);
        }));
        true
    }

    /// Applies a finished fetch, if any. Returns the new snapshot when it changed.
    pub fn poll(&mut self) -> Option<&StoreSnapshot<C>> {
        match self.completion_rx.try_recv() {
            Ok(outcome) => {
                self.apply(outcome);
                Some(&self.snapshot)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                if !self.worker_finished() {
                    return None;
                }
                // The worker sends before it exits, so its result is visible by now.
                let outcome = self
                    .completion_rx
                    .try_recv()
                    .unwrap_or(Err(FetchError::WorkerLost));
                self.apply(outcome);
                Some(&self.snapshot)
            }
        }
    }

    fn worker_finished(&self) -> bool {
        self.snapshot.loading
            && self
                .worker
                .as_ref()
                .is_some_and(|handle| handle.is_finished())
    }

    fn apply(&mut self, outcome: FetchOutcome<C>) {
        self.worker = None;
        self.snapshot = match outcome {
            Ok(candidates) => {
                info!(count = candidates.len(), "candidates loaded");
                StoreSnapshot {
                    candidates,
                    loading: false,
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "candidate fetch failed");
                StoreSnapshot {
                    candidates: Vec::new(),
                    loading: false,
                    error: Some(err),
                }
            }
        };
    }
}

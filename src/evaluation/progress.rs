use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Notification emitted once a descriptor has been filtered and scored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterProgress {
    /// Position of the descriptor in the caller's list.
    pub index: usize,
    pub total: usize,
    pub label: String,
}

/// Receives progress notifications. Purely advisory: observers cannot
/// influence the result set.
pub trait ProgressObserver: Sync {
    fn on_filter_done(&self, progress: &FilterProgress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&FilterProgress) + Sync,
{
    fn on_filter_done(&self, progress: &FilterProgress) {
        self(progress)
    }
}

/// Forwards notifications into a channel. A disconnected receiver is ignored.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<FilterProgress>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<FilterProgress>) -> Self {
        Self { tx }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_filter_done(&self, progress: &FilterProgress) {
        let _ = self.tx.send(progress.clone());
    }
}

/// Cooperative cancellation flag, checked between descriptors.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

//! Progress reporting for long-running research requests.
//!
//! Every pipeline stage emits `(status, percent)` milestones so the
//! serving layer can keep a streaming connection alive during multi-minute
//! runs. Reporting is fire-and-forget: the pipeline never awaits a
//! consumer and never fails because one lagged. Percent is "generally
//! increasing" with no strict monotonicity guarantee.

use std::sync::Arc;

use tokio::sync::mpsc;

/// Observer for pipeline progress milestones.
pub trait ProgressReporter: Send + Sync {
    /// Called at each meaningful milestone. Must not block.
    fn report(&self, status: &str, percent: u8);
}

/// Reporter that discards all progress. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _status: &str, _percent: u8) {}
}

/// A single progress emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub status: String,
    pub percent: u8,
}

/// Reporter backed by a bounded channel.
///
/// Uses `try_send`: when the consumer lags and the buffer fills, events
/// are dropped. Buffering and coalescing policy belongs to the consumer,
/// not the pipeline.
pub struct ChannelReporter {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ChannelReporter {
    /// Create a reporter and its receiving end with the given buffer size.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, status: &str, percent: u8) {
        let _ = self.tx.try_send(ProgressEvent {
            status: status.to_string(),
            percent: percent.min(100),
        });
    }
}

/// Reporter wrapping a closure.
pub struct FnReporter<F: Fn(&str, u8) + Send + Sync>(pub F);

impl<F: Fn(&str, u8) + Send + Sync> ProgressReporter for FnReporter<F> {
    fn report(&self, status: &str, percent: u8) {
        (self.0)(status, percent)
    }
}

impl ProgressReporter for Arc<dyn ProgressReporter> {
    fn report(&self, status: &str, percent: u8) {
        self.as_ref().report(status, percent)
    }
}

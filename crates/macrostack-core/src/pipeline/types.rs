use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};

use crate::consts::{
    PROGRESS_ALIGN, PROGRESS_DEPTH_COMPOSITE, PROGRESS_DEPTH_SELECT, PROGRESS_DEPTH_SMOOTH,
    PROGRESS_INGEST, PROGRESS_RESIZE, PROGRESS_STACK,
};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Alignment,
    Stacking,
    DepthSelection,
    DepthSmoothing,
    DepthCompositing,
    Resizing,
}

impl PipelineStage {
    /// Percent sub-range `(start, end)` owned by this stage.
    pub fn range(self) -> (u8, u8) {
        match self {
            Self::Loading => PROGRESS_INGEST,
            Self::Alignment => PROGRESS_ALIGN,
            Self::Stacking => PROGRESS_STACK,
            Self::DepthSelection => PROGRESS_DEPTH_SELECT,
            Self::DepthSmoothing => PROGRESS_DEPTH_SMOOTH,
            Self::DepthCompositing => PROGRESS_DEPTH_COMPOSITE,
            Self::Resizing => PROGRESS_RESIZE,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading"),
            Self::Alignment => write!(f, "Aligning"),
            Self::Stacking => write!(f, "Stacking"),
            Self::DepthSelection => write!(f, "Depth map"),
            Self::DepthSmoothing => write!(f, "Smoothing"),
            Self::DepthCompositing => write!(f, "Compositing"),
            Self::Resizing => write!(f, "Resizing"),
        }
    }
}

/// Thread-safe progress sink.
///
/// `report` may be called from any worker thread. `percent` is in `0..=100`
/// and the message is advisory text for display only.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, _percent: u8, _message: &str) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// One progress update as delivered to the channel reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub percent: u8,
    pub message: String,
}

/// Progress reporter that forwards events over an mpsc channel to a single
/// reader.
///
/// Percent values never decrease on the receiving side: the high-water mark
/// is updated under the same lock as the send.
pub struct ChannelReporter {
    state: Mutex<ChannelState>,
}

struct ChannelState {
    tx: mpsc::Sender<ProgressEvent>,
    high_water: u8,
}

impl ChannelReporter {
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self {
            state: Mutex::new(ChannelState { tx, high_water: 0 }),
        }
    }

    /// Create a reporter together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, percent: u8, message: &str) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let percent = percent.min(100).max(state.high_water);
        state.high_water = percent;
        // A dropped receiver only means nobody is listening any more.
        let _ = state.tx.send(ProgressEvent {
            percent,
            message: message.to_string(),
        });
    }
}

/// Maps a shared work counter onto a stage's percent sub-range.
///
/// Workers call [`ProgressSpan::tick`] once per completed item (row or
/// file); an event is emitted every `interval` items.
pub struct ProgressSpan<'a> {
    reporter: &'a dyn ProgressReporter,
    stage: PipelineStage,
    total: usize,
    interval: usize,
    done: AtomicUsize,
}

impl<'a> ProgressSpan<'a> {
    pub fn new(
        reporter: &'a dyn ProgressReporter,
        stage: PipelineStage,
        total: usize,
        interval: usize,
    ) -> Self {
        Self {
            reporter,
            stage,
            total: total.max(1),
            interval: interval.max(1),
            done: AtomicUsize::new(0),
        }
    }

    /// Percent for `done` completed items.
    pub fn percent_at(&self, done: usize) -> u8 {
        let (start, end) = self.stage.range();
        let span = (end - start) as usize;
        let done = done.min(self.total);
        start + (done * span / self.total) as u8
    }

    /// Report the start of the stage.
    pub fn begin(&self, message: &str) {
        self.reporter.report(self.stage.range().0, message);
    }

    /// Record one completed item, reporting `"<stage>: n%"` on interval.
    pub fn tick(&self) {
        self.tick_with(|done, total| format!("{}: {}%", self.stage, done * 100 / total));
    }

    /// Record one completed item with a custom message on interval.
    pub fn tick_with(&self, message: impl FnOnce(usize, usize) -> String) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.interval == 0 || done == self.total {
            self.reporter
                .report(self.percent_at(done), &message(done, self.total));
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

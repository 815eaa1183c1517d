use std::sync::{Arc, Mutex, atomic::AtomicBool, mpsc};

use looptime::{EpochReport, RunMetadata};

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

pub enum RunStatus {
    /// The simulated training run is executing in a background thread.
    Running {
        stop_flag: Arc<AtomicBool>,
        report_rx: Arc<Mutex<mpsc::Receiver<EpochReport>>>,
        total_epochs: usize,
    },
    /// The run completed (naturally or via Stop).
    /// `was_stopped` is true when Stop was requested before all epochs ran.
    Done {
        elapsed_total_ms: u64,
        was_stopped: bool,
    },
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct MonitorState {
    /// Current run lifecycle state.
    pub run: RunStatus,
    /// Every epoch report received so far, in epoch order.
    pub history: Vec<EpochReport>,
    /// Identity record collected at startup.
    pub meta: RunMetadata,
}

impl MonitorState {
    pub fn new(run: RunStatus, meta: RunMetadata) -> MonitorState {
        MonitorState { run, history: Vec::new(), meta }
    }
}

/// Shared state type: an `Arc<Mutex<MonitorState>>` passed to every handler.
pub type SharedState = Arc<Mutex<MonitorState>>;

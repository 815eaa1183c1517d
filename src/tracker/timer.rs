use crate::clock::Stopwatch;

/// A running measurement handed out by `TimingTracker::start`.
///
/// The timer holds no reference back into the tracker, so several can be
/// live at once. The usual shape is an outer epoch-wall timer wrapping the
/// per-phase timers of the loop body. Passing the timer to
/// `TimingTracker::stop` ends the measurement and credits the bucket;
/// dropping it without stopping records nothing.
#[derive(Debug)]
pub struct PhaseTimer {
    pub(crate) key: String,
    pub(crate) stopwatch: Stopwatch,
    pub(crate) synced: bool,
}

impl PhaseTimer {
    /// Bucket key this timer will credit when stopped.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Seconds elapsed so far, without stopping the timer.
    pub fn elapsed_secs(&self) -> f64 {
        self.stopwatch.elapsed_secs()
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::clock::{DeviceBarrier, Stopwatch};
use crate::phase::Phase;
use crate::report::EpochReport;
use crate::tracker::bucket::BucketStat;
use crate::tracker::timer::PhaseTimer;

/// Per-epoch accumulator of wall-clock seconds, keyed by phase.
///
/// One tracker lives for the whole training run. At the start of each epoch
/// the trainer calls `reset`, times its phases with `start`/`stop` (or the
/// closure form `time`), and finishes with `flush`, which snapshots the
/// epoch's buckets into an `EpochReport` and clears them for the next one.
///
/// Buckets are string-keyed so ad-hoc sections can be timed alongside the
/// well-known `Phase` set. Sections are expected to be disjoint in the
/// trainer: the tracker sums whatever it is told, so nesting one timed
/// section inside another books the inner seconds twice. The one sanctioned
/// overlap is the epoch wall, which deliberately spans everything.
pub struct TimingTracker {
    buckets: BTreeMap<String, BucketStat>,
    barrier: Option<Arc<dyn DeviceBarrier>>,
}

impl TimingTracker {
    /// Tracker that reads the host clock directly. Right for CPU-only runs.
    pub fn new() -> TimingTracker {
        TimingTracker { buckets: BTreeMap::new(), barrier: None }
    }

    /// Tracker that waits on `barrier` before each clock read around
    /// device-bound phases, so the measured span covers kernel execution
    /// rather than kernel submission.
    pub fn with_barrier(barrier: Arc<dyn DeviceBarrier>) -> TimingTracker {
        TimingTracker { buckets: BTreeMap::new(), barrier: Some(barrier) }
    }

    /// Clear all buckets. Called at the top of every epoch.
    pub fn reset(&mut self) {
        self.buckets.clear();
    }

    /// Credit `seconds` to a well-known phase and bump its count.
    pub fn add(&mut self, phase: Phase, seconds: f64) {
        self.add_key(phase.key(), seconds);
    }

    /// Credit `seconds` to an arbitrary bucket key and bump its count.
    pub fn add_key(&mut self, key: &str, seconds: f64) {
        self.buckets.entry(key.to_string()).or_default().record(seconds);
    }

    /// Begin timing a well-known phase. Device-bound phases wait on the
    /// barrier (when one is installed) before the start sample is taken.
    pub fn start(&self, phase: Phase) -> PhaseTimer {
        let synced = phase.device_bound() && self.barrier.is_some();
        self.start_key(phase.key(), synced)
    }

    /// Begin timing an arbitrary bucket key. `synced` asks for a barrier
    /// wait before each clock read; it is ignored when no barrier is
    /// installed.
    pub fn start_key(&self, key: &str, synced: bool) -> PhaseTimer {
        let synced = synced && self.barrier.is_some();
        self.sync_if(synced);
        PhaseTimer {
            key: key.to_string(),
            stopwatch: Stopwatch::start(),
            synced,
        }
    }

    /// End a measurement and credit its bucket. For a synced timer the
    /// barrier is waited on again before the stop sample, so in-flight
    /// device work is charged to this section and not smeared into the next.
    pub fn stop(&mut self, timer: PhaseTimer) -> f64 {
        self.sync_if(timer.synced);
        let seconds = timer.stopwatch.elapsed_secs();
        self.add_key(&timer.key, seconds);
        seconds
    }

    /// Time a closure as one invocation of `phase` and pass its value
    /// through.
    pub fn time<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let timer = self.start(phase);
        let value = f();
        self.stop(timer);
        value
    }

    /// Accumulated seconds for a phase this epoch. Zero if never recorded.
    pub fn seconds(&self, phase: Phase) -> f64 {
        self.buckets.get(phase.key()).map_or(0.0, |s| s.seconds)
    }

    /// Invocation count for a phase this epoch. Zero if never recorded.
    pub fn count(&self, phase: Phase) -> u64 {
        self.buckets.get(phase.key()).map_or(0, |s| s.count)
    }

    /// Snapshot the current buckets into a report without clearing them.
    ///
    /// Every phase in `Phase::ALL` appears in the report, zero-filled when
    /// nothing was recorded, so reserved buckets still show up in logs.
    /// Ad-hoc keys recorded this epoch are carried over as-is.
    pub fn snapshot(&self, epoch: usize) -> EpochReport {
        let mut buckets = BTreeMap::new();
        for phase in Phase::ALL {
            buckets.insert(phase.key().to_string(), BucketStat::default());
        }
        for (key, stat) in &self.buckets {
            buckets.insert(key.clone(), *stat);
        }
        EpochReport { epoch, buckets }
    }

    /// End-of-epoch report: snapshot the buckets, then clear them so the
    /// next epoch starts from zero.
    pub fn flush(&mut self, epoch: usize) -> EpochReport {
        let report = self.snapshot(epoch);
        self.reset();
        report
    }

    fn sync_if(&self, synced: bool) {
        if synced {
            if let Some(barrier) = &self.barrier {
                barrier.wait();
            }
        }
    }
}

impl Default for TimingTracker {
    fn default() -> TimingTracker {
        TimingTracker::new()
    }
}

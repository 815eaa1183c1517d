use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;

use looptime::{EpochReport, Phase, TimingTracker};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Shape of the simulated model-based RL training run.
///
/// Per-phase costs are base microseconds per invocation, jittered so the
/// charts look like a real run rather than flat lines.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub epochs: usize,
    /// Environment steps collected per epoch.
    pub env_steps: usize,
    /// Imagination batches rolled out per epoch.
    pub rollout_batches: usize,
    pub env_step_us: u64,
    pub rollout_us: u64,
    pub diffusion_teacher_us: u64,
    pub diffusion_student_us: u64,
    pub policy_update_us: u64,
    pub world_model_update_us: u64,
    /// Relative jitter applied to every cost, in [0, 1].
    pub jitter: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            epochs: 40,
            env_steps: 16,
            rollout_batches: 4,
            env_step_us: 2_000,
            rollout_us: 6_000,
            diffusion_teacher_us: 12_000,
            diffusion_student_us: 3_000,
            policy_update_us: 15_000,
            world_model_update_us: 25_000,
            jitter: 0.25,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulated training loop
// ---------------------------------------------------------------------------

/// Runs the simulated trainer for `cfg.epochs` epochs, emitting one
/// `EpochReport` per completed epoch, and returns how many epochs ran.
///
/// # Early termination
/// The loop breaks early if:
/// - the `report_tx` receiver has been dropped, **or**
/// - `stop_flag` is set to `true`.
pub fn run(
    cfg: &SimConfig,
    report_tx: mpsc::Sender<EpochReport>,
    stop_flag: Arc<AtomicBool>,
) -> usize {
    let mut tracker = TimingTracker::new();
    let mut completed = 0;

    for epoch in 0..cfg.epochs {
        // Check stop flag at the top of each epoch.
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }

        let wall = tracker.start(Phase::EpochWall);

        // ── Collect experience from the real environments ──────────────────
        for _ in 0..cfg.env_steps {
            tracker.time(Phase::EnvInteraction, || busy(cfg.env_step_us, cfg.jitter));
        }

        // ── Imagination rollouts ───────────────────────────────────────────
        // Diffusion sampling is timed in its own sections, outside the
        // rollout bucket, so its seconds are not counted twice.
        for _ in 0..cfg.rollout_batches {
            tracker.time(Phase::ImaginationRollout, || busy(cfg.rollout_us, cfg.jitter));
            tracker.time(Phase::DiffusionSamplingTeacher, || {
                busy(cfg.diffusion_teacher_us, cfg.jitter)
            });
            tracker.time(Phase::DiffusionSamplingStudent, || {
                busy(cfg.diffusion_student_us, cfg.jitter)
            });
        }

        // ── Gradient updates ───────────────────────────────────────────────
        tracker.time(Phase::PolicyValueUpdate, || busy(cfg.policy_update_us, cfg.jitter));
        tracker.time(Phase::WorldModelUpdate, || busy(cfg.world_model_update_us, cfg.jitter));

        // DistillationOracleQuery is reserved and never timed; it still
        // appears zero-filled in every report.

        tracker.stop(wall);

        // ── Emit the epoch report ──────────────────────────────────────────
        let report = tracker.flush(epoch);
        completed = epoch + 1;
        // If the receiver has been dropped, stop the run.
        if report_tx.send(report).is_err() {
            break;
        }

        if stop_flag.load(Ordering::Relaxed) {
            break;
        }
    }

    completed
}

/// Burns roughly `base_us` microseconds of wall clock, jittered.
fn busy(base_us: u64, jitter: f64) {
    let spread = (base_us as f64 * jitter) as u64;
    let low = base_us.saturating_sub(spread);
    let high = base_us + spread + 1;
    let us = rand::thread_rng().gen_range(low..high);
    thread::sleep(Duration::from_micros(us));
}

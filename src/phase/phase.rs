use serde::{Serialize, Deserialize};
use std::fmt;

/// Prefix shared by every logged metric key.
pub const METRIC_PREFIX: &str = "timing/";

/// The well-known timing buckets of one model-based RL training epoch.
///
/// The serde name of each variant doubles as the bucket's string key, so a
/// `Phase` and a hand-written key like `"env_interaction"` land in the same
/// bucket. Each phase flattens to two logged metrics:
/// `timing/<key>_sec` and `timing/<key>_count`.
///
/// - `EpochWall`: whole-epoch wall clock, measured independently of the
///   other buckets
/// - `EnvInteraction`: stepping the real environments
/// - `ImaginationRollout`: world-model rollout, diffusion excluded
/// - `DiffusionSamplingTeacher`: next-observation denoising, teacher role
/// - `DiffusionSamplingStudent`: next-observation denoising, student role
/// - `PolicyValueUpdate`: actor-critic training
/// - `WorldModelUpdate`: denoiser and reward/end-model training
/// - `DistillationOracleQuery`: reserved, never timed today, reports zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    EpochWall,
    EnvInteraction,
    ImaginationRollout,
    DiffusionSamplingTeacher,
    DiffusionSamplingStudent,
    PolicyValueUpdate,
    WorldModelUpdate,
    DistillationOracleQuery,
}

impl Phase {
    /// Every known phase, epoch wall included. Epoch reports zero-fill this
    /// set so reserved buckets still appear in the log.
    pub const ALL: [Phase; 8] = [
        Phase::EpochWall,
        Phase::EnvInteraction,
        Phase::ImaginationRollout,
        Phase::DiffusionSamplingTeacher,
        Phase::DiffusionSamplingStudent,
        Phase::PolicyValueUpdate,
        Phase::WorldModelUpdate,
        Phase::DistillationOracleQuery,
    ];

    /// The accountable buckets: every phase except the epoch wall. Their
    /// summed seconds should stay at or below the wall, the gap being loop
    /// overhead outside any bucket.
    pub const BUCKETS: [Phase; 7] = [
        Phase::EnvInteraction,
        Phase::ImaginationRollout,
        Phase::DiffusionSamplingTeacher,
        Phase::DiffusionSamplingStudent,
        Phase::PolicyValueUpdate,
        Phase::WorldModelUpdate,
        Phase::DistillationOracleQuery,
    ];

    /// Stable string key for this bucket. Matches the serde name.
    pub fn key(self) -> &'static str {
        match self {
            Phase::EpochWall => "epoch_wall",
            Phase::EnvInteraction => "env_interaction",
            Phase::ImaginationRollout => "imagination_rollout",
            Phase::DiffusionSamplingTeacher => "diffusion_sampling_teacher",
            Phase::DiffusionSamplingStudent => "diffusion_sampling_student",
            Phase::PolicyValueUpdate => "policy_value_update",
            Phase::WorldModelUpdate => "world_model_update",
            Phase::DistillationOracleQuery => "distillation_oracle_query",
        }
    }

    /// Logged metric name for this bucket's accumulated seconds.
    pub fn metric_sec(self) -> String {
        metric_sec_key(self.key())
    }

    /// Logged metric name for this bucket's invocation count.
    pub fn metric_count(self) -> String {
        metric_count_key(self.key())
    }

    /// Whether timing this phase waits on the device barrier before the
    /// clock is read. Environment stepping is CPU-dominated and the epoch
    /// wall is sampled on the host; everything else runs on the accelerator.
    pub fn device_bound(self) -> bool {
        !matches!(self, Phase::EpochWall | Phase::EnvInteraction)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::EpochWall => write!(f, "WALL"),
            Phase::EnvInteraction => write!(f, "ENV"),
            Phase::ImaginationRollout => write!(f, "ROLLOUT"),
            Phase::DiffusionSamplingTeacher => write!(f, "DIFF-T"),
            Phase::DiffusionSamplingStudent => write!(f, "DIFF-S"),
            Phase::PolicyValueUpdate => write!(f, "POLICY"),
            Phase::WorldModelUpdate => write!(f, "WM"),
            Phase::DistillationOracleQuery => write!(f, "ORACLE"),
        }
    }
}

/// `timing/<key>_sec` for an arbitrary bucket key.
pub fn metric_sec_key(key: &str) -> String {
    format!("{}{}_sec", METRIC_PREFIX, key)
}

/// `timing/<key>_count` for an arbitrary bucket key.
pub fn metric_count_key(key: &str) -> String {
    format!("{}{}_count", METRIC_PREFIX, key)
}

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::phase::{metric_count_key, metric_sec_key, Phase};
use crate::tracker::BucketStat;

/// Per-epoch timing breakdown emitted by `TimingTracker::flush`.
///
/// When a report channel is configured, the trainer sends one `EpochReport`
/// at the end of every completed epoch. Receivers (a logger, the live
/// monitor's SSE handler) use it to drive metric streams and charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochReport {
    /// 0-based epoch number.
    pub epoch: usize,
    /// Bucket key to accumulated seconds and count. Always contains every
    /// key in `Phase::ALL`, zero-filled where nothing was recorded, plus
    /// any ad-hoc keys timed this epoch.
    pub buckets: BTreeMap<String, BucketStat>,
}

impl EpochReport {
    /// Seconds measured for the whole epoch by the independent wall timer.
    pub fn wall_seconds(&self) -> f64 {
        self.seconds(Phase::EpochWall.key())
    }

    /// Sum of every bucket except the epoch wall.
    pub fn accounted_seconds(&self) -> f64 {
        self.buckets
            .iter()
            .filter(|(key, _)| key.as_str() != Phase::EpochWall.key())
            .map(|(_, stat)| stat.seconds)
            .sum()
    }

    /// Wall seconds not claimed by any bucket. Loop overhead lands here;
    /// a strongly negative residual means some section was double-booked.
    pub fn residual_seconds(&self) -> f64 {
        self.wall_seconds() - self.accounted_seconds()
    }

    /// Accumulated seconds for a bucket key. Zero for unknown keys.
    pub fn seconds(&self, key: &str) -> f64 {
        self.buckets.get(key).map_or(0.0, |s| s.seconds)
    }

    /// Invocation count for a bucket key. Zero for unknown keys.
    pub fn count(&self, key: &str) -> u64 {
        self.buckets.get(key).map_or(0, |s| s.count)
    }

    /// Flatten the report into metric-logger form: for each bucket key,
    /// `timing/<key>_sec` holding seconds and `timing/<key>_count` holding
    /// the count as a float.
    pub fn to_log(&self) -> BTreeMap<String, f64> {
        let mut log = BTreeMap::new();
        for (key, stat) in &self.buckets {
            log.insert(metric_sec_key(key), stat.seconds);
            log.insert(metric_count_key(key), stat.count as f64);
        }
        log
    }

    /// One-line terminal summary of this epoch's accounting.
    pub fn format_terminal(&self) -> String {
        format!(
            "epoch {:>4} | wall {:>8.3}s | accounted {:>8.3}s | residual {:>7.3}s",
            self.epoch,
            self.wall_seconds(),
            self.accounted_seconds(),
            self.residual_seconds(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(entries: &[(&str, f64, u64)]) -> EpochReport {
        let mut buckets = BTreeMap::new();
        for phase in Phase::ALL {
            buckets.insert(phase.key().to_string(), BucketStat::default());
        }
        for (key, seconds, count) in entries {
            buckets.insert(
                key.to_string(),
                BucketStat { seconds: *seconds, count: *count },
            );
        }
        EpochReport { epoch: 7, buckets }
    }

    #[test]
    fn accounting_splits_wall_into_buckets_and_residual() {
        let report = report_with(&[
            ("epoch_wall", 10.0, 1),
            ("env_interaction", 3.0, 6),
            ("imagination_rollout", 2.0, 4),
            ("diffusion_sampling_teacher", 4.0, 4),
            ("policy_value_update", 1.0, 2),
        ]);

        assert_eq!(report.wall_seconds(), 10.0);
        assert!((report.accounted_seconds() - 10.0).abs() < 1e-9);
        assert!(report.residual_seconds().abs() < 1e-9);
    }

    #[test]
    fn to_log_emits_sec_and_count_per_bucket() {
        let report = report_with(&[("env_interaction", 3.5, 7)]);
        let log = report.to_log();

        assert_eq!(log.get("timing/env_interaction_sec"), Some(&3.5));
        assert_eq!(log.get("timing/env_interaction_count"), Some(&7.0));
        // Reserved buckets are present and zero.
        assert_eq!(log.get("timing/distillation_oracle_query_sec"), Some(&0.0));
        assert_eq!(log.get("timing/distillation_oracle_query_count"), Some(&0.0));
        // Two metrics per known phase.
        assert_eq!(log.len(), Phase::ALL.len() * 2);
    }

    #[test]
    fn serde_round_trip_preserves_buckets() {
        let report = report_with(&[("world_model_update", 1.25, 3)]);
        let json = serde_json::to_string(&report).expect("serialize report");
        let back: EpochReport = serde_json::from_str(&json).expect("deserialize report");

        assert_eq!(back.epoch, 7);
        assert_eq!(back.seconds("world_model_update"), 1.25);
        assert_eq!(back.count("world_model_update"), 3);
    }

    #[test]
    fn format_terminal_mentions_wall_and_residual() {
        let report = report_with(&[("epoch_wall", 2.0, 1), ("env_interaction", 0.5, 1)]);
        let line = report.format_terminal();

        assert!(line.contains("epoch    7"));
        assert!(line.contains("wall"));
        assert!(line.contains("residual"));
    }
}

pub mod phase;

pub use phase::{metric_count_key, metric_sec_key, Phase, METRIC_PREFIX};

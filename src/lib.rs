pub mod phase;
pub mod clock;
pub mod tracker;
pub mod report;
pub mod runmeta;

// Convenience re-exports
pub use phase::{metric_count_key, metric_sec_key, Phase, METRIC_PREFIX};
pub use clock::barrier::DeviceBarrier;
pub use clock::stopwatch::Stopwatch;
pub use tracker::bucket::BucketStat;
pub use tracker::timer::PhaseTimer;
pub use tracker::tracker::TimingTracker;
pub use report::epoch_report::EpochReport;
pub use report::sink::{ConsoleSink, JsonlSink, NoopSink, ReportSink};
pub use runmeta::metadata::RunMetadata;

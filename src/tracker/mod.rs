pub mod bucket;
pub mod timer;
pub mod tracker;

pub use bucket::BucketStat;
pub use timer::PhaseTimer;
pub use tracker::TimingTracker;

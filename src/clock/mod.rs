pub mod barrier;
pub mod stopwatch;

pub use barrier::DeviceBarrier;
pub use stopwatch::Stopwatch;

/// Synchronization point consulted before reading the clock around
/// device-bound work.
///
/// Accelerator kernels are launched asynchronously, so a host-side timestamp
/// taken right after a launch reflects queue submission, not execution. A
/// `DeviceBarrier` blocks until previously submitted work has finished,
/// making the surrounding host timestamps meaningful. The tracker waits on
/// the barrier twice per device-bound section: once before the start sample
/// and once before the stop sample.
///
/// A tracker built without a barrier times everything host-side, which is
/// the right default for CPU-only runs and for tests.
pub trait DeviceBarrier: Send + Sync {
    /// Block until all previously submitted device work has completed.
    fn wait(&self);
}

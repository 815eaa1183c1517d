use std::thread;
use std::time::Duration;

use rand::Rng;

use looptime::{ConsoleSink, JsonlSink, Phase, ReportSink, TimingTracker};

/// Simulated model-based RL training loop showing the intended tracker use:
/// an outer epoch-wall timer, disjoint phase sections inside it, one flush
/// per epoch, reports going to the console and a JSONL file.
fn main() {
    let epochs = 10;
    let env_steps = 12;
    let rollout_batches = 3;

    let mut tracker = TimingTracker::new();
    let mut console = ConsoleSink;
    let mut jsonl = JsonlSink::create("timing_log.jsonl").ok();

    let mut last = None;
    for epoch in 0..epochs {
        let wall = tracker.start(Phase::EpochWall);

        for _ in 0..env_steps {
            tracker.time(Phase::EnvInteraction, || busy(1_500));
        }

        for _ in 0..rollout_batches {
            tracker.time(Phase::ImaginationRollout, || busy(5_000));
            tracker.time(Phase::DiffusionSamplingTeacher, || busy(9_000));
            tracker.time(Phase::DiffusionSamplingStudent, || busy(2_500));
        }

        tracker.time(Phase::PolicyValueUpdate, || busy(12_000));
        tracker.time(Phase::WorldModelUpdate, || busy(20_000));

        tracker.stop(wall);

        let report = tracker.flush(epoch);
        console.record_epoch(&report);
        if let Some(sink) = jsonl.as_mut() {
            sink.record_epoch(&report);
        }
        last = Some(report);
    }

    if let Some(report) = last {
        println!();
        println!("last epoch by phase:");
        for phase in Phase::ALL {
            let key = phase.key();
            println!(
                "  {:<8} {:>9.4}s  x{:<4} ({})",
                phase.to_string(),
                report.seconds(key),
                report.count(key),
                key,
            );
        }
        println!();
        println!("full log written to timing_log.jsonl");
    }
}

/// Burns roughly `base_us` microseconds of wall clock, jittered +-25%.
fn busy(base_us: u64) {
    let spread = base_us / 4;
    let us = rand::thread_rng().gen_range(base_us - spread..base_us + spread);
    thread::sleep(Duration::from_micros(us));
}

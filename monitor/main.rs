/// looptime monitor
///
/// A browser dashboard for watching a training run's timing breakdown live.
/// Served by a synchronous tiny_http server; no JavaScript frameworks
/// required. The monitored run is a built-in simulated trainer, so the
/// dashboard can be explored without a GPU or an environment suite.
///
/// Run with:
///   cargo run --bin monitor --release
/// Then open http://127.0.0.1:7979
///
/// Routes:
///   GET  /                  dashboard page
///   GET  /timing/events     SSE stream of per-epoch reports
///   GET  /timing/log.json   full report history
///   GET  /meta.json         run identity record
///   POST /stop              request early stop
mod render;
mod routes;
mod sim;
mod sse;
mod state;

use std::sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}, mpsc};
use std::thread;
use std::time::Instant;

use tiny_http::Server;

use looptime::{EpochReport, RunMetadata};

use sim::SimConfig;
use state::{MonitorState, RunStatus};

fn main() {
    let addr = "127.0.0.1:7979";
    let server = Server::http(addr).expect("Failed to bind HTTP server");

    let meta = RunMetadata::collect(None);
    let cfg = SimConfig::default();

    println!("╔══════════════════════════════════════════════╗");
    println!("║          looptime monitor                    ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Open in your browser:                       ║");
    println!("║  http://{}                 ║", addr);
    println!("╚══════════════════════════════════════════════╝");
    println!("run_id: {}", meta.run_id);

    let (tx, rx) = mpsc::channel::<EpochReport>();
    let stop_flag = Arc::new(AtomicBool::new(false));
    let report_rx = Arc::new(Mutex::new(rx));

    let shared_state = Arc::new(Mutex::new(MonitorState::new(
        RunStatus::Running {
            stop_flag: stop_flag.clone(),
            report_rx: report_rx.clone(),
            total_epochs: cfg.epochs,
        },
        meta,
    )));

    // Background simulated training run. When it finishes, leftover reports
    // still sitting in the channel are drained into history before the
    // status flips to Done, so late page loads see the complete run.
    let state_clone = shared_state.clone();
    let sim_stop = stop_flag.clone();
    thread::spawn(move || {
        let t_start = Instant::now();
        sim::run(&cfg, tx, sim_stop.clone());
        let elapsed_total_ms = t_start.elapsed().as_millis() as u64;
        let was_stopped = sim_stop.load(Ordering::Relaxed);

        let mut st = state_clone.lock().unwrap();
        let remaining: Vec<EpochReport> = {
            if let RunStatus::Running { report_rx, .. } = &st.run {
                let rx = report_rx.lock().unwrap();
                let mut buf = Vec::new();
                while let Ok(report) = rx.try_recv() {
                    buf.push(report);
                }
                buf
            } else {
                Vec::new()
            }
        };
        st.history.extend(remaining);
        st.run = RunStatus::Done { elapsed_total_ms, was_stopped };

        println!(
            "run finished: {} epochs in {:.1}s{}",
            st.history.len(),
            elapsed_total_ms as f64 / 1000.0,
            if was_stopped { " (stopped)" } else { "" },
        );
    });

    // Each request is dispatched on its own thread so the SSE handler
    // (which blocks for the entire run duration) does not stall regular
    // page loads and form submissions.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}

use std::io::Write;
use std::time::Duration;

use tiny_http::Request;

use crate::state::{RunStatus, SharedState};

/// `GET /timing/events`: Server-Sent Events handler.
///
/// This handler consumes `request` (takes ownership so we can call
/// `into_writer`) and drives a long-lived loop that:
/// 1. Replays every `EpochReport` already in history.
/// 2. Tries to receive the next report from the run channel with a 500 ms
///    timeout; on success, pushes it to history and writes an
///    `event: epoch` frame.
/// 3. On timeout, writes a keep-alive `: ping\n\n` comment.
/// 4. On channel disconnect (run finished), writes a `done` event carrying
///    the final status, then closes.
///
/// Client reconnection is handled natively by `EventSource`.
pub fn handle(request: Request, state: SharedState) {
    // tiny_http's `into_writer()` gives us the raw TCP stream so we can
    // write the HTTP response and then stream SSE frames directly.
    let mut writer = request.into_writer();

    // Write HTTP response headers manually (tiny_http into_writer path).
    let header = "HTTP/1.1 200 OK\r\n\
                  Content-Type: text/event-stream\r\n\
                  Cache-Control: no-cache\r\n\
                  Connection: keep-alive\r\n\
                  X-Accel-Buffering: no\r\n\
                  \r\n";
    if write_all(&mut writer, header.as_bytes()).is_err() {
        return;
    }

    // Extract the receiver Arc from state (clone it out so we don't hold
    // the lock while blocking on the channel).
    let report_rx = {
        let st = state.lock().unwrap();
        match &st.run {
            RunStatus::Running { report_rx, .. } => Some(report_rx.clone()),
            RunStatus::Done { .. } => None,
        }
    };

    // Replay history so far, so a late-joining client sees the whole run.
    {
        let st = state.lock().unwrap();
        for report in &st.history {
            if let Ok(json) = serde_json::to_string(report) {
                let msg = format!("event: epoch\ndata: {}\n\n", json);
                if write_all(&mut writer, msg.as_bytes()).is_err() {
                    return;
                }
            }
        }
    }

    let rx_arc = match report_rx {
        Some(r) => r,
        None => {
            // The run already finished; report the final status and close.
            let _ = write_all(&mut writer, final_event(&state).as_bytes());
            return;
        }
    };

    // Main receive loop.
    loop {
        let result = {
            let rx = rx_arc.lock().unwrap();
            rx.recv_timeout(Duration::from_millis(500))
        };

        match result {
            Ok(report) => {
                {
                    let mut st = state.lock().unwrap();
                    st.history.push(report.clone());
                }

                match serde_json::to_string(&report) {
                    Ok(json) => {
                        let msg = format!("event: epoch\ndata: {}\n\n", json);
                        if write_all(&mut writer, msg.as_bytes()).is_err() {
                            return;
                        }
                    }
                    Err(_) => continue,
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Keep-alive ping.
                if write_all(&mut writer, b": ping\n\n").is_err() {
                    return;
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                // The run thread closed the sender; report final status.
                let _ = write_all(&mut writer, final_event(&state).as_bytes());
                return;
            }
        }
    }
}

/// Builds the terminal `done` event from the current run status.
fn final_event(state: &SharedState) -> String {
    let st = state.lock().unwrap();
    let epochs_completed = st.history.len();
    match &st.run {
        RunStatus::Done { elapsed_total_ms, was_stopped } => format!(
            "event: done\ndata: {{\"elapsed_total_ms\":{},\"was_stopped\":{},\"epochs_completed\":{}}}\n\n",
            elapsed_total_ms, was_stopped, epochs_completed
        ),
        RunStatus::Running { .. } => {
            // Sender dropped but the status flip has not landed yet.
            format!(
                "event: done\ndata: {{\"epochs_completed\":{}}}\n\n",
                epochs_completed
            )
        }
    }
}

/// Writes all bytes to the writer, returning `Err` on any I/O failure.
fn write_all<W: Write>(w: &mut W, data: &[u8]) -> std::io::Result<()> {
    w.write_all(data)?;
    w.flush()
}

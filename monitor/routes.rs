use std::io::Cursor;
use std::sync::atomic::Ordering;

use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::render;
use crate::sse;
use crate::state::{RunStatus, SharedState};

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"text/html; charset=utf-8").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn json_response(body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"application/json").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::new(
        StatusCode(303),
        vec![
            Header::from_bytes(b"Location", location.as_bytes()).unwrap(),
            Header::from_bytes(b"Content-Length", b"0").unwrap(),
        ],
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = b"404 Not Found".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(404),
        vec![Header::from_bytes(b"Content-Type", b"text/plain").unwrap()],
        Cursor::new(body),
        Some(len),
        None,
    )
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// The SSE handler takes ownership of the request to perform long-lived
/// streaming; every other route builds a response and lets the dispatcher
/// call `request.respond`.
pub fn dispatch(request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();

    // No route takes query parameters; strip them so "/?x=1" still matches.
    let path = match url.find('?') {
        Some(pos) => url[..pos].to_owned(),
        None => url,
    };

    // SSE is long-lived; the handler takes ownership and drives the stream.
    if method == Method::Get && path == "/timing/events" {
        sse::handle(request, state);
        return;
    }

    let response = match (method, path.as_str()) {
        (Method::Get, "/") => {
            let st = state.lock().unwrap();
            html_response(render::dashboard_page(&st))
        }

        // Full report history as a JSON array, for offline analysis.
        (Method::Get, "/timing/log.json") => {
            let st = state.lock().unwrap();
            match serde_json::to_string_pretty(&st.history) {
                Ok(json) => json_response(json),
                Err(_) => not_found(),
            }
        }

        // Identity record of the monitored run.
        (Method::Get, "/meta.json") => {
            let st = state.lock().unwrap();
            match serde_json::to_string_pretty(&st.meta) {
                Ok(json) => json_response(json),
                Err(_) => not_found(),
            }
        }

        (Method::Post, "/stop") => {
            let st = state.lock().unwrap();
            if let RunStatus::Running { stop_flag, .. } = &st.run {
                stop_flag.store(true, Ordering::Relaxed);
            }
            drop(st);
            redirect("/")
        }

        _ => not_found(),
    };

    let _ = request.respond(response);
}

use crate::state::{MonitorState, RunStatus};

/// Single-page dashboard renderer.
///
/// The page lives in `monitor/assets/monitor.html` with placeholder tokens
/// like `{{TOKEN}}`, loaded at compile time. Identity fields are substituted
/// here; live data arrives over SSE, so the page is rendered once per load
/// and never re-rendered server-side.
const TEMPLATE: &str = include_str!("assets/monitor.html");

pub fn dashboard_page(st: &MonitorState) -> String {
    let total_epochs = match &st.run {
        RunStatus::Running { total_epochs, .. } => *total_epochs,
        RunStatus::Done { .. } => st.history.len(),
    };

    let run_id_short: String = st.meta.run_id.chars().take(8).collect();
    let host = st.meta.host.clone().unwrap_or_else(|| "unknown".into());
    let device = st.meta.gpu_name.clone().unwrap_or_else(|| "cpu".into());
    let commit = match &st.meta.git_commit {
        Some(hash) => {
            let short: String = hash.chars().take(7).collect();
            if st.meta.git_dirty {
                format!("{}+dirty", short)
            } else {
                short
            }
        }
        None => "unknown".into(),
    };

    let html = TEMPLATE
        .replace("{{RUN_ID}}", &html_escape(&run_id_short))
        .replace("{{HOST}}", &html_escape(&host))
        .replace("{{DEVICE}}", &html_escape(&device))
        .replace("{{COMMIT}}", &html_escape(&commit))
        .replace("{{TOTAL_EPOCHS}}", &total_epochs.to_string());

    blank_remaining(html)
}

/// Minimal HTML entity escape for text interpolated into the template.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Replaces any `{{TOKEN}}` that wasn't already substituted with an empty
/// string, so a missed token produces a clean page rather than leaking
/// template internals to the browser.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

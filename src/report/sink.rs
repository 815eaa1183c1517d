use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::report::EpochReport;

/// Abstract destination for per-epoch timing reports.
pub trait ReportSink {
    fn record_epoch(&mut self, report: &EpochReport);
}

/// Sink that discards all reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ReportSink for NoopSink {
    fn record_epoch(&mut self, _report: &EpochReport) {
        // intentionally no-op
    }
}

/// Sink that prints the one-line terminal summary per epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn record_epoch(&mut self, report: &EpochReport) {
        println!("{}", report.format_terminal());
    }
}

/// JSONL file sink.
///
/// Each epoch is written as a single JSON object on its own line, carrying
/// the epoch number plus the flattened `timing/<key>_sec` and
/// `timing/<key>_count` metrics, i.e. the same shape a metric logger would
/// receive.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink writing to `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<JsonlSink> {
        let file = File::create(path)?;
        Ok(JsonlSink { writer: BufWriter::new(file) })
    }
}

impl ReportSink for JsonlSink {
    fn record_epoch(&mut self, report: &EpochReport) {
        let mut object = serde_json::Map::new();
        object.insert("epoch".to_string(), serde_json::json!(report.epoch));
        for (metric, value) in report.to_log() {
            object.insert(metric, serde_json::json!(value));
        }
        let line = serde_json::Value::Object(object);

        // A failed write must not take the training loop down with it,
        // so we deliberately ignore I/O errors.
        let _ = writeln!(self.writer, "{}", line);
        let _ = self.writer.flush();
    }
}

pub mod epoch_report;
pub mod sink;

pub use epoch_report::EpochReport;
pub use sink::{ConsoleSink, JsonlSink, NoopSink, ReportSink};

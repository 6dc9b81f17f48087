mod emitter;

pub use emitter::{ReportError, render_json, write_report};

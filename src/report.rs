//! Renders the timings of a finished run.

use std::io::Write;

use serde::Serialize;

use crate::{PolicyKind, Result, TimingResult};

/// The line printed above the per-trial timings.
pub const HEADER: &str = "Time(seconds)";

/// Consumes the timings of a finished run.
pub trait ResultSink {
    /// Renders the timings that `policy` produced.
    fn emit(&mut self, policy: PolicyKind, result: &TimingResult) -> Result<()>;
}

/// Writes a header line followed by one line per trial, with 6 decimal digits.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> TextSink<W> {
        TextSink { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for TextSink<W> {
    fn emit(&mut self, policy: PolicyKind, result: &TimingResult) -> Result<()> {
        // 标签只写日志，stdout 保持纯数字
        info!("Timings of {} ({} trials)", policy, result.len());
        writeln!(self.out, "{}", HEADER)?;
        for secs in result.trials() {
            writeln!(self.out, "{:.6}", secs)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct Report<'a> {
    policy: String,
    trials: &'a [f64],
}

/// Writes one JSON object per run: `{"policy": ..., "trials": [...]}`.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> JsonSink<W> {
        JsonSink { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn emit(&mut self, policy: PolicyKind, result: &TimingResult) -> Result<()> {
        let report = Report {
            policy: policy.to_string(),
            trials: result.trials(),
        };
        serde_json::to_writer(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

use crate::emitter::{EmitContext, EmitResult, Emitter};
use std::io::Write;
use vflow_core::CallArgumentReport;

/// Machine-readable output for downstream tooling. Indentation and color
/// settings in the context do not apply; only `pretty` changes the shape.
#[derive(Debug, Default)]
pub struct JsonReportEmitter {
    pretty: bool,
}

impl JsonReportEmitter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Emitter for JsonReportEmitter {
    type Item = CallArgumentReport;

    fn emit<W: Write>(
        &self,
        report: &CallArgumentReport,
        writer: &mut W,
        _context: &mut EmitContext,
    ) -> EmitResult {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, report)?;
        } else {
            serde_json::to_writer(&mut *writer, report)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips_the_report() {
        let report = CallArgumentReport {
            module: "demo".into(),
            calls: Vec::new(),
        };

        let mut context = EmitContext::plain();
        let json = JsonReportEmitter::new()
            .emit_to_string(&report, &mut context)
            .unwrap();

        let parsed: CallArgumentReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}

use crate::emitter::{EmitContext, EmitResult, Emitter};
use colored::Colorize;
use std::io::Write;
use vflow_core::{AliasResult, CallArgumentReport, PointsToSet, ValueId};

/// Human-readable listing of call sites, arguments, and their upstream
/// definition sites.
#[derive(Debug, Default)]
pub struct TextReportEmitter;

impl TextReportEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for TextReportEmitter {
    type Item = CallArgumentReport;

    fn emit<W: Write>(
        &self,
        report: &CallArgumentReport,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let header = format!(
            "module {}: {} resolved call site{}",
            report.module,
            report.calls.len(),
            if report.calls.len() == 1 { "" } else { "s" }
        );
        writeln!(writer, "{}{}", context.get_indent(), paint_bold(&header, context))?;

        for call in &report.calls {
            let mut line = format!("call {} (in {})", call.callee, call.function);
            if let Some(location) = &call.location {
                line.push_str(&format!(" @ {}", location));
            }
            writeln!(
                writer,
                "{}{}",
                context.get_indent(),
                paint_green(&line, context)
            )?;

            context.indent();
            for argument in &call.arguments {
                writeln!(
                    writer,
                    "{}arg {}: {} definition site{}",
                    context.get_indent(),
                    argument.value,
                    argument.def_sites.len(),
                    if argument.def_sites.len() == 1 { "" } else { "s" }
                )?;

                context.indent();
                for site in &argument.def_sites {
                    writeln!(writer, "{}{}", context.get_indent(), site.describe())?;
                }
                context.dedent();
            }
            context.dedent();
        }

        Ok(())
    }
}

pub fn format_points_to(value: ValueId, set: &PointsToSet) -> String {
    if set.unknown {
        return format!("{} -> {{unknown}}", value);
    }
    let targets: Vec<String> = set.targets.iter().map(|t| t.to_string()).collect();
    format!("{} -> {{{}}}", value, targets.join(", "))
}

pub fn format_alias(lhs: ValueId, rhs: ValueId, result: AliasResult) -> String {
    format!("alias({}, {}) = {}", lhs, rhs, result)
}

fn paint_bold(text: &str, context: &EmitContext) -> String {
    if context.use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn paint_green(text: &str, context: &EmitContext) -> String {
    if context.use_colors {
        text.bright_green().to_string()
    } else {
        text.to_string()
    }
}

//! `vcdgen inspect`: show the module tree of a trace with the identifier
//! code each signal is assigned and how many samples it carries.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use vcdgen_core::{HeaderOptions, ModuleId, Session, VcdError};

use crate::trace::{ModuleSpec, TraceFile};
use crate::{GlobalArgs, InspectArgs, ReportFormat};

/// Summary of one module.
#[derive(Debug, Serialize)]
pub struct ModuleReport {
    /// Dotted path from the root.
    pub path: String,
    /// Signals declared directly in the module.
    pub signals: Vec<SignalReport>,
    /// Nested modules.
    pub modules: Vec<ModuleReport>,
}

/// Summary of one signal.
#[derive(Debug, Serialize)]
pub struct SignalReport {
    /// Signal name.
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Identifier code used in the document.
    pub symbol: String,
    /// Number of recorded samples.
    pub values: usize,
}

/// Runs the `vcdgen inspect` command.
///
/// The report goes to stdout in every mode; `--quiet` drops the stderr
/// summary line.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let trace = TraceFile::load(Path::new(&args.trace))?;
    let report = build_report(&trace)?;
    let out = match args.format {
        ReportFormat::Text => render_text(&report),
        ReportFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
    };
    print!("{out}");
    if !global.quiet {
        eprintln!("   {}", summary_line(&report));
    }
    Ok(0)
}

/// Totals over the whole tree, e.g. `2 modules, 3 signals, 3 samples`.
pub fn summary_line(report: &ModuleReport) -> String {
    fn walk(m: &ModuleReport, totals: &mut (usize, usize, usize)) {
        totals.0 += 1;
        totals.1 += m.signals.len();
        totals.2 += m.signals.iter().map(|s| s.values).sum::<usize>();
        for sub in &m.modules {
            walk(sub, totals);
        }
    }
    let mut totals = (0, 0, 0);
    walk(report, &mut totals);
    format!(
        "{} modules, {} signals, {} samples",
        totals.0, totals.1, totals.2
    )
}

/// Builds the trace into a session and reports what emission would declare.
pub fn build_report(trace: &TraceFile) -> Result<ModuleReport, VcdError> {
    let (session, root) = trace.build(HeaderOptions::default())?;
    module_report(&session, root, &trace.top)
}

fn module_report(
    session: &Session,
    id: ModuleId,
    spec: &ModuleSpec,
) -> Result<ModuleReport, VcdError> {
    let hierarchy = session.hierarchy();
    let module = session.module(id)?;

    let mut signals = Vec::with_capacity(module.signals().len());
    for (&sig, sig_spec) in module.signals().iter().zip(&spec.signals) {
        let signal = session.signal(sig)?;
        signals.push(SignalReport {
            name: hierarchy.signal_name(sig)?.to_string(),
            width: signal.width(),
            symbol: signal.symbol().to_string(),
            values: sig_spec.values.len(),
        });
    }

    let mut modules = Vec::with_capacity(module.submodules().len());
    for (&child, child_spec) in module.submodules().iter().zip(&spec.modules) {
        modules.push(module_report(session, child, child_spec)?);
    }

    Ok(ModuleReport {
        path: hierarchy.module_path(id)?,
        signals,
        modules,
    })
}

/// Indented tree, one line per module and signal.
pub fn render_text(report: &ModuleReport) -> String {
    let mut out = String::new();
    write_module(&mut out, report, 0);
    out
}

fn write_module(out: &mut String, report: &ModuleReport, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{}", report.path);
    for s in &report.signals {
        let _ = writeln!(
            out,
            "{indent}  {:<4} {} [{}] {} values",
            s.symbol, s.name, s.width, s.values
        );
    }
    for m in &report.modules {
        write_module(out, m, depth + 1);
    }
}

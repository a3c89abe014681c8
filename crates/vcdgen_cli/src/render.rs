//! `vcdgen render`: write the VCD document for a trace description.
//!
//! Header fields come from `vcdgen.toml`, then the trace's own `timescale`,
//! then `--timescale`, each layer overriding the previous one. The document
//! goes to `--stdout`, `-o`, the configured `[output] path`, or
//! `<trace stem>.vcd` next to the trace, in that order of preference.

use std::path::{Path, PathBuf};

use tracing::debug;
use vcdgen_config::VcdgenConfig;
use vcdgen_core::{HeaderOptions, Sink, Timescale};

use crate::trace::TraceFile;
use crate::{GlobalArgs, RenderArgs};

/// Runs the `vcdgen render` command.
pub fn run(args: &RenderArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let trace_path = PathBuf::from(&args.trace);
    let trace = TraceFile::load(&trace_path)?;

    let header = resolve_header(&config, &trace, args.timescale.as_deref())?;
    debug!(timescale = %header.timescale, "resolved header");

    let sink = resolve_sink(args, &config, &trace_path);
    let (session, root) = trace.build(header)?;
    let signals = session.hierarchy().signal_count();
    let changes = session.observation_count();

    session.finalize(root, &sink)?;

    if !global.quiet {
        if let Sink::File(path) = &sink {
            eprintln!(
                "   Wrote {} ({signals} signals, {changes} value changes)",
                path.display()
            );
        }
    }
    Ok(0)
}

/// Loads `--config` if given, otherwise `vcdgen.toml` from the working directory.
fn load_config(global: &GlobalArgs) -> Result<VcdgenConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => vcdgen_config::load_config_file(Path::new(path))?,
        None => vcdgen_config::load_config_or_default(&std::env::current_dir()?)?,
    };
    Ok(config)
}

fn resolve_header(
    config: &VcdgenConfig,
    trace: &TraceFile,
    cli_timescale: Option<&str>,
) -> Result<HeaderOptions, Box<dyn std::error::Error>> {
    let mut header = config.header.to_header_options()?;
    if let Some(ts) = trace.timescale.as_deref() {
        header.timescale = ts.parse::<Timescale>()?;
    }
    if let Some(ts) = cli_timescale {
        header.timescale = ts.parse::<Timescale>()?;
    }
    Ok(header)
}

fn resolve_sink(args: &RenderArgs, config: &VcdgenConfig, trace_path: &Path) -> Sink {
    if args.stdout {
        return Sink::Stdout;
    }
    if let Some(out) = args.output.as_deref().or(config.output.path.as_deref()) {
        return Sink::file(out);
    }
    Sink::file(trace_path.with_extension("vcd"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = r#"
{
  "timescale": "10ns",
  "top": {
    "name": "logic",
    "signals": [ { "name": "en", "values": [[0, 0], [3, 1]] } ]
  }
}
"#;

    fn args(trace: &Path) -> RenderArgs {
        RenderArgs {
            trace: trace.display().to_string(),
            output: None,
            stdout: false,
            timescale: None,
        }
    }

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: config.map(|p| p.display().to_string()),
        }
    }

    #[test]
    fn timescale_layers_override_in_order() {
        let config = vcdgen_config::load_config_from_str(
            "[header]\ntimescale = \"1us\"\nversion = \"cfg\"\n",
        )
        .unwrap();
        let trace: TraceFile = serde_json::from_str(TRACE).unwrap();

        let header = resolve_header(&config, &trace, None).unwrap();
        assert_eq!(header.timescale.to_string(), "10ns");
        assert_eq!(header.version, "cfg");

        let header = resolve_header(&config, &trace, Some("100 fs")).unwrap();
        assert_eq!(header.timescale.to_string(), "100fs");

        assert!(resolve_header(&config, &trace, Some("5ns")).is_err());
    }

    #[test]
    fn sink_preference() {
        let trace = Path::new("traces/logic.json");
        let config = vcdgen_config::load_config_from_str("[output]\npath = \"cfg.vcd\"\n").unwrap();
        let mut a = args(trace);

        assert_eq!(resolve_sink(&a, &config, trace), Sink::file("cfg.vcd"));
        assert_eq!(
            resolve_sink(&a, &VcdgenConfig::default(), trace),
            Sink::file("traces/logic.vcd")
        );
        a.output = Some("cli.vcd".into());
        assert_eq!(resolve_sink(&a, &config, trace), Sink::file("cli.vcd"));
        a.output = None;
        a.stdout = true;
        assert_eq!(resolve_sink(&a, &config, trace), Sink::Stdout);
    }

    #[test]
    fn render_writes_next_to_trace() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("logic.json");
        std::fs::write(&trace, TRACE).unwrap();
        let config = dir.path().join("vcdgen.toml");
        std::fs::write(&config, "[header]\ndate = \"Aug 27, 2021\"\n").unwrap();

        let code = run(&args(&trace), &global(Some(config.as_path()))).unwrap();
        assert_eq!(code, 0);

        let doc = std::fs::read_to_string(dir.path().join("logic.vcd")).unwrap();
        assert!(doc.starts_with("$date\n   Aug 27, 2021\n$end\n"));
        assert!(doc.contains("$timescale 10ns $end\n"));
        assert!(doc.ends_with("#0\n0!\n#3\n1!\n"));
    }

    #[test]
    fn render_reports_missing_trace() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("vcdgen.toml");
        std::fs::write(&config, "").unwrap();
        let missing = dir.path().join("absent.json");
        let err = run(&args(&missing), &global(Some(config.as_path()))).unwrap_err();
        assert!(err.to_string().contains("cannot read trace"));
    }
}

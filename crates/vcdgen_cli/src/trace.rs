//! Trace description files: a module tree with per-signal `(time, value)` samples.
//!
//! ```json
//! { "top": { "name": "logic",
//!            "signals": [ { "name": "data", "width": 8,
//!                           "values": [[0, 0], [100, 85]] } ],
//!            "modules": [] } }
//! ```
//!
//! The same structure is accepted as TOML.

use std::path::Path;

use serde::Deserialize;
use vcdgen_core::{HeaderOptions, ModuleId, Session, VcdError};

/// A whole trace description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceFile {
    /// Timescale for this trace; overrides the configuration file.
    #[serde(default)]
    pub timescale: Option<String>,
    /// The root module.
    pub top: ModuleSpec,
}

/// One module and everything nested in it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// Module name.
    pub name: String,
    /// Signals declared directly in the module.
    #[serde(default)]
    pub signals: Vec<SignalSpec>,
    /// Nested modules.
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

/// One signal with its recorded samples.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalSpec {
    /// Signal name.
    pub name: String,
    /// Width in bits.
    #[serde(default = "default_width")]
    pub width: u32,
    /// `(time, value)` samples in recording order.
    #[serde(default)]
    pub values: Vec<(u64, u64)>,
}

fn default_width() -> u32 {
    1
}

impl TraceFile {
    /// Reads a trace, choosing the parser by file extension.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read trace {}: {e}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(format!(
                "unrecognized trace extension for {} (expected .json or .toml)",
                path.display()
            )
            .into()),
        }
    }

    /// Builds a session holding the whole tree and every sample.
    pub fn build(&self, header: HeaderOptions) -> Result<(Session, ModuleId), VcdError> {
        let mut session = Session::with_header(header);
        let root = build_module(&mut session, &self.top)?;
        Ok((session, root))
    }
}

fn build_module(session: &mut Session, spec: &ModuleSpec) -> Result<ModuleId, VcdError> {
    let module = session.create_module(&spec.name)?;
    for sig in &spec.signals {
        let id = session.create_signal(&sig.name, sig.width)?;
        session.add_signal(module, id)?;
        session.record_many(id, sig.values.iter().copied())?;
    }
    for sub in &spec.modules {
        let child = build_module(session, sub)?;
        session.add_submodule(module, child)?;
    }
    Ok(module)
}

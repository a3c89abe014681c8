//! Whole-document VCD emission from a module tree and an observation store.
//!
//! A document is produced in four phases, each exactly once and in order:
//! header, hierarchy, `$enddefinitions`, value changes. The text is assembled
//! in memory and handed to a [`Sink`] only after every phase succeeded, so a
//! rendering failure never leaves a truncated file behind.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, info, trace};

use crate::error::VcdError;
use crate::format::{
    format_value, write_change, write_enddefinitions, write_header, write_scope, write_time,
    write_upscope, write_var, HeaderOptions,
};
use crate::ids::{ModuleId, SignalId};
use crate::model::Hierarchy;
use crate::store::ObservationStore;

/// Destination for a finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Create (or truncate) a file at this path.
    File(PathBuf),
    /// Write to standard output.
    Stdout,
}

impl Sink {
    /// Shorthand for [`Sink::File`].
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Sink::File(path.into())
    }

    /// Writes a complete document to the sink.
    pub fn write_document(&self, bytes: &[u8]) -> Result<(), VcdError> {
        match self {
            Sink::File(path) => {
                if path.as_os_str().is_empty() {
                    return Err(VcdError::InvalidSink {
                        reason: "output path is empty".into(),
                    });
                }
                let file = File::create(path).map_err(|e| VcdError::InvalidSink {
                    reason: format!("cannot create '{}': {e}", path.display()),
                })?;
                let mut writer = BufWriter::new(file);
                writer.write_all(bytes)?;
                writer.flush()?;
                info!(path = %path.display(), bytes = bytes.len(), "waveform written");
            }
            Sink::Stdout => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(bytes)?;
                lock.flush()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Hierarchy,
    EndDefinitions,
    ValueChanges,
    Done,
}

/// Renders one document. Consumed by [`run`](Self::run).
pub(crate) struct DocumentEmitter<'a> {
    hierarchy: &'a Hierarchy,
    header: &'a HeaderOptions,
    out: Vec<u8>,
    phase: Phase,
    declared: HashSet<SignalId>,
}

impl<'a> DocumentEmitter<'a> {
    pub(crate) fn new(hierarchy: &'a Hierarchy, header: &'a HeaderOptions) -> Self {
        Self {
            hierarchy,
            header,
            out: Vec::new(),
            phase: Phase::Header,
            declared: HashSet::new(),
        }
    }

    /// Runs all phases for the tree rooted at `root` and returns the document.
    pub(crate) fn run(
        mut self,
        root: ModuleId,
        store: &ObservationStore,
    ) -> Result<Vec<u8>, VcdError> {
        // Validate the root before producing any output.
        self.hierarchy.module(root)?;
        self.emit_header()?;
        self.emit_hierarchy(root)?;
        self.emit_enddefinitions()?;
        self.emit_value_changes(store)?;
        debug_assert_eq!(self.phase, Phase::Done);
        Ok(self.out)
    }

    fn advance(&mut self, from: Phase, to: Phase) {
        debug_assert_eq!(self.phase, from, "document phase out of order");
        trace!(?from, ?to, "phase complete");
        self.phase = to;
    }

    fn emit_header(&mut self) -> Result<(), VcdError> {
        write_header(&mut self.out, self.header)?;
        self.advance(Phase::Header, Phase::Hierarchy);
        Ok(())
    }

    fn emit_hierarchy(&mut self, root: ModuleId) -> Result<(), VcdError> {
        self.declare_module(root, 0)?;
        self.advance(Phase::Hierarchy, Phase::EndDefinitions);
        Ok(())
    }

    fn declare_module(&mut self, id: ModuleId, depth: usize) -> Result<(), VcdError> {
        let h = self.hierarchy;
        let module = h.module(id)?;
        write_scope(&mut self.out, depth, h.module_name(id)?)?;
        for &signal in module.signals() {
            let sig = h.signal(signal)?;
            write_var(
                &mut self.out,
                depth + 1,
                sig.width(),
                sig.symbol(),
                h.signal_name(signal)?,
            )?;
            self.declared.insert(signal);
        }
        for &sub in module.submodules() {
            self.declare_module(sub, depth + 1)?;
        }
        write_upscope(&mut self.out, depth)?;
        Ok(())
    }

    fn emit_enddefinitions(&mut self) -> Result<(), VcdError> {
        write_enddefinitions(&mut self.out)?;
        self.advance(Phase::EndDefinitions, Phase::ValueChanges);
        Ok(())
    }

    fn emit_value_changes(&mut self, store: &ObservationStore) -> Result<(), VcdError> {
        let h = self.hierarchy;
        let mut previous: Option<u64> = None;
        let mut skipped = 0usize;
        for obs in store.sorted() {
            if !self.declared.contains(&obs.signal) {
                skipped += 1;
                continue;
            }
            let sig = h.signal(obs.signal)?;
            let formatted =
                format_value(obs.value, sig.width()).map_err(|e| VcdError::Render {
                    signal: h
                        .signal_path(obs.signal)
                        .unwrap_or_else(|_| obs.signal.to_string()),
                    time: obs.time,
                    reason: e.to_string(),
                })?;
            if previous != Some(obs.time) {
                write_time(&mut self.out, obs.time)?;
                previous = Some(obs.time);
            }
            write_change(&mut self.out, &formatted, sig.width(), sig.symbol())?;
        }
        if skipped > 0 {
            debug!(skipped, "observations outside the emitted tree skipped");
        }
        self.advance(Phase::ValueChanges, Phase::Done);
        Ok(())
    }
}

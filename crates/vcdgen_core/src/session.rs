//! The caller-facing lifecycle: build a tree, record values, emit a document.
//!
//! A [`Session`] owns its symbol allocator, module tree, and observation
//! store, so independent sessions in one process never share state.
//!
//! The tree is built through `&mut self`. Recording takes `&self` and may run
//! on several threads at once: appends are serialized by the store's write
//! lock, and emission holds the read lock until the document has reached its
//! sink, so no observation can slip in halfway through.

use std::io::{self, Write};

use parking_lot::RwLock;

use crate::emitter::{DocumentEmitter, Sink};
use crate::error::VcdError;
use crate::format::{fits, HeaderOptions};
use crate::ids::{ModuleId, SignalId};
use crate::model::{Hierarchy, Module, Signal};
use crate::store::ObservationStore;

/// One independent waveform: signals, modules, observations, and header fields.
#[derive(Default)]
pub struct Session {
    header: HeaderOptions,
    hierarchy: Hierarchy,
    store: RwLock<ObservationStore>,
}

impl Session {
    /// Creates a session with default header fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with the given header fields.
    pub fn with_header(header: HeaderOptions) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// Header fields used by every emission from this session.
    pub fn header(&self) -> &HeaderOptions {
        &self.header
    }

    /// Replaces the header fields.
    pub fn set_header(&mut self, header: HeaderOptions) {
        self.header = header;
    }

    /// Read access to the module tree.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Creates a signal and allocates its identifier code.
    pub fn create_signal(&mut self, name: &str, width: u32) -> Result<SignalId, VcdError> {
        self.hierarchy.create_signal(name, width)
    }

    /// Creates a module.
    pub fn create_module(&mut self, name: &str) -> Result<ModuleId, VcdError> {
        self.hierarchy.create_module(name)
    }

    /// Declares `signal` in `module`.
    pub fn add_signal(&mut self, module: ModuleId, signal: SignalId) -> Result<(), VcdError> {
        self.hierarchy.add_signal(module, signal)
    }

    /// Declares several signals in `module`, in order. Stops at the first error.
    pub fn add_signals(&mut self, module: ModuleId, signals: &[SignalId]) -> Result<(), VcdError> {
        for &signal in signals {
            self.hierarchy.add_signal(module, signal)?;
        }
        Ok(())
    }

    /// Nests `child` inside `parent`.
    pub fn add_submodule(&mut self, parent: ModuleId, child: ModuleId) -> Result<(), VcdError> {
        self.hierarchy.add_submodule(parent, child)
    }

    /// Looks up a signal.
    pub fn signal(&self, id: SignalId) -> Result<&Signal, VcdError> {
        self.hierarchy.signal(id)
    }

    /// Looks up a module.
    pub fn module(&self, id: ModuleId) -> Result<&Module, VcdError> {
        self.hierarchy.module(id)
    }

    fn check_value(&self, signal: SignalId, value: u64) -> Result<(), VcdError> {
        let sig = self.hierarchy.declared_signal(signal)?;
        if !fits(value, sig.width()) {
            return Err(VcdError::ValueOverflow {
                signal: self.hierarchy.signal_path(signal)?,
                value,
                width: sig.width(),
            });
        }
        Ok(())
    }

    /// Records `value` for `signal` at `time`.
    ///
    /// The signal must already be declared by a module, and the value must fit
    /// its declared width.
    pub fn record(&self, signal: SignalId, time: u64, value: u64) -> Result<(), VcdError> {
        self.check_value(signal, value)?;
        self.store.write().push(signal, time, value);
        Ok(())
    }

    /// Records a sequence of `(time, value)` pairs for `signal`.
    ///
    /// Every pair is validated before anything is stored; on error the store
    /// is left unchanged.
    pub fn record_many<I>(&self, signal: SignalId, samples: I) -> Result<(), VcdError>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let samples: Vec<(u64, u64)> = samples.into_iter().collect();
        self.hierarchy.declared_signal(signal)?;
        for &(_, value) in &samples {
            self.check_value(signal, value)?;
        }
        self.store.write().extend(signal, samples);
        Ok(())
    }

    /// Number of observations recorded so far.
    pub fn observation_count(&self) -> usize {
        self.store.read().len()
    }

    /// Drops all observations, keeping the tree and its symbols.
    pub fn clear_observations(&self) {
        self.store.write().clear();
    }

    /// Renders the document for the tree rooted at `root`.
    pub fn render(&self, root: ModuleId) -> Result<String, VcdError> {
        let store = self.store.read();
        let bytes = DocumentEmitter::new(&self.hierarchy, &self.header).run(root, &store)?;
        String::from_utf8(bytes)
            .map_err(|e| VcdError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Renders the document and writes it to `sink`.
    pub fn emit(&self, root: ModuleId, sink: &Sink) -> Result<(), VcdError> {
        let store = self.store.read();
        let bytes = DocumentEmitter::new(&self.hierarchy, &self.header).run(root, &store)?;
        sink.write_document(&bytes)
    }

    /// Renders the document and writes it to an arbitrary writer.
    pub fn emit_to_writer<W: Write>(&self, root: ModuleId, mut writer: W) -> Result<(), VcdError> {
        let store = self.store.read();
        let bytes = DocumentEmitter::new(&self.hierarchy, &self.header).run(root, &store)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Emits a final document and ends the session.
    pub fn finalize(self, root: ModuleId, sink: &Sink) -> Result<(), VcdError> {
        self.emit(root, sink)
    }
}

//! Signals, modules, and the module tree they form.
//!
//! A [`Hierarchy`] owns every signal and module created in a session. Signals
//! receive their identifier code at creation; modules reference signals and
//! submodules by handle. Structural rules are checked when an edge is added:
//! a signal is declared by at most one module, and modules form a tree.

use lasso::{Spur, ThreadedRodeo};
use tracing::debug;

use crate::arena::Arena;
use crate::error::VcdError;
use crate::format::check_width;
use crate::ids::{ModuleId, SignalId};
use crate::symbol::SymbolAllocator;

/// A leaf of the hierarchy: a named value with a fixed width.
#[derive(Debug, Clone)]
pub struct Signal {
    name: Spur,
    width: u32,
    symbol: String,
    owner: Option<ModuleId>,
}

impl Signal {
    /// Declared width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Identifier code used in the value-change section.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The module declaring this signal, if it has been attached.
    pub fn owner(&self) -> Option<ModuleId> {
        self.owner
    }
}

/// A named scope holding signals and nested modules, both in insertion order.
#[derive(Debug, Clone)]
pub struct Module {
    name: Spur,
    signals: Vec<SignalId>,
    submodules: Vec<ModuleId>,
    parent: Option<ModuleId>,
}

impl Module {
    /// Signals declared directly in this module.
    pub fn signals(&self) -> &[SignalId] {
        &self.signals
    }

    /// Direct child modules.
    pub fn submodules(&self) -> &[ModuleId] {
        &self.submodules
    }

    /// The enclosing module, or `None` for a root.
    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }
}

/// Arena-backed module tree with interned names.
#[derive(Default)]
pub struct Hierarchy {
    names: ThreadedRodeo,
    allocator: SymbolAllocator,
    signals: Arena<SignalId, Signal>,
    modules: Arena<ModuleId, Module>,
}

impl Hierarchy {
    /// Creates an empty hierarchy with a fresh symbol allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached signal and allocates its identifier code.
    pub fn create_signal(&mut self, name: &str, width: u32) -> Result<SignalId, VcdError> {
        if name.is_empty() {
            return Err(VcdError::EmptyName { kind: "signal" });
        }
        check_width(width).map_err(|_| VcdError::UnsupportedWidth {
            signal: name.to_string(),
            width,
        })?;
        let symbol = self.allocator.allocate();
        debug!(signal = name, width, symbol = %symbol, "signal created");
        let name = self.names.get_or_intern(name);
        Ok(self.signals.alloc(Signal {
            name,
            width,
            symbol,
            owner: None,
        }))
    }

    /// Creates a detached module.
    pub fn create_module(&mut self, name: &str) -> Result<ModuleId, VcdError> {
        if name.is_empty() {
            return Err(VcdError::EmptyName { kind: "module" });
        }
        let name = self.names.get_or_intern(name);
        Ok(self.modules.alloc(Module {
            name,
            signals: Vec::new(),
            submodules: Vec::new(),
            parent: None,
        }))
    }

    /// Declares `signal` inside `module`.
    ///
    /// Only the handles are checked; two signals sharing a name in one module
    /// are both declared, each under its own identifier code. A signal that
    /// already belongs to a module is rejected.
    pub fn add_signal(&mut self, module: ModuleId, signal: SignalId) -> Result<(), VcdError> {
        self.module(module)?;
        if self.signal(signal)?.owner.is_some() {
            return Err(VcdError::DuplicateSignalRegistration {
                path: self.signal_path(signal)?,
            });
        }

        if let Some(m) = self.modules.get_mut(module) {
            m.signals.push(signal);
        }
        if let Some(s) = self.signals.get_mut(signal) {
            s.owner = Some(module);
        }
        Ok(())
    }

    /// Nests `child` under `parent`.
    ///
    /// Fails if `child` already has a parent, or if the edge would create a cycle.
    pub fn add_submodule(&mut self, parent: ModuleId, child: ModuleId) -> Result<(), VcdError> {
        self.module(parent)?;
        let existing = self.module(child)?.parent;
        if let Some(existing) = existing {
            return Err(VcdError::InvalidHierarchy {
                reason: format!(
                    "module '{}' is already nested under '{}'",
                    self.module_name(child)?,
                    self.module_name(existing)?
                ),
            });
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(VcdError::InvalidHierarchy {
                    reason: format!(
                        "nesting '{}' under '{}' would create a cycle",
                        self.module_name(child)?,
                        self.module_name(parent)?
                    ),
                });
            }
            cursor = self.module(id)?.parent;
        }

        if let Some(m) = self.modules.get_mut(parent) {
            m.submodules.push(child);
        }
        if let Some(m) = self.modules.get_mut(child) {
            m.parent = Some(parent);
        }
        Ok(())
    }

    /// Looks up a signal by handle.
    pub fn signal(&self, id: SignalId) -> Result<&Signal, VcdError> {
        self.signals
            .get(id)
            .ok_or_else(|| VcdError::UnregisteredSignalReference {
                signal: id.to_string(),
            })
    }

    /// Looks up a module by handle.
    pub fn module(&self, id: ModuleId) -> Result<&Module, VcdError> {
        self.modules
            .get(id)
            .ok_or(VcdError::UnknownModule(id.index()))
    }

    /// The signal's own (unqualified) name.
    pub fn signal_name(&self, id: SignalId) -> Result<&str, VcdError> {
        Ok(self.names.resolve(&self.signal(id)?.name))
    }

    /// The module's own (unqualified) name.
    pub fn module_name(&self, id: ModuleId) -> Result<&str, VcdError> {
        Ok(self.names.resolve(&self.module(id)?.name))
    }

    /// Dotted path from the root module down to `id`.
    pub fn module_path(&self, id: ModuleId) -> Result<String, VcdError> {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(m) = cursor {
            parts.push(self.module_name(m)?);
            cursor = self.module(m)?.parent;
        }
        parts.reverse();
        Ok(parts.join("."))
    }

    /// Dotted path of a signal; just its name while it is detached.
    pub fn signal_path(&self, id: SignalId) -> Result<String, VcdError> {
        let sig = self.signal(id)?;
        let name = self.names.resolve(&sig.name);
        match sig.owner {
            Some(owner) => Ok(format!("{}.{name}", self.module_path(owner)?)),
            None => Ok(name.to_string()),
        }
    }

    /// Returns the signal if it is declared by some module.
    pub fn declared_signal(&self, id: SignalId) -> Result<&Signal, VcdError> {
        let sig = self.signal(id)?;
        if sig.owner.is_none() {
            return Err(VcdError::UnregisteredSignalReference {
                signal: format!("'{}'", self.names.resolve(&sig.name)),
            });
        }
        Ok(sig)
    }

    /// Number of signals created, attached or not.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Number of modules created, attached or not.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Iterates over every module in creation order.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter()
    }
}

//! Incremental VCD output for callers that produce values in time order.
//!
//! [`VcdStreamWriter`] writes each declaration and value change as soon as it
//! is made, instead of collecting observations for a later sort. Scopes,
//! signals, and `$enddefinitions` come first; then `set_time` / `change`
//! pairs with non-decreasing time.
//!
//! Signals are addressed by [`StreamSignalId`] handles. The dotted path
//! (`MAIN.SUB_COMP.data`) is tracked only to reject duplicates and to let
//! callers look a handle up again, so scope and signal names may not
//! themselves contain `.`.

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::arena::Arena;
use crate::error::VcdError;
use crate::format::{
    check_width, format_value, write_change, write_enddefinitions, write_header, write_scope,
    write_time, write_upscope, write_var, FormatError, HeaderOptions,
};
use crate::ids::StreamSignalId;
use crate::symbol::SymbolAllocator;

struct StreamEntry {
    path: String,
    symbol: String,
    width: u32,
}

/// Writes a VCD document straight to `W` as calls arrive.
pub struct VcdStreamWriter<W: Write> {
    writer: W,
    header: HeaderOptions,
    header_written: bool,
    scopes: Vec<String>,
    allocator: SymbolAllocator,
    signals: Arena<StreamSignalId, StreamEntry>,
    by_path: HashMap<String, StreamSignalId>,
    definitions_closed: bool,
    current_time: Option<u64>,
}

impl<W: Write> VcdStreamWriter<W> {
    /// Creates a writer with default header fields.
    pub fn new(writer: W) -> Self {
        Self::with_header(writer, HeaderOptions::default())
    }

    /// Creates a writer with the given header fields.
    pub fn with_header(writer: W, header: HeaderOptions) -> Self {
        Self {
            writer,
            header,
            header_written: false,
            scopes: Vec::new(),
            allocator: SymbolAllocator::new(),
            signals: Arena::new(),
            by_path: HashMap::new(),
            definitions_closed: false,
            current_time: None,
        }
    }

    fn ensure_header(&mut self) -> Result<(), VcdError> {
        if !self.header_written {
            write_header(&mut self.writer, &self.header)?;
            self.header_written = true;
        }
        Ok(())
    }

    fn require_declaring(&self, call: &str) -> Result<(), VcdError> {
        if self.definitions_closed {
            return Err(VcdError::OutOfOrder {
                reason: format!("{call} after $enddefinitions"),
            });
        }
        Ok(())
    }

    fn require_dumping(&self, call: &str) -> Result<(), VcdError> {
        if !self.definitions_closed {
            return Err(VcdError::OutOfOrder {
                reason: format!("{call} before $enddefinitions"),
            });
        }
        Ok(())
    }

    /// Opens a module scope nested in the current one.
    pub fn begin_scope(&mut self, name: &str) -> Result<(), VcdError> {
        self.require_declaring("begin_scope")?;
        if name.is_empty() {
            return Err(VcdError::EmptyName { kind: "module" });
        }
        if name.contains('.') {
            return Err(VcdError::DottedName {
                kind: "scope",
                name: name.to_string(),
            });
        }
        self.ensure_header()?;
        write_scope(&mut self.writer, self.scopes.len(), name)?;
        self.scopes.push(name.to_string());
        Ok(())
    }

    /// Declares a signal in the current scope and allocates its identifier code.
    pub fn add_signal(&mut self, name: &str, width: u32) -> Result<StreamSignalId, VcdError> {
        self.require_declaring("add_signal")?;
        if name.is_empty() {
            return Err(VcdError::EmptyName { kind: "signal" });
        }
        if name.contains('.') {
            return Err(VcdError::DottedName {
                kind: "signal",
                name: name.to_string(),
            });
        }
        if self.scopes.is_empty() {
            return Err(VcdError::OutOfOrder {
                reason: format!("signal '{name}' declared outside any scope"),
            });
        }
        check_width(width).map_err(|_| VcdError::UnsupportedWidth {
            signal: name.to_string(),
            width,
        })?;
        let path = format!("{}.{name}", self.scopes.join("."));
        if self.by_path.contains_key(&path) {
            return Err(VcdError::DuplicateSignalRegistration { path });
        }

        let symbol = self.allocator.peek();
        write_var(&mut self.writer, self.scopes.len(), width, &symbol, name)?;
        self.allocator.allocate();
        debug!(path = %path, width, symbol = %symbol, "stream signal declared");
        let id = self.signals.alloc(StreamEntry {
            path: path.clone(),
            symbol,
            width,
        });
        self.by_path.insert(path, id);
        Ok(id)
    }

    /// Closes the innermost open scope.
    pub fn end_scope(&mut self) -> Result<(), VcdError> {
        self.require_declaring("end_scope")?;
        if self.scopes.pop().is_none() {
            return Err(VcdError::OutOfOrder {
                reason: "end_scope with no open scope".into(),
            });
        }
        write_upscope(&mut self.writer, self.scopes.len())?;
        Ok(())
    }

    /// Closes the declaration section. Every scope must be closed first.
    pub fn end_definitions(&mut self) -> Result<(), VcdError> {
        self.require_declaring("end_definitions")?;
        if let Some(open) = self.scopes.last() {
            return Err(VcdError::OutOfOrder {
                reason: format!("scope '{open}' is still open"),
            });
        }
        self.ensure_header()?;
        write_enddefinitions(&mut self.writer)?;
        self.definitions_closed = true;
        Ok(())
    }

    /// Finds a declared signal by its dotted path.
    pub fn lookup(&self, path: &str) -> Option<StreamSignalId> {
        self.by_path.get(path).copied()
    }

    /// Number of declared signals.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Moves to `time`. Writes a `#<time>` marker only if the time changed.
    pub fn set_time(&mut self, time: u64) -> Result<(), VcdError> {
        self.require_dumping("set_time")?;
        match self.current_time {
            Some(previous) if time < previous => {
                return Err(VcdError::TimeWentBackwards { previous, time });
            }
            Some(previous) if time == previous => return Ok(()),
            _ => {}
        }
        write_time(&mut self.writer, time)?;
        self.current_time = Some(time);
        Ok(())
    }

    /// Writes a value change for `signal` at the current time.
    pub fn change(&mut self, signal: StreamSignalId, value: u64) -> Result<(), VcdError> {
        self.require_dumping("change")?;
        if self.current_time.is_none() {
            return Err(VcdError::OutOfOrder {
                reason: "change before the first set_time".into(),
            });
        }
        let entry = self
            .signals
            .get(signal)
            .ok_or_else(|| VcdError::UnregisteredSignalReference {
                signal: signal.to_string(),
            })?;
        let formatted = format_value(value, entry.width).map_err(|e| match e {
            FormatError::ValueTooWide { value, width } => VcdError::ValueOverflow {
                signal: entry.path.clone(),
                value,
                width,
            },
            other => VcdError::Render {
                signal: entry.path.clone(),
                time: self.current_time.unwrap_or_default(),
                reason: other.to_string(),
            },
        })?;
        write_change(&mut self.writer, &formatted, entry.width, &entry.symbol)?;
        Ok(())
    }

    /// Writes a value change given as binary digits, e.g. `"01010101"`.
    ///
    /// Only `0` and `1` are accepted, and no more digits than the signal's width.
    pub fn change_bits(&mut self, signal: StreamSignalId, bits: &str) -> Result<(), VcdError> {
        let width = self
            .signals
            .get(signal)
            .map(|e| e.width)
            .ok_or_else(|| VcdError::UnregisteredSignalReference {
                signal: signal.to_string(),
            })?;
        let valid = !bits.is_empty()
            && bits.len() <= width as usize
            && bits.bytes().all(|b| b == b'0' || b == b'1');
        if !valid {
            return Err(VcdError::InvalidBits {
                bits: bits.to_string(),
                width,
            });
        }
        let value = u64::from_str_radix(bits, 2).map_err(|_| VcdError::InvalidBits {
            bits: bits.to_string(),
            width,
        })?;
        self.change(signal, value)
    }

    /// Closes any open scopes and the declaration section if still open,
    /// flushes, and returns the writer.
    pub fn finish(mut self) -> Result<W, VcdError> {
        if !self.definitions_closed {
            while !self.scopes.is_empty() {
                self.end_scope()?;
            }
            self.end_definitions()?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

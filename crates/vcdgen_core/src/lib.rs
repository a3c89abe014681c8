//! Value Change Dump (VCD) generation.
//!
//! Callers register a tree of modules and signals, record `(time, value)`
//! observations per signal, and emit one well-formed VCD document. Every
//! signal gets a compact identifier code at creation; emission walks the
//! module tree for the `$scope`/`$var` section and then writes all
//! observations in ascending time order, keeping insertion order within a
//! time step.
//!
//! # Usage
//!
//! ```
//! use vcdgen_core::{Session, Sink};
//!
//! let mut session = Session::new();
//! let top = session.create_module("logic")?;
//! let data = session.create_signal("data", 8)?;
//! let en = session.create_signal("en", 1)?;
//! session.add_signals(top, &[data, en])?;
//!
//! session.record_many(data, [(0, 0), (100, 85)])?;
//! session.record(en, 100, 1)?;
//!
//! let text = session.render(top)?;
//! assert!(text.contains("b01010101 !"));
//! # Ok::<(), vcdgen_core::VcdError>(())
//! ```
//!
//! For producers that already generate values in time order,
//! [`VcdStreamWriter`] writes the document incrementally instead.
//!
//! # Modules
//!
//! - `symbol`: identifier code allocation
//! - `model`: signals, modules, and the module tree
//! - `store`: the observation log
//! - `format`: header and line formatting, value rendering
//! - `emitter`: whole-document emission and output sinks
//! - `session`: the caller-facing lifecycle
//! - `stream`: incremental writer
//! - `timescale`: `$timescale` values

#![warn(missing_docs)]

pub mod arena;
pub mod emitter;
pub mod error;
pub mod format;
pub mod ids;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod symbol;
pub mod timescale;

pub use emitter::Sink;
pub use error::VcdError;
pub use format::{format_value, HeaderOptions, REGISTER_BITS};
pub use ids::{ModuleId, SignalId, StreamSignalId};
pub use model::{Hierarchy, Module, Signal};
pub use session::Session;
pub use store::{Observation, ObservationStore};
pub use stream::VcdStreamWriter;
pub use symbol::{encode_symbol, SymbolAllocator};
pub use timescale::{ParseTimescaleError, TimeUnit, Timescale};

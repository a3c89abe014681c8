//! Opaque handle types for signals and modules registered in a [`Session`](crate::Session).
//!
//! A handle pairs the index of its entry with the tag of the arena that minted
//! it. Handles are `Copy`, `Hash`, and `Serialize`/`Deserialize`, and they are
//! only meaningful for the arena (and so the session) that created them.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name {
            arena: u32,
            index: u32,
        }

        impl $name {
            /// Position of the entry within its arena.
            pub fn index(self) -> u32 {
                self.index
            }
        }

        impl ArenaId for $name {
            fn from_parts(arena: u32, index: u32) -> Self {
                Self { arena, index }
            }

            fn arena(self) -> u32 {
                self.arena
            }

            fn index(self) -> u32 {
                self.index
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.index)
            }
        }
    };
}

define_id!(
    /// Handle to a signal created by [`Session::create_signal`](crate::Session::create_signal).
    SignalId,
    "signal"
);

define_id!(
    /// Handle to a module created by [`Session::create_module`](crate::Session::create_module).
    ModuleId,
    "module"
);

define_id!(
    /// Handle to a signal declared on a [`VcdStreamWriter`](crate::VcdStreamWriter).
    StreamSignalId,
    "stream-signal"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_roundtrip() {
        let id = SignalId::from_parts(4, 7);
        assert_eq!(id.index(), 7);
        assert_eq!(ArenaId::arena(id), 4);
    }

    #[test]
    fn same_index_different_arena_differ() {
        assert_ne!(SignalId::from_parts(1, 0), SignalId::from_parts(2, 0));
    }

    #[test]
    fn display_names_kind() {
        assert_eq!(SignalId::from_parts(1, 3).to_string(), "signal#3");
        assert_eq!(ModuleId::from_parts(1, 0).to_string(), "module#0");
    }

    #[test]
    fn serde_roundtrip() {
        let id = ModuleId::from_parts(2, 42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#"{"arena":2,"index":42}"#);
        let back: ModuleId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}

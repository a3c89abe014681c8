//! Compact identifier codes for declared signals.
//!
//! Each signal gets a short printable code that stands in for its name in the
//! value-change section. Codes are the base-10 digits of a per-allocator
//! counter, least-significant digit first, each digit mapped onto
//! [`SYMBOL_ALPHABET`]. The mapping is a bijection, so codes never repeat.

/// Digit alphabet for identifier codes.
///
/// Contains no whitespace and no `$`, so a code can never be mistaken for a
/// keyword such as `$end`.
pub const SYMBOL_ALPHABET: [char; 10] = ['!', '@', '#', '~', '%', '^', '&', '*', '(', ')'];

/// Encodes `index` as an identifier code.
///
/// `0 -> "!"`, `1 -> "@"`, `10 -> "!@"`, `25 -> "^#"`.
pub fn encode_symbol(index: u64) -> String {
    let base = SYMBOL_ALPHABET.len() as u64;
    let mut code = String::new();
    let mut idx = index;
    loop {
        code.push(SYMBOL_ALPHABET[(idx % base) as usize]);
        idx /= base;
        if idx == 0 {
            break;
        }
    }
    code
}

/// Hands out identifier codes in creation order.
///
/// The counter is owned by the allocator, so two sessions in the same process
/// produce identical, independent code sequences.
#[derive(Debug, Default)]
pub struct SymbolAllocator {
    next: u64,
}

impl SymbolAllocator {
    /// Creates an allocator whose first code is `"!"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The code the next [`allocate`](Self::allocate) call will return.
    pub fn peek(&self) -> String {
        encode_symbol(self.next)
    }

    /// Returns a code this allocator has never returned before.
    pub fn allocate(&mut self) -> String {
        let code = encode_symbol(self.next);
        self.next += 1;
        code
    }

    /// Number of codes handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

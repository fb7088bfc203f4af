//! Directive reconstruction.
//!
//! Rebuilds `%[flags][width][.precision]verb` from a [`State`], so a custom
//! renderer can delegate to another formatter with the same options. Flags
//! come out in the fixed order ` +-#0` whatever order they were written in.

use crate::options::FLAG_ALPHABET;
use crate::state::State;

/// '%' + 5 flags + 20 width digits + '.' + 20 precision digits + 4-byte verb.
const SCRATCH_LEN: usize = 64;

/// Stack scratch space for one directive.
struct Scratch {
    bytes: [u8; SCRATCH_LEN],
    len: usize,
}

impl Scratch {
    fn new() -> Self {
        Self {
            bytes: [0u8; SCRATCH_LEN],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn push_slice(&mut self, bytes: &[u8]) {
        self.bytes[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    /// Append `value` in decimal, no padding.
    fn push_decimal(&mut self, mut value: usize) {
        let mut digits = [0u8; 20];
        let mut pos = digits.len();
        loop {
            pos -= 1;
            digits[pos] = b'0' + (value % 10) as u8;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        self.push_slice(&digits[pos..]);
    }

    fn as_str(&self) -> &str {
        // Only ASCII and one encoded `char` are ever pushed.
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }
}

/// Reconstruct the directive that carries `state`'s options and `verb`.
#[must_use]
pub fn format_string(state: &dyn State, verb: char) -> String {
    let mut scratch = Scratch::new();
    scratch.push(b'%');
    for c in FLAG_ALPHABET {
        if state.flag(c) {
            scratch.push(c as u8);
        }
    }
    if let Some(width) = state.width() {
        scratch.push_decimal(width);
    }
    if let Some(precision) = state.precision() {
        scratch.push(b'.');
        scratch.push_decimal(precision);
    }
    let mut utf8 = [0u8; 4];
    scratch.push_slice(verb.encode_utf8(&mut utf8).as_bytes());
    String::from(scratch.as_str())
}

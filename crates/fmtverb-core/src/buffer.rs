//! Output sink.
//!
//! Append-only byte accumulator that every renderer writes into. Growth is
//! whatever `Vec<u8>` does (amortized O(1) append); there is no read cursor
//! and no seek. Custom renderers only ever see it through a
//! [`Context`](crate::state::Context), which forwards writes and nothing else.
//!
//! Also hosts the UTF-8 helpers used for width/precision accounting on raw
//! bytes, since operands such as byte strings need not be valid UTF-8.

/// Replacement character emitted for undecodable input.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Append-only output buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Continue appending after existing bytes.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    // -----------------------------------------------------------------------
    // Write-side operations
    // -----------------------------------------------------------------------

    /// Append raw bytes.
    pub fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append a string.
    pub fn write_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Append a single byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Append one code point as UTF-8.
    pub fn write_rune(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.bytes
            .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Append `count` copies of `byte`.
    pub(crate) fn write_repeated(&mut self, byte: u8, count: usize) {
        self.bytes.resize(self.bytes.len() + count, byte);
    }

    // -----------------------------------------------------------------------
    // Engine-side access
    // -----------------------------------------------------------------------

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The accumulated output.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, returning the accumulated output.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Discard everything written so far, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

// ---------------------------------------------------------------------------
// UTF-8 helpers
// ---------------------------------------------------------------------------

/// Decode the first code point of `bytes`.
///
/// Returns the code point and the number of bytes it occupies. Invalid or
/// truncated sequences decode as `(REPLACEMENT, 1)`; empty input as
/// `(REPLACEMENT, 0)`.
#[must_use]
pub fn decode_rune(bytes: &[u8]) -> (char, usize) {
    let len = match bytes.first() {
        None => return (REPLACEMENT, 0),
        Some(&b) if b < 0x80 => return (b as char, 1),
        Some(&b) if b & 0xE0 == 0xC0 => 2,
        Some(&b) if b & 0xF0 == 0xE0 => 3,
        Some(&b) if b & 0xF8 == 0xF0 => 4,
        Some(_) => return (REPLACEMENT, 1),
    };
    if bytes.len() < len {
        return (REPLACEMENT, 1);
    }
    match core::str::from_utf8(&bytes[..len]) {
        Ok(s) => s.chars().next().map_or((REPLACEMENT, 1), |c| (c, len)),
        Err(_) => (REPLACEMENT, 1),
    }
}

/// Count code points in `bytes`, treating each invalid byte as one.
#[must_use]
pub fn rune_count(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        let (_, width) = decode_rune(&bytes[pos..]);
        pos += width.max(1);
        count += 1;
    }
    count
}

/// Byte length of the longest prefix of `bytes` holding at most `max` code points.
#[must_use]
pub fn rune_prefix_len(bytes: &[u8], max: usize) -> usize {
    let mut pos = 0;
    let mut taken = 0;
    while pos < bytes.len() && taken < max {
        let (_, width) = decode_rune(&bytes[pos..]);
        pos += width.max(1);
        taken += 1;
    }
    pos
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

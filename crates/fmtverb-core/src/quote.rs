//! Quoted-literal rendering for `%q`.
//!
//! Works on raw bytes: invalid UTF-8 is escaped byte by byte as `\xNN`
//! rather than replaced, so the quoted form round-trips what was given.

use crate::buffer::{REPLACEMENT, decode_rune};

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";

/// Append `s` as a double-quoted literal.
///
/// With `ascii_only`, every non-ASCII code point is escaped as `\u` or `\U`.
pub fn append_quoted(out: &mut Vec<u8>, s: &[u8], ascii_only: bool) {
    out.push(b'"');
    let mut pos = 0;
    while pos < s.len() {
        let (c, width) = decode_rune(&s[pos..]);
        if width == 1 && c == REPLACEMENT {
            append_hex_byte(out, b'x', s[pos]);
        } else {
            append_escaped(out, c, '"', ascii_only);
        }
        pos += width.max(1);
    }
    out.push(b'"');
}

/// Append `c` as a single-quoted literal.
pub fn append_quoted_rune(out: &mut Vec<u8>, c: char, ascii_only: bool) {
    out.push(b'\'');
    append_escaped(out, c, '\'', ascii_only);
    out.push(b'\'');
}

#[must_use]
pub fn quote(s: &str) -> String {
    quoted_string(s.as_bytes(), false)
}

#[must_use]
pub fn quote_ascii(s: &str) -> String {
    quoted_string(s.as_bytes(), true)
}

#[must_use]
pub fn quote_rune(c: char, ascii_only: bool) -> String {
    let mut out = Vec::with_capacity(8);
    append_quoted_rune(&mut out, c, ascii_only);
    String::from_utf8_lossy(&out).into_owned()
}

fn quoted_string(s: &[u8], ascii_only: bool) -> String {
    let mut out = Vec::with_capacity(s.len() + 2);
    append_quoted(&mut out, s, ascii_only);
    // Escaping leaves only valid UTF-8 behind.
    String::from_utf8_lossy(&out).into_owned()
}

/// Whether `s` can be shown between backquotes without any escaping.
#[must_use]
pub fn can_backquote(s: &[u8]) -> bool {
    let mut pos = 0;
    while pos < s.len() {
        let (c, width) = decode_rune(&s[pos..]);
        pos += width.max(1);
        if width > 1 {
            if c == '\u{FEFF}' {
                return false;
            }
            continue;
        }
        if c == REPLACEMENT {
            return false;
        }
        if (c < ' ' && c != '\t') || c == '`' || c == '\u{7F}' {
            return false;
        }
    }
    true
}

/// Whether `c` is shown as itself inside a quoted literal.
///
/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
/// Control, format, private-use and non-ASCII space characters are not.
#[must_use]
pub fn is_print(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        '\u{AD}'
            | '\u{600}'..='\u{605}'
            | '\u{61C}'
            | '\u{6DD}'
            | '\u{70F}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{206F}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{FFFE}'..='\u{FFFF}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
            | '\u{F0000}'..='\u{10FFFF}'
    )
}

fn append_escaped(out: &mut Vec<u8>, c: char, quote: char, ascii_only: bool) {
    let mut utf8 = [0u8; 4];
    if c == quote || c == '\\' {
        out.push(b'\\');
        out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        return;
    }
    if (!ascii_only || c.is_ascii()) && is_print(c) {
        out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        return;
    }
    match c {
        '\u{7}' => out.extend_from_slice(b"\\a"),
        '\u{8}' => out.extend_from_slice(b"\\b"),
        '\u{C}' => out.extend_from_slice(b"\\f"),
        '\n' => out.extend_from_slice(b"\\n"),
        '\r' => out.extend_from_slice(b"\\r"),
        '\t' => out.extend_from_slice(b"\\t"),
        '\u{B}' => out.extend_from_slice(b"\\v"),
        c if c < ' ' || c == '\u{7F}' => append_hex_byte(out, b'x', c as u8),
        c => {
            let (marker, digits) = if (c as u32) < 0x10000 {
                (b'u', 4)
            } else {
                (b'U', 8)
            };
            out.push(b'\\');
            out.push(marker);
            let v = c as u32;
            for shift in (0..digits).rev() {
                out.push(LOWER_HEX[((v >> (shift * 4)) & 0xF) as usize]);
            }
        }
    }
}

fn append_hex_byte(out: &mut Vec<u8>, marker: u8, byte: u8) {
    out.push(b'\\');
    out.push(marker);
    out.push(LOWER_HEX[usize::from(byte >> 4)]);
    out.push(LOWER_HEX[usize::from(byte & 0xF)]);
}

//! Integer, character and code-point renderers.

use crate::buffer::{Buffer, REPLACEMENT};
use crate::options::OptionSet;
use crate::quote::{append_quoted_rune, is_print};

use super::{LOWER_DIGITS, UPPER_DIGITS, pad, write_padding};

/// Render an integer in `base` (2, 8, 10 or 16).
///
/// `value` holds the two's-complement bits when `signed`. Precision is a
/// minimum digit count; `%.0d` of zero prints only padding. Zero padding
/// without a precision is turned into a precision that fills the width,
/// leaving room for the sign. The `#` prefix is not counted in the width.
pub(crate) fn format_integer(
    buf: &mut Buffer,
    opts: &OptionSet,
    value: u64,
    signed: bool,
    base: u64,
    verb: char,
    digits: &[u8; 17],
) {
    let negative = signed && (value as i64) < 0;
    let mut u = if negative {
        (value as i64).unsigned_abs()
    } else {
        value
    };
    let unpadded = opts.without_zero_pad();

    let precision = if let Some(p) = opts.precision {
        if p == 0 && u == 0 {
            write_padding(buf, &unpadded, opts.width.unwrap_or(0));
            return;
        }
        p
    } else if opts.flags.zero_pad
        && !opts.flags.left_justify
        && let Some(width) = opts.width
    {
        let sign_room = negative || opts.flags.force_sign || opts.flags.space_sign;
        width.saturating_sub(usize::from(sign_room))
    } else {
        0
    };

    let mut scratch = [0u8; 64];
    let mut pos = scratch.len();
    loop {
        pos -= 1;
        scratch[pos] = digits[(u % base) as usize];
        u /= base;
        if u == 0 {
            break;
        }
    }
    let body = &scratch[pos..];
    let zeros = precision.saturating_sub(body.len());

    let mut out = Vec::with_capacity(5 + zeros + body.len());
    if negative {
        out.push(b'-');
    } else if opts.flags.force_sign {
        out.push(b'+');
    } else if opts.flags.space_sign {
        out.push(b' ');
    }
    if verb == 'O' {
        out.extend_from_slice(b"0o");
    }
    if opts.flags.alt_form {
        match base {
            2 => out.extend_from_slice(b"0b"),
            8 if zeros == 0 && body[0] != b'0' => out.push(b'0'),
            16 => out.extend_from_slice(&[b'0', digits[16]]),
            _ => {}
        }
    }
    out.resize(out.len() + zeros, b'0');
    out.extend_from_slice(body);
    pad(buf, &unpadded, &out);
}

/// Hex with an optional `0x` prefix, as used for addresses and `%#v` of
/// unsigned integers.
pub(crate) fn format_0x64(buf: &mut Buffer, opts: &OptionSet, value: u64, leading_0x: bool) {
    let mut opts = *opts;
    opts.flags.alt_form = leading_0x;
    format_integer(buf, &opts, value, false, 16, 'v', LOWER_DIGITS);
}

fn rune_of(value: u64) -> char {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(REPLACEMENT)
}

/// `%c`: the code point itself. Out-of-range values print U+FFFD.
pub(crate) fn format_char(buf: &mut Buffer, opts: &OptionSet, value: u64) {
    let mut utf8 = [0u8; 4];
    pad(buf, opts, rune_of(value).encode_utf8(&mut utf8).as_bytes());
}

/// `%q` on an integer: a single-quoted character literal.
pub(crate) fn format_quoted_char(buf: &mut Buffer, opts: &OptionSet, value: u64) {
    let mut out = Vec::with_capacity(12);
    append_quoted_rune(&mut out, rune_of(value), opts.flags.force_sign);
    pad(buf, opts, &out);
}

/// `%U`: `U+0041`, with `#` appending ` 'A'` when printable.
pub(crate) fn format_unicode(buf: &mut Buffer, opts: &OptionSet, value: u64) {
    let precision = opts.precision.filter(|&p| p > 4).unwrap_or(4);

    let mut scratch = [0u8; 16];
    let mut pos = scratch.len();
    let mut u = value;
    loop {
        pos -= 1;
        scratch[pos] = UPPER_DIGITS[(u & 0xF) as usize];
        u >>= 4;
        if u == 0 {
            break;
        }
    }
    let hex = &scratch[pos..];

    let mut out = Vec::with_capacity(2 + precision.max(hex.len()) + 7);
    out.extend_from_slice(b"U+");
    out.resize(out.len() + precision.saturating_sub(hex.len()), b'0');
    out.extend_from_slice(hex);
    if opts.flags.alt_form
        && let Some(c) = u32::try_from(value).ok().and_then(char::from_u32)
        && is_print(c)
    {
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(b" '");
        out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        out.push(b'\'');
    }
    pad(buf, &opts.without_zero_pad(), &out);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

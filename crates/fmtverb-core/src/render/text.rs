//! String and byte-string renderers: `%s`, `%q`, `%x`, `%X`.

use crate::buffer::{Buffer, rune_prefix_len};
use crate::options::OptionSet;
use crate::quote::{append_quoted, can_backquote};

use super::{pad, write_padding};

/// Precision limits a string to that many code points.
fn truncate<'a>(opts: &OptionSet, s: &'a [u8]) -> &'a [u8] {
    match opts.precision {
        Some(p) => &s[..rune_prefix_len(s, p)],
        None => s,
    }
}

/// `%s`.
pub(crate) fn format_str(buf: &mut Buffer, opts: &OptionSet, s: &[u8]) {
    pad(buf, opts, truncate(opts, s));
}

/// `%q`: double-quoted with escapes; `#` uses backquotes when the string
/// needs no escaping; `+` escapes everything outside ASCII.
pub(crate) fn format_quoted(buf: &mut Buffer, opts: &OptionSet, s: &[u8]) {
    let s = truncate(opts, s);
    let mut out = Vec::with_capacity(s.len() + 2);
    if opts.flags.alt_form && can_backquote(s) {
        out.push(b'`');
        out.extend_from_slice(s);
        out.push(b'`');
    } else {
        append_quoted(&mut out, s, opts.flags.force_sign);
    }
    pad(buf, opts, &out);
}

/// `%x` / `%X`: two hex digits per byte. Precision counts input bytes.
/// ` ` separates bytes; `#` adds a `0x` prefix, per byte when combined
/// with ` `.
pub(crate) fn format_hex(buf: &mut Buffer, opts: &OptionSet, s: &[u8], digits: &[u8; 17]) {
    let length = opts.precision.map_or(s.len(), |p| p.min(s.len()));
    let flags = opts.flags;

    let mut width = 2 * length;
    if width == 0 {
        if let Some(w) = opts.width {
            write_padding(buf, opts, w);
        }
        return;
    }
    if flags.space_sign {
        if flags.alt_form {
            width *= 2;
        }
        width += length - 1;
    } else if flags.alt_form {
        width += 2;
    }

    let fill = opts.width.map_or(0, |w| w.saturating_sub(width));
    if !flags.left_justify {
        write_padding(buf, opts, fill);
    }
    if flags.alt_form {
        buf.write(&[b'0', digits[16]]);
    }
    for (i, &byte) in s[..length].iter().enumerate() {
        if flags.space_sign && i > 0 {
            buf.write_byte(b' ');
            if flags.alt_form {
                buf.write(&[b'0', digits[16]]);
            }
        }
        buf.write(&[digits[usize::from(byte >> 4)], digits[usize::from(byte & 0xF)]]);
    }
    if flags.left_justify {
        write_padding(buf, opts, fill);
    }
}

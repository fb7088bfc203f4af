//! Built-in renderers.
//!
//! Each renderer takes the output buffer, the active [`OptionSet`] and the
//! value, and writes exactly one verb's worth of output. None of them look
//! at the verb's argument list or at anything outside their inputs.

pub(crate) mod float;
pub(crate) mod integer;
pub(crate) mod text;

use crate::buffer::{Buffer, rune_count};
use crate::options::OptionSet;

pub(crate) const LOWER_DIGITS: &[u8; 17] = b"0123456789abcdefx";
pub(crate) const UPPER_DIGITS: &[u8; 17] = b"0123456789ABCDEFX";

/// Write `count` bytes of padding: zeros when zero padding is on (it only
/// ever pads on the left), spaces otherwise.
pub(crate) fn write_padding(buf: &mut Buffer, opts: &OptionSet, count: usize) {
    let byte = if opts.flags.zero_pad && !opts.flags.left_justify {
        b'0'
    } else {
        b' '
    };
    buf.write_repeated(byte, count);
}

/// Write `bytes` padded to the width, counted in code points.
pub(crate) fn pad(buf: &mut Buffer, opts: &OptionSet, bytes: &[u8]) {
    let width = match opts.width {
        Some(w) if w > 0 => w,
        _ => {
            buf.write(bytes);
            return;
        }
    };
    let fill = width.saturating_sub(rune_count(bytes));
    if opts.flags.left_justify {
        buf.write(bytes);
        write_padding(buf, opts, fill);
    } else {
        write_padding(buf, opts, fill);
        buf.write(bytes);
    }
}

pub(crate) fn pad_str(buf: &mut Buffer, opts: &OptionSet, s: &str) {
    pad(buf, opts, s.as_bytes());
}

/// `%t`.
pub(crate) fn format_bool(buf: &mut Buffer, opts: &OptionSet, value: bool) {
    pad_str(buf, opts, if value { "true" } else { "false" });
}

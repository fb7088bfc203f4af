//! Floating-point renderer.
//!
//! Digit generation is delegated to the standard library (`{:e}` for the
//! shortest round-trip digits, `{:.*e}` / `{:.*}` for a fixed precision);
//! layout, sign, `#` and padding rules are applied here.

use crate::buffer::Buffer;
use crate::options::OptionSet;
use crate::value::FloatKind;

use super::{pad, write_padding};

/// Decimal digits of a finite, non-negative value: `0.d1d2d3... * 10^dp`.
/// No leading or trailing zeros; zero has no digits.
struct Decimal {
    digits: Vec<u8>,
    dp: isize,
}

impl Decimal {
    /// Parse standard-library output of the form `1.25e-3`, `125e0` or
    /// `0.00125`.
    fn parse(text: &str) -> Self {
        let (mantissa, exp) = match text.split_once(['e', 'E']) {
            Some((m, e)) => (m, e.parse::<isize>().unwrap_or(0)),
            None => (text, 0),
        };
        let int_len = mantissa.find('.').unwrap_or(mantissa.len());
        let mut digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
        let mut dp = int_len as isize + exp;

        let leading = digits.iter().take_while(|&&d| d == b'0').count();
        digits.drain(..leading);
        dp -= leading as isize;
        while digits.last() == Some(&b'0') {
            digits.pop();
        }
        if digits.is_empty() {
            dp = 0;
        }
        Self { digits, dp }
    }

    /// Shortest digits that round-trip at the value's own width.
    fn shortest(value: f64, kind: FloatKind) -> Self {
        match kind {
            FloatKind::F32 => Self::parse(&format!("{:e}", value as f32)),
            FloatKind::F64 => Self::parse(&format!("{value:e}")),
        }
    }

    /// `significant` digits, correctly rounded.
    fn significant(value: f64, significant: usize) -> Self {
        Self::parse(&format!("{:.*e}", significant.saturating_sub(1), value))
    }

    /// Rounded to `places` digits after the decimal point.
    fn fixed(value: f64, places: usize) -> Self {
        Self::parse(&format!("{value:.places$}"))
    }

    fn nd(&self) -> isize {
        self.digits.len() as isize
    }

    fn digit(&self, i: isize) -> u8 {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.digits.get(i).copied())
            .unwrap_or(b'0')
    }
}

/// `d.ddde±dd`
fn write_exponent(out: &mut Vec<u8>, d: &Decimal, precision: usize, exp_char: u8) {
    out.push(d.digit(0));
    if precision > 0 {
        out.push(b'.');
        for i in 1..=precision as isize {
            out.push(d.digit(i));
        }
    }
    out.push(exp_char);
    let exp = if d.digits.is_empty() { 0 } else { d.dp - 1 };
    out.push(if exp < 0 { b'-' } else { b'+' });
    let exp = exp.unsigned_abs();
    if exp < 10 {
        out.push(b'0');
    }
    out.extend_from_slice(exp.to_string().as_bytes());
}

/// `ddd.ddd`
fn write_fixed(out: &mut Vec<u8>, d: &Decimal, precision: usize) {
    if d.dp > 0 {
        for i in 0..d.dp {
            out.push(d.digit(i));
        }
    } else {
        out.push(b'0');
    }
    if precision > 0 {
        out.push(b'.');
        for i in 1..=precision as isize {
            out.push(d.digit(d.dp + i - 1));
        }
    }
}

/// Format `|value|` for `verb` (one of `e E f g G`). `precision` of `None`
/// means shortest.
fn write_digits(
    out: &mut Vec<u8>,
    value: f64,
    kind: FloatKind,
    verb: char,
    precision: Option<usize>,
) {
    let exp_char = if verb.is_ascii_uppercase() { b'E' } else { b'e' };
    match (verb, precision) {
        ('e' | 'E', None) => {
            let d = Decimal::shortest(value, kind);
            let p = d.digits.len().saturating_sub(1);
            write_exponent(out, &d, p, exp_char);
        }
        ('e' | 'E', Some(p)) => {
            let d = Decimal::significant(value, p + 1);
            write_exponent(out, &d, p, exp_char);
        }
        ('f', None) => {
            let d = Decimal::shortest(value, kind);
            let p = (d.nd() - d.dp).max(0) as usize;
            write_fixed(out, &d, p);
        }
        ('f', Some(p)) => write_fixed(out, &Decimal::fixed(value, p), p),
        (_, precision) => {
            let shortest = precision.is_none();
            let d = match precision {
                None => Decimal::shortest(value, kind),
                Some(p) => Decimal::significant(value, p.max(1)),
            };
            let mut prec = match precision {
                None => d.nd(),
                Some(p) => p.max(1) as isize,
            };
            let mut eprec = prec;
            if eprec > d.nd() && d.nd() >= d.dp {
                eprec = d.nd();
            }
            if shortest {
                eprec = 6;
            }
            let exp = d.dp - 1;
            if exp < -4 || exp >= eprec {
                if prec > d.nd() {
                    prec = d.nd();
                }
                write_exponent(out, &d, (prec - 1).max(0) as usize, exp_char);
            } else {
                if prec > d.dp {
                    prec = d.nd();
                }
                write_fixed(out, &d, (prec - d.dp).max(0) as usize);
            }
        }
    }
}

/// Render a float for `verb` (`e E f F g G`), with `default_precision` used
/// when the directive gives none (`None` means shortest).
pub(crate) fn format_float(
    buf: &mut Buffer,
    opts: &OptionSet,
    value: f64,
    kind: FloatKind,
    verb: char,
    default_precision: Option<usize>,
) {
    let verb = if verb == 'F' { 'f' } else { verb };
    let precision = opts.precision.or(default_precision);

    // num[0] is always a sign slot: '+', '-' or ' '.
    let mut num: Vec<u8> = Vec::with_capacity(32);
    num.push(if value.is_sign_negative() && !value.is_nan() {
        b'-'
    } else {
        b'+'
    });
    if value.is_nan() {
        num.extend_from_slice(b"NaN");
    } else if value.is_infinite() {
        num.extend_from_slice(b"Inf");
    } else {
        write_digits(&mut num, value.abs(), kind, verb, precision);
    }
    if opts.flags.space_sign && num[0] == b'+' && !opts.flags.force_sign {
        num[0] = b' ';
    }

    if !value.is_finite() {
        let unpadded = opts.without_zero_pad();
        if value.is_nan() && !opts.flags.space_sign && !opts.flags.force_sign {
            pad(buf, &unpadded, &num[1..]);
        } else {
            pad(buf, &unpadded, &num);
        }
        return;
    }

    if opts.flags.alt_form {
        force_decimal_point(&mut num, verb, precision);
    }

    if opts.flags.force_sign || num[0] != b'+' {
        if opts.flags.zero_pad
            && !opts.flags.left_justify
            && let Some(width) = opts.width
            && width > num.len()
        {
            buf.write_byte(num[0]);
            write_padding(buf, opts, width - num.len());
            buf.write(&num[1..]);
            return;
        }
        pad(buf, opts, &num);
        return;
    }
    pad(buf, opts, &num[1..]);
}

/// `#`: always show a decimal point; for `%g` also keep trailing zeros up
/// to the precision's worth of significant digits.
fn force_decimal_point(num: &mut Vec<u8>, verb: char, precision: Option<usize>) {
    let mut wanted: isize = match verb {
        'g' | 'G' => precision.map_or(6, |p| p as isize),
        _ => 0,
    };

    let mut tail = Vec::new();
    if let Some(at) = num.iter().position(|&b| b == b'e' || b == b'E') {
        tail = num.split_off(at);
    }

    let mut has_point = false;
    let mut seen_nonzero = false;
    for &b in &num[1..] {
        if b == b'.' {
            has_point = true;
            continue;
        }
        if b != b'0' {
            seen_nonzero = true;
        }
        if seen_nonzero {
            wanted -= 1;
        }
    }
    if !has_point {
        if num.len() == 2 && num[1] == b'0' {
            wanted -= 1;
        }
        num.push(b'.');
    }
    while wanted > 0 {
        num.push(b'0');
        wanted -= 1;
    }
    num.extend_from_slice(&tail);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

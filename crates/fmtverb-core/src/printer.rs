//! Printer state machine and entry points.
//!
//! A [`Printer`] owns one output buffer and walks a template directive by
//! directive: literal text is copied, each `%` directive is parsed into an
//! [`OptionSet`] and handed with its argument to the dispatcher. Nothing in
//! here fails; every anomaly becomes inline diagnostic text.

use std::io;

use crate::buffer::{Buffer, decode_rune};
use crate::config::{ArgIndexPolicy, arg_index_policy};
use crate::literals;
use crate::options::{OptionSet, literal_field, precision_from_args, width_from_args};
use crate::value::Arg;

/// Formatting engine for one output stream.
///
/// A printer may be reused; [`clear`](Self::clear) discards accumulated
/// output. Nested formatting (a custom renderer calling [`sprintf`]) always
/// runs on a fresh printer.
#[derive(Debug, Default)]
pub struct Printer {
    pub(crate) buf: Buffer,
    /// Options of the directive being rendered.
    pub(crate) opts: OptionSet,
    /// An explicit `[n]` index was used anywhere in the template.
    reordered: bool,
    /// An explicit `[n]` index was used in the current directive.
    indexed: bool,
    /// The current directive's argument index is valid.
    good_arg_num: bool,
    /// A bad-verb diagnostic is being rendered; custom capabilities are off.
    pub(crate) erroring: bool,
    policy: ArgIndexPolicy,
}

impl Printer {
    /// Printer using the process-wide [`ArgIndexPolicy`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(arg_index_policy())
    }

    #[must_use]
    pub fn with_policy(policy: ArgIndexPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn policy(&self) -> ArgIndexPolicy {
        self.policy
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }

    /// Output as a string; byte sequences that are not valid UTF-8 (from
    /// `%s` of raw bytes) are replaced with U+FFFD.
    #[must_use]
    pub fn into_string(self) -> String {
        match String::from_utf8(self.buf.into_bytes()) {
            Ok(s) => s,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub(crate) fn clear_flags(&mut self) {
        self.opts = OptionSet::default();
    }

    // -----------------------------------------------------------------------
    // Operand lists
    // -----------------------------------------------------------------------

    /// Render each operand with `%v`, separated by a space when neither
    /// neighbour is a string.
    pub fn print(&mut self, args: &[Arg<'_>]) {
        self.clear_flags();
        let mut prev_string = false;
        for (n, arg) in args.iter().enumerate() {
            let is_string = arg.is_string();
            if n > 0 && !is_string && !prev_string {
                self.buf.write_byte(b' ');
            }
            self.print_arg(arg, 'v');
            prev_string = is_string;
        }
    }

    /// Render each operand with `%v`, space separated, then a newline.
    pub fn println(&mut self, args: &[Arg<'_>]) {
        self.clear_flags();
        for (n, arg) in args.iter().enumerate() {
            if n > 0 {
                self.buf.write_byte(b' ');
            }
            self.print_arg(arg, 'v');
        }
        self.buf.write_byte(b'\n');
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Render `template` against `args`.
    pub fn printf(&mut self, template: &str, args: &[Arg<'_>]) {
        let format = template.as_bytes();
        let end = format.len();
        let mut arg_num = 0usize;
        let mut i = 0usize;
        self.reordered = false;

        'directives: while i < end {
            self.good_arg_num = true;
            self.indexed = false;
            let literal_start = i;
            while i < end && format[i] != b'%' {
                i += 1;
            }
            if i > literal_start {
                self.buf.write(&format[literal_start..i]);
            }
            if i >= end {
                break;
            }
            i += 1; // '%'
            self.clear_flags();
            let cursor = arg_num;

            while i < end {
                let c = format[i];
                if self.opts.flags.set(char::from(c)) {
                    i += 1;
                    continue;
                }
                // Fast path: flags followed directly by a lowercase verb.
                if c.is_ascii_lowercase() && arg_num < args.len() {
                    let verb = char::from(c);
                    if verb == 'v' {
                        self.opts.flags.promote_for_value_verb();
                    }
                    self.print_arg(&args[arg_num], verb);
                    arg_num += 1;
                    i += 1;
                    continue 'directives;
                }
                break;
            }

            let (next_arg, next_i, mut after_index) =
                self.arg_number(arg_num, format, i, args.len());
            arg_num = next_arg;
            i = next_i;

            // Width.
            if i < end && format[i] == b'*' {
                i += 1;
                let (width, next_arg) = width_from_args(&mut self.opts.flags, args, arg_num);
                arg_num = next_arg;
                match width {
                    Ok(w) => self.opts.width = Some(w),
                    Err(_) => self.buf.write_str(literals::BAD_WIDTH),
                }
                after_index = false;
            } else {
                let (width, next_i) = parse_num(format, i, end);
                i = next_i;
                self.opts.width = width;
                if after_index && width.is_some() {
                    // "%[3]2d"
                    self.good_arg_num = false;
                }
            }

            // Precision.
            if i + 1 < end && format[i] == b'.' {
                i += 1;
                if after_index {
                    // "%[3].2d"
                    self.good_arg_num = false;
                }
                (arg_num, i, after_index) = self.arg_number(arg_num, format, i, args.len());
                if i < end && format[i] == b'*' {
                    i += 1;
                    let (precision, next_arg) = precision_from_args(args, arg_num);
                    arg_num = next_arg;
                    match precision {
                        Ok(p) => self.opts.precision = Some(p),
                        Err(_) => self.buf.write_str(literals::BAD_PREC),
                    }
                    after_index = false;
                } else {
                    let (precision, next_i) = parse_num(format, i, end);
                    i = next_i;
                    self.opts.precision = Some(precision.unwrap_or(0));
                }
            }

            if !after_index {
                (arg_num, i, _) = self.arg_number(arg_num, format, i, args.len());
            }

            if i >= end {
                self.buf.write_str(literals::NO_VERB);
                break;
            }

            let (verb, size) = decode_rune(&format[i..]);
            i += size;

            if verb == '%' {
                // Consumes no argument and ignores width and precision.
                self.buf.write_byte(b'%');
            } else if !self.good_arg_num {
                self.bad_arg_num(verb);
            } else if arg_num >= args.len() {
                self.missing_arg(verb);
            } else {
                if verb == 'v' {
                    self.opts.flags.promote_for_value_verb();
                }
                self.print_arg(&args[arg_num], verb);
                arg_num += 1;
            }

            if self.indexed && self.policy == ArgIndexPolicy::Detached {
                arg_num = cursor;
            }
        }

        // Unused arguments are only reported when the template never
        // indexed explicitly.
        if !self.reordered && arg_num < args.len() {
            self.clear_flags();
            self.buf.write_str(literals::EXTRA);
            for (n, arg) in args[arg_num..].iter().enumerate() {
                if n > 0 {
                    self.buf.write_str(literals::COMMA_SPACE);
                }
                if let Arg::Nil = arg {
                    self.buf.write_str(literals::NIL_ANGLE);
                } else {
                    self.buf.write_str(&arg.type_name());
                    self.buf.write_byte(b'=');
                    self.print_arg(arg, 'v');
                }
            }
            self.buf.write_byte(b')');
        }
    }

    /// Parse an optional `[n]` at `i`. Returns the new argument cursor, the
    /// position after the bracket, and whether a well-formed index was seen.
    fn arg_number(
        &mut self,
        arg_num: usize,
        format: &[u8],
        i: usize,
        num_args: usize,
    ) -> (usize, usize, bool) {
        if format.len() <= i || format[i] != b'[' {
            return (arg_num, i, false);
        }
        self.reordered = true;
        self.indexed = true;
        let (index, width, ok) = parse_arg_number(&format[i..]);
        if ok
            && let Some(index) = index
            && index < num_args
        {
            return (index, i + width, true);
        }
        self.good_arg_num = false;
        (arg_num, i + width, ok)
    }

    fn bad_arg_num(&mut self, verb: char) {
        self.buf.write_str(literals::PERCENT_BANG);
        self.buf.write_rune(verb);
        self.buf.write_str(literals::BAD_INDEX);
    }

    fn missing_arg(&mut self, verb: char) {
        self.buf.write_str(literals::PERCENT_BANG);
        self.buf.write_rune(verb);
        self.buf.write_str(literals::MISSING);
    }
}

/// Parse a decimal number in `s[start..end]`.
///
/// Returns the number (if any digits were present) and the position after
/// it. A number above [`MAX_FIELD`](crate::config::MAX_FIELD) yields `(None, end)` so the caller
/// skips the rest of the directive and reports a missing verb.
fn parse_num(s: &[u8], start: usize, end: usize) -> (Option<usize>, usize) {
    if start >= end {
        return (None, end);
    }
    let mut num = 0usize;
    let mut is_num = false;
    let mut i = start;
    while i < end && s[i].is_ascii_digit() {
        num = match literal_field(num * 10 + usize::from(s[i] - b'0')) {
            Ok(n) => n,
            Err(_) => return (None, end),
        };
        is_num = true;
        i += 1;
    }
    (is_num.then_some(num), i)
}

/// Parse `[n]` at the start of `format`. Returns the zero-based index
/// (`None` for `[0]`), the bytes consumed, and whether the bracket held a
/// number.
fn parse_arg_number(format: &[u8]) -> (Option<usize>, usize, bool) {
    if format.len() < 3 {
        return (None, 1, false);
    }
    match format.iter().position(|&b| b == b']') {
        Some(close) => match parse_num(format, 1, close) {
            (Some(n), next) if next == close => (n.checked_sub(1), close + 1, true),
            _ => (None, close + 1, false),
        },
        None => (None, 1, false),
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Format into a new string.
#[must_use]
pub fn sprintf(template: &str, args: &[Arg<'_>]) -> String {
    let mut p = Printer::new();
    p.printf(template, args);
    p.into_string()
}

/// Operands with `%v`, spaces between non-string neighbours.
#[must_use]
pub fn sprint(args: &[Arg<'_>]) -> String {
    let mut p = Printer::new();
    p.print(args);
    p.into_string()
}

/// Operands with `%v`, space separated, newline terminated.
#[must_use]
pub fn sprintln(args: &[Arg<'_>]) -> String {
    let mut p = Printer::new();
    p.println(args);
    p.into_string()
}

/// Format and append to `dst`.
pub fn append_printf(dst: &mut Vec<u8>, template: &str, args: &[Arg<'_>]) {
    let mut p = Printer::new();
    p.printf(template, args);
    dst.extend_from_slice(p.as_bytes());
}

pub fn append_print(dst: &mut Vec<u8>, args: &[Arg<'_>]) {
    let mut p = Printer::new();
    p.print(args);
    dst.extend_from_slice(p.as_bytes());
}

pub fn append_println(dst: &mut Vec<u8>, args: &[Arg<'_>]) {
    let mut p = Printer::new();
    p.println(args);
    dst.extend_from_slice(p.as_bytes());
}

/// Format and write to `w` in a single `write_all`.
///
/// Returns the number of bytes written. A write failure is the only error.
pub fn fprintf<W: io::Write + ?Sized>(
    w: &mut W,
    template: &str,
    args: &[Arg<'_>],
) -> io::Result<usize> {
    let mut p = Printer::new();
    p.printf(template, args);
    w.write_all(p.as_bytes())?;
    Ok(p.as_bytes().len())
}

pub fn fprint<W: io::Write + ?Sized>(w: &mut W, args: &[Arg<'_>]) -> io::Result<usize> {
    let mut p = Printer::new();
    p.print(args);
    w.write_all(p.as_bytes())?;
    Ok(p.as_bytes().len())
}

pub fn fprintln<W: io::Write + ?Sized>(w: &mut W, args: &[Arg<'_>]) -> io::Result<usize> {
    let mut p = Printer::new();
    p.println(args);
    w.write_all(p.as_bytes())?;
    Ok(p.as_bytes().len())
}

/// [`fprintf`] to standard output.
pub fn printf(template: &str, args: &[Arg<'_>]) -> io::Result<usize> {
    fprintf(&mut io::stdout().lock(), template, args)
}

pub fn print(args: &[Arg<'_>]) -> io::Result<usize> {
    fprint(&mut io::stdout().lock(), args)
}

pub fn println(args: &[Arg<'_>]) -> io::Result<usize> {
    fprintln(&mut io::stdout().lock(), args)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, args: &[Arg<'_>]) -> String {
        let mut p = Printer::with_policy(ArgIndexPolicy::Resume);
        p.printf(template, args);
        p.into_string()
    }

    #[test]
    fn test_literal_text_and_percent() {
        assert_eq!(fmt("plain", &[]), "plain");
        assert_eq!(fmt("100%%", &[]), "100%");
        assert_eq!(fmt("%5%", &[]), "%");
    }

    #[test]
    fn test_sequential_arguments() {
        assert_eq!(fmt("%d-%s", &[Arg::from(1), Arg::from("a")]), "1-a");
    }

    #[test]
    fn test_missing_and_extra() {
        assert_eq!(fmt("%d %d", &[Arg::from(1)]), "1 %!d(MISSING)");
        assert_eq!(
            fmt("%d", &[Arg::from(1), Arg::from("x"), Arg::Nil]),
            "1%!(EXTRA &str=x, <nil>)"
        );
    }

    #[test]
    fn test_no_verb() {
        assert_eq!(fmt("abc%", &[]), "abc%!(NOVERB)");
        assert_eq!(fmt("%-5", &[Arg::from(1)]), "%!(NOVERB)%!(EXTRA i32=1)");
    }

    #[test]
    fn test_explicit_index() {
        let args = [Arg::from(1), Arg::from(2)];
        assert_eq!(fmt("%[2]d %[1]d", &args), "2 1");
        assert_eq!(fmt("%[2]d %d", &[Arg::from(1), Arg::from(2), Arg::from(3)]), "2 3");
        assert_eq!(fmt("%[3]d", &args), "%!d(BADINDEX)");
        assert_eq!(fmt("%[0]d", &args), "%!d(BADINDEX)");
        assert_eq!(fmt("%[x]d", &args), "%!d(BADINDEX)");
        // Reordering suppresses the EXTRA report.
        assert_eq!(fmt("%[1]d", &args), "1");
    }

    #[test]
    fn test_detached_policy_restores_cursor() {
        let mut p = Printer::with_policy(ArgIndexPolicy::Detached);
        p.printf("%[3]d %d %d", &[Arg::from(1), Arg::from(2), Arg::from(3)]);
        assert_eq!(p.into_string(), "3 1 2");
    }

    #[test]
    fn test_star_width_and_precision() {
        assert_eq!(fmt("%*d|", &[Arg::from(4), Arg::from(7)]), "   7|");
        assert_eq!(fmt("%*d|", &[Arg::from(-4), Arg::from(7)]), "7   |");
        assert_eq!(fmt("%.*f", &[Arg::from(2), Arg::from(3.14159)]), "3.14");
        assert_eq!(fmt("%[2]*[1]d", &[Arg::from(5), Arg::from(3)]), "  5");
    }

    #[test]
    fn test_bad_width_and_precision() {
        assert_eq!(fmt("%*d", &[Arg::from("x"), Arg::from(7)]), "%!(BADWIDTH)7");
        assert_eq!(fmt("%.*d", &[Arg::from(-1), Arg::from(7)]), "%!(BADPREC)7");
        assert_eq!(fmt("%*d", &[Arg::from(10_000_000), Arg::from(7)]), "%!(BADWIDTH)7");
    }

    #[test]
    fn test_oversized_literal_width() {
        assert_eq!(fmt("%1000001d", &[Arg::from(1)]), "%!(NOVERB)%!(EXTRA i32=1)");
    }

    /// Writes back the directive it was rendered with.
    struct Directive;

    impl crate::value::FullFormat for Directive {
        fn format(&self, f: &mut dyn crate::state::State, verb: char) {
            use std::io::Write as _;

            let text = crate::directive::format_string(f, verb);
            let _ = f.write_all(text.as_bytes());
        }
    }

    impl crate::value::Operand for Directive {
        fn type_name(&self) -> std::borrow::Cow<'_, str> {
            std::borrow::Cow::Borrowed("Directive")
        }
        fn shape(&self) -> Arg<'_> {
            Arg::Nil
        }
        fn full_format(&self) -> Option<&dyn crate::value::FullFormat> {
            Some(self)
        }
    }

    /// The printer and `OptionSet::build` resolve the same directive parts
    /// to the same options or the same diagnostics.
    #[test]
    fn test_printer_and_build_agree() {
        use crate::options::{OptionError, Precision, Width};

        let cases: Vec<(&str, &str, Width, Precision, Vec<Arg<'_>>)> = vec![
            ("%-*.*v", "-", Width::FromArg, Precision::FromArg, vec![Arg::from(-6), Arg::from(2)]),
            ("%0*v", "0", Width::FromArg, Precision::None, vec![Arg::from(-3)]),
            ("%+5.*v", "+", Width::Fixed(5), Precision::FromArg, vec![Arg::from(0u8)]),
            ("%*.*v", "", Width::FromArg, Precision::FromArg, vec![Arg::from("w"), Arg::from(-1)]),
            ("%*.*v", "", Width::FromArg, Precision::FromArg, vec![Arg::from(true), Arg::from(4)]),
            ("%.*v", "", Width::None, Precision::FromArg, vec![Arg::from(2_000_000)]),
            ("%2000000v", "", Width::Fixed(2_000_000), Precision::None, vec![]),
            ("%.2000000v", "", Width::None, Precision::Fixed(2_000_000), vec![]),
        ];

        for (template, flags, width, precision, prefix) in cases {
            let mut args = prefix.clone();
            args.push(Arg::Custom(&Directive));
            let printed = fmt(template, &args);

            match OptionSet::build(flags, width, precision, &prefix) {
                Ok(set) => {
                    let mut buf = Buffer::new();
                    let ctx = crate::state::Context::new(&mut buf, set);
                    let expected = crate::directive::format_string(&ctx, 'v');
                    assert_eq!(printed, expected, "{template}");
                }
                Err(errors) => {
                    let fragments: String = errors.iter().filter_map(|e| e.fragment()).collect();
                    assert!(printed.starts_with(&fragments), "{template}: {printed}");
                    if errors.contains(&OptionError::FieldTooLarge) {
                        assert_eq!(fragments, literals::NO_VERB, "{template}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_index_then_width_is_bad_index() {
        assert_eq!(fmt("%[1]2d", &[Arg::from(1)]), "%!d(BADINDEX)");
    }

    #[test]
    fn test_print_spacing() {
        let mut p = Printer::new();
        p.print(&[Arg::from(1), Arg::from(2), Arg::from("a"), Arg::from(3), Arg::from("b")]);
        assert_eq!(p.into_string(), "1 2a3b");
    }

    #[test]
    fn test_println_always_spaces() {
        let mut p = Printer::new();
        p.println(&[Arg::from("a"), Arg::from(1), Arg::from("b")]);
        assert_eq!(p.into_string(), "a 1 b\n");
    }

    #[test]
    fn test_entry_points() {
        assert_eq!(sprintf("%d", &[Arg::from(5)]), "5");
        assert_eq!(sprint(&[Arg::from("x"), Arg::from(1)]), "x1");
        assert_eq!(sprintln(&[Arg::from(true)]), "true\n");

        let mut dst = b"> ".to_vec();
        append_printf(&mut dst, "%s", &[Arg::from("hi")]);
        append_print(&mut dst, &[Arg::from(1)]);
        append_println(&mut dst, &[]);
        assert_eq!(dst, b"> hi1\n");

        let mut out = Vec::new();
        assert_eq!(fprintf(&mut out, "%03d", &[Arg::from(7)]).unwrap(), 3);
        assert_eq!(fprintln(&mut out, &[Arg::from(1), Arg::from(2)]).unwrap(), 4);
        assert_eq!(fprint(&mut out, &[Arg::from('z')]).unwrap(), 1);
        assert_eq!(out, b"0071 2\nz");
    }

    #[test]
    fn test_sink_failure_propagates() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = fprintf(&mut Broken, "%d", &[Arg::from(1)]).unwrap_err();
        assert_eq!(err.to_string(), "disk gone");
    }

    #[test]
    fn test_printer_reuse_and_clear() {
        let mut p = Printer::new();
        p.printf("%+d", &[Arg::from(1)]);
        p.print(&[Arg::from(2)]);
        assert_eq!(p.as_bytes(), b"+12");
        p.clear();
        assert!(p.as_bytes().is_empty());
    }

    #[test]
    fn test_parse_num_limits() {
        assert_eq!(parse_num(b"123x", 0, 4), (Some(123), 3));
        assert_eq!(parse_num(b"x", 0, 1), (None, 0));
        assert_eq!(parse_num(b"1000000", 0, 7), (Some(1_000_000), 7));
        assert_eq!(parse_num(b"1000001d", 0, 8), (None, 8));
    }

    #[test]
    fn test_parse_arg_number() {
        assert_eq!(parse_arg_number(b"[2]d"), (Some(1), 3, true));
        assert_eq!(parse_arg_number(b"[0]d"), (None, 3, true));
        assert_eq!(parse_arg_number(b"[x]d"), (None, 3, false));
        assert_eq!(parse_arg_number(b"[2"), (None, 1, false));
    }
}

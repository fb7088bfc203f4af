//! Verb dispatch.
//!
//! Decides, per argument and verb, which renderer produces the output:
//!
//! 1. `%T` and `%p` are answered from the type name and address alone.
//! 2. A custom operand's [`FullFormat`](crate::FullFormat) wins for every
//!    verb and gets a private [`Context`].
//! 3. For `%#v`, [`DebugString`](crate::DebugString); otherwise, for
//!    `%v %s %x %X %q`, [`DisplayString`](crate::DisplayString).
//! 4. Everything else renders structurally from the operand's shape.
//!
//! Each capability call runs under `catch_unwind`; a panic becomes a
//! `%!verb(PANIC=...)` fragment and printing carries on.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::literals;
use crate::printer::Printer;
use crate::render::float::format_float;
use crate::render::integer::{
    format_0x64, format_char, format_integer, format_quoted_char, format_unicode,
};
use crate::render::text::{format_hex, format_quoted, format_str};
use crate::render::{LOWER_DIGITS, UPPER_DIGITS, format_bool, pad_str};
use crate::state::Context;
use crate::value::{Arg, Field, FloatKind, Operand, UintKind, compare_keys};

/// Capability that panicked, as named in the diagnostic.
#[derive(Debug, Clone, Copy)]
enum Method {
    Format,
    DisplayString,
    DebugString,
}

impl Method {
    const fn name(self) -> &'static str {
        match self {
            Self::Format => "Format",
            Self::DisplayString => "DisplayString",
            Self::DebugString => "DebugString",
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}

/// Contiguous run of `u8` elements, rendered like a byte string.
fn byte_run(items: &[Arg<'_>]) -> Option<Vec<u8>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| match item {
            Arg::Uint(v, UintKind::U8) => u8::try_from(*v).ok(),
            _ => None,
        })
        .collect()
}

impl Printer {
    /// Render one top-level argument.
    pub(crate) fn print_arg(&mut self, arg: &Arg<'_>, verb: char) {
        if let Arg::Nil = arg {
            match verb {
                'T' | 'v' => pad_str(&mut self.buf, &self.opts, literals::NIL_ANGLE),
                _ => self.bad_verb(verb, arg),
            }
            return;
        }

        match verb {
            'T' => {
                let name = arg.type_name();
                format_str(&mut self.buf, &self.opts, name.as_bytes());
                return;
            }
            'p' => {
                match arg {
                    Arg::Custom(op) => {
                        let shape = op.shape();
                        self.fmt_pointer(&shape, 'p', arg);
                    }
                    _ => self.fmt_pointer(arg, 'p', arg),
                }
                return;
            }
            _ => {}
        }

        if let Arg::Custom(op) = arg
            && self.handle_methods(*op, verb)
        {
            return;
        }
        self.print_value(arg, verb, 0);
    }

    /// Offer the operand's capabilities for `verb`. Returns whether one of
    /// them produced the output.
    fn handle_methods(&mut self, op: &dyn Operand, verb: char) -> bool {
        if self.erroring {
            return false;
        }

        if let Some(formatter) = op.full_format() {
            let options = self.opts;
            let outcome = {
                let mut ctx = Context::new(&mut self.buf, options);
                catch_unwind(AssertUnwindSafe(|| formatter.format(&mut ctx, verb)))
            };
            if let Err(payload) = outcome {
                self.write_panic(op, verb, Method::Format, payload.as_ref());
            }
            return true;
        }

        if self.opts.flags.syntax {
            if let Some(debug) = op.debug_string() {
                match catch_unwind(AssertUnwindSafe(|| debug.debug_string())) {
                    Ok(s) => format_str(&mut self.buf, &self.opts, s.as_bytes()),
                    Err(payload) => {
                        self.write_panic(op, verb, Method::DebugString, payload.as_ref());
                    }
                }
                return true;
            }
        } else if matches!(verb, 'v' | 's' | 'x' | 'X' | 'q')
            && let Some(display) = op.display_string()
        {
            match catch_unwind(AssertUnwindSafe(|| display.display_string())) {
                Ok(s) => self.fmt_string(s.as_bytes(), verb, &Arg::Custom(op)),
                Err(payload) => {
                    self.write_panic(op, verb, Method::DisplayString, payload.as_ref());
                }
            }
            return true;
        }

        false
    }

    /// `%!v(PANIC=Format method: boom)`, or `<nil>` for a nil operand.
    fn write_panic(
        &mut self,
        op: &dyn Operand,
        verb: char,
        method: Method,
        payload: &(dyn Any + Send),
    ) {
        if op.is_nil() {
            self.buf.write_str(literals::NIL_ANGLE);
            return;
        }
        self.buf.write_str(literals::PERCENT_BANG);
        self.buf.write_rune(verb);
        self.buf.write_str(literals::PANIC);
        self.buf.write_str(method.name());
        self.buf.write_str(" method: ");
        self.buf.write_str(panic_message(payload));
        self.buf.write_byte(b')');
    }

    /// `%!verb(type=value)`, with the value shown as `%v`.
    pub(crate) fn bad_verb(&mut self, verb: char, subject: &Arg<'_>) {
        self.erroring = true;
        self.buf.write_str(literals::PERCENT_BANG);
        self.buf.write_rune(verb);
        self.buf.write_byte(b'(');
        match subject {
            Arg::Nil => self.buf.write_str(literals::NIL_ANGLE),
            _ => {
                self.buf.write_str(&subject.type_name());
                self.buf.write_byte(b'=');
                self.print_arg(subject, 'v');
            }
        }
        self.buf.write_byte(b')');
        self.erroring = false;
    }

    // -----------------------------------------------------------------------
    // Structural rendering
    // -----------------------------------------------------------------------

    /// Render `arg` by shape. Below the top level, custom operands are
    /// offered their capabilities first.
    pub(crate) fn print_value(&mut self, arg: &Arg<'_>, verb: char, depth: usize) {
        let Arg::Custom(op) = arg else {
            self.print_shape(arg, arg, verb, depth);
            return;
        };
        if depth > 0 && self.handle_methods(*op, verb) {
            return;
        }
        let shape = op.shape();
        if let Arg::Custom(_) = shape {
            self.buf.write_byte(b'?');
            self.buf.write_str(&op.type_name());
            self.buf.write_byte(b'?');
            return;
        }
        self.print_shape(&shape, arg, verb, depth);
    }

    /// Render `value`; `subject` is what diagnostics and syntax-form type
    /// names report (the custom operand when `value` is its shape).
    fn print_shape(&mut self, value: &Arg<'_>, subject: &Arg<'_>, verb: char, depth: usize) {
        match value {
            Arg::Nil => {
                if self.opts.flags.syntax {
                    self.buf.write_str(literals::NIL);
                } else if depth == 0 {
                    pad_str(&mut self.buf, &self.opts, literals::NIL_ANGLE);
                } else {
                    self.buf.write_str(literals::NIL_ANGLE);
                }
            }
            Arg::Bool(b) => self.fmt_bool(*b, verb, subject),
            Arg::Int(v, _) => self.fmt_integer(*v as u64, true, verb, subject),
            Arg::Uint(v, _) => self.fmt_integer(*v, false, verb, subject),
            Arg::Float(v, kind) => self.fmt_float(*v, *kind, verb, subject),
            Arg::Char(c) => self.fmt_char(*c, verb, subject),
            Arg::Str(s) => self.fmt_string(s.as_bytes(), verb, subject),
            Arg::Bytes(b) => self.fmt_bytes(b, verb, subject),
            Arg::Pointer { .. } => self.fmt_pointer(value, verb, subject),
            Arg::Slice { items, .. } => self.print_slice(items.as_deref(), verb, depth, subject),
            Arg::Map { entries, .. } => self.print_map(entries.as_deref(), verb, depth, subject),
            Arg::Struct { fields, .. } => self.print_struct(fields, verb, depth, subject),
            Arg::Custom(op) => {
                self.buf.write_byte(b'?');
                self.buf.write_str(&op.type_name());
                self.buf.write_byte(b'?');
            }
        }
    }

    fn print_slice(
        &mut self,
        items: Option<&[Arg<'_>]>,
        verb: char,
        depth: usize,
        subject: &Arg<'_>,
    ) {
        if matches!(verb, 's' | 'q' | 'x' | 'X')
            && let Some(bytes) = items.and_then(byte_run)
        {
            self.fmt_bytes(&bytes, verb, subject);
            return;
        }
        if self.opts.flags.syntax {
            self.buf.write_str(&subject.type_name());
            let Some(items) = items else {
                self.buf.write_str(literals::NIL_PAREN);
                return;
            };
            self.buf.write_byte(b'{');
            for (n, item) in items.iter().enumerate() {
                if n > 0 {
                    self.buf.write_str(literals::COMMA_SPACE);
                }
                self.print_value(item, verb, depth + 1);
            }
            self.buf.write_byte(b'}');
        } else {
            self.buf.write_byte(b'[');
            for (n, item) in items.unwrap_or_default().iter().enumerate() {
                if n > 0 {
                    self.buf.write_byte(b' ');
                }
                self.print_value(item, verb, depth + 1);
            }
            self.buf.write_byte(b']');
        }
    }

    fn print_map(
        &mut self,
        entries: Option<&[(Arg<'_>, Arg<'_>)]>,
        verb: char,
        depth: usize,
        subject: &Arg<'_>,
    ) {
        let syntax = self.opts.flags.syntax;
        if syntax {
            self.buf.write_str(&subject.type_name());
            if entries.is_none() {
                self.buf.write_str(literals::NIL_PAREN);
                return;
            }
            self.buf.write_byte(b'{');
        } else {
            self.buf.write_str(literals::MAP_OPEN);
        }

        let mut sorted: Vec<(usize, &(Arg<'_>, Arg<'_>))> =
            entries.unwrap_or_default().iter().enumerate().collect();
        sorted.sort_by(|(i, a), (j, b)| compare_keys(&a.0, &b.0).then(i.cmp(j)));
        for (n, (_, (key, value))) in sorted.into_iter().enumerate() {
            if n > 0 {
                if syntax {
                    self.buf.write_str(literals::COMMA_SPACE);
                } else {
                    self.buf.write_byte(b' ');
                }
            }
            self.print_value(key, verb, depth + 1);
            self.buf.write_byte(b':');
            self.print_value(value, verb, depth + 1);
        }

        self.buf.write_byte(if syntax { b'}' } else { b']' });
    }

    fn print_struct(&mut self, fields: &[Field<'_>], verb: char, depth: usize, subject: &Arg<'_>) {
        let syntax = self.opts.flags.syntax;
        if syntax {
            self.buf.write_str(&subject.type_name());
        }
        self.buf.write_byte(b'{');
        for (n, field) in fields.iter().enumerate() {
            if n > 0 {
                if syntax {
                    self.buf.write_str(literals::COMMA_SPACE);
                } else {
                    self.buf.write_byte(b' ');
                }
            }
            if (self.opts.flags.field_names || syntax) && !field.name.is_empty() {
                self.buf.write_str(&field.name);
                self.buf.write_byte(b':');
            }
            self.print_value(&field.value, verb, depth + 1);
        }
        self.buf.write_byte(b'}');
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    fn fmt_bool(&mut self, value: bool, verb: char, subject: &Arg<'_>) {
        match verb {
            't' | 'v' => format_bool(&mut self.buf, &self.opts, value),
            _ => self.bad_verb(verb, subject),
        }
    }

    /// `value` holds two's-complement bits when `signed`.
    fn fmt_integer(&mut self, value: u64, signed: bool, verb: char, subject: &Arg<'_>) {
        let (buf, opts) = (&mut self.buf, &self.opts);
        match verb {
            'v' if opts.flags.syntax && !signed => format_0x64(buf, opts, value, true),
            'v' | 'd' => format_integer(buf, opts, value, signed, 10, verb, LOWER_DIGITS),
            'b' => format_integer(buf, opts, value, signed, 2, verb, LOWER_DIGITS),
            'o' | 'O' => format_integer(buf, opts, value, signed, 8, verb, LOWER_DIGITS),
            'x' => format_integer(buf, opts, value, signed, 16, verb, LOWER_DIGITS),
            'X' => format_integer(buf, opts, value, signed, 16, verb, UPPER_DIGITS),
            'c' => format_char(buf, opts, value),
            'q' => format_quoted_char(buf, opts, value),
            'U' => format_unicode(buf, opts, value),
            _ => self.bad_verb(verb, subject),
        }
    }

    fn fmt_float(&mut self, value: f64, kind: FloatKind, verb: char, subject: &Arg<'_>) {
        let (buf, opts) = (&mut self.buf, &self.opts);
        match verb {
            'v' => format_float(buf, opts, value, kind, 'g', None),
            'g' | 'G' => format_float(buf, opts, value, kind, verb, None),
            'e' | 'E' | 'f' | 'F' => format_float(buf, opts, value, kind, verb, Some(6)),
            _ => self.bad_verb(verb, subject),
        }
    }

    /// `%v` shows the character itself (quoted under `%#v`); every other
    /// verb treats it as its code point.
    fn fmt_char(&mut self, c: char, verb: char, subject: &Arg<'_>) {
        match verb {
            'v' if self.opts.flags.syntax => {
                format_quoted_char(&mut self.buf, &self.opts, u64::from(c));
            }
            'v' => format_char(&mut self.buf, &self.opts, u64::from(c)),
            _ => self.fmt_integer(u64::from(c), true, verb, subject),
        }
    }

    fn fmt_string(&mut self, s: &[u8], verb: char, subject: &Arg<'_>) {
        let (buf, opts) = (&mut self.buf, &self.opts);
        match verb {
            'v' if opts.flags.syntax => format_quoted(buf, opts, s),
            'v' | 's' => format_str(buf, opts, s),
            'x' => format_hex(buf, opts, s, LOWER_DIGITS),
            'X' => format_hex(buf, opts, s, UPPER_DIGITS),
            'q' => format_quoted(buf, opts, s),
            _ => self.bad_verb(verb, subject),
        }
    }

    fn fmt_bytes(&mut self, bytes: &[u8], verb: char, subject: &Arg<'_>) {
        match verb {
            'v' | 'd' if self.opts.flags.syntax => {
                self.buf.write_str(&subject.type_name());
                self.buf.write_byte(b'{');
                for (n, &byte) in bytes.iter().enumerate() {
                    if n > 0 {
                        self.buf.write_str(literals::COMMA_SPACE);
                    }
                    format_0x64(&mut self.buf, &self.opts, u64::from(byte), true);
                }
                self.buf.write_byte(b'}');
            }
            'v' | 'd' => {
                self.buf.write_byte(b'[');
                for (n, &byte) in bytes.iter().enumerate() {
                    if n > 0 {
                        self.buf.write_byte(b' ');
                    }
                    format_integer(
                        &mut self.buf,
                        &self.opts,
                        u64::from(byte),
                        false,
                        10,
                        verb,
                        LOWER_DIGITS,
                    );
                }
                self.buf.write_byte(b']');
            }
            's' => format_str(&mut self.buf, &self.opts, bytes),
            'x' => format_hex(&mut self.buf, &self.opts, bytes, LOWER_DIGITS),
            'X' => format_hex(&mut self.buf, &self.opts, bytes, UPPER_DIGITS),
            'q' => format_quoted(&mut self.buf, &self.opts, bytes),
            _ => {
                self.buf.write_byte(b'[');
                for (n, &byte) in bytes.iter().enumerate() {
                    if n > 0 {
                        self.buf.write_byte(b' ');
                    }
                    self.print_value(&Arg::from(byte), verb, 1);
                }
                self.buf.write_byte(b']');
            }
        }
    }

    /// Addresses: `%p`, `%v` and the integer verbs.
    fn fmt_pointer(&mut self, value: &Arg<'_>, verb: char, subject: &Arg<'_>) {
        let Arg::Pointer { addr, .. } = value else {
            self.bad_verb(verb, subject);
            return;
        };
        let addr = *addr as u64;
        match verb {
            'v' if self.opts.flags.syntax => {
                self.buf.write_byte(b'(');
                self.buf.write_str(&subject.type_name());
                self.buf.write_str(")(");
                if addr == 0 {
                    self.buf.write_str(literals::NIL);
                } else {
                    format_0x64(&mut self.buf, &self.opts, addr, true);
                }
                self.buf.write_byte(b')');
            }
            'v' if addr == 0 => pad_str(&mut self.buf, &self.opts, literals::NIL_ANGLE),
            'v' | 'p' => {
                let leading_0x = !self.opts.flags.alt_form;
                format_0x64(&mut self.buf, &self.opts, addr, leading_0x);
            }
            'b' | 'o' | 'd' | 'x' | 'X' => self.fmt_integer(addr, false, verb, subject),
            _ => self.bad_verb(verb, subject),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::io::Write;

    use super::*;
    use crate::config::ArgIndexPolicy;
    use crate::state::State;
    use crate::value::{DebugString, DisplayString, FullFormat};
    use crate::{Field, format_string};

    fn fmt(template: &str, args: &[Arg<'_>]) -> String {
        let mut p = Printer::with_policy(ArgIndexPolicy::Resume);
        p.printf(template, args);
        p.into_string()
    }

    struct Celsius(f64);

    impl DisplayString for Celsius {
        fn display_string(&self) -> String {
            format!("{}°C", self.0)
        }
    }

    impl DebugString for Celsius {
        fn debug_string(&self) -> String {
            format!("Celsius({})", self.0)
        }
    }

    impl Operand for Celsius {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("temp::Celsius")
        }
        fn shape(&self) -> Arg<'_> {
            Arg::from(self.0)
        }
        fn display_string(&self) -> Option<&dyn DisplayString> {
            Some(self)
        }
        fn debug_string(&self) -> Option<&dyn DebugString> {
            Some(self)
        }
    }

    /// Writes the directive it was invoked with.
    struct Echo;

    impl FullFormat for Echo {
        fn format(&self, f: &mut dyn State, verb: char) {
            let directive = format_string(f, verb);
            f.write_all(directive.as_bytes()).unwrap();
        }
    }

    impl Operand for Echo {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("Echo")
        }
        fn shape(&self) -> Arg<'_> {
            Arg::structure("Echo", vec![])
        }
        fn full_format(&self) -> Option<&dyn FullFormat> {
            Some(self)
        }
    }

    struct Bomb {
        nil: bool,
    }

    impl FullFormat for Bomb {
        fn format(&self, f: &mut dyn State, _verb: char) {
            f.write_all(b"partial").unwrap();
            panic!("boom");
        }
    }

    impl Operand for Bomb {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("Bomb")
        }
        fn shape(&self) -> Arg<'_> {
            Arg::Nil
        }
        fn full_format(&self) -> Option<&dyn FullFormat> {
            Some(self)
        }
        fn is_nil(&self) -> bool {
            self.nil
        }
    }

    struct Plain;

    impl Operand for Plain {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("Plain")
        }
        fn shape(&self) -> Arg<'_> {
            Arg::structure("Plain", vec![Field::new("X", 1), Field::new("Y", "two")])
        }
    }

    #[test]
    fn test_nil_argument() {
        assert_eq!(fmt("%v|%5v|%T", &[Arg::Nil, Arg::Nil, Arg::Nil]), "<nil>|<nil>|<nil>");
        assert_eq!(fmt("%d", &[Arg::Nil]), "%!d(<nil>)");
    }

    #[test]
    fn test_type_verb() {
        let c = Celsius(1.0);
        assert_eq!(
            fmt("%T %T %-8T|", &[Arg::from(1u8), Arg::custom(&c), Arg::from("s")]),
            "u8 temp::Celsius &str    |"
        );
    }

    #[test]
    fn test_bad_verb_uses_value_form() {
        assert_eq!(fmt("%z", &[Arg::from(3)]), "%!z(i32=3)");
        assert_eq!(fmt("%d", &[Arg::from("hi")]), "%!d(&str=hi)");
        assert_eq!(fmt("%s", &[Arg::from(true)]), "%!s(bool=true)");
        assert_eq!(fmt("%d", &[Arg::from(1.5)]), "%!d(f64=1.5)");
    }

    #[test]
    fn test_bad_verb_on_custom_skips_capabilities() {
        let c = Celsius(21.5);
        assert_eq!(fmt("%d", &[Arg::custom(&c)]), "%!d(temp::Celsius=21.5)");
    }

    #[test]
    fn test_display_string_for_string_verbs() {
        let c = Celsius(21.5);
        let arg = Arg::custom(&c);
        assert_eq!(fmt("%v", &[arg.clone()]), "21.5°C");
        assert_eq!(fmt("%s", &[arg.clone()]), "21.5°C");
        assert_eq!(fmt("%8.3s|", &[arg.clone()]), "     21.|");
        assert_eq!(fmt("%q", &[arg.clone()]), "\"21.5°C\"");
        assert_eq!(fmt("%x", &[Arg::custom(&Celsius(1.0))]), "31c2b043");
        // Not a string verb: structural fallback.
        assert_eq!(fmt("%.2f", &[arg]), "21.50");
    }

    #[test]
    fn test_debug_string_for_syntax_form() {
        let c = Celsius(3.0);
        assert_eq!(fmt("%#v", &[Arg::custom(&c)]), "Celsius(3)");
        assert_eq!(fmt("%#12v|", &[Arg::custom(&c)]), "  Celsius(3)|");
    }

    #[test]
    fn test_full_format_sees_options() {
        assert_eq!(fmt("%-+#8.3x", &[Arg::custom(&Echo)]), "%+-#8.3x");
        assert_eq!(fmt("%#v", &[Arg::custom(&Echo)]), "%#v");
        assert_eq!(fmt("%+v", &[Arg::custom(&Echo)]), "%+v");
    }

    #[test]
    fn test_full_format_wins_for_every_verb() {
        assert_eq!(
            fmt("%d %s %T", &[Arg::custom(&Echo), Arg::custom(&Echo), Arg::custom(&Echo)]),
            "%d %s Echo"
        );
    }

    #[test]
    fn test_panic_is_contained() {
        let bomb = Bomb { nil: false };
        assert_eq!(
            fmt("[%v] %d", &[Arg::custom(&bomb), Arg::from(7)]),
            "[partial%!v(PANIC=Format method: boom)] 7"
        );
    }

    #[test]
    fn test_panic_on_nil_operand_prints_nil() {
        let bomb = Bomb { nil: true };
        assert_eq!(fmt("%s", &[Arg::custom(&bomb)]), "partial<nil>");
    }

    #[test]
    fn test_custom_nested_in_container_uses_capabilities() {
        let c = Celsius(5.0);
        let list = Arg::slice("[]Celsius", vec![Arg::custom(&c), Arg::custom(&c)]);
        assert_eq!(fmt("%v", &[list.clone()]), "[5°C 5°C]");
        assert_eq!(fmt("%#v", &[list]), "[]Celsius{Celsius(5), Celsius(5)}");
    }

    #[test]
    fn test_struct_forms() {
        let arg = Arg::custom(&Plain);
        assert_eq!(fmt("%v", &[arg.clone()]), "{1 two}");
        assert_eq!(fmt("%+v", &[arg.clone()]), "{X:1 Y:two}");
        assert_eq!(fmt("%#v", &[arg]), "Plain{X:1, Y:\"two\"}");
    }

    #[test]
    fn test_slice_forms() {
        let s = Arg::slice("[]i32", vec![Arg::from(1), Arg::from(2)]);
        assert_eq!(fmt("%v %d %x", &[s.clone(), s.clone(), s.clone()]), "[1 2] [1 2] [1 2]");
        assert_eq!(fmt("%#v", &[s]), "[]i32{1, 2}");
        assert_eq!(
            fmt("%v %#v", &[Arg::nil_slice("[]i32"), Arg::nil_slice("[]i32")]),
            "[] []i32(nil)"
        );
    }

    #[test]
    fn test_u8_slice_as_bytes() {
        let s = Arg::slice("[]u8", vec![Arg::from(b'h'), Arg::from(b'i')]);
        assert_eq!(
            fmt("%s %x %q %v", &[s.clone(), s.clone(), s.clone(), s]),
            "hi 6869 \"hi\" [104 105]"
        );
    }

    #[test]
    fn test_map_sorted_by_key() {
        let m = Arg::map(
            "HashMap<&str, i32>",
            vec![(Arg::from("b"), Arg::from(2)), (Arg::from("a"), Arg::from(1))],
        );
        assert_eq!(fmt("%v", &[m.clone()]), "map[a:1 b:2]");
        assert_eq!(fmt("%#v", &[m]), "HashMap<&str, i32>{\"a\":1, \"b\":2}");
        assert_eq!(fmt("%#v", &[Arg::nil_map("M")]), "M(nil)");
        assert_eq!(fmt("%v", &[Arg::nil_map("M")]), "map[]");
    }

    #[test]
    fn test_map_mixed_key_kinds() {
        let entries: Vec<(Arg<'_>, Arg<'_>)> = (0..40i64)
            .map(|i| {
                let key = if i % 2 == 0 {
                    Arg::from(format!("s{}", i / 2))
                } else {
                    Arg::from((i * 37) % 64)
                };
                (key, Arg::from(i))
            })
            .collect();
        let out = fmt("%v", &[Arg::map("M", entries)]);

        let body = out
            .strip_prefix("map[")
            .and_then(|rest| rest.strip_suffix(']'))
            .expect("map brackets");
        let keys: Vec<&str> = body
            .split(' ')
            .map(|pair| pair.split(':').next().unwrap_or_default())
            .collect();
        assert_eq!(keys.len(), 40);
        let (ints, strs) = keys.split_at(20);
        let ints: Vec<i64> = ints.iter().map(|k| k.parse().expect("int key first")).collect();
        assert!(ints.windows(2).all(|w| w[0] <= w[1]), "{out}");
        assert!(strs.iter().all(|k| k.starts_with('s')), "{out}");
        assert!(strs.windows(2).all(|w| w[0] <= w[1]), "{out}");

        let small = Arg::map(
            "M",
            vec![
                (Arg::from(2), Arg::from(0)),
                (Arg::from("x"), Arg::from(0)),
                (Arg::from(1), Arg::from(0)),
            ],
        );
        assert_eq!(fmt("%v", &[small]), "map[1:0 2:0 x:0]");
    }

    #[test]
    fn test_map_composite_keys_keep_insertion_order() {
        let m = Arg::map(
            "M",
            vec![
                (Arg::slice("[]i32", vec![Arg::from(9)]), Arg::from(1)),
                (Arg::from(true), Arg::from(2)),
                (Arg::slice("[]i32", vec![Arg::from(3)]), Arg::from(3)),
                (Arg::Nil, Arg::from(4)),
            ],
        );
        assert_eq!(fmt("%v", &[m]), "map[<nil>:4 true:2 [9]:1 [3]:3]");
    }

    #[test]
    fn test_nil_element() {
        let s = Arg::slice("[]Option<i32>", vec![Arg::Nil, Arg::from(1)]);
        assert_eq!(fmt("%v %d", &[s.clone(), s.clone()]), "[<nil> 1] [<nil> 1]");
        assert_eq!(fmt("%#v", &[s]), "[]Option<i32>{nil, 1}");
    }

    #[test]
    fn test_pointer_forms() {
        let p = Arg::pointer("*Node", 0xc000);
        let null = Arg::pointer("*Node", 0);
        assert_eq!(fmt("%p %v %#p", &[p.clone(), p.clone(), p.clone()]), "0xc000 0xc000 c000");
        assert_eq!(fmt("%#v %#v", &[p.clone(), null.clone()]), "(*Node)(0xc000) (*Node)(nil)");
        assert_eq!(fmt("%v|%6v|", &[null.clone(), null]), "<nil>| <nil>|");
        assert_eq!(fmt("%d %X", &[p.clone(), p.clone()]), "49152 C000");
        assert_eq!(fmt("%s", &[p]), "%!s(*Node=0xc000)");
        assert_eq!(fmt("%p", &[Arg::from(5)]), "%!p(i32=5)");
    }

    #[test]
    fn test_integer_verbs() {
        assert_eq!(fmt("%d %b %o %O %x %X", &vec![Arg::from(10); 6]), "10 1010 12 0o12 a A");
        assert_eq!(fmt("%c %q %U %#U", &vec![Arg::from(65); 4]), "A 'A' U+0041 U+0041 'A'");
        assert_eq!(fmt("%v %#v", &[Arg::from(255u8), Arg::from(255u8)]), "255 0xff");
        assert_eq!(fmt("%#v", &[Arg::from(-5)]), "-5");
        assert_eq!(fmt("%t", &[Arg::from(1)]), "%!t(i32=1)");
    }

    #[test]
    fn test_char_verbs() {
        assert_eq!(fmt("%v %#v %d %U", &vec![Arg::from('é'); 4]), "é 'é' 233 U+00E9");
        assert_eq!(fmt("%s", &[Arg::from('x')]), "%!s(char=x)");
    }

    #[test]
    fn test_string_and_bytes_verbs() {
        assert_eq!(fmt("%v %#v %q", &vec![Arg::from("a\tb"); 3]), "a\tb \"a\\tb\" \"a\\tb\"");
        let b = Arg::from(&[1u8, 2][..]);
        assert_eq!(fmt("%v %#v %o", &[b.clone(), b.clone(), b]), "[1 2] &[u8]{0x1, 0x2} [1 2]");
        assert_eq!(fmt("%t", &[Arg::from(&[1u8][..])]), "[%!t(u8=1)]");
    }

    #[test]
    fn test_bool_verbs() {
        assert_eq!(
            fmt("%t %v %6t|", &[Arg::from(true), Arg::from(false), Arg::from(true)]),
            "true false   true|"
        );
    }
}

//! Serializable argument descriptions and the custom operands fixtures can
//! construct.
//!
//! A [`FixtureArg`] owns everything it describes; [`FixtureArg::to_arg`]
//! borrows it as an engine [`Arg`].

use std::borrow::Cow;
use std::io::Write;

use fmtverb_core::{
    Arg, DebugString, DisplayString, Field, FullFormat, Operand, OptionSet, State, format_string,
};
use serde::{Deserialize, Serialize};

/// One argument, as written in fixture JSON:
/// `{"kind": "i32", "value": 7}`, `{"kind": "nil"}`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FixtureArg {
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Pointer {
        ty: String,
        addr: usize,
    },
    Slice {
        ty: String,
        #[serde(default)]
        items: Option<Vec<FixtureArg>>,
    },
    Map {
        ty: String,
        #[serde(default)]
        entries: Option<Vec<(FixtureArg, FixtureArg)>>,
    },
    Struct {
        ty: String,
        fields: Vec<FixtureField>,
    },
    Display(DisplayOperand),
    Echo(EchoOperand),
    Panic(PanicOperand),
    Shaped(ShapedOperand),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureField {
    pub name: String,
    pub value: FixtureArg,
}

impl FixtureArg {
    /// Engine view of this argument.
    #[must_use]
    pub fn to_arg(&self) -> Arg<'_> {
        match self {
            Self::Nil => Arg::Nil,
            Self::Bool(v) => Arg::from(*v),
            Self::I8(v) => Arg::from(*v),
            Self::I16(v) => Arg::from(*v),
            Self::I32(v) => Arg::from(*v),
            Self::I64(v) => Arg::from(*v),
            Self::U8(v) => Arg::from(*v),
            Self::U16(v) => Arg::from(*v),
            Self::U32(v) => Arg::from(*v),
            Self::U64(v) => Arg::from(*v),
            Self::Usize(v) => Arg::from(*v),
            Self::F32(v) => Arg::from(*v),
            Self::F64(v) => Arg::from(*v),
            Self::Char(v) => Arg::from(*v),
            Self::Str(s) => Arg::from(s.as_str()),
            Self::Bytes(b) => Arg::from(b.as_slice()),
            Self::Pointer { ty, addr } => Arg::pointer(ty.as_str(), *addr),
            Self::Slice { ty, items } => match items {
                Some(items) => Arg::slice(ty.as_str(), items.iter().map(Self::to_arg).collect()),
                None => Arg::nil_slice(ty.as_str()),
            },
            Self::Map { ty, entries } => match entries {
                Some(entries) => Arg::map(
                    ty.as_str(),
                    entries.iter().map(|(k, v)| (k.to_arg(), v.to_arg())).collect(),
                ),
                None => Arg::nil_map(ty.as_str()),
            },
            Self::Struct { ty, fields } => Arg::structure(
                ty.as_str(),
                fields
                    .iter()
                    .map(|f| Field::new(f.name.as_str(), f.value.to_arg()))
                    .collect(),
            ),
            Self::Display(op) => Arg::custom(op),
            Self::Echo(op) => Arg::custom(op),
            Self::Panic(op) => Arg::custom(op),
            Self::Shaped(op) => Arg::custom(op),
        }
    }
}

/// Borrow a whole argument list.
#[must_use]
pub fn to_args(args: &[FixtureArg]) -> Vec<Arg<'_>> {
    args.iter().map(FixtureArg::to_arg).collect()
}

// ---------------------------------------------------------------------------
// Custom operands
// ---------------------------------------------------------------------------

/// Supplies a display string, and a debug string when `debug` is set.
/// Structurally it is its display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOperand {
    pub ty: String,
    pub text: String,
    #[serde(default)]
    pub debug: Option<String>,
}

impl DisplayString for DisplayOperand {
    fn display_string(&self) -> String {
        self.text.clone()
    }
}

impl DebugString for DisplayOperand {
    fn debug_string(&self) -> String {
        self.debug.clone().unwrap_or_default()
    }
}

impl Operand for DisplayOperand {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.ty.as_str())
    }

    fn shape(&self) -> Arg<'_> {
        Arg::from(self.text.as_str())
    }

    fn display_string(&self) -> Option<&dyn DisplayString> {
        Some(self)
    }

    fn debug_string(&self) -> Option<&dyn DebugString> {
        self.debug.as_ref().map(|_| self as &dyn DebugString)
    }
}

/// Full-format operand that writes back the directive it was invoked with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoOperand {
    pub ty: String,
}

impl FullFormat for EchoOperand {
    fn format(&self, f: &mut dyn State, verb: char) {
        let directive = format_string(f, verb);
        let _ = f.write_all(directive.as_bytes());
    }
}

impl Operand for EchoOperand {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.ty.as_str())
    }

    fn shape(&self) -> Arg<'_> {
        Arg::structure(self.ty.as_str(), Vec::new())
    }

    fn full_format(&self) -> Option<&dyn FullFormat> {
        Some(self)
    }
}

/// Which capability a [`PanicOperand`] exposes (and panics in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicSite {
    Format,
    Display,
    Debug,
}

/// Panics with `message` from the chosen capability. A `Format` site
/// writes `prefix` first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanicOperand {
    pub ty: String,
    pub site: PanicSite,
    pub message: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub nil: bool,
}

impl FullFormat for PanicOperand {
    fn format(&self, f: &mut dyn State, _verb: char) {
        let _ = f.write_all(self.prefix.as_bytes());
        panic!("{}", self.message);
    }
}

impl DisplayString for PanicOperand {
    fn display_string(&self) -> String {
        panic!("{}", self.message);
    }
}

impl DebugString for PanicOperand {
    fn debug_string(&self) -> String {
        panic!("{}", self.message);
    }
}

impl Operand for PanicOperand {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.ty.as_str())
    }

    fn shape(&self) -> Arg<'_> {
        Arg::structure(self.ty.as_str(), Vec::new())
    }

    fn full_format(&self) -> Option<&dyn FullFormat> {
        (self.site == PanicSite::Format).then_some(self as &dyn FullFormat)
    }

    fn display_string(&self) -> Option<&dyn DisplayString> {
        (self.site == PanicSite::Display).then_some(self as &dyn DisplayString)
    }

    fn debug_string(&self) -> Option<&dyn DebugString> {
        (self.site == PanicSite::Debug).then_some(self as &dyn DebugString)
    }

    fn is_nil(&self) -> bool {
        self.nil
    }
}

/// No capabilities; renders from its structural shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapedOperand {
    pub ty: String,
    pub shape: Box<FixtureArg>,
}

impl Operand for ShapedOperand {
    fn type_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.ty.as_str())
    }

    fn shape(&self) -> Arg<'_> {
        self.shape.to_arg()
    }
}

/// Stand-alone [`State`] over a fixed option set, for reconstructing
/// directives outside of a formatting call.
#[derive(Debug, Default)]
pub struct OptionProbe {
    options: OptionSet,
    written: Vec<u8>,
}

impl OptionProbe {
    #[must_use]
    pub fn new(options: OptionSet) -> Self {
        Self {
            options,
            written: Vec::new(),
        }
    }

    /// Directive text for `verb` under these options.
    #[must_use]
    pub fn directive(&self, verb: char) -> String {
        format_string(self, verb)
    }

    /// Bytes written through the probe.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Write for OptionProbe {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.written.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl State for OptionProbe {
    fn width(&self) -> Option<usize> {
        self.options.width()
    }

    fn precision(&self) -> Option<usize> {
        self.options.precision()
    }

    fn flag(&self, c: char) -> bool {
        self.options.flag(c)
    }
}

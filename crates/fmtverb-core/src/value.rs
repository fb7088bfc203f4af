//! Operand model and renderer capabilities.
//!
//! [`Arg`] is the engine's view of one argument: either a built-in
//! structural category the engine knows how to render, or a
//! [`Custom`](Arg::Custom) operand that may supply its own rendering.
//!
//! A custom operand declares its capabilities through [`Operand`]. At most one
//! capability is used per verb occurrence; the precedence lives in the
//! dispatcher, not here.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::state::State;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Full control over rendering for every verb.
///
/// The engine applies no padding or truncation to what is written; use the
/// [`State`] accessors to honor width, precision and flags.
pub trait FullFormat {
    fn format(&self, f: &mut dyn State, verb: char);
}

/// Native string form, used for `%v %s %x %X %q`.
pub trait DisplayString {
    fn display_string(&self) -> String;
}

/// Syntax form, used for `%#v`.
pub trait DebugString {
    fn debug_string(&self) -> String;
}

/// A caller-defined operand.
///
/// `shape` is the structural fallback rendered when no capability applies.
/// It must not return an [`Arg::Custom`]; such a shape renders as
/// `?TypeName?`.
pub trait Operand {
    /// Name reported by `%T`, bad-verb diagnostics and `EXTRA` lists.
    fn type_name(&self) -> Cow<'_, str>;

    /// Built-in view of this value.
    fn shape(&self) -> Arg<'_>;

    fn full_format(&self) -> Option<&dyn FullFormat> {
        None
    }

    fn display_string(&self) -> Option<&dyn DisplayString> {
        None
    }

    fn debug_string(&self) -> Option<&dyn DebugString> {
        None
    }

    /// Whether this operand stands for an absent value. A panicking
    /// capability on a nil operand renders as `<nil>`.
    fn is_nil(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Built-in categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintKind {
    U8,
    U16,
    U32,
    U64,
    Usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl IntKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
        }
    }
}

impl UintKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
        }
    }
}

impl FloatKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// A named struct field.
#[derive(Clone)]
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    pub value: Arg<'a>,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: impl Into<Arg<'a>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One formatting argument.
///
/// Composite variants carry the type name shown by `%T` and `%#v`. A `None`
/// item list marks a nil slice or map.
#[derive(Clone)]
pub enum Arg<'a> {
    Nil,
    Bool(bool),
    Int(i64, IntKind),
    Uint(u64, UintKind),
    Float(f64, FloatKind),
    Char(char),
    Str(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Pointer {
        ty: Cow<'a, str>,
        addr: usize,
    },
    Slice {
        ty: Cow<'a, str>,
        items: Option<Vec<Arg<'a>>>,
    },
    Map {
        ty: Cow<'a, str>,
        entries: Option<Vec<(Arg<'a>, Arg<'a>)>>,
    },
    Struct {
        ty: Cow<'a, str>,
        fields: Vec<Field<'a>>,
    },
    Custom(&'a dyn Operand),
}

impl<'a> Arg<'a> {
    /// Wrap a custom operand.
    pub fn custom<T: Operand>(value: &'a T) -> Self {
        Arg::Custom(value)
    }

    pub fn pointer(ty: impl Into<Cow<'a, str>>, addr: usize) -> Self {
        Arg::Pointer {
            ty: ty.into(),
            addr,
        }
    }

    pub fn slice(ty: impl Into<Cow<'a, str>>, items: Vec<Arg<'a>>) -> Self {
        Arg::Slice {
            ty: ty.into(),
            items: Some(items),
        }
    }

    pub fn nil_slice(ty: impl Into<Cow<'a, str>>) -> Self {
        Arg::Slice {
            ty: ty.into(),
            items: None,
        }
    }

    pub fn map(ty: impl Into<Cow<'a, str>>, entries: Vec<(Arg<'a>, Arg<'a>)>) -> Self {
        Arg::Map {
            ty: ty.into(),
            entries: Some(entries),
        }
    }

    pub fn nil_map(ty: impl Into<Cow<'a, str>>) -> Self {
        Arg::Map {
            ty: ty.into(),
            entries: None,
        }
    }

    pub fn structure(ty: impl Into<Cow<'a, str>>, fields: Vec<Field<'a>>) -> Self {
        Arg::Struct {
            ty: ty.into(),
            fields,
        }
    }

    /// Type name as reported by `%T`.
    #[must_use]
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Arg::Nil => Cow::Borrowed(crate::literals::NIL_ANGLE),
            Arg::Bool(_) => Cow::Borrowed("bool"),
            Arg::Int(_, kind) => Cow::Borrowed(kind.name()),
            Arg::Uint(_, kind) => Cow::Borrowed(kind.name()),
            Arg::Float(_, kind) => Cow::Borrowed(kind.name()),
            Arg::Char(_) => Cow::Borrowed("char"),
            Arg::Str(_) => Cow::Borrowed("&str"),
            Arg::Bytes(_) => Cow::Borrowed("&[u8]"),
            Arg::Pointer { ty, .. }
            | Arg::Slice { ty, .. }
            | Arg::Map { ty, .. }
            | Arg::Struct { ty, .. } => Cow::Borrowed(ty.as_ref()),
            Arg::Custom(op) => op.type_name(),
        }
    }

    /// Whether this operand is a string for `print`'s spacing rule.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Arg::Str(_))
    }
}

/// Ordering used to present map entries deterministically.
///
/// Keys are ranked by kind first (nil, bool, signed, unsigned, float, char,
/// string, bytes, pointer, then everything else); keys of the same scalar
/// kind compare by value. Composite and custom keys all compare equal, so a
/// stable sort leaves them in insertion order after every scalar key.
pub(crate) fn compare_keys(a: &Arg<'_>, b: &Arg<'_>) -> Ordering {
    key_rank(a).cmp(&key_rank(b)).then_with(|| match (a, b) {
        (Arg::Bool(x), Arg::Bool(y)) => x.cmp(y),
        (Arg::Int(x, _), Arg::Int(y, _)) => x.cmp(y),
        (Arg::Uint(x, _), Arg::Uint(y, _)) => x.cmp(y),
        (Arg::Float(x, _), Arg::Float(y, _)) => x.total_cmp(y),
        (Arg::Char(x), Arg::Char(y)) => x.cmp(y),
        (Arg::Str(x), Arg::Str(y)) => x.cmp(y),
        (Arg::Bytes(x), Arg::Bytes(y)) => x.cmp(y),
        (Arg::Pointer { addr: x, .. }, Arg::Pointer { addr: y, .. }) => x.cmp(y),
        _ => Ordering::Equal,
    })
}

fn key_rank(arg: &Arg<'_>) -> u8 {
    match arg {
        Arg::Nil => 0,
        Arg::Bool(_) => 1,
        Arg::Int(..) => 2,
        Arg::Uint(..) => 3,
        Arg::Float(..) => 4,
        Arg::Char(_) => 5,
        Arg::Str(_) => 6,
        Arg::Bytes(_) => 7,
        Arg::Pointer { .. } => 8,
        Arg::Slice { .. } | Arg::Map { .. } | Arg::Struct { .. } | Arg::Custom(_) => 9,
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

macro_rules! from_int {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64, IntKind::$kind)
            }
        })*
    };
}

macro_rules! from_uint {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(impl From<$t> for Arg<'_> {
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64, UintKind::$kind)
            }
        })*
    };
}

from_int!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);
from_uint!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

impl From<f32> for Arg<'_> {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v), FloatKind::F32)
    }
}

impl From<f64> for Arg<'_> {
    fn from(v: f64) -> Self {
        Arg::Float(v, FloatKind::F64)
    }
}

impl From<bool> for Arg<'_> {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<char> for Arg<'_> {
    fn from(v: char) -> Self {
        Arg::Char(v)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(v: &'a str) -> Self {
        Arg::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(v: &'a String) -> Self {
        Arg::Str(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(v: String) -> Self {
        Arg::Str(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(v: &'a [u8]) -> Self {
        Arg::Bytes(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for Arg<'_> {
    fn from(v: Vec<u8>) -> Self {
        Arg::Bytes(Cow::Owned(v))
    }
}

impl<'a, T: Into<Arg<'a>>> From<Option<T>> for Arg<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Nil, Into::into)
    }
}

impl<'a> From<&'a dyn Operand> for Arg<'a> {
    fn from(v: &'a dyn Operand) -> Self {
        Arg::Custom(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Meters(f64);

    impl Operand for Meters {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("units::Meters")
        }

        fn shape(&self) -> Arg<'_> {
            Arg::from(self.0)
        }
    }

    #[test]
    fn scalar_type_names() {
        assert_eq!(Arg::from(1i8).type_name(), "i8");
        assert_eq!(Arg::from(1u64).type_name(), "u64");
        assert_eq!(Arg::from(1.5f32).type_name(), "f32");
        assert_eq!(Arg::from("x").type_name(), "&str");
        assert_eq!(Arg::from(&b"x"[..]).type_name(), "&[u8]");
        assert_eq!(Arg::Nil.type_name(), "<nil>");
    }

    #[test]
    fn custom_type_name_comes_from_operand() {
        let m = Meters(3.0);
        assert_eq!(Arg::custom(&m).type_name(), "units::Meters");
    }

    #[test]
    fn custom_without_capabilities_reports_none() {
        let m = Meters(3.0);
        assert!(m.full_format().is_none());
        assert!(m.display_string().is_none());
        assert!(m.debug_string().is_none());
        assert!(!m.is_nil());
    }

    #[test]
    fn option_none_is_nil() {
        assert!(matches!(Arg::from(None::<i32>), Arg::Nil));
        assert!(matches!(Arg::from(Some(3i32)), Arg::Int(3, IntKind::I32)));
    }

    #[test]
    fn negative_ints_keep_sign() {
        assert!(matches!(Arg::from(-7i16), Arg::Int(-7, IntKind::I16)));
    }

    #[test]
    fn key_ordering_by_category() {
        assert_eq!(compare_keys(&Arg::from(1), &Arg::from(2)), Ordering::Less);
        assert_eq!(compare_keys(&Arg::from("b"), &Arg::from("a")), Ordering::Greater);
        assert_eq!(compare_keys(&Arg::from("a"), &Arg::from(1)), Ordering::Greater);
        assert_eq!(compare_keys(&Arg::from(1), &Arg::from("a")), Ordering::Less);
        assert_eq!(compare_keys(&Arg::Nil, &Arg::from(false)), Ordering::Less);
        assert_eq!(compare_keys(&Arg::from(7u8), &Arg::from(-1)), Ordering::Greater);
        let m = Meters(1.0);
        assert_eq!(compare_keys(&Arg::Custom(&m), &Arg::from("z")), Ordering::Greater);
        assert_eq!(
            compare_keys(&Arg::Custom(&m), &Arg::slice("[]i32", vec![])),
            Ordering::Equal
        );
    }

    #[test]
    fn only_str_counts_as_string() {
        assert!(Arg::from("s").is_string());
        assert!(!Arg::from(&b"s"[..]).is_string());
        assert!(!Arg::from('s').is_string());
    }
}

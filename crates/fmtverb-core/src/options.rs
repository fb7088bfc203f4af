//! Per-verb formatting options.
//!
//! An [`OptionSet`] is built once per directive and is read-only afterwards.
//! Width and precision are independently present or absent; when sourced
//! from an argument (`*`), they are resolved to concrete integers before the
//! set is finalized.

use thiserror::Error;

use crate::config::MAX_FIELD;
use crate::literals;
use crate::value::Arg;

/// Recognized flags in canonical reconstruction order.
pub const FLAG_ALPHABET: [char; 5] = [' ', '+', '-', '#', '0'];

/// Failure to construct an [`OptionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unrecognized flag {0:?}")]
    UnknownFlag(char),
    #[error("width argument is not an integer within ±1000000")]
    BadWidth,
    #[error("precision argument is not an integer in 0..=1000000")]
    BadPrecision,
    #[error("literal width or precision exceeds 1000000")]
    FieldTooLarge,
}

impl OptionError {
    /// Inline diagnostic the printer writes for this condition. An
    /// oversized literal cannot be parsed at all, so the directive reports
    /// a missing verb.
    #[must_use]
    pub const fn fragment(self) -> Option<&'static str> {
        match self {
            Self::BadWidth => Some(literals::BAD_WIDTH),
            Self::BadPrecision => Some(literals::BAD_PREC),
            Self::FieldTooLarge => Some(literals::NO_VERB),
            Self::UnknownFlag(_) => None,
        }
    }
}

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
    /// `%+v`: show struct field names. Moved out of `force_sign` for `v`.
    pub(crate) field_names: bool,
    /// `%#v`: syntax form. Moved out of `alt_form` for `v`.
    pub(crate) syntax: bool,
}

impl Flags {
    /// Apply one flag character. Returns `false` if `c` is not a flag.
    ///
    /// `-` wins over `0` whichever comes first: padding with zeros is only
    /// ever done on the left.
    pub fn set(&mut self, c: char) -> bool {
        match c {
            '-' => {
                self.left_justify = true;
                self.zero_pad = false;
            }
            '+' => self.force_sign = true,
            ' ' => self.space_sign = true,
            '#' => self.alt_form = true,
            '0' => self.zero_pad = !self.left_justify,
            _ => return false,
        }
        true
    }

    /// Parse a run of flag characters.
    pub fn parse(chars: &str) -> Result<Self, OptionError> {
        let mut flags = Self::default();
        for c in chars.chars() {
            if !flags.set(c) {
                return Err(OptionError::UnknownFlag(c));
            }
        }
        Ok(flags)
    }

    /// Split `#` and `+` into their `%v`-specific meanings.
    pub(crate) fn promote_for_value_verb(&mut self) {
        self.syntax = self.alt_form;
        self.alt_form = false;
        self.field_names = self.force_sign;
        self.force_sign = false;
    }
}

/// Where a width comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Where a precision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Finalized options for one verb occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionSet {
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

impl OptionSet {
    #[must_use]
    pub fn new(flags: Flags, width: Option<usize>, precision: Option<usize>) -> Self {
        Self {
            flags,
            width,
            precision,
        }
    }

    /// Build an option set from raw directive parts.
    ///
    /// `FromArg` sources consume `args` in order, width first. A bad width
    /// does not stop the precision from being resolved; every problem found
    /// is reported, in directive order. An unknown flag stops the build.
    pub fn build(
        flags: &str,
        width: Width,
        precision: Precision,
        args: &[Arg<'_>],
    ) -> Result<Self, Vec<OptionError>> {
        let mut flags = Flags::parse(flags).map_err(|e| vec![e])?;
        let mut errors = Vec::new();
        let mut cursor = 0;

        let width = match width {
            Width::None => None,
            Width::Fixed(w) => literal_field(w).map_err(|e| errors.push(e)).ok(),
            Width::FromArg => {
                let (width, next) = width_from_args(&mut flags, args, cursor);
                cursor = next;
                width.map_err(|e| errors.push(e)).ok()
            }
        };

        let precision = match precision {
            Precision::None => None,
            Precision::Fixed(p) => literal_field(p).map_err(|e| errors.push(e)).ok(),
            Precision::FromArg => {
                let (precision, _) = precision_from_args(args, cursor);
                precision.map_err(|e| errors.push(e)).ok()
            }
        };

        if errors.is_empty() {
            Ok(Self::new(flags, width, precision))
        } else {
            Err(errors)
        }
    }

    /// Whether flag `c` is set. Unknown characters report `false`.
    #[must_use]
    pub fn flag(&self, c: char) -> bool {
        match c {
            '-' => self.flags.left_justify,
            '+' => self.flags.force_sign || self.flags.field_names,
            '#' => self.flags.alt_form || self.flags.syntax,
            ' ' => self.flags.space_sign,
            '0' => self.flags.zero_pad,
            _ => false,
        }
    }

    #[must_use]
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    #[must_use]
    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    /// Copy of `self` with zero padding turned off.
    #[must_use]
    pub(crate) fn without_zero_pad(mut self) -> Self {
        self.flags.zero_pad = false;
        self
    }
}

/// Interpret an argument as a width/precision count.
///
/// Only integer-typed arguments qualify (custom operands by their shape),
/// and only within `±MAX_FIELD`.
#[must_use]
pub fn int_from_arg(arg: &Arg<'_>) -> Option<isize> {
    let n = match arg {
        Arg::Int(v, _) => isize::try_from(*v).ok()?,
        Arg::Uint(v, _) => isize::try_from(*v).ok()?,
        Arg::Custom(op) => return int_from_shape(&op.shape()),
        _ => return None,
    };
    (n.unsigned_abs() <= MAX_FIELD).then_some(n)
}

fn int_from_shape(shape: &Arg<'_>) -> Option<isize> {
    match shape {
        Arg::Custom(_) => None,
        other => int_from_arg(other),
    }
}

/// A negative width means left-justify with the magnitude as width.
pub(crate) fn apply_signed_width(flags: &mut Flags, n: isize) -> usize {
    if n < 0 {
        flags.left_justify = true;
        flags.zero_pad = false;
    }
    n.unsigned_abs()
}

/// Check a width or precision written as digits in the directive.
pub(crate) fn literal_field(n: usize) -> Result<usize, OptionError> {
    if n <= MAX_FIELD {
        Ok(n)
    } else {
        Err(OptionError::FieldTooLarge)
    }
}

/// Resolve a `*` width from `args[cursor]`, returning the advanced cursor.
///
/// The argument is consumed whether or not it is usable; a missing one is
/// not. A negative width turns on left-justification in `flags`.
pub(crate) fn width_from_args(
    flags: &mut Flags,
    args: &[Arg<'_>],
    cursor: usize,
) -> (Result<usize, OptionError>, usize) {
    match args.get(cursor) {
        Some(arg) => {
            let width = int_from_arg(arg)
                .map(|n| apply_signed_width(flags, n))
                .ok_or(OptionError::BadWidth);
            (width, cursor + 1)
        }
        None => (Err(OptionError::BadWidth), cursor),
    }
}

/// Resolve a `.*` precision from `args[cursor]`, returning the advanced
/// cursor. Negative values are bad precisions.
pub(crate) fn precision_from_args(
    args: &[Arg<'_>],
    cursor: usize,
) -> (Result<usize, OptionError>, usize) {
    match args.get(cursor) {
        Some(arg) => {
            let precision = int_from_arg(arg)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(OptionError::BadPrecision);
            (precision, cursor + 1)
        }
        None => (Err(OptionError::BadPrecision), cursor),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let flags = Flags::parse(" +-#0").unwrap();
        assert!(flags.space_sign);
        assert!(flags.force_sign);
        assert!(flags.left_justify);
        assert!(flags.alt_form);
        assert!(!flags.zero_pad); // '-' overrides '0'
    }

    #[test]
    fn test_minus_overrides_zero_in_any_order() {
        assert_eq!(Flags::parse("-0").unwrap(), Flags::parse("0-").unwrap());
        assert!(!Flags::parse("0-").unwrap().zero_pad);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert_eq!(Flags::parse("+x"), Err(OptionError::UnknownFlag('x')));
    }

    #[test]
    fn test_queries_report_absence() {
        let set = OptionSet::default();
        assert_eq!(set.width(), None);
        assert_eq!(set.precision(), None);
        assert!(!set.flag('-'));
        assert!(!set.flag('q'));
    }

    #[test]
    fn test_build_fixed() {
        let set = OptionSet::build("", Width::Fixed(5), Precision::Fixed(2), &[]).unwrap();
        assert_eq!(set.width(), Some(5));
        assert_eq!(set.precision(), Some(2));
    }

    #[test]
    fn test_build_from_args() {
        let args = [Arg::from(8), Arg::from(3u8)];
        let set = OptionSet::build("0", Width::FromArg, Precision::FromArg, &args).unwrap();
        assert_eq!(set.width(), Some(8));
        assert_eq!(set.precision(), Some(3));
        assert!(set.flag('0'));
    }

    #[test]
    fn test_negative_width_left_justifies() {
        let args = [Arg::from(-6)];
        let set = OptionSet::build("0", Width::FromArg, Precision::None, &args).unwrap();
        assert_eq!(set.width(), Some(6));
        assert!(set.flag('-'));
        assert!(!set.flag('0'));
    }

    #[test]
    fn test_non_integer_width_is_bad_width() {
        let args = [Arg::from("wide")];
        assert_eq!(
            OptionSet::build("", Width::FromArg, Precision::None, &args),
            Err(vec![OptionError::BadWidth])
        );
    }

    #[test]
    fn test_negative_precision_is_bad_prec() {
        let args = [Arg::from(-1)];
        assert_eq!(
            OptionSet::build("", Width::None, Precision::FromArg, &args),
            Err(vec![OptionError::BadPrecision])
        );
    }

    #[test]
    fn test_missing_width_arg_is_bad_width() {
        assert_eq!(
            OptionSet::build("", Width::FromArg, Precision::None, &[]),
            Err(vec![OptionError::BadWidth])
        );
    }

    #[test]
    fn test_bad_width_still_resolves_precision() {
        let args = [Arg::from("wide"), Arg::from(-2)];
        assert_eq!(
            OptionSet::build("", Width::FromArg, Precision::FromArg, &args),
            Err(vec![OptionError::BadWidth, OptionError::BadPrecision])
        );
        // The width argument is consumed even though it is unusable.
        let args = [Arg::from("wide"), Arg::from(4)];
        assert_eq!(
            OptionSet::build("", Width::FromArg, Precision::FromArg, &args),
            Err(vec![OptionError::BadWidth])
        );
    }

    #[test]
    fn test_oversized_literal_is_field_too_large() {
        assert_eq!(
            OptionSet::build("", Width::Fixed(2_000_000), Precision::Fixed(3_000_000), &[]),
            Err(vec![OptionError::FieldTooLarge, OptionError::FieldTooLarge])
        );
        assert_eq!(literal_field(1_000_000), Ok(1_000_000));
    }

    #[test]
    fn test_missing_arg_is_not_consumed() {
        let mut flags = Flags::default();
        let (width, next) = width_from_args(&mut flags, &[], 0);
        assert_eq!((width, next), (Err(OptionError::BadWidth), 0));
        let (precision, next) = precision_from_args(&[Arg::from(3)], 0);
        assert_eq!((precision, next), (Ok(3), 1));
    }

    #[test]
    fn test_too_large_is_rejected() {
        assert_eq!(int_from_arg(&Arg::from(1_000_001)), None);
        assert_eq!(int_from_arg(&Arg::from(-1_000_000)), Some(-1_000_000));
        assert_eq!(int_from_arg(&Arg::from(u64::MAX)), None);
    }

    #[test]
    fn test_error_fragments() {
        assert_eq!(OptionError::BadWidth.fragment(), Some("%!(BADWIDTH)"));
        assert_eq!(OptionError::BadPrecision.fragment(), Some("%!(BADPREC)"));
        assert_eq!(OptionError::FieldTooLarge.fragment(), Some("%!(NOVERB)"));
        assert_eq!(OptionError::UnknownFlag('x').fragment(), None);
    }

    #[test]
    fn test_value_verb_promotion() {
        let mut flags = Flags::parse("+#").unwrap();
        flags.promote_for_value_verb();
        assert!(!flags.force_sign && !flags.alt_form);
        let set = OptionSet::new(flags, None, None);
        // Still visible through the query surface.
        assert!(set.flag('+'));
        assert!(set.flag('#'));
    }
}

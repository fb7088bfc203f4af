//! # fmtverb-core
//!
//! A printf-style formatting engine with type-directed verbs and pluggable
//! custom renderers.
//!
//! Templates mix literal text with directives of the form
//! `%[flags][width][.precision]verb`. Each directive consumes one [`Arg`];
//! built-in categories render directly, and caller-defined operands
//! ([`Operand`]) may take over rendering through [`FullFormat`],
//! [`DisplayString`] or [`DebugString`]. Malformed templates and misbehaving
//! renderers never abort formatting: problems show up inline as `%!`
//! fragments.
//!
//! ```
//! use fmtverb_core::{args, sprintf};
//!
//! assert_eq!(sprintf("%-5s|%05.1f|%x", &args!["ab", 3.14159, 255]), "ab   |003.1|ff");
//! assert_eq!(sprintf("%d %d", &args![1]), "1 %!d(MISSING)");
//! ```
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod directive;
mod dispatch;
pub mod literals;
pub mod options;
pub mod printer;
pub mod quote;
mod render;
pub mod state;
pub mod value;

pub use buffer::Buffer;
pub use config::{ArgIndexPolicy, arg_index_policy};
pub use directive::format_string;
pub use options::{Flags, OptionError, OptionSet, Precision, Width};
pub use printer::{
    Printer, append_print, append_printf, append_println, fprint, fprintf, fprintln, print,
    printf, println, sprint, sprintf, sprintln,
};
pub use state::{Context, State};
pub use value::{
    Arg, DebugString, DisplayString, Field, FloatKind, FullFormat, IntKind, Operand, UintKind,
};

/// Build an argument array: `args![1, "two", 3.0]`.
///
/// Each element goes through [`Arg::from`]; pass custom operands as
/// `Arg::custom(&value)`.
#[macro_export]
macro_rules! args {
    () => {
        <[$crate::Arg<'static>; 0]>::default()
    };
    ($($arg:expr),+ $(,)?) => {
        [$($crate::Arg::from($arg)),+]
    };
}

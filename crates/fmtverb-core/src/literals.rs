//! Reserved output fragments.
//!
//! These strings are part of the output contract: diagnostics are reported
//! inline, and downstream tooling greps for them. Never reword them.

/// Separator between elements in syntax-form composites and `EXTRA` lists.
pub const COMMA_SPACE: &str = ", ";
/// Rendering of a nil operand in value position.
pub const NIL_ANGLE: &str = "<nil>";
/// Suffix after a type name when a nil composite is shown in syntax form.
pub const NIL_PAREN: &str = "(nil)";
/// Bare nil inside syntax-form pointers and nil elements.
pub const NIL: &str = "nil";
/// Opening of a map in value form.
pub const MAP_OPEN: &str = "map[";
/// Prefix of every per-verb diagnostic.
pub const PERCENT_BANG: &str = "%!";
/// A verb asked for an argument that was not supplied.
pub const MISSING: &str = "(MISSING)";
/// An explicit `%[n]` index was out of range or malformed.
pub const BAD_INDEX: &str = "(BADINDEX)";
/// Opens the fragment written when a custom renderer panics.
pub const PANIC: &str = "(PANIC=";
/// Opens the trailing list of unconsumed arguments.
pub const EXTRA: &str = "%!(EXTRA ";
/// A `*` width argument was not a usable integer.
pub const BAD_WIDTH: &str = "%!(BADWIDTH)";
/// A `.*` precision argument was not a usable non-negative integer.
pub const BAD_PREC: &str = "%!(BADPREC)";
/// The template ended inside a directive.
pub const NO_VERB: &str = "%!(NOVERB)";

//! Engine configuration.
//!
//! The process-wide argument-index policy is set via the `FMTVERB_ARG_INDEX`
//! environment variable:
//! - `resume` (default): an explicit `%[n]` index moves the sequential
//!   argument cursor, so the next plain directive consumes argument `n+1`.
//! - `detached`: an explicit index applies to its own directive only; the
//!   sequential cursor continues where it was.
//!
//! A [`Printer`](crate::Printer) may override the process default with
//! [`Printer::with_policy`](crate::Printer::with_policy).

use std::sync::OnceLock;

/// Environment variable holding the default [`ArgIndexPolicy`].
pub const ARG_INDEX_ENV: &str = "FMTVERB_ARG_INDEX";

/// Largest width or precision accepted, literal or from an argument.
pub const MAX_FIELD: usize = 1_000_000;

/// How explicit argument indexes interact with sequential consumption.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgIndexPolicy {
    /// `%[n]` repositions the cursor; later directives continue from `n+1`.
    #[default]
    Resume,
    /// `%[n]` is scoped to its directive; the cursor is restored afterwards.
    Detached,
}

impl ArgIndexPolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// [`ArgIndexPolicy::Resume`].
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "detached" | "scoped" | "isolated" => Self::Detached,
            _ => Self::Resume,
        }
    }

    /// Parse from string, rejecting unknown values.
    #[must_use]
    pub fn from_str_strict(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resume" | "default" | "sequential" => Some(Self::Resume),
            "detached" | "scoped" | "isolated" => Some(Self::Detached),
            _ => None,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Detached => "detached",
        }
    }
}

static GLOBAL_POLICY: OnceLock<ArgIndexPolicy> = OnceLock::new();

/// Get the configured policy (reads the env var on first call, caches thereafter).
#[must_use]
pub fn arg_index_policy() -> ArgIndexPolicy {
    *GLOBAL_POLICY.get_or_init(|| {
        std::env::var(ARG_INDEX_ENV)
            .map(|v| ArgIndexPolicy::from_str_loose(&v))
            .unwrap_or_default()
    })
}

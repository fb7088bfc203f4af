//! Conformance testing harness for fmtverb.
//!
//! This crate provides:
//! - Fixtures: JSON descriptions of templates, arguments and expected output
//! - Operands: custom operands fixtures can build (display, echo, panicking)
//! - Runner: executes fixture sets under an argument-index policy
//! - Structured logging: one JSONL record per executed case
//! - Report generation: markdown + JSON with fixture digests

#![forbid(unsafe_code)]

pub mod diff;
pub mod error;
pub mod fixtures;
pub mod operands;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use operands::FixtureArg;
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};

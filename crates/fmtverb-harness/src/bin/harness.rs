//! CLI entrypoint for the fmtverb conformance harness.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fmtverb_core::{ArgIndexPolicy, OptionSet, Precision, Printer, Width};
use fmtverb_harness::fixtures::fixture_paths;
use fmtverb_harness::operands::{OptionProbe, to_args};
use fmtverb_harness::report::FixtureDigest;
use fmtverb_harness::structured_log::{LogEmitter, LogLevel, now_utc};
use fmtverb_harness::{
    ConformanceReport, FixtureArg, FixtureSet, HarnessError, TestRunner, VerificationSummary,
};

/// Conformance tooling for fmtverb.
#[derive(Debug, Parser)]
#[command(name = "fmtverb-harness")]
#[command(about = "Conformance testing harness for the fmtverb printf engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the engine against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Argument-index policy to run under (`resume`, `detached` or `both`).
        #[arg(long, default_value = "both")]
        policy: String,
        /// Output report path (markdown); a `.json` sibling is written too.
        #[arg(long)]
        report: Option<PathBuf>,
        /// JSONL log path, one record per executed case.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Format one template and print the result.
    Render {
        /// Template text.
        template: String,
        /// Arguments as a JSON array of fixture arguments.
        #[arg(long, default_value = "[]")]
        args: String,
        /// Argument-index policy (`resume` or `detached`).
        #[arg(long, default_value = "resume")]
        policy: String,
    },
    /// Reconstruct the directive text for a set of options.
    Directive {
        /// Flag characters, any order (from ` +-#0`).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        flags: String,
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        precision: Option<usize>,
        /// Verb character.
        #[arg(long, default_value_t = 'v')]
        verb: char,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            policy,
            report,
            log,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let policies = parse_policies(&policy)?;

            let mut fixture_sets = Vec::new();
            let mut digests = Vec::new();
            for path in fixture_paths(&fixture)? {
                match FixtureSet::from_file(&path) {
                    Ok(set) => {
                        digests.push(FixtureDigest::of_file(&path)?);
                        fixture_sets.push(set);
                    }
                    Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                }
            }
            if fixture_sets.is_empty() {
                return Err(HarnessError::NoFixtures(fixture).into());
            }

            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, &run_id())?),
                None => None,
            };
            if let Some(emitter) = emitter.as_mut() {
                emitter.emit(LogLevel::Info, "run_start")?;
            }

            let mut results = Vec::new();
            for policy in &policies {
                let runner = TestRunner::new("fixture-verify", *policy);
                for set in &fixture_sets {
                    match emitter.as_mut() {
                        Some(emitter) => results.extend(runner.run_logged(set, emitter)?),
                        None => results.extend(runner.run(set)),
                    }
                }
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("fmtverb Conformance Report"),
                policy: policies
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join("+"),
                timestamp: now_utc(),
                fixtures: digests,
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failure in report_doc.summary.failures() {
                eprintln!("FAIL {} [{}]", failure.case_name, failure.policy);
                if let Some(diff) = &failure.diff {
                    eprint!("{diff}");
                }
            }

            if let Some(mut emitter) = emitter {
                emitter.emit(LogLevel::Info, "run_end")?;
                emitter.flush()?;
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(&report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;
            }

            if !report_doc.summary.all_passed() {
                return Err(HarnessError::Failed {
                    failed: report_doc.summary.failed,
                    total: report_doc.summary.total,
                }
                .into());
            }
        }
        Command::Render {
            template,
            args,
            policy,
        } => {
            let policy = ArgIndexPolicy::from_str_strict(&policy)
                .ok_or_else(|| HarnessError::UnknownPolicy(policy.clone()))?;
            let fixture_args: Vec<FixtureArg> = serde_json::from_str(&args)?;
            let args = to_args(&fixture_args);
            let mut printer = Printer::with_policy(policy);
            printer.printf(&template, &args);

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(printer.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
        Command::Directive {
            flags,
            width,
            precision,
            verb,
        } => {
            let width = width.map_or(Width::None, Width::Fixed);
            let precision = precision.map_or(Precision::None, Precision::Fixed);
            let options = OptionSet::build(&flags, width, precision, &[])
                .map_err(HarnessError::Options)?;
            println!("{}", OptionProbe::new(options).directive(verb));
        }
    }

    Ok(())
}

fn parse_policies(raw: &str) -> Result<Vec<ArgIndexPolicy>, HarnessError> {
    if raw.trim().eq_ignore_ascii_case("both") {
        return Ok(vec![ArgIndexPolicy::Resume, ArgIndexPolicy::Detached]);
    }
    ArgIndexPolicy::from_str_strict(raw)
        .map(|p| vec![p])
        .ok_or_else(|| HarnessError::UnknownPolicy(raw.to_string()))
}

fn run_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("run-{secs}")
}

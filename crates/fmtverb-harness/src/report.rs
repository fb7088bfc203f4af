//! Report generation for conformance results.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;
use crate::verify::VerificationSummary;

/// A fixture file the report was produced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDigest {
    pub path: String,
    pub sha256: String,
}

impl FixtureDigest {
    /// Hash the file at `path`.
    pub fn of_file(path: &Path) -> Result<Self, HarnessError> {
        let data = std::fs::read(path)?;
        Ok(Self {
            path: path.display().to_string(),
            sha256: sha256_hex(&data),
        })
    }
}

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// A conformance report over one or more policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Policies exercised, e.g. `resume+detached`.
    pub policy: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Fixture files and their digests.
    pub fixtures: Vec<FixtureDigest>,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "- Policy: {}", self.policy);
        let _ = writeln!(out, "- Timestamp: {}", self.timestamp);
        let _ = writeln!(out, "- Total: {}", self.summary.total);
        let _ = writeln!(out, "- Passed: {}", self.summary.passed);
        let _ = writeln!(out, "- Failed: {}\n", self.summary.failed);

        if !self.fixtures.is_empty() {
            out.push_str("## Fixtures\n\n");
            for f in &self.fixtures {
                let _ = writeln!(out, "- `{}` sha256:{}", f.path, f.sha256);
            }
            out.push('\n');
        }

        out.push_str("| Case | Section | Policy | Status |\n");
        out.push_str("|------|---------|--------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                r.case_name, r.section, r.policy, status
            );
        }

        let mut failures = self.summary.failures().peekable();
        if failures.peek().is_some() {
            out.push_str("\n## Failures\n");
            for r in failures {
                let _ = writeln!(out, "\n### {} ({})\n", r.case_name, r.policy);
                out.push_str("```diff\n");
                out.push_str(r.diff.as_deref().unwrap_or_default());
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    fn report(passed: bool) -> ConformanceReport {
        let result = VerificationResult {
            case_name: String::from("pad"),
            section: String::from("integer"),
            policy: String::from("resume"),
            passed,
            expected: String::from("007"),
            actual: String::from(if passed { "007" } else { "7" }),
            diff: (!passed).then(|| crate::diff::render_diff("007", "7")),
        };
        ConformanceReport {
            title: String::from("fmtverb conformance"),
            policy: String::from("resume"),
            timestamp: String::from("2026-10-19T00:00:00.000Z"),
            fixtures: vec![FixtureDigest {
                path: String::from("fixtures/integer.json"),
                sha256: sha256_hex(b""),
            }],
            summary: VerificationSummary::from_results(vec![result]),
        }
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn markdown_lists_cases_and_fixtures() {
        let md = report(true).to_markdown();
        assert!(md.starts_with("# fmtverb conformance\n"));
        assert!(md.contains("| pad | integer | resume | PASS |"));
        assert!(md.contains("sha256:e3b0c442"));
        assert!(!md.contains("## Failures"));
    }

    #[test]
    fn markdown_shows_failure_diffs() {
        let md = report(false).to_markdown();
        assert!(md.contains("| pad | integer | resume | FAIL |"));
        assert!(md.contains("### pad (resume)"));
        assert!(md.contains("-\"007\""));
    }

    #[test]
    fn json_round_trips_summary() {
        let json = report(true).to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["summary"]["total"], 1);
        assert_eq!(parsed["fixtures"][0]["path"], "fixtures/integer.json");
    }
}

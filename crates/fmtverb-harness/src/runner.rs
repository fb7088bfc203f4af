//! Test execution engine.

use std::io::Write;
use std::time::Instant;

use fmtverb_core::{ArgIndexPolicy, Printer};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::operands::to_args;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::VerificationResult;

/// Runs fixture sets under one argument-index policy.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Policy the engine runs with.
    pub policy: ArgIndexPolicy,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>, policy: ArgIndexPolicy) -> Self {
        Self {
            campaign: campaign.into(),
            policy,
        }
    }

    /// Run all applicable fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| policy_matches(self.policy, &case.policy))
            .map(|case| self.verify_case(case))
            .collect()
    }

    /// Like [`run`](Self::run), also writing one log record per case.
    pub fn run_logged<W: Write>(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter<W>,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mut results = Vec::new();
        for case in &fixture_set.cases {
            if !policy_matches(self.policy, &case.policy) {
                continue;
            }
            let start = Instant::now();
            let result = self.verify_case(case);
            let latency = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, "case_result")
                .with_campaign(&self.campaign)
                .with_policy(self.policy.as_str())
                .with_case(&fixture_set.family, &case.name)
                .with_template(&case.template)
                .with_outcome(outcome)
                .with_latency_ns(latency);
            if !result.passed {
                entry = entry.with_details(serde_json::json!({
                    "expected": result.expected,
                    "actual": result.actual,
                }));
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }

    /// Render one case with this runner's policy.
    #[must_use]
    pub fn render(&self, case: &FixtureCase) -> String {
        let args = to_args(&case.args);
        let mut printer = Printer::with_policy(self.policy);
        printer.printf(&case.template, &args);
        printer.into_string()
    }

    fn verify_case(&self, case: &FixtureCase) -> VerificationResult {
        let actual = self.render(case);
        let passed = actual == case.expected_output;
        let diff = (!passed).then(|| diff::render_diff(&case.expected_output, &actual));
        VerificationResult {
            case_name: case.name.clone(),
            section: case.section.clone(),
            policy: self.policy.as_str().to_string(),
            passed,
            expected: case.expected_output.clone(),
            actual,
            diff,
        }
    }
}

fn policy_matches(active: ArgIndexPolicy, case_policy: &str) -> bool {
    let case = case_policy.trim().to_ascii_lowercase();
    case == "both" || ArgIndexPolicy::from_str_strict(&case) == Some(active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_log::validate_log_line;

    fn fixture() -> FixtureSet {
        FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"index",
                "captured_at":"2026-10-01T00:00:00Z",
                "cases":[
                    {"name":"resume_cursor","section":"arg-index","template":"%[2]d %d","args":[{"kind":"i32","value":1},{"kind":"i32","value":2},{"kind":"i32","value":3}],"expected_output":"2 3","policy":"resume"},
                    {"name":"detached_cursor","section":"arg-index","template":"%[2]d %d","args":[{"kind":"i32","value":1},{"kind":"i32","value":2},{"kind":"i32","value":3}],"expected_output":"2 1","policy":"detached"},
                    {"name":"plain","section":"integer","template":"%03d","args":[{"kind":"i32","value":7}],"expected_output":"007"}
                ]
            }"#,
        )
        .expect("valid fixture json")
    }

    #[test]
    fn resume_runner_executes_matching_cases() {
        let results = TestRunner::new("smoke", ArgIndexPolicy::Resume).run(&fixture());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert!(results.iter().all(|r| r.policy == "resume"));
    }

    #[test]
    fn detached_runner_executes_matching_cases() {
        let results = TestRunner::new("smoke", ArgIndexPolicy::Detached).run(&fixture());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert_eq!(results[0].case_name, "detached_cursor");
    }

    #[test]
    fn failing_case_carries_diff() {
        let mut set = fixture();
        set.cases[2].expected_output = String::from("7");
        let results = TestRunner::new("smoke", ArgIndexPolicy::Resume).run(&set);
        let failed = results.iter().find(|r| !r.passed).expect("one failure");
        assert_eq!(failed.actual, "007");
        assert!(failed.diff.as_deref().unwrap_or_default().contains("@@ line 1, col 1 @@"));
    }

    #[test]
    fn logged_run_emits_one_valid_record_per_case() {
        let mut log = LogEmitter::to_buffer("t");
        let results = TestRunner::new("smoke", ArgIndexPolicy::Resume)
            .run_logged(&fixture(), &mut log)
            .unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), results.len());
        for (i, line) in lines.iter().enumerate() {
            let entry = validate_log_line(line, i + 1).expect("valid record");
            assert_eq!(entry.outcome, Some(Outcome::Pass));
            assert_eq!(entry.policy.as_deref(), Some("resume"));
        }
    }
}

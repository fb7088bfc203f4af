//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
///
/// Each differing line is reported with the first differing column
/// (counted in characters, 1-based). Lines present on only one side are
/// reported against an empty counterpart.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let rows = expected_lines.len().max(actual_lines.len());
    for i in 0..rows {
        let e = expected_lines.get(i).copied().unwrap_or_default();
        let a = actual_lines.get(i).copied().unwrap_or_default();
        if e != a {
            let col = e
                .chars()
                .zip(a.chars())
                .take_while(|(x, y)| x == y)
                .count()
                + 1;
            out.push_str(&format!("@@ line {}, col {col} @@\n", i + 1));
            out.push_str(&format!("-{e:?}\n"));
            out.push_str(&format!("+{a:?}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs() {
        assert_eq!(render_diff("a", "a"), "[identical]");
    }

    #[test]
    fn reports_first_differing_column() {
        let diff = render_diff("%!d(MISSING)", "%!d(BADINDEX)");
        assert!(diff.contains("@@ line 1, col 5 @@"), "{diff}");
        assert!(diff.contains("-\"%!d(MISSING)\""));
        assert!(diff.contains("+\"%!d(BADINDEX)\""));
    }

    #[test]
    fn reports_extra_lines() {
        let diff = render_diff("a", "a\nb");
        assert!(diff.contains("@@ line 2, col 1 @@"), "{diff}");
        assert!(diff.contains("+\"b\""));
    }
}

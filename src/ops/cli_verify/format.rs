//! Output formatting for verifier reports (human/JSON).

use std::fmt::Write as _;

use super::types::{CheckStatus, CliCheckResult, CliReport};

const DASH: char = '\u{2500}';

/// Width the tool name is padded to in the human table.
const TOOL_COLUMN: usize = 10;

/// Format a report as the fixed human-readable table.
pub fn format_report(report: &CliReport) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "\n{} CLI Test {}",
        DASH.to_string().repeat(5),
        DASH.to_string().repeat(17)
    )
    .unwrap();

    for check in &report.checks {
        writeln!(output, "{}", format_check(check)).unwrap();
    }
    writeln!(output).unwrap();

    let description = &report.description;
    if description.matches() {
        writeln!(output, "{}\n", description.expected).unwrap();
    } else {
        let reported = description.reported.as_deref().unwrap_or("<no output>");
        writeln!(
            output,
            "'{}' doesn't match the runtime description",
            description.command
        )
        .unwrap();
        writeln!(output, "{}  ({})", reported, description.command).unwrap();
        writeln!(output, "{}  (description)\n", description.expected).unwrap();
    }

    if !report.passed() {
        writeln!(output, "bad exit").unwrap();
    }

    output
}

/// One table row: padded tool name, mark, detail.
pub fn format_check(check: &CliCheckResult) -> String {
    let detail = match &check.status {
        CheckStatus::Ok => check.version.clone().unwrap_or_default(),
        CheckStatus::VersionMismatch => "version?".to_string(),
        CheckStatus::MissingBinary => "missing binstub".to_string(),
        CheckStatus::MissingPlatformLauncher => "missing windows binstub".to_string(),
        CheckStatus::ExecutionError(err) => err.clone(),
    };
    let mark = if check.status.is_ok() { '✅' } else { '❌' };
    format!(
        "{:<width$}{}   {}",
        check.tool,
        mark,
        detail,
        width = TOOL_COLUMN
    )
}

/// Format a report as JSON.
pub fn format_report_json(report: &CliReport) -> String {
    let value = serde_json::json!({
        "passed": report.passed(),
        "errors": report.error_count(),
        "checks": report.checks,
        "description": {
            "command": report.description.command,
            "reported": report.description.reported,
            "expected": report.description.expected,
            "matches": report.description.matches(),
        },
    });
    serde_json::to_string_pretty(&value)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize report: {}"}}"#, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::cli_verify::types::DescriptionCheck;

    fn report(checks: Vec<CliCheckResult>, reported: &str) -> CliReport {
        CliReport {
            checks,
            description: DescriptionCheck {
                command: "ruby -v".to_string(),
                reported: Some(reported.to_string()),
                expected: "ruby 3.3.1 (2024-04-23) [x86_64-linux]".to_string(),
            },
        }
    }

    #[test]
    fn test_rows_are_padded() {
        let ok = CliCheckResult::ok("rake", Some("13.0.6".to_string()));
        assert_eq!(format_check(&ok), "rake      ✅   13.0.6");

        let missing = CliCheckResult::new("test-unit", CheckStatus::MissingBinary);
        assert_eq!(format_check(&missing), "test-unit ❌   missing binstub");

        let launcher = CliCheckResult::new("gem", CheckStatus::MissingPlatformLauncher);
        assert_eq!(format_check(&launcher), "gem       ❌   missing windows binstub");
    }

    #[test]
    fn test_passing_report() {
        let out = format_report(&report(
            vec![CliCheckResult::ok("gem", Some("3.5.9".to_string()))],
            "ruby 3.3.1 (2024-04-23) [x86_64-linux]",
        ));
        assert!(out.starts_with("\n───── CLI Test ─────────────────\n"));
        assert!(out.contains("gem       ✅   3.5.9\n"));
        assert!(out.contains("ruby 3.3.1 (2024-04-23) [x86_64-linux]\n"));
        assert!(!out.contains("bad exit"));
    }

    #[test]
    fn test_description_mismatch_prints_both() {
        let out = format_report(&report(vec![], "ruby 3.3.0 (2023-12-25) [x86_64-linux]"));
        assert!(out.contains("ruby 3.3.0 (2023-12-25) [x86_64-linux]  (ruby -v)"));
        assert!(out.contains("ruby 3.3.1 (2024-04-23) [x86_64-linux]  (description)"));
        assert!(out.trim_end().ends_with("bad exit"));
    }

    #[test]
    fn test_json_report() {
        let out = format_report_json(&report(
            vec![CliCheckResult::new("rbs", CheckStatus::VersionMismatch)],
            "ruby 3.3.1 (2024-04-23) [x86_64-linux]",
        ));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["errors"], 1);
        assert_eq!(value["checks"][0]["status"], "version-mismatch");
        assert_eq!(value["description"]["matches"], true);
    }
}

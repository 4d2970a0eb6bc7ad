//! Output formatting for validation reports (human/JSON/GitHub).

use super::types::{OutputFormat, ValidationReport};
use crate::util::diagnostic::Severity;

/// Format a report for display (human-readable).
pub fn format_report(report: &ValidationReport, color: bool) -> String {
    let mut output = String::new();

    for finding in &report.findings {
        output.push_str(&finding.to_diagnostic(Some(&report.manifest)).format(color));
        output.push('\n');
    }

    let status = if report.passed { "PASSED" } else { "FAILED" };
    output.push_str(&format!(
        "{}: {} ({} errors, {} warnings)\n",
        report.bundle.as_deref().unwrap_or("bundle"),
        status,
        report.count(Severity::Error),
        report.count(Severity::Warning)
    ));

    output
}

/// Format a report as JSON.
pub fn format_report_json(report: &ValidationReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize report: {}"}}"#, e))
}

/// Format a report as GitHub Actions annotations.
pub fn format_report_github_actions(report: &ValidationReport) -> String {
    let mut output = String::new();
    let file = report.manifest.display();

    for finding in &report.findings {
        let level = match finding.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        };
        let escaped = finding.message.replace('\n', "%0A").replace('\r', "");
        match finding.line {
            Some(line) => output.push_str(&format!(
                "::{} file={},line={},title={}::{}\n",
                level, file, line, finding.kind, escaped
            )),
            None => output.push_str(&format!(
                "::{} file={},title={}::{}\n",
                level, file, finding.kind, escaped
            )),
        }
    }

    output.push_str("::group::Validation Summary\n\n");
    output.push_str(&format!(
        "## {}\n\n",
        report.bundle.as_deref().unwrap_or("bundle")
    ));

    if !report.findings.is_empty() {
        output.push_str("| Severity | Kind | Header | Message |\n");
        output.push_str("|----------|------|--------|---------|\n");
        for finding in &report.findings {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                finding.severity,
                finding.kind,
                finding.attribute.as_deref().unwrap_or("-"),
                finding.message.replace('|', "\\|")
            ));
        }
        output.push('\n');
    }

    let (status, emoji) = if report.passed {
        ("PASSED", ":heavy_check_mark:")
    } else {
        ("FAILED", ":x:")
    };
    output.push_str(&format!("**Result:** {} {}\n", emoji, status));
    output.push_str("::endgroup::\n");

    output
}

/// Format a report according to the output format.
pub fn format_report_for_output(
    report: &ValidationReport,
    format: OutputFormat,
    color: bool,
) -> String {
    match format {
        OutputFormat::Human => format_report(report, color),
        OutputFormat::Json => format_report_json(report),
        OutputFormat::Github => format_report_github_actions(report),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ops::validate::types::{Finding, FindingKind};

    fn report() -> ValidationReport {
        ValidationReport::new(
            Some("com.acme".to_string()),
            PathBuf::from("META-INF/MANIFEST.MF"),
            vec![
                Finding::error(FindingKind::MissingImport, "package `com.other.lib` is used but not imported")
                    .at("Import-Package", Some(6)),
                Finding::warning(FindingKind::UnusedImport, "imported package `com.acme.util` is not used")
                    .at("Import-Package", Some(6)),
            ],
        )
    }

    #[test]
    fn test_human_output() {
        let output = format_report(&report(), false);

        assert!(output.contains("error: package `com.other.lib` is used but not imported"));
        assert!(output.contains("--> META-INF/MANIFEST.MF:6"));
        assert!(output.contains("com.acme: FAILED (1 errors, 1 warnings)"));
    }

    #[test]
    fn test_json_output() {
        let json: serde_json::Value =
            serde_json::from_str(&format_report_json(&report())).unwrap();

        assert_eq!(json["bundle"], "com.acme");
        assert_eq!(json["passed"], false);
        assert_eq!(json["findings"][0]["kind"], "missing-import");
        assert_eq!(json["findings"][1]["severity"], "warning");
        assert_eq!(json["findings"][1]["line"], 6);
    }

    #[test]
    fn test_github_output() {
        let output = format_report_for_output(&report(), OutputFormat::Github, false);

        assert!(output.contains(
            "::error file=META-INF/MANIFEST.MF,line=6,title=missing-import::package `com.other.lib`"
        ));
        assert!(output.contains("::warning file=META-INF/MANIFEST.MF,line=6,title=unused-import::"));
        assert!(output.contains("**Result:** :x: FAILED"));
    }
}

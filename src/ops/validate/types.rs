//! Public types for the validate module.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::util::diagnostic::{suggestions, Diagnostic, Severity};

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A package clause has no package name; the rest of the header is still checked.
    MalformedClause,
    /// A package's `version` attribute does not parse.
    MalformedVersion,
    /// A check could not interpret its input, or the manifest is unreadable.
    MalformedValue,
    MissingActivator,
    InvalidName,
    InvalidVersion,
    MissingSymbolicName,
    InvalidSymbolicName,
    MalformedUrl,
    UnknownExecutionEnvironment,
    DanglingClasspathEntry,
    InvalidExport,
    InvalidDynamicImport,
    MissingImport,
    UnusedImport,
    /// No catalog entry satisfies an import.
    UnresolvedImport,
}

impl FindingKind {
    /// Stable identifier used in machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::MalformedClause => "malformed-clause",
            FindingKind::MalformedVersion => "malformed-version",
            FindingKind::MalformedValue => "malformed-value",
            FindingKind::MissingActivator => "missing-activator",
            FindingKind::InvalidName => "invalid-name",
            FindingKind::InvalidVersion => "invalid-version",
            FindingKind::MissingSymbolicName => "missing-symbolic-name",
            FindingKind::InvalidSymbolicName => "invalid-symbolic-name",
            FindingKind::MalformedUrl => "malformed-url",
            FindingKind::UnknownExecutionEnvironment => "unknown-execution-environment",
            FindingKind::DanglingClasspathEntry => "dangling-classpath-entry",
            FindingKind::InvalidExport => "invalid-export",
            FindingKind::InvalidDynamicImport => "invalid-dynamic-import",
            FindingKind::MissingImport => "missing-import",
            FindingKind::UnusedImport => "unused-import",
            FindingKind::UnresolvedImport => "unresolved-import",
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            FindingKind::MissingImport => Some(suggestions::MISSING_IMPORT),
            FindingKind::UnusedImport => Some(suggestions::UNUSED_IMPORT),
            FindingKind::UnresolvedImport => Some(suggestions::UNRESOLVED_IMPORT),
            FindingKind::MissingActivator => Some(suggestions::MISSING_ACTIVATOR),
            FindingKind::UnknownExecutionEnvironment => {
                Some(suggestions::UNKNOWN_EXECUTION_ENVIRONMENT)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Manifest header the finding is attached to
    pub attribute: Option<String>,
    pub message: String,
    /// 1-based line of the header in the manifest
    pub line: Option<usize>,
}

impl Finding {
    /// Create a finding.
    pub fn new(kind: FindingKind, severity: Severity, message: impl Into<String>) -> Self {
        Finding {
            kind,
            severity,
            attribute: None,
            message: message.into(),
            line: None,
        }
    }

    /// Create an error finding.
    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    /// Create a warning finding.
    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    /// Attach the finding to a manifest header.
    pub fn at(mut self, attribute: &str, line: Option<usize>) -> Self {
        self.attribute = Some(attribute.to_string());
        self.line = line;
        self
    }

    /// Check if this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert to a terminal diagnostic.
    pub fn to_diagnostic(&self, manifest: Option<&std::path::Path>) -> Diagnostic {
        let mut diag = Diagnostic::new(self.severity, self.message.clone()).with_line(self.line);
        if let Some(path) = manifest {
            diag = diag.with_location(path);
        }
        if let Some(attribute) = &self.attribute {
            diag = diag.with_context(format!("in {} [{}]", attribute, self.kind));
        }
        if let Some(suggestion) = self.kind.suggestion() {
            diag = diag.with_suggestion(suggestion);
        }
        diag
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", line, self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Where a validation pass is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    Input,
    Parsed,
    Checked,
    Reported,
}

impl fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationPhase::Input => write!(f, "input"),
            ValidationPhase::Parsed => write!(f, "parsed"),
            ValidationPhase::Checked => write!(f, "checked"),
            ValidationPhase::Reported => write!(f, "reported"),
        }
    }
}

/// Output format for validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
    /// GitHub Actions annotations
    Github,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "github" | "github-actions" | "gha" => Ok(OutputFormat::Github),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid output format '{}', valid values: human, json, github",
            self.0
        )
    }
}

impl std::error::Error for OutputFormatParseError {}

/// Result of validating one bundle project.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Bundle symbolic name, if declared
    pub bundle: Option<String>,

    /// Manifest that was validated
    pub manifest: PathBuf,

    /// All findings, errors first
    pub findings: Vec<Finding>,

    /// Whether no error-severity finding was produced
    pub passed: bool,
}

impl ValidationReport {
    /// Create a report from findings.
    pub fn new(bundle: Option<String>, manifest: PathBuf, findings: Vec<Finding>) -> Self {
        let passed = !findings.iter().any(Finding::is_error);
        ValidationReport {
            bundle,
            manifest,
            findings,
            passed,
        }
    }

    /// Number of findings with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}

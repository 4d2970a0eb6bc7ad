//! Parse-level errors for manifest headers.
//!
//! These never escape a validation pass: callers recover locally by falling
//! back to a safe default (an empty attribute set, version `0.0.0`).

use miette::Diagnostic;
use thiserror::Error;

/// Error while parsing a manifest header value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ManifestError {
    #[error("malformed clause `{clause}`: missing package name")]
    #[diagnostic(
        code(bndkit::manifest::malformed_clause),
        help("A clause starts with a package name, e.g. `com.acme.api;version=1.0`")
    )]
    MalformedClause { clause: String },

    #[error("malformed version `{value}`: {reason}")]
    #[diagnostic(
        code(bndkit::manifest::malformed_version),
        help("Versions look like `major[.minor[.micro[.qualifier]]]`, ranges like `[1.0,2.0)`")
    )]
    MalformedVersion { value: String, reason: String },
}

impl ManifestError {
    pub(crate) fn version(value: &str, reason: impl Into<String>) -> Self {
        ManifestError::MalformedVersion {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

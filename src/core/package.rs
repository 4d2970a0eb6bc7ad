//! Package descriptors - one package clause of an import or export header.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::core::errors::ManifestError;
use crate::core::header::{split_clauses, split_unquoted};
use crate::core::version::{Version, VersionRange};

/// Attribute carrying the package version (OSGi R4 and later).
pub const VERSION_ATTRIBUTE: &str = "version";

/// Legacy attribute carrying the package version (OSGi R3).
pub const SPECIFICATION_VERSION_ATTRIBUTE: &str = "specification-version";

/// Directive marking an import as optional.
pub const RESOLUTION_DIRECTIVE: &str = "resolution";

/// A package name with its attributes and directives.
///
/// Equality and hashing only consider the name and the attributes.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDescriptor {
    name: String,
    attributes: BTreeMap<String, String>,
    directives: BTreeMap<String, String>,
}

impl PackageDescriptor {
    /// Create a descriptor with an optional specification version.
    pub fn new(name: impl Into<String>, version: Option<&str>) -> Self {
        let mut descriptor = PackageDescriptor {
            name: name.into(),
            attributes: BTreeMap::new(),
            directives: BTreeMap::new(),
        };
        if let Some(version) = version {
            descriptor
                .attributes
                .insert(SPECIFICATION_VERSION_ATTRIBUTE.to_string(), version.to_string());
        }
        descriptor
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a directive.
    pub fn with_directive(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.directives.insert(key.into(), value.into());
        self
    }

    /// Parse a single clause such as `com.acme.api;version="[1.0,2.0)"`.
    ///
    /// Only the leading package name is kept when a clause lists several
    /// packages; use [`parse_header`] to expand such groups.
    pub fn parse(clause: &str) -> Result<Self, ManifestError> {
        parse_group(clause)?
            .into_iter()
            .next()
            .ok_or_else(|| ManifestError::MalformedClause {
                clause: clause.to_string(),
            })
    }

    /// The package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// All directives.
    pub fn directives(&self) -> &BTreeMap<String, String> {
        &self.directives
    }

    /// Look up an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The declared version: `version`, or `specification-version` when absent.
    pub fn specification_version(&self) -> Option<&str> {
        self.attribute(VERSION_ATTRIBUTE)
            .or_else(|| self.attribute(SPECIFICATION_VERSION_ATTRIBUTE))
    }

    /// The declared version as an exporter would read it.
    pub fn version(&self) -> Version {
        self.specification_version()
            .map(Version::parse_or_zero)
            .unwrap_or(Version::ZERO)
    }

    /// The declared version as an importer would read it.
    pub fn version_range(&self) -> VersionRange {
        self.specification_version()
            .map(VersionRange::parse_or_any)
            .unwrap_or_default()
    }

    /// Whether the import carries `resolution:=optional`.
    pub fn is_optional(&self) -> bool {
        self.directives
            .get(RESOLUTION_DIRECTIVE)
            .is_some_and(|v| v.eq_ignore_ascii_case("optional"))
    }

    /// Check whether this (exported) package satisfies `other` (an import).
    pub fn is_compatible(&self, other: &PackageDescriptor) -> bool {
        if self.name != other.name {
            return false;
        }
        if other.specification_version().is_none() {
            return true;
        }
        if self.specification_version().is_none() {
            return false;
        }
        other.version_range().contains(&self.version())
    }
}

impl PartialEq for PackageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.attributes == other.attributes
    }
}

impl Eq for PackageDescriptor {}

impl Hash for PackageDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.attributes.hash(state);
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, ";{}={}", key, quote_if_needed(value))?;
        }
        for (key, value) in &self.directives {
            write!(f, ";{}:={}", key, quote_if_needed(value))?;
        }
        Ok(())
    }
}

fn quote_if_needed(value: &str) -> String {
    if value.contains([',', ';', '=', ' ']) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

/// Parse one clause, expanding `a;b;version=1` into one descriptor per package.
fn parse_group(clause: &str) -> Result<Vec<PackageDescriptor>, ManifestError> {
    let segments = split_unquoted(clause, ';');
    // split_unquoted drops empty pieces, so check the raw leading token
    let leading = clause.split(';').next().unwrap_or("").trim();
    if leading.is_empty() || leading.contains('=') {
        return Err(ManifestError::MalformedClause {
            clause: clause.to_string(),
        });
    }

    let mut names = Vec::new();
    let mut attributes = BTreeMap::new();
    let mut directives = BTreeMap::new();

    for segment in segments {
        if let Some((key, value)) = segment.split_once(":=") {
            directives.insert(key.trim().to_string(), unquote(value));
        } else if let Some((key, value)) = segment.split_once('=') {
            attributes.insert(key.trim().to_string(), unquote(value));
        } else if attributes.is_empty() && directives.is_empty() {
            names.push(segment);
        } else {
            tracing::debug!("ignoring stray segment `{}` in clause `{}`", segment, clause);
        }
    }

    Ok(names
        .into_iter()
        .map(|name| PackageDescriptor {
            name,
            attributes: attributes.clone(),
            directives: directives.clone(),
        })
        .collect())
}

/// Parse a whole header value into descriptors.
///
/// Malformed clauses are skipped; duplicates keep their first occurrence.
pub fn parse_header(value: &str) -> Vec<PackageDescriptor> {
    let (descriptors, errors) = parse_header_recovering(value);
    for e in errors {
        tracing::debug!("{}", e);
    }
    descriptors
}

/// Parse a header value, keeping every well-formed clause.
///
/// Malformed clauses are skipped and returned alongside the descriptors so
/// callers can report them without losing the rest of the header.
pub fn parse_header_recovering(value: &str) -> (Vec<PackageDescriptor>, Vec<ManifestError>) {
    let mut descriptors: Vec<PackageDescriptor> = Vec::new();
    let mut errors = Vec::new();

    for clause in split_clauses(value) {
        match parse_group(&clause) {
            Ok(group) => {
                for descriptor in group {
                    if !descriptors.contains(&descriptor) {
                        descriptors.push(descriptor);
                    }
                }
            }
            Err(e) => errors.push(e),
        }
    }

    (descriptors, errors)
}

/// Render descriptors back into a header value.
pub fn render_header(descriptors: &[PackageDescriptor]) -> String {
    descriptors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

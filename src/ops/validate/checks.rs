//! Individual manifest checks.
//!
//! Each check looks at one aspect of the manifest and returns its findings.
//! A check returns `Err` only when it cannot interpret its input; the caller
//! turns that into a single `MalformedValue` finding and carries on.
//! Package-list headers are parsed clause by clause: a malformed clause is
//! reported as `MalformedClause` and the check runs over the rest.

use std::collections::BTreeSet;

use url::Url;

use crate::core::manifest::{headers, ROOT_CLASSPATH_ENTRY};
use crate::core::package::{parse_header, parse_header_recovering};
use crate::core::{ManifestError, ManifestModel, PackageDescriptor, Version, VersionRange};
use crate::ops::validate::index::{PackagedResources, TypeIndex};
use crate::ops::validate::types::{Finding, FindingKind};
use crate::resolver::BundleCatalog;

/// Everything a check may look at.
pub struct CheckContext<'a> {
    pub manifest: &'a ManifestModel,
    pub types: &'a dyn TypeIndex,
    pub resources: &'a dyn PackagedResources,
    pub catalog: Option<&'a BundleCatalog>,
    pub known_execution_environments: &'a BTreeSet<String>,
    pub activator_capability: &'a str,
}

impl CheckContext<'_> {
    fn line(&self, attribute: &str) -> Option<usize> {
        self.manifest.attribute_line(attribute)
    }

    fn finding_at(&self, finding: Finding, attribute: &str) -> Finding {
        finding.at(attribute, self.line(attribute))
    }

    fn malformed(&self, error: &ManifestError, attribute: &str) -> Finding {
        let kind = match error {
            ManifestError::MalformedClause { .. } => FindingKind::MalformedClause,
            ManifestError::MalformedVersion { .. } => FindingKind::MalformedVersion,
        };
        self.finding_at(Finding::error(kind, error.to_string()), attribute)
    }

    /// The packages of a package-list header plus one finding per bad clause.
    fn package_header(&self, attribute: &str) -> (Vec<PackageDescriptor>, Vec<Finding>) {
        let Some(value) = self.manifest.attribute(attribute) else {
            return (Vec::new(), Vec::new());
        };
        let (packages, errors) = parse_header_recovering(&value);
        let findings = errors.iter().map(|e| self.malformed(e, attribute)).collect();
        (packages, findings)
    }
}

pub type CheckResult = Result<Vec<Finding>, ManifestError>;

/// A named check and the header it is attached to.
pub struct Check {
    pub name: &'static str,
    pub attribute: Option<&'static str>,
    pub run: fn(&CheckContext<'_>) -> CheckResult,
}

/// All checks, in reporting order.
pub const CHECKS: &[Check] = &[
    Check {
        name: "activator",
        attribute: Some(headers::ACTIVATOR),
        run: check_activator,
    },
    Check {
        name: "name",
        attribute: Some(headers::NAME),
        run: check_name,
    },
    Check {
        name: "version",
        attribute: Some(headers::VERSION),
        run: check_version,
    },
    Check {
        name: "symbolic-name",
        attribute: Some(headers::SYMBOLIC_NAME),
        run: check_symbolic_name,
    },
    Check {
        name: "update-location",
        attribute: Some(headers::UPDATE_LOCATION),
        run: check_update_location,
    },
    Check {
        name: "doc-url",
        attribute: Some(headers::DOC_URL),
        run: check_doc_url,
    },
    Check {
        name: "execution-environments",
        attribute: Some(headers::EXECUTION_ENVIRONMENT),
        run: check_execution_environments,
    },
    Check {
        name: "classpath",
        attribute: Some(headers::CLASS_PATH),
        run: check_classpath,
    },
    Check {
        name: "exports",
        attribute: Some(headers::EXPORT_PACKAGE),
        run: check_exports,
    },
    Check {
        name: "dynamic-imports",
        attribute: Some(headers::DYNAMIC_IMPORT_PACKAGE),
        run: check_dynamic_imports,
    },
    Check {
        name: "imports",
        attribute: Some(headers::IMPORT_PACKAGE),
        run: check_imports,
    },
    Check {
        name: "import-resolution",
        attribute: Some(headers::IMPORT_PACKAGE),
        run: check_import_resolution,
    },
];

/// Whether `s` is a Java identifier.
pub fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Whether `s` is a dot-separated sequence of Java identifiers.
pub fn is_package_name(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_java_identifier)
}

/// Whether `s` is a valid dynamic import pattern: `*`, `pkg` or `pkg.*`.
pub fn is_dynamic_import_pattern(s: &str) -> bool {
    let pattern = s.split(';').next().unwrap_or("").trim();
    if pattern == "*" {
        return true;
    }
    let name = pattern.strip_suffix(".*").unwrap_or(pattern);
    is_package_name(name)
}

fn quoted_list<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(|s| format!("`{}`", s))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn check_activator(ctx: &CheckContext<'_>) -> CheckResult {
    let Some(activator) = ctx.manifest.activator() else {
        return Ok(vec![]);
    };
    let Some(candidates) = ctx.types.find_types(&activator) else {
        tracing::debug!("type index unavailable, skipping activator check");
        return Ok(vec![]);
    };

    let implementing = candidates
        .iter()
        .filter(|t| ctx.types.implements(t, ctx.activator_capability) == Some(true))
        .count();

    let message = match (candidates.len(), implementing) {
        (_, 1) => return Ok(vec![]),
        (0, _) => format!("activator class `{}` does not exist in the project", activator),
        (_, 0) => format!(
            "activator class `{}` does not implement {}",
            activator, ctx.activator_capability
        ),
        (_, n) => format!("activator class `{}` is ambiguous ({} matches)", activator, n),
    };

    Ok(vec![ctx.finding_at(
        Finding::error(FindingKind::MissingActivator, message),
        headers::ACTIVATOR,
    )])
}

pub fn check_name(ctx: &CheckContext<'_>) -> CheckResult {
    let message = match ctx.manifest.name() {
        None => "bundle name is missing".to_string(),
        Some(name) if name.contains(char::is_whitespace) => {
            format!("bundle name `{}` contains spaces", name)
        }
        Some(_) => return Ok(vec![]),
    };

    Ok(vec![ctx.finding_at(
        Finding::warning(FindingKind::InvalidName, message),
        headers::NAME,
    )])
}

pub fn check_version(ctx: &CheckContext<'_>) -> CheckResult {
    let Some(raw) = ctx.manifest.attribute(headers::VERSION) else {
        return Ok(vec![]);
    };

    match Version::parse(&raw) {
        Ok(_) => Ok(vec![]),
        Err(e) => Ok(vec![ctx.finding_at(
            Finding::error(FindingKind::InvalidVersion, e.to_string()),
            headers::VERSION,
        )]),
    }
}

pub fn check_symbolic_name(ctx: &CheckContext<'_>) -> CheckResult {
    let finding = match ctx.manifest.symbolic_name_id() {
        None => Finding::error(
            FindingKind::MissingSymbolicName,
            "bundle symbolic name is missing",
        ),
        Some(id) if !is_package_name(&id) => Finding::warning(
            FindingKind::InvalidSymbolicName,
            format!("bundle symbolic name `{}` is not a valid identifier", id),
        ),
        Some(_) => return Ok(vec![]),
    };

    Ok(vec![ctx.finding_at(finding, headers::SYMBOLIC_NAME)])
}

fn check_url(ctx: &CheckContext<'_>, attribute: &str, value: Option<String>) -> CheckResult {
    let Some(value) = value else {
        return Ok(vec![]);
    };

    match Url::parse(&value) {
        Ok(_) => Ok(vec![]),
        Err(e) => Ok(vec![ctx.finding_at(
            Finding::warning(
                FindingKind::MalformedUrl,
                format!("{} `{}` is not a valid URL: {}", attribute, value, e),
            ),
            attribute,
        )]),
    }
}

pub fn check_update_location(ctx: &CheckContext<'_>) -> CheckResult {
    check_url(ctx, headers::UPDATE_LOCATION, ctx.manifest.update_location())
}

pub fn check_doc_url(ctx: &CheckContext<'_>) -> CheckResult {
    check_url(ctx, headers::DOC_URL, ctx.manifest.doc_url())
}

pub fn check_execution_environments(ctx: &CheckContext<'_>) -> CheckResult {
    if ctx.known_execution_environments.is_empty() {
        return Ok(vec![]);
    }

    let unknown: Vec<String> = ctx
        .manifest
        .execution_environments()
        .into_iter()
        .filter(|ee| !ctx.known_execution_environments.contains(ee))
        .collect();
    if unknown.is_empty() {
        return Ok(vec![]);
    }

    Ok(vec![ctx.finding_at(
        Finding::warning(
            FindingKind::UnknownExecutionEnvironment,
            format!("unknown execution environments: {}", quoted_list(&unknown)),
        ),
        headers::EXECUTION_ENVIRONMENT,
    )])
}

pub fn check_classpath(ctx: &CheckContext<'_>) -> CheckResult {
    let mut dangling = Vec::new();

    for entry in ctx.manifest.bundle_class_path() {
        if entry == ROOT_CLASSPATH_ENTRY {
            continue;
        }
        match ctx.resources.contains(&entry) {
            Some(true) => {}
            Some(false) => dangling.push(entry),
            None => {
                tracing::debug!("packaged resources unavailable, skipping classpath check");
                return Ok(vec![]);
            }
        }
    }

    if dangling.is_empty() {
        return Ok(vec![]);
    }

    Ok(vec![ctx.finding_at(
        Finding::error(
            FindingKind::DanglingClasspathEntry,
            format!(
                "classpath entries not packaged in the bundle: {}",
                quoted_list(&dangling)
            ),
        ),
        headers::CLASS_PATH,
    )])
}

pub fn check_exports(ctx: &CheckContext<'_>) -> CheckResult {
    let (exports, mut findings) = ctx.package_header(headers::EXPORT_PACKAGE);
    for export in &exports {
        if let Some(Err(e)) = export.specification_version().map(Version::parse) {
            findings.push(ctx.malformed(&e, headers::EXPORT_PACKAGE));
        }
    }

    let Some(exportable) = ctx.types.exportable_packages() else {
        tracing::debug!("type index unavailable, skipping export check");
        return Ok(findings);
    };

    let invalid: Vec<String> = exports
        .iter()
        .filter(|p| !exportable.contains(p.name()))
        .map(|p| p.name().to_string())
        .collect();
    if !invalid.is_empty() {
        findings.push(ctx.finding_at(
            Finding::error(
                FindingKind::InvalidExport,
                format!(
                    "exported packages not found in the project's source: {}",
                    quoted_list(&invalid)
                ),
            ),
            headers::EXPORT_PACKAGE,
        ));
    }

    Ok(findings)
}

pub fn check_dynamic_imports(ctx: &CheckContext<'_>) -> CheckResult {
    let invalid: Vec<String> = ctx
        .manifest
        .dynamic_imports()
        .into_iter()
        .filter(|p| !is_dynamic_import_pattern(p))
        .collect();
    if invalid.is_empty() {
        return Ok(vec![]);
    }

    Ok(vec![ctx.finding_at(
        Finding::error(
            FindingKind::InvalidDynamicImport,
            format!("invalid dynamic import patterns: {}", quoted_list(&invalid)),
        ),
        headers::DYNAMIC_IMPORT_PACKAGE,
    )])
}

pub fn check_imports(ctx: &CheckContext<'_>) -> CheckResult {
    let (declared, mut findings) = ctx.package_header(headers::IMPORT_PACKAGE);
    for import in &declared {
        if let Some(Err(e)) = import.specification_version().map(VersionRange::parse) {
            findings.push(ctx.malformed(&e, headers::IMPORT_PACKAGE));
        }
    }

    let (Some(referenced), Some(own)) = (ctx.types.referenced_packages(), ctx.types.own_packages())
    else {
        tracing::debug!("type index unavailable, skipping import check");
        return Ok(findings);
    };

    let declared_names: BTreeSet<&str> = declared.iter().map(|p| p.name()).collect();
    let line = ctx.line(headers::IMPORT_PACKAGE);

    for package in &referenced {
        if package == "java" || package.starts_with("java.") || own.contains(package) {
            continue;
        }
        if !declared_names.contains(package.as_str()) {
            findings.push(
                Finding::error(
                    FindingKind::MissingImport,
                    format!("package `{}` is used but not imported", package),
                )
                .at(headers::IMPORT_PACKAGE, line),
            );
        }
    }

    for import in &declared {
        if !referenced.contains(import.name()) {
            findings.push(
                Finding::warning(
                    FindingKind::UnusedImport,
                    format!("imported package `{}` is not used", import.name()),
                )
                .at(headers::IMPORT_PACKAGE, line),
            );
        }
    }

    Ok(findings)
}

pub fn check_import_resolution(ctx: &CheckContext<'_>) -> CheckResult {
    let Some(catalog) = ctx.catalog else {
        return Ok(vec![]);
    };
    let Some(value) = ctx.manifest.attribute(headers::IMPORT_PACKAGE) else {
        return Ok(vec![]);
    };

    // Malformed clauses are reported by the import check
    let line = ctx.line(headers::IMPORT_PACKAGE);
    Ok(parse_header(&value)
        .iter()
        .filter(|import| !import.is_optional() && !catalog.is_satisfied(import))
        .map(|import| {
            let message = match import.specification_version() {
                Some(range) => format!(
                    "no exporter of `{}` matches version range {}",
                    import.name(),
                    range
                ),
                None => format!("no exporter found for `{}`", import.name()),
            };
            Finding::warning(FindingKind::UnresolvedImport, message)
                .at(headers::IMPORT_PACKAGE, line)
        })
        .collect())
}

//! Bundle manifest validation.
//!
//! The validator checks a manifest against the project it describes: the
//! types and packages of its Java source, the resources packaged into the
//! bundle and, optionally, a catalog of exporters its imports must bind to.
//!
//! ## Usage
//!
//! ```bash
//! bndkit check                          # Validate the project in the current directory
//! bndkit check --path bundles/acme      # Validate another project
//! bndkit check --output-format github   # GitHub Actions annotations
//! bndkit check --no-catalog             # Skip import resolution
//! ```
//!
//! ## Phases
//!
//! Each pass moves through input, parsed, checked and reported. Checks are
//! independent; a check that cannot interpret its input yields a single
//! `malformed-value` finding and the pass continues.

mod checks;
mod format;
mod index;
mod types;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::ManifestModel;
use crate::project::BundleProject;
use crate::resolver::BundleCatalog;
use crate::util::config::ValidationConfig;
use crate::util::context::GlobalContext;
use crate::util::diagnostic::Severity;

pub use self::checks::{is_dynamic_import_pattern, is_java_identifier, is_package_name};
pub use self::format::{format_report, format_report_for_output};
pub use self::index::{NoResources, NoTypeIndex, PackagedResources, TypeIndex, ACTIVATOR_CAPABILITY};
pub use self::types::{
    Finding, FindingKind, OutputFormat, OutputFormatParseError, ValidationPhase, ValidationReport,
};

use self::checks::{CheckContext, CHECKS};

/// Execution environments known out of the box.
pub const DEFAULT_EXECUTION_ENVIRONMENTS: &[&str] = &[
    "OSGi/Minimum-1.0",
    "OSGi/Minimum-1.1",
    "OSGi/Minimum-1.2",
    "CDC-1.0/Foundation-1.0",
    "CDC-1.1/Foundation-1.1",
    "JRE-1.1",
    "J2SE-1.2",
    "J2SE-1.3",
    "J2SE-1.4",
    "J2SE-1.5",
    "JavaSE-1.6",
    "JavaSE-1.7",
    "JavaSE-1.8",
    "JavaSE-9",
    "JavaSE-10",
    "JavaSE-11",
    "JavaSE-17",
    "JavaSE-21",
];

/// Tunables for a validation pass.
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Environments `Bundle-RequiredExecutionEnvironment` may name.
    /// An empty set disables the check.
    pub known_execution_environments: BTreeSet<String>,

    /// Interface a `Bundle-Activator` class must implement.
    pub activator_capability: String,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        ValidatorOptions {
            known_execution_environments: DEFAULT_EXECUTION_ENVIRONMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            activator_capability: ACTIVATOR_CAPABILITY.to_string(),
        }
    }
}

impl ValidatorOptions {
    /// Options with configured overrides applied.
    pub fn from_config(config: &ValidationConfig) -> Self {
        let mut options = ValidatorOptions::default();
        if let Some(environments) = &config.execution_environments {
            options.known_execution_environments = environments.iter().cloned().collect();
        }
        if let Some(capability) = &config.activator_capability {
            options.activator_capability = capability.clone();
        }
        options
    }
}

/// Validates manifests against their project.
pub struct DependencyValidator<'a> {
    types: &'a dyn TypeIndex,
    resources: &'a dyn PackagedResources,
    catalog: Option<&'a BundleCatalog>,
    options: ValidatorOptions,
}

impl<'a> DependencyValidator<'a> {
    /// A validator that knows nothing about the project.
    pub fn new(options: ValidatorOptions) -> Self {
        DependencyValidator {
            types: &NoTypeIndex,
            resources: &NoResources,
            catalog: None,
            options,
        }
    }

    pub fn with_types(mut self, types: &'a dyn TypeIndex) -> Self {
        self.types = types;
        self
    }

    pub fn with_resources(mut self, resources: &'a dyn PackagedResources) -> Self {
        self.resources = resources;
        self
    }

    /// Also check that imports bind to an exporter in `catalog`.
    pub fn with_catalog(mut self, catalog: &'a BundleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Validate raw manifest text, if there is any.
    pub fn validate_text(&self, text: Option<&str>) -> Vec<Finding> {
        tracing::debug!("validation phase: {}", ValidationPhase::Input);
        match text {
            Some(text) => self.validate(&ManifestModel::parse(text)),
            None => vec![Finding::error(
                FindingKind::MalformedValue,
                "manifest text is not available",
            )],
        }
    }

    /// Run every check against `manifest`.
    pub fn validate(&self, manifest: &ManifestModel) -> Vec<Finding> {
        tracing::debug!(
            "validation phase: {} ({} headers)",
            ValidationPhase::Parsed,
            manifest.attribute_names().len()
        );

        let ctx = CheckContext {
            manifest,
            types: self.types,
            resources: self.resources,
            catalog: self.catalog,
            known_execution_environments: &self.options.known_execution_environments,
            activator_capability: &self.options.activator_capability,
        };

        let mut findings = Vec::new();
        for check in CHECKS {
            match (check.run)(&ctx) {
                Ok(found) => findings.extend(found),
                Err(e) => {
                    tracing::debug!("check `{}` failed: {}", check.name, e);
                    let mut finding = Finding::error(FindingKind::MalformedValue, e.to_string());
                    if let Some(attribute) = check.attribute {
                        finding = finding.at(attribute, manifest.attribute_line(attribute));
                    }
                    findings.push(finding);
                }
            }
        }
        tracing::debug!("validation phase: {}", ValidationPhase::Checked);

        findings.sort_by_key(|f| (f.severity, f.line.unwrap_or(usize::MAX)));
        tracing::debug!(
            "validation phase: {} ({} findings)",
            ValidationPhase::Reported,
            findings.len()
        );
        findings
    }
}

/// Options for [`check`].
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Project root; the current directory when unset
    pub path: Option<PathBuf>,

    /// Manifest override, relative to the project root
    pub manifest: Option<PathBuf>,

    /// Skip import resolution against the catalog
    pub no_catalog: bool,
}

/// Validate the bundle project described by `options`.
pub fn check(options: &CheckOptions, ctx: &GlobalContext) -> Result<ValidationReport> {
    let root = options.path.clone().unwrap_or_else(|| ctx.cwd().to_path_buf());
    let config = ctx.load_config(&root);
    let project = BundleProject::open(&root, &config, options.manifest.as_deref())?;
    let manifest = ManifestModel::load(project.manifest_path())?;

    let catalog = if options.no_catalog {
        None
    } else {
        Some(crate::ops::resolve::build_catalog(&root, &config, &manifest)?)
    };

    let mut validator = DependencyValidator::new(ValidatorOptions::from_config(&config.validation))
        .with_types(project.types())
        .with_resources(project.resources());
    if let Some(catalog) = &catalog {
        validator = validator.with_catalog(catalog);
    }

    let findings = validator.validate(&manifest);
    let report = ValidationReport::new(
        manifest.symbolic_name_id(),
        project.manifest_path().to_path_buf(),
        findings,
    );

    tracing::info!(
        "checked {}: {} errors, {} warnings",
        report.bundle.as_deref().unwrap_or("bundle"),
        report.count(Severity::Error),
        report.count(Severity::Warning)
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{PackageSource, SourceKind};
    use crate::test_support::{MockResources, MockTypeIndex, ProjectFixture, StaticSource};

    const BASE: &str = "Manifest-Version: 1.0\r\n\
        Bundle-ManifestVersion: 2\r\n\
        Bundle-Name: Acme\r\n\
        Bundle-SymbolicName: com.acme\r\n\
        Bundle-Version: 1.0.0\r\n";

    fn manifest(extra: &str) -> ManifestModel {
        ManifestModel::parse(format!("{}{}\r\n", BASE, extra))
    }

    fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    fn project_index() -> MockTypeIndex {
        MockTypeIndex::new()
            .with_own_packages(&["com.acme.impl"])
            .with_exportable(&["com.acme.impl"])
            .with_referenced(&["com.acme.util"])
    }

    #[test]
    fn test_clean_manifest_has_no_findings() {
        let types = project_index();
        let m = manifest("Import-Package: com.acme.util\r\nExport-Package: com.acme.impl\r\n");

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_types(&types)
            .validate(&m);
        assert!(findings.is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_export_not_in_source() {
        let types = project_index();
        let m = manifest("Import-Package: com.acme.util\r\nExport-Package: com.acme.api\r\n");

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_types(&types)
            .validate(&m);
        assert_eq!(kinds(&findings), vec![FindingKind::InvalidExport]);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[0].attribute.as_deref(), Some("Export-Package"));
    }

    #[test]
    fn test_unused_and_missing_imports() {
        let types = MockTypeIndex::new()
            .with_own_packages(&["com.acme.impl"])
            .with_exportable(&["com.acme.impl"])
            .with_referenced(&["com.other.lib", "java.util", "com.acme.impl"]);
        let m = manifest("Import-Package: com.acme.util");

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_types(&types)
            .validate(&m);
        assert_eq!(
            kinds(&findings),
            vec![FindingKind::MissingImport, FindingKind::UnusedImport]
        );
        assert!(findings[0].message.contains("com.other.lib"));
        assert_eq!(findings[0].line, Some(6));
        assert_eq!(findings[1].severity, Severity::Warning);
        assert!(findings[1].message.contains("com.acme.util"));
    }

    #[test]
    fn test_bad_bundle_version() {
        let m = ManifestModel::parse(
            "Bundle-Name: Acme\r\nBundle-SymbolicName: com.acme\r\nBundle-Version: 1.2.bad\r\n",
        );

        let findings = DependencyValidator::new(ValidatorOptions::default()).validate(&m);
        assert_eq!(kinds(&findings), vec![FindingKind::InvalidVersion]);
        assert_eq!(findings[0].line, Some(3));
        assert_eq!(m.version(), crate::core::Version::ZERO);
    }

    #[test]
    fn test_dynamic_imports_reported_once() {
        let findings = DependencyValidator::new(ValidatorOptions::default())
            .validate(&manifest("DynamicImport-Package: *, com..bad"));

        assert_eq!(kinds(&findings), vec![FindingKind::InvalidDynamicImport]);
        assert!(findings[0].message.contains("com..bad"));
        assert!(!findings[0].message.contains("`*`"));
    }

    #[test]
    fn test_identity_findings() {
        let m = ManifestModel::parse(
            "Bundle-Name: Acme Bundle\r\nBundle-DocURL: not a url\r\nBundle-UpdateLocation: https://acme.example/update\r\n",
        );

        let findings = DependencyValidator::new(ValidatorOptions::default()).validate(&m);
        assert_eq!(
            kinds(&findings),
            vec![
                FindingKind::MissingSymbolicName,
                FindingKind::InvalidName,
                FindingKind::MalformedUrl
            ]
        );

        let m = manifest("").set_attribute("Bundle-SymbolicName", Some("my-bundle"));
        let findings = DependencyValidator::new(ValidatorOptions::default()).validate(&m);
        assert_eq!(kinds(&findings), vec![FindingKind::InvalidSymbolicName]);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_execution_environments_aggregate() {
        let m = manifest("Bundle-RequiredExecutionEnvironment: JavaSE-17, Foo-1, Bar-2");
        let findings = DependencyValidator::new(ValidatorOptions::default()).validate(&m);
        assert_eq!(kinds(&findings), vec![FindingKind::UnknownExecutionEnvironment]);
        assert!(findings[0].message.contains("`Foo-1`, `Bar-2`"));

        let options = ValidatorOptions {
            known_execution_environments: BTreeSet::new(),
            ..ValidatorOptions::default()
        };
        assert!(DependencyValidator::new(options).validate(&m).is_empty());
    }

    #[test]
    fn test_classpath_dangling_entries() {
        let resources = MockResources::new(&["lib/a.jar"]);
        let m = manifest("Bundle-ClassPath: ., lib/a.jar, lib/b.jar, lib/c.jar");

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_resources(&resources)
            .validate(&m);
        assert_eq!(kinds(&findings), vec![FindingKind::DanglingClasspathEntry]);
        assert!(findings[0].message.contains("`lib/b.jar`, `lib/c.jar`"));

        // Unavailable resources skip the check
        assert!(DependencyValidator::new(ValidatorOptions::default())
            .validate(&m)
            .is_empty());
    }

    #[test]
    fn test_activator() {
        let types = project_index()
            .with_type("com.acme.impl.Activator", &["org.osgi.framework.BundleActivator"])
            .with_type("com.acme.impl.Helper", &[]);
        let validate = |activator: &str| {
            let m = manifest(&format!(
                "Bundle-Activator: {}\r\nImport-Package: com.acme.util",
                activator
            ));
            kinds(
                &DependencyValidator::new(ValidatorOptions::default())
                    .with_types(&types)
                    .validate(&m),
            )
        };

        assert!(validate("com.acme.impl.Activator").is_empty());
        assert_eq!(validate("com.acme.impl.Helper"), vec![FindingKind::MissingActivator]);
        assert_eq!(validate("com.acme.impl.Nope"), vec![FindingKind::MissingActivator]);
    }

    #[test]
    fn test_malformed_clause_is_reported_once() {
        let types = project_index();
        let m = manifest("Import-Package: com.acme.util, ;version=1.0\r\nExport-Package: com.acme.api");

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_types(&types)
            .validate(&m);

        assert_eq!(
            kinds(&findings),
            vec![FindingKind::MalformedClause, FindingKind::InvalidExport]
        );
        assert_eq!(findings[0].attribute.as_deref(), Some("Import-Package"));
        assert_eq!(findings[0].line, Some(6));
    }

    #[test]
    fn test_import_diff_runs_past_malformed_clause() {
        let types = MockTypeIndex::new()
            .with_own_packages(&["com.acme.impl"])
            .with_referenced(&["com.other.lib"]);
        let m = manifest("Import-Package: com.acme.util, ;x=1");

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_types(&types)
            .validate(&m);

        assert_eq!(
            kinds(&findings),
            vec![
                FindingKind::MalformedClause,
                FindingKind::MissingImport,
                FindingKind::UnusedImport
            ]
        );
        assert!(findings[1].message.contains("`com.other.lib`"));
        assert!(findings[2].message.contains("`com.acme.util`"));
    }

    #[test]
    fn test_malformed_package_versions() {
        let types = project_index();
        let m = manifest(
            "Import-Package: com.acme.util;version=\"[2.0,1.0]\"\r\nExport-Package: com.acme.impl;version=1.x",
        );

        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_types(&types)
            .validate(&m);

        assert_eq!(
            kinds(&findings),
            vec![FindingKind::MalformedVersion, FindingKind::MalformedVersion]
        );
        assert_eq!(findings[0].attribute.as_deref(), Some("Import-Package"));
        assert_eq!(findings[1].attribute.as_deref(), Some("Export-Package"));
    }

    #[test]
    fn test_check_project_with_wildcard_activator_and_legacy_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = ProjectFixture::new("legacy")
            .with_manifest(
                "Manifest-Version: 1.0\r\n\
                 Bundle-ManifestVersion: 2\r\n\
                 Bundle-Name: Acme\r\n\
                 Bundle-SymbolicName: com.acme\r\n\
                 Bundle-Version: x.y\r\n\
                 Bundle-Activator: com.acme.Activator\r\n\
                 Import-Package: org.osgi.framework\r\n",
            )
            .with_source(
                "com/acme/Activator.java",
                "package com.acme;\n\nimport org.osgi.framework.*;\n\n\
                 public class Activator implements BundleActivator {}\n",
            )
            .write_to(tmp.path())
            .unwrap();
        let mut legacy = b"package com.acme;\n// Fran".to_vec();
        legacy.push(0xE7);
        legacy.extend_from_slice(b"ais\nclass Legacy {}\n");
        std::fs::write(root.join("src/com/acme/Legacy.java"), legacy).unwrap();

        let ctx = GlobalContext::with_cwd(root).unwrap().with_home(None);
        let options = CheckOptions {
            no_catalog: true,
            ..CheckOptions::default()
        };
        let report = check(&options, &ctx).unwrap();

        assert_eq!(kinds(&report.findings), vec![FindingKind::InvalidVersion]);
        assert!(!report.passed);
    }

    #[test]
    fn test_unresolved_imports_with_catalog() {
        let catalog = BundleCatalog::new();
        let mut sources: Vec<Box<dyn PackageSource>> = vec![Box::new(StaticSource::new(
            "framework",
            SourceKind::Framework,
            &["org.osgi.framework;version=1.8"],
        ))];
        catalog.refresh(&mut sources);

        let m = manifest(
            "Import-Package: org.osgi.framework;version=\"[1.5,2.0)\",\
             org.slf4j;version=1.7,\
             org.optional;resolution:=optional",
        );
        let findings = DependencyValidator::new(ValidatorOptions::default())
            .with_catalog(&catalog)
            .validate(&m);

        assert_eq!(kinds(&findings), vec![FindingKind::UnresolvedImport]);
        assert!(findings[0].message.contains("org.slf4j"));

        // No catalog, no resolution findings
        assert!(DependencyValidator::new(ValidatorOptions::default())
            .validate(&m)
            .is_empty());
    }

    #[test]
    fn test_validate_text_absent() {
        let findings = DependencyValidator::new(ValidatorOptions::default()).validate_text(None);
        assert_eq!(kinds(&findings), vec![FindingKind::MalformedValue]);
    }

    #[test]
    fn test_findings_sorted_errors_first() {
        let m = ManifestModel::parse("Bundle-Name: A B\r\nBundle-Version: x\r\n");
        let findings = DependencyValidator::new(ValidatorOptions::default()).validate(&m);

        let severities: Vec<_> = findings.iter().map(|f| f.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort();
        assert_eq!(severities, sorted);
        assert_eq!(findings[0].kind, FindingKind::InvalidVersion);
    }

    #[test]
    fn test_options_from_config() {
        let config = ValidationConfig {
            execution_environments: Some(vec!["Acme-1".to_string()]),
            activator_capability: None,
        };
        let options = ValidatorOptions::from_config(&config);

        assert_eq!(options.known_execution_environments.len(), 1);
        assert_eq!(options.activator_capability, ACTIVATOR_CAPABILITY);
    }
}

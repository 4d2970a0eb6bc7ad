//! Bundle manifest model.
//!
//! The model keeps the raw manifest text and derives typed fields from it on
//! access. Edits perform surgery on the text and return a new snapshot, so
//! headers that were not touched keep their exact bytes (folding, line
//! terminators, ordering).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::header::{self, HeaderSpan};
use crate::core::package::{parse_header, render_header, PackageDescriptor};
use crate::core::version::Version;

/// Header names understood by the model.
pub mod headers {
    pub const SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
    pub const VERSION: &str = "Bundle-Version";
    pub const NAME: &str = "Bundle-Name";
    pub const UPDATE_LOCATION: &str = "Bundle-UpdateLocation";
    pub const ACTIVATOR: &str = "Bundle-Activator";
    pub const DESCRIPTION: &str = "Bundle-Description";
    pub const DOC_URL: &str = "Bundle-DocURL";
    pub const VENDOR: &str = "Bundle-Vendor";
    pub const CONTACT: &str = "Bundle-Contact";
    pub const COPYRIGHT: &str = "Bundle-Copyright";
    pub const CATEGORY: &str = "Bundle-Category";
    pub const EXECUTION_ENVIRONMENT: &str = "Bundle-RequiredExecutionEnvironment";
    pub const CLASS_PATH: &str = "Bundle-ClassPath";
    pub const EXPORT_PACKAGE: &str = "Export-Package";
    pub const IMPORT_PACKAGE: &str = "Import-Package";
    pub const DYNAMIC_IMPORT_PACKAGE: &str = "DynamicImport-Package";
}

/// The bundle's own classes root on the bundle classpath.
pub const ROOT_CLASSPATH_ENTRY: &str = ".";

const LINE_TERMINATOR: &str = "\r\n";

/// An immutable snapshot of a bundle manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestModel {
    text: String,
}

impl ManifestModel {
    /// Parse manifest text.
    pub fn parse(text: impl Into<String>) -> Self {
        ManifestModel { text: text.into() }
    }

    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        Ok(Self::parse(text))
    }

    /// Write the manifest text to a file path.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, &self.text)
            .with_context(|| format!("failed to write manifest: {}", path.display()))
    }

    /// The raw manifest text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the model and return its text.
    pub fn into_text(self) -> String {
        self.text
    }

    fn span(&self, name: &str) -> Option<HeaderSpan> {
        header::find_header(&self.text, name)
    }

    /// The unfolded value of a header.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.span(name).map(|s| s.value)
    }

    /// The 1-based line number where a header starts.
    pub fn attribute_line(&self, name: &str) -> Option<usize> {
        self.span(name).map(|s| s.line)
    }

    /// Header names of the main section, in order of appearance.
    pub fn attribute_names(&self) -> Vec<String> {
        header::main_section_headers(&self.text)
            .into_iter()
            .map(|s| s.name)
            .collect()
    }

    /// Set, replace or (with a blank value) delete a header.
    ///
    /// Setting a header to its current value returns the text unchanged.
    pub fn set_attribute(&self, name: &str, value: Option<&str>) -> ManifestModel {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let existing = self.span(name);

        if existing.as_ref().map(|s| s.value.as_str()) == value {
            return self.clone();
        }

        let mut text = self.text.clone();
        match (existing, value) {
            (Some(span), None) => {
                tracing::debug!("removing header {}", name);
                text.replace_range(span.bytes, "");
            }
            (Some(span), Some(value)) => {
                tracing::debug!("replacing header {}", name);
                text.replace_range(span.bytes, &render_line(name, value));
            }
            (None, Some(value)) => {
                tracing::debug!("adding header {}", name);
                let line = render_line(name, value);
                match header::main_section_end(&text) {
                    Some(offset) => text.insert_str(offset, &line),
                    None => {
                        if !text.is_empty() && !text.ends_with(['\n', '\r']) {
                            text.push_str(LINE_TERMINATOR);
                        }
                        text.push_str(&line);
                    }
                }
            }
            (None, None) => {}
        }

        ManifestModel { text }
    }

    /// Set a header to a comma-joined list; an empty list deletes it.
    pub fn with_list(&self, name: &str, items: &[String]) -> ManifestModel {
        let joined = items.join(",");
        self.set_attribute(name, Some(&joined))
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.attribute(name)
            .map(|v| header::split_clauses(&v))
            .unwrap_or_default()
    }

    fn text_attribute(&self, name: &str) -> Option<String> {
        self.attribute(name).filter(|v| !v.is_empty())
    }

    /// The raw `Bundle-SymbolicName` value, directives included.
    pub fn symbolic_name(&self) -> Option<String> {
        self.text_attribute(headers::SYMBOLIC_NAME)
    }

    /// The symbolic name without directives.
    pub fn symbolic_name_id(&self) -> Option<String> {
        self.symbolic_name()
            .and_then(|v| v.split(';').next().map(|s| s.trim().to_string()))
            .filter(|v| !v.is_empty())
    }

    /// Whether the symbolic name carries `singleton:=true`.
    pub fn is_singleton(&self) -> bool {
        self.symbolic_name().is_some_and(|v| {
            v.split(';').skip(1).any(|d| {
                d.split_once(":=").is_some_and(|(k, v)| {
                    k.trim() == "singleton" && v.trim().trim_matches('"') == "true"
                })
            })
        })
    }

    /// The bundle version, `0.0.0` when absent or malformed.
    pub fn version(&self) -> Version {
        self.attribute(headers::VERSION)
            .map(|v| Version::parse_or_zero(&v))
            .unwrap_or(Version::ZERO)
    }

    pub fn name(&self) -> Option<String> {
        self.text_attribute(headers::NAME)
    }

    pub fn activator(&self) -> Option<String> {
        self.text_attribute(headers::ACTIVATOR)
    }

    pub fn update_location(&self) -> Option<String> {
        self.text_attribute(headers::UPDATE_LOCATION)
    }

    pub fn doc_url(&self) -> Option<String> {
        self.text_attribute(headers::DOC_URL)
    }

    pub fn description(&self) -> Option<String> {
        self.text_attribute(headers::DESCRIPTION)
    }

    pub fn vendor(&self) -> Option<String> {
        self.text_attribute(headers::VENDOR)
    }

    pub fn contact(&self) -> Option<String> {
        self.text_attribute(headers::CONTACT)
    }

    pub fn copyright(&self) -> Option<String> {
        self.text_attribute(headers::COPYRIGHT)
    }

    /// Bundle classpath entries; `["."]` when none are declared.
    pub fn bundle_class_path(&self) -> Vec<String> {
        let entries = self.list(headers::CLASS_PATH);
        if entries.is_empty() {
            vec![ROOT_CLASSPATH_ENTRY.to_string()]
        } else {
            entries
        }
    }

    /// Replace the bundle classpath, keeping the root entry present.
    pub fn with_bundle_class_path(&self, entries: &[String]) -> ManifestModel {
        let mut entries = entries.to_vec();
        if !entries.iter().any(|e| e == ROOT_CLASSPATH_ENTRY) {
            entries.insert(0, ROOT_CLASSPATH_ENTRY.to_string());
        }
        self.with_list(headers::CLASS_PATH, &entries)
    }

    pub fn exported_packages(&self) -> Vec<PackageDescriptor> {
        self.attribute(headers::EXPORT_PACKAGE)
            .map(|v| parse_header(&v))
            .unwrap_or_default()
    }

    pub fn with_exported_packages(&self, packages: &[PackageDescriptor]) -> ManifestModel {
        self.set_attribute(headers::EXPORT_PACKAGE, Some(&render_header(packages)))
    }

    pub fn imported_packages(&self) -> Vec<PackageDescriptor> {
        self.attribute(headers::IMPORT_PACKAGE)
            .map(|v| parse_header(&v))
            .unwrap_or_default()
    }

    pub fn with_imported_packages(&self, packages: &[PackageDescriptor]) -> ManifestModel {
        self.set_attribute(headers::IMPORT_PACKAGE, Some(&render_header(packages)))
    }

    /// Dynamic import patterns, kept verbatim (`*`, `pkg`, `pkg.*`).
    pub fn dynamic_imports(&self) -> Vec<String> {
        self.list(headers::DYNAMIC_IMPORT_PACKAGE)
    }

    pub fn with_dynamic_imports(&self, patterns: &[String]) -> ManifestModel {
        self.with_list(headers::DYNAMIC_IMPORT_PACKAGE, patterns)
    }

    pub fn execution_environments(&self) -> Vec<String> {
        self.list(headers::EXECUTION_ENVIRONMENT)
    }

    pub fn categories(&self) -> Vec<String> {
        self.list(headers::CATEGORY)
    }

    /// A serializable view of the typed fields.
    pub fn summary(&self) -> ManifestSummary {
        ManifestSummary {
            symbolic_name: self.symbolic_name(),
            version: self.version().to_string(),
            name: self.name(),
            activator: self.activator(),
            vendor: self.vendor(),
            description: self.description(),
            update_location: self.update_location(),
            doc_url: self.doc_url(),
            contact: self.contact(),
            copyright: self.copyright(),
            class_path: self.bundle_class_path(),
            exports: self.exported_packages().iter().map(ToString::to_string).collect(),
            imports: self.imported_packages().iter().map(ToString::to_string).collect(),
            dynamic_imports: self.dynamic_imports(),
            execution_environments: self.execution_environments(),
            categories: self.categories(),
        }
    }
}

fn render_line(name: &str, value: &str) -> String {
    format!("{}: {}{}", name, value, LINE_TERMINATOR)
}

/// Typed manifest fields for display.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    pub symbolic_name: Option<String>,
    pub version: String,
    pub name: Option<String>,
    pub activator: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub update_location: Option<String>,
    pub doc_url: Option<String>,
    pub contact: Option<String>,
    pub copyright: Option<String>,
    pub class_path: Vec<String>,
    pub exports: Vec<String>,
    pub imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
    pub execution_environments: Vec<String>,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Manifest-Version: 1.0\r\n\
Bundle-SymbolicName: com.acme.demo;singleton:=true\r\n\
Bundle-Version: 1.2.3.qualifier\r\n\
Bundle-Name: Demo\r\n\
Import-Package: org.osgi.framework;version=\"[1.3,2.0)\",\r\n org.osgi.util.tracker\r\n\
Bundle-ClassPath: .,lib/extra.jar\r\n\
\r\n\
Name: com/acme/demo/Activator.class\r\n\
SHA1-Digest: abc=\r\n";

    #[test]
    fn test_typed_accessors() {
        let m = ManifestModel::parse(SAMPLE);

        assert_eq!(m.symbolic_name_id().as_deref(), Some("com.acme.demo"));
        assert!(m.is_singleton());
        assert_eq!(m.version(), Version::new(1, 2, 3).with_qualifier("qualifier"));
        assert_eq!(m.name().as_deref(), Some("Demo"));
        assert_eq!(m.bundle_class_path(), vec![".", "lib/extra.jar"]);

        let imports = m.imported_packages();
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].specification_version(), Some("[1.3,2.0)"));
        assert_eq!(imports[1].name(), "org.osgi.util.tracker");
        assert_eq!(m.attribute_line(headers::IMPORT_PACKAGE), Some(5));
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let m = ManifestModel::parse("");

        assert_eq!(m.bundle_class_path(), vec!["."]);
        assert_eq!(m.version(), Version::ZERO);
        assert!(m.exported_packages().is_empty());
        assert!(m.symbolic_name().is_none());
    }

    #[test]
    fn test_malformed_version_defaults() {
        let m = ManifestModel::parse("Bundle-Version: 1.2.bad\n");
        assert_eq!(m.version(), Version::ZERO);
        assert_eq!(m.attribute(headers::VERSION).as_deref(), Some("1.2.bad"));
    }

    #[test]
    fn test_noop_edits_are_byte_identical() {
        let mixed = "Bundle-Name: A\nImport-Package: a,\n b\r\nBundle-Vendor:  x \n";
        for text in [SAMPLE, mixed] {
            let m = ManifestModel::parse(text);
            let mut edited = m.clone();
            for name in m.attribute_names() {
                let value = edited.attribute(&name);
                edited = edited.set_attribute(&name, value.as_deref());
            }
            assert_eq!(edited.text(), text);
        }
    }

    #[test]
    fn test_replace_folded_header() {
        let m = ManifestModel::parse(SAMPLE).set_attribute(headers::IMPORT_PACKAGE, Some("x.y"));

        assert!(m.text().contains("Bundle-Name: Demo\r\nImport-Package: x.y\r\nBundle-ClassPath"));
        assert!(!m.text().contains("org.osgi.util.tracker"));
    }

    #[test]
    fn test_delete_then_re_add() {
        let m = ManifestModel::parse(SAMPLE);
        let deleted = m.set_attribute(headers::NAME, None);

        assert!(deleted.attribute(headers::NAME).is_none());
        assert!(!deleted.text().contains("Bundle-Name"));

        let restored = deleted.set_attribute(headers::NAME, Some("Demo"));
        assert_eq!(restored.attribute(headers::NAME).as_deref(), Some("Demo"));
        // Re-added before the blank line separating the signing section
        assert!(restored.text().contains("Bundle-Name: Demo\r\n\r\nName: com/acme"));
    }

    #[test]
    fn test_blank_value_deletes() {
        let m = ManifestModel::parse(SAMPLE).set_attribute(headers::VERSION, Some("   "));
        assert!(m.attribute(headers::VERSION).is_none());
        assert!(m.text().starts_with("Manifest-Version: 1.0\r\nBundle-SymbolicName"));
    }

    #[test]
    fn test_append_ensures_terminator() {
        let m = ManifestModel::parse("Bundle-Name: A").set_attribute(headers::VENDOR, Some("Acme"));
        assert_eq!(m.text(), "Bundle-Name: A\r\nBundle-Vendor: Acme\r\n");

        let empty = ManifestModel::parse("").set_attribute(headers::VENDOR, Some("Acme"));
        assert_eq!(empty.text(), "Bundle-Vendor: Acme\r\n");
    }

    #[test]
    fn test_adding_blank_to_missing_is_noop() {
        let m = ManifestModel::parse("Bundle-Name: A\n");
        assert_eq!(m.set_attribute(headers::VENDOR, None).text(), "Bundle-Name: A\n");
    }

    #[test]
    fn test_class_path_edit_keeps_root_entry() {
        let m = ManifestModel::parse("").with_bundle_class_path(&["lib/a.jar".to_string()]);
        assert_eq!(m.bundle_class_path(), vec![".", "lib/a.jar"]);
    }

    #[test]
    fn test_package_list_edits() {
        let m = ManifestModel::parse("")
            .with_exported_packages(&[PackageDescriptor::new("com.acme.api", Some("1.0"))]);
        assert_eq!(m.attribute(headers::EXPORT_PACKAGE).as_deref(), Some("com.acme.api;specification-version=1.0"));

        let cleared = m.with_exported_packages(&[]);
        assert!(cleared.attribute(headers::EXPORT_PACKAGE).is_none());
    }

    #[test]
    fn test_list_headers() {
        let m = ManifestModel::parse(
            "DynamicImport-Package: *, com.acme.*\nBundle-RequiredExecutionEnvironment: J2SE-1.5, JavaSE-1.8\nBundle-Category: util,demo\n",
        );
        assert_eq!(m.dynamic_imports(), vec!["*", "com.acme.*"]);
        assert_eq!(m.execution_environments(), vec!["J2SE-1.5", "JavaSE-1.8"]);
        assert_eq!(m.categories(), vec!["util", "demo"]);
    }
}

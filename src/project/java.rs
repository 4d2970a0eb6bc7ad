//! Java source index.
//!
//! A lightweight scan of `*.java` files: package declarations, imports and
//! type declarations with their supertypes. It is not a Java parser; it reads
//! just enough to answer the validator's questions.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use walkdir::WalkDir;

use crate::ops::validate::TypeIndex;

/// A type declared in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaType {
    /// Fully qualified name
    pub name: String,
    /// Declaring package (empty for the default package)
    pub package: String,
    /// Qualified names of extended and implemented types. A simple name that
    /// only an on-demand import could supply contributes one candidate per
    /// possible package.
    pub supertypes: Vec<String>,
    /// File the type was found in
    pub file: PathBuf,
}

/// What a single compilation unit declares and uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaFile {
    pub package: String,
    /// Packages of imported types
    pub imported_packages: BTreeSet<String>,
    /// Simple name -> qualified name for single-type imports
    pub imported_types: BTreeMap<String, String>,
    /// Packages (or enclosing types) imported on demand, in source order
    pub on_demand_imports: Vec<String>,
    /// Declared types: simple name and raw supertype names
    pub declarations: Vec<(String, Vec<String>)>,
}

/// Regex-based reader for Java compilation units.
pub struct JavaParser {
    comments: Regex,
    package: Regex,
    import: Regex,
    declaration: Regex,
    generics: Regex,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        Ok(JavaParser {
            comments: Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").context("comment pattern")?,
            package: Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").context("package pattern")?,
            import: Regex::new(r"(?m)^\s*import\s+(static\s+)?([\w.]+?)(\.\*)?\s*;")
                .context("import pattern")?,
            declaration: Regex::new(
                r"\b(?:class|interface|enum|record)\s+([A-Za-z_$][\w$]*)([^{;]*)\{",
            )
            .context("declaration pattern")?,
            generics: Regex::new(r"<[^<>]*>").context("generics pattern")?,
        })
    }

    /// Read one compilation unit.
    pub fn parse(&self, content: &str) -> JavaFile {
        let content = self.comments.replace_all(content, " ");
        let mut file = JavaFile::default();

        if let Some(cap) = self.package.captures(&content) {
            file.package = cap[1].to_string();
        }

        for cap in self.import.captures_iter(&content) {
            let is_static = cap.get(1).is_some();
            let path = &cap[2];
            let on_demand = cap.get(3).is_some();

            let package = package_of(path, !on_demand || is_static);
            if !package.is_empty() && package != file.package {
                file.imported_packages.insert(package);
            }
            if is_static {
                continue;
            }
            if on_demand {
                file.on_demand_imports.push(path.to_string());
            } else if let Some((_, simple)) = path.rsplit_once('.') {
                file.imported_types.insert(simple.to_string(), path.to_string());
            }
        }

        for cap in self.declaration.captures_iter(&content) {
            let mut header = cap[2].to_string();
            // Nested generics are stripped innermost first
            while self.generics.is_match(&header) {
                header = self.generics.replace_all(&header, " ").into_owned();
            }
            file.declarations
                .push((cap[1].to_string(), supertypes_of(&header)));
        }

        file
    }
}

/// Package part of an import path.
///
/// Segments are taken up to the first capitalised one; when every segment is
/// lower case, `ends_in_member` drops the last segment as the imported type.
fn package_of(path: &str, ends_in_member: bool) -> String {
    let segments: Vec<&str> = path.split('.').collect();
    let lower: Vec<&str> = segments
        .iter()
        .take_while(|s| !s.starts_with(|c: char| c.is_uppercase()))
        .copied()
        .collect();

    if lower.len() == segments.len() && ends_in_member {
        lower[..lower.len().saturating_sub(1)].join(".")
    } else {
        lower.join(".")
    }
}

fn supertypes_of(header: &str) -> Vec<String> {
    let mut supertypes = Vec::new();
    let mut collecting = false;

    for token in header.split(|c: char| c.is_whitespace() || c == ',') {
        match token {
            "" => {}
            "extends" | "implements" => collecting = true,
            "permits" | "throws" => collecting = false,
            _ if token.starts_with('(') => collecting = false,
            name if collecting => supertypes.push(name.to_string()),
            _ => {}
        }
    }

    supertypes
}

/// Type index built from scanning Java source directories.
#[derive(Debug, Clone, Default)]
pub struct JavaSourceIndex {
    types: Vec<JavaType>,
    referenced: BTreeSet<String>,
    own: BTreeSet<String>,
}

impl JavaSourceIndex {
    /// Scan every `*.java` file under the given directories.
    pub fn scan<P: AsRef<Path>>(source_dirs: &[P]) -> Result<Self> {
        let parser = JavaParser::new()?;
        let mut index = JavaSourceIndex::default();

        for dir in source_dirs {
            let dir = dir.as_ref();
            for entry in WalkDir::new(dir).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                        continue;
                    }
                };
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some("java")
                {
                    continue;
                }

                let bytes = match std::fs::read(path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!("skipping {}: {}", path.display(), e);
                        continue;
                    }
                };
                let content = String::from_utf8_lossy(&bytes);
                if matches!(content, Cow::Owned(_)) {
                    tracing::debug!("{} is not valid UTF-8, decoding lossily", path.display());
                }
                index.add_file(path, &parser.parse(&content));
            }
        }

        tracing::debug!(
            "indexed {} types in {} packages",
            index.types.len(),
            index.own.len()
        );
        Ok(index)
    }

    /// Add one parsed compilation unit.
    pub fn add_file(&mut self, path: &Path, file: &JavaFile) {
        if !file.package.is_empty() {
            self.own.insert(file.package.clone());
        }
        self.referenced
            .extend(file.imported_packages.iter().cloned());

        for (simple, supertypes) in &file.declarations {
            let supertypes = supertypes
                .iter()
                .flat_map(|s| supertype_candidates(s, file))
                .collect();
            self.types.push(JavaType {
                name: qualify(simple, file),
                package: file.package.clone(),
                supertypes,
                file: path.to_path_buf(),
            });
        }
    }

    /// All indexed types.
    pub fn types(&self) -> &[JavaType] {
        &self.types
    }

    fn implements_from(&self, name: &str, capability: &str, seen: &mut HashSet<String>) -> bool {
        if !seen.insert(name.to_string()) {
            return false;
        }
        self.types
            .iter()
            .filter(|t| t.name == name)
            .flat_map(|t| t.supertypes.iter())
            .any(|s| s == capability || self.implements_from(s, capability, seen))
    }
}

/// Resolve a type name as written in `file` to a qualified name.
fn qualify(name: &str, file: &JavaFile) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    if let Some(qualified) = file.imported_types.get(name) {
        return qualified.clone();
    }
    if file.package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", file.package, name)
    }
}

/// Every qualified name a supertype written in `file` may refer to.
///
/// A simple name that no single-type import covers resolves to the file's
/// own package or to any package imported on demand.
fn supertype_candidates(name: &str, file: &JavaFile) -> Vec<String> {
    let qualified = qualify(name, file);
    if name.contains('.') || file.imported_types.contains_key(name) {
        return vec![qualified];
    }

    let mut candidates = vec![qualified];
    candidates.extend(
        file.on_demand_imports
            .iter()
            .map(|package| format!("{}.{}", package, name)),
    );
    candidates
}

impl TypeIndex for JavaSourceIndex {
    fn find_types(&self, qualified_name: &str) -> Option<Vec<String>> {
        Some(
            self.types
                .iter()
                .filter(|t| t.name == qualified_name)
                .map(|t| t.name.clone())
                .collect(),
        )
    }

    fn implements(&self, qualified_name: &str, capability: &str) -> Option<bool> {
        Some(self.implements_from(qualified_name, capability, &mut HashSet::new()))
    }

    fn referenced_packages(&self) -> Option<BTreeSet<String>> {
        Some(self.referenced.clone())
    }

    fn own_packages(&self) -> Option<BTreeSet<String>> {
        Some(self.own.clone())
    }

    fn exportable_packages(&self) -> Option<BTreeSet<String>> {
        Some(
            self.types
                .iter()
                .filter(|t| !t.package.is_empty())
                .map(|t| t.package.clone())
                .collect(),
        )
    }
}

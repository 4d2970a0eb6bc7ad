//! Collaborator interfaces the validator reads project facts through.
//!
//! Every query returns `None` when the information is not available (for
//! example because the project has not been scanned); checks that depend on
//! it are then skipped.

use std::collections::BTreeSet;

/// Capability an activator class must implement.
pub const ACTIVATOR_CAPABILITY: &str = "org.osgi.framework.BundleActivator";

/// Types and packages of a project's source.
pub trait TypeIndex {
    /// Types declared in the project with exactly this qualified name.
    fn find_types(&self, qualified_name: &str) -> Option<Vec<String>>;

    /// Whether a project type implements the capability, directly or through
    /// its supertypes.
    fn implements(&self, qualified_name: &str, capability: &str) -> Option<bool>;

    /// Packages the project's source references.
    fn referenced_packages(&self) -> Option<BTreeSet<String>>;

    /// Packages the project's source declares.
    fn own_packages(&self) -> Option<BTreeSet<String>>;

    /// Packages the project could export.
    fn exportable_packages(&self) -> Option<BTreeSet<String>>;
}

/// Contents that end up packaged in the bundle.
pub trait PackagedResources {
    /// Whether a bundle-relative path is packaged.
    fn contains(&self, path: &str) -> Option<bool>;
}

/// A type index that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeIndex;

impl TypeIndex for NoTypeIndex {
    fn find_types(&self, _qualified_name: &str) -> Option<Vec<String>> {
        None
    }

    fn implements(&self, _qualified_name: &str, _capability: &str) -> Option<bool> {
        None
    }

    fn referenced_packages(&self) -> Option<BTreeSet<String>> {
        None
    }

    fn own_packages(&self) -> Option<BTreeSet<String>> {
        None
    }

    fn exportable_packages(&self) -> Option<BTreeSet<String>> {
        None
    }
}

/// A resource map that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl PackagedResources for NoResources {
    fn contains(&self, _path: &str) -> Option<bool> {
        None
    }
}

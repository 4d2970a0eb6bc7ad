//! Package sources.
//!
//! Sources report which packages a resource exports: the framework
//! distribution, system packages, other workspace projects, external bundle
//! files and the project's own exports.

pub mod bundle;
pub mod framework;
pub mod project;
pub mod registry;
pub mod source;
pub mod system;

pub use bundle::BundleJarSource;
pub use framework::FrameworkSource;
pub use project::ProjectSource;
pub use registry::{SourceProvider, SourceRegistry, SourceSpec};
pub use source::{PackageSource, SourceKind};
pub use system::{OwnExportsSource, SystemPackagesSource};

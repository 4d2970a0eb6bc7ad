//! Manifest editing session.
//!
//! An editor owns the current manifest snapshot. Every edit replaces the
//! snapshot and notifies the registered observers with the new one.

use crate::core::manifest::ManifestModel;

type Observer = Box<dyn Fn(&ManifestModel)>;

/// Owner of the current manifest snapshot.
pub struct ManifestEditor {
    current: ManifestModel,
    committed: String,
    observers: Vec<Observer>,
}

impl ManifestEditor {
    /// Start editing the given manifest.
    pub fn new(model: ManifestModel) -> Self {
        let committed = model.text().to_string();
        ManifestEditor {
            current: model,
            committed,
            observers: Vec::new(),
        }
    }

    /// Register a callback invoked after every edit that changes the text.
    pub fn subscribe(&mut self, observer: impl Fn(&ManifestModel) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The current snapshot.
    pub fn current(&self) -> &ManifestModel {
        &self.current
    }

    /// Apply an edit producing a new snapshot.
    pub fn apply<F>(&mut self, edit: F) -> &ManifestModel
    where
        F: FnOnce(&ManifestModel) -> ManifestModel,
    {
        let next = edit(&self.current);
        if next != self.current {
            self.current = next;
            for observer in &self.observers {
                observer(&self.current);
            }
        }
        &self.current
    }

    /// Shorthand for [`ManifestModel::set_attribute`].
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> &ManifestModel {
        self.apply(|m| m.set_attribute(name, value))
    }

    /// Whether the snapshot differs from the last committed text.
    pub fn is_dirty(&self) -> bool {
        self.current.text() != self.committed
    }

    /// Mark the current snapshot as committed and return its text.
    pub fn commit(&mut self) -> String {
        self.committed = self.current.text().to_string();
        self.committed.clone()
    }
}

impl std::fmt::Debug for ManifestEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestEditor")
            .field("dirty", &self.is_dirty())
            .field("observers", &self.observers.len())
            .finish()
    }
}

//! Mutable context shared by every nesting level of one run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::core::error::ErrorKind;

/// How the finalizer removes a registered macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    /// `#ifdef N` / `#undef N` / `#endif`
    Guarded,
    /// Bare `#undef N`; the macro is known to be defined
    Unconditional,
}

#[derive(Debug)]
pub struct UnitState {
    project_name: Option<String>,
    namespace: Option<String>,
    include_root: PathBuf,
    included_once: HashSet<String>,
    undef_registry: IndexMap<String, Cleanup>,
}

impl UnitState {
    pub fn new(project_name: Option<String>, include_root: impl Into<PathBuf>) -> Self {
        Self {
            project_name,
            namespace: None,
            include_root: include_root.into(),
            included_once: HashSet::new(),
            undef_registry: IndexMap::new(),
        }
    }

    pub fn set_project_name(&mut self, name: &str) {
        self.project_name = Some(name.to_string());
    }

    pub fn set_namespace(&mut self, namespace: &str) {
        self.namespace = Some(namespace.to_string());
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn require_project_name(&self) -> Result<&str, ErrorKind> {
        self.project_name().ok_or(ErrorKind::ProjectNameNotSet)
    }

    pub fn require_namespace(&self) -> Result<&str, ErrorKind> {
        self.namespace().ok_or(ErrorKind::NamespaceNotSet)
    }

    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    /// Record `path` for include-once; false if it was seen before.
    /// Keyed on the literal argument, not a canonical path.
    pub fn mark_included_once(&mut self, path: &str) -> bool {
        self.included_once.insert(path.to_string())
    }

    /// `Unconditional` promotes an existing entry, `Guarded` never demotes one.
    pub fn register_undef(&mut self, name: &str, cleanup: Cleanup) {
        self.undef_registry
            .entry(name.to_string())
            .and_modify(|c| {
                if cleanup == Cleanup::Unconditional {
                    *c = Cleanup::Unconditional;
                }
            })
            .or_insert(cleanup);
    }

    pub fn keep_defined(&mut self, name: &str) {
        self.undef_registry.shift_remove(name);
    }

    pub fn undef_registry(&self) -> impl Iterator<Item = (&str, Cleanup)> {
        self.undef_registry
            .iter()
            .map(|(name, cleanup)| (name.as_str(), *cleanup))
    }
}

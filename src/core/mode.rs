//! Generation modes and the directive scopes built on them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selects which directives are legal and how `@`-tokens expand.
/// Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Names go through `<project>_NAME(..)` indirection
    Project,
    /// Names are `<namespace>_IDENT`
    Namespace,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Project => f.write_str("project"),
            Mode::Namespace => f.write_str("namespace"),
        }
    }
}

/// Where a directive may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Any,
    Only(Mode),
}

impl Scope {
    pub fn permits(self, mode: Mode) -> bool {
        match self {
            Scope::Any => true,
            Scope::Only(m) => m == mode,
        }
    }
}

//! Error taxonomy for the preprocessing engine.
//!
//! Every failure is fatal for the run. [`ErrorKind`] says what went wrong,
//! [`PreprocessError`] adds where (input name and line) once, at the
//! innermost point of detection.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::core::mode::Mode;

/// Argument count a directive accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Arity::None => n == 0,
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::None => f.write_str("no arguments"),
            Arity::Exactly(1) => f.write_str("exactly 1 argument"),
            Arity::Exactly(n) => write!(f, "exactly {n} arguments"),
            Arity::AtLeast(1) => f.write_str("at least one argument"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("{directive} must take {expected} (got {got})")]
    Arity {
        directive: &'static str,
        expected: Arity,
        got: usize,
    },

    #[error("directive \"{directive}\" is not supported in {mode} mode")]
    DirectiveMode { directive: String, mode: Mode },

    #[error("expansion \"@{sigil}\" is not supported in {mode} mode")]
    SigilMode { sigil: char, mode: Mode },

    #[error("unknown directive \"{0}\"")]
    UnknownDirective(String),

    #[error("unknown expansion \"@~{0}\"")]
    UnknownExpansion(String),

    #[error("project name was not set (\"@@project\" directive)")]
    ProjectNameNotSet,

    #[error("namespace was not set (\"@@namespace\" directive)")]
    NamespaceNotSet,

    #[error("unexpected macro format, expected \"#define NAME ...\": {0}")]
    MalformedMacro(String),

    #[error("unexpected macro name \"{name}\" ({reason})")]
    UnexpectedMacroName { name: String, reason: &'static str },

    #[error("unexpected end of input while reading a macro")]
    UnexpectedEof,

    #[error("trying to save #ifdef of macro \"{0}\" into itself")]
    SaveIntoItself(String),

    #[error("cannot open include file \"{}\"", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output")]
    Write(#[source] io::Error),
}

/// Input position an error was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub line: usize,
}

#[derive(Debug)]
pub struct PreprocessError {
    kind: ErrorKind,
    location: Option<Location>,
}

impl PreprocessError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Attach a location unless one is already recorded.
    pub fn at(mut self, name: &str, line: usize) -> Self {
        if self.location.is_none() {
            self.location = Some(Location {
                name: name.to_string(),
                line,
            });
        }
        self
    }
}

impl From<ErrorKind> for PreprocessError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}:{}: {}", loc.name, loc.line, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for PreprocessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

pub type Result<T, E = PreprocessError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_accepts_counts() {
        assert!(Arity::None.accepts(0));
        assert!(!Arity::None.accepts(1));
        assert!(Arity::Exactly(1).accepts(1));
        assert!(!Arity::Exactly(1).accepts(2));
        assert!(Arity::AtLeast(1).accepts(3));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn arity_message_names_directive() {
        let err = ErrorKind::Arity {
            directive: "@@temp",
            expected: Arity::None,
            got: 2,
        };
        assert_eq!(err.to_string(), "@@temp must take no arguments (got 2)");
    }

    #[test]
    fn first_location_wins() {
        let err = PreprocessError::from(ErrorKind::UnexpectedEof)
            .at("inner.h", 3)
            .at("outer.c", 10);
        let loc = err.location().expect("location");
        assert_eq!(loc.name, "inner.h");
        assert_eq!(loc.line, 3);
        assert_eq!(
            err.to_string(),
            "inner.h:3: unexpected end of input while reading a macro"
        );
    }
}

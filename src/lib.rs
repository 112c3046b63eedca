//! **atpp** - line-oriented front end for the C preprocessor
//!
//! Expands `@`-prefixed names into project- or namespace-prefixed
//! identifiers, turns `@@` directives into guard/define/undef boilerplate,
//! and undefines every scoped helper macro at the end of the unit.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Preprocessing engine
pub mod core {
    /// Project vs. namespace mode and directive scopes
    pub mod mode;
    pub use mode::{Mode, Scope};

    /// Error taxonomy with input locations
    pub mod error;
    pub use error::{ErrorKind, PreprocessError};

    /// Run-wide state: identifiers, include-once set, undef registry
    pub mod state;
    pub use state::{Cleanup, UnitState};

    /// `@`-token substitution
    pub mod subst;

    /// `#define` capture with backslash continuations
    pub mod macro_reader;

    /// Static `@@` directive table and handlers
    pub mod directives;

    /// Line loop, inclusion and finalizer
    pub mod engine;
    pub use engine::Preprocessor;

    /// Settings resolution and top-level run
    pub mod driver;
    pub use driver::{Settings, process, process_str, run};
}

/// Infrastructure - configuration and line I/O
pub mod infra {
    /// Layered configuration (file + ATPP_ environment)
    pub mod config;
    pub use config::{Config, load_config};

    /// Line sources and sinks over readers/writers
    pub mod io;
    pub use io::{LineSink, LineSource, ReaderSource, WriterSink};
}

pub use crate::cli::{AppContext, Cli};
pub use crate::core::{Mode, PreprocessError, Settings, process, process_str};

//! The line loop: routes each input line to the directive table, the
//! verbatim passthrough, or token substitution, and runs the finalizer
//! for the outermost unit.

use tracing::{debug, instrument};

use crate::core::directives;
use crate::core::error::{ErrorKind, PreprocessError, Result};
use crate::core::macro_reader::{self, LeadingSigil, Macro};
use crate::core::mode::Mode;
use crate::core::state::{Cleanup, UnitState};
use crate::core::subst;
use crate::infra::io::{LineSink, LineSource};

const DIRECTIVE_PREFIX: &str = "@@";
const VERBATIM_PREFIX: &str = "@=";

/// One nesting level of a run. Nested inclusions get their own source
/// and borrow the same sink and unit state.
pub struct Preprocessor<'a> {
    mode: Mode,
    source: &'a mut dyn LineSource,
    sink: &'a mut dyn LineSink,
    unit: &'a mut UnitState,
}

impl<'a> Preprocessor<'a> {
    pub fn new(
        mode: Mode,
        source: &'a mut dyn LineSource,
        sink: &'a mut dyn LineSink,
        unit: &'a mut UnitState,
    ) -> Self {
        Self {
            mode,
            source,
            sink,
            unit,
        }
    }

    pub fn unit(&self) -> &UnitState {
        &*self.unit
    }

    pub fn unit_mut(&mut self) -> &mut UnitState {
        &mut *self.unit
    }

    /// Process every remaining line, then finalize if asked to.
    #[instrument(skip(self), fields(input = %self.source.name()))]
    pub fn run(&mut self, finalize: bool) -> Result<()> {
        while let Some(line) = self.source.read_line().map_err(|e| self.locate(e))? {
            self.process_line(&line).map_err(|e| self.locate(e))?;
        }
        if finalize {
            self.finalize().map_err(|e| self.locate(e))?;
        }
        Ok(())
    }

    fn locate(&self, err: impl Into<PreprocessError>) -> PreprocessError {
        err.into()
            .at(self.source.name(), self.source.line_number())
    }

    fn process_line(&mut self, line: &str) -> Result<()> {
        if line.trim_start().starts_with(DIRECTIVE_PREFIX) {
            let mut words = line.split_whitespace();
            let keyword = words.next().unwrap_or(DIRECTIVE_PREFIX);
            let args: Vec<&str> = words.collect();
            return self.dispatch(keyword, &args);
        }

        if let Some(rest) = line.strip_prefix(VERBATIM_PREFIX) {
            return self.emit(rest);
        }

        let substituted = self.substitute(line)?;
        self.emit(&substituted)
    }

    fn dispatch(&mut self, keyword: &str, args: &[&str]) -> Result<()> {
        let directive = directives::lookup(keyword)
            .ok_or_else(|| ErrorKind::UnknownDirective(keyword.to_string()))?;
        if !directive.scope.permits(self.mode) {
            return Err(ErrorKind::DirectiveMode {
                directive: keyword.to_string(),
                mode: self.mode,
            }
            .into());
        }
        debug!(directive = keyword, ?args, "dispatch");
        (directive.handler)(self, args)
    }

    pub fn substitute(&self, line: &str) -> Result<String, ErrorKind> {
        subst::substitute(line, self.mode, mode_ident(self.mode, &*self.unit))
    }

    pub fn emit(&mut self, text: &str) -> Result<()> {
        self.sink.emit(text)?;
        Ok(())
    }

    pub fn register_undef(&mut self, name: &str, cleanup: Cleanup) {
        self.unit.register_undef(name, cleanup);
    }

    pub fn read_macro(&mut self, leading: LeadingSigil) -> Result<Macro> {
        let mode = self.mode;
        let ident = mode_ident(mode, &*self.unit);
        let m = macro_reader::read_macro(&mut *self.source, leading, |line| {
            subst::substitute(line, mode, ident)
        })?;
        Ok(m)
    }

    /// Process another source with the same sink and unit state, without finalizing.
    pub fn include(&mut self, source: &mut dyn LineSource) -> Result<()> {
        Preprocessor::new(self.mode, source, &mut *self.sink, &mut *self.unit).run(false)
    }

    /// Undefine every registered macro, in registration order.
    pub fn finalize(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .unit
            .undef_registry()
            .map(|(name, cleanup)| match cleanup {
                Cleanup::Unconditional => format!("#undef {name}"),
                Cleanup::Guarded => format!("#ifdef {name}\n#undef {name}\n#endif"),
            })
            .collect();
        debug!(count = lines.len(), "finalize");
        for line in &lines {
            self.emit(line)?;
        }
        Ok(())
    }
}

/// Identifier `mode` substitutes with.
fn mode_ident(mode: Mode, unit: &UnitState) -> Option<&str> {
    match mode {
        Mode::Project => unit.project_name(),
        Mode::Namespace => unit.namespace(),
    }
}

//! Reads one `#define` (plus its backslash continuations) on behalf of a directive.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::ErrorKind;
use crate::infra::io::LineSource;

/// Placeholder a macro name may start with, replaced by the namespace.
pub const SIGIL: char = '@';

static MACRO_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s*define\s*(@?[A-Za-z_][A-Za-z0-9_]*)").expect("valid macro head pattern")
});

/// Whether the macro name must carry a leading [`SIGIL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadingSigil {
    Forbidden,
    Required,
}

/// A macro as read from input; the body includes the `#define` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub body: String,
}

/// Read a macro from `source`, passing each physical line through `subst`
/// before the lines are joined with `\n`.
pub fn read_macro<F>(
    source: &mut dyn LineSource,
    leading: LeadingSigil,
    mut subst: F,
) -> Result<Macro, ErrorKind>
where
    F: FnMut(&str) -> Result<String, ErrorKind>,
{
    let mut line = source.read_line()?.ok_or(ErrorKind::UnexpectedEof)?;

    let name = MACRO_HEAD
        .captures(&line)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ErrorKind::MalformedMacro(line.clone()))?;

    match (leading, name.starts_with(SIGIL)) {
        (LeadingSigil::Forbidden, true) => {
            return Err(ErrorKind::UnexpectedMacroName {
                name,
                reason: "starts with \"@\"",
            });
        }
        (LeadingSigil::Required, false) => {
            return Err(ErrorKind::UnexpectedMacroName {
                name,
                reason: "does not start with \"@\"",
            });
        }
        _ => {}
    }

    let mut body = Vec::new();
    loop {
        let continued = line.ends_with('\\');
        body.push(subst(&line)?);
        if !continued {
            break;
        }
        line = source.read_line()?.ok_or(ErrorKind::UnexpectedEof)?;
    }

    Ok(Macro {
        name,
        body: body.join("\n"),
    })
}

//! `@`-token substitution.
//!
//! `@~IDENT` expands to a fixed storage/attribute specifier, `@#IDENT` to
//! `<project>_IDENT` and a bare `@IDENT` to `<project>_NAME(IDENT)` in
//! project mode or `<namespace>_IDENT` in namespace mode. A lone `@` with
//! no identifier after it is left as is.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::ErrorKind;
use crate::core::mode::Mode;

static AT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([~#]?)([A-Za-z_][A-Za-z0-9_]*)").expect("valid @-token pattern")
});

const EXPANSIONS: &[(&str, &str)] = &[
    ("force_inline", "static inline __attribute__((unused, always_inline))"),
    ("inline", "static inline __attribute__((unused))"),
    ("no_inline", "static __attribute__((unused))"),
    ("force_no_inline", "static __attribute__((unused, noinline))"),
];

pub fn expansion(name: &str) -> Option<&'static str> {
    EXPANSIONS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

/// Substitute every `@`-token in `line`.
///
/// `ident` is the project name in project mode and the namespace in
/// namespace mode; it is only consulted when a token needs it.
pub fn substitute(line: &str, mode: Mode, ident: Option<&str>) -> Result<String, ErrorKind> {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;

    for caps in AT_TOKEN.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let sigil = caps.get(1).map_or("", |m| m.as_str());
        let token = &caps[2];

        out.push_str(&line[last..whole.start()]);
        expand_token(&mut out, sigil, token, mode, ident)?;
        last = whole.end();
    }

    out.push_str(&line[last..]);
    Ok(out)
}

fn expand_token(
    out: &mut String,
    sigil: &str,
    token: &str,
    mode: Mode,
    ident: Option<&str>,
) -> Result<(), ErrorKind> {
    if sigil == "~" {
        let value = expansion(token).ok_or_else(|| ErrorKind::UnknownExpansion(token.to_string()))?;
        out.push_str(value);
        return Ok(());
    }

    match mode {
        Mode::Project => {
            let project = ident.ok_or(ErrorKind::ProjectNameNotSet)?;
            if sigil == "#" {
                out.push_str(&format!("{project}_{token}"));
            } else {
                out.push_str(&format!("{project}_NAME({token})"));
            }
        }
        Mode::Namespace => {
            if let Some(sigil) = sigil.chars().next() {
                return Err(ErrorKind::SigilMode { sigil, mode });
            }
            let namespace = ident.ok_or(ErrorKind::NamespaceNotSet)?;
            out.push_str(&format!("{namespace}_{token}"));
        }
    }
    Ok(())
}

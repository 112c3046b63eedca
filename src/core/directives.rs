//! The `@@` directive table and its handlers.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::LazyLock;

use tracing::{info, trace};

use crate::core::engine::Preprocessor;
use crate::core::error::{Arity, ErrorKind, Result};
use crate::core::macro_reader::{LeadingSigil, SIGIL};
use crate::core::mode::{Mode, Scope};
use crate::core::state::Cleanup;
use crate::infra::io::ReaderSource;

pub type Handler = fn(&mut Preprocessor<'_>, &[&str]) -> Result<()>;

pub struct Directive {
    pub scope: Scope,
    pub handler: Handler,
}

const BOILERPLATE_SUFFIXES: [&str; 6] = [
    "PREFIX",
    "CAT1",
    "CAT",
    "NAME",
    "STRINGIFY1",
    "STRINGIFY",
];

static DIRECTIVES: LazyLock<HashMap<&'static str, Directive>> = LazyLock::new(|| {
    let project = Scope::Only(Mode::Project);
    let namespace = Scope::Only(Mode::Namespace);
    let table: [(&'static str, Scope, Handler); 13] = [
        ("@@project", project, set_project),
        ("@@namespace", namespace, set_namespace),
        ("@@boilerplate", project, boilerplate),
        ("@@include", Scope::Any, include),
        ("@@include_once", Scope::Any, include_once),
        ("@@permanent", project, permanent),
        ("@@require", project, require),
        ("@@config", project, config),
        ("@@config_save", project, config_save),
        ("@@temp", project, temp),
        ("@@ntemp", namespace, ntemp),
        ("@@keep", project, keep),
        ("@@undef", project, undef),
    ];
    table
        .into_iter()
        .map(|(keyword, scope, handler)| (keyword, Directive { scope, handler }))
        .collect()
});

pub fn lookup(keyword: &str) -> Option<&'static Directive> {
    DIRECTIVES.get(keyword)
}

fn check_arity(directive: &'static str, args: &[&str], expected: Arity) -> Result<()> {
    if expected.accepts(args.len()) {
        Ok(())
    } else {
        Err(ErrorKind::Arity {
            directive,
            expected,
            got: args.len(),
        }
        .into())
    }
}

fn set_project(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@project", args, Arity::Exactly(1))?;
    pp.unit_mut().set_project_name(args[0]);
    Ok(())
}

fn set_namespace(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@namespace", args, Arity::Exactly(1))?;
    pp.unit_mut().set_namespace(args[0]);
    Ok(())
}

fn boilerplate(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@boilerplate", args, Arity::None)?;
    let p = pp.unit().require_project_name()?.to_string();

    pp.emit(&format!("#ifndef {p}_PREFIX"))?;
    pp.emit(&format!("#error \"You must define {p}_PREFIX.\""))?;
    pp.emit("#endif")?;

    pp.emit(&format!("#define {p}_CAT1(X_, Y_) X_ ## _ ## Y_"))?;
    pp.emit(&format!("#define {p}_CAT(X_, Y_) {p}_CAT1(X_, Y_)"))?;
    pp.emit(&format!("#define {p}_NAME(Suffix_) {p}_CAT({p}_PREFIX, Suffix_)"))?;

    pp.emit(&format!("#define {p}_STRINGIFY1(X_) #X_"))?;
    pp.emit(&format!("#define {p}_STRINGIFY(X_) {p}_STRINGIFY1(X_)"))?;

    for suffix in BOILERPLATE_SUFFIXES {
        pp.register_undef(&format!("{p}_{suffix}"), Cleanup::Unconditional);
    }
    Ok(())
}

fn include(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@include", args, Arity::Exactly(1))?;
    include_file(pp, args[0])
}

fn include_once(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@include_once", args, Arity::Exactly(1))?;
    if !pp.unit_mut().mark_included_once(args[0]) {
        trace!(path = args[0], "already included, skipping");
        return Ok(());
    }
    include_file(pp, args[0])
}

fn include_file(pp: &mut Preprocessor<'_>, arg: &str) -> Result<()> {
    let path = pp.unit().include_root().join(arg);
    info!(path = %path.display(), "including");
    let file = File::open(&path).map_err(|source| ErrorKind::Open {
        path: path.clone(),
        source,
    })?;
    let mut source = ReaderSource::new(BufReader::new(file), path.display().to_string());
    pp.include(&mut source)
}

fn permanent(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@permanent", args, Arity::None)?;
    let m = pp.read_macro(LeadingSigil::Forbidden)?;

    pp.emit(&format!("#ifdef {}", m.name))?;
    pp.emit(&format!("#undef {}", m.name))?;
    pp.emit("#endif")?;
    pp.emit(&m.body)
}

fn require(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@require", args, Arity::Exactly(1))?;
    let name = args[0];

    pp.emit(&format!("#ifndef {name}"))?;
    pp.emit(&format!("#error \"You must define {name}.\""))?;
    pp.emit("#endif")?;

    pp.register_undef(name, Cleanup::Guarded);
    Ok(())
}

fn config(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@config", args, Arity::None)?;
    let m = pp.read_macro(LeadingSigil::Forbidden)?;

    pp.emit(&format!("#ifndef {}", m.name))?;
    pp.emit(&m.body)?;
    pp.emit("#endif")?;

    pp.register_undef(&m.name, Cleanup::Guarded);
    Ok(())
}

fn config_save(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@config_save", args, Arity::Exactly(1))?;
    let dest = args[0];
    let m = pp.read_macro(LeadingSigil::Forbidden)?;

    if m.name == dest {
        return Err(ErrorKind::SaveIntoItself(dest.to_string()).into());
    }

    pp.emit(&format!("#ifdef {}", m.name))?;
    pp.emit(&format!("#define {dest} 1"))?;
    pp.emit("#else")?;
    pp.emit(&format!("#define {dest} 0"))?;
    pp.emit(&m.body)?;
    pp.emit("#endif")?;

    pp.register_undef(&m.name, Cleanup::Guarded);
    pp.register_undef(dest, Cleanup::Guarded);
    Ok(())
}

fn temp(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@temp", args, Arity::None)?;
    let m = pp.read_macro(LeadingSigil::Forbidden)?;
    pp.emit(&m.body)?;
    pp.register_undef(&m.name, Cleanup::Guarded);
    Ok(())
}

fn ntemp(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@ntemp", args, Arity::None)?;
    let m = pp.read_macro(LeadingSigil::Required)?;

    let namespace = pp.unit().require_namespace()?;
    let actual = format!("{namespace}{}", &m.name[SIGIL.len_utf8()..]);

    pp.emit(&m.body)?;
    pp.register_undef(&actual, Cleanup::Guarded);
    Ok(())
}

fn keep(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@keep", args, Arity::AtLeast(1))?;
    for name in args {
        pp.unit_mut().keep_defined(name);
    }
    Ok(())
}

fn undef(pp: &mut Preprocessor<'_>, args: &[&str]) -> Result<()> {
    check_arity("@@undef", args, Arity::AtLeast(1))?;
    for name in args {
        pp.register_undef(name, Cleanup::Guarded);
    }
    Ok(())
}

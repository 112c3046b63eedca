//! Library-level checks of whole units through `process_str`.

use std::fs;

use atpp::core::ErrorKind;
use atpp::{Mode, Settings, process_str};

fn project(name: &str) -> Settings {
    Settings {
        project_name: Some(name.to_string()),
        ..Settings::default()
    }
}

#[test]
fn project_mode_token_forms() {
    let out = process_str("@#Foo @Foo\n", &project("Widget")).unwrap();
    assert_eq!(out, "Widget_Foo Widget_NAME(Foo)\n");
}

#[test]
fn boilerplate_finalizes_six_unconditional_undefs() {
    let out = process_str("@@boilerplate\n", &project("P")).unwrap();
    let tail: Vec<&str> = out.lines().rev().take(6).collect();
    assert_eq!(
        tail,
        vec![
            "#undef P_STRINGIFY",
            "#undef P_STRINGIFY1",
            "#undef P_NAME",
            "#undef P_CAT",
            "#undef P_CAT1",
            "#undef P_PREFIX",
        ]
    );
    assert!(out.starts_with("#ifndef P_PREFIX\n"));
}

#[test]
fn keep_after_registration_drops_cleanup() {
    let input = "@@config\n#define DEPTH 3\n@@keep DEPTH\n";
    let out = process_str(input, &project("P")).unwrap();
    assert_eq!(out, "#ifndef DEPTH\n#define DEPTH 3\n#endif\n");
}

#[test]
fn three_line_macro_body_is_one_block() {
    let input = "@@temp\n#define SUM(a, b) \\\n    @add(a, \\\n         b)\nafter\n";
    let out = process_str(input, &project("W")).unwrap();
    assert_eq!(
        out,
        "#define SUM(a, b) \\\n    W_NAME(add)(a, \\\n         b)\nafter\n#ifdef SUM\n#undef SUM\n#endif\n"
    );
}

#[test]
fn include_once_keys_on_literal_argument() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/part.h"), "PART\n").unwrap();

    let settings = Settings {
        include_root: dir.path().to_path_buf(),
        ..project("P")
    };
    let input = "@@include_once sub/part.h\n@@include_once sub/./part.h\n@@include_once sub/part.h\n";
    let out = process_str(input, &settings).unwrap();
    assert_eq!(out, "PART\nPART\n");
}

#[test]
fn error_in_included_file_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inner.h"), "@@config_save X\n#define X 1\n").unwrap();

    let settings = Settings {
        include_root: dir.path().to_path_buf(),
        ..project("P")
    };
    let err = process_str("@@include inner.h\nnever\n", &settings).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::SaveIntoItself(n) if n == "X"));
    assert!(err.to_string().contains("inner.h:2:"));
}

#[test]
fn namespace_directives_rejected_in_project_mode() {
    let err = process_str("@@ntemp\n", &project("P")).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DirectiveMode { mode: Mode::Project, .. }));
}

#[test]
fn namespace_unit_without_namespace_fails() {
    let settings = Settings {
        mode: Mode::Namespace,
        ..Settings::default()
    };
    let err = process_str("int @x;\n", &settings).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NamespaceNotSet));
}

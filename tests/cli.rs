use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

// Helper: a small project unit with an include-once header and a
// boilerplate block, laid out under an include root.
fn make_fixture() -> assert_fs::TempDir {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("inc/common.h")
        .write_str("@@require HAVE_STDINT\ntypedef int @#word;\n")
        .expect("write common.h");
    tmp.child("unit.c.at")
        .write_str(
            "@@project Widget\n\
             @@boilerplate\n\
             @@include_once common.h\n\
             @@include_once common.h\n\
             @~inline int @len(void);\n",
        )
        .expect("write unit.c.at");
    tmp
}

fn atpp() -> Command {
    let mut cmd = Command::cargo_bin("atpp").expect("bin");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn processes_file_to_stdout() {
    let tmp = make_fixture();

    atpp()
        .current_dir(tmp.path())
        .args(["unit.c.at", "--include-root", "inc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#error \"You must define Widget_PREFIX.\""))
        .stdout(predicate::str::contains(
            "static inline __attribute__((unused)) int Widget_NAME(len)(void);",
        ))
        .stdout(predicate::str::contains("typedef int Widget_word;").count(1))
        .stdout(predicate::str::contains("#undef Widget_STRINGIFY\n"))
        .stdout(predicate::str::contains("#ifdef HAVE_STDINT\n#undef HAVE_STDINT\n#endif\n"));
}

#[test]
fn writes_output_file() {
    let tmp = make_fixture();

    atpp()
        .current_dir(tmp.path())
        .args(["unit.c.at", "out.c", "-I", "inc"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    tmp.child("out.c")
        .assert(predicate::str::contains("#define Widget_CAT1(X_, Y_) X_ ## _ ## Y_"));
}

#[test]
fn reads_stdin_when_no_input_given() {
    atpp()
        .args(["--project-name", "P"])
        .write_stdin("x = @#y;\n@=keep @this\n")
        .assert()
        .success()
        .stdout("x = P_y;\nkeep @this\n");
}

#[test]
fn no_finalize_suppresses_undef_block() {
    atpp()
        .args(["--no-finalize"])
        .write_stdin("@@undef FOO\n")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn namespace_mode_with_project_name_fails_before_processing() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    atpp()
        .current_dir(tmp.path())
        .args(["--namespace-mode", "--project-name", "P", "missing.c", "out.c"])
        .assert()
        .failure();

    tmp.child("out.c").assert(predicate::path::missing());
}

#[test]
fn config_conflict_fails_before_processing() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("atpp.toml")
        .write_str("namespace_mode = true\n")
        .expect("write config");

    atpp()
        .current_dir(tmp.path())
        .args(["--project-name", "P"])
        .write_stdin("@#x\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("incompatible"));
}

#[test]
fn config_file_supplies_project_name() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("atpp.toml")
        .write_str("project_name = \"Cfg\"\n")
        .expect("write config");

    atpp()
        .current_dir(tmp.path())
        .write_stdin("@Foo\n")
        .assert()
        .success()
        .stdout("Cfg_NAME(Foo)\n");
}

#[test]
fn error_reports_location_and_exits_nonzero() {
    atpp()
        .write_stdin("@@project P\n@@keep\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: <stdin>:2: @@keep must take at least one argument",
        ));
}

#[test]
fn unknown_expansion_fails() {
    atpp()
        .write_stdin("@~sometimes\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown expansion \"@~sometimes\""));
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = make_fixture();

    atpp()
        .current_dir(tmp.path())
        .args(["unit.c.at", "out.c", "-I", "inc", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unit.c.at: ok"));

    tmp.child("out.c").assert(predicate::path::missing());
}

#[test]
fn print_config_shows_resolved_settings() {
    atpp()
        .args(["--namespace-mode", "--no-finalize", "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode = \"namespace\""))
        .stdout(predicate::str::contains("finalize = false"));
}

#[test]
fn completions_are_generated() {
    atpp()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("atpp"));
}

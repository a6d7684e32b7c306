//! Include resolution: search order, splicing, and shared registries.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use zenith_methods::Registry;
use zenith_script::{ParseErrorKind, Parser, SourceText};
use zenith_workspace::Agenda;

fn method_names(registry: &Registry, agenda: &Agenda) -> Vec<String> {
    agenda
        .invocations
        .iter()
        .map(|inv| registry.methods.name(inv.method).to_string())
        .collect()
}

#[test]
fn included_programs_splice_in_call_order() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("setup.zen"),
        "Zenith {\n  VectorCreate(v)\n}\n",
    )
    .unwrap();

    let mut registry = Registry::standard().unwrap();
    let src = SourceText::new(
        "main.zen",
        r#"
        Zenith {
            INCLUDE "setup"
            VectorSet(v, 2, 1.0)
        }
        "#,
    );
    let include_dirs = vec![dir.path().to_path_buf()];
    let agenda = Parser::new(src, &mut registry, &include_dirs)
        .parse()
        .expect("script should parse");

    // The included body lands before the calls that follow it, and v
    // registered by the include is visible to the enclosing script.
    assert_eq!(
        method_names(&registry, &agenda),
        vec![
            "VectorCreate",
            "IndexAssign",
            "NumericAssign",
            "VectorSet",
            "Delete_for_Index",
            "Delete_for_Numeric",
        ]
    );
}

#[test]
fn includes_resolve_against_the_including_file_first() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("outer.zen"),
        "Zenith {\n  INCLUDE \"inner\"\n  IndexCreate(i)\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("inner.zen"),
        "Zenith {\n  NumericCreate(x)\n}\n",
    )
    .unwrap();

    let mut registry = Registry::standard().unwrap();
    let src = SourceText::new("main.zen", "Zenith { INCLUDE \"outer\" }");
    let include_dirs = vec![dir.path().to_path_buf()];
    let agenda = Parser::new(src, &mut registry, &include_dirs)
        .parse()
        .expect("script should parse");

    // "inner" was found next to outer.zen, not next to main.zen.
    assert_eq!(
        method_names(&registry, &agenda),
        vec!["NumericCreate", "IndexCreate"]
    );
}

#[test]
fn a_missing_include_names_the_searched_paths() {
    let dir = tempdir().unwrap();
    let mut registry = Registry::standard().unwrap();
    let src = SourceText::new("main.zen", "Zenith { INCLUDE \"nosuch\" }");
    let include_dirs = vec![dir.path().to_path_buf()];
    let err = Parser::new(src, &mut registry, &include_dirs)
        .parse()
        .expect_err("the include must fail");

    assert_eq!(err.kind, ParseErrorKind::IncludeNotFound);
    assert!(
        err.message.starts_with("cannot find include file nosuch (searched: "),
        "{}",
        err.message
    );
    let expected = dir.path().join("nosuch.zen");
    assert!(
        err.message.contains(&expected.display().to_string()),
        "{}",
        err.message
    );
}

#[test]
fn an_include_must_be_a_complete_script() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.zen"), "VectorCreate(v)\n").unwrap();

    let mut registry = Registry::standard().unwrap();
    let src = SourceText::new("main.zen", "Zenith { INCLUDE \"broken\" }");
    let include_dirs = vec![dir.path().to_path_buf()];
    let err = Parser::new(src, &mut registry, &include_dirs)
        .parse()
        .expect_err("the include must fail");

    // The error is positioned in the included file.
    assert_eq!(err.message, "the outermost call must be Zenith");
    assert!(err.path.ends_with("broken.zen"), "{}", err.path.display());
}

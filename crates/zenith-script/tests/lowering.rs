//! End-to-end parses over the standard library: literal lowering,
//! default arguments, lazy specialization, and program bodies.

use pretty_assertions::assert_eq;
use zenith_methods::{GroupSpec, MethodRecord, Registry};
use zenith_script::{Parser, SourceText};
use zenith_workspace::{Agenda, Group, Value};

fn parse_with(registry: &mut Registry, text: &str) -> Agenda {
    let src = SourceText::new("test.zen", text);
    Parser::new(src, registry, &[])
        .parse()
        .expect("script should parse")
}

fn method_names(registry: &Registry, agenda: &Agenda) -> Vec<String> {
    agenda
        .invocations
        .iter()
        .map(|inv| registry.methods.name(inv.method).to_string())
        .collect()
}

#[test]
fn literals_are_bracketed_by_assign_and_clear() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(
        &mut registry,
        r#"
        Zenith {
            VectorSet(v, 3, 2.0)
            VectorWriteToFile(v)
        }
        "#,
    );

    assert_eq!(
        method_names(&registry, &agenda),
        vec![
            "IndexAssign",
            "NumericAssign",
            "VectorSet",
            "Delete_for_Index",
            "Delete_for_Numeric",
            "StringAssign",
            "VectorWriteToFile",
            "Delete_for_String",
        ]
    );

    let assign = &agenda.invocations[0];
    assert_eq!(assign.value, Some(Value::Index(3)));
    assert_eq!(
        registry.variables.name(assign.outputs[0]),
        "auto_VectorSet_gin0_length"
    );
    assert!(registry.variables.record(assign.outputs[0]).is_automatic());

    // The clear consumes the same automatic slot the assign fed.
    let set = &agenda.invocations[2];
    let clear = &agenda.invocations[3];
    assert_eq!(clear.inputs, vec![set.inputs[0]]);

    // v sprang into existence at VectorSet's concrete generic output.
    let v = registry.variables.lookup("v").unwrap();
    assert_eq!(registry.variables.record(v).group(), Group::Vector);
    assert_eq!(set.outputs, vec![v]);
}

#[test]
fn omitted_defaults_lower_like_written_literals() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(&mut registry, "Zenith { VectorCreate(v) Print(v) }");

    assert_eq!(
        method_names(&registry, &agenda),
        vec!["VectorCreate", "IndexAssign", "Print_for_Vector", "Delete_for_Index"]
    );
    let assign = &agenda.invocations[1];
    assert_eq!(assign.value, Some(Value::Index(1)));
    assert_eq!(
        registry.variables.name(assign.outputs[0]),
        "auto_Print_gin1_level"
    );
}

#[test]
fn assign_methods_carry_their_value_directly() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(&mut registry, "Zenith { NumericAssign(x, 4.5) }");

    // No bracketing: the literal rides on the invocation itself.
    assert_eq!(method_names(&registry, &agenda), vec!["NumericAssign"]);
    assert_eq!(agenda.invocations[0].value, Some(Value::Numeric(4.5)));
    let x = registry.variables.lookup("x").unwrap();
    assert_eq!(registry.variables.record(x).group(), Group::Numeric);
}

#[test]
fn copy_specializes_per_group_and_reuses_the_record() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(
        &mut registry,
        r#"
        Zenith {
            VectorCreate(v)
            VectorCreate(w)
            Copy(w, v)
            MatrixCreate(m)
            MatrixCreate(n)
            Copy(n, m)
            Copy(w, v)
        }
        "#,
    );

    assert_eq!(
        method_names(&registry, &agenda),
        vec![
            "VectorCreate",
            "VectorCreate",
            "Copy_for_Vector",
            "MatrixCreate",
            "MatrixCreate",
            "Copy_for_Matrix",
            "Copy_for_Vector",
        ]
    );
    // Both vector copies resolved to the same registered method.
    assert_eq!(agenda.invocations[2].method, agenda.invocations[6].method);
}

#[test]
fn parenless_calls_use_declared_defaults() {
    let mut registry = Registry::standard().unwrap();
    registry
        .methods
        .register(MethodRecord {
            name: "Chime".into(),
            description: "Test fixture.".into(),
            gins: vec!["level".into()],
            gin_types: vec![GroupSpec::Exact(Group::Index)],
            gin_defaults: vec![Some("2".into())],
            ..MethodRecord::default()
        })
        .unwrap();

    let agenda = parse_with(&mut registry, "Zenith { Chime }");
    assert_eq!(
        method_names(&registry, &agenda),
        vec!["IndexAssign", "Chime", "Delete_for_Index"]
    );
    assert_eq!(agenda.invocations[0].value, Some(Value::Index(2)));
    assert_eq!(
        registry.variables.name(agenda.invocations[0].outputs[0]),
        "auto_Chime_gin0_level"
    );
}

#[test]
fn agenda_bodies_nest_without_running() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(
        &mut registry,
        r#"
        Zenith {
            AgendaDefine(a) {
                VectorCreate(v)
                VectorSet(v, 2, 1.5)
            }
            AgendaExecute(a)
        }
        "#,
    );

    assert_eq!(
        method_names(&registry, &agenda),
        vec!["AgendaDefine", "AgendaExecute"]
    );
    let nested = agenda.invocations[0].nested.as_ref().unwrap();
    assert_eq!(nested.name, "a");
    assert_eq!(
        method_names(&registry, nested),
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
fn comments_and_blank_lines_are_ignored() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(
        &mut registry,
        "# create a vector\nZenith {\n\n  VectorCreate(v)  # trailing note\n}\n",
    );
    assert_eq!(method_names(&registry, &agenda), vec!["VectorCreate"]);
}

#[test]
fn matrix_literals_parse_inline() {
    let mut registry = Registry::standard().unwrap();
    let agenda = parse_with(&mut registry, "Zenith { MatrixAssign(m, [1, 2; 3, 4]) }");

    let value = agenda.invocations[0].value.as_ref().unwrap();
    let matrix = value.as_matrix().unwrap();
    assert_eq!((matrix.nrows(), matrix.ncols()), (2, 2));
    assert_eq!(matrix.get(1, 0), 3.0);
}

//! The standard method library: data-plumbing signatures every script
//! can rely on. Implementations live in the engine crate and are keyed
//! by these names.

use zenith_workspace::Group;

use crate::error::Result;
use crate::record::{GroupSpec, MethodRecord};
use crate::registry::Registry;

/// Name of the program entry method; the outermost call of every
/// script.
pub const ENTRY_METHOD: &str = "Zenith";

fn create_method(group: Group) -> MethodRecord {
    MethodRecord {
        name: format!("{}Create", group.name()),
        description: format!(
            "Creates a new {} variable, initialized to the group default.",
            group.name()
        ),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(group)],
        ..MethodRecord::default()
    }
}

fn assign_method(group: Group) -> MethodRecord {
    MethodRecord {
        name: format!("{}Assign", group.name()),
        description: format!("Assigns a literal {} value to a variable.", group.name()),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(group)],
        gins: vec!["value".into()],
        gin_types: vec![GroupSpec::Exact(group)],
        gin_defaults: vec![None],
        assign: true,
        ..MethodRecord::default()
    }
}

fn write_method(group: Group) -> MethodRecord {
    MethodRecord {
        name: format!("{}WriteToFile", group.name()),
        description: format!(
            "Writes a {} variable to an ASCII file; an empty filename means \"<variable>.txt\".",
            group.name()
        ),
        gins: vec!["in".into(), "filename".into()],
        gin_types: vec![GroupSpec::Exact(group), GroupSpec::Exact(Group::String)],
        gin_defaults: vec![None, Some(String::new())],
        ..MethodRecord::default()
    }
}

fn read_method(group: Group) -> MethodRecord {
    MethodRecord {
        name: format!("{}ReadFromFile", group.name()),
        description: format!(
            "Reads a {} variable from an ASCII file; an empty filename means \"<variable>.txt\".",
            group.name()
        ),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(group)],
        gins: vec!["filename".into()],
        gin_types: vec![GroupSpec::Exact(Group::String)],
        gin_defaults: vec![Some(String::new())],
        ..MethodRecord::default()
    }
}

pub(crate) fn install(registry: &mut Registry) -> Result<()> {
    let methods = &mut registry.methods;

    methods.register(MethodRecord {
        name: ENTRY_METHOD.into(),
        description: "Entry point of a control script; its body is the program to run.".into(),
        program_valued: true,
        ..MethodRecord::default()
    })?;

    for group in Group::STORABLE {
        methods.register(create_method(group))?;
    }

    for group in [
        Group::Index,
        Group::Numeric,
        Group::String,
        Group::Vector,
        Group::Matrix,
        Group::ArrayOfIndex,
        Group::ArrayOfString,
    ] {
        methods.register(assign_method(group))?;
    }

    methods.register(MethodRecord {
        name: "Copy".into(),
        description: "Copies one variable into another of the same group.".into(),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::any()],
        gins: vec!["in".into()],
        gin_types: vec![GroupSpec::any()],
        gin_defaults: vec![None],
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "Delete".into(),
        description: "Clears a variable back to its group default and marks it unwritten.".into(),
        gins: vec!["in".into()],
        gin_types: vec![GroupSpec::any()],
        gin_defaults: vec![None],
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "Print".into(),
        description: "Prints a variable; level 0 routes to the debug log.".into(),
        gins: vec!["in".into(), "level".into()],
        gin_types: vec![GroupSpec::any(), GroupSpec::Exact(Group::Index)],
        gin_defaults: vec![None, Some("1".into())],
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "VectorSet".into(),
        description: "Creates a vector of the given length with every element set to one value."
            .into(),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(Group::Vector)],
        gins: vec!["length".into(), "value".into()],
        gin_types: vec![
            GroupSpec::Exact(Group::Index),
            GroupSpec::Exact(Group::Numeric),
        ],
        gin_defaults: vec![None, None],
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "VectorLinSpace".into(),
        description: "Fills a vector with evenly spaced values; the last step may fall short of stop.".into(),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(Group::Vector)],
        gins: vec!["start".into(), "stop".into(), "step".into()],
        gin_types: vec![
            GroupSpec::Exact(Group::Numeric),
            GroupSpec::Exact(Group::Numeric),
            GroupSpec::Exact(Group::Numeric),
        ],
        gin_defaults: vec![None, None, None],
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "VectorNLinSpace".into(),
        description: "Fills a vector with n evenly spaced values from start to stop inclusive."
            .into(),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(Group::Vector)],
        gins: vec!["start".into(), "stop".into(), "n".into()],
        gin_types: vec![
            GroupSpec::Exact(Group::Numeric),
            GroupSpec::Exact(Group::Numeric),
            GroupSpec::Exact(Group::Index),
        ],
        gin_defaults: vec![None, None, None],
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "VectorNLogSpace".into(),
        description:
            "Fills a vector with n logarithmically spaced values from start to stop inclusive."
                .into(),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(Group::Vector)],
        gins: vec!["start".into(), "stop".into(), "n".into()],
        gin_types: vec![
            GroupSpec::Exact(Group::Numeric),
            GroupSpec::Exact(Group::Numeric),
            GroupSpec::Exact(Group::Index),
        ],
        gin_defaults: vec![None, None, None],
        ..MethodRecord::default()
    })?;

    for group in [
        Group::Vector,
        Group::Matrix,
        Group::ArrayOfVector,
        Group::ArrayOfMatrix,
    ] {
        methods.register(write_method(group))?;
        methods.register(read_method(group))?;
    }

    methods.register(MethodRecord {
        name: "AgendaDefine".into(),
        description: "Stores its brace-delimited body as an agenda without running it.".into(),
        gouts: vec!["out".into()],
        gout_types: vec![GroupSpec::Exact(Group::Agenda)],
        program_valued: true,
        ..MethodRecord::default()
    })?;

    methods.register(MethodRecord {
        name: "AgendaExecute".into(),
        description: "Runs a stored agenda against the current workspace.".into(),
        gins: vec!["in".into()],
        gin_types: vec![GroupSpec::Exact(Group::Agenda)],
        gin_defaults: vec![None],
        ..MethodRecord::default()
    })?;

    Ok(())
}

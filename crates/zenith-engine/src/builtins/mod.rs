//! Implementations of the standard method library.
//!
//! Every record [`Registry::standard`] installs gets an entry here,
//! keyed by the same names. Wildcard methods register one entry on
//! the template; their specializations reach it through the dispatch
//! fallback.

use std::path::PathBuf;

use tracing::debug;
use zenith_methods::{GroupSpec, Registry};
use zenith_workspace::{Group, Value, WsvId};

use crate::dispatch::{DispatchTable, MethodFn};
use crate::error::{MethodError, Result};
use crate::executor::CallContext;

mod io;

/// Most elements any one vector-producing method will allocate.
const MAX_ELEMENTS: usize = 100_000_000;

/// Builds the dispatch table covering the standard registry.
pub fn standard_dispatch(registry: &Registry) -> Result<DispatchTable> {
    let methods = &registry.methods;
    let mut table = DispatchTable::new();

    for group in Group::STORABLE {
        table.register_named(methods, &format!("{}Create", group.name()), create_impl(group))?;
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
        table.register_named(methods, &format!("{}Assign", group.name()), assign_impl())?;
    }

    table.register_named(
        methods,
        "Copy",
        Box::new(|ctx, inv| {
            let value = ctx.value(inv.inputs[0]).clone();
            ctx.set(inv.outputs[0], value);
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "Delete",
        Box::new(|ctx, inv| {
            ctx.clear(inv.inputs[0]);
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "Print",
        Box::new(|ctx, inv| {
            let level = ctx.index(inv.inputs[1])?;
            let name = ctx.variable_name(inv.inputs[0]);
            let value = ctx.value(inv.inputs[0]);
            if level == 0 {
                debug!(variable = name, value = %value, "print");
            } else {
                println!("{name} = {value}");
            }
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "VectorSet",
        Box::new(|ctx, inv| {
            let length = ctx.index(inv.inputs[0])?;
            if length < 0 {
                return Err(MethodError(format!(
                    "length must be non-negative, got {length}"
                )));
            }
            if length as usize > MAX_ELEMENTS {
                return Err(MethodError(format!(
                    "length {length} exceeds the {MAX_ELEMENTS} element limit"
                )));
            }
            let value = ctx.numeric(inv.inputs[1])?;
            ctx.set(inv.outputs[0], Value::Vector(vec![value; length as usize]));
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "VectorLinSpace",
        Box::new(|ctx, inv| {
            let start = ctx.numeric(inv.inputs[0])?;
            let stop = ctx.numeric(inv.inputs[1])?;
            let step = ctx.numeric(inv.inputs[2])?;
            if step == 0.0 {
                return Err("step must be nonzero".into());
            }
            let span = (stop - start) / step;
            if span < 0.0 {
                return Err(MethodError(format!(
                    "step {step} moves away from stop {stop}"
                )));
            }
            if !span.is_finite() || span >= MAX_ELEMENTS as f64 {
                return Err(MethodError(format!(
                    "stepping from {start} to {stop} by {step} exceeds the {MAX_ELEMENTS} element limit"
                )));
            }
            let n = span.floor() as usize + 1;
            let values = (0..n).map(|i| start + i as f64 * step).collect();
            ctx.set(inv.outputs[0], Value::Vector(values));
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "VectorNLinSpace",
        Box::new(|ctx, inv| {
            let start = ctx.numeric(inv.inputs[0])?;
            let stop = ctx.numeric(inv.inputs[1])?;
            let n = space_length(ctx.index(inv.inputs[2])?)?;
            let step = (stop - start) / (n - 1) as f64;
            let values = (0..n).map(|i| start + i as f64 * step).collect();
            ctx.set(inv.outputs[0], Value::Vector(values));
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "VectorNLogSpace",
        Box::new(|ctx, inv| {
            let start = ctx.numeric(inv.inputs[0])?;
            let stop = ctx.numeric(inv.inputs[1])?;
            let n = space_length(ctx.index(inv.inputs[2])?)?;
            if start <= 0.0 || stop <= 0.0 {
                return Err(MethodError(format!(
                    "logarithmic spacing needs positive bounds, got {start} and {stop}"
                )));
            }
            let step = (stop.ln() - start.ln()) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n)
                .map(|i| (start.ln() + i as f64 * step).exp())
                .collect();
            // The first and last element are exactly start and stop.
            values[0] = start;
            values[n - 1] = stop;
            ctx.set(inv.outputs[0], Value::Vector(values));
            Ok(())
        }),
    )?;

    for group in [
        Group::Vector,
        Group::Matrix,
        Group::ArrayOfVector,
        Group::ArrayOfMatrix,
    ] {
        table.register_named(
            methods,
            &format!("{}WriteToFile", group.name()),
            write_impl(),
        )?;
        table.register_named(
            methods,
            &format!("{}ReadFromFile", group.name()),
            read_impl(),
        )?;
    }

    table.register_named(
        methods,
        "AgendaDefine",
        Box::new(|ctx, inv| {
            let nested = inv
                .nested
                .clone()
                .ok_or("AgendaDefine invocation carries no program")?;
            ctx.set(inv.outputs[0], Value::Agenda(nested));
            Ok(())
        }),
    )?;

    table.register_named(
        methods,
        "AgendaExecute",
        Box::new(|ctx, inv| {
            let agenda = ctx.agenda(inv.inputs[0])?.clone();
            ctx.run_agenda(&agenda)
        }),
    )?;

    Ok(table)
}

fn create_impl(group: Group) -> MethodFn {
    Box::new(move |ctx, inv| {
        ctx.set(inv.outputs[0], Value::default_for(group));
        Ok(())
    })
}

fn assign_impl() -> MethodFn {
    Box::new(|ctx, inv| {
        let value = inv
            .value
            .clone()
            .ok_or("assign invocation carries no value")?;
        ctx.set(inv.outputs[0], value);
        Ok(())
    })
}

/// Validates the requested element count for the N-space families.
fn space_length(n: i64) -> std::result::Result<usize, MethodError> {
    if n < 2 {
        return Err(MethodError(format!("n must be at least 2, got {n}")));
    }
    if n as usize > MAX_ELEMENTS {
        return Err(MethodError(format!(
            "n {n} exceeds the {MAX_ELEMENTS} element limit"
        )));
    }
    Ok(n as usize)
}

fn write_impl() -> MethodFn {
    Box::new(|ctx, inv| {
        let path = file_target(ctx, inv.inputs[0], inv.inputs[1])?;
        io::write_value(&path, ctx.value(inv.inputs[0]))
    })
}

fn read_impl() -> MethodFn {
    Box::new(|ctx, inv| {
        let record = ctx.registry.methods.record(inv.method);
        let GroupSpec::Exact(group) = &record.gout_types[0] else {
            return Err("cannot read into a wildcard output".into());
        };
        let path = file_target(ctx, inv.outputs[0], inv.inputs[0])?;
        let value = io::read_value(&path, *group)?;
        ctx.set(inv.outputs[0], value);
        Ok(())
    })
}

/// An empty filename targets `<variable>.txt` in the working
/// directory.
fn file_target(
    ctx: &CallContext<'_>,
    variable: WsvId,
    filename: WsvId,
) -> std::result::Result<PathBuf, MethodError> {
    let name = ctx.string(filename)?;
    if name.is_empty() {
        Ok(PathBuf::from(format!("{}.txt", ctx.variable_name(variable))))
    } else {
        Ok(PathBuf::from(name))
    }
}

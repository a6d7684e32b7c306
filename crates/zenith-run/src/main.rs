//! Command-line runner for zenith control scripts.
//!
//! Parses the script against the standard method registry, then runs
//! the resulting program to completion. `--methods` and `--describe`
//! answer "what can I call" without running anything.

use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zenith_engine::{standard_dispatch, Executor};
use zenith_methods::Registry;
use zenith_script::SourceText;
use zenith_workspace::Workspace;

#[derive(Parser, Debug)]
#[command(name = "zenith-run")]
#[command(about = "Parse and run a zenith control script")]
struct Cli {
    /// Path to the script to run
    script: Option<PathBuf>,

    /// Extra directories searched by INCLUDE
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// List every registered method and exit
    #[arg(long)]
    methods: bool,

    /// Print one method's signature and description, then exit
    #[arg(long, value_name = "NAME")]
    describe: Option<String>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zenith=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let registry = match Registry::standard() {
        Ok(registry) => registry,
        Err(e) => {
            error!("cannot build the standard registry: {e}");
            exit(1);
        }
    };

    if cli.methods {
        list_methods(&registry);
        return;
    }
    if let Some(name) = cli.describe.as_deref() {
        describe_method(&registry, name);
        return;
    }
    let Some(script) = cli.script else {
        error!("no script given (try --methods to see what is available)");
        exit(1);
    };
    run_script(registry, &script, &cli.include);
}

fn list_methods(registry: &Registry) {
    for (_, record) in registry.methods.iter() {
        println!("{:<24} {}", record.name, record.description);
    }
}

fn describe_method(registry: &Registry, name: &str) {
    let Some(id) = registry.methods.lookup(name) else {
        error!("unknown method: {name}");
        exit(1);
    };
    let record = registry.methods.record(id);
    println!("{}", record.signature(&registry.variables));
    println!("  {}", record.description);
}

fn run_script(mut registry: Registry, script: &Path, include: &[PathBuf]) {
    let text = match std::fs::read_to_string(script) {
        Ok(text) => text,
        Err(e) => {
            error!("cannot read {}: {e}", script.display());
            exit(1);
        }
    };
    let src = SourceText::new(script, &text);
    let agenda = match zenith_script::Parser::new(src, &mut registry, include).parse() {
        Ok(agenda) => agenda,
        Err(e) => {
            eprint!("{}", e.render());
            exit(1);
        }
    };
    let dispatch = match standard_dispatch(&registry) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            error!("cannot build the standard implementations: {e}");
            exit(1);
        }
    };
    let mut ws = Workspace::new(&registry.variables);
    let exec = Executor::new(registry, dispatch);
    if let Err(e) = exec.run(&mut ws, &agenda) {
        error!("{e}");
        exit(1);
    }
}

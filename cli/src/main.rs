#![deny(missing_docs)]

//! # goforge
//!
//! CLI for scaffolding Go web projects. `new` creates a project skeleton,
//! `create-app` and `create-module` add to it and keep the generated
//! registration files up to date by rewriting them through the mutation
//! engine in `goforge-core`.

use clap::{Parser, Subcommand};
use goforge_core::AppResult;

mod create_app;
mod create_module;
mod fsio;
mod new;
mod project;
mod templates;

use templates::Templates;

#[derive(Debug, Parser)]
#[clap(name = "goforge", version, about = "Scaffolding for Go web projects")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a new project skeleton.
    New(new::NewArgs),

    /// Create an application inside the current project and register it.
    CreateApp(create_app::CreateAppArgs),

    /// Create a module inside an application and register it.
    CreateModule(create_module::CreateModuleArgs),
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let templates = Templates::builtin();
    match &cli.command {
        Commands::New(args) => new::execute(args, &templates),
        Commands::CreateApp(args) => create_app::execute(args, &templates),
        Commands::CreateModule(args) => create_module::execute(args, &templates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }
}

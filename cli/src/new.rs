#![deny(missing_docs)]

//! # `new` Command
//!
//! Scaffolds a fresh project: root directory, `go.mod`, `.gitignore` and the
//! `internal/main.go` registry that later commands extend.

use std::path::PathBuf;

use clap::Args;
use goforge_core::AppResult;

use crate::fsio::{create_new_dir, write_atomic};
use crate::templates::Templates;

/// Arguments of the `new` command.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Name of the project (also the module path in `go.mod`).
    pub name: String,

    /// Directory to create the project in.
    #[clap(long, default_value = ".")]
    pub dir: PathBuf,
}

/// Creates the project skeleton.
pub fn execute(args: &NewArgs, templates: &Templates) -> AppResult<()> {
    let root = args.dir.join(&args.name);
    create_new_dir(&root)?;
    create_new_dir(&root.join("internal"))?;

    let vars = [("project", args.name.as_str())];
    write_atomic(&root.join("go.mod"), &templates.render("go.mod", &vars)?)?;
    write_atomic(&root.join(".gitignore"), &templates.render("gitignore", &vars)?)?;
    write_atomic(
        &root.join("internal").join("main.go"),
        &templates.render("registry_main", &vars)?,
    )?;

    println!("Created project {:?}", root);
    println!();
    println!("Next steps:");
    println!("  cd {}", args.name);
    println!("  goforge create-app <app-name>");
    Ok(())
}

#![deny(missing_docs)]

//! # `create-app` Command
//!
//! Scaffolds `internal/<app>/` (app main plus its `core` shim) and then
//! registers the app in `internal/main.go` by appending an import and a
//! registry map entry through the mutation engine.

use std::env;
use std::fs;

use clap::Args;
use goforge_core::{AppError, AppResult};

use crate::fsio::{create_new_dir, write_atomic};
use crate::project::{find_project_root, read_project_name};
use crate::templates::Templates;

/// Arguments of the `create-app` command.
#[derive(Debug, Args)]
pub struct CreateAppArgs {
    /// Name of the application (its package and directory name).
    pub name: String,
}

/// Creates the app files and patches the registry.
pub fn execute(args: &CreateAppArgs, templates: &Templates) -> AppResult<()> {
    let cwd = env::current_dir()?;
    execute_in(args, templates, &cwd)
}

/// Same as [`execute`], rooted at an explicit directory.
pub fn execute_in(
    args: &CreateAppArgs,
    templates: &Templates,
    start: &std::path::Path,
) -> AppResult<()> {
    let root = find_project_root(start)?;
    let project = read_project_name(&root)?;

    let app_dir = root.join("internal").join(&args.name);
    create_new_dir(&app_dir)?;
    create_new_dir(&app_dir.join("core"))?;

    let vars = [("project", project.as_str()), ("app", args.name.as_str())];
    write_atomic(
        &app_dir.join("core").join("core.go"),
        &templates.render("core_shim", &vars)?,
    )?;
    write_atomic(
        &app_dir.join(format!("{}_main.go", args.name)),
        &templates.render("app_main", &vars)?,
    )?;

    // Register the new app in the shared registry.
    let registry_path = root.join("internal").join("main.go");
    let source = fs::read_to_string(&registry_path)?;
    let import_path = format!("{}/internal/{}", project, args.name);
    let patched = goforge_core::register_app(&source, &import_path, &args.name)
        .map_err(|e| AppError::General(format!("failed to patch {:?}: {}", registry_path, e)))?;
    write_atomic(&registry_path, &patched)?;

    println!("Created app {:?}", app_dir);
    println!("Registered {} in internal/main.go", args.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new::{self, NewArgs};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn scaffold_project(dir: &std::path::Path) -> std::path::PathBuf {
        let args = NewArgs {
            name: "shop".into(),
            dir: dir.to_path_buf(),
        };
        new::execute(&args, &Templates::builtin()).unwrap();
        dir.join("shop")
    }

    #[test]
    fn test_create_app_scaffolds_and_registers() {
        let dir = tempdir().unwrap();
        let root = scaffold_project(dir.path());

        let args = CreateAppArgs { name: "store".into() };
        execute_in(&args, &Templates::builtin(), &root).unwrap();

        let app_dir = root.join("internal").join("store");
        assert!(app_dir.join("core").join("core.go").is_file());
        let app_main = fs::read_to_string(app_dir.join("store_main.go")).unwrap();
        assert!(app_main.contains("package store"));
        assert!(app_main.contains("core.New()"));

        let registry = fs::read_to_string(root.join("internal").join("main.go")).unwrap();
        assert!(registry.contains("\"shop/internal/store\""));
        assert!(registry.contains("\"store\": store.App{}"));
    }

    #[test]
    fn test_create_app_twice_fails_on_directory() {
        let dir = tempdir().unwrap();
        let root = scaffold_project(dir.path());
        let args = CreateAppArgs { name: "store".into() };
        execute_in(&args, &Templates::builtin(), &root).unwrap();
        assert!(execute_in(&args, &Templates::builtin(), &root).is_err());
    }

    #[test]
    fn test_patched_registry_on_disk_is_canonical() {
        let dir = tempdir().unwrap();
        let root = scaffold_project(dir.path());
        let args = CreateAppArgs { name: "store".into() };
        execute_in(&args, &Templates::builtin(), &root).unwrap();

        let registry = fs::read_to_string(root.join("internal").join("main.go")).unwrap();
        let reprinted = goforge_core::print(&goforge_core::parse(&registry).unwrap());
        assert_eq!(registry, reprinted);
    }

    #[test]
    fn test_registry_stays_parseable_after_two_apps() {
        let dir = tempdir().unwrap();
        let root = scaffold_project(dir.path());
        for name in ["store", "admin"] {
            let args = CreateAppArgs { name: name.into() };
            execute_in(&args, &Templates::builtin(), &root).unwrap();
        }
        let registry = fs::read_to_string(root.join("internal").join("main.go")).unwrap();
        goforge_core::parse(&registry).unwrap();
        assert!(registry.contains("\"store\": store.App{}"));
        assert!(registry.contains("\"admin\": admin.App{}"));
    }
}

#![deny(missing_docs)]

//! # `create-module` Command
//!
//! Scaffolds `internal/<app>/<module>/` (module, service, controller) and
//! registers the module in the app's `core.New()` call. The scaffold and the
//! registration are two separate writes; if the second fails the first is
//! left on disk.

use std::env;
use std::fs;

use clap::Args;
use goforge_core::{AppError, AppResult};
use heck::ToUpperCamelCase;

use crate::fsio::{create_new_dir, write_atomic};
use crate::project::{find_project_root, read_project_name};
use crate::templates::Templates;

/// Arguments of the `create-module` command.
#[derive(Debug, Args)]
pub struct CreateModuleArgs {
    /// Name of the application the module belongs to.
    pub app: String,

    /// Name of the module (its package and directory name).
    pub name: String,
}

/// Creates the module files and patches the app main.
pub fn execute(args: &CreateModuleArgs, templates: &Templates) -> AppResult<()> {
    let cwd = env::current_dir()?;
    execute_in(args, templates, &cwd)
}

/// Same as [`execute`], rooted at an explicit directory.
pub fn execute_in(
    args: &CreateModuleArgs,
    templates: &Templates,
    start: &std::path::Path,
) -> AppResult<()> {
    let root = find_project_root(start)?;
    let project = read_project_name(&root)?;

    let app_dir = root.join("internal").join(&args.app);
    if !app_dir.is_dir() {
        return Err(AppError::General(format!(
            "application {:?} does not exist; run 'goforge create-app {}' first",
            args.app, args.app
        )));
    }

    let module_dir = app_dir.join(&args.name);
    create_new_dir(&module_dir)?;

    let type_prefix = args.name.to_upper_camel_case();
    let vars = [
        ("project", project.as_str()),
        ("app", args.app.as_str()),
        ("module", args.name.as_str()),
        ("Module", type_prefix.as_str()),
    ];
    for (template, suffix) in [
        ("module", "module"),
        ("service", "service"),
        ("controller", "controller"),
    ] {
        write_atomic(
            &module_dir.join(format!("{}.{}.go", args.name, suffix)),
            &templates.render(template, &vars)?,
        )?;
    }

    // Register the module in the app's core.New() call.
    let app_main_path = app_dir.join(format!("{}_main.go", args.app));
    let source = fs::read_to_string(&app_main_path)?;
    let import_path = format!("{}/internal/{}/{}", project, args.app, args.name);
    let module_type = format!("{}Module", type_prefix);
    let patched = goforge_core::register_module(&source, &import_path, &args.name, &module_type)
        .map_err(|e| AppError::General(format!("failed to patch {:?}: {}", app_main_path, e)))?;
    write_atomic(&app_main_path, &patched)?;

    println!("Created module {:?}", module_dir);
    println!("Registered {} in {}_main.go", args.name, args.app);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app::{self, CreateAppArgs};
    use crate::new::{self, NewArgs};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn scaffold_app(dir: &std::path::Path) -> std::path::PathBuf {
        let templates = Templates::builtin();
        let args = NewArgs {
            name: "shop".into(),
            dir: dir.to_path_buf(),
        };
        new::execute(&args, &templates).unwrap();
        let root = dir.join("shop");
        let app = CreateAppArgs { name: "store".into() };
        create_app::execute_in(&app, &templates, &root).unwrap();
        root
    }

    #[test]
    fn test_create_module_scaffolds_and_registers() {
        let dir = tempdir().unwrap();
        let root = scaffold_app(dir.path());

        let args = CreateModuleArgs {
            app: "store".into(),
            name: "billing".into(),
        };
        execute_in(&args, &Templates::builtin(), &root).unwrap();

        let module_dir = root.join("internal").join("store").join("billing");
        for suffix in ["module", "service", "controller"] {
            let text =
                fs::read_to_string(module_dir.join(format!("billing.{}.go", suffix))).unwrap();
            assert!(text.contains("package billing"));
            assert!(text.contains("BillingModule") || text.contains("BillingService") || text.contains("BillingController"));
        }

        let app_main =
            fs::read_to_string(root.join("internal").join("store").join("store_main.go")).unwrap();
        assert!(app_main.contains("billing \"shop/internal/store/billing\""));
        assert!(app_main.contains("core.New(billing.BillingModule{})"));
    }

    #[test]
    fn test_multi_word_module_name_is_camel_cased() {
        let dir = tempdir().unwrap();
        let root = scaffold_app(dir.path());

        let args = CreateModuleArgs {
            app: "store".into(),
            name: "order_history".into(),
        };
        execute_in(&args, &Templates::builtin(), &root).unwrap();

        let app_main =
            fs::read_to_string(root.join("internal").join("store").join("store_main.go")).unwrap();
        assert!(app_main.contains("order_history.OrderHistoryModule{}"));
    }

    #[test]
    fn test_failed_registration_leaves_app_main_untouched() {
        let dir = tempdir().unwrap();
        let root = scaffold_app(dir.path());

        // Hand-edit the app main so the registration call is gone.
        let app_main_path = root.join("internal").join("store").join("store_main.go");
        let edited = "package store\n\nimport (\n\t\"shop/internal/store/core\"\n)\n\n// App struct holds the application instance.\ntype App struct{}\n\n// Run initializes and starts the web application.\nfunc (a App) Run() {\n\tcore.Noop()\n}\n";
        fs::write(&app_main_path, edited).unwrap();

        let args = CreateModuleArgs {
            app: "store".into(),
            name: "billing".into(),
        };
        assert!(execute_in(&args, &Templates::builtin(), &root).is_err());
        assert_eq!(fs::read_to_string(&app_main_path).unwrap(), edited);
    }

    #[test]
    fn test_missing_app_is_error() {
        let dir = tempdir().unwrap();
        let root = scaffold_app(dir.path());
        let args = CreateModuleArgs {
            app: "nope".into(),
            name: "billing".into(),
        };
        assert!(execute_in(&args, &Templates::builtin(), &root).is_err());
    }

    #[test]
    fn test_two_modules_accumulate_in_call() {
        let dir = tempdir().unwrap();
        let root = scaffold_app(dir.path());
        let templates = Templates::builtin();
        for name in ["billing", "orders"] {
            let args = CreateModuleArgs {
                app: "store".into(),
                name: name.into(),
            };
            execute_in(&args, &templates, &root).unwrap();
        }
        let app_main =
            fs::read_to_string(root.join("internal").join("store").join("store_main.go")).unwrap();
        goforge_core::parse(&app_main).unwrap();
        assert!(app_main.contains("core.New(billing.BillingModule{}, orders.OrdersModule{})"));
    }
}

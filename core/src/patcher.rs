#![deny(missing_docs)]

//! # Patch Workflows
//!
//! High-level registration recipes over source text: parse, locate the
//! anchors, apply the structural edits, and print canonical source. Text in,
//! text out: the caller owns all filesystem I/O, and any error here aborts
//! before a single output byte exists.

use crate::error::AppResult;
use crate::locator::{locate, Pattern};
use crate::mutator::{append_call_arg, append_import, append_map_entry};
use crate::syntax::ast::{Expr, ImportSpec, TypeExpr};
use crate::syntax::parser::parse;
use crate::syntax::printer::print;

/// An empty composite literal of the qualified type `base.Member{}`.
fn qualified_literal(base: &str, member: &str) -> Expr {
    Expr::Composite {
        ty: TypeExpr::Selector {
            base: base.into(),
            member: member.into(),
        },
        elems: Vec::new(),
    }
}

/// Registers an application in the project registry source: appends
/// `import_path` to the import list and `"app_name": app_name.App{}` to the
/// string-keyed registry literal.
///
/// Registration is append-only and unconditional; registering the same app
/// twice produces duplicate entries.
pub fn register_app(source: &str, import_path: &str, app_name: &str) -> AppResult<String> {
    let mut doc = parse(source)?;

    let imports = locate(&doc, &Pattern::SoleImportList)?;
    append_import(
        &mut doc,
        &imports,
        ImportSpec {
            doc: Vec::new(),
            alias: None,
            path: import_path.into(),
        },
    )?;

    let registry = locate(&doc, &Pattern::StringKeyedAggregate)?;
    append_map_entry(
        &mut doc,
        &registry,
        app_name,
        qualified_literal(app_name, "App"),
    )?;

    Ok(print(&doc))
}

/// Registers a module in an application's main source: appends the aliased
/// import `module_name "import_path"` and the argument
/// `module_name.ModuleType{}` to the `core.New(...)` call.
pub fn register_module(
    source: &str,
    import_path: &str,
    module_name: &str,
    module_type: &str,
) -> AppResult<String> {
    let mut doc = parse(source)?;

    let imports = locate(&doc, &Pattern::SoleImportList)?;
    append_import(
        &mut doc,
        &imports,
        ImportSpec {
            doc: Vec::new(),
            alias: Some(module_name.into()),
            path: import_path.into(),
        },
    )?;

    let call = locate(
        &doc,
        &Pattern::SelectorCall {
            base: "core".into(),
            member: "New".into(),
        },
    )?;
    append_call_arg(&mut doc, &call, qualified_literal(module_name, module_type))?;

    Ok(print(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const REGISTRY: &str = r#"package main

import (
	"log"
	"sync"
)

// AppRunner defines the interface for a runnable application.
type AppRunner interface {
	Run()
}

func main() {
	apps := map[string]AppRunner{}

	var wg sync.WaitGroup

	if len(apps) == 0 {
		log.Println("No applications to run.")
		return
	}

	for name, app := range apps {
		wg.Add(1)

		go func(appName string, runner AppRunner) {
			defer wg.Done()
			runner.Run()
		}(name, app)
	}

	wg.Wait()
}
"#;

    const APP_MAIN: &str = r#"package auth

import (
	"proj/internal/auth/core"
)

// App struct holds the application instance.
type App struct{}

// Run initializes and starts the web application.
func (a App) Run() {
	port := ":8081"

	app := core.New()

	app.Start(port)
}
"#;

    #[test]
    fn test_register_app_adds_import_and_entry() {
        let out = register_app(REGISTRY, "proj/internal/auth", "auth").unwrap();
        assert!(out.contains("\t\"proj/internal/auth\"\n"), "output: {}", out);
        assert!(
            out.contains("apps := map[string]AppRunner{\"auth\": auth.App{}}"),
            "output: {}",
            out
        );
    }

    #[test]
    fn test_register_second_app_preserves_first() {
        let once = register_app(REGISTRY, "proj/internal/auth", "auth").unwrap();
        let twice = register_app(&once, "proj/internal/billing", "billing").unwrap();
        assert!(
            twice.contains(
                "apps := map[string]AppRunner{\"auth\": auth.App{}, \"billing\": billing.App{}}"
            ),
            "output: {}",
            twice
        );
    }

    #[test]
    fn test_register_app_preserves_unrelated_comment() {
        let out = register_app(REGISTRY, "proj/internal/auth", "auth").unwrap();
        assert!(
            out.contains(
                "// AppRunner defines the interface for a runnable application.\ntype AppRunner interface {"
            ),
            "output: {}",
            out
        );
    }

    #[test]
    fn test_register_app_keeps_comment_inside_import_block() {
        let src = "package main\n\nimport (\n\t// stdlib\n\t\"log\"\n)\n\nfunc main() {\n\tapps := map[string]AppRunner{}\n\t_ = apps\n\tlog.Println(\"x\")\n}\n";
        let out = register_app(src, "proj/internal/auth", "auth").unwrap();
        assert!(
            out.contains("import (\n\t// stdlib\n\t\"log\"\n\t\"proj/internal/auth\"\n)\n"),
            "output: {}",
            out
        );
    }

    #[test]
    fn test_register_module_adds_aliased_import_and_argument() {
        let out = register_module(APP_MAIN, "proj/internal/auth/billing", "billing", "BillingModule")
            .unwrap();
        assert!(
            out.contains("\tbilling \"proj/internal/auth/billing\"\n"),
            "output: {}",
            out
        );
        assert!(
            out.contains("app := core.New(billing.BillingModule{})"),
            "output: {}",
            out
        );
    }

    #[test]
    fn test_register_two_modules_accumulates_arguments() {
        let once = register_module(APP_MAIN, "proj/internal/auth/billing", "billing", "BillingModule")
            .unwrap();
        let twice = register_module(
            &once,
            "proj/internal/auth/shipping",
            "shipping",
            "ShippingModule",
        )
        .unwrap();
        assert!(
            twice.contains("app := core.New(billing.BillingModule{}, shipping.ShippingModule{})"),
            "output: {}",
            twice
        );
    }

    #[test]
    fn test_missing_call_anchor_fails_without_output() {
        let no_call = "package auth\n\nimport (\n\t\"fmt\"\n)\n\nfunc f() {\n\tfmt.Println(\"x\")\n}\n";
        let err = register_module(no_call, "p/m", "m", "MModule").unwrap_err();
        match err {
            AppError::AnchorNotFound(msg) => assert_eq!(msg, "no call to core.New"),
            other => panic!("expected AnchorNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_source_is_parse_error() {
        let err = register_app("package main\n\nfunc {", "p", "a").unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_output_is_stable_under_reformat() {
        let out = register_app(REGISTRY, "proj/internal/auth", "auth").unwrap();
        let again = print(&parse(&out).unwrap());
        assert_eq!(out, again);
    }
}

#![deny(missing_docs)]

//! # Mutator
//!
//! Structural append edits applied at a located handle. Each edit operates on
//! the tree, never on text, and revalidates the resolved node's shape before
//! touching it: a handle from the wrong pattern (or a stale one) fails with
//! an anchor mismatch instead of corrupting the document.
//!
//! None of the edits deduplicate: appending an identical import twice yields
//! two identical specs, and appending a map key that already exists yields a
//! second entry. Callers are responsible for avoiding double registration.

use crate::error::{AppError, AppResult};
use crate::locator::{resolve_mut, NodeHandle, NodeMut};
use crate::syntax::ast::*;

/// Appends `spec` to the import list at `handle`.
pub fn append_import(doc: &mut Document, handle: &NodeHandle, spec: ImportSpec) -> AppResult<()> {
    match resolve_mut(doc, handle) {
        Some(NodeMut::Decl(Decl {
            kind: DeclKind::Import(imports),
            ..
        })) => {
            imports.specs.push(spec);
            Ok(())
        }
        _ => Err(AppError::AnchorMismatch(
            "append-import requires an import list anchor".into(),
        )),
    }
}

/// Appends a `"key": value` entry to the string-keyed map literal at `handle`.
pub fn append_map_entry(
    doc: &mut Document,
    handle: &NodeHandle,
    key: &str,
    value: Expr,
) -> AppResult<()> {
    match resolve_mut(doc, handle) {
        Some(NodeMut::Expr(Expr::Composite { ty, elems })) if ty.is_string_keyed_map() => {
            elems.push(Element {
                key: Some(Expr::Lit(BasicLit::string(key))),
                value,
            });
            Ok(())
        }
        _ => Err(AppError::AnchorMismatch(
            "append-map-entry requires a string-keyed map literal anchor".into(),
        )),
    }
}

/// Appends `arg` to the argument list of the call at `handle`.
pub fn append_call_arg(doc: &mut Document, handle: &NodeHandle, arg: Expr) -> AppResult<()> {
    match resolve_mut(doc, handle) {
        Some(NodeMut::Expr(Expr::Call { args, .. })) => {
            args.push(arg);
            Ok(())
        }
        _ => Err(AppError::AnchorMismatch(
            "append-call-argument requires a call anchor".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{locate, Pattern};
    use crate::syntax::parser::parse;
    use crate::syntax::printer::print;

    const SRC: &str = r#"package main

import (
	"log"
	"sync"
)

func main() {
	apps := map[string]AppRunner{"auth": auth.App{}}
	app := core.New(billing.BillingModule{})
	_ = app
	log.Println("up")
}
"#;

    fn selector_composite(base: &str, member: &str) -> Expr {
        Expr::Composite {
            ty: TypeExpr::Selector {
                base: base.into(),
                member: member.into(),
            },
            elems: Vec::new(),
        }
    }

    #[test]
    fn test_append_import_preserves_order_and_count() {
        let mut doc = parse(SRC).unwrap();
        let handle = locate(&doc, &Pattern::SoleImportList).unwrap();
        append_import(
            &mut doc,
            &handle,
            ImportSpec {
                doc: Vec::new(),
                alias: None,
                path: "proj/internal/auth".into(),
            },
        )
        .unwrap();

        let reparsed = parse(&print(&doc)).unwrap();
        let DeclKind::Import(imports) = &reparsed.decls[0].kind else {
            panic!("expected import declaration");
        };
        let paths: Vec<&str> = imports.specs.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec!["log", "sync", "proj/internal/auth"]);
    }

    #[test]
    fn test_duplicate_import_appends_twice() {
        let mut doc = parse(SRC).unwrap();
        let handle = locate(&doc, &Pattern::SoleImportList).unwrap();
        let spec = ImportSpec {
            doc: Vec::new(),
            alias: None,
            path: "proj/internal/auth".into(),
        };
        append_import(&mut doc, &handle, spec.clone()).unwrap();
        append_import(&mut doc, &handle, spec).unwrap();

        let printed = print(&doc);
        assert_eq!(printed.matches("\"proj/internal/auth\"").count(), 2);
    }

    #[test]
    fn test_append_map_entry_order_preserving() {
        let mut doc = parse(SRC).unwrap();
        let handle = locate(&doc, &Pattern::StringKeyedAggregate).unwrap();
        append_map_entry(
            &mut doc,
            &handle,
            "billing",
            selector_composite("billing", "App"),
        )
        .unwrap();

        let printed = print(&doc);
        assert!(
            printed.contains(
                "map[string]AppRunner{\"auth\": auth.App{}, \"billing\": billing.App{}}"
            ),
            "output: {}",
            printed
        );
    }

    #[test]
    fn test_append_call_arg_accumulates_left_to_right() {
        let mut doc = parse(SRC).unwrap();
        let handle = locate(
            &doc,
            &Pattern::SelectorCall {
                base: "core".into(),
                member: "New".into(),
            },
        )
        .unwrap();
        append_call_arg(&mut doc, &handle, selector_composite("shipping", "ShippingModule"))
            .unwrap();

        let printed = print(&doc);
        assert!(
            printed.contains("core.New(billing.BillingModule{}, shipping.ShippingModule{})"),
            "output: {}",
            printed
        );
    }

    #[test]
    fn test_wrong_handle_is_anchor_mismatch() {
        let mut doc = parse(SRC).unwrap();
        let imports = locate(&doc, &Pattern::SoleImportList).unwrap();
        let err = append_call_arg(&mut doc, &imports, Expr::Ident("x".into())).unwrap_err();
        assert!(matches!(err, AppError::AnchorMismatch(_)));

        let call = locate(
            &doc,
            &Pattern::SelectorCall {
                base: "core".into(),
                member: "New".into(),
            },
        )
        .unwrap();
        let err = append_map_entry(&mut doc, &call, "k", Expr::Ident("v".into())).unwrap_err();
        assert!(matches!(err, AppError::AnchorMismatch(_)));
    }
}

#![deny(missing_docs)]

//! # Anchor Locator
//!
//! Finds the node a mutation should extend. Patterns are matched over a
//! pre-order, depth-first traversal of the document; the first match wins and
//! later candidates are ignored, even if a later one would be a better
//! semantic fit. The locator returns an opaque [`NodeHandle`] (a child-index
//! path from the document root) rather than a live reference; the mutator
//! re-resolves the handle when it applies an edit.

use crate::error::{AppError, AppResult};
use crate::syntax::ast::*;

/// A structural pattern the locator can search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// The first (and expected-only) import declaration among the top-level
    /// declarations.
    SoleImportList,
    /// The first composite literal whose type is a map keyed by `string`.
    StringKeyedAggregate,
    /// The first call whose callee is `base.member`.
    SelectorCall {
        /// Identifier before the dot.
        base: String,
        /// Member after the dot.
        member: String,
    },
}

impl Pattern {
    /// Human-readable pattern name for error reporting.
    pub fn describe(&self) -> String {
        match self {
            Pattern::SoleImportList => "import list".to_string(),
            Pattern::StringKeyedAggregate => "string-keyed map literal".to_string(),
            Pattern::SelectorCall { base, member } => {
                format!("call to {}.{}", base, member)
            }
        }
    }
}

/// Opaque handle to a located node: the child-index path from the document
/// root, valid only against the document it was located in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    pub(crate) path: Vec<usize>,
}

/// Borrowed view of a tree node during traversal.
pub(crate) enum NodeRef<'a> {
    Decl(&'a Decl),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

/// Mutable counterpart of [`NodeRef`].
pub(crate) enum NodeMut<'a> {
    Decl(&'a mut Decl),
    Stmt(&'a mut Stmt),
    Expr(&'a mut Expr),
}

/// Locates the first node matching `pattern` in pre-order.
pub fn locate(doc: &Document, pattern: &Pattern) -> AppResult<NodeHandle> {
    if let Pattern::SoleImportList = pattern {
        return doc
            .decls
            .iter()
            .position(|d| matches!(d.kind, DeclKind::Import(_)))
            .map(|i| NodeHandle { path: vec![i] })
            .ok_or_else(|| AppError::AnchorNotFound("no import list".into()));
    }
    for (i, decl) in doc.decls.iter().enumerate() {
        if let Some(mut path) = dfs(NodeRef::Decl(decl), pattern) {
            path.insert(0, i);
            return Ok(NodeHandle { path });
        }
    }
    Err(AppError::AnchorNotFound(format!(
        "no {}",
        pattern.describe()
    )))
}

fn dfs(node: NodeRef<'_>, pattern: &Pattern) -> Option<Vec<usize>> {
    if matches(&node, pattern) {
        return Some(Vec::new());
    }
    for (i, child) in children(node).into_iter().enumerate() {
        if let Some(mut path) = dfs(child, pattern) {
            path.insert(0, i);
            return Some(path);
        }
    }
    None
}

fn matches(node: &NodeRef<'_>, pattern: &Pattern) -> bool {
    match (node, pattern) {
        (NodeRef::Expr(Expr::Composite { ty, .. }), Pattern::StringKeyedAggregate) => {
            ty.is_string_keyed_map()
        }
        (NodeRef::Expr(Expr::Call { callee, .. }), Pattern::SelectorCall { base, member }) => {
            match callee.as_ref() {
                Expr::Selector {
                    base: callee_base,
                    member: callee_member,
                } => {
                    matches!(callee_base.as_ref(), Expr::Ident(name) if name == base)
                        && callee_member == member
                }
                _ => false,
            }
        }
        _ => false,
    }
}

/// Re-resolves a handle against a document. The mutator goes through
/// [`resolve_mut`]; this read-only twin exists to cross-check the two child
/// enumerations in tests.
#[cfg(test)]
pub(crate) fn resolve<'a>(doc: &'a Document, handle: &NodeHandle) -> Option<NodeRef<'a>> {
    let (first, rest) = handle.path.split_first()?;
    let mut node = NodeRef::Decl(doc.decls.get(*first)?);
    for &i in rest {
        node = children(node).into_iter().nth(i)?;
    }
    Some(node)
}

/// Mutable re-resolution, used by the mutator to apply an edit at a handle.
pub(crate) fn resolve_mut<'a>(doc: &'a mut Document, handle: &NodeHandle) -> Option<NodeMut<'a>> {
    let (first, rest) = handle.path.split_first()?;
    let mut node = NodeMut::Decl(doc.decls.get_mut(*first)?);
    for &i in rest {
        node = children_mut(node).into_iter().nth(i)?;
    }
    Some(node)
}

// The two child enumerations below must stay in the same order; the locator
// records indices from the immutable walk and the mutator replays them on the
// mutable one.

fn children(node: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    match node {
        NodeRef::Decl(decl) => match &decl.kind {
            DeclKind::Import(_) | DeclKind::Type(_) => {}
            DeclKind::Var(var) => out.extend(var.values.iter().map(NodeRef::Expr)),
            DeclKind::Func(func) => out.extend(func.body.stmts.iter().map(NodeRef::Stmt)),
        },
        NodeRef::Stmt(stmt) => match &stmt.kind {
            StmtKind::Expr(e) => out.push(NodeRef::Expr(e)),
            StmtKind::Assign { lhs, rhs, .. } => {
                out.extend(lhs.iter().map(NodeRef::Expr));
                out.extend(rhs.iter().map(NodeRef::Expr));
            }
            StmtKind::IncDec { target, .. } => out.push(NodeRef::Expr(target)),
            StmtKind::Var(var) => out.extend(var.values.iter().map(NodeRef::Expr)),
            StmtKind::Return(exprs) => out.extend(exprs.iter().map(NodeRef::Expr)),
            StmtKind::If(ifstmt) => {
                if let Some(init) = &ifstmt.init {
                    out.push(NodeRef::Stmt(init));
                }
                out.push(NodeRef::Expr(&ifstmt.cond));
                out.extend(ifstmt.then.stmts.iter().map(NodeRef::Stmt));
                if let Some(els) = &ifstmt.els {
                    out.extend(els.stmts.iter().map(NodeRef::Stmt));
                }
            }
            StmtKind::For(forstmt) => {
                if let Some(init) = &forstmt.init {
                    out.push(NodeRef::Stmt(init));
                }
                if let Some(cond) = &forstmt.cond {
                    out.push(NodeRef::Expr(cond));
                }
                if let Some(post) = &forstmt.post {
                    out.push(NodeRef::Stmt(post));
                }
                out.extend(forstmt.body.stmts.iter().map(NodeRef::Stmt));
            }
            StmtKind::Range(range) => {
                if let Some(key) = &range.key {
                    out.push(NodeRef::Expr(key));
                }
                if let Some(value) = &range.value {
                    out.push(NodeRef::Expr(value));
                }
                out.push(NodeRef::Expr(&range.expr));
                out.extend(range.body.stmts.iter().map(NodeRef::Stmt));
            }
            StmtKind::Go(e) | StmtKind::Defer(e) => out.push(NodeRef::Expr(e)),
            StmtKind::Block(block) => out.extend(block.stmts.iter().map(NodeRef::Stmt)),
            StmtKind::Break | StmtKind::Continue => {}
        },
        NodeRef::Expr(expr) => match expr {
            Expr::Ident(_) | Expr::Lit(_) => {}
            Expr::Selector { base, .. } => out.push(NodeRef::Expr(base)),
            Expr::Call { callee, args } => {
                out.push(NodeRef::Expr(callee));
                out.extend(args.iter().map(NodeRef::Expr));
            }
            Expr::Composite { elems, .. } => {
                for elem in elems {
                    if let Some(key) = &elem.key {
                        out.push(NodeRef::Expr(key));
                    }
                    out.push(NodeRef::Expr(&elem.value));
                }
            }
            Expr::FuncLit { body, .. } => out.extend(body.stmts.iter().map(NodeRef::Stmt)),
            Expr::Unary { operand, .. } => out.push(NodeRef::Expr(operand)),
            Expr::Binary { lhs, rhs, .. } => {
                out.push(NodeRef::Expr(lhs));
                out.push(NodeRef::Expr(rhs));
            }
            Expr::Paren(inner) => out.push(NodeRef::Expr(inner)),
            Expr::Index { base, index } => {
                out.push(NodeRef::Expr(base));
                out.push(NodeRef::Expr(index));
            }
        },
    }
    out
}

fn children_mut(node: NodeMut<'_>) -> Vec<NodeMut<'_>> {
    let mut out = Vec::new();
    match node {
        NodeMut::Decl(decl) => match &mut decl.kind {
            DeclKind::Import(_) | DeclKind::Type(_) => {}
            DeclKind::Var(var) => out.extend(var.values.iter_mut().map(NodeMut::Expr)),
            DeclKind::Func(func) => out.extend(func.body.stmts.iter_mut().map(NodeMut::Stmt)),
        },
        NodeMut::Stmt(stmt) => match &mut stmt.kind {
            StmtKind::Expr(e) => out.push(NodeMut::Expr(e)),
            StmtKind::Assign { lhs, rhs, .. } => {
                out.extend(lhs.iter_mut().map(NodeMut::Expr));
                out.extend(rhs.iter_mut().map(NodeMut::Expr));
            }
            StmtKind::IncDec { target, .. } => out.push(NodeMut::Expr(target)),
            StmtKind::Var(var) => out.extend(var.values.iter_mut().map(NodeMut::Expr)),
            StmtKind::Return(exprs) => out.extend(exprs.iter_mut().map(NodeMut::Expr)),
            StmtKind::If(ifstmt) => {
                if let Some(init) = &mut ifstmt.init {
                    out.push(NodeMut::Stmt(init));
                }
                out.push(NodeMut::Expr(&mut ifstmt.cond));
                out.extend(ifstmt.then.stmts.iter_mut().map(NodeMut::Stmt));
                if let Some(els) = &mut ifstmt.els {
                    out.extend(els.stmts.iter_mut().map(NodeMut::Stmt));
                }
            }
            StmtKind::For(forstmt) => {
                if let Some(init) = &mut forstmt.init {
                    out.push(NodeMut::Stmt(init));
                }
                if let Some(cond) = &mut forstmt.cond {
                    out.push(NodeMut::Expr(cond));
                }
                if let Some(post) = &mut forstmt.post {
                    out.push(NodeMut::Stmt(post));
                }
                out.extend(forstmt.body.stmts.iter_mut().map(NodeMut::Stmt));
            }
            StmtKind::Range(range) => {
                if let Some(key) = &mut range.key {
                    out.push(NodeMut::Expr(key));
                }
                if let Some(value) = &mut range.value {
                    out.push(NodeMut::Expr(value));
                }
                out.push(NodeMut::Expr(&mut range.expr));
                out.extend(range.body.stmts.iter_mut().map(NodeMut::Stmt));
            }
            StmtKind::Go(e) | StmtKind::Defer(e) => out.push(NodeMut::Expr(e)),
            StmtKind::Block(block) => out.extend(block.stmts.iter_mut().map(NodeMut::Stmt)),
            StmtKind::Break | StmtKind::Continue => {}
        },
        NodeMut::Expr(expr) => match expr {
            Expr::Ident(_) | Expr::Lit(_) => {}
            Expr::Selector { base, .. } => out.push(NodeMut::Expr(base)),
            Expr::Call { callee, args } => {
                out.push(NodeMut::Expr(callee));
                out.extend(args.iter_mut().map(NodeMut::Expr));
            }
            Expr::Composite { elems, .. } => {
                for elem in elems {
                    if let Some(key) = &mut elem.key {
                        out.push(NodeMut::Expr(key));
                    }
                    out.push(NodeMut::Expr(&mut elem.value));
                }
            }
            Expr::FuncLit { body, .. } => out.extend(body.stmts.iter_mut().map(NodeMut::Stmt)),
            Expr::Unary { operand, .. } => out.push(NodeMut::Expr(operand)),
            Expr::Binary { lhs, rhs, .. } => {
                out.push(NodeMut::Expr(lhs));
                out.push(NodeMut::Expr(rhs));
            }
            Expr::Paren(inner) => out.push(NodeMut::Expr(inner)),
            Expr::Index { base, index } => {
                out.push(NodeMut::Expr(base));
                out.push(NodeMut::Expr(index));
            }
        },
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse;

    const SRC: &str = r#"package main

import (
	"log"
)

func main() {
	apps := map[string]AppRunner{}
	app := core.New()
	app.Start(":8081")
	log.Println("up")
}
"#;

    #[test]
    fn test_locate_sole_import_list() {
        let doc = parse(SRC).unwrap();
        let handle = locate(&doc, &Pattern::SoleImportList).unwrap();
        assert_eq!(handle.path, vec![0]);
    }

    #[test]
    fn test_locate_string_keyed_aggregate() {
        let doc = parse(SRC).unwrap();
        let handle = locate(&doc, &Pattern::StringKeyedAggregate).unwrap();
        let Some(NodeRef::Expr(Expr::Composite { ty, .. })) = resolve(&doc, &handle) else {
            panic!("handle should resolve to the composite literal");
        };
        assert!(ty.is_string_keyed_map());
    }

    #[test]
    fn test_locate_selector_call() {
        let doc = parse(SRC).unwrap();
        let handle = locate(
            &doc,
            &Pattern::SelectorCall {
                base: "core".into(),
                member: "New".into(),
            },
        )
        .unwrap();
        let Some(NodeRef::Expr(Expr::Call { args, .. })) = resolve(&doc, &handle) else {
            panic!("handle should resolve to the call");
        };
        assert!(args.is_empty());
    }

    #[test]
    fn test_missing_anchor_reports_pattern() {
        let doc = parse(SRC).unwrap();
        let err = locate(
            &doc,
            &Pattern::SelectorCall {
                base: "core".into(),
                member: "Missing".into(),
            },
        )
        .unwrap_err();
        match err {
            AppError::AnchorNotFound(msg) => assert_eq!(msg, "no call to core.Missing"),
            other => panic!("expected AnchorNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_no_import_list() {
        let doc = parse("package p\n\nfunc f() {\n}\n").unwrap();
        let err = locate(&doc, &Pattern::SoleImportList).unwrap_err();
        assert!(matches!(err, AppError::AnchorNotFound(_)));
    }

    #[test]
    fn test_first_match_wins_in_preorder() {
        // Two string-keyed literals; the earlier declaration wins.
        let src = "package p\n\nfunc a() {\n\tfirst := map[string]int{}\n\t_ = first\n}\n\nfunc b() {\n\tsecond := map[string]int{}\n\t_ = second\n}\n";
        let doc = parse(src).unwrap();
        let handle = locate(&doc, &Pattern::StringKeyedAggregate).unwrap();
        assert_eq!(handle.path[0], 0);
    }

    #[test]
    fn test_mutable_resolution_mirrors_immutable() {
        let mut doc = parse(SRC).unwrap();
        let handle = locate(
            &doc,
            &Pattern::SelectorCall {
                base: "core".into(),
                member: "New".into(),
            },
        )
        .unwrap();
        assert!(matches!(
            resolve(&doc, &handle),
            Some(NodeRef::Expr(Expr::Call { .. }))
        ));
        assert!(matches!(
            resolve_mut(&mut doc, &handle),
            Some(NodeMut::Expr(Expr::Call { .. }))
        ));
    }
}

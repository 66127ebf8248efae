#![deny(missing_docs)]

//! # Canonical Printer
//!
//! Serializes a [`Document`] back to Go source with fixed formatting rules:
//! tab indentation, parenthesized import blocks, one blank line between
//! top-level declarations, single-line composite literals, comments above the
//! node that owns them. The output is canonical: printing, reparsing and
//! printing again yields identical bytes.

use crate::syntax::ast::*;

/// Prints the whole document as canonical Go source.
pub fn print(doc: &Document) -> String {
    let mut p = Printer {
        out: String::new(),
        indent: 0,
    };
    p.document(doc);
    p.out
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn line(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn comments(&mut self, group: &[String]) {
        for comment in group {
            // Continuation lines of block comments are re-indented from
            // scratch, which keeps a second print byte-identical.
            for line in comment.lines() {
                self.line(line.trim());
            }
        }
    }

    fn document(&mut self, doc: &Document) {
        self.comments(&doc.package_doc);
        self.line(&format!("package {}", doc.package));
        for decl in &doc.decls {
            self.out.push('\n');
            self.decl(decl);
        }
        if !doc.tail_comments.is_empty() {
            self.out.push('\n');
            self.comments(&doc.tail_comments);
        }
    }

    fn decl(&mut self, decl: &Decl) {
        self.comments(&decl.doc);
        match &decl.kind {
            DeclKind::Import(imports) => self.import_decl(imports),
            DeclKind::Type(decl) => self.type_decl(decl),
            DeclKind::Var(decl) => {
                let text = self.var_decl(decl);
                self.line(&text);
            }
            DeclKind::Func(decl) => self.func_decl(decl),
        }
    }

    fn import_decl(&mut self, imports: &ImportDecl) {
        self.line("import (");
        self.indent += 1;
        for spec in &imports.specs {
            self.comments(&spec.doc);
            let line = match &spec.alias {
                Some(alias) => format!("{} \"{}\"", alias, spec.path),
                None => format!("\"{}\"", spec.path),
            };
            self.line(&line);
        }
        self.indent -= 1;
        self.line(")");
    }

    fn type_decl(&mut self, decl: &TypeDecl) {
        let eq = if decl.alias { "= " } else { "" };
        match &decl.ty {
            TypeExpr::Struct(body) if !body.fields.is_empty() || !body.tail_comments.is_empty() => {
                self.line(&format!("type {} {}struct {{", decl.name, eq));
                self.indent += 1;
                for field in &body.fields {
                    self.comments(&field.doc);
                    let mut text = if field.names.is_empty() {
                        String::new()
                    } else {
                        format!("{} ", field.names.join(", "))
                    };
                    text.push_str(&type_expr(&field.ty));
                    if let Some(tag) = &field.tag {
                        text.push(' ');
                        text.push_str(tag);
                    }
                    self.line(&text);
                }
                self.comments(&body.tail_comments);
                self.indent -= 1;
                self.line("}");
            }
            TypeExpr::Interface(body) if !body.elems.is_empty() || !body.tail_comments.is_empty() => {
                self.line(&format!("type {} {}interface {{", decl.name, eq));
                self.indent += 1;
                for elem in &body.elems {
                    match elem {
                        InterfaceElem::Method {
                            doc,
                            name,
                            params,
                            results,
                        } => {
                            self.comments(doc);
                            let text =
                                format!("{}({}){}", name, params_list(params), results_suffix(results));
                            self.line(&text);
                        }
                        InterfaceElem::Embedded { doc, ty } => {
                            self.comments(doc);
                            let text = type_expr(ty);
                            self.line(&text);
                        }
                    }
                }
                self.comments(&body.tail_comments);
                self.indent -= 1;
                self.line("}");
            }
            other => {
                self.line(&format!("type {} {}{}", decl.name, eq, type_expr(other)));
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) -> String {
        let keyword = if decl.is_const { "const" } else { "var" };
        let mut text = format!("{} {}", keyword, decl.names.join(", "));
        if let Some(ty) = &decl.ty {
            text.push(' ');
            text.push_str(&type_expr(ty));
        }
        if !decl.values.is_empty() {
            text.push_str(" = ");
            text.push_str(&self.expr_list(&decl.values));
        }
        text
    }

    fn func_decl(&mut self, decl: &FuncDecl) {
        let recv = match &decl.recv {
            Some(param) => format!("({}) ", param_text(param)),
            None => String::new(),
        };
        self.line(&format!(
            "func {}{}({}){} {{",
            recv,
            decl.name,
            params_list(&decl.params),
            results_suffix(&decl.results)
        ));
        self.block_body(&decl.body);
        self.line("}");
    }

    fn block_body(&mut self, block: &Block) {
        self.indent += 1;
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.comments(&block.tail_comments);
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.comments(&stmt.doc);
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let text = self.expr(expr);
                self.line(&text);
            }
            StmtKind::Assign { lhs, op, rhs } => {
                let text = format!(
                    "{} {} {}",
                    self.expr_list(lhs),
                    op.as_str(),
                    self.expr_list(rhs)
                );
                self.line(&text);
            }
            StmtKind::IncDec { target, inc } => {
                let text = format!("{}{}", self.expr(target), if *inc { "++" } else { "--" });
                self.line(&text);
            }
            StmtKind::Var(decl) => {
                let text = self.var_decl(decl);
                self.line(&text);
            }
            StmtKind::Return(exprs) => {
                let text = if exprs.is_empty() {
                    "return".to_string()
                } else {
                    format!("return {}", self.expr_list(exprs))
                };
                self.line(&text);
            }
            StmtKind::If(ifstmt) => {
                let header = self.if_header(ifstmt);
                self.line(&format!("{} {{", header));
                self.if_tail(ifstmt);
            }
            StmtKind::For(forstmt) => {
                let mut header = "for".to_string();
                match (&forstmt.init, &forstmt.cond, &forstmt.post) {
                    (None, None, None) => {}
                    (None, Some(cond), None) => {
                        header.push(' ');
                        header.push_str(&self.expr(cond));
                    }
                    (init, cond, post) => {
                        header.push(' ');
                        if let Some(init) = init {
                            header.push_str(&self.simple_stmt(&init.kind));
                        }
                        header.push(';');
                        if let Some(cond) = cond {
                            header.push(' ');
                            header.push_str(&self.expr(cond));
                        }
                        header.push(';');
                        if let Some(post) = post {
                            header.push(' ');
                            header.push_str(&self.simple_stmt(&post.kind));
                        }
                    }
                }
                self.line(&format!("{} {{", header));
                self.block_body(&forstmt.body);
                self.line("}");
            }
            StmtKind::Range(range) => {
                let mut header = "for ".to_string();
                match (&range.key, &range.value) {
                    (Some(key), Some(value)) => {
                        header.push_str(&format!("{}, {} ", self.expr(key), self.expr(value)));
                        header.push_str(if range.define { ":= " } else { "= " });
                    }
                    (Some(key), None) => {
                        header.push_str(&format!("{} ", self.expr(key)));
                        header.push_str(if range.define { ":= " } else { "= " });
                    }
                    _ => {}
                }
                header.push_str(&format!("range {} {{", self.expr(&range.expr)));
                self.line(&header);
                self.block_body(&range.body);
                self.line("}");
            }
            StmtKind::Go(expr) => {
                let text = format!("go {}", self.expr(expr));
                self.line(&text);
            }
            StmtKind::Defer(expr) => {
                let text = format!("defer {}", self.expr(expr));
                self.line(&text);
            }
            StmtKind::Block(block) => {
                self.line("{");
                self.block_body(block);
                self.line("}");
            }
            StmtKind::Break => self.line("break"),
            StmtKind::Continue => self.line("continue"),
        }
    }

    fn if_header(&mut self, ifstmt: &IfStmt) -> String {
        let mut header = "if ".to_string();
        if let Some(init) = &ifstmt.init {
            header.push_str(&self.simple_stmt(&init.kind));
            header.push_str("; ");
        }
        header.push_str(&self.expr(&ifstmt.cond));
        header
    }

    /// Prints the then-block and the else chain, re-sugaring an else block
    /// that holds a single bare `if` back into `else if`.
    fn if_tail(&mut self, ifstmt: &IfStmt) {
        self.block_body(&ifstmt.then);
        match &ifstmt.els {
            None => self.line("}"),
            Some(els) => {
                if els.tail_comments.is_empty()
                    && els.stmts.len() == 1
                    && els.stmts[0].doc.is_empty()
                {
                    if let StmtKind::If(nested) = &els.stmts[0].kind {
                        let header = self.if_header(nested);
                        self.line(&format!("}} else {} {{", header));
                        self.if_tail(nested);
                        return;
                    }
                }
                self.line("} else {");
                self.block_body(els);
                self.line("}");
            }
        }
    }

    fn simple_stmt(&mut self, kind: &StmtKind) -> String {
        match kind {
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::Assign { lhs, op, rhs } => format!(
                "{} {} {}",
                self.expr_list(lhs),
                op.as_str(),
                self.expr_list(rhs)
            ),
            StmtKind::IncDec { target, inc } => {
                format!("{}{}", self.expr(target), if *inc { "++" } else { "--" })
            }
            StmtKind::Var(decl) => self.var_decl(decl),
            _ => String::new(),
        }
    }

    fn expr_list(&mut self, exprs: &[Expr]) -> String {
        exprs
            .iter()
            .map(|e| self.expr(e))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Ident(name) => name.clone(),
            Expr::Selector { base, member } => format!("{}.{}", self.expr(base), member),
            Expr::Call { callee, args } => {
                let callee_text = self.expr(callee);
                format!("{}({})", callee_text, self.expr_list(args))
            }
            Expr::Composite { ty, elems } => {
                let mut text = type_expr(ty);
                text.push('{');
                let parts: Vec<String> = elems
                    .iter()
                    .map(|elem| match &elem.key {
                        Some(key) => format!("{}: {}", self.expr(key), self.expr(&elem.value)),
                        None => self.expr(&elem.value),
                    })
                    .collect();
                text.push_str(&parts.join(", "));
                text.push('}');
                text
            }
            Expr::Lit(lit) => lit.raw.clone(),
            Expr::FuncLit {
                params,
                results,
                body,
            } => {
                // Multi-line literal: the body is printed at the current
                // indent and the caller appends to the closing brace line.
                let mut text = format!("func({}){} {{\n", params_list(params), results_suffix(results));
                let saved = std::mem::take(&mut self.out);
                self.block_body(body);
                let body_text = std::mem::replace(&mut self.out, saved);
                text.push_str(&body_text);
                for _ in 0..self.indent {
                    text.push('\t');
                }
                text.push('}');
                text
            }
            Expr::Unary { op, operand } => format!("{}{}", op.as_str(), self.expr(operand)),
            Expr::Binary { op, lhs, rhs } => format!(
                "{} {} {}",
                self.expr(lhs),
                op.as_str(),
                self.expr(rhs)
            ),
            Expr::Paren(inner) => format!("({})", self.expr(inner)),
            Expr::Index { base, index } => {
                format!("{}[{}]", self.expr(base), self.expr(index))
            }
        }
    }
}

fn param_text(param: &Param) -> String {
    match &param.name {
        Some(name) => format!("{} {}", name, type_expr(&param.ty)),
        None => type_expr(&param.ty),
    }
}

fn params_list(params: &[Param]) -> String {
    params
        .iter()
        .map(param_text)
        .collect::<Vec<_>>()
        .join(", ")
}

fn results_suffix(results: &[TypeExpr]) -> String {
    match results {
        [] => String::new(),
        [single] => format!(" {}", type_expr(single)),
        many => {
            let list: Vec<String> = many.iter().map(type_expr).collect();
            format!(" ({})", list.join(", "))
        }
    }
}

fn type_expr(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Ident(name) => name.clone(),
        TypeExpr::Selector { base, member } => format!("{}.{}", base, member),
        TypeExpr::Pointer(inner) => format!("*{}", type_expr(inner)),
        TypeExpr::Map { key, value } => {
            format!("map[{}]{}", type_expr(key), type_expr(value))
        }
        TypeExpr::Slice(elem) => format!("[]{}", type_expr(elem)),
        TypeExpr::Array { len, elem } => format!("[{}]{}", len, type_expr(elem)),
        TypeExpr::Struct(body) if body.fields.is_empty() && body.tail_comments.is_empty() => {
            "struct{}".to_string()
        }
        TypeExpr::Struct(body) => {
            // Inline struct types only occur empty in practice; a populated
            // one is still printable, single-line, for robustness.
            let fields: Vec<String> = body
                .fields
                .iter()
                .map(|f| {
                    let mut text = if f.names.is_empty() {
                        String::new()
                    } else {
                        format!("{} ", f.names.join(", "))
                    };
                    text.push_str(&type_expr(&f.ty));
                    text
                })
                .collect();
            format!("struct {{ {} }}", fields.join("; "))
        }
        TypeExpr::Interface(body) if body.elems.is_empty() && body.tail_comments.is_empty() => {
            "interface{}".to_string()
        }
        TypeExpr::Interface(body) => {
            let elems: Vec<String> = body
                .elems
                .iter()
                .map(|e| match e {
                    InterfaceElem::Method {
                        name,
                        params,
                        results,
                        ..
                    } => format!("{}({}){}", name, params_list(params), results_suffix(results)),
                    InterfaceElem::Embedded { ty, .. } => type_expr(ty),
                })
                .collect();
            format!("interface {{ {} }}", elems.join("; "))
        }
        TypeExpr::Func { params, results } => {
            format!("func({}){}", params_list(params), results_suffix(results))
        }
    }
}

#![deny(missing_docs)]

//! # Go Parser
//!
//! Hand-written recursive descent over the cooked token vector, producing the
//! Document Model. Pure function of the input text; any input outside the
//! supported grammar fails with a positioned parse error and nothing
//! downstream runs.
//!
//! Comment binding: a comment group sitting before a declaration or statement
//! becomes that node's leading group; comments before a closing brace land in
//! the enclosing body's tail slot. Inside a parenthesized import block a
//! comment binds to the spec below it; a comment between the last spec and
//! the closing `)` has no spec to bind to and migrates to the next
//! declaration on round trip.

use crate::error::{AppError, AppResult};
use crate::syntax::ast::*;
use crate::syntax::lexer::{lex, Comment, TokKind, Token};

/// Parses one Go source file into a [`Document`].
pub fn parse(source: &str) -> AppResult<Document> {
    let stream = lex(source)?;
    let mut parser = Parser {
        tokens: stream.tokens,
        pos: 0,
        comments: stream.comments,
        cpos: 0,
    };
    parser.parse_document()
}

/// Outcome of parsing a simple statement in a `for` header.
enum SimpleOrRange {
    Simple(StmtKind),
    Range {
        lhs: Vec<Expr>,
        define: bool,
        expr: Expr,
    },
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    comments: Vec<Comment>,
    cpos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokKind {
        self.tokens[self.pos].kind
    }

    fn peek2_kind(&self) -> TokKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind)
            .unwrap_or(TokKind::Eof)
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: TokKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokKind, what: &str) -> AppResult<Token> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.err_here(format!("expected {}", what)))
        }
    }

    fn err_here(&self, message: String) -> AppError {
        let tok = self.peek();
        let message = if tok.text.is_empty() {
            message
        } else {
            format!("{}, found {:?}", message, tok.text)
        };
        AppError::Parse {
            line: tok.line,
            col: tok.col,
            message,
        }
    }

    /// Drains comments that start before byte offset `before`.
    fn take_comments_before(&mut self, before: u32) -> CommentGroup {
        let mut group = Vec::new();
        while self.cpos < self.comments.len() && self.comments[self.cpos].start < before {
            group.push(self.comments[self.cpos].text.clone());
            self.cpos += 1;
        }
        group
    }

    /// Comments preceding the current token.
    fn leading_comments(&mut self) -> CommentGroup {
        let start = self.peek().start;
        self.take_comments_before(start)
    }

    fn skip_semis(&mut self) {
        while self.at(TokKind::Semi) {
            self.bump();
        }
    }

    /// Statement terminator: a semicolon (explicit or inserted), or the
    /// closing brace / EOF where Go permits omission.
    fn expect_terminator(&mut self) -> AppResult<()> {
        if self.eat(TokKind::Semi) || self.at(TokKind::RBrace) || self.at(TokKind::Eof) {
            Ok(())
        } else {
            Err(self.err_here("expected ';' or newline".into()))
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_document(&mut self) -> AppResult<Document> {
        let package_doc = self.leading_comments();
        self.expect(TokKind::Package, "'package'")?;
        let package = self.expect(TokKind::Ident, "package name")?.text;
        self.expect_terminator()?;

        let mut decls = Vec::new();
        loop {
            self.skip_semis();
            if self.at(TokKind::Eof) {
                break;
            }
            let doc = self.leading_comments();
            let kind = match self.peek_kind() {
                TokKind::Import => DeclKind::Import(self.parse_import_decl()?),
                TokKind::Type => DeclKind::Type(self.parse_type_decl()?),
                TokKind::Var => DeclKind::Var(self.parse_var_decl(false)?),
                TokKind::Const => DeclKind::Var(self.parse_var_decl(true)?),
                TokKind::Func => DeclKind::Func(self.parse_func_decl()?),
                _ => return Err(self.err_here("expected declaration".into())),
            };
            decls.push(Decl { doc, kind });
            self.expect_terminator()?;
        }

        let tail_comments = self.take_comments_before(u32::MAX);
        Ok(Document {
            package_doc,
            package,
            decls,
            tail_comments,
        })
    }

    fn parse_import_decl(&mut self) -> AppResult<ImportDecl> {
        self.expect(TokKind::Import, "'import'")?;
        let mut specs = Vec::new();
        if self.eat(TokKind::LParen) {
            loop {
                self.skip_semis();
                if self.eat(TokKind::RParen) {
                    break;
                }
                let doc = self.leading_comments();
                let mut spec = self.parse_import_spec()?;
                spec.doc = doc;
                specs.push(spec);
            }
        } else {
            specs.push(self.parse_import_spec()?);
        }
        Ok(ImportDecl { specs })
    }

    fn parse_import_spec(&mut self) -> AppResult<ImportSpec> {
        let alias = if self.at(TokKind::Ident) {
            Some(self.bump().text)
        } else if self.at(TokKind::Dot) {
            self.bump();
            Some(".".to_string())
        } else {
            None
        };
        let path_tok = self.expect(TokKind::Str, "import path string")?;
        Ok(ImportSpec {
            doc: Vec::new(),
            alias,
            path: unquote(&path_tok.text),
        })
    }

    fn parse_type_decl(&mut self) -> AppResult<TypeDecl> {
        self.expect(TokKind::Type, "'type'")?;
        let name = self.expect(TokKind::Ident, "type name")?.text;
        let alias = self.eat(TokKind::Assign);
        let ty = self.parse_type()?;
        Ok(TypeDecl { name, alias, ty })
    }

    fn parse_var_decl(&mut self, is_const: bool) -> AppResult<VarDecl> {
        if is_const {
            self.expect(TokKind::Const, "'const'")?;
        } else {
            self.expect(TokKind::Var, "'var'")?;
        }
        let mut names = vec![self.expect(TokKind::Ident, "name")?.text];
        while self.eat(TokKind::Comma) {
            names.push(self.expect(TokKind::Ident, "name")?.text);
        }
        let ty = if self.at(TokKind::Assign) || self.at(TokKind::Semi) || self.at(TokKind::RBrace) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let values = if self.eat(TokKind::Assign) {
            self.parse_expr_list(false)?
        } else {
            Vec::new()
        };
        Ok(VarDecl {
            is_const,
            names,
            ty,
            values,
        })
    }

    fn parse_func_decl(&mut self) -> AppResult<FuncDecl> {
        self.expect(TokKind::Func, "'func'")?;
        let recv = if self.at(TokKind::LParen) {
            self.bump();
            let name = self.expect(TokKind::Ident, "receiver name")?.text;
            let ty = self.parse_type()?;
            self.expect(TokKind::RParen, "')' after receiver")?;
            Some(Param {
                name: Some(name),
                ty,
            })
        } else {
            None
        };
        let name = self.expect(TokKind::Ident, "function name")?.text;
        let params = self.parse_params()?;
        let results = self.parse_results()?;
        let body = self.parse_block()?;
        Ok(FuncDecl {
            recv,
            name,
            params,
            results,
            body,
        })
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn starts_type(kind: TokKind) -> bool {
        matches!(
            kind,
            TokKind::Ident
                | TokKind::Star
                | TokKind::LBrack
                | TokKind::Map
                | TokKind::Func
                | TokKind::Interface
                | TokKind::Struct
        )
    }

    fn parse_type(&mut self) -> AppResult<TypeExpr> {
        match self.peek_kind() {
            TokKind::Ident => {
                let base = self.bump().text;
                if self.eat(TokKind::Dot) {
                    let member = self.expect(TokKind::Ident, "qualified type name")?.text;
                    Ok(TypeExpr::Selector { base, member })
                } else {
                    Ok(TypeExpr::Ident(base))
                }
            }
            TokKind::Star => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokKind::Map => {
                self.bump();
                self.expect(TokKind::LBrack, "'[' after 'map'")?;
                let key = self.parse_type()?;
                self.expect(TokKind::RBrack, "']' after map key type")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokKind::LBrack => {
                self.bump();
                if self.eat(TokKind::RBrack) {
                    Ok(TypeExpr::Slice(Box::new(self.parse_type()?)))
                } else {
                    let len = self.expect(TokKind::Number, "array length")?.text;
                    self.expect(TokKind::RBrack, "']' after array length")?;
                    Ok(TypeExpr::Array {
                        len,
                        elem: Box::new(self.parse_type()?),
                    })
                }
            }
            TokKind::Func => {
                self.bump();
                let params = self.parse_params()?;
                let results = self.parse_results()?;
                Ok(TypeExpr::Func { params, results })
            }
            TokKind::Interface => {
                self.bump();
                Ok(TypeExpr::Interface(self.parse_interface_body()?))
            }
            TokKind::Struct => {
                self.bump();
                Ok(TypeExpr::Struct(self.parse_struct_body()?))
            }
            _ => Err(self.err_here("expected type".into())),
        }
    }

    fn parse_interface_body(&mut self) -> AppResult<InterfaceType> {
        self.expect(TokKind::LBrace, "'{' after 'interface'")?;
        let mut body = InterfaceType::default();
        loop {
            self.skip_semis();
            if self.at(TokKind::RBrace) {
                body.tail_comments = self.leading_comments();
                self.bump();
                break;
            }
            let doc = self.leading_comments();
            if self.at(TokKind::Ident) && self.peek2_kind() == TokKind::LParen {
                let name = self.bump().text;
                let params = self.parse_params()?;
                let results = self.parse_results()?;
                body.elems.push(InterfaceElem::Method {
                    doc,
                    name,
                    params,
                    results,
                });
            } else {
                let ty = self.parse_type()?;
                body.elems.push(InterfaceElem::Embedded { doc, ty });
            }
            self.expect_terminator()?;
        }
        Ok(body)
    }

    fn parse_struct_body(&mut self) -> AppResult<StructType> {
        self.expect(TokKind::LBrace, "'{' after 'struct'")?;
        let mut body = StructType::default();
        loop {
            self.skip_semis();
            if self.at(TokKind::RBrace) {
                body.tail_comments = self.leading_comments();
                self.bump();
                break;
            }
            let doc = self.leading_comments();
            let named = self.at(TokKind::Ident)
                && (Self::starts_type(self.peek2_kind()) || self.peek2_kind() == TokKind::Comma)
                && self.peek2_kind() != TokKind::Dot;
            let (names, ty) = if named {
                let mut names = vec![self.bump().text];
                while self.eat(TokKind::Comma) {
                    names.push(self.expect(TokKind::Ident, "field name")?.text);
                }
                (names, self.parse_type()?)
            } else {
                (Vec::new(), self.parse_type()?)
            };
            let tag = if self.at(TokKind::RawStr) || self.at(TokKind::Str) {
                Some(self.bump().text)
            } else {
                None
            };
            body.fields.push(StructField {
                doc,
                names,
                ty,
                tag,
            });
            self.expect_terminator()?;
        }
        Ok(body)
    }

    fn parse_params(&mut self) -> AppResult<Vec<Param>> {
        self.expect(TokKind::LParen, "'('")?;
        let mut raw: Vec<Param> = Vec::new();
        loop {
            self.skip_semis();
            if self.eat(TokKind::RParen) {
                break;
            }
            let named = self.at(TokKind::Ident) && Self::starts_type(self.peek2_kind());
            let param = if named {
                let name = self.bump().text;
                Param {
                    name: Some(name),
                    ty: self.parse_type()?,
                }
            } else {
                Param {
                    name: None,
                    ty: self.parse_type()?,
                }
            };
            raw.push(param);
            if !self.eat(TokKind::Comma) {
                self.skip_semis();
                self.expect(TokKind::RParen, "')' after parameters")?;
                break;
            }
        }
        self.fix_param_groups(raw)
    }

    /// Resolves Go's `a, b T` parameter groups: once any parameter is named,
    /// bare identifiers before it are names sharing the following type.
    fn fix_param_groups(&self, raw: Vec<Param>) -> AppResult<Vec<Param>> {
        if !raw.iter().any(|p| p.name.is_some()) {
            return Ok(raw);
        }
        let mut out = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for param in raw {
            match (param.name, param.ty) {
                (Some(name), ty) => {
                    for p in pending.drain(..) {
                        out.push(Param {
                            name: Some(p),
                            ty: ty.clone(),
                        });
                    }
                    out.push(Param {
                        name: Some(name),
                        ty,
                    });
                }
                (None, TypeExpr::Ident(name)) => pending.push(name),
                (None, _) => {
                    return Err(AppError::Parse {
                        line: 0,
                        col: 0,
                        message: "mixed named and unnamed parameters".into(),
                    })
                }
            }
        }
        if !pending.is_empty() {
            return Err(AppError::Parse {
                line: 0,
                col: 0,
                message: "missing type in parameter group".into(),
            });
        }
        Ok(out)
    }

    fn parse_results(&mut self) -> AppResult<Vec<TypeExpr>> {
        if self.at(TokKind::LParen) {
            self.bump();
            let mut results = Vec::new();
            loop {
                if self.eat(TokKind::RParen) {
                    break;
                }
                results.push(self.parse_type()?);
                if !self.eat(TokKind::Comma) {
                    self.expect(TokKind::RParen, "')' after results")?;
                    break;
                }
            }
            Ok(results)
        } else if Self::starts_type(self.peek_kind()) {
            Ok(vec![self.parse_type()?])
        } else {
            Ok(Vec::new())
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_block(&mut self) -> AppResult<Block> {
        self.expect(TokKind::LBrace, "'{'")?;
        let mut block = Block::default();
        loop {
            self.skip_semis();
            if self.at(TokKind::RBrace) {
                block.tail_comments = self.leading_comments();
                self.bump();
                break;
            }
            if self.at(TokKind::Eof) {
                return Err(self.err_here("expected '}'".into()));
            }
            let doc = self.leading_comments();
            let kind = self.parse_stmt()?;
            block.stmts.push(Stmt { doc, kind });
            self.expect_terminator()?;
        }
        Ok(block)
    }

    fn parse_stmt(&mut self) -> AppResult<StmtKind> {
        match self.peek_kind() {
            TokKind::Var => Ok(StmtKind::Var(self.parse_var_decl(false)?)),
            TokKind::Const => Ok(StmtKind::Var(self.parse_var_decl(true)?)),
            TokKind::Return => {
                self.bump();
                let exprs = if self.at(TokKind::Semi) || self.at(TokKind::RBrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list(false)?
                };
                Ok(StmtKind::Return(exprs))
            }
            TokKind::If => self.parse_if(),
            TokKind::For => self.parse_for(),
            TokKind::Go => {
                self.bump();
                Ok(StmtKind::Go(self.parse_expr(false)?))
            }
            TokKind::Defer => {
                self.bump();
                Ok(StmtKind::Defer(self.parse_expr(false)?))
            }
            TokKind::Break => {
                self.bump();
                Ok(StmtKind::Break)
            }
            TokKind::Continue => {
                self.bump();
                Ok(StmtKind::Continue)
            }
            TokKind::LBrace => Ok(StmtKind::Block(self.parse_block()?)),
            _ => self.parse_simple_stmt(false),
        }
    }

    fn parse_simple_stmt(&mut self, no_composite: bool) -> AppResult<StmtKind> {
        match self.parse_simple_or_range(no_composite)? {
            SimpleOrRange::Simple(kind) => Ok(kind),
            SimpleOrRange::Range { .. } => Err(self.err_here("'range' outside 'for'".into())),
        }
    }

    fn parse_simple_or_range(&mut self, no_composite: bool) -> AppResult<SimpleOrRange> {
        let lhs = self.parse_expr_list(no_composite)?;
        let op = match self.peek_kind() {
            TokKind::Define => Some(AssignOp::Define),
            TokKind::Assign => Some(AssignOp::Assign),
            TokKind::PlusAssign => Some(AssignOp::Add),
            TokKind::MinusAssign => Some(AssignOp::Sub),
            TokKind::Inc | TokKind::Dec => {
                let inc = self.bump().kind == TokKind::Inc;
                let target = single(lhs).map_err(|m| self.err_here(m))?;
                return Ok(SimpleOrRange::Simple(StmtKind::IncDec { target, inc }));
            }
            _ => None,
        };
        match op {
            Some(op) => {
                self.bump();
                if self.at(TokKind::Range) {
                    if !matches!(op, AssignOp::Define | AssignOp::Assign) {
                        return Err(self.err_here("invalid range clause".into()));
                    }
                    self.bump();
                    let expr = self.parse_expr(no_composite)?;
                    return Ok(SimpleOrRange::Range {
                        lhs,
                        define: op == AssignOp::Define,
                        expr,
                    });
                }
                let rhs = self.parse_expr_list(no_composite)?;
                Ok(SimpleOrRange::Simple(StmtKind::Assign { lhs, op, rhs }))
            }
            None => {
                let expr = single(lhs).map_err(|m| self.err_here(m))?;
                Ok(SimpleOrRange::Simple(StmtKind::Expr(expr)))
            }
        }
    }

    fn parse_if(&mut self) -> AppResult<StmtKind> {
        self.expect(TokKind::If, "'if'")?;
        let first = self.parse_simple_stmt(true)?;
        let (init, cond) = if self.eat(TokKind::Semi) {
            let cond = self.parse_expr(true)?;
            (
                Some(Box::new(Stmt {
                    doc: Vec::new(),
                    kind: first,
                })),
                cond,
            )
        } else {
            match first {
                StmtKind::Expr(e) => (None, e),
                _ => return Err(self.err_here("missing condition in 'if'".into())),
            }
        };
        let then = self.parse_block()?;
        let els = if self.eat(TokKind::Else) {
            if self.at(TokKind::If) {
                let nested = self.parse_if()?;
                Some(Block {
                    stmts: vec![Stmt {
                        doc: Vec::new(),
                        kind: nested,
                    }],
                    tail_comments: Vec::new(),
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(StmtKind::If(IfStmt {
            init,
            cond,
            then,
            els,
        }))
    }

    fn parse_for(&mut self) -> AppResult<StmtKind> {
        self.expect(TokKind::For, "'for'")?;
        if self.at(TokKind::LBrace) {
            let body = self.parse_block()?;
            return Ok(StmtKind::For(ForStmt {
                init: None,
                cond: None,
                post: None,
                body,
            }));
        }
        if self.eat(TokKind::Range) {
            let expr = self.parse_expr(true)?;
            let body = self.parse_block()?;
            return Ok(StmtKind::Range(RangeStmt {
                key: None,
                value: None,
                define: false,
                expr,
                body,
            }));
        }
        match self.parse_simple_or_range(true)? {
            SimpleOrRange::Range { lhs, define, expr } => {
                if lhs.len() > 2 {
                    return Err(self.err_here("too many operands in range clause".into()));
                }
                let mut iter = lhs.into_iter();
                let key = iter.next();
                let value = iter.next();
                let body = self.parse_block()?;
                Ok(StmtKind::Range(RangeStmt {
                    key,
                    value,
                    define,
                    expr,
                    body,
                }))
            }
            SimpleOrRange::Simple(first) => {
                if self.eat(TokKind::Semi) {
                    let cond = if self.at(TokKind::Semi) {
                        None
                    } else {
                        Some(self.parse_expr(true)?)
                    };
                    self.expect(TokKind::Semi, "';' in 'for' clause")?;
                    let post = if self.at(TokKind::LBrace) {
                        None
                    } else {
                        Some(Box::new(Stmt {
                            doc: Vec::new(),
                            kind: self.parse_simple_stmt(true)?,
                        }))
                    };
                    let body = self.parse_block()?;
                    Ok(StmtKind::For(ForStmt {
                        init: Some(Box::new(Stmt {
                            doc: Vec::new(),
                            kind: first,
                        })),
                        cond,
                        post,
                        body,
                    }))
                } else {
                    let cond = match first {
                        StmtKind::Expr(e) => e,
                        _ => return Err(self.err_here("missing 'for' condition".into())),
                    };
                    let body = self.parse_block()?;
                    Ok(StmtKind::For(ForStmt {
                        init: None,
                        cond: Some(cond),
                        post: None,
                        body,
                    }))
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expr_list(&mut self, no_composite: bool) -> AppResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr(no_composite)?];
        while self.eat(TokKind::Comma) {
            list.push(self.parse_expr(no_composite)?);
        }
        Ok(list)
    }

    fn parse_expr(&mut self, no_composite: bool) -> AppResult<Expr> {
        self.parse_binary(no_composite, 1)
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.peek_kind() {
            TokKind::OrOr => BinaryOp::OrOr,
            TokKind::AndAnd => BinaryOp::AndAnd,
            TokKind::EqEq => BinaryOp::Eq,
            TokKind::NotEq => BinaryOp::Ne,
            TokKind::Lt => BinaryOp::Lt,
            TokKind::Le => BinaryOp::Le,
            TokKind::Gt => BinaryOp::Gt,
            TokKind::Ge => BinaryOp::Ge,
            TokKind::Plus => BinaryOp::Add,
            TokKind::Minus => BinaryOp::Sub,
            TokKind::Pipe => BinaryOp::Or,
            TokKind::Star => BinaryOp::Mul,
            TokKind::Slash => BinaryOp::Div,
            TokKind::Percent => BinaryOp::Rem,
            TokKind::Amp => BinaryOp::And,
            _ => return None,
        })
    }

    fn parse_binary(&mut self, no_composite: bool, min_prec: u8) -> AppResult<Expr> {
        let mut lhs = self.parse_unary(no_composite)?;
        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.parse_binary(no_composite, prec + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self, no_composite: bool) -> AppResult<Expr> {
        let op = match self.peek_kind() {
            TokKind::Amp => Some(UnaryOp::Amp),
            TokKind::Not => Some(UnaryOp::Not),
            TokKind::Minus => Some(UnaryOp::Neg),
            TokKind::Star => Some(UnaryOp::Deref),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary(no_composite)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix(no_composite)
    }

    fn parse_postfix(&mut self, no_composite: bool) -> AppResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokKind::Dot => {
                    self.bump();
                    let member = self.expect(TokKind::Ident, "selector member")?.text;
                    expr = Expr::Selector {
                        base: Box::new(expr),
                        member,
                    };
                }
                TokKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    loop {
                        self.skip_semis();
                        if self.at(TokKind::RParen) {
                            break;
                        }
                        args.push(self.parse_expr(false)?);
                        if !self.eat(TokKind::Comma) {
                            break;
                        }
                    }
                    self.skip_semis();
                    self.expect(TokKind::RParen, "')' after arguments")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokKind::LBrack => {
                    self.bump();
                    let index = self.parse_expr(false)?;
                    self.expect(TokKind::RBrack, "']' after index")?;
                    expr = Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokKind::LBrace if !no_composite => {
                    let Some(ty) = expr_to_type(&expr) else {
                        break;
                    };
                    let elems = self.parse_composite_body()?;
                    expr = Expr::Composite { ty, elems };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> AppResult<Expr> {
        match self.peek_kind() {
            TokKind::Ident => Ok(Expr::Ident(self.bump().text)),
            TokKind::Str => Ok(Expr::Lit(BasicLit {
                kind: LitKind::Str,
                raw: self.bump().text,
            })),
            TokKind::RawStr => Ok(Expr::Lit(BasicLit {
                kind: LitKind::RawStr,
                raw: self.bump().text,
            })),
            TokKind::Number => Ok(Expr::Lit(BasicLit {
                kind: LitKind::Number,
                raw: self.bump().text,
            })),
            TokKind::LParen => {
                self.bump();
                let inner = self.parse_expr(false)?;
                self.expect(TokKind::RParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokKind::Func => {
                self.bump();
                let params = self.parse_params()?;
                let results = self.parse_results()?;
                let body = self.parse_block()?;
                Ok(Expr::FuncLit {
                    params,
                    results,
                    body,
                })
            }
            TokKind::Map | TokKind::LBrack => {
                // A map/slice/array type prefix in expression position must
                // be a composite literal; the prefix disambiguates even in
                // `if`/`for` headers.
                let ty = self.parse_type()?;
                let elems = self.parse_composite_body()?;
                Ok(Expr::Composite { ty, elems })
            }
            _ => Err(self.err_here("expected expression".into())),
        }
    }

    fn parse_composite_body(&mut self) -> AppResult<Vec<Element>> {
        self.expect(TokKind::LBrace, "'{' of composite literal")?;
        let mut elems = Vec::new();
        loop {
            self.skip_semis();
            if self.eat(TokKind::RBrace) {
                break;
            }
            let first = self.parse_expr(false)?;
            let elem = if self.eat(TokKind::Colon) {
                Element {
                    key: Some(first),
                    value: self.parse_expr(false)?,
                }
            } else {
                Element {
                    key: None,
                    value: first,
                }
            };
            elems.push(elem);
            if !self.eat(TokKind::Comma) {
                self.skip_semis();
                self.expect(TokKind::RBrace, "'}' of composite literal")?;
                break;
            }
        }
        Ok(elems)
    }
}

fn single(mut list: Vec<Expr>) -> Result<Expr, String> {
    if list.len() == 1 {
        Ok(list.remove(0))
    } else {
        Err("expected a single expression".to_string())
    }
}

/// Reinterprets an expression as a composite-literal type, where legal.
fn expr_to_type(expr: &Expr) -> Option<TypeExpr> {
    match expr {
        Expr::Ident(name) => Some(TypeExpr::Ident(name.clone())),
        Expr::Selector { base, member } => match base.as_ref() {
            Expr::Ident(pkg) => Some(TypeExpr::Selector {
                base: pkg.clone(),
                member: member.clone(),
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Strips quotes and resolves the escapes that can occur in import paths.
fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY_FILE: &str = r#"package main

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
			log.Printf("Starting application: %s", appName)
			runner.Run()
		}(name, app)
	}

	log.Println("All applications are starting...")
	wg.Wait()
}
"#;

    #[test]
    fn test_parse_registry_file_shape() {
        let doc = parse(REGISTRY_FILE).unwrap();
        assert_eq!(doc.package, "main");
        assert_eq!(doc.decls.len(), 3);
        assert!(matches!(doc.decls[0].kind, DeclKind::Import(_)));
        assert!(matches!(doc.decls[1].kind, DeclKind::Type(_)));
        assert!(matches!(doc.decls[2].kind, DeclKind::Func(_)));
    }

    #[test]
    fn test_import_specs_unquoted() {
        let doc = parse(REGISTRY_FILE).unwrap();
        let DeclKind::Import(imports) = &doc.decls[0].kind else {
            panic!("expected import declaration");
        };
        assert_eq!(imports.specs.len(), 2);
        assert_eq!(imports.specs[0].path, "log");
        assert_eq!(imports.specs[0].alias, None);
        assert_eq!(imports.specs[1].path, "sync");
    }

    #[test]
    fn test_comment_inside_import_block_binds_to_spec() {
        let src = "package main\n\nimport (\n\t// stdlib\n\t\"log\"\n\t\"sync\"\n)\n";
        let doc = parse(src).unwrap();
        let DeclKind::Import(imports) = &doc.decls[0].kind else {
            panic!("expected import declaration");
        };
        assert_eq!(imports.specs[0].doc, vec!["// stdlib".to_string()]);
        assert!(imports.specs[1].doc.is_empty());
    }

    #[test]
    fn test_comment_binds_to_following_decl() {
        let doc = parse(REGISTRY_FILE).unwrap();
        assert_eq!(
            doc.decls[1].doc,
            vec!["// AppRunner defines the interface for a runnable application.".to_string()]
        );
    }

    #[test]
    fn test_map_literal_and_range_parsed() {
        let doc = parse(REGISTRY_FILE).unwrap();
        let DeclKind::Func(func) = &doc.decls[2].kind else {
            panic!("expected func declaration");
        };
        let StmtKind::Assign { rhs, .. } = &func.body.stmts[0].kind else {
            panic!("expected short var decl");
        };
        let Expr::Composite { ty, elems } = &rhs[0] else {
            panic!("expected composite literal");
        };
        assert!(ty.is_string_keyed_map());
        assert!(elems.is_empty());
        assert!(func
            .body
            .stmts
            .iter()
            .any(|s| matches!(s.kind, StmtKind::Range(_))));
    }

    #[test]
    fn test_go_stmt_with_called_func_literal() {
        let doc = parse(REGISTRY_FILE).unwrap();
        let DeclKind::Func(func) = &doc.decls[2].kind else {
            panic!("expected func declaration");
        };
        let range = func
            .body
            .stmts
            .iter()
            .find_map(|s| match &s.kind {
                StmtKind::Range(r) => Some(r),
                _ => None,
            })
            .unwrap();
        let go = range
            .body
            .stmts
            .iter()
            .find_map(|s| match &s.kind {
                StmtKind::Go(e) => Some(e),
                _ => None,
            })
            .unwrap();
        let Expr::Call { callee, args } = go else {
            panic!("expected call in go statement");
        };
        assert!(matches!(callee.as_ref(), Expr::FuncLit { .. }));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_method_with_receiver_and_if_init() {
        let src = r#"package auth

type AuthModule struct{}

func (m AuthModule) Register(container *dig.Container) error {
	if err := container.Provide(NewAuthService); err != nil {
		return err
	}
	return nil
}
"#;
        let doc = parse(src).unwrap();
        let DeclKind::Func(func) = &doc.decls[1].kind else {
            panic!("expected method declaration");
        };
        assert_eq!(func.name, "Register");
        assert!(func.recv.is_some());
        assert_eq!(func.results, vec![TypeExpr::Ident("error".into())]);
        let StmtKind::If(ifstmt) = &func.body.stmts[0].kind else {
            panic!("expected if statement");
        };
        assert!(ifstmt.init.is_some());
    }

    #[test]
    fn test_type_alias_and_var_binding() {
        let src = "package core\n\ntype App = framework.App\n\nvar New = framework.New\n";
        let doc = parse(src).unwrap();
        let DeclKind::Type(decl) = &doc.decls[0].kind else {
            panic!("expected type declaration");
        };
        assert!(decl.alias);
        let DeclKind::Var(var) = &doc.decls[1].kind else {
            panic!("expected var declaration");
        };
        assert_eq!(var.names, vec!["New".to_string()]);
        assert!(matches!(var.values[0], Expr::Selector { .. }));
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = parse("package main\n\nfunc {\n").unwrap_err();
        match err {
            AppError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("function name"), "message: {}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_desugars_to_nested_block() {
        let src = "package p\n\nfunc f(x int) {\n\tif x > 1 {\n\t\tg()\n\t} else if x > 0 {\n\t\th()\n\t} else {\n\t\ti()\n\t}\n}\n";
        let doc = parse(src).unwrap();
        let DeclKind::Func(func) = &doc.decls[0].kind else {
            panic!("expected func");
        };
        let StmtKind::If(outer) = &func.body.stmts[0].kind else {
            panic!("expected if");
        };
        let els = outer.els.as_ref().unwrap();
        assert_eq!(els.stmts.len(), 1);
        assert!(matches!(els.stmts[0].kind, StmtKind::If(_)));
    }

    #[test]
    fn test_grouped_params_share_type() {
        let src = "package p\n\nfunc f(a, b string, n int) {\n}\n";
        let doc = parse(src).unwrap();
        let DeclKind::Func(func) = &doc.decls[0].kind else {
            panic!("expected func");
        };
        assert_eq!(func.params.len(), 3);
        assert_eq!(func.params[0].ty, TypeExpr::Ident("string".into()));
        assert_eq!(func.params[1].ty, TypeExpr::Ident("string".into()));
        assert_eq!(func.params[2].ty, TypeExpr::Ident("int".into()));
    }
}

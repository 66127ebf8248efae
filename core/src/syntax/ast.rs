#![deny(missing_docs)]

//! # Document Model
//!
//! In-memory tree for one Go source file, covering the declarations and
//! expressions the mutation engine reasons about. The model is a closed set
//! of tagged variants so anchor matching is exhaustive case analysis rather
//! than runtime type inspection.
//!
//! Comments are carried on the nodes themselves: each declaration, statement,
//! struct field and interface method owns its leading comment group, and
//! brace-delimited bodies own a tail slot for comments that precede the
//! closing brace. Source positions are consumed at parse time to bind
//! comments and are not persisted.

/// A leading comment group: verbatim comment lines, markers included.
pub type CommentGroup = Vec<String>;

/// Root entity for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Comments above the package clause.
    pub package_doc: CommentGroup,
    /// Package name.
    pub package: String,
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
    /// Comments trailing the last declaration.
    pub tail_comments: CommentGroup,
}

/// A top-level declaration with its leading comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    /// Leading comment group.
    pub doc: CommentGroup,
    /// The declaration proper.
    pub kind: DeclKind,
}

/// Tagged variant over the supported declaration forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// An `import ( ... )` list.
    Import(ImportDecl),
    /// A `type` declaration.
    Type(TypeDecl),
    /// A `var` or `const` declaration.
    Var(VarDecl),
    /// A function or method declaration.
    Func(FuncDecl),
}

/// The declaration aggregating a file's external-dependency bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Ordered import specs. The engine never deduplicates; callers are
    /// responsible for avoiding double registration.
    pub specs: Vec<ImportSpec>,
}

/// One import binding: optional local alias plus the unquoted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Comments above this spec inside the import block.
    pub doc: CommentGroup,
    /// Local name, e.g. the `auth` in `auth "proj/internal/app/auth"`.
    pub alias: Option<String>,
    /// Import path without quotes.
    pub path: String,
}

/// `type Name T` or `type Name = T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declared name.
    pub name: String,
    /// True for alias declarations (`type A = B`).
    pub alias: bool,
    /// Underlying type expression.
    pub ty: TypeExpr,
}

/// `var`/`const` declaration. Shared shape; `is_const` selects the keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    /// True for `const`.
    pub is_const: bool,
    /// Declared names.
    pub names: Vec<String>,
    /// Optional explicit type.
    pub ty: Option<TypeExpr>,
    /// Initializer expressions, possibly empty.
    pub values: Vec<Expr>,
}

/// Function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Method receiver, if any.
    pub recv: Option<Param>,
    /// Function name.
    pub name: String,
    /// Parameters.
    pub params: Vec<Param>,
    /// Result types (empty, one, or several).
    pub results: Vec<TypeExpr>,
    /// Body.
    pub body: Block,
}

/// One parameter or receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name; `None` for unnamed (result-style) parameters.
    pub name: Option<String>,
    /// Parameter type.
    pub ty: TypeExpr,
}

/// A brace-delimited statement sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Statements in order.
    pub stmts: Vec<Stmt>,
    /// Comments between the last statement and the closing brace.
    pub tail_comments: CommentGroup,
}

/// A statement with its leading comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    /// Leading comment group.
    pub doc: CommentGroup,
    /// The statement proper.
    pub kind: StmtKind,
}

/// Tagged variant over the supported statement forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// Expression statement.
    Expr(Expr),
    /// Assignment or short variable declaration.
    Assign {
        /// Left-hand operands.
        lhs: Vec<Expr>,
        /// Which assignment operator.
        op: AssignOp,
        /// Right-hand operands.
        rhs: Vec<Expr>,
    },
    /// `i++` / `i--`.
    IncDec {
        /// The operand.
        target: Expr,
        /// True for `++`.
        inc: bool,
    },
    /// In-function `var`/`const` declaration.
    Var(VarDecl),
    /// `return` with optional operands.
    Return(Vec<Expr>),
    /// `if` statement. An `else if` chain is stored as an else block holding
    /// a single `if` statement; the printer re-sugars it.
    If(IfStmt),
    /// Three-clause or condition-only `for`.
    For(ForStmt),
    /// `for ... range` statement.
    Range(RangeStmt),
    /// `go` statement; the expression is a call.
    Go(Expr),
    /// `defer` statement; the expression is a call.
    Defer(Expr),
    /// Bare block.
    Block(Block),
    /// `break`.
    Break,
    /// `continue`.
    Continue,
}

/// `if [init;] cond { ... } [else ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    /// Optional init simple statement.
    pub init: Option<Box<Stmt>>,
    /// Condition.
    pub cond: Expr,
    /// Then branch.
    pub then: Block,
    /// Else branch, if any.
    pub els: Option<Block>,
}

/// `for [init]; [cond]; [post] { ... }` or `for [cond] { ... }` or `for { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    /// Optional init simple statement.
    pub init: Option<Box<Stmt>>,
    /// Optional condition.
    pub cond: Option<Expr>,
    /// Optional post simple statement.
    pub post: Option<Box<Stmt>>,
    /// Loop body.
    pub body: Block,
}

/// `for key[, value] := range expr { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeStmt {
    /// Key binding, if any.
    pub key: Option<Expr>,
    /// Value binding, if any.
    pub value: Option<Expr>,
    /// True when bound with `:=`.
    pub define: bool,
    /// The ranged-over expression.
    pub expr: Expr,
    /// Loop body.
    pub body: Block,
}

/// Tagged variant over the supported expression forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Identifier.
    Ident(String),
    /// `base.member`.
    Selector {
        /// Expression before the dot.
        base: Box<Expr>,
        /// Member name.
        member: String,
    },
    /// `callee(args...)`.
    Call {
        /// Called expression.
        callee: Box<Expr>,
        /// Ordered arguments.
        args: Vec<Expr>,
    },
    /// `Type{ entries... }`.
    Composite {
        /// Literal type.
        ty: TypeExpr,
        /// Ordered elements.
        elems: Vec<Element>,
    },
    /// Basic literal (int, float, string).
    Lit(BasicLit),
    /// `func(params) results { body }` literal.
    FuncLit {
        /// Parameters.
        params: Vec<Param>,
        /// Result types.
        results: Vec<TypeExpr>,
        /// Body.
        body: Block,
    },
    /// Prefix unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Infix binary expression.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Parenthesized expression, kept so the round trip is faithful.
    Paren(Box<Expr>),
    /// `base[index]`.
    Index {
        /// Indexed expression.
        base: Box<Expr>,
        /// Index expression.
        index: Box<Expr>,
    },
}

/// One element of a composite literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Optional key (map key or struct field name).
    pub key: Option<Expr>,
    /// Element value.
    pub value: Expr,
}

/// A basic literal, raw source text preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    /// Literal kind.
    pub kind: LitKind,
    /// Verbatim text, quotes included for strings.
    pub raw: String,
}

/// Kinds of basic literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    /// Integer or float literal.
    Number,
    /// Interpreted string literal.
    Str,
    /// Raw (backquoted) string literal.
    RawStr,
}

impl BasicLit {
    /// A quoted interpreted-string literal for `value`.
    pub fn string(value: &str) -> Self {
        BasicLit {
            kind: LitKind::Str,
            raw: format!("\"{}\"", value),
        }
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `&`
    Amp,
    /// `!`
    Not,
    /// `-`
    Neg,
    /// `*`
    Deref,
}

impl UnaryOp {
    /// Source text of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Amp => "&",
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Deref => "*",
        }
    }
}

/// Infix binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `||`
    OrOr,
    /// `&&`
    AndAnd,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `|`
    Or,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `&`
    And,
}

impl BinaryOp {
    /// Go binding strength, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::OrOr => 1,
            BinaryOp::AndAnd => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem | BinaryOp::And => 5,
        }
    }

    /// Source text of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::OrOr => "||",
            BinaryOp::AndAnd => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`
    Add,
    /// `-=`
    Sub,
}

impl AssignOp {
    /// Source text of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
        }
    }
}

/// Tagged variant over the supported type expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Plain named type.
    Ident(String),
    /// Qualified type, `pkg.Name`.
    Selector {
        /// Package qualifier.
        base: String,
        /// Type name.
        member: String,
    },
    /// `*T`.
    Pointer(Box<TypeExpr>),
    /// `map[K]V`.
    Map {
        /// Key type.
        key: Box<TypeExpr>,
        /// Value type.
        value: Box<TypeExpr>,
    },
    /// `[]T`.
    Slice(Box<TypeExpr>),
    /// `[N]T`, length kept as raw text.
    Array {
        /// Raw length literal.
        len: String,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `struct { fields }`.
    Struct(StructType),
    /// `interface { methods }`.
    Interface(InterfaceType),
    /// `func(params) results`.
    Func {
        /// Parameters.
        params: Vec<Param>,
        /// Result types.
        results: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    /// Is this a map type whose key is the predeclared `string`?
    pub fn is_string_keyed_map(&self) -> bool {
        matches!(self, TypeExpr::Map { key, .. } if **key == TypeExpr::Ident("string".into()))
    }
}

/// Body of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructType {
    /// Fields in order.
    pub fields: Vec<StructField>,
    /// Comments before the closing brace.
    pub tail_comments: CommentGroup,
}

/// One struct field group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Leading comment group.
    pub doc: CommentGroup,
    /// Field names; empty for an embedded field.
    pub names: Vec<String>,
    /// Field type.
    pub ty: TypeExpr,
    /// Optional struct tag, verbatim with backquotes.
    pub tag: Option<String>,
}

/// Body of an interface type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceType {
    /// Elements in order.
    pub elems: Vec<InterfaceElem>,
    /// Comments before the closing brace.
    pub tail_comments: CommentGroup,
}

/// One interface element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    /// A method signature.
    Method {
        /// Leading comment group.
        doc: CommentGroup,
        /// Method name.
        name: String,
        /// Parameters.
        params: Vec<Param>,
        /// Result types.
        results: Vec<TypeExpr>,
    },
    /// An embedded interface.
    Embedded {
        /// Leading comment group.
        doc: CommentGroup,
        /// The embedded type.
        ty: TypeExpr,
    },
}

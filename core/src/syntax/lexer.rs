#![deny(missing_docs)]

//! # Go Lexer
//!
//! Tokenizes Go source in two layers: a `logos`-generated raw scanner and a
//! cooking pass that performs Go's automatic semicolon insertion and diverts
//! comments into a side list so the parser can bind them to nodes.

use logos::Logos;

use crate::error::{AppError, AppResult};

/// Raw token layer. Newlines and comments are real tokens here; the cooking
/// pass consumes them.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
enum RawTok {
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,

    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("func")]
    Func,
    #[token("type")]
    Type,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("map")]
    Map,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("go")]
    Go,
    #[token("defer")]
    Defer,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"`[^`]*`")]
    RawStr,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?")]
    Number,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(":=")]
    Define,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Not,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
}

/// Cooked token kinds handed to the parser. `Semi` covers both explicit
/// semicolons and the ones inserted at newlines; `Eof` is always the last
/// token of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// `package` keyword.
    Package,
    /// `import` keyword.
    Import,
    /// `func` keyword.
    Func,
    /// `type` keyword.
    Type,
    /// `var` keyword.
    Var,
    /// `const` keyword.
    Const,
    /// `map` keyword.
    Map,
    /// `struct` keyword.
    Struct,
    /// `interface` keyword.
    Interface,
    /// `if` keyword.
    If,
    /// `else` keyword.
    Else,
    /// `for` keyword.
    For,
    /// `range` keyword.
    Range,
    /// `return` keyword.
    Return,
    /// `go` keyword.
    Go,
    /// `defer` keyword.
    Defer,
    /// `break` keyword.
    Break,
    /// `continue` keyword.
    Continue,
    /// Identifier.
    Ident,
    /// Interpreted string literal, quotes included in the text.
    Str,
    /// Raw (backquoted) string literal.
    RawStr,
    /// Integer or float literal.
    Number,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBrack,
    /// `]`
    RBrack,
    /// `,`
    Comma,
    /// `;` (explicit or inserted).
    Semi,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `:=`
    Define,
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Not,
    /// `++`
    Inc,
    /// `--`
    Dec,
    /// End of input.
    Eof,
}

/// One cooked token with its original text and position.
#[derive(Debug, Clone)]
pub struct Token {
    /// Token kind.
    pub kind: TokKind,
    /// Original slice of source (empty for inserted semicolons and EOF).
    pub text: String,
    /// Byte offset of the token start.
    pub start: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub col: u32,
}

/// A comment captured out-of-band, text including its `//` or `/* */` markers.
#[derive(Debug, Clone)]
pub struct Comment {
    /// Verbatim comment text.
    pub text: String,
    /// 1-based line the comment starts on.
    pub line: u32,
    /// Byte offset of the comment start, used by the parser to bind the
    /// comment to the node that follows it.
    pub start: u32,
}

/// Result of lexing: the cooked token vector plus the comment side list.
#[derive(Debug)]
pub struct TokenStream {
    /// Cooked tokens, terminated by `Eof`.
    pub tokens: Vec<Token>,
    /// Comments in source order.
    pub comments: Vec<Comment>,
}

/// Does a token of this kind terminate a statement when a newline follows?
/// Mirrors the Go spec's automatic semicolon insertion rule.
fn ends_statement(kind: TokKind) -> bool {
    matches!(
        kind,
        TokKind::Ident
            | TokKind::Str
            | TokKind::RawStr
            | TokKind::Number
            | TokKind::Return
            | TokKind::Break
            | TokKind::Continue
            | TokKind::RParen
            | TokKind::RBrack
            | TokKind::RBrace
            | TokKind::Inc
            | TokKind::Dec
    )
}

fn cook(raw: RawTok) -> TokKind {
    match raw {
        RawTok::Package => TokKind::Package,
        RawTok::Import => TokKind::Import,
        RawTok::Func => TokKind::Func,
        RawTok::Type => TokKind::Type,
        RawTok::Var => TokKind::Var,
        RawTok::Const => TokKind::Const,
        RawTok::Map => TokKind::Map,
        RawTok::Struct => TokKind::Struct,
        RawTok::Interface => TokKind::Interface,
        RawTok::If => TokKind::If,
        RawTok::Else => TokKind::Else,
        RawTok::For => TokKind::For,
        RawTok::Range => TokKind::Range,
        RawTok::Return => TokKind::Return,
        RawTok::Go => TokKind::Go,
        RawTok::Defer => TokKind::Defer,
        RawTok::Break => TokKind::Break,
        RawTok::Continue => TokKind::Continue,
        RawTok::Ident => TokKind::Ident,
        RawTok::Str => TokKind::Str,
        RawTok::RawStr => TokKind::RawStr,
        RawTok::Number => TokKind::Number,
        RawTok::LParen => TokKind::LParen,
        RawTok::RParen => TokKind::RParen,
        RawTok::LBrace => TokKind::LBrace,
        RawTok::RBrace => TokKind::RBrace,
        RawTok::LBrack => TokKind::LBrack,
        RawTok::RBrack => TokKind::RBrack,
        RawTok::Comma => TokKind::Comma,
        RawTok::Semi => TokKind::Semi,
        RawTok::Colon => TokKind::Colon,
        RawTok::Dot => TokKind::Dot,
        RawTok::Define => TokKind::Define,
        RawTok::Assign => TokKind::Assign,
        RawTok::PlusAssign => TokKind::PlusAssign,
        RawTok::MinusAssign => TokKind::MinusAssign,
        RawTok::EqEq => TokKind::EqEq,
        RawTok::NotEq => TokKind::NotEq,
        RawTok::Le => TokKind::Le,
        RawTok::Ge => TokKind::Ge,
        RawTok::Lt => TokKind::Lt,
        RawTok::Gt => TokKind::Gt,
        RawTok::AndAnd => TokKind::AndAnd,
        RawTok::OrOr => TokKind::OrOr,
        RawTok::Amp => TokKind::Amp,
        RawTok::Pipe => TokKind::Pipe,
        RawTok::Plus => TokKind::Plus,
        RawTok::Minus => TokKind::Minus,
        RawTok::Star => TokKind::Star,
        RawTok::Slash => TokKind::Slash,
        RawTok::Percent => TokKind::Percent,
        RawTok::Not => TokKind::Not,
        RawTok::Inc => TokKind::Inc,
        RawTok::Dec => TokKind::Dec,
        RawTok::Newline | RawTok::LineComment | RawTok::BlockComment => {
            unreachable!("handled by the cooking pass")
        }
    }
}

/// Lexes `source`, producing cooked tokens (with semicolons inserted) and the
/// comment side list. Any unrecognizable input fails the whole run.
pub fn lex(source: &str) -> AppResult<TokenStream> {
    let mut lexer = RawTok::lexer(source);
    let mut tokens: Vec<Token> = Vec::new();
    let mut comments: Vec<Comment> = Vec::new();

    let mut line: u32 = 1;
    let mut line_start: u32 = 0;
    let mut last_kind: Option<TokKind> = None;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let start = span.start as u32;
        let col = start - line_start + 1;

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                return Err(AppError::Parse {
                    line,
                    col,
                    message: format!("unrecognized character {:?}", lexer.slice()),
                });
            }
        };

        let slice = lexer.slice();
        let newlines_in_slice = slice.bytes().filter(|b| *b == b'\n').count() as u32;

        match raw {
            RawTok::Newline => {
                if last_kind.map(ends_statement).unwrap_or(false) {
                    tokens.push(Token {
                        kind: TokKind::Semi,
                        text: String::new(),
                        start,
                        line,
                        col,
                    });
                    last_kind = Some(TokKind::Semi);
                }
                line += 1;
                line_start = span.end as u32;
            }
            RawTok::LineComment => {
                comments.push(Comment {
                    text: slice.to_string(),
                    line,
                    start,
                });
            }
            RawTok::BlockComment => {
                comments.push(Comment {
                    text: slice.to_string(),
                    line,
                    start,
                });
                // A block comment spanning lines counts as a newline for
                // semicolon insertion.
                if newlines_in_slice > 0 {
                    if last_kind.map(ends_statement).unwrap_or(false) {
                        tokens.push(Token {
                            kind: TokKind::Semi,
                            text: String::new(),
                            start,
                            line,
                            col,
                        });
                        last_kind = Some(TokKind::Semi);
                    }
                    line += newlines_in_slice;
                    let last_nl = slice.rfind('\n').unwrap_or(0);
                    line_start = start + last_nl as u32 + 1;
                }
            }
            _ => {
                let kind = cook(raw);
                tokens.push(Token {
                    kind,
                    text: slice.to_string(),
                    start,
                    line,
                    col,
                });
                last_kind = Some(kind);
                if newlines_in_slice > 0 {
                    // Raw string literals may span lines.
                    line += newlines_in_slice;
                    let last_nl = slice.rfind('\n').unwrap_or(0);
                    line_start = start + last_nl as u32 + 1;
                }
            }
        }
    }

    if last_kind.map(ends_statement).unwrap_or(false) {
        tokens.push(Token {
            kind: TokKind::Semi,
            text: String::new(),
            start: source.len() as u32,
            line,
            col: source.len() as u32 - line_start + 1,
        });
    }
    tokens.push(Token {
        kind: TokKind::Eof,
        text: String::new(),
        start: source.len() as u32,
        line,
        col: source.len() as u32 - line_start + 1,
    });

    Ok(TokenStream { tokens, comments })
}

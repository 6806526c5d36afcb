//! Token definitions for the header lexer

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokens of preprocessed C headers.
///
/// Only declarations are parsed; operators that can appear inside skipped
/// initializers, array sizes and inline function bodies lex as [`TokenKind::Operator`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")] // Skip block comments
#[logos(skip r"#[^\n]*")]       // Skip line markers and pragmas left by cpp
pub enum TokenKind {
    // === Storage classes and function specifiers ===
    #[token("typedef")]
    Typedef,
    #[token("extern")]
    Extern,
    #[token("static")]
    Static,
    #[token("auto")]
    Auto,
    #[token("register")]
    Register,
    #[token("_Thread_local")]
    ThreadLocal,
    #[token("inline")]
    #[token("__inline")]
    Inline,
    #[token("_Noreturn")]
    Noreturn,

    // === Qualifiers ===
    #[token("const")]
    Const,
    #[token("volatile")]
    Volatile,
    #[token("restrict")]
    Restrict,
    #[token("_Atomic")]
    Atomic,

    // === Type specifiers ===
    #[token("void")]
    Void,
    #[token("char")]
    Char,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("signed")]
    Signed,
    #[token("unsigned")]
    Unsigned,
    #[token("_Bool")]
    Bool,
    #[token("_Complex")]
    Complex,
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,
    #[token("enum")]
    Enum,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*", |lex| lex.slice().to_string())]
    HexLiteral(String),

    #[regex(r"0[bB][01]+[uUlL]*", |lex| lex.slice().to_string())]
    BinaryLiteral(String),

    #[regex(r"0[0-7]+[uUlL]*", |lex| lex.slice().to_string())]
    OctalLiteral(String),

    #[regex(r"[0-9]+[uUlL]*", |lex| lex.slice().to_string())]
    IntLiteral(String),

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?", priority = 3, callback = |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?", priority = 2, callback = |lex| lex.slice().to_string())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?", priority = 1, callback = |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice().to_string())]
    CharLiteral(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    // === Declaration punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("*")]
    Star,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("...")]
    Ellipsis,

    /// Any other operator; only ever skipped
    #[regex(r"->|\+\+|--|<<=?|>>=?|[<>=!&|^*/%+-]=|&&|\|\||[/%<>!&|^~?.]", |lex| lex.slice().to_string())]
    Operator(String),

    // Special
    Eof,
}

impl TokenKind {
    /// Spelling of a primitive type keyword, as kept in identifier type lists
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            TokenKind::Void => Some("void"),
            TokenKind::Char => Some("char"),
            TokenKind::Short => Some("short"),
            TokenKind::Int => Some("int"),
            TokenKind::Long => Some("long"),
            TokenKind::Float => Some("float"),
            TokenKind::Double => Some("double"),
            TokenKind::Signed => Some("signed"),
            TokenKind::Unsigned => Some("unsigned"),
            TokenKind::Bool => Some("_Bool"),
            TokenKind::Complex => Some("_Complex"),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::IntLiteral(s) => write!(f, "integer '{}'", s),
            TokenKind::HexLiteral(s) => write!(f, "hex '{}'", s),
            TokenKind::BinaryLiteral(s) => write!(f, "binary '{}'", s),
            TokenKind::OctalLiteral(s) => write!(f, "octal '{}'", s),
            TokenKind::FloatLiteral(s) => write!(f, "float '{}'", s),
            TokenKind::CharLiteral(s) => write!(f, "char {}", s),
            TokenKind::StringLiteral(s) => write!(f, "string {}", s),
            TokenKind::Operator(s) => write!(f, "'{}'", s),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Semi => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Ellipsis => write!(f, "'...'"),
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "{:?}", self),
        }
    }
}

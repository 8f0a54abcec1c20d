//! Token definitions for hierarchy record declarations

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    // === Keywords ===
    #[token("const")]
    Const,
    #[token("enum")]
    Enum,
    #[token("class")]
    Class,
    #[token("typename")]
    Typename,

    // === Punctuation ===
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("&")]
    Amp,
    #[token("*")]
    Star,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("-")]
    Minus,
    #[token(".")]
    Dot,

    // === Literals ===
    #[regex(r"[0-9]+[uUlL]*")]
    Int,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // === Special ===
    Error,
    Eof,
}

impl TokenKind {
    /// Tokens that may appear inside a type or default-value spelling
    pub fn is_type_text(&self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::Enum
                | TokenKind::Class
                | TokenKind::Typename
                | TokenKind::ColonColon
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Minus
                | TokenKind::Dot
                | TokenKind::Int
                | TokenKind::Ident
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Const => "'const'",
            TokenKind::Enum => "'enum'",
            TokenKind::Class => "'class'",
            TokenKind::Typename => "'typename'",
            TokenKind::ColonColon => "'::'",
            TokenKind::Colon => "':'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Comma => "','",
            TokenKind::Eq => "'='",
            TokenKind::Amp => "'&'",
            TokenKind::Star => "'*'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Minus => "'-'",
            TokenKind::Dot => "'.'",
            TokenKind::Int => "integer",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "invalid character",
            TokenKind::Eof => "end of declaration",
        }
    }
}

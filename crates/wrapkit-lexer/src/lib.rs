//! wrapkit lexer - tokenization of hierarchy record declarations using logos
//!
//! Only the declaration field of a record (the text before the first `;`)
//! is tokenized; header, module, and flag fields are free text.

mod token;

pub use token::*;

use logos::Logos;
use wrapkit_ast::Span;

/// Tokenize a declaration into a vector of tokens ending in `Eof`
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    tokens
}

/// A token with its span
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_class_declaration() {
        assert_eq!(
            kinds("vtkActor : vtkProp3D"),
            vec![
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_scope_vs_colon() {
        let tokens = kinds("Outer::Inner : enum");
        assert_eq!(tokens[1], TokenKind::ColonColon);
        assert_eq!(tokens[3], TokenKind::Colon);
        assert_eq!(tokens[4], TokenKind::Enum);
    }

    #[test]
    fn test_typedef_prefixes() {
        assert_eq!(
            kinds("Vec = [3]const*double"),
            vec![
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::LBracket,
                TokenKind::Int,
                TokenKind::RBracket,
                TokenKind::Const,
                TokenKind::Star,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_token_text() {
        let source = "vtkVector<T, int Size=3>";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].text(source), "vtkVector");
        assert_eq!(tokens[5].text(source), "Size");
    }

    #[test]
    fn test_invalid_character() {
        assert!(kinds("Foo $ Bar").contains(&TokenKind::Error));
    }
}

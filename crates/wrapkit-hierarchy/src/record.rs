//! Recursive descent parser for one hierarchy record
//!
//! ```text
//! Name[<Param[=Default], ...>][::Nested] [: Super, ... | : enum] ; Header ; Module [; Flag]*
//! Name = [&][dim]*[*|const*]* BaseType ; Header ; Module [; Flag]*
//! ```
//!
//! Only the declaration field is tokenized; the remaining fields are
//! split on `;` and trimmed.

use wrapkit_ast::{BaseType, Pointer, Span, TypeDesc};
use wrapkit_lexer::{tokenize, Token, TokenKind};

use crate::names::strip_template_args;
use crate::{Entity, EntityKind, Flag, RecordError, SuperClass, TemplateParam};

/// Parse one non-blank, non-comment line starting at byte `offset` of its source
pub fn parse_record(line: &str, offset: usize) -> Result<Entity, RecordError> {
    let mut fields = FieldSplitter::new(line, offset);

    let (decl, decl_span) = fields.next_field().unwrap_or(("", Span::new(offset, offset)));
    let mut parser = DeclParser::new(decl, tokenize(decl), decl_span.start);
    let (name, kind) = parser.parse_declaration()?;

    let end = Span::new(offset + line.len(), offset + line.len());
    let header = match fields.next_field() {
        Some((text, _)) if !text.is_empty() => text.to_string(),
        Some((_, span)) => return Err(RecordError::MissingField { field: "header", span }),
        None => return Err(RecordError::MissingField { field: "header", span: end }),
    };
    let module = match fields.next_field() {
        Some((text, _)) => text.to_string(),
        None => return Err(RecordError::MissingField { field: "module", span: end }),
    };

    let mut flags = Vec::new();
    while let Some((text, span)) = fields.next_field() {
        if text.is_empty() {
            continue;
        }
        flags.push(parse_flag(text, span)?);
    }

    Ok(Entity {
        name,
        kind,
        header,
        module,
        flags,
        span: Span::new(offset, offset + line.len()),
    })
}

/// Parse a type in alias-target syntax, e.g. `*const vtkFoo` or `[3]double`
pub fn parse_type(text: &str) -> Result<TypeDesc, RecordError> {
    let text = text.trim();
    let mut parser = DeclParser::new(text, tokenize(text), 0);
    let ty = parser.parse_typedef_target()?;
    if !parser.at(TokenKind::Eof) {
        return Err(parser.unexpected("end of type"));
    }
    Ok(ty)
}

fn parse_flag(text: &str, span: Span) -> Result<Flag, RecordError> {
    let (name, value) = match text.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
        None => (text, None),
    };
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if !valid {
        return Err(RecordError::InvalidFlag {
            flag: text.to_string(),
            span,
        });
    }
    Ok(Flag {
        name: name.to_string(),
        value,
    })
}

/// Yields the trimmed `;`-separated fields of a line with their absolute spans
struct FieldSplitter<'a> {
    rest: Option<&'a str>,
    pos: usize,
}

impl<'a> FieldSplitter<'a> {
    fn new(line: &'a str, offset: usize) -> Self {
        Self {
            rest: Some(line),
            pos: offset,
        }
    }

    fn next_field(&mut self) -> Option<(&'a str, Span)> {
        let rest = self.rest?;
        let (field, tail) = match rest.find(';') {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };
        let lead = field.len() - field.trim_start().len();
        let trimmed = field.trim();
        let span = Span::new(self.pos + lead, self.pos + lead + trimmed.len());
        self.pos += field.len() + 1;
        self.rest = tail;
        Some((trimmed, span))
    }
}

struct DeclParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Absolute offset of `source` within the hierarchy file
    base: usize,
}

impl<'a> DeclParser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>, base: usize) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            base,
        }
    }

    // === Utilities ===

    fn current(&self) -> &Token {
        // tokenize() always ends the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_ahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn span(&self) -> Span {
        self.current().span.offset(self.base)
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token, RecordError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> RecordError {
        RecordError::unexpected(expected, self.peek(), self.span())
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    // === Declaration ===

    fn parse_declaration(&mut self) -> Result<(String, EntityKind), RecordError> {
        let (path, template_params) = self.parse_name_path()?;
        let name = strip_template_args(&path);

        let kind = match self.peek() {
            TokenKind::Eq => {
                self.advance();
                EntityKind::Typedef {
                    target: self.parse_typedef_target()?,
                }
            }
            TokenKind::Colon if self.peek_ahead(1) == TokenKind::Enum => {
                self.advance();
                self.advance();
                EntityKind::Enum
            }
            TokenKind::Colon => {
                self.advance();
                EntityKind::Class {
                    template_params,
                    superclasses: self.parse_superclasses()?,
                }
            }
            TokenKind::Eof => EntityKind::Class {
                template_params,
                superclasses: Vec::new(),
            },
            _ => return Err(self.unexpected("':', '=', or ';'")),
        };

        if !self.at(TokenKind::Eof) {
            return Err(self.unexpected("';'"));
        }
        Ok((name, kind))
    }

    /// `Seg[<...>]::Seg[<...>]`; the argument list of the last segment is
    /// the entity's own template parameter list
    fn parse_name_path(&mut self) -> Result<(String, Vec<TemplateParam>), RecordError> {
        let mut path = String::new();
        loop {
            let ident = self.consume(TokenKind::Ident)?;
            path.push_str(self.text(&ident));

            let mut params = Vec::new();
            if self.at(TokenKind::Lt) {
                if self.is_last_segment() {
                    params = self.parse_template_params()?;
                } else {
                    let group = self.balanced_text(&[])?;
                    path.push_str(&group);
                }
            }

            if self.at(TokenKind::ColonColon) {
                self.advance();
                path.push_str("::");
            } else {
                return Ok((path, params));
            }
        }
    }

    /// Whether the `<` at the current position closes a group that is not
    /// followed by `::`
    fn is_last_segment(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        continue;
                    }
                }
                TokenKind::ColonColon if depth == 0 => return false,
                TokenKind::Eof => return true,
                _ if depth == 0 => return true,
                _ => {}
            }
        }
        true
    }

    fn parse_template_params(&mut self) -> Result<Vec<TemplateParam>, RecordError> {
        self.consume(TokenKind::Lt)?;
        let mut params = Vec::new();

        while !self.at(TokenKind::Gt) {
            let mut words = Vec::new();
            while matches!(
                self.peek(),
                TokenKind::Ident | TokenKind::Class | TokenKind::Typename | TokenKind::Const
            ) {
                let token = self.advance();
                words.push(self.text(&token).to_string());
            }
            let name = words.pop().ok_or_else(|| self.unexpected("template parameter"))?;
            let kind = (!words.is_empty()).then(|| words.join(" "));

            let default = if self.at(TokenKind::Eq) {
                self.advance();
                let text = self.balanced_text(&[TokenKind::Comma, TokenKind::Gt])?;
                if text.is_empty() {
                    return Err(self.unexpected("default value"));
                }
                Some(text)
            } else {
                None
            };
            params.push(TemplateParam {
                name,
                kind,
                default,
            });

            if self.at(TokenKind::Comma) {
                self.advance();
            } else if !self.at(TokenKind::Gt) {
                return Err(self.unexpected("',' or '>'"));
            }
        }

        self.consume(TokenKind::Gt)?;
        Ok(params)
    }

    fn parse_superclasses(&mut self) -> Result<Vec<SuperClass>, RecordError> {
        let mut superclasses = Vec::new();
        loop {
            let text = self.balanced_text(&[TokenKind::Comma])?;
            if text.is_empty() {
                return Err(self.unexpected("superclass name"));
            }
            superclasses.push(SuperClass::new(text));
            if self.at(TokenKind::Comma) {
                self.advance();
            } else {
                return Ok(superclasses);
            }
        }
    }

    /// `[&][dim]*[*|const*]* BaseType`
    fn parse_typedef_target(&mut self) -> Result<TypeDesc, RecordError> {
        let is_reference = if self.at(TokenKind::Amp) {
            self.advance();
            true
        } else {
            false
        };

        let mut dimensions = Vec::new();
        while self.at(TokenKind::LBracket) {
            self.advance();
            let mut dim = String::new();
            while !self.at(TokenKind::RBracket) {
                if matches!(self.peek(), TokenKind::Eof | TokenKind::LBracket) {
                    return Err(self.unexpected("']'"));
                }
                let token = self.advance();
                dim.push_str(self.text(&token));
            }
            self.advance();
            dimensions.push(dim);
        }

        // Written outermost first
        let mut pointers = Vec::new();
        loop {
            match (self.peek(), self.peek_ahead(1)) {
                (TokenKind::Star, _) => {
                    self.advance();
                    pointers.push(Pointer::Mutable);
                }
                (TokenKind::Const, TokenKind::Star) => {
                    self.advance();
                    self.advance();
                    pointers.push(Pointer::Const);
                }
                _ => break,
            }
        }
        pointers.reverse();

        let start = self.span();
        let mut text = self.balanced_text(&[])?;
        let mut is_const = false;
        if let Some(rest) = text.strip_prefix("const ") {
            is_const = true;
            text = rest.to_string();
        }
        if let Some(rest) = text.strip_suffix(" const") {
            is_const = true;
            text = rest.to_string();
        }
        if text.is_empty() {
            return Err(RecordError::unexpected(
                "base type",
                TokenKind::Eof,
                start,
            ));
        }

        let mut target = match BaseType::from_name(&text) {
            Some(base) => TypeDesc::scalar(base),
            None => TypeDesc::named(BaseType::Unknown, text),
        };
        target.is_const = is_const;
        target.is_reference = is_reference;
        target.pointers = pointers;
        target.dimensions = dimensions;
        Ok(target)
    }

    /// Collect canonical type text up to one of `stops` at bracket depth
    /// zero, or the end of the declaration
    fn balanced_text(&mut self, stops: &[TokenKind]) -> Result<String, RecordError> {
        let start = self.span();
        let mut text = String::new();
        let mut depth = 0usize;
        let mut prev_word = false;

        loop {
            let kind = self.peek();
            if kind == TokenKind::Eof || (depth == 0 && stops.contains(&kind)) {
                break;
            }
            match kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    if depth == 0 {
                        return Err(RecordError::UnbalancedTemplate { span: self.span() });
                    }
                    depth -= 1;
                }
                TokenKind::Comma if depth > 0 => {}
                _ if kind.is_type_text() => {}
                _ => return Err(self.unexpected("type name")),
            }

            let token = self.advance();
            let is_word = matches!(
                kind,
                TokenKind::Ident
                    | TokenKind::Int
                    | TokenKind::Const
                    | TokenKind::Enum
                    | TokenKind::Class
                    | TokenKind::Typename
            );
            if is_word && prev_word {
                text.push(' ');
            }
            text.push_str(self.text(&token));
            if kind == TokenKind::Comma {
                text.push(' ');
            }
            prev_word = is_word;

            // A nested group closes on its own `>`; stop there when it
            // started the text
            if depth == 0 && kind == TokenKind::Gt && stops.is_empty() && text.starts_with('<') {
                break;
            }
        }

        if depth != 0 {
            return Err(RecordError::UnbalancedTemplate {
                span: start.merge(self.span()),
            });
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Entity {
        parse_record(line, 0).unwrap_or_else(|e| panic!("{line}: {e}"))
    }

    #[test]
    fn test_plain_class() {
        let entity = parse("vtkFoo : vtkObject ; vtkFoo.h ; vtkCommonCore");
        assert_eq!(entity.name, "vtkFoo");
        assert_eq!(entity.header, "vtkFoo.h");
        assert_eq!(entity.module, "vtkCommonCore");
        assert_eq!(entity.superclasses(), &[SuperClass::new("vtkObject")]);
        assert!(entity.flags.is_empty());
    }

    #[test]
    fn test_root_class_and_flags() {
        let entity = parse("vtkObjectBase ; vtkObjectBase.h ; vtkCommonCore ; WRAP_EXCLUDE ; ABI=2");
        assert!(entity.is_class());
        assert!(entity.superclasses().is_empty());
        assert_eq!(entity.flag("WRAP_EXCLUDE"), Some(None));
        assert_eq!(entity.flag("ABI"), Some(Some("2")));
    }

    #[test]
    fn test_templated_class() {
        let entity = parse(
            "vtkVector<typename T, int Size = 3> : vtkTuple<T, Size> ; vtkVector.h ; vtkCommonDataModel",
        );
        assert_eq!(entity.name, "vtkVector");
        let params = entity.template_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "T");
        assert_eq!(params[0].kind.as_deref(), Some("typename"));
        assert_eq!(params[1].kind.as_deref(), Some("int"));
        assert_eq!(params[1].default.as_deref(), Some("3"));
        assert_eq!(entity.superclasses()[0].name, "vtkTuple<T, Size>");
    }

    #[test]
    fn test_template_default_with_nested_args() {
        let entity = parse("Holder<class T, class A = Alloc<T, 4>> ; Holder.h ; M");
        assert_eq!(
            entity.template_params()[1].default.as_deref(),
            Some("Alloc<T, 4>")
        );
    }

    #[test]
    fn test_nested_enum() {
        let entity = parse("vtkFoo::Mode : enum ; vtkFoo.h ; vtkCommonCore");
        assert_eq!(entity.name, "vtkFoo::Mode");
        assert!(entity.is_enum());
    }

    #[test]
    fn test_nested_in_template_strips_args() {
        let entity = parse("Outer<T>::Inner : Base ; Outer.h ; M");
        assert_eq!(entity.name, "Outer::Inner");
        assert!(entity.template_params().is_empty());
    }

    #[test]
    fn test_typedef_scalar() {
        let entity = parse("vtkIdType = long long ; vtkType.h ; vtkCommonCore");
        let target = entity.typedef_target().unwrap();
        assert_eq!(target.base, BaseType::LongLong);
        assert!(target.pointers.is_empty());
    }

    #[test]
    fn test_typedef_indirection() {
        let entity = parse("Matrix = &[3][4]*const*const double ; M.h ; M");
        let target = entity.typedef_target().unwrap();
        assert!(target.is_reference);
        assert_eq!(target.dimensions, vec!["3", "4"]);
        // innermost first: `const *` was written last
        assert_eq!(target.pointers, vec![Pointer::Const, Pointer::Mutable]);
        assert!(target.is_const);
        assert_eq!(target.base, BaseType::Double);
    }

    #[test]
    fn test_typedef_to_user_type() {
        let entity = parse("vtkFooPtr = *vtkFoo ; vtkFoo.h ; M");
        let target = entity.typedef_target().unwrap();
        assert_eq!(target.base, BaseType::Unknown);
        assert_eq!(target.class_name.as_deref(), Some("vtkFoo"));
        assert_eq!(target.pointers.len(), 1);
    }

    #[test]
    fn test_parse_type() {
        let ty = parse_type(" const* vtkPoints ").unwrap();
        assert_eq!(ty.pointers, vec![Pointer::Const]);
        assert_eq!(ty.class_name.as_deref(), Some("vtkPoints"));
        assert!(!ty.is_const);
        assert!(parse_type("*const vtkPoints").unwrap().is_const);
        assert_eq!(parse_type("[3]double").unwrap().dimensions, vec!["3"]);
        assert!(parse_type("").is_err());
    }

    #[test]
    fn test_missing_header() {
        let err = parse_record("vtkFoo : vtkObject", 0).unwrap_err();
        assert_eq!(err.code(), "E-HIER-002");
        let err = parse_record("vtkFoo : vtkObject ;  ; M", 0).unwrap_err();
        assert!(matches!(err, RecordError::MissingField { field: "header", .. }));
    }

    #[test]
    fn test_missing_module() {
        let err = parse_record("vtkFoo ; vtkFoo.h", 0).unwrap_err();
        assert!(matches!(err, RecordError::MissingField { field: "module", .. }));
    }

    #[test]
    fn test_unbalanced_template() {
        let err = parse_record("vtkFoo : Base<int ; vtkFoo.h ; M", 0).unwrap_err();
        assert_eq!(err.code(), "E-HIER-004");
    }

    #[test]
    fn test_invalid_flag() {
        let err = parse_record("vtkFoo ; vtkFoo.h ; M ; =3", 0).unwrap_err();
        assert_eq!(err.code(), "E-HIER-003");
    }

    #[test]
    fn test_error_span_is_absolute() {
        let err = parse_record("vtkFoo : : Bar ; vtkFoo.h ; M", 100).unwrap_err();
        assert_eq!(err.span().start, 109);
    }
}

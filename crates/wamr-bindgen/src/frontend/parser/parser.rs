//! Recursive descent parser for C header declarations

use crate::common::{BindgenError, BindgenResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Declaration specifiers shared by every declarator of one declaration
#[derive(Debug, Clone)]
struct DeclSpecifiers {
    storage_class: Option<StorageClass>,
    is_inline: bool,
    ty: CType,
}

/// One type constructor contributed by a declarator
#[derive(Debug, Clone)]
enum DeclaratorPart {
    Pointer(TypeQualifiers, Span),
    Array(Option<u64>, Span),
    Function(ParamList, Span),
}

/// A parsed declarator.
///
/// `parts` are in application order: the first part wraps the base type, the
/// next wraps the result, and so on. For `int *(*fp)(void)` that is
/// `[Pointer, Function, Pointer]`.
#[derive(Debug, Clone)]
struct Declarator {
    name: Option<String>,
    parts: Vec<DeclaratorPart>,
    span: Span,
}

impl Declarator {
    fn apply(&self, base: CType) -> CType {
        self.parts.iter().fold(base, |ty, part| match part {
            DeclaratorPart::Pointer(qualifiers, span) => {
                CType::pointer_to(ty, *span).with_qualifiers(*qualifiers)
            }
            DeclaratorPart::Array(size, span) => CType::new(
                TypeKind::Array {
                    element: Box::new(ty),
                    size: *size,
                },
                *span,
            ),
            DeclaratorPart::Function(params, span) => CType::new(
                TypeKind::Function(FunctionType {
                    return_type: Box::new(ty),
                    params: params.clone(),
                }),
                *span,
            ),
        })
    }
}

/// Recursive descent parser for preprocessed headers
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Span,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> BindgenResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous: Span::default(),
        })
    }

    /// Parse a complete translation unit
    pub fn parse(&mut self) -> BindgenResult<TranslationUnit> {
        let mut declarations = Vec::new();

        while !self.at_end() {
            // stray `;` left behind by stripped macros
            if self.match_token(&TokenKind::Semi)? {
                continue;
            }
            declarations.extend(self.parse_external_declaration()?);
        }

        Ok(TranslationUnit::new(declarations))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> BindgenResult<Token> {
        let next = self.lexer.next_token()?;
        let prev = std::mem::replace(&mut self.current, next);
        self.previous = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> BindgenResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> BindgenResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("expected {}", kind)))
        }
    }

    fn unexpected(&self, context: &str) -> BindgenError {
        BindgenError::parser(
            format!("{}, found {}", context, self.current.kind),
            self.current.span,
        )
    }

    fn expect_identifier(&mut self, what: &str) -> BindgenResult<String> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(self.unexpected(&format!("expected {}", what)))
        }
    }

    // =========================================================================
    // External declarations (top-level)
    // =========================================================================

    fn parse_external_declaration(&mut self) -> BindgenResult<Vec<Declaration>> {
        let start_span = self.current.span;
        let specs = self.parse_declaration_specifiers()?;

        // struct/union/enum without declarator
        if self.check(&TokenKind::Semi) {
            self.advance()?;
            let span = start_span.merge(self.previous);
            let kind = match specs.ty.kind {
                TypeKind::Struct(record) => DeclKind::Struct(record),
                TypeKind::Union(record) => DeclKind::Union(record),
                TypeKind::Enum(enum_type) => DeclKind::Enum(enum_type),
                // `int;` declares nothing
                _ => return Ok(Vec::new()),
            };
            return Ok(vec![Declaration::new(kind, span)]);
        }

        let mut declarations = Vec::new();
        loop {
            let declarator = self.parse_declarator(false)?;
            let name = declarator.name.clone().ok_or_else(|| {
                BindgenError::parser("expected a declarator name", declarator.span)
            })?;
            let ty = declarator.apply(specs.ty.clone());
            let span = start_span.merge(declarator.span);

            if specs.storage_class == Some(StorageClass::Typedef) {
                declarations.push(Declaration::new(
                    DeclKind::Typedef(TypedefDecl::new(name, ty, span)),
                    span,
                ));
            } else {
                let CType { kind, qualifiers, span: ty_span } = ty;
                match kind {
                    TypeKind::Function(function) => {
                        let mut func = FuncDecl::new(name, function, span)
                            .with_storage_class(specs.storage_class)
                            .with_inline(specs.is_inline);

                        if self.check(&TokenKind::LBrace) {
                            if !declarations.is_empty() {
                                return Err(self.unexpected("function body after a declarator list"));
                            }
                            let end = self.skip_balanced()?;
                            func = func.with_body();
                            func.span = start_span.merge(end);
                            let span = func.span;
                            declarations.push(Declaration::new(DeclKind::Function(func), span));
                            return Ok(declarations);
                        }

                        declarations.push(Declaration::new(DeclKind::Function(func), span));
                    }
                    kind => {
                        let ty = CType::new(kind, ty_span).with_qualifiers(qualifiers);
                        declarations.push(Declaration::new(
                            DeclKind::Variable(VarDecl::new(name, ty, specs.storage_class, span)),
                            span,
                        ));
                    }
                }
            }

            if self.match_token(&TokenKind::Eq)? {
                self.skip_initializer()?;
            }

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.expect(TokenKind::Semi)?;
        Ok(declarations)
    }

    // =========================================================================
    // Declaration specifiers
    // =========================================================================

    fn parse_declaration_specifiers(&mut self) -> BindgenResult<DeclSpecifiers> {
        let start_span = self.current.span;
        let mut storage_class = None;
        let mut is_inline = false;
        let mut qualifiers = TypeQualifiers::default();
        let mut names: Vec<String> = Vec::new();
        let mut tag: Option<TypeKind> = None;

        loop {
            match &self.current.kind {
                // Storage class
                TokenKind::Typedef => {
                    self.advance()?;
                    storage_class = Some(StorageClass::Typedef);
                }
                TokenKind::Extern => {
                    self.advance()?;
                    storage_class = Some(StorageClass::Extern);
                }
                TokenKind::Static => {
                    self.advance()?;
                    storage_class = Some(StorageClass::Static);
                }
                TokenKind::Auto => {
                    self.advance()?;
                    storage_class = Some(StorageClass::Auto);
                }
                TokenKind::Register => {
                    self.advance()?;
                    storage_class = Some(StorageClass::Register);
                }
                TokenKind::ThreadLocal => {
                    self.advance()?;
                    storage_class = Some(StorageClass::ThreadLocal);
                }

                // Function specifiers
                TokenKind::Inline => {
                    self.advance()?;
                    is_inline = true;
                }
                TokenKind::Noreturn => {
                    self.advance()?;
                }

                // Type qualifiers
                TokenKind::Const => {
                    self.advance()?;
                    qualifiers.is_const = true;
                }
                TokenKind::Volatile => {
                    self.advance()?;
                    qualifiers.is_volatile = true;
                }
                TokenKind::Restrict => {
                    self.advance()?;
                    qualifiers.is_restrict = true;
                }
                TokenKind::Atomic => {
                    self.advance()?;
                }

                // Struct/union/enum
                TokenKind::Struct | TokenKind::Union => {
                    let is_struct = self.check(&TokenKind::Struct);
                    self.advance()?;
                    let record = self.parse_struct_or_union()?;
                    tag = Some(if is_struct {
                        TypeKind::Struct(record)
                    } else {
                        TypeKind::Union(record)
                    });
                }
                TokenKind::Enum => {
                    self.advance()?;
                    tag = Some(TypeKind::Enum(self.parse_enum()?));
                }

                // Typedef name: only when no other type specifier has been seen
                TokenKind::Identifier(name) if names.is_empty() && tag.is_none() => {
                    let name = name.clone();
                    self.advance()?;
                    names.push(name);
                }

                kind => match kind.primitive_name() {
                    Some(primitive) => {
                        self.advance()?;
                        names.push(primitive.to_string());
                    }
                    None => break,
                },
            }
        }

        let span = start_span.merge(self.previous);
        let kind = match (tag, names.is_empty()) {
            (Some(tag), true) => tag,
            (None, false) => TypeKind::Identifier(names),
            (Some(_), false) => {
                return Err(BindgenError::parser(
                    format!("conflicting type specifiers: {:?} with a struct/union/enum", names),
                    span,
                ));
            }
            (None, true) => return Err(self.unexpected("expected a type specifier")),
        };

        Ok(DeclSpecifiers {
            storage_class,
            is_inline,
            ty: CType::new(kind, span).with_qualifiers(qualifiers),
        })
    }

    /// Struct or union specifier after the keyword
    fn parse_struct_or_union(&mut self) -> BindgenResult<RecordType> {
        let start_span = self.previous;
        let name = if let TokenKind::Identifier(name) = &self.current.kind {
            let n = name.clone();
            self.advance()?;
            Some(n)
        } else {
            None
        };

        let fields = if self.match_token(&TokenKind::LBrace)? {
            let mut fields = Vec::new();
            while !self.check(&TokenKind::RBrace) {
                fields.extend(self.parse_struct_declaration()?);
            }
            self.expect(TokenKind::RBrace)?;
            Some(fields)
        } else if name.is_none() {
            return Err(self.unexpected("expected struct/union name or body"));
        } else {
            None // Forward reference
        };

        Ok(RecordType::new(name, fields, start_span.merge(self.previous)))
    }

    /// One member declaration inside a struct/union body
    fn parse_struct_declaration(&mut self) -> BindgenResult<Vec<FieldDecl>> {
        let start_span = self.current.span;
        let specs = self.parse_declaration_specifiers()?;

        // Anonymous member: `union { ... };`
        if self.match_token(&TokenKind::Semi)? {
            let span = start_span.merge(self.previous);
            return Ok(vec![FieldDecl::new(None, specs.ty, span)]);
        }

        let mut fields = Vec::new();
        loop {
            let (name, ty) = if self.check(&TokenKind::Colon) {
                (None, specs.ty.clone())
            } else {
                let declarator = self.parse_declarator(false)?;
                let ty = declarator.apply(specs.ty.clone());
                (declarator.name, ty)
            };

            let mut field = FieldDecl::new(name, ty, start_span);
            if self.match_token(&TokenKind::Colon)? {
                let width_span = self.current.span;
                let width = u64::try_from(self.parse_integer_constant()?).map_err(|_| {
                    BindgenError::parser("negative bit-field width", width_span)
                })?;
                field = field.with_bit_width(width);
            }
            field.span = start_span.merge(self.previous);
            fields.push(field);

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        self.expect(TokenKind::Semi)?;
        Ok(fields)
    }

    /// Enum specifier after the keyword
    fn parse_enum(&mut self) -> BindgenResult<EnumType> {
        let start_span = self.previous;
        let name = if let TokenKind::Identifier(name) = &self.current.kind {
            let n = name.clone();
            self.advance()?;
            Some(n)
        } else {
            None
        };

        let enumerators = if self.match_token(&TokenKind::LBrace)? {
            let mut enumerators = Vec::new();

            while !self.check(&TokenKind::RBrace) {
                let item_span = self.current.span;
                let item_name = self.expect_identifier("enumerator name")?;
                let value = if self.match_token(&TokenKind::Eq)? {
                    Some(self.parse_integer_constant()?)
                } else {
                    None
                };
                enumerators.push(Enumerator::new(item_name, value, item_span.merge(self.previous)));

                // Trailing comma is allowed
                if !self.check(&TokenKind::RBrace) {
                    self.expect(TokenKind::Comma)?;
                }
            }

            self.expect(TokenKind::RBrace)?;
            Some(enumerators)
        } else if name.is_none() {
            return Err(self.unexpected("expected enum name or body"));
        } else {
            None
        };

        Ok(EnumType::new(name, enumerators, start_span.merge(self.previous)))
    }

    // =========================================================================
    // Declarators
    // =========================================================================

    fn parse_declarator(&mut self, allow_abstract: bool) -> BindgenResult<Declarator> {
        let start_span = self.current.span;

        let mut parts = Vec::new();
        while self.check(&TokenKind::Star) {
            let star = self.advance()?.span;
            let mut qualifiers = TypeQualifiers::default();
            loop {
                match &self.current.kind {
                    TokenKind::Const => qualifiers.is_const = true,
                    TokenKind::Volatile => qualifiers.is_volatile = true,
                    TokenKind::Restrict => qualifiers.is_restrict = true,
                    TokenKind::Atomic => {}
                    _ => break,
                }
                self.advance()?;
            }
            parts.push(DeclaratorPart::Pointer(qualifiers, star));
        }

        // Direct declarator
        let mut name = None;
        let mut nested = Vec::new();
        let nested_paren = self.check(&TokenKind::LParen) && self.starts_nested_declarator(allow_abstract)?;

        if let TokenKind::Identifier(ident) = &self.current.kind {
            name = Some(ident.clone());
            self.advance()?;
        } else if nested_paren {
            self.advance()?;
            let inner = self.parse_declarator(allow_abstract)?;
            self.expect(TokenKind::RParen)?;
            name = inner.name;
            nested = inner.parts;
        } else if !allow_abstract {
            return Err(self.unexpected("expected identifier in declarator"));
        }

        // Suffixes bind tighter than the pointer prefix; the rightmost applies first
        let mut suffixes = Vec::new();
        loop {
            if self.check(&TokenKind::LBracket) {
                suffixes.push(self.parse_array_suffix()?);
            } else if self.check(&TokenKind::LParen) {
                suffixes.push(self.parse_function_suffix()?);
            } else {
                break;
            }
        }

        parts.extend(suffixes.into_iter().rev());
        parts.extend(nested);

        Ok(Declarator {
            name,
            parts,
            span: start_span.merge(self.previous),
        })
    }

    /// With the current token at `(`, decide between `(*name)` and a parameter list
    fn starts_nested_declarator(&mut self, allow_abstract: bool) -> BindgenResult<bool> {
        let next = self.lexer.peek()?;
        Ok(match next.kind {
            TokenKind::Star => true,
            TokenKind::Identifier(_) | TokenKind::LParen => !allow_abstract,
            _ => false,
        })
    }

    fn parse_array_suffix(&mut self) -> BindgenResult<DeclaratorPart> {
        let open = self.expect(TokenKind::LBracket)?.span;
        let mut size = None;

        if !self.check(&TokenKind::RBracket) {
            let is_literal = matches!(
                self.current.kind,
                TokenKind::IntLiteral(_)
                    | TokenKind::HexLiteral(_)
                    | TokenKind::OctalLiteral(_)
                    | TokenKind::BinaryLiteral(_)
            ) && matches!(self.lexer.peek()?.kind, TokenKind::RBracket);

            if is_literal {
                size = u64::try_from(self.parse_integer_constant()?).ok();
            } else {
                // Sizes written as expressions are not evaluated
                while !self.check(&TokenKind::RBracket) {
                    self.skip_token_or_group()?;
                }
            }
        }

        let close = self.expect(TokenKind::RBracket)?.span;
        Ok(DeclaratorPart::Array(size, open.merge(close)))
    }

    fn parse_function_suffix(&mut self) -> BindgenResult<DeclaratorPart> {
        let open = self.expect(TokenKind::LParen)?.span;
        let params = self.parse_parameter_list()?;
        let close = self.expect(TokenKind::RParen)?.span;
        Ok(DeclaratorPart::Function(params, open.merge(close)))
    }

    fn parse_parameter_list(&mut self) -> BindgenResult<ParamList> {
        let mut params = Vec::new();
        let mut variadic = false;

        if self.check(&TokenKind::RParen) {
            return Ok(ParamList::default());
        }

        loop {
            if self.match_token(&TokenKind::Ellipsis)? {
                variadic = true;
                break;
            }

            let start_span = self.current.span;
            let specs = self.parse_declaration_specifiers()?;
            let declarator = self.parse_declarator(true)?;
            let ty = declarator.apply(specs.ty);
            params.push(ParamDecl::new(
                declarator.name,
                ty,
                start_span.merge(self.previous),
            ));

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(ParamList::new(params, variadic))
    }

    // =========================================================================
    // Skipped regions: initializers, array size expressions, function bodies
    // =========================================================================

    /// Consume a balanced `(...)`, `[...]` or `{...}` group; returns the closing span
    fn skip_balanced(&mut self) -> BindgenResult<Span> {
        let open = self.current.span;
        let mut depth = 0usize;
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(token.span);
                    }
                }
                TokenKind::Eof => {
                    return Err(BindgenError::parser("unterminated group", open));
                }
                _ => {}
            }
        }
    }

    fn skip_token_or_group(&mut self) -> BindgenResult<()> {
        match &self.current.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                self.skip_balanced()?;
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => {
                return Err(self.unexpected("unbalanced expression"));
            }
            _ => {
                self.advance()?;
            }
        }
        Ok(())
    }

    /// Skip an initializer up to the `,` or `;` that ends it
    fn skip_initializer(&mut self) -> BindgenResult<()> {
        while !self.check(&TokenKind::Comma) && !self.check(&TokenKind::Semi) {
            self.skip_token_or_group()?;
        }
        Ok(())
    }

    // =========================================================================
    // Integer constants
    // =========================================================================

    /// Integer literal, optionally signed or parenthesized
    fn parse_integer_constant(&mut self) -> BindgenResult<i64> {
        if self.match_token(&TokenKind::LParen)? {
            let value = self.parse_integer_constant()?;
            self.expect(TokenKind::RParen)?;
            return Ok(value);
        }
        if self.match_token(&TokenKind::Minus)? {
            let span = self.current.span;
            return self.parse_integer_constant()?.checked_neg().ok_or_else(|| {
                BindgenError::parser("integer constant out of range", span)
            });
        }
        if self.match_token(&TokenKind::Plus)? {
            return self.parse_integer_constant();
        }

        let value = match &self.current.kind {
            TokenKind::IntLiteral(s) => self.parse_int_literal(s)?,
            TokenKind::HexLiteral(s) => self.parse_radix_literal(s, 2, 16)?,
            TokenKind::OctalLiteral(s) => self.parse_radix_literal(s, 1, 8)?,
            TokenKind::BinaryLiteral(s) => self.parse_radix_literal(s, 2, 2)?,
            TokenKind::CharLiteral(s) => self.parse_char_literal(s)?,
            _ => return Err(self.unexpected("expected an integer literal")),
        };
        self.advance()?;
        Ok(value)
    }

    fn parse_int_literal(&self, s: &str) -> BindgenResult<i64> {
        let digits = s.trim_end_matches(['u', 'U', 'l', 'L']);
        digits.parse().map_err(|_| {
            BindgenError::parser(format!("invalid integer literal: {}", s), self.current.span)
        })
    }

    /// Hex, octal and binary literals; `prefix_len` is the length of `0x`, `0` or `0b`
    fn parse_radix_literal(&self, s: &str, prefix_len: usize, radix: u32) -> BindgenResult<i64> {
        let digits = s[prefix_len..].trim_end_matches(['u', 'U', 'l', 'L']);
        if digits.is_empty() {
            return Ok(0);
        }
        i64::from_str_radix(digits, radix).map_err(|_| {
            BindgenError::parser(format!("invalid integer literal: {}", s), self.current.span)
        })
    }

    fn parse_char_literal(&self, s: &str) -> BindgenResult<i64> {
        let inner = &s[1..s.len() - 1]; // Remove quotes
        let mut chars = inner.chars();
        let value = match (chars.next(), chars.next()) {
            (Some('\\'), Some(escaped)) => match escaped {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                '0' => '\0',
                '\\' => '\\',
                '\'' => '\'',
                '"' => '"',
                _ => {
                    return Err(BindgenError::parser(
                        format!("unsupported escape in char literal: {}", s),
                        self.current.span,
                    ));
                }
            },
            (Some(c), None) => c,
            _ => {
                return Err(BindgenError::parser(
                    format!("invalid char literal: {}", s),
                    self.current.span,
                ));
            }
        };
        Ok(i64::from(u32::from(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Vec<Declaration> {
        Parser::new(source).unwrap().parse().unwrap().declarations
    }

    fn parse_one(source: &str) -> DeclKind {
        let mut decls = parse(source);
        assert_eq!(decls.len(), 1, "expected exactly one declaration in {source:?}");
        decls.remove(0).kind
    }

    fn names(ty: &CType) -> Vec<String> {
        match &ty.kind {
            TypeKind::Identifier(names) => names.clone(),
            other => panic!("expected identifier type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_struct_definition() {
        let DeclKind::Struct(record) = parse_one("struct wasm_limits_t { uint32_t min; uint32_t max; };") else {
            panic!("expected struct");
        };
        assert_eq!(record.name.as_deref(), Some("wasm_limits_t"));
        let fields = record.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name.as_deref(), Some("min"));
        assert_eq!(names(&fields[1].ty), vec!["uint32_t"]);
    }

    #[test]
    fn test_parse_forward_struct_typedef() {
        let DeclKind::Typedef(typedef) = parse_one("typedef struct wasm_engine_t wasm_engine_t;") else {
            panic!("expected typedef");
        };
        assert_eq!(typedef.name, "wasm_engine_t");
        let TypeKind::Struct(record) = &typedef.ty.kind else {
            panic!("expected struct type");
        };
        assert_eq!(record.name.as_deref(), Some("wasm_engine_t"));
        assert!(!record.has_body());
    }

    #[test]
    fn test_parse_function_with_void_params() {
        let DeclKind::Function(func) = parse_one("wasm_engine_t* wasm_engine_new(void);") else {
            panic!("expected function");
        };
        assert_eq!(func.name, "wasm_engine_new");
        assert!(func.ty.return_type.is_pointer());
        assert!(func.ty.params.is_void_only());
        assert!(!func.has_body);
    }

    #[test]
    fn test_parse_abstract_parameters() {
        let DeclKind::Function(func) =
            parse_one("extern void wasm_byte_vec_new(wasm_byte_vec_t* out, size_t, const wasm_byte_t *);")
        else {
            panic!("expected function");
        };
        let params = &func.ty.params.params;
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name.as_deref(), Some("out"));
        assert_eq!(params[1].name, None);
        assert_eq!(names(&params[1].ty), vec!["size_t"]);
        let TypeKind::Pointer(pointee) = &params[2].ty.kind else {
            panic!("expected pointer");
        };
        assert!(pointee.qualifiers.is_const);
    }

    #[test]
    fn test_parse_function_pointer_typedef() {
        let DeclKind::Typedef(typedef) =
            parse_one("typedef wasm_trap_t* (*wasm_func_callback_t)(const wasm_val_vec_t* args, wasm_val_vec_t* results);")
        else {
            panic!("expected typedef");
        };
        assert_eq!(typedef.name, "wasm_func_callback_t");
        let TypeKind::Pointer(inner) = &typedef.ty.kind else {
            panic!("expected pointer to function");
        };
        let TypeKind::Function(function) = &inner.kind else {
            panic!("expected function type");
        };
        assert!(function.return_type.is_pointer());
        assert_eq!(function.params.params.len(), 2);
    }

    #[test]
    fn test_parse_abstract_function_pointer_parameter() {
        let DeclKind::Function(func) =
            parse_one("void wasm_foreign_set_host_info_with_finalizer(wasm_foreign_t*, void*, void (*)(void*));")
        else {
            panic!("expected function");
        };
        let finalizer = &func.ty.params.params[2];
        assert_eq!(finalizer.name, None);
        let TypeKind::Pointer(inner) = &finalizer.ty.kind else {
            panic!("expected pointer");
        };
        assert!(inner.is_function());
    }

    #[test]
    fn test_parse_function_returning_function_pointer() {
        let DeclKind::Function(func) = parse_one("void (*signal(int sig, void (*handler)(int)))(int);") else {
            panic!("expected function");
        };
        assert_eq!(func.name, "signal");
        assert_eq!(func.ty.params.params.len(), 2);
        let TypeKind::Pointer(inner) = &func.ty.return_type.kind else {
            panic!("expected pointer return");
        };
        assert!(inner.is_function());
    }

    #[test]
    fn test_parse_array_declarators() {
        let DeclKind::Struct(record) = parse_one("struct __locale_struct { struct __locale_data *__locales[13]; int grid[2][3]; };") else {
            panic!("expected struct");
        };
        let fields = record.fields.unwrap();
        let TypeKind::Array { element, size } = &fields[0].ty.kind else {
            panic!("expected array");
        };
        assert_eq!(*size, Some(13));
        assert!(element.is_pointer());

        let TypeKind::Array { element, size } = &fields[1].ty.kind else {
            panic!("expected array");
        };
        assert_eq!(*size, Some(2));
        assert!(matches!(element.kind, TypeKind::Array { size: Some(3), .. }));
    }

    #[test]
    fn test_parse_enum_values() {
        let DeclKind::Enum(enum_type) = parse_one("enum wasm_valkind_enum { WASM_I32, WASM_I64, WASM_ANYREF = 128, WASM_FUNCREF, NEG = -(1), };") else {
            panic!("expected enum");
        };
        let values: Vec<_> = enum_type
            .enumerators
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("WASM_I32".to_string(), None),
                ("WASM_I64".to_string(), None),
                ("WASM_ANYREF".to_string(), Some(128)),
                ("WASM_FUNCREF".to_string(), None),
                ("NEG".to_string(), Some(-1)),
            ]
        );
    }

    #[test]
    fn test_parse_enum_rejects_expressions() {
        let err = Parser::new("enum e { A = 1 << 2 };").unwrap().parse().unwrap_err();
        assert!(matches!(err, BindgenError::Parser { .. }));
    }

    #[test]
    fn test_parse_static_inline_body_is_skipped() {
        let source = "static inline wasm_valtype_t* wasm_valtype_new_i32(void) { return wasm_valtype_new(WASM_I32); }\n\
                      wasm_valtype_t* wasm_valtype_new(wasm_valkind_t);";
        let decls = parse(source);
        assert_eq!(decls.len(), 2);
        let DeclKind::Function(inline) = &decls[0].kind else {
            panic!("expected function");
        };
        assert!(inline.has_body);
        assert!(inline.is_inline);
        assert_eq!(inline.storage_class, Some(StorageClass::Static));
        let DeclKind::Function(plain) = &decls[1].kind else {
            panic!("expected function");
        };
        assert_eq!(plain.name, "wasm_valtype_new");
    }

    #[test]
    fn test_parse_multiple_declarators() {
        let decls = parse("typedef struct wasm_ref_t wasm_ref_t, *wasm_ref_ptr_t;");
        assert_eq!(decls.len(), 2);
        let DeclKind::Typedef(second) = &decls[1].kind else {
            panic!("expected typedef");
        };
        assert_eq!(second.name, "wasm_ref_ptr_t");
        assert!(second.ty.is_pointer());
    }

    #[test]
    fn test_parse_multi_word_primitives() {
        let DeclKind::Typedef(typedef) = parse_one("typedef unsigned long int size_t;") else {
            panic!("expected typedef");
        };
        assert_eq!(names(&typedef.ty), vec!["unsigned", "long", "int"]);
    }

    #[test]
    fn test_parse_anonymous_members_and_bitfields() {
        let DeclKind::Struct(record) =
            parse_one("struct wasm_val_t { uint8_t kind; union { int32_t i32; int64_t i64; } of; struct { int a; }; unsigned flag : 1; };")
        else {
            panic!("expected struct");
        };
        let fields = record.fields.unwrap();
        assert_eq!(fields.len(), 4);
        assert!(matches!(&fields[1].ty.kind, TypeKind::Union(r) if r.name.is_none()));
        assert_eq!(fields[2].name, None);
        assert_eq!(fields[3].bit_width, Some(1));
    }

    #[test]
    fn test_parse_variable_with_initializer() {
        let decls = parse("static const int table[] = { 1, 2, (3) }, other = 4;");
        assert_eq!(decls.len(), 2);
        assert!(matches!(&decls[0].kind, DeclKind::Variable(v) if v.name == "table"));
        assert!(matches!(&decls[1].kind, DeclKind::Variable(v) if v.name == "other"));
    }

    #[test]
    fn test_parse_preprocessed_noise() {
        let source = "# 1 \"wasm_c_api.h\"\n;\ntypedef int __gnuc_va_list;\n# 5 \"x.h\" 3 4\nextern void *memcpy (void * __dest, const void * __src, size_t __n) ;\n";
        let decls = parse(source);
        assert_eq!(decls.len(), 2);
        assert!(matches!(&decls[1].kind, DeclKind::Function(f) if f.name == "memcpy"));
    }

    #[test]
    fn test_parse_anonymous_struct_without_body_fails() {
        let err = Parser::new("struct;").unwrap().parse().unwrap_err();
        assert!(matches!(err, BindgenError::Parser { .. }));
    }

    #[test]
    fn test_parse_missing_semicolon_fails() {
        let err = Parser::new("typedef int wasm_x_t").unwrap().parse().unwrap_err();
        assert!(matches!(err, BindgenError::Parser { .. }));
    }
}

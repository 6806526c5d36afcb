//! Type representations in the AST

use crate::common::Span;

/// A C type node.
///
/// `CType` is the wrapper around every node: it carries the qualifiers that
/// apply to the node itself (`const char` vs `char *const`).
#[derive(Debug, Clone, PartialEq)]
pub struct CType {
    pub kind: TypeKind,
    pub qualifiers: TypeQualifiers,
    pub span: Span,
}

impl CType {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self {
            kind,
            qualifiers: TypeQualifiers::default(),
            span,
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: TypeQualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn identifier(names: &[&str], span: Span) -> Self {
        Self::new(
            TypeKind::Identifier(names.iter().map(|n| n.to_string()).collect()),
            span,
        )
    }

    pub fn void(span: Span) -> Self {
        Self::identifier(&["void"], span)
    }

    pub fn pointer_to(inner: CType, span: Span) -> Self {
        Self::new(TypeKind::Pointer(Box::new(inner)), span)
    }

    /// Plain `void` (not a pointer to it)
    pub fn is_void(&self) -> bool {
        matches!(&self.kind, TypeKind::Identifier(names) if names.len() == 1 && names[0] == "void")
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, TypeKind::Pointer(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TypeKind::Function(_))
    }
}

/// The kind of a C type node
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive keyword list or typedef name, in source order: `unsigned long int`, `wasm_byte_t`
    Identifier(Vec<String>),
    Pointer(Box<CType>),
    Array {
        element: Box<CType>,
        size: Option<u64>,
    },
    Function(FunctionType),
    Struct(RecordType),
    Union(RecordType),
    Enum(EnumType),
}

/// Function type: return type plus parameter list
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub return_type: Box<CType>,
    pub params: ParamList,
}

/// Parameter list as written. `(void)` is kept as a single `void` parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamList {
    pub params: Vec<ParamDecl>,
    pub variadic: bool,
}

impl ParamList {
    pub fn new(params: Vec<ParamDecl>, variadic: bool) -> Self {
        Self { params, variadic }
    }

    /// `(void)`: a sole unnamed-or-named plain `void` parameter
    pub fn is_void_only(&self) -> bool {
        self.params.len() == 1 && self.params[0].ty.is_void()
    }

    /// Parameters that take an argument; `(void)` has none, `(void *)` has one
    pub fn effective(&self) -> &[ParamDecl] {
        if self.is_void_only() {
            &[]
        } else {
            &self.params
        }
    }
}

/// Function parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub ty: CType,
    pub span: Span,
}

impl ParamDecl {
    pub fn new(name: Option<String>, ty: CType, span: Span) -> Self {
        Self { name, ty, span }
    }
}

/// Struct or union specifier. `fields` is `None` for a bodiless reference (`struct foo`).
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub name: Option<String>,
    pub fields: Option<Vec<FieldDecl>>,
    pub span: Span,
}

impl RecordType {
    pub fn new(name: Option<String>, fields: Option<Vec<FieldDecl>>, span: Span) -> Self {
        Self { name, fields, span }
    }

    pub fn has_body(&self) -> bool {
        self.fields.is_some()
    }
}

/// Struct/union member. `name` is `None` for anonymous members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Option<String>,
    pub ty: CType,
    pub bit_width: Option<u64>,
    pub span: Span,
}

impl FieldDecl {
    pub fn new(name: Option<String>, ty: CType, span: Span) -> Self {
        Self {
            name,
            ty,
            bit_width: None,
            span,
        }
    }

    pub fn with_bit_width(mut self, width: u64) -> Self {
        self.bit_width = Some(width);
        self
    }
}

/// Enum specifier. `enumerators` is `None` for a bodiless reference.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: Option<String>,
    pub enumerators: Option<Vec<Enumerator>>,
    pub span: Span,
}

impl EnumType {
    pub fn new(name: Option<String>, enumerators: Option<Vec<Enumerator>>, span: Span) -> Self {
        Self {
            name,
            enumerators,
            span,
        }
    }
}

/// Enumerator with its explicit literal, if any. Defaulted values are computed by the emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: String,
    pub value: Option<i64>,
    pub span: Span,
}

impl Enumerator {
    pub fn new(name: String, value: Option<i64>, span: Span) -> Self {
        Self { name, value, span }
    }
}

/// Type qualifiers (const, volatile, restrict)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeQualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_restrict: bool,
}

impl TypeQualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }
}

/// Storage class specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Auto,
    Register,
    Static,
    Extern,
    Typedef,
    ThreadLocal,
}

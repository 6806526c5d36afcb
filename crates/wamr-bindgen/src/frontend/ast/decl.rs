//! Declaration AST nodes

use super::{CType, EnumType, FunctionType, RecordType, StorageClass};
use crate::common::Span;

/// Top-level declaration node
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub span: Span,
}

impl Declaration {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Declaration kinds.
///
/// A declaration with several declarators (`typedef struct x x, *px;`) is split
/// into one `Declaration` per declarator, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// Struct declaration without declarators: `struct foo { ... };` or `struct foo;`
    Struct(RecordType),

    /// Union declaration without declarators
    Union(RecordType),

    /// Enum declaration without declarators
    Enum(EnumType),

    /// Typedef: `typedef uint8_t wasm_valkind_t;`
    Typedef(TypedefDecl),

    /// Function declaration or definition
    Function(FuncDecl),

    /// Variable declaration: `extern int x;`
    Variable(VarDecl),
}

/// Typedef declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub name: String,
    pub ty: CType,
    pub span: Span,
}

impl TypedefDecl {
    pub fn new(name: String, ty: CType, span: Span) -> Self {
        Self { name, ty, span }
    }
}

/// Function declaration or definition
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub ty: FunctionType,
    pub storage_class: Option<StorageClass>,
    pub is_inline: bool,
    /// A body was present (and skipped)
    pub has_body: bool,
    pub span: Span,
}

impl FuncDecl {
    pub fn new(name: String, ty: FunctionType, span: Span) -> Self {
        Self {
            name,
            ty,
            storage_class: None,
            is_inline: false,
            has_body: false,
            span,
        }
    }

    pub fn with_storage_class(mut self, sc: Option<StorageClass>) -> Self {
        self.storage_class = sc;
        self
    }

    pub fn with_inline(mut self, is_inline: bool) -> Self {
        self.is_inline = is_inline;
        self
    }

    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }
}

/// Variable declaration. Initializers are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: CType,
    pub storage_class: Option<StorageClass>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: String, ty: CType, storage_class: Option<StorageClass>, span: Span) -> Self {
        Self {
            name,
            ty,
            storage_class,
            span,
        }
    }
}

//! C type to Rust FFI type mapping

use std::fmt;

use crate::common::{BindgenError, BindgenResult, Span};
use crate::frontend::ast::{CType, FunctionType, TypeKind};

/// A Rust type expression as it appears in generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RustType {
    /// FFI primitive: `c_int`, `u32`, `bool`, ...
    Primitive(&'static str),
    /// `()`, only ever a return type
    Unit,
    /// `void *`: `*mut c_void` or `*const c_void`
    Opaque { mutable: bool },
    Pointer { pointee: Box<RustType>, mutable: bool },
    /// Function pointer, nullable on the C side
    Callback {
        ret: Box<RustType>,
        params: Vec<RustType>,
        variadic: bool,
    },
    /// Library-prefixed typedef or struct tag, passed through unchanged
    Named(String),
}

impl RustType {
    /// Handles are compared by identity on the C side and never by value
    pub fn is_handle(&self) -> bool {
        matches!(
            self,
            RustType::Opaque { .. } | RustType::Pointer { .. } | RustType::Callback { .. }
        )
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, RustType::Unit)
    }
}

impl fmt::Display for RustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustType::Primitive(name) => write!(f, "{}", name),
            RustType::Unit => write!(f, "()"),
            RustType::Opaque { mutable: true } => write!(f, "*mut c_void"),
            RustType::Opaque { mutable: false } => write!(f, "*const c_void"),
            RustType::Pointer { pointee, mutable } => {
                let kw = if *mutable { "mut" } else { "const" };
                write!(f, "*{} {}", kw, pointee)
            }
            RustType::Callback {
                ret,
                params,
                variadic,
            } => write!(f, "Option<{}>", FnPointer::new(ret, params, *variadic)),
            RustType::Named(name) => write!(f, "{}", name),
        }
    }
}

/// `unsafe extern "C" fn(P...) -> R`; the arrow is omitted for unit returns
#[derive(Debug, Clone, Copy)]
pub struct FnPointer<'a> {
    ret: &'a RustType,
    params: &'a [RustType],
    variadic: bool,
}

impl<'a> FnPointer<'a> {
    pub fn new(ret: &'a RustType, params: &'a [RustType], variadic: bool) -> Self {
        Self {
            ret,
            params,
            variadic,
        }
    }
}

impl fmt::Display for FnPointer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsafe extern \"C\" fn(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        if self.variadic {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")?;
        if !self.ret.is_unit() {
            write!(f, " -> {}", self.ret)?;
        }
        Ok(())
    }
}

/// Fixed table of C primitives and `<stdint.h>` names the header is allowed to use
fn primitive(name: &str) -> Option<RustType> {
    let rust = match name {
        "void" => return Some(RustType::Unit),
        "_Bool" => "bool",
        "byte_t" => "u8",
        "char" => "c_char",
        "int" => "c_int",
        "size_t" => "usize",
        "float" | "float32_t" => "f32",
        "double" | "float64_t" => "f64",
        "int8_t" => "i8",
        "int16_t" => "i16",
        "int32_t" => "i32",
        "int64_t" => "i64",
        "uint8_t" => "u8",
        "uint16_t" => "u16",
        "uint32_t" => "u32",
        "uint64_t" => "u64",
        "intptr_t" => "isize",
        "uintptr_t" => "usize",
        _ => return None,
    };
    Some(RustType::Primitive(rust))
}

/// Maps AST type nodes to [`RustType`]s.
///
/// Total over the shapes `wasm_c_api.h` uses and deliberately partial
/// elsewhere: anything it cannot express is an `UnsupportedType` error.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    prefix: &'a str,
}

impl<'a> TypeMapper<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    pub fn map(&self, ty: &CType) -> BindgenResult<RustType> {
        match &ty.kind {
            TypeKind::Identifier(names) => self.map_identifier(names, ty.span),
            TypeKind::Pointer(pointee) => self.map_pointer(pointee),
            // Arrays decay to pointers, as they do in a C call
            TypeKind::Array { element, .. } => self.map_pointer(element),
            TypeKind::Function(function) => self.map_function(function),
            TypeKind::Struct(record) | TypeKind::Union(record) => match &record.name {
                Some(name) => Ok(RustType::Named(name.clone())),
                None => Err(BindgenError::unsupported(
                    "anonymous struct or union where a type name is required",
                    ty.span,
                )),
            },
            other => Err(BindgenError::unsupported(
                format!("cannot map {} to a Rust type", describe(other)),
                ty.span,
            )),
        }
    }

    fn map_pointer(&self, pointee: &CType) -> BindgenResult<RustType> {
        let mutable = !pointee.qualifiers.is_const;
        if pointee.is_void() {
            return Ok(RustType::Opaque { mutable });
        }
        if let TypeKind::Function(function) = &pointee.kind {
            return self.map_function(function);
        }
        Ok(RustType::Pointer {
            pointee: Box::new(self.map(pointee)?),
            mutable,
        })
    }

    pub fn map_function(&self, function: &FunctionType) -> BindgenResult<RustType> {
        let ret = self.map(&function.return_type)?;
        let params = function
            .params
            .effective()
            .iter()
            .map(|param| self.map(&param.ty))
            .collect::<BindgenResult<Vec<_>>>()?;
        Ok(RustType::Callback {
            ret: Box::new(ret),
            params,
            variadic: function.params.variadic,
        })
    }

    fn map_identifier(&self, names: &[String], span: Span) -> BindgenResult<RustType> {
        let [name] = names else {
            return Err(BindgenError::unsupported(
                format!("multi-word type `{}` is not supported", names.join(" ")),
                span,
            ));
        };

        if name.starts_with(self.prefix) {
            return Ok(RustType::Named(name.clone()));
        }

        primitive(name).ok_or_else(|| {
            BindgenError::unsupported(format!("no Rust mapping for C type `{}`", name), span)
        })
    }
}

fn describe(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Enum(e) => match &e.name {
            Some(name) => format!("enum `{}`", name),
            None => "anonymous enum".to_string(),
        },
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::{EnumType, ParamDecl, ParamList, RecordType, TypeQualifiers};
    use pretty_assertions::assert_eq;

    fn span() -> Span {
        Span::default()
    }

    fn ident(name: &str) -> CType {
        CType::identifier(&[name], span())
    }

    fn ptr(inner: CType) -> CType {
        CType::pointer_to(inner, span())
    }

    fn konst(ty: CType) -> CType {
        ty.with_qualifiers(TypeQualifiers::new().with_const())
    }

    fn function(ret: CType, params: Vec<CType>, variadic: bool) -> CType {
        let params = params
            .into_iter()
            .map(|ty| ParamDecl::new(None, ty, span()))
            .collect();
        CType::new(
            TypeKind::Function(FunctionType {
                return_type: Box::new(ret),
                params: ParamList::new(params, variadic),
            }),
            span(),
        )
    }

    fn render(ty: &CType) -> String {
        TypeMapper::new("wasm_").map(ty).unwrap().to_string()
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(render(&ident("_Bool")), "bool");
        assert_eq!(render(&ident("byte_t")), "u8");
        assert_eq!(render(&ident("char")), "c_char");
        assert_eq!(render(&ident("int")), "c_int");
        assert_eq!(render(&ident("size_t")), "usize");
        assert_eq!(render(&ident("void")), "()");
        assert_eq!(render(&ident("float32_t")), "f32");
        assert_eq!(render(&ident("uint64_t")), "u64");
        assert_eq!(render(&ident("intptr_t")), "isize");
    }

    #[test]
    fn test_prefixed_names_pass_through() {
        assert_eq!(render(&ident("wasm_engine_t")), "wasm_engine_t");
    }

    #[test]
    fn test_pointers() {
        assert_eq!(render(&ptr(ident("void"))), "*mut c_void");
        assert_eq!(render(&ptr(konst(ident("void")))), "*const c_void");
        assert_eq!(render(&ptr(ident("wasm_store_t"))), "*mut wasm_store_t");
        assert_eq!(render(&ptr(konst(ident("wasm_byte_vec_t")))), "*const wasm_byte_vec_t");
        assert_eq!(render(&ptr(ptr(ident("char")))), "*mut *mut c_char");
    }

    #[test]
    fn test_array_decays_to_pointer() {
        let array = CType::new(
            TypeKind::Array {
                element: Box::new(ident("uint8_t")),
                size: Some(7),
            },
            span(),
        );
        assert_eq!(render(&array), "*mut u8");
    }

    #[test]
    fn test_function_pointer_is_callback() {
        let callback = ptr(function(
            ptr(ident("wasm_trap_t")),
            vec![ptr(konst(ident("wasm_val_vec_t"))), ptr(ident("wasm_val_vec_t"))],
            false,
        ));
        assert_eq!(
            render(&callback),
            "Option<unsafe extern \"C\" fn(*const wasm_val_vec_t, *mut wasm_val_vec_t) -> *mut wasm_trap_t>"
        );
        assert!(TypeMapper::new("wasm_").map(&callback).unwrap().is_handle());
    }

    #[test]
    fn test_callback_void_params_and_return() {
        let finalizer = ptr(function(ident("void"), vec![ident("void")], false));
        assert_eq!(render(&finalizer), "Option<unsafe extern \"C\" fn()>");

        let variadic = ptr(function(ident("int"), vec![ident("int")], true));
        assert_eq!(render(&variadic), "Option<unsafe extern \"C\" fn(c_int, ...) -> c_int>");
    }

    #[test]
    fn test_named_struct() {
        let record = CType::new(
            TypeKind::Struct(RecordType::new(Some("wasm_limits_t".into()), None, span())),
            span(),
        );
        assert_eq!(render(&ptr(record)), "*mut wasm_limits_t");
    }

    #[test]
    fn test_unsupported_shapes() {
        let mapper = TypeMapper::new("wasm_");
        let cases = vec![
            CType::new(TypeKind::Struct(RecordType::new(None, Some(vec![]), span())), span()),
            CType::new(TypeKind::Union(RecordType::new(None, Some(vec![]), span())), span()),
            CType::identifier(&["unsigned", "int"], span()),
            ident("long"),
            ident("__locale_t"),
            CType::new(TypeKind::Enum(EnumType::new(Some("e".into()), None, span())), span()),
        ];
        for ty in cases {
            assert!(
                matches!(mapper.map(&ty), Err(BindgenError::UnsupportedType { .. })),
                "expected failure for {ty:?}"
            );
        }
    }

    #[test]
    fn test_bare_fn_pointer() {
        let ret = RustType::Primitive("c_int");
        let params = [RustType::Opaque { mutable: true }];
        assert_eq!(
            FnPointer::new(&ret, &params, false).to_string(),
            "unsafe extern \"C\" fn(*mut c_void) -> c_int"
        );
        assert_eq!(FnPointer::new(&RustType::Unit, &[], false).to_string(), "unsafe extern \"C\" fn()");
    }

    #[test]
    fn test_handle_classification() {
        assert!(RustType::Opaque { mutable: true }.is_handle());
        assert!(RustType::Pointer { pointee: Box::new(RustType::Primitive("u8")), mutable: false }.is_handle());
        assert!(!RustType::Primitive("c_int").is_handle());
        assert!(!RustType::Named("wasm_limits_t".into()).is_handle());
    }
}

//! Rust code emitter
//!
//! Walks top-level declarations strictly in source order and appends one
//! emission unit per translated declaration to the output buffer.

use std::collections::HashSet;

use string_interner::{DefaultStringInterner, DefaultSymbol};

use super::prologue;
use super::ty::{FnPointer, RustType, TypeMapper};
use crate::common::{BindgenError, BindgenResult};
use crate::config::BindgenConfig;
use crate::frontend::ast::*;

/// Words that need `r#` to be used as a field name
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers
const RESERVED_PATHS: &[&str] = &["crate", "self", "Self", "super"];

pub(crate) fn field_ident(name: &str) -> String {
    if RESERVED_PATHS.contains(&name) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Code generator that turns a header's declarations into a Rust binding module
pub struct RustEmitter<'a> {
    config: &'a BindgenConfig,
    mapper: TypeMapper<'a>,
    output: String,
    names: DefaultStringInterner,
    /// Every item name already emitted
    emitted: HashSet<DefaultSymbol>,
    /// Struct tags that get a body somewhere in the visited declarations
    defined_structs: HashSet<DefaultSymbol>,
}

impl<'a> RustEmitter<'a> {
    pub fn new(config: &'a BindgenConfig) -> Self {
        Self {
            config,
            mapper: TypeMapper::new(&config.prefix),
            output: String::new(),
            names: DefaultStringInterner::new(),
            emitted: HashSet::new(),
            defined_structs: HashSet::new(),
        }
    }

    /// Generate the complete module text
    pub fn generate(mut self, unit: &TranslationUnit) -> BindgenResult<String> {
        self.output.push_str(&prologue::render(self.config));

        for decl in &unit.declarations {
            self.collect_declaration(decl);
        }

        for decl in &unit.declarations {
            self.visit_declaration(decl)?;
        }

        tracing::debug!(items = self.emitted.len(), "emitted binding items");
        Ok(self.output)
    }

    fn emit_unit(&mut self, text: &str) {
        self.output.push('\n');
        self.output.push_str(text);
    }

    /// Register an item name; false when it was emitted before
    fn claim(&mut self, name: &str) -> bool {
        let symbol = self.names.get_or_intern(name);
        self.emitted.insert(symbol)
    }

    fn is_defined_struct(&self, name: &str) -> bool {
        self.names
            .get(name)
            .is_some_and(|symbol| self.defined_structs.contains(&symbol))
    }

    // =========================================================================
    // Pre-scan: struct definitions reachable from visited declarations
    // =========================================================================

    fn collect_declaration(&mut self, decl: &Declaration) {
        match &decl.kind {
            DeclKind::Struct(record) => self.collect_record(record, true),
            DeclKind::Typedef(typedef) if self.config.has_prefix(&typedef.name) => {
                self.collect_type(&typedef.ty);
            }
            DeclKind::Variable(var) => self.collect_type(&var.ty),
            _ => {}
        }
    }

    fn collect_type(&mut self, ty: &CType) {
        match &ty.kind {
            TypeKind::Struct(record) => self.collect_record(record, true),
            TypeKind::Union(record) => self.collect_record(record, false),
            TypeKind::Pointer(inner) => self.collect_type(inner),
            TypeKind::Array { element, .. } => self.collect_type(element),
            _ => {}
        }
    }

    fn collect_record(&mut self, record: &RecordType, is_struct: bool) {
        let Some(fields) = &record.fields else {
            return;
        };
        if let Some(name) = &record.name {
            // Skipped structs are never visited, so neither is anything nested in them
            if self.config.is_skipped_struct(name) {
                return;
            }
            if is_struct {
                let symbol = self.names.get_or_intern(name);
                self.defined_structs.insert(symbol);
            }
        }
        for field in fields {
            self.collect_type(&field.ty);
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn visit_declaration(&mut self, decl: &Declaration) -> BindgenResult<()> {
        match &decl.kind {
            DeclKind::Struct(record) => self.visit_struct(record),
            DeclKind::Union(record) => {
                self.visit_union(record);
                Ok(())
            }
            DeclKind::Enum(enum_type) => self.visit_enum(enum_type),
            DeclKind::Typedef(typedef) => self.visit_typedef(typedef),
            DeclKind::Function(func) => self.visit_function(func),
            // `struct x { ... } v;` still defines `x`
            DeclKind::Variable(var) => self.visit_tags(&var.ty),
        }
    }

    /// Visit struct/union/enum declarations reachable through pointers and arrays
    fn visit_tags(&mut self, ty: &CType) -> BindgenResult<()> {
        match &ty.kind {
            TypeKind::Struct(record) => self.visit_struct(record),
            TypeKind::Union(record) => {
                self.visit_union(record);
                Ok(())
            }
            TypeKind::Enum(enum_type) => self.visit_enum(enum_type),
            TypeKind::Pointer(inner) => self.visit_tags(inner),
            TypeKind::Array { element, .. } => self.visit_tags(element),
            TypeKind::Identifier(_) | TypeKind::Function(_) => Ok(()),
        }
    }

    fn visit_struct(&mut self, record: &RecordType) -> BindgenResult<()> {
        let Some(name) = &record.name else {
            return Ok(());
        };
        if self.config.is_skipped_struct(name) {
            tracing::debug!(%name, "struct has a hand-authored representation");
            return Ok(());
        }

        match &record.fields {
            // Defined elsewhere; Rust items are order independent
            None if self.is_defined_struct(name) => Ok(()),
            None => {
                self.emit_marker(name);
                Ok(())
            }
            Some(fields) if fields.is_empty() => {
                self.emit_marker(name);
                Ok(())
            }
            Some(fields) => {
                for field in fields {
                    self.visit_tags(&field.ty)?;
                }
                let text = self.render_struct(name, fields)?;
                if self.claim(name) {
                    self.emit_unit(&text);
                } else {
                    tracing::debug!(%name, "struct already emitted");
                }
                Ok(())
            }
        }
    }

    fn emit_marker(&mut self, name: &str) {
        if self.claim(name) {
            let text = format!("#[repr(C)]\npub struct {} {{\n    _private: [u8; 0],\n}}\n", name);
            self.emit_unit(&text);
        }
    }

    fn render_struct(&self, name: &str, fields: &[FieldDecl]) -> BindgenResult<String> {
        let mut members = Vec::with_capacity(fields.len());
        for field in fields {
            let Some(field_name) = &field.name else {
                return Err(BindgenError::unsupported(
                    format!("anonymous member in struct `{}`", name),
                    field.span,
                ));
            };
            if field.bit_width.is_some() {
                return Err(BindgenError::unsupported(
                    format!("bit-field `{}` in struct `{}`", field_name, name),
                    field.span,
                ));
            }
            members.push((field_ident(field_name), self.mapper.map(&field.ty)?));
        }

        let mut text = String::new();
        text.push_str("#[repr(C)]\n#[derive(Debug, Clone, Copy)]\n");
        text.push_str(&format!("pub struct {} {{\n", name));
        for (ident, ty) in &members {
            text.push_str(&format!("    pub {}: {},\n", ident, ty));
        }
        text.push_str("}\n\n");

        // Handles are identities, not values
        let compared: Vec<&str> = members
            .iter()
            .filter(|(_, ty)| !ty.is_handle())
            .map(|(ident, _)| ident.as_str())
            .collect();

        text.push_str(&format!("impl PartialEq for {} {{\n", name));
        if compared.is_empty() {
            text.push_str("    fn eq(&self, _other: &Self) -> bool {\n        true\n    }\n");
        } else {
            let body = compared
                .iter()
                .map(|ident| format!("self.{0} == other.{0}", ident))
                .collect::<Vec<_>>()
                .join(" && ");
            text.push_str("    fn eq(&self, other: &Self) -> bool {\n");
            text.push_str(&format!("        {}\n", body));
            text.push_str("    }\n");
        }
        text.push_str("}\n");

        Ok(text)
    }

    fn visit_union(&mut self, record: &RecordType) {
        tracing::debug!(name = ?record.name, "union is not translated");
    }

    fn visit_enum(&mut self, enum_type: &EnumType) -> BindgenResult<()> {
        let Some(enumerators) = &enum_type.enumerators else {
            return Ok(());
        };

        let mut text = String::new();
        let mut value: i32 = 0;
        for (i, enumerator) in enumerators.iter().enumerate() {
            let next = match enumerator.value {
                Some(explicit) => i32::try_from(explicit).ok(),
                None if i == 0 => Some(0),
                None => value.checked_add(1),
            };
            value = next.ok_or_else(|| {
                BindgenError::unsupported(
                    format!("value of enumerator `{}` does not fit in `c_int`", enumerator.name),
                    enumerator.span,
                )
            })?;
            if self.claim(&enumerator.name) {
                text.push_str(&format!("pub const {}: c_int = {};\n", enumerator.name, value));
            }
        }

        if !text.is_empty() {
            self.emit_unit(&text);
        }
        Ok(())
    }

    fn visit_typedef(&mut self, typedef: &TypedefDecl) -> BindgenResult<()> {
        if !self.config.has_prefix(&typedef.name) {
            return Ok(());
        }

        self.visit_tags(&typedef.ty)?;

        let target = self.mapper.map(&typedef.ty)?.to_string();
        if target == typedef.name {
            return Ok(());
        }
        if self.claim(&typedef.name) {
            let text = format!("pub type {} = {};\n", typedef.name, target);
            self.emit_unit(&text);
        }
        Ok(())
    }

    fn visit_function(&mut self, func: &FuncDecl) -> BindgenResult<()> {
        let name = &func.name;
        if !self.config.has_prefix(name) {
            return Ok(());
        }
        if self.config.is_denied_function(name) {
            tracing::debug!(%name, "function is denylisted");
            return Ok(());
        }
        if func.ty.params.variadic {
            return Err(BindgenError::unsupported(
                format!("variadic function `{}` cannot be wrapped", name),
                func.span,
            ));
        }
        if func.has_body {
            tracing::warn!(%name, "wrapping a function defined in the header; it may not be exported");
        }

        let ret = self.mapper.map(&func.ty.return_type)?;
        let params = func
            .ty
            .params
            .effective()
            .iter()
            .map(|param| self.mapper.map(&param.ty))
            .collect::<BindgenResult<Vec<_>>>()?;

        if self.claim(name) {
            let text = render_wrapper(name, &ret, &params);
            self.emit_unit(&text);
        }
        Ok(())
    }
}

fn render_wrapper(name: &str, ret: &RustType, params: &[RustType]) -> String {
    let args: Vec<String> = (0..params.len()).map(|i| format!("arg{}", i)).collect();

    let signature = FnPointer::new(ret, params, false);

    let mut text = format!("pub unsafe fn {}(lib: &Library", name);
    for (arg, ty) in args.iter().zip(params) {
        text.push_str(&format!(", {}: {}", arg, ty));
    }
    text.push_str(&format!(") -> Result<{}, libloading::Error> {{\n", ret));
    text.push_str("    unsafe {\n");
    text.push_str(&format!(
        "        let symbol: Symbol<{}> = lib.get(b\"{}\\0\")?;\n",
        signature, name
    ));
    text.push_str(&format!("        Ok(symbol({}))\n", args.join(", ")));
    text.push_str("    }\n}\n");
    text
}

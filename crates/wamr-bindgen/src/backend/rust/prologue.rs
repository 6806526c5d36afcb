//! Fixed text at the top of every generated module

use std::path::Path;

use crate::config::{BindgenConfig, LibraryPaths};

/// Marker that tells readers and tools not to touch the file
pub const GENERATED_MARKER: &str = "// It is a generated file. DO NOT EDIT.";

const LINT_ALLOWANCES: &str = "#![allow(
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    dead_code,
    unused_imports,
    clippy::missing_safety_doc
)]
";

const IMPORTS: &str = "use std::os::raw::{c_char, c_int, c_void};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
";

/// Render the prologue; generated items are appended after it
pub fn render(config: &BindgenConfig) -> String {
    let mut out = String::new();

    let header = config
        .header
        .file_name()
        .map_or_else(|| config.header.display().to_string(), |name| name.to_string_lossy().into_owned());
    out.push_str(&format!("//! Raw bindings to `{}`.\n", header));
    out.push_str("//!\n");
    out.push_str("//! Call [`load`] once and pass the returned [`Library`] to every wrapper.\n");

    out.push_str("//\n");
    for line in &config.prologue.banner {
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str(&format!("// {}\n", line));
        }
    }
    out.push_str("//\n");
    out.push_str(GENERATED_MARKER);
    out.push_str("\n//\n\n");

    out.push_str(LINT_ALLOWANCES);
    out.push('\n');
    out.push_str(IMPORTS);
    out.push('\n');
    out.push_str(&render_loader(&config.library, &config.checkout));

    let extra = config.prologue.extra.trim();
    if !extra.is_empty() {
        out.push('\n');
        out.push_str(extra);
        out.push('\n');
    }

    out
}

fn render_loader(library: &LibraryPaths, checkout: &Path) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "/// Location of the native library inside a `{}` checkout\n",
        checkout.display()
    ));
    out.push_str("pub fn library_path(checkout: &Path) -> PathBuf {\n");
    for (os, relative) in [
        ("linux", &library.linux),
        ("windows", &library.windows),
        ("macos", &library.macos),
    ] {
        out.push_str(&format!("    #[cfg(target_os = \"{}\")]\n", os));
        out.push_str(&format!("    let relative = {:?};\n", relative));
    }
    out.push_str(
        "    #[cfg(not(any(target_os = \"linux\", target_os = \"windows\", target_os = \"macos\")))]\n",
    );
    out.push_str("    compile_error!(\"unsupported target platform\");\n");
    out.push_str("    checkout.join(relative)\n");
    out.push_str("}\n\n");

    out.push_str("/// Load the native library built inside `checkout`.\n");
    out.push_str("///\n");
    out.push_str("/// # Safety\n");
    out.push_str("///\n");
    out.push_str("/// Loading runs the library's initialisation routines.\n");
    out.push_str("pub unsafe fn load(checkout: &Path) -> Result<Library, libloading::Error> {\n");
    out.push_str("    unsafe { Library::new(library_path(checkout)) }\n");
    out.push_str("}\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prologue_sections_in_order() {
        let config = BindgenConfig::wamr();
        let text = render(&config);

        let doc = text.find("//! Raw bindings to `wasm_c_api.h`.").unwrap();
        let banner = text.find("// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception").unwrap();
        let marker = text.find(GENERATED_MARKER).unwrap();
        let allow = text.find("#![allow(").unwrap();
        let imports = text.find("use libloading::{Library, Symbol};").unwrap();
        let loader = text.find("pub unsafe fn load(checkout: &Path)").unwrap();
        let extra = text.find("pub struct wasm_val_t").unwrap();

        assert!(doc < banner);
        assert!(banner < marker);
        assert!(marker < allow);
        assert!(allow < imports);
        assert!(imports < loader);
        assert!(loader < extra);
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_library_paths_per_platform() {
        let text = render(&BindgenConfig::wamr());
        assert!(text.contains(
            "    #[cfg(target_os = \"linux\")]\n    let relative = \"product-mini/platforms/linux/build/libiwasm.so\";\n"
        ));
        assert!(text.contains("let relative = \"product-mini/platforms/windows/build/iwasm.dll\";"));
        assert!(text.contains("let relative = \"product-mini/platforms/darwin/build/libiwasm.dylib\";"));
        assert!(text.contains("compile_error!"));
    }

    #[test]
    fn test_empty_extra_and_banner() {
        let mut config = BindgenConfig::wamr();
        config.prologue.banner.clear();
        config.prologue.extra.clear();
        let text = render(&config);
        assert!(!text.contains("wasm_val_t"));
        assert!(!text.contains("SPDX"));
        assert!(text.ends_with("    unsafe { Library::new(library_path(checkout)) }\n}\n"));
    }
}

//! Package recipe generation.
//!
//! The package manager consumes a generated `conanfile.py` placed in the
//! build directory. It carries the resolved requirements with their
//! transitivity and override flags, the per-package linkage options, and the
//! packaging layout used when the target itself is exported.

use std::path::Path;

use crate::builder::discovery::INCLUDE_DIR;
use crate::core::dependency::{Linkage, ResolvedDependency};
use crate::core::target::Target;
use crate::resolver::dependencies::{linkage_settings, LinkagePolicy};
use crate::util::fs::relative_posix;

/// File name of the generated recipe.
pub const RECIPE_NAME: &str = "conanfile.py";

/// Package name derived from a target; the package manager requires lowercase.
pub fn package_name(target: &Target) -> String {
    target.short_name().to_ascii_lowercase()
}

/// `name/version` reference of the target's own package.
pub fn package_reference(target: &Target) -> String {
    format!("{}/{}", package_name(target), target.version)
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn py_str(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Everything the recipe is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct RecipeInput<'a> {
    pub target: &'a Target,
    pub dependencies: &'a [ResolvedDependency],
    pub policy: LinkagePolicy,
    pub target_dir: &'a Path,
    pub build_dir: &'a Path,
}

fn configure_body(input: &RecipeInput<'_>) -> Vec<String> {
    let forced = if input.target.static_linkage {
        Some(Linkage::Static)
    } else {
        match input.policy {
            LinkagePolicy::Force(linkage) => Some(linkage),
            LinkagePolicy::PerDependency => None,
        }
    };

    match forced {
        Some(linkage) => vec![format!(
            "self.options[\"*\"].shared = {}",
            py_bool(!linkage.is_static())
        )],
        None => linkage_settings(input.dependencies)
            .into_iter()
            .map(|(package, linkage)| {
                format!(
                    "self.options[{}].shared = {}",
                    py_str(&package),
                    py_bool(!linkage.is_static())
                )
            })
            .collect(),
    }
}

fn requirements_body(input: &RecipeInput<'_>) -> Vec<String> {
    input
        .dependencies
        .iter()
        .map(|dep| {
            let mut line = format!(
                "self.requires({}, transitive_headers={}, transitive_libs={}",
                py_str(&dep.reference()),
                py_bool(dep.transitive),
                py_bool(dep.transitive)
            );
            if dep.r#override {
                line.push_str(", override=True");
            }
            line.push(')');
            line
        })
        .collect()
}

fn method(out: &mut String, name: &str, body: &[String]) {
    out.push_str(&format!("\n    def {}(self):\n", name));
    if body.is_empty() {
        out.push_str("        pass\n");
    }
    for line in body {
        out.push_str(&format!("        {}\n", line));
    }
}

/// Render `conanfile.py`.
pub fn render_recipe(input: &RecipeInput<'_>) -> String {
    let target = input.target;
    let include_dir = relative_posix(input.build_dir, &input.target_dir.join(INCLUDE_DIR));

    let mut out = String::new();
    out.push_str("import os\n\n");
    out.push_str("from conan import ConanFile\n");
    out.push_str("from conan.tools.files import copy\n\n\n");
    out.push_str("class TargetRecipe(ConanFile):\n");
    out.push_str(&format!("    name = {}\n", py_str(&package_name(target))));
    out.push_str(&format!("    version = {}\n", py_str(&target.version)));
    out.push_str("    settings = \"os\", \"compiler\", \"build_type\", \"arch\"\n");
    out.push_str("    generators = \"CMakeToolchain\", \"CMakeDeps\"\n");

    method(&mut out, "configure", &configure_body(input));
    method(&mut out, "requirements", &requirements_body(input));

    let mut package = vec![
        format!(
            "include = os.path.join(self.recipe_folder, {})",
            py_str(&include_dir)
        ),
        "for pattern in (\"*.h\", \"*.hpp\", \"*.inl\", \"*.ixx\", \"*.cppm\"):".to_string(),
        "    copy(self, pattern, src=include, dst=os.path.join(self.package_folder, \"include\"))"
            .to_string(),
        format!(
            "copy(self, {}, src=self.build_folder, dst=os.path.join(self.package_folder, \"include\"))",
            py_str(&format!("{}.hpp", target.short_name()))
        ),
    ];
    if target.kind.is_library() {
        package.push(
            "for pattern in (\"*.a\", \"*.lib\", \"*.so*\", \"*.dylib\"):".to_string(),
        );
        package.push(
            "    copy(self, pattern, src=self.build_folder, dst=os.path.join(self.package_folder, \"lib\"), keep_path=False)"
                .to_string(),
        );
        package.push(
            "copy(self, \"*.dll\", src=self.build_folder, dst=os.path.join(self.package_folder, \"bin\"), keep_path=False)"
                .to_string(),
        );
    }
    method(&mut out, "package", &package);

    let mut info = vec!["self.cpp_info.includedirs = [\"include\"]".to_string()];
    if target.kind.is_library() {
        info.push("self.cpp_info.libdirs = [\"lib\"]".to_string());
        info.push("self.cpp_info.bindirs = [\"bin\"]".to_string());
        info.push(format!(
            "self.cpp_info.libs = [{}]",
            py_str(target.short_name())
        ));
    } else {
        info.push("self.cpp_info.libdirs = []".to_string());
        info.push("self.cpp_info.bindirs = []".to_string());
    }
    method(&mut out, "package_info", &info);

    out
}

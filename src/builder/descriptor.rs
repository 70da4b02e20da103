//! CMakeLists.txt generation.
//!
//! The descriptor lives in the target's build directory. Every path it
//! mentions is relative to that directory with `/` separators, so the text
//! depends only on the target record, the discovered files and the declared
//! packages.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::builder::declared::DeclaredPackages;
use crate::builder::discovery::{FileSets, INCLUDE_DIR, SOURCE_DIR};
use crate::builder::umbrella::private_header_name;
use crate::core::target::{Target, TargetType};
use crate::util::fs::relative_posix;

/// File name of the generated build descriptor.
pub const DESCRIPTOR_NAME: &str = "CMakeLists.txt";

const MIN_CMAKE_VERSION: &str = "3.5";
const MIN_CMAKE_VERSION_MODULES: &str = "3.28";
const CXX_STANDARD: u32 = 17;
const CXX_STANDARD_MODULES: u32 = 20;

/// Everything the descriptor is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorInput<'a> {
    pub target: &'a Target,
    pub files: &'a FileSets,
    pub declared: &'a DeclaredPackages,
    pub target_dir: &'a Path,
    pub build_dir: &'a Path,
}

impl DescriptorInput<'_> {
    fn rel(&self, path: &Path) -> String {
        relative_posix(self.build_dir, path)
    }

    fn rel_all(&self, paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| self.rel(p)).collect()
    }

    /// Module units are only attached to concrete targets.
    fn uses_modules(&self) -> bool {
        !self.target.is_interface() && self.files.has_modules()
    }
}

/// Leading numeric `major[.minor[.patch[.tweak]]]` accepted by `project(VERSION)`.
fn cmake_version(version: &str) -> Option<String> {
    let parts: Vec<&str> = version
        .split('.')
        .take(4)
        .map_while(|part| {
            let digits: &str = &part[..part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len())];
            (!digits.is_empty()).then_some(digits)
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("."))
}

fn command(name: &str, args: &[String]) -> String {
    format!("{}({})", name, args.join(" "))
}

fn multiline(name: &str, head: &str, items: &[String]) -> String {
    let mut out = format!("{}({}", name, head);
    for item in items {
        out.push_str("\n\t");
        out.push_str(item);
    }
    out.push_str("\n)");
    out
}

fn binary_declaration(input: &DescriptorInput<'_>) -> String {
    let name = input.target.short_name();
    let sources = input.rel_all(&input.files.sources);
    match input.target.kind {
        TargetType::Application => multiline("add_executable", name, &sources),
        TargetType::Library => multiline("add_library", name, &sources),
        TargetType::StaticLibrary => multiline("add_library", &format!("{} STATIC", name), &sources),
        TargetType::SharedLibrary | TargetType::Plugin => {
            multiline("add_library", &format!("{} SHARED", name), &sources)
        }
        TargetType::Interface => format!("add_library({} INTERFACE)", name),
    }
}

fn module_file_set(input: &DescriptorInput<'_>, keyword: &str, set: &str, files: &[PathBuf]) -> Option<String> {
    if files.is_empty() {
        return None;
    }

    let base_dirs: BTreeSet<String> = files
        .iter()
        .filter_map(|f| f.parent())
        .map(|dir| input.rel(dir))
        .collect();

    let mut items = vec![format!("{} FILE_SET {} TYPE CXX_MODULES", keyword, set)];
    items.push("BASE_DIRS".to_string());
    items.extend(base_dirs.into_iter().map(|d| format!("\t{}", d)));
    items.push("FILES".to_string());
    items.extend(input.rel_all(files).into_iter().map(|f| format!("\t{}", f)));

    Some(multiline("target_sources", input.target.short_name(), &items))
}

/// Render the CMakeLists.txt text.
pub fn render_cmake_lists(input: &DescriptorInput<'_>) -> String {
    let target = input.target;
    let name = target.short_name();
    let interface = target.is_interface();
    let modules = input.uses_modules();
    let visibility = if interface { "INTERFACE" } else { "PUBLIC" };

    if target.is_interface() && input.files.has_modules() {
        tracing::warn!(
            "module units under `{}` are ignored for interface targets",
            target.name
        );
    }

    let mut lines = vec![
        format!(
            "cmake_minimum_required(VERSION {})",
            if modules { MIN_CMAKE_VERSION_MODULES } else { MIN_CMAKE_VERSION }
        ),
        match cmake_version(&target.version) {
            Some(version) => format!("project({} VERSION {})", name, version),
            None => format!("project({})", name),
        },
    ];

    for package in &input.declared.find_packages {
        lines.push(format!("find_package({} REQUIRED)", package));
    }

    lines.push(binary_declaration(input));

    if modules {
        lines.extend(module_file_set(
            input,
            "PUBLIC",
            "public_modules",
            &input.files.module_interfaces,
        ));
        lines.extend(module_file_set(
            input,
            "PRIVATE",
            "private_modules",
            &input.files.module_implementations,
        ));
    } else if !interface {
        lines.push(format!(
            "target_precompile_headers({} PRIVATE {})",
            name,
            private_header_name(target)
        ));
    }

    if !input.declared.link_targets.is_empty() {
        let mut args = vec![name.to_string(), visibility.to_string()];
        args.extend(input.declared.link_targets.iter().cloned());
        lines.push(command("target_link_libraries", &args));
    }

    lines.push(command(
        "target_include_directories",
        &[
            name.to_string(),
            visibility.to_string(),
            ".".to_string(),
            input.rel(&input.target_dir.join(INCLUDE_DIR)),
        ],
    ));

    let standard = if modules { CXX_STANDARD_MODULES } else { CXX_STANDARD };
    if interface {
        lines.push(format!(
            "target_compile_features({} INTERFACE cxx_std_{})",
            name, standard
        ));
    } else {
        lines.push(command(
            "target_include_directories",
            &[
                name.to_string(),
                "PRIVATE".to_string(),
                input.rel(&input.target_dir.join(SOURCE_DIR)),
            ],
        ));
        lines.push(multiline(
            "set_target_properties",
            &format!("{} PROPERTIES", name),
            &[
                format!("CXX_STANDARD {}", standard),
                "CXX_STANDARD_REQUIRED YES".to_string(),
                "CXX_EXTENSIONS NO".to_string(),
            ],
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

//! Umbrella headers.
//!
//! Every target gets two generated headers in its build directory:
//! `<Short>.hpp` collects the public surface (defines, external includes and
//! optionally the target's own public headers), and `<Short>.pch.hpp` is the
//! private aggregate fed to the precompiled-header step.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::discovery::{FileSets, INCLUDE_DIR, SOURCE_DIR};
use crate::core::target::Target;
use crate::util::fs::relative_posix;

/// File name of the public umbrella header.
pub fn public_header_name(target: &Target) -> String {
    format!("{}.hpp", target.short_name())
}

/// File name of the private (precompiled) umbrella header.
pub fn private_header_name(target: &Target) -> String {
    format!("{}.pch.hpp", target.short_name())
}

/// Accumulates blank-line separated blocks.
struct HeaderWriter {
    out: String,
}

impl HeaderWriter {
    fn new() -> Self {
        HeaderWriter {
            out: String::from("#pragma once\n"),
        }
    }

    fn block(&mut self, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        self.out.push('\n');
        for line in lines {
            self.out.push_str(&line);
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn define_lines<'a>(maps: impl IntoIterator<Item = &'a BTreeMap<String, String>>) -> Vec<String> {
    let mut lines = Vec::new();
    for map in maps {
        for (key, value) in map {
            let mut line = format!("#define {}", key);
            if !value.is_empty() {
                line.push(' ');
                line.push_str(value);
            }
            lines.push(line);
        }
    }
    lines
}

fn external_lines<'a>(lists: impl IntoIterator<Item = &'a Vec<String>>) -> Vec<String> {
    lists
        .into_iter()
        .flatten()
        .map(|header| format!("#include <{}>", header))
        .collect()
}

fn local_lines(base: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| format!("#include \"{}\"", relative_posix(base, path)))
        .collect()
}

/// Render `<Short>.hpp`.
pub fn render_public_header(target: &Target, files: &FileSets, target_dir: &Path) -> String {
    let include_dir = target_dir.join(INCLUDE_DIR);
    let mut w = HeaderWriter::new();

    w.block(define_lines([&target.global_defines, &target.public_defines]));
    w.block(external_lines([&target.global_headers, &target.public_includes]));

    if target.precompile_public_headers {
        w.block(local_lines(&include_dir, &files.public_headers));
        w.block(local_lines(&include_dir, &files.public_inline_headers));
    }

    w.finish()
}

/// Render `<Short>.pch.hpp`.
pub fn render_private_header(target: &Target, files: &FileSets, target_dir: &Path) -> String {
    let source_dir = target_dir.join(SOURCE_DIR);
    let mut w = HeaderWriter::new();

    if target.precompile_public_headers {
        w.block(define_lines([&target.private_defines]));
    } else {
        w.block(define_lines([&target.private_defines, &target.public_defines]));
    }

    w.block(external_lines([&target.private_includes]));

    if target.precompile_public_headers {
        w.block(vec![format!("#include <{}>", public_header_name(target))]);
    } else {
        w.block(external_lines([&target.public_includes]));
    }

    if target.precompile_private_headers {
        w.block(local_lines(&source_dir, &files.private_headers));
        w.block(local_lines(&source_dir, &files.private_inline_headers));
    }

    w.finish()
}

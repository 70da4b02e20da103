//! CLI integration tests for Keel.
//!
//! Conan and CMake are replaced by small shell scripts configured through the
//! project's `.keel/config.toml`, so these tests need neither tool installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the keel binary command, isolated from the user's global config.
fn keel(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("keel").unwrap();
    cmd.env("HOME", home);
    cmd
}

/// Create `<tmp>/Game/Game.project` and return the project directory.
fn project(tmp: &TempDir, yaml: &str) -> PathBuf {
    let root = tmp.path().join("Game");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("Game.project"), yaml).unwrap();
    root
}

const LIBRARY_PROJECT: &str = "\
Version: 1.4.0
Targets:
  - Name: Engine/Core
    Type: StaticLibrary
    PublicDependencies:
      - zlib/1.2.11
";

#[cfg(unix)]
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Point `[tools]` at fake conan/cmake scripts; calls are appended to `calls.log`.
#[cfg(unix)]
fn fake_tools(tmp: &TempDir, root: &Path, conan_body: &str) -> PathBuf {
    let bin = tmp.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    let log = tmp.path().join("calls.log");

    let conan = script(
        &bin,
        "conan",
        &format!("echo \"conan $*\" >> '{}'\n{}", log.display(), conan_body),
    );
    let cmake = script(
        &bin,
        "cmake",
        &format!(
            "echo \"cmake $*\" >> '{}'\ncase \"$1\" in -S) touch CMakeCache.txt ;; esac",
            log.display()
        ),
    );

    fs::create_dir_all(root.join(".keel")).unwrap();
    fs::write(
        root.join(".keel/config.toml"),
        format!(
            "[tools]\nconan = \"{}\"\ncmake = \"{}\"\n",
            conan.display(),
            cmake.display()
        ),
    )
    .unwrap();
    log
}

// ============================================================================
// help
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    let tmp = TempDir::new().unwrap();
    keel(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate"))
        .stdout(predicate::str::contains("Build"))
        .stdout(predicate::str::contains("Package"));
}

#[test]
fn test_target_is_required() {
    let tmp = TempDir::new().unwrap();
    keel(tmp.path())
        .args(["Generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--Target"));
}

#[test]
fn test_invalid_linkage_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);

    keel(tmp.path())
        .args(["Generate", "--Target", "Core", "--Linkage", "Sometimes"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Static"));
}

// ============================================================================
// target resolution errors
// ============================================================================

#[test]
fn test_unknown_target_fails() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);

    keel(tmp.path())
        .args(["Generate", "--Target", "Renderer"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("target `Renderer` not found"));

    assert!(!root.join(".Build").exists());
}

#[test]
fn test_ambiguous_target_lists_candidates() {
    let tmp = TempDir::new().unwrap();
    let root = project(
        &tmp,
        "Targets:\n  - Name: Engine/Core\n  - Name: Tools/Core\n",
    );

    keel(tmp.path())
        .args(["Build", "--Target", "Core"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous"))
        .stderr(predicate::str::contains("Engine/Core, Tools/Core"));
}

#[test]
fn test_malformed_project_names_the_file() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, "Targets: [\n  - Name: Core\n");

    keel(tmp.path())
        .args(["Generate", "--Target", "Core"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed descriptor"))
        .stderr(predicate::str::contains("Game.project"));
}

#[test]
fn test_missing_project_fails() {
    let tmp = TempDir::new().unwrap();

    keel(tmp.path())
        .args(["Generate", "--Target", "Core", "--Project"])
        .arg(tmp.path().join("Nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("project not found"));
}

// ============================================================================
// pipeline with fake tools
// ============================================================================

#[cfg(unix)]
#[test]
fn test_generate_then_fresh() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);
    fs::create_dir_all(root.join("Engine/Core/Source")).unwrap();
    fs::write(root.join("Engine/Core/Source/Core.cpp"), "").unwrap();
    let log = fake_tools(&tmp, &root, "");

    keel(tmp.path())
        .args(["Generate", "--Target", "Core", "--Configuration", "Debug"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated Engine/Core"));

    let build_dir = root.join(".Build/Debug/Engine/Core");
    for name in ["CMakeLists.txt", "Core.hpp", "Core.pch.hpp", "conanfile.py", ".keel-generated"] {
        assert!(build_dir.join(name).is_file(), "missing {}", name);
    }

    let calls = fs::read_to_string(&log).unwrap();
    assert!(calls.contains("conan install conanfile.py --settings=build_type=Debug --build=missing"));
    assert!(calls.contains("cmake -S . -B . -DCMAKE_TOOLCHAIN_FILE=conan_toolchain.cmake"));

    keel(tmp.path())
        .args(["Generate", "--Target", "Core", "--Configuration", "Debug"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("Fresh Engine/Core"));
}

#[cfg(unix)]
#[test]
fn test_tool_failure_exits_non_zero() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);
    fake_tools(&tmp, &root, "exit 7");

    keel(tmp.path())
        .args(["Build", "--Target", "Engine/Core"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed with exit code 7"));

    assert!(!root.join(".Build/Release/Engine/Core/.keel-generated").exists());
}

#[cfg(unix)]
#[test]
fn test_build_copies_assets() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);
    fs::create_dir_all(root.join("Engine/Core/Assets/fonts")).unwrap();
    fs::write(root.join("Engine/Core/Assets/fonts/mono.ttf"), "ttf").unwrap();
    let log = fake_tools(&tmp, &root, "");

    keel(tmp.path())
        .args(["Build", "--Target", "Core"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .success();

    let build_dir = root.join(".Build/Release/Engine/Core");
    assert!(build_dir.join("Assets/fonts/mono.ttf").is_file());
    assert!(build_dir.join("assets.manifest").is_file());
    assert!(fs::read_to_string(&log)
        .unwrap()
        .contains("cmake --build . --config Release"));
}

#[cfg(unix)]
#[test]
fn test_deploy_without_remote_fails() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);
    let log = fake_tools(&tmp, &root, "");

    keel(tmp.path())
        .args(["Package", "--Target", "Core", "--Deploy"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote"));

    assert!(!log.exists());
}

#[cfg(unix)]
#[test]
fn test_package_uploads_to_remote() {
    let tmp = TempDir::new().unwrap();
    let root = project(&tmp, LIBRARY_PROJECT);
    let log = fake_tools(&tmp, &root, "");

    keel(tmp.path())
        .args(["Package", "--Target", "Core", "--Deploy", "--Remote", "team"])
        .arg("--Project")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("Uploaded core/1.4.0 to team"));

    let calls = fs::read_to_string(&log).unwrap();
    assert!(calls.contains("conan export-pkg conanfile.py --name=core --version=1.4.0"));
    assert!(calls.contains("conan upload core/1.4.0 --remote=team --confirm"));
}

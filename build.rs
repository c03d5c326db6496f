//! Build script for cef-embed
//!
//! Only does work when the `libcef` feature is enabled:
//! 1. Resolving the CEF binary distribution (`CEF_PATH` or `./cef`)
//! 2. Setting up linking for the CEF library

use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CEF_PATH");

    if env::var_os("CARGO_FEATURE_LIBCEF").is_none() {
        return;
    }

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let profile = env::var("PROFILE").unwrap_or_else(|_| "debug".to_string());
    let target = env::var("TARGET").expect("TARGET not set");

    let os = parse_target_os(&target);
    println!("cargo:warning=Linking libcef for {} ({})", target, profile);

    // Check for CEF path override
    let cef_path = env::var("CEF_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(&manifest_dir).join("cef"));

    if !check_cef_binaries(&cef_path, os) {
        println!(
            "cargo:warning=CEF binaries not found under {}. Set CEF_PATH to an extracted CEF binary distribution.",
            cef_path.display()
        );
    }

    setup_linking(&cef_path, os);
}

/// Maps a target triple to the OS name used by CEF distributions.
fn parse_target_os(target: &str) -> &'static str {
    if target.contains("windows") {
        "windows"
    } else if target.contains("apple") || target.contains("darwin") {
        "macos"
    } else {
        "linux"
    }
}

/// Check if the CEF library is present in the distribution directory.
fn check_cef_binaries(cef_path: &Path, os: &str) -> bool {
    let release_dir = cef_path.join("Release");
    match os {
        "windows" => release_dir.join("libcef.dll").exists() || release_dir.join("libcef.lib").exists(),
        "linux" => release_dir.join("libcef.so").exists(),
        "macos" => release_dir
            .join("Chromium Embedded Framework.framework")
            .exists(),
        _ => false,
    }
}

/// Emit the linker search path and library for the current OS.
fn setup_linking(cef_path: &Path, os: &str) {
    let release_dir = cef_path.join("Release");

    match os {
        "windows" => {
            println!("cargo:rustc-link-search=native={}", release_dir.display());
            println!("cargo:rustc-link-lib=dylib=libcef");
        }
        "linux" => {
            println!("cargo:rustc-link-search=native={}", release_dir.display());
            println!("cargo:rustc-link-lib=dylib=cef");
            // Allow the binary to find libcef.so next to itself
            println!("cargo:rustc-link-arg=-Wl,-rpath,$ORIGIN");
        }
        "macos" => {
            println!("cargo:rustc-link-search=framework={}", release_dir.display());
            println!("cargo:rustc-link-lib=framework=Chromium Embedded Framework");
        }
        _ => {}
    }
}

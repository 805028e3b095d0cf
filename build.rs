//! Build script for tabcheck - locates a system DuckDB library unless bundled

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DUCKDB_LIB_PATH");

    if cfg!(feature = "bundled") {
        return;
    }

    if env::var("SKIP_DUCKDB_DETECTION").is_ok() {
        println!("cargo:rustc-link-lib=duckdb");
        return;
    }

    match find_duckdb_library() {
        Some(lib_path) => {
            println!("cargo:rustc-link-search=native={}", lib_path.display());
            println!("cargo:rustc-link-lib=duckdb");
        }
        None => {
            eprintln!("DuckDB library not found.");
            eprintln!("Install libduckdb, set DUCKDB_LIB_PATH=/path/to/duckdb/lib,");
            eprintln!("or build with the bundled engine: cargo build --features bundled");
            panic!("DuckDB library not found");
        }
    }
}

fn find_duckdb_library() -> Option<PathBuf> {
    let from_env = env::var("DUCKDB_LIB_PATH").ok().map(PathBuf::from);

    from_env
        .into_iter()
        .chain(pkg_config_paths())
        .chain(standard_paths())
        .find(|path| has_duckdb_library(path))
}

fn pkg_config_paths() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        return Vec::new();
    }

    Command::new("pkg-config")
        .args(["--libs-only-L", "duckdb"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| {
            String::from_utf8_lossy(&output.stdout)
                .split_whitespace()
                .filter_map(|flag| flag.strip_prefix("-L"))
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

fn standard_paths() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "macos") {
        &["/opt/homebrew/lib", "/usr/local/lib", "/opt/local/lib"]
    } else if cfg!(target_os = "windows") {
        &["C:\\Program Files\\DuckDB\\lib", "C:\\duckdb\\lib"]
    } else {
        &["/usr/lib", "/usr/local/lib", "/lib", "/usr/lib/x86_64-linux-gnu", "/usr/lib64"]
    };
    paths.iter().map(PathBuf::from).collect()
}

fn has_duckdb_library(path: &Path) -> bool {
    let names: &[&str] = if cfg!(target_os = "windows") {
        &["duckdb.dll", "duckdb.lib"]
    } else if cfg!(target_os = "macos") {
        &["libduckdb.dylib", "libduckdb.a"]
    } else {
        &["libduckdb.so", "libduckdb.so.1", "libduckdb.a"]
    };
    names.iter().any(|name| path.join(name).exists())
}

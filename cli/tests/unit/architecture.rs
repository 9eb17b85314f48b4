//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! the domain stays pure and services only talk to ports.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src_dir(layer: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer)
}

/// Return `file:line` for every line in `layer` containing one of `forbidden`.
fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(&src_dir(layer)) {
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            if forbidden.iter().any(|f| line.contains(f)) {
                found.push(format!("{}:{}: {}", file.display(), i + 1, line.trim()));
            }
        }
    }
    found
}

#[test]
fn test_domain_performs_no_io() {
    let found = violations(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(found.is_empty(), "domain layer violations:\n{}", found.join("\n"));
}

#[test]
fn test_application_does_not_reach_into_outer_layers() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output"],
    );
    assert!(found.is_empty(), "application layer violations:\n{}", found.join("\n"));
}

#[test]
fn test_infra_does_not_depend_on_presentation() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra layer violations:\n{}", found.join("\n"));
}

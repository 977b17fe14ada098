//! Manifest parsing and validation.
//!
//! Parses pack.yaml and checks structural constraints before compilation:
//! - Pack name must be a valid namespace
//! - At least one function must be declared
//! - Function names must be valid function paths
//! - The `bs_dynamic/` prefix is reserved for synthesized functions

use super::manifest::Manifest;
use super::types::DYNAMIC_PREFIX;
use crate::error::{CompileError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+$").expect("valid namespace regex"));

static FUNCTION_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_.-]+(/[a-z0-9_.-]+)*$").expect("valid function path regex")
});

/// Whether `name` may be used as a pack namespace.
pub fn is_namespace(name: &str) -> bool {
    NAMESPACE.is_match(name) && !is_dot_segment(name)
}

/// Whether `name` may be used as a function path inside a namespace.
pub fn is_function_path(name: &str) -> bool {
    FUNCTION_PATH.is_match(name) && !name.split('/').any(is_dot_segment)
}

// `.` and `..` would resolve outside the pack directory.
fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a pack.yaml file from disk.
pub fn parse_manifest_file(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CompileError::Manifest(format!("failed to read {}: {}", path.display(), e)))?;
    parse_manifest(&content)
}

/// Parse a pack.yaml from a string.
pub fn parse_manifest(yaml: &str) -> Result<Manifest> {
    serde_yaml_ng::from_str(yaml).map_err(|e| CompileError::Manifest(format!("YAML parse error: {}", e)))
}

/// Validate a parsed manifest. Returns a list of errors (empty = valid).
pub fn validate_manifest(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if manifest.name.is_empty() {
        errors.push(ValidationError {
            message: "name must not be empty".to_string(),
        });
    } else if !is_namespace(&manifest.name) {
        errors.push(ValidationError {
            message: format!(
                "name '{}' is not a valid namespace (allowed: a-z 0-9 _ . -)",
                manifest.name
            ),
        });
    }

    if manifest.functions.is_empty() {
        errors.push(ValidationError {
            message: "pack declares no functions".to_string(),
        });
    }

    for (name, body) in &manifest.functions {
        if !is_function_path(name) {
            errors.push(ValidationError {
                message: format!("function '{}' is not a valid function path", name),
            });
        }
        if name.starts_with(DYNAMIC_PREFIX) {
            errors.push(ValidationError {
                message: format!(
                    "function '{}' uses the reserved prefix '{}'",
                    name, DYNAMIC_PREFIX
                ),
            });
        }
        if !body.is_sequence() {
            errors.push(ValidationError {
                message: format!("function '{}' must be a list of steps", name),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let yaml = r#"
name: example_pack
description: "Example"
functions:
  __load__:
    - tellraw: "loaded"
  whoami:
    - "say hi"
"#;
        let manifest = parse_manifest(yaml).unwrap();
        assert_eq!(manifest.name, "example_pack");
        let errors = validate_manifest(&manifest);
        assert!(
            errors.is_empty(),
            "unexpected errors: {:?}",
            errors.iter().map(|e| &e.message).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_functions_keep_declaration_order() {
        let manifest = parse_manifest("name: p\nfunctions:\n  zeta: []\n  alpha: []\n  mid: []\n").unwrap();
        let names: Vec<_> = manifest.functions.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_empty_name() {
        let manifest = parse_manifest("name: \"\"\nfunctions:\n  f: []\n").unwrap();
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.message.contains("name must not be empty")));
    }

    #[test]
    fn test_bad_namespace() {
        let manifest = parse_manifest("name: Example Pack\nfunctions:\n  f: []\n").unwrap();
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.message.contains("not a valid namespace")));
    }

    #[test]
    fn test_no_functions() {
        let manifest = parse_manifest("name: p\n").unwrap();
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.message.contains("no functions")));
    }

    #[test]
    fn test_bad_function_path() {
        let manifest = parse_manifest("name: p\nfunctions:\n  Bad/Name: []\n").unwrap();
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.message.contains("not a valid function path")));
    }

    #[test]
    fn test_nested_function_path_ok() {
        let manifest = parse_manifest("name: p\nfunctions:\n  util/greet: []\n").unwrap();
        assert!(validate_manifest(&manifest).is_empty());
    }

    #[test]
    fn test_reserved_prefix() {
        let manifest = parse_manifest("name: p\nfunctions:\n  bs_dynamic/1: []\n").unwrap();
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.message.contains("reserved prefix")));
    }

    #[test]
    fn test_scalar_body_flagged() {
        let manifest = parse_manifest("name: p\nfunctions:\n  f: say hi\n").unwrap();
        let errors = validate_manifest(&manifest);
        assert!(errors.iter().any(|e| e.message.contains("list of steps")));
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let result = parse_manifest("name: p\nfunctions:\n  f: [\"say a\"]\n  f: [\"say b\"]\n");
        match result {
            Err(CompileError::Manifest(msg)) => assert!(msg.contains("\"f\""), "message: {}", msg),
            other => panic!("expected a manifest error, got {:?}", other),
        }
    }

    #[test]
    fn test_distinct_functions_accepted() {
        let manifest = parse_manifest("name: p\nfunctions:\n  f: []\n  g: []\n").unwrap();
        assert_eq!(manifest.functions.len(), 2);
    }

    #[test]
    fn test_name_checks() {
        assert!(is_namespace("example_pack"));
        assert!(!is_namespace("../x"));
        assert!(!is_namespace(".."));
        assert!(is_namespace("v1.2"));
        assert!(is_function_path("bs_dynamic/12"));
        assert!(!is_function_path("../escape"));
        assert!(!is_function_path("a//b"));
        assert!(!is_function_path("util/./greet"));
        assert!(is_function_path("util/greet.v2"));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.yaml");
        std::fs::write(&path, "name: file_test\nfunctions:\n  f: []\n").unwrap();
        let manifest = parse_manifest_file(&path).unwrap();
        assert_eq!(manifest.name, "file_test");
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_manifest_file(Path::new("/nonexistent/pack.yaml"));
        assert!(matches!(result, Err(CompileError::Manifest(_))));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_manifest("not: [valid: yaml: {{");
        assert!(result.is_err());
    }
}

//! File and configuration loading for the CLI
//!
//! The core engine works on in-memory [`SourceFile`] records; this module
//! is the thin boundary that turns paths into records and back, and parses
//! mangle configuration from a JSON file.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MangleError, MangleResult};
use crate::{MangleConfig, SourceFile};

/// Map a path's extension onto a supported file kind
pub fn kind_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension().and_then(|e| e.to_str())?.to_ascii_lowercase();
    match extension.as_str() {
        "css" => Some("css"),
        "html" | "htm" | "xhtml" => Some("html"),
        "js" | "mjs" | "cjs" => Some("js"),
        _ => None,
    }
}

/// Read every given path into a source file record
///
/// Paths with an unrecognized extension are logged and skipped rather than
/// failing the whole run.
///
/// # Errors
/// - File read errors
pub fn read_source_files(paths: &[PathBuf]) -> MangleResult<Vec<(PathBuf, SourceFile)>> {
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(kind) = kind_for_path(path) else {
            log::warn!("skipping '{}': unrecognized file extension", path.display());
            continue;
        };
        let content = fs::read_to_string(path)
            .map_err(|e| MangleError::Io(format!("failed to read '{}': {}", path.display(), e)))?;
        entries.push((path.clone(), SourceFile::new(kind, &content)));
    }
    Ok(entries)
}

/// Write mangled records back to their paths
///
/// # Errors
/// - File write errors
pub fn write_source_files(entries: &[(PathBuf, SourceFile)]) -> MangleResult<()> {
    for (path, file) in entries {
        fs::write(path, &file.content)
            .map_err(|e| MangleError::Io(format!("failed to write '{}': {}", path.display(), e)))?;
    }
    Ok(())
}

/// Load mangle configuration blocks from a JSON file
///
/// The file should have the following structure:
/// ```json
/// {
///     "@metadata": { ... },
///     "classes": { "category": "classes", "patterns": ["cls-[a-zA-Z-_]+"] },
///     "variables": { "category": "css-variables", "patterns": ["[a-z-]+"] }
/// }
/// ```
/// Keys starting with `@` are ignored. A block that does not parse is
/// logged and skipped rather than failing the whole file.
///
/// # Errors
/// - File not found / read errors
/// - Invalid JSON
/// - Root value is not an object
pub fn load_config(path: &Path) -> MangleResult<Vec<MangleConfig>> {
    let content = fs::read_to_string(path)
        .map_err(|e| MangleError::Io(format!("failed to read '{}': {}", path.display(), e)))?;

    let json: Value = serde_json::from_str(&content).map_err(|e| {
        MangleError::Config(format!("failed to parse JSON from '{}': {}", path.display(), e))
    })?;

    let object = json.as_object().ok_or_else(|| {
        MangleError::Config(format!(
            "invalid config in '{}': root must be an object",
            path.display()
        ))
    })?;

    let mut configs = Vec::new();
    for (key, value) in object {
        if key.starts_with('@') {
            continue;
        }
        match serde_json::from_value::<MangleConfig>(value.clone()) {
            Ok(config) => configs.push(config),
            Err(e) => log::warn!("config block '{}' is invalid, skipping: {}", key, e),
        }
    }
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpressionCategory;

    #[test]
    fn test_kind_for_path() {
        assert_eq!(kind_for_path(Path::new("site/app.css")), Some("css"));
        assert_eq!(kind_for_path(Path::new("index.HTML")), Some("html"));
        assert_eq!(kind_for_path(Path::new("bundle.mjs")), Some("js"));
        assert_eq!(kind_for_path(Path::new("notes.txt")), None);
        assert_eq!(kind_for_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_config_blocks_parse_from_json() {
        let raw = serde_json::json!({
            "@metadata": { "comment": "ignored" },
            "classes": {
                "category": "classes",
                "patterns": ["cls-[a-z]+"],
                "mangle-prefix": "c-",
                "reserved-names": ["c-a"]
            },
            "variables": {
                "category": "css-variables",
                "patterns": ["[a-z-]+"]
            }
        });
        let object = raw.as_object().unwrap();
        let configs: Vec<MangleConfig> = object
            .iter()
            .filter(|(key, _)| !key.starts_with('@'))
            .map(|(_, value)| serde_json::from_value(value.clone()).unwrap())
            .collect();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].category, ExpressionCategory::Classes);
        assert_eq!(configs[0].mangle_prefix, "c-");
        assert_eq!(configs[0].reserved_names, vec!["c-a".to_string()]);
        assert_eq!(configs[1].category, ExpressionCategory::CssVariables);
        assert!(configs[1].reserved_names.is_empty());
    }
}

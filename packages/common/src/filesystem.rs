use crate::error::CommonError;
use crate::result::CommonResult;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default patterns used when a directory scan is configured without any
pub const DEFAULT_GLOB_PATTERNS: &[&str] = &["*.html"];

/// Recursively list the files under `dir` matching any of `patterns`.
///
/// Patterns without a `/` are matched against the file's base name, so
/// `*.html` finds templates at any depth. Patterns containing a `/` are
/// matched against the path relative to `dir`. An empty pattern list
/// matches every file.
///
/// Returned paths are relative to `dir`, sorted, and free of duplicates.
pub fn discover_files(dir: &Path, patterns: &[String]) -> CommonResult<Vec<PathBuf>> {
    let compiled = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| CommonError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<CommonResult<Vec<_>>>()?;

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut listings = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| CommonError::Walk {
            dir: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(dir) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };

        let base = entry.file_name().to_string_lossy();
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        let matched = compiled.is_empty()
            || compiled.iter().any(|pattern| {
                if pattern.as_str().contains('/') {
                    pattern.matches_with(&rel_str, options)
                } else {
                    pattern.matches_with(&base, options)
                }
            });

        if matched {
            tracing::debug!(path = %rel_str, "discovered file");
            listings.push(relative);
        }
    }

    listings.sort();
    listings.dedup();
    Ok(listings)
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

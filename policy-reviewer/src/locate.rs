//! Resource locator: pulls a `resource "<type>" "<name>" { ... }` block out of
//! plaintext Terraform files.
//!
//! This is not an HCL parser. The block is found with a literal header
//! pattern and closed with a brace depth counter; braces inside strings or
//! heredocs are counted like any other.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use regex::Regex;
use tracing::{debug, warn};

use crate::errors::LocateError;

/// Extension of the configuration files that are scanned.
pub const CONFIG_EXTENSION: &str = "tf";

/// A located resource definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlock {
    /// File the block was found in.
    pub file_path: PathBuf,
    /// Block text from the `resource` keyword through the closing `}`.
    pub text: String,
}

/// Result of scanning one text for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockScan<'a> {
    Found(&'a str),
    Absent,
    /// Header matched but the braces never balance before end of text.
    Unbalanced,
}

/// Header pattern for a resource; `resource_type` and `name` are matched literally.
///
/// # Errors
/// Returns [`LocateError::Pattern`] if the regex cannot be compiled.
pub fn block_pattern(resource_type: &str, name: &str) -> Result<Regex, LocateError> {
    let pattern = format!(
        r#"\bresource\s+"{}"\s+"{}"\s*\{{"#,
        regex::escape(resource_type),
        regex::escape(name)
    );
    Ok(Regex::new(&pattern)?)
}

/// Finds the first header match in `content` and returns the brace-balanced block.
pub fn extract_block<'a>(content: &'a str, pattern: &Regex) -> BlockScan<'a> {
    let Some(m) = pattern.find(content) else {
        return BlockScan::Absent;
    };

    // The pattern ends with the opening brace.
    let open = m.end() - 1;
    let mut depth: usize = 0;

    for (offset, ch) in content[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = open + offset + ch.len_utf8();
                    return BlockScan::Found(&content[m.start()..end]);
                }
            }
            _ => {}
        }
    }

    BlockScan::Unbalanced
}

/// Lists `*.tf` files directly inside `dir`, sorted by path.
///
/// # Errors
/// Returns [`LocateError::ReadDir`] if the directory cannot be listed.
pub fn config_files(dir: &Path) -> Result<Vec<PathBuf>, LocateError> {
    let entries = fs::read_dir(dir).map_err(|source| LocateError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|p| p.is_file())
        .filter(|p| p.extension().is_some_and(|ext| ext == CONFIG_EXTENSION))
        .collect();

    files.sort();
    Ok(files)
}

/// Locates the definition of `resource_type.name` in the `.tf` files of `dir`.
///
/// First match wins, files are visited in sorted order. Unreadable files and
/// files where the block is unbalanced are logged and skipped.
pub fn locate(resource_type: &str, name: &str, dir: &Path) -> Option<ResourceBlock> {
    let t0 = Instant::now();
    let resource = format!("{resource_type}.{name}");

    let pattern = match block_pattern(resource_type, name) {
        Ok(p) => p,
        Err(e) => {
            warn!(%resource, error = %e, "cannot build block pattern");
            return None;
        }
    };

    let files = match config_files(dir) {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "resource lookup skipped");
            return None;
        }
    };

    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) => {
                let e = LocateError::ReadFile { path, source };
                warn!(error = %e, "skipping configuration file");
                continue;
            }
        };

        match extract_block(&content, &pattern) {
            BlockScan::Found(text) => {
                debug!(
                    %resource,
                    file = %path.display(),
                    bytes = text.len(),
                    "located resource block ({} ms)",
                    t0.elapsed().as_millis()
                );
                return Some(ResourceBlock {
                    file_path: path,
                    text: text.to_string(),
                });
            }
            BlockScan::Absent => {}
            BlockScan::Unbalanced => {
                let e = LocateError::UnbalancedBraces {
                    path,
                    resource: resource.clone(),
                };
                warn!(error = %e, "treating resource as not found in this file");
            }
        }
    }

    debug!(%resource, dir = %dir.display(), "resource block not found");
    None
}

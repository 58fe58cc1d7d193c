//! URL path to filesystem path resolution and target classification.

use std::fs;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::errors::ServeError;

/// Dispatch classification of a request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Missing,
    Directory,
    Markdown,
    Other,
}

/// A resolved request target. Built fresh per request and discarded after
/// the response is written.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// The URL path as requested (undecoded), used for building links.
    pub requested: String,
    /// Absolute filesystem path under the configured root.
    pub path: PathBuf,
    pub kind: TargetKind,
}

/// Resolve a URL path against the configured root and classify it.
///
/// The path is percent-decoded and lexically normalized before joining;
/// any `..` that would climb above the root classifies the target as
/// `Missing` rather than escaping the tree. With `raw` set, a `.md` file is
/// classified `Other` so its bytes are served unmodified.
pub fn resolve(root: &Path, url_path: &str, raw: bool) -> Result<ResolvedTarget, ServeError> {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();

    let mut relative = PathBuf::new();
    for component in Path::new(decoded.as_ref()).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::ParentDir => {
                // Climbing above the root is treated as a missing path.
                if !relative.pop() {
                    log::warn!("path traversal attempt rejected: {}", url_path);
                    return Ok(missing(url_path, root.to_path_buf()));
                }
            }
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) => {
                return Ok(missing(url_path, root.to_path_buf()));
            }
        }
    }

    let path = root.join(&relative);
    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(missing(url_path, path));
        }
        Err(e) => return Err(ServeError::from(e)),
    };

    let kind = if metadata.is_dir() {
        TargetKind::Directory
    } else if is_markdown(&path) && !raw {
        TargetKind::Markdown
    } else {
        TargetKind::Other
    };

    Ok(ResolvedTarget {
        requested: url_path.to_string(),
        path,
        kind,
    })
}

fn missing(url_path: &str, path: PathBuf) -> ResolvedTarget {
    ResolvedTarget {
        requested: url_path.to_string(),
        path,
        kind: TargetKind::Missing,
    }
}

/// Check if a file is markdown
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "md")
        .unwrap_or(false)
}

//! Directory listing emitter.
//!
//! Emits the embedded Chromium-style listing shell followed by inline
//! `<script>` calls, one `addRow(...)` per entry, matching the browser
//! auto-index wire contract. Sorting happens client-side; the server
//! preserves filesystem enumeration order, directories first.

use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::assets;
use crate::errors::ServeError;
use crate::utils::escape_js;

/// Query-escape set: everything but unreserved characters, with space
/// becoming `%20` rather than `+`.
const NAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One filesystem child of the listed directory.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub encoded_name: String,
    pub is_dir: bool,
    pub size_bytes: u64,
    pub size_display: String,
    pub mtime_unix: i64,
    pub mtime_display: String,
}

/// Render the full listing document for `dir`.
///
/// `host` and `request_path` form the display label in the page header.
/// Enumeration failure is an error; an unreadable directory never renders
/// as an empty table.
pub fn render_listing(
    dir: &Path,
    root: &Path,
    host: &str,
    request_path: &str,
) -> Result<String, ServeError> {
    let (dirs, files) = enumerate(dir)?;

    let mut out = String::from(assets::LISTING_SHELL);
    out.push('\n');
    out.push_str(&format!(
        "<script>start(\"{}\");</script>\n",
        escape_js(&format!("{}{}", host, request_path))
    ));

    if dir != root {
        out.push_str("<script>addRow(\"..\",\"..\",1,0,\"0 B\", 0,\"\");</script>\n");
    }
    for entry in dirs.iter().chain(files.iter()) {
        push_row(&mut out, entry);
    }

    Ok(out)
}

/// Enumerate immediate children, partitioned into directories then files.
/// Filesystem enumeration order is preserved within each group.
pub fn enumerate(dir: &Path) -> Result<(Vec<DirEntry>, Vec<DirEntry>), ServeError> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("skipping entry without metadata in {:?}: {}", dir, e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        let encoded_name = utf8_percent_encode(&name, NAME_ESCAPE).to_string();
        let mtime_unix = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        if metadata.is_dir() {
            dirs.push(DirEntry {
                name,
                encoded_name,
                is_dir: true,
                size_bytes: 0,
                size_display: "0 B".to_string(),
                mtime_unix,
                mtime_display: format_mtime(mtime_unix),
            });
        } else {
            let size_bytes = metadata.len();
            files.push(DirEntry {
                name,
                encoded_name,
                is_dir: false,
                size_bytes,
                size_display: human_size(size_bytes),
                mtime_unix,
                mtime_display: format_mtime(mtime_unix),
            });
        }
    }

    Ok((dirs, files))
}

fn push_row(out: &mut String, entry: &DirEntry) {
    out.push_str(&format!(
        "<script>addRow(\"{}\",\"{}\",{},{},\"{}\", {},\"{}\");</script>\n",
        escape_js(&entry.name),
        entry.encoded_name,
        if entry.is_dir { 1 } else { 0 },
        entry.size_bytes,
        entry.size_display,
        entry.mtime_unix,
        entry.mtime_display,
    ));
}

/// Human-readable size: divide by 1024 while the value exceeds 1000, two
/// decimal places, units B through T.
pub fn human_size(size: u64) -> String {
    const UNITS: [char; 5] = ['B', 'K', 'M', 'G', 'T'];
    let mut value = size as f64;
    let mut unit = 0usize;
    while value > 1000.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Format a Unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_mtime(unix_seconds: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from_unix_timestamp(unix_seconds)
        .ok()
        .and_then(|dt| dt.format(format).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("a.md")).unwrap();
        dir
    }

    #[test]
    fn directories_come_before_files() {
        let root = fixture();
        let (dirs, files) = enumerate(root.path()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].name, "sub");
        assert!(dirs[0].is_dir);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.is_dir));
    }

    #[test]
    fn root_listing_has_no_parent_row() {
        let root = fixture();
        let html = render_listing(root.path(), root.path(), "localhost", "/").unwrap();
        assert!(!html.contains("addRow(\"..\""));
    }

    #[test]
    fn subdirectory_listing_has_exactly_one_parent_row() {
        let root = fixture();
        let sub = root.path().join("sub");
        let html = render_listing(&sub, root.path(), "localhost", "/sub/").unwrap();
        assert_eq!(html.matches("addRow(\"..\"").count(), 1);
        // parent row comes before any real entry
        let parent = html.find("addRow(\"..\"").unwrap();
        assert!(html[..parent].find("addRow(").is_none());
    }

    #[test]
    fn header_label_is_host_plus_path() {
        let root = fixture();
        let html = render_listing(root.path(), root.path(), "example.com:8080", "/").unwrap();
        assert!(html.contains("start(\"example.com:8080/\")"));
    }

    #[test]
    fn names_with_spaces_encode_as_percent20() {
        let root = tempfile::tempdir().unwrap();
        File::create(root.path().join("my file.txt")).unwrap();
        let (_, files) = enumerate(root.path()).unwrap();
        assert_eq!(files[0].encoded_name, "my%20file.txt");
        assert!(!files[0].encoded_name.contains('+'));
    }

    #[test]
    fn hostile_names_cannot_break_the_script() {
        let root = tempfile::tempdir().unwrap();
        File::create(root.path().join("a\"b<c>.txt")).unwrap();
        let html = render_listing(root.path(), root.path(), "h", "/").unwrap();
        assert!(!html.contains("a\"b<c>"));
        assert!(html.contains("a\\\"b\\u003cc\\u003e.txt"));
    }

    #[test]
    fn human_size_uses_binary_units() {
        assert_eq!(human_size(0), "0.00 B");
        assert_eq!(human_size(1000), "1000.00 B");
        assert_eq!(human_size(2048), "2.00 K");
        assert_eq!(human_size(5 * 1024 * 1024), "5.00 M");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.00 G");
    }

    #[test]
    fn human_size_caps_at_terabytes() {
        let huge = 1024u64.pow(5) * 4096;
        assert!(human_size(huge).ends_with(" T"));
    }

    #[test]
    fn mtime_format_is_sortable_datetime() {
        assert_eq!(format_mtime(0), "1970-01-01 00:00:00");
        assert_eq!(format_mtime(1_700_000_000), "2023-11-14 22:13:20");
    }
}

//! Embedded static assets, compiled in at build time and served read-only.

/// Stylesheet for rendered Markdown pages, served at `/md.css`.
pub const MD_CSS: &str = include_str!("../assets/md.css");

/// Icon stylesheet for the metadata bar, served at `/fa.css`.
pub const FA_CSS: &str = include_str!("../assets/fa.css");

/// Chromium-style directory listing shell. Defines `addRow`, `sortTable`,
/// `start` and the drag-to-download handler; the emitter appends inline
/// `<script>` calls after it.
pub const LISTING_SHELL: &str = include_str!("../assets/listing.html");

/// Look up an embedded stylesheet by its fixed URL path.
pub fn stylesheet(url_path: &str) -> Option<&'static str> {
    match url_path {
        "/md.css" => Some(MD_CSS),
        "/fa.css" => Some(FA_CSS),
        _ => None,
    }
}

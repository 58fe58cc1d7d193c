//! mdserve - a static file server that renders Markdown files into styled
//! HTML pages and emits Chromium-style directory listings.
//!
//! Every request is handled independently: resolve the URL path under the
//! configured root, classify the target, then either list it, render it,
//! or stream its bytes.

pub mod assets;
pub mod config;
pub mod errors;
pub mod frontmatter;
pub mod handlers;
pub mod listing;
pub mod logger;
pub mod render;
pub mod resolver;
pub mod templates;
pub mod utils;

// Re-export commonly used items
pub use config::{AppState, ServerConfig};
pub use errors::ServeError;
pub use frontmatter::FrontMatter;
pub use resolver::{ResolvedTarget, TargetKind};

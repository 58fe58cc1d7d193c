//! Per-request dispatch: embedded stylesheets, directory listings, Markdown
//! rendering, or raw byte serving.

use std::io;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::assets;
use crate::config::AppState;
use crate::errors::ServeError;
use crate::listing;
use crate::render;
use crate::resolver::{self, TargetKind};

/// Build the application router. A single fallback route receives every
/// request; there is no per-path routing table.
pub fn router(state: AppState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

/// Top-level per-request decision. One shot, no state across requests.
pub async fn dispatch(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, ServeError> {
    let url_path = req.uri().path().to_string();

    // Fixed asset paths short-circuit path resolution entirely.
    if let Some(css) = assets::stylesheet(&url_path) {
        return Ok(([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response());
    }

    let raw = raw_mode(req.uri().query());
    let target = resolver::resolve(&state.config.root, &url_path, raw)?;

    match target.kind {
        TargetKind::Missing => {
            log::info!("404 {}", url_path);
            Err(ServeError::NotFound)
        }
        TargetKind::Directory => {
            let host = req
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            let html =
                listing::render_listing(&target.path, &state.config.root, host, &target.requested)?;
            log::info!("200 dir {}", url_path);
            Ok(Html(html).into_response())
        }
        TargetKind::Markdown => {
            let page = render::render_markdown_page(&target.path, &target.requested)?;
            log::info!("200 md {}", url_path);
            Ok((
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                page,
            )
                .into_response())
        }
        TargetKind::Other => {
            // ServeFile supplies content-type inference, range requests and
            // conditional GETs.
            log::info!("200 file {}", url_path);
            serve_file(&target.path, req).await
        }
    }
}

async fn serve_file(path: &std::path::Path, req: Request<Body>) -> Result<Response, ServeError> {
    let res = ServeFile::new(path)
        .oneshot(req)
        .await
        .map_err(|err| ServeError::Io(io::Error::new(io::ErrorKind::Other, err.to_string())))?;
    Ok(res.into_response())
}

/// Recognize the raw-mode query flag (`raw=1`).
fn raw_mode(query: Option<&str>) -> bool {
    query
        .map(|q| q.split('&').any(|pair| pair == "raw=1"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_recognizes_the_flag() {
        assert!(raw_mode(Some("raw=1")));
        assert!(raw_mode(Some("a=b&raw=1")));
        assert!(!raw_mode(Some("raw=0")));
        assert!(!raw_mode(Some("raw=11")));
        assert!(!raw_mode(None));
    }
}

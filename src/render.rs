//! Markdown rendering pipeline: front matter, metadata bar, body conversion
//! with heading ids and a table of contents, merged into the page template.

use std::collections::HashMap;
use std::path::Path;

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::errors::ServeError;
use crate::frontmatter::{self, FrontMatter};
use crate::templates;
use crate::utils::{escape_attr, escape_html};

/// Render a Markdown file into a complete HTML document.
///
/// `request_path` is the URL path of the request, used for the parent
/// directory and view-raw links in the metadata bar. Open and read failures
/// propagate; a missing or unreadable file never produces an empty render.
pub fn render_markdown_page(path: &Path, request_path: &str) -> Result<String, ServeError> {
    let raw = std::fs::read_to_string(path)?;
    let (front, body) = frontmatter::parse(&raw);

    let meta_html = metadata_bar(&front, request_path);
    let (body_html, toc_html) = render_body(body);
    let title = front.title.as_deref().unwrap_or("");

    let article = format!("{}{}", toc_html, body_html);
    Ok(templates::render_page(title, &meta_html, &article))
}

/// Fixed, non-configurable engine options. Bare-URL autolinking is the one
/// upstream extension pulldown-cmark does not offer.
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options
}

/// Convert Markdown to an HTML fragment plus a TOC fragment.
///
/// Two passes over the event stream: the first collects heading text and
/// assigns deduplicated slug ids, the second re-renders with those ids
/// injected into the heading tags.
pub fn render_body(content: &str) -> (String, String) {
    let options = markdown_options();

    // First pass: collect headings as (level, id, text)
    let mut headings: Vec<(u32, String, String)> = Vec::new();
    let mut in_heading: Option<u32> = None;
    let mut buf = String::new();
    let mut id_counts: HashMap<String, usize> = HashMap::new();

    for ev in Parser::new_ext(content, options) {
        match ev {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = Some(heading_level_to_u32(level));
                buf.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(lvl) = in_heading.take() {
                    let mut id = slugify(&buf);
                    if id.is_empty() {
                        id = format!("h{}", lvl);
                    }
                    let count = id_counts.entry(id.clone()).or_insert(0);
                    if *count > 0 {
                        id = format!("{}-{}", id, *count);
                    }
                    *count += 1;
                    headings.push((lvl, id, buf.clone()));
                }
                buf.clear();
            }
            Event::Text(t) | Event::Code(t) => {
                if in_heading.is_some() {
                    buf.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if in_heading.is_some() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    // Second pass: emit HTML with ids injected
    let mut out = String::new();
    let mut idx = 0usize;
    let mut level_stack: Vec<u32> = Vec::new();
    for ev in Parser::new_ext(content, options) {
        match ev {
            Event::Start(Tag::Heading { level, .. }) => {
                let lvl = heading_level_to_u32(level);
                let id = headings.get(idx).map(|(_, id, _)| id.as_str()).unwrap_or("");
                out.push_str(&format!("<h{} id=\"{}\">", lvl, escape_attr(id)));
                level_stack.push(lvl);
                idx += 1;
            }
            Event::End(TagEnd::Heading(_)) => {
                let lvl = level_stack.pop().unwrap_or(1);
                out.push_str(&format!("</h{}>\n", lvl));
            }
            _ => html::push_html(&mut out, std::iter::once(ev)),
        }
    }

    (out, build_toc_html(&headings))
}

/// Build HTML for the Table of Contents
fn build_toc_html(headings: &[(u32, String, String)]) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let mut html = String::new();
    html.push_str("<nav class=\"toc\">");
    let mut current = 0u32;
    for (level, id, title) in headings {
        if *level > 6 || *level < 1 {
            continue;
        }
        while current < *level {
            html.push_str("<ul>");
            current += 1;
        }
        while current > *level {
            html.push_str("</ul>");
            current -= 1;
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>",
            escape_attr(id),
            escape_html(title)
        ));
    }
    while current > 0 {
        html.push_str("</ul>");
        current -= 1;
    }
    html.push_str("</nav>\n");
    html
}

/// Build the metadata bar fragment in its fixed order: parent link, raw
/// link, date, author, tags. Each part appears only when present.
pub fn metadata_bar(front: &FrontMatter, request_path: &str) -> String {
    let mut meta = String::new();

    if let Some(pos) = request_path.rfind('/') {
        let parent = &request_path[..pos + 1];
        meta.push_str(&format!(
            "<a href=\"{}\"><i class=\"fa fa-home catalog\"></i></a>",
            escape_attr(parent)
        ));
    }

    meta.push_str(&format!(
        "<a href=\"{}?raw=1\"><i class=\"fa fa-file-code-o raw\"></i></a>",
        escape_attr(request_path)
    ));

    if let Some(date) = &front.date {
        meta.push_str("<i class=\"fa fa-calendar\"></i>");
        meta.push_str(&escape_html(date));
    }
    if let Some(author) = &front.author {
        meta.push_str("<i class=\"fa fa-user\"></i>");
        meta.push_str(&escape_html(author));
    }
    if !front.tags.is_empty() {
        meta.push_str("<i class=\"fa fa-tags\"></i>");
        let labels: Vec<String> = front
            .tags
            .iter()
            .map(|tag| format!("<a class=\"tag\">{}</a>", escape_html(tag)))
            .collect();
        meta.push_str(&labels.join(" | "));
    }

    meta
}

/// Convert heading level to u32
fn heading_level_to_u32(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Create URL-friendly slug from text
fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = false;
    for ch in text.chars() {
        let c = ch.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_dash = false;
        } else if c.is_ascii_whitespace() || c == '-' || c == '_' {
            if !last_dash && !out.is_empty() {
                out.push('-');
                last_dash = true;
            }
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}

//! Fixed page template for rendered Markdown documents.

use crate::utils::escape_html;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>{{TITLE}}</title>
<meta charset="utf-8" />
<link rel="stylesheet" type="text/css" href="/md.css"/>
<link rel="stylesheet" type="text/css" href="/fa.css"/>
</head>
<body>
{{META}}<article class="markdown-body">
{{BODY}}
</article>
</body>
</html>"#;

/// Merge title, metadata bar and body fragment into the page shell. The
/// metadata block is emitted only when non-empty.
pub fn render_page(title: &str, meta_html: &str, body_html: &str) -> String {
    let meta_block = if meta_html.is_empty() {
        String::new()
    } else {
        format!("<articleMeta>\n{}\n</articleMeta>\n", meta_html)
    };
    PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{META}}", &meta_block)
        .replace("{{BODY}}", body_html)
}

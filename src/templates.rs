use crate::fs_utils::escape_html;
use crate::highlight::theme_css;
use crate::types::RenderedDocument;

/// Stylesheet used when no external one is given or it fails to load
pub const DEFAULT_STYLE: &str = include_str!("../static/css/default.css");

/// Wrap a rendered document into a complete page with the style embedded.
///
/// Pages with highlighted code also carry the highlight theme, after the
/// main style so the theme colors code spans.
pub fn wrap_document(document: &RenderedDocument, style: &str) -> String {
    let title_tag = match &document.title {
        Some(t) => format!("<title>{}</title>\n", escape_html(t)),
        None => String::new(),
    };
    let code_style = if document.highlighted {
        format!("<style>\n{}\n</style>\n", theme_css())
    } else {
        String::new()
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{title_tag}<style>
{style}
</style>
{code_style}</head>
<body>
{body}</body>
</html>
"#,
        body = document.html,
    )
}

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::highlight::Highlighter;
use crate::types::RenderedDocument;

// Definition lists and bare-URL autolinks have no pulldown-cmark 0.10 counterpart.
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options
}

/// Render raw markdown bytes into an HTML body.
///
/// Fails only when the input is not UTF-8. Every heading gets a slug id,
/// de-duplicated in document order, and fenced code blocks are highlighted.
pub fn render_markdown(source: &[u8]) -> Result<RenderedDocument, std::str::Utf8Error> {
    let raw = std::str::from_utf8(source)?;
    let (front_title, content) = split_front_matter(raw);
    let options = markdown_options();

    // First pass: heading text and ids
    let mut headings: Vec<(u32, String, String)> = Vec::new(); // (level, id, text)
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
                    headings.push((lvl, id, buf.trim().to_string()));
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

    // Second pass: emit HTML with the ids filled in
    let mut out = String::with_capacity(content.len() * 3 / 2);
    let mut idx = 0usize;
    let events = Parser::new_ext(content, options).map(|ev| match ev {
        Event::Start(Tag::Heading {
            level,
            id: _,
            classes,
            attrs,
        }) => {
            let id = headings.get(idx).map(|(_, id, _)| id.clone()).unwrap_or_default();
            idx += 1;
            Event::Start(Tag::Heading {
                level,
                id: Some(CowStr::from(id)),
                classes,
                attrs,
            })
        }
        other => other,
    });
    let mut events = Highlighter::new(events);
    html::push_html(&mut out, &mut events);

    let title = front_title.or_else(|| first_heading_text(&headings));
    Ok(RenderedDocument {
        html: out,
        title,
        highlighted: events.highlighted() > 0,
    })
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
        } else if (c.is_ascii_whitespace() || c == '-' || c == '_')
            && !last_dash
            && !out.is_empty()
        {
            out.push('-');
            last_dash = true;
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}

/// Strip a leading `---` block, returning its `title:` if present
fn split_front_matter(raw: &str) -> (Option<String>, &str) {
    let Some(rest) = raw.strip_prefix("---\n").or_else(|| raw.strip_prefix("---\r\n")) else {
        return (None, raw);
    };
    let mut title: Option<String> = None;
    let mut offset = raw.len() - rest.len();
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed == "---" {
            return (title, &raw[offset..]);
        }
        if let Some((k, v)) = trimmed.split_once(':') {
            if k.trim().eq_ignore_ascii_case("title") {
                let mut val = v.trim();
                if val.len() >= 2
                    && ((val.starts_with('"') && val.ends_with('"'))
                        || (val.starts_with('\'') && val.ends_with('\'')))
                {
                    val = &val[1..val.len() - 1];
                }
                if !val.is_empty() {
                    title = Some(val.to_string());
                }
            }
        }
    }
    // Unterminated block: treat the whole thing as content.
    (None, raw)
}

/// Get the first H1 heading text
fn first_heading_text(headings: &[(u32, String, String)]) -> Option<String> {
    headings
        .iter()
        .find(|(lvl, _, text)| *lvl == 1 && !text.is_empty())
        .map(|(_, _, text)| text.clone())
}

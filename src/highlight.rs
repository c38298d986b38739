//! Syntax highlighting of fenced code blocks

use std::sync::LazyLock;

use log::warn;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::fs_utils::escape_html;

/// Theme the highlight classes are colored with
const THEME: &str = "Solarized (light)";
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

static THEME_CSS: LazyLock<String> = LazyLock::new(|| {
    let themes = ThemeSet::load_defaults();
    let Some(theme) = themes.themes.get(THEME) else {
        warn!("Highlight theme {} is missing; code blocks stay uncolored", THEME);
        return String::new();
    };
    css_for_theme_with_class_style(theme, CLASS_STYLE).unwrap_or_else(|e| {
        warn!("Cannot build highlight stylesheet: {}", e);
        String::new()
    })
});

/// CSS for the classes emitted by [`Highlighter`]
pub fn theme_css() -> &'static str {
    &THEME_CSS
}

/// Event adapter that replaces each fenced code block with highlighted HTML.
///
/// The block's text is buffered until its end tag so the parser sees whole
/// lines. Indented blocks pass through untouched.
pub struct Highlighter<I> {
    inner: I,
    block: Option<(&'static SyntaxReference, String)>,
    highlighted: usize,
}

impl<I> Highlighter<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            block: None,
            highlighted: 0,
        }
    }

    /// Number of blocks replaced so far
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }
}

/// Syntax for an info string such as `rust` or `rust,ignore`
fn syntax_for(info: &str) -> &'static SyntaxReference {
    let syntax_set: &'static SyntaxSet = &SYNTAX_SET;
    let lang = info
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    syntax_set
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

fn highlight_block(syntax: &SyntaxReference, code: &str) -> String {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            warn!("Highlighting {} block failed: {}", syntax.name, e);
            return format!("<pre class=\"hl-code\"><code>{}</code></pre>\n", escape_html(code));
        }
    }
    format!("<pre class=\"hl-code\"><code>{}</code></pre>\n", generator.finalize())
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Highlighter<I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    self.block = Some((syntax_for(&info), String::new()));
                }
                Event::Text(text) if self.block.is_some() => {
                    if let Some((_, code)) = self.block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if self.block.is_some() => {
                    if let Some((syntax, code)) = self.block.take() {
                        self.highlighted += 1;
                        let html = highlight_block(syntax, &code);
                        return Some(Event::Html(CowStr::from(html)));
                    }
                }
                ev => return Some(ev),
            }
        }
    }
}

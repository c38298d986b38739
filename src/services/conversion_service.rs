use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::errors::BuildError;
use crate::fs_utils::classify_path;
use crate::render::render_markdown;
use crate::templates::wrap_document;
use crate::types::{DocumentKind, StyleSheet, TaskOutcome};

/// Converts or copies exactly one file
#[derive(Debug, Clone)]
pub struct ConversionTask {
    source: PathBuf,
    destination: PathBuf,
    style: StyleSheet,
}

impl ConversionTask {
    pub fn new(source: PathBuf, destination: PathBuf, style: StyleSheet) -> Self {
        Self {
            source,
            destination,
            style,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn kind(&self) -> DocumentKind {
        classify_path(&self.source)
    }

    /// Run the task, reporting any failure before returning it
    pub fn execute(self) -> Result<TaskOutcome, BuildError> {
        let result = self.run();
        if let Err(e) = &result {
            error!("{} -> {}: {}", self.source.display(), self.destination.display(), e);
        }
        result
    }

    /// Run the task without reporting
    pub fn run(&self) -> Result<TaskOutcome, BuildError> {
        match self.kind() {
            DocumentKind::Markdown => self.render().map(|_| TaskOutcome::Rendered),
            DocumentKind::Other => self.copy().map(|_| TaskOutcome::Copied),
        }
    }

    fn render(&self) -> Result<(), BuildError> {
        let markdown =
            fs::read(&self.source).map_err(|e| BuildError::unreadable(&self.source, e))?;
        let document = render_markdown(&markdown).map_err(|e| BuildError::Render {
            path: self.source.clone(),
            reason: e.to_string(),
        })?;
        let page = wrap_document(&document, self.style.text());
        fs::write(&self.destination, page.as_bytes())?;
        debug!("Rendered {} ({} bytes)", self.destination.display(), page.len());
        Ok(())
    }

    fn copy(&self) -> Result<u64, BuildError> {
        let input =
            File::open(&self.source).map_err(|e| BuildError::unreadable(&self.source, e))?;
        let mut reader = BufReader::new(input);
        let mut writer = BufWriter::new(File::create(&self.destination)?);
        let bytes = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        debug!("Copied {} bytes to {}", bytes, self.destination.display());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(dir: &Path, src: &str, dst: &str) -> ConversionTask {
        ConversionTask::new(dir.join(src), dir.join(dst), StyleSheet::built_in())
    }

    #[test]
    fn markdown_is_rendered_and_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("note.md"), "# Title\n\nSome *text*.\n").unwrap();

        let outcome = task(dir.path(), "note.md", "note.html").run().unwrap();
        assert_eq!(outcome, TaskOutcome::Rendered);

        let page = fs::read_to_string(dir.path().join("note.html")).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h1 id=\"title\">Title</h1>"));
        assert!(page.contains("<em>text</em>"));
        assert!(page.contains("<title>Title</title>"));
        assert!(page.contains(crate::templates::DEFAULT_STYLE));
    }

    #[test]
    fn external_style_is_embedded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "text").unwrap();
        let css = "p { color: teal; }".to_string();
        let style = StyleSheet::external(dir.path().join("x.css"), css);

        ConversionTask::new(dir.path().join("a.md"), dir.path().join("a.html"), style)
            .run()
            .unwrap();
        let page = fs::read_to_string(dir.path().join("a.html")).unwrap();
        assert!(page.contains("p { color: teal; }"));
        assert!(!page.contains(crate::templates::DEFAULT_STYLE));
    }

    #[test]
    fn code_pages_carry_the_highlight_theme() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("code.md"), "```python\nprint('hi')\n```\n").unwrap();
        fs::write(dir.path().join("prose.md"), "just words\n").unwrap();

        task(dir.path(), "code.md", "code.html").run().unwrap();
        task(dir.path(), "prose.md", "prose.html").run().unwrap();

        let code = fs::read_to_string(dir.path().join("code.html")).unwrap();
        let prose = fs::read_to_string(dir.path().join("prose.html")).unwrap();
        assert!(code.contains("<span class=\"hl-"));
        assert!(code.contains(crate::highlight::theme_css()));
        assert!(!prose.contains(crate::highlight::theme_css()));
    }

    #[test]
    fn other_files_are_copied_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        fs::write(dir.path().join("img.png"), &bytes).unwrap();

        let outcome = task(dir.path(), "img.png", "copy.png").run().unwrap();
        assert_eq!(outcome, TaskOutcome::Copied);
        assert_eq!(fs::read(dir.path().join("copy.png")).unwrap(), bytes);
    }

    #[test]
    fn existing_destination_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("short.txt"), "new").unwrap();
        fs::write(dir.path().join("out.txt"), "a much longer previous content").unwrap();

        task(dir.path(), "short.txt", "out.txt").run().unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "new");
    }

    #[test]
    fn missing_source_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = task(dir.path(), "gone.md", "gone.html").execute().unwrap_err();
        assert!(matches!(err, BuildError::Unreadable { .. }));
        assert!(!dir.path().join("gone.html").exists());
    }

    #[test]
    fn invalid_utf8_markdown_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.md"), [0xffu8, 0xfe, 0x00]).unwrap();
        let err = task(dir.path(), "bad.md", "bad.html").run().unwrap_err();
        assert!(matches!(err, BuildError::Render { .. }));
        assert!(!dir.path().join("bad.html").exists());
    }

    #[test]
    fn missing_destination_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        let err = task(dir.path(), "a.txt", "no/such/dir/a.txt").run().unwrap_err();
        assert!(matches!(err, BuildError::Io(_)));
    }
}

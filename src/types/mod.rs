use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How a file is handled by its conversion task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    Other,
}

/// One entry found while listing a source directory
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Raw file name, joined into output paths as is
    pub name: OsString,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_hidden: bool,
    /// Entry is a symbolic link; `is_dir` describes its target
    pub is_link: bool,
    /// Neither a regular file nor a directory (socket, FIFO, device)
    pub is_special: bool,
}

impl SourceEntry {
    pub fn new(name: OsString, path: PathBuf, is_dir: bool) -> Self {
        let is_hidden = crate::fs_utils::is_hidden(&name);
        Self {
            name,
            path,
            is_dir,
            is_hidden,
            is_link: false,
            is_special: false,
        }
    }

    pub fn link(mut self) -> Self {
        self.is_link = true;
        self
    }

    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }
}

/// Where the active stylesheet came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOrigin {
    BuiltIn,
    External(PathBuf),
}

/// Stylesheet resolved once at startup.
///
/// The text sits behind an `Arc<str>` and there is no way to mutate it after
/// construction, so every conversion task can hold a clone and read it
/// without synchronization.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    text: Arc<str>,
    origin: StyleOrigin,
}

impl StyleSheet {
    pub fn built_in() -> Self {
        Self {
            text: Arc::from(crate::templates::DEFAULT_STYLE),
            origin: StyleOrigin::BuiltIn,
        }
    }

    pub fn external(path: PathBuf, text: String) -> Self {
        Self {
            text: Arc::from(text),
            origin: StyleOrigin::External(path),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &StyleOrigin {
        &self.origin
    }
}

/// Shared, read-only settings handed to the walker and every task
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub output_root: PathBuf,
    pub strip_components: usize,
    pub style: StyleSheet,
}

impl BuildContext {
    pub fn new(output_root: PathBuf, strip_components: usize, style: StyleSheet) -> Self {
        Self {
            output_root,
            strip_components,
            style,
        }
    }

    /// Destination of a tree-relative source path
    pub fn output_path_for(&self, relative: &Path) -> PathBuf {
        crate::fs_utils::map_output_path(relative, &self.output_root, self.strip_components)
    }

    /// Mirrored output directory of a tree-relative source directory
    pub fn output_dir_for(&self, relative: &Path) -> PathBuf {
        crate::fs_utils::map_output_dir(relative, &self.output_root, self.strip_components)
    }
}

/// What a finished conversion task did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Rendered,
    Copied,
}

/// Markdown rendering result
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    pub title: Option<String>,
    /// At least one code block carries highlight classes
    pub highlighted: bool,
}

/// Totals for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub directories: usize,
    pub rendered: usize,
    pub copied: usize,
    pub failed: usize,
    pub skipped_dirs: usize,
}

impl BuildSummary {
    pub fn dispatched(&self) -> usize {
        self.rendered + self.copied + self.failed
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, {} rendered, {} copied, {} failed",
            self.directories, self.rendered, self.copied, self.failed
        )?;
        if self.skipped_dirs > 0 {
            write!(f, ", {} directories skipped", self.skipped_dirs)?;
        }
        Ok(())
    }
}

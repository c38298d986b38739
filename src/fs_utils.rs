use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::error;

use crate::errors::BuildError;
use crate::types::{DocumentKind, SourceEntry};

const MARKDOWN_SUFFIX: &[u8] = b".md";
const HTML_EXTENSION: &str = "html";

/// Dotfiles and dot-directories never reach the output tree.
///
/// Works on the raw name, so names that are not valid UTF-8 are judged too.
pub fn is_hidden(name: impl AsRef<OsStr>) -> bool {
    name.as_ref().as_encoded_bytes().starts_with(b".")
}

/// Exact, case-sensitive `*.md` match on a bare file name
pub fn classify(name: impl AsRef<OsStr>) -> DocumentKind {
    if name.as_ref().as_encoded_bytes().ends_with(MARKDOWN_SUFFIX) {
        DocumentKind::Markdown
    } else {
        DocumentKind::Other
    }
}

pub fn classify_path(path: &Path) -> DocumentKind {
    match path.file_name() {
        Some(name) => classify(name),
        None => DocumentKind::Other,
    }
}

/// Only the named segments of a path, whatever separators or prefixes it came with
fn normal_segments(path: &Path) -> Vec<&OsStr> {
    path.components()
        .filter_map(|comp| match comp {
            Component::Normal(seg) => Some(seg),
            _ => None,
        })
        .collect()
}

/// Re-root a tree-relative file path under `output_root`.
///
/// The first `strip` segments are dropped, but never the file name itself.
/// Markdown files get their `.md` swapped for `.html`.
pub fn map_output_path(relative: &Path, output_root: &Path, strip: usize) -> PathBuf {
    let segments = normal_segments(relative);
    let keep_from = strip.min(segments.len().saturating_sub(1));
    let mut out = output_root.to_path_buf();
    for seg in &segments[keep_from..] {
        out.push(seg);
    }
    if classify_path(relative) == DocumentKind::Markdown {
        out.set_extension(HTML_EXTENSION);
    }
    out
}

/// Re-root a tree-relative directory under `output_root`
pub fn map_output_dir(relative: &Path, output_root: &Path, strip: usize) -> PathBuf {
    let mut out = output_root.to_path_buf();
    for seg in normal_segments(relative).into_iter().skip(strip) {
        out.push(seg);
    }
    out
}

/// The tree-relative path of the source root: its own name, or nothing for `/`
pub fn tree_root_name(source: &Path) -> PathBuf {
    source.file_name().map(PathBuf::from).unwrap_or_default()
}

/// Destination for single-file mode: next to the source, or inside an explicit output directory
pub fn single_file_destination(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut dest = match (output_dir, source.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => source.to_path_buf(),
    };
    dest.set_extension(HTML_EXTENSION);
    dest
}

/// List a source directory, keeping hidden entries flagged rather than dropped.
///
/// Only a directory that cannot be opened is an error. An entry that cannot be
/// read is reported and left out, and its siblings are still returned.
pub fn list_source_dir(dir: &Path) -> Result<Vec<SourceEntry>, BuildError> {
    let mut entries = Vec::new();
    let listing = fs::read_dir(dir).map_err(|e| BuildError::unreadable(dir, e))?;
    for entry_result in listing {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                error!("{}", BuildError::unreadable(dir, e));
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                error!("{}", BuildError::unreadable(&path, e));
                continue;
            }
        };
        let name = entry.file_name();
        let source_entry = if file_type.is_symlink() {
            // A dangling link stays a file entry; its task reports the failure.
            let target_is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);
            SourceEntry::new(name, path, target_is_dir).link()
        } else if file_type.is_dir() || file_type.is_file() {
            SourceEntry::new(name, path, file_type.is_dir())
        } else {
            SourceEntry::new(name, path, false).special()
        };
        entries.push(source_entry);
    }
    Ok(entries)
}

pub fn escape_html(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

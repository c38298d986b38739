use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error types for the build pipeline
#[derive(Debug)]
pub enum BuildError {
    Io(io::Error),
    SourceNotFound(PathBuf),
    InvalidSource(PathBuf),
    Unreadable { path: PathBuf, source: io::Error },
    Render { path: PathBuf, reason: String },
    Style { path: PathBuf, source: io::Error },
    Runtime(String),
}

impl BuildError {
    /// Attach a path to a raw I/O error
    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Unreadable {
            path: path.into(),
            source,
        }
    }
}

impl From<io::Error> for BuildError {
    fn from(err: io::Error) -> Self {
        BuildError::Io(err)
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Io(e) => write!(f, "I/O error: {}", e),
            BuildError::SourceNotFound(path) => {
                write!(f, "Source not found: {}", path.display())
            }
            BuildError::InvalidSource(path) => write!(
                f,
                "Please provide a valid source directory or markdown file: {}",
                path.display()
            ),
            BuildError::Unreadable { path, source } => {
                write!(f, "Cannot read {}: {}", path.display(), source)
            }
            BuildError::Render { path, reason } => {
                write!(f, "Render error in {}: {}", path.display(), reason)
            }
            BuildError::Style { path, source } => {
                write!(f, "Cannot load stylesheet {}: {}", path.display(), source)
            }
            BuildError::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Io(e) => Some(e),
            BuildError::Unreadable { source, .. } | BuildError::Style { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let err = BuildError::Render {
            path: PathBuf::from("docs/a.md"),
            reason: "stream did not contain valid UTF-8".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("docs/a.md"));
        assert!(text.contains("UTF-8"));
    }
}

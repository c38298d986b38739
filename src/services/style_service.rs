use std::fs;
use std::path::Path;

use log::{debug, error, info, warn};

use crate::errors::BuildError;
use crate::types::StyleSheet;

/// Resolves the one stylesheet every conversion task embeds
pub struct StyleService;

impl StyleService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the stylesheet for this run.
    ///
    /// A load failure is reported and replaced by the built-in style; it never
    /// stops the run.
    pub fn resolve(&self, path: Option<&Path>) -> StyleSheet {
        let Some(path) = path else {
            debug!("No stylesheet given, using built-in style");
            return StyleSheet::built_in();
        };

        match self.load_css(path) {
            Ok(text) => {
                info!("Using stylesheet {}", path.display());
                StyleSheet::external(path.to_path_buf(), text)
            }
            Err(e) => {
                error!("{}", e);
                warn!("Using fallback theme...");
                StyleSheet::built_in()
            }
        }
    }

    /// Read a stylesheet file into a string
    pub fn load_css(&self, path: &Path) -> Result<String, BuildError> {
        fs::read_to_string(path).map_err(|source| BuildError::Style {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for StyleService {
    fn default() -> Self {
        Self::new()
    }
}

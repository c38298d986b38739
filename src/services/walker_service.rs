use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::fs_utils::{classify, list_source_dir};
use crate::services::{ConversionTask, TaskGroup};
use crate::types::{BuildContext, BuildSummary, DocumentKind, SourceEntry};

/// Depth-first walk of a source tree.
///
/// Directories are created synchronously as they are entered; files are
/// handed to the task group and converted concurrently. A directory is always
/// created before any task targeting a file inside it is spawned.
pub struct TreeWalker {
    context: Arc<BuildContext>,
    group: TaskGroup,
    exclude: Option<PathBuf>,
}

impl TreeWalker {
    pub fn new(context: Arc<BuildContext>, group: TaskGroup) -> Self {
        Self {
            context,
            group,
            exclude: None,
        }
    }

    /// Never descend into `path` (the output root when it lives inside the source tree)
    pub fn exclude(mut self, path: PathBuf) -> Self {
        self.exclude = Some(path);
        self
    }

    /// Walk `root`, whose tree-relative name is `relative`.
    ///
    /// Returns the directory totals; file totals come from the task group.
    pub fn walk(&self, root: &Path, relative: &Path) -> BuildSummary {
        let mut stats = BuildSummary::default();
        self.visit_dir(root, relative, &mut stats);
        debug!("Walk of {} dispatched {} tasks", root.display(), self.group.pending());
        stats
    }

    fn visit_dir(&self, dir: &Path, relative: &Path, stats: &mut BuildSummary) {
        let out_dir = self.context.output_dir_for(relative);
        info!("Creating directory: {}", out_dir.display());
        if let Err(e) = fs::create_dir_all(&out_dir) {
            error!("Cannot create {}: {}", out_dir.display(), e);
            stats.skipped_dirs += 1;
            return;
        }
        stats.directories += 1;

        let entries = match list_source_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("{}", e);
                stats.skipped_dirs += 1;
                return;
            }
        };

        for entry in entries {
            if entry.is_hidden {
                debug!("Skipping hidden entry {}", entry.path.display());
                continue;
            }
            if self.exclude.as_deref() == Some(entry.path.as_path()) {
                debug!("Skipping output directory {}", entry.path.display());
                continue;
            }
            if entry.is_special {
                warn!("Skipping {}: not a regular file", entry.path.display());
                continue;
            }

            let entry_relative = relative.join(&entry.name);
            if entry.is_dir {
                if entry.is_link {
                    warn!("Skipping {}: symbolic link to a directory", entry.path.display());
                    continue;
                }
                self.visit_dir(&entry.path, &entry_relative, stats);
            } else {
                self.dispatch(entry, &entry_relative);
            }
        }
    }

    fn dispatch(&self, entry: SourceEntry, relative: &Path) {
        let destination = self.context.output_path_for(relative);
        match classify(&entry.name) {
            DocumentKind::Markdown => info!("Creating file: {}", destination.display()),
            DocumentKind::Other => {
                info!("Copying {} to {}", entry.path.display(), destination.display())
            }
        }
        let task = ConversionTask::new(entry.path, destination, self.context.style.clone());
        self.group.spawn(move || task.execute());
    }
}

use std::io;
use std::sync::Arc;

use log::{debug, info};
use tokio::fs;

use crate::config::Config;
use crate::errors::BuildError;
use crate::fs_utils::{classify_path, single_file_destination, tree_root_name};
use crate::services::{ConversionTask, StyleService, TaskGroup, TreeWalker};
use crate::types::{BuildContext, BuildSummary, DocumentKind, StyleSheet};

/// Drives one run: validates the source, resolves the style, dispatches work and waits for it
pub struct BuildService {
    config: Config,
}

impl BuildService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline.
    ///
    /// Only source problems are returned as errors. Failed tasks are reported
    /// as they happen and counted in the summary.
    pub async fn run(&self) -> Result<BuildSummary, BuildError> {
        let source = &self.config.source;
        let metadata = fs::metadata(source).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BuildError::SourceNotFound(source.clone()),
            _ => BuildError::unreadable(source, e),
        })?;

        if metadata.is_dir() {
            // Listing the root up front turns an unreadable source into a fatal error.
            fs::read_dir(source).await.map_err(|e| BuildError::unreadable(source, e))?;
            let style = self.resolve_style();
            self.run_tree(style).await
        } else if classify_path(source) == DocumentKind::Markdown {
            fs::File::open(source).await.map_err(|e| BuildError::unreadable(source, e))?;
            let style = self.resolve_style();
            self.run_single(style).await
        } else {
            Err(BuildError::InvalidSource(source.clone()))
        }
    }

    fn resolve_style(&self) -> StyleSheet {
        StyleService::new().resolve(self.config.stylesheet.as_deref())
    }

    async fn run_tree(&self, style: StyleSheet) -> Result<BuildSummary, BuildError> {
        let output_root = self.config.output_root();
        fs::create_dir_all(&output_root).await?;
        let output_canonical = fs::canonicalize(&output_root).await?;
        let root = fs::canonicalize(&self.config.source).await?;
        let relative = tree_root_name(&root);
        debug!(
            "Mirroring {} into {} (strip {})",
            root.display(),
            output_root.display(),
            self.config.strip_components
        );

        let strip = self.config.strip_components;
        let context = Arc::new(BuildContext::new(output_root, strip, style));
        let group = TaskGroup::current()?;
        let walker = TreeWalker::new(context, group.clone()).exclude(output_canonical);
        let walk = tokio::task::spawn_blocking(move || walker.walk(&root, &relative)).await;
        // Wait for dispatched tasks even if the walk itself panicked.
        let walk_stats = walk.map_err(|e| BuildError::Runtime(e.to_string()));

        let tasks = group.wait().await;
        let walk_stats = walk_stats?;
        Ok(BuildSummary {
            directories: walk_stats.directories,
            skipped_dirs: walk_stats.skipped_dirs,
            ..tasks
        })
    }

    async fn run_single(&self, style: StyleSheet) -> Result<BuildSummary, BuildError> {
        let source = self.config.source.clone();
        let output_dir = self.config.output.as_deref();
        if let Some(dir) = output_dir {
            fs::create_dir_all(dir).await?;
        }
        let destination = single_file_destination(&source, output_dir);
        info!("Creating file: {}", destination.display());

        let group = TaskGroup::current()?;
        let task = ConversionTask::new(source, destination, style);
        group.spawn(move || task.execute());
        Ok(group.wait().await)
    }
}

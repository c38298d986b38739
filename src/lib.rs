//! Squid - mirror a directory tree, rendering markdown to HTML
//!
//! Every `.md` file under the source tree becomes a styled HTML document at the
//! same relative position in the output tree; every other file is copied as is.
//! Hidden entries are left out. Files are converted concurrently, and a run
//! only finishes once every dispatched conversion has ended.

pub mod config;
pub mod errors;
pub mod fs_utils;
pub mod highlight;
pub mod logger;
pub mod render;
pub mod services;
pub mod templates;
pub mod types;

// Re-export commonly used items
pub use config::{CliArgs, Config};
pub use errors::BuildError;
pub use services::{BuildService, ConversionTask, StyleService, TaskGroup, TreeWalker};
pub use types::{BuildContext, BuildSummary, DocumentKind, SourceEntry, StyleSheet, TaskOutcome};

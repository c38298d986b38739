//! Command-line arguments and the resolved run configuration

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::Level;

/// Output directory used when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "build/";

/// A fast markdown to HTML converter
#[derive(Parser, Debug, Clone)]
#[command(
    name = "squid",
    version,
    about = "A fast markdown to HTML converter",
    long_about = "Converts to HTML a single markdown file or an entire project.\n\n\
                  Non-markdown files found in the project tree are copied as they are, \
                  preserving their position relative to the markdown files. \
                  Hidden files and directories are left out.\n\n\
                  If no destination is given, the project is built into 'build/'.",
    after_help = "EXAMPLES:\n    \
        squid docs\n    \
        squid docs public --css theme.css\n    \
        squid -s 1 -o site docs\n    \
        squid notes/today.md"
)]
pub struct CliArgs {
    /// Markdown file or directory to convert
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output directory (same as --output)
    #[arg(value_name = "DESTINATION", conflicts_with = "output")]
    pub destination: Option<PathBuf>,

    /// Output directory [default: build/]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// CSS file to use for styling
    #[arg(long, value_name = "FILE")]
    pub css: Option<PathBuf>,

    /// Leading path segments to drop before re-rooting under the output directory
    #[arg(short = 's', long, default_value_t = 0, value_name = "N")]
    pub strip_components: usize,

    /// Maximum number of files converted at the same time
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Log level requested on the command line, if any
    pub fn log_level(&self) -> Option<Level> {
        if self.quiet {
            return Some(Level::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(Level::Debug),
            _ => Some(Level::Trace),
        }
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    /// Explicit output directory; `None` means the default for the mode
    pub output: Option<PathBuf>,
    pub stylesheet: Option<PathBuf>,
    pub strip_components: usize,
    pub jobs: Option<usize>,
}

impl Config {
    /// Create a configuration with default values
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            output: None,
            stylesheet: None,
            strip_components: 0,
            jobs: None,
        }
    }

    pub fn from_args(args: CliArgs) -> Self {
        Self {
            source: args.source,
            output: args.destination.or(args.output),
            stylesheet: args.css,
            strip_components: args.strip_components,
            jobs: args.jobs.map(usize::from),
        }
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: PathBuf) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    pub fn with_strip_components(mut self, strip: usize) -> Self {
        self.strip_components = strip;
        self
    }

    /// Output root for tree mode
    pub fn output_root(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Runtime sized for this run: the walker plus at most `jobs` conversion tasks
    pub fn runtime(&self) -> std::io::Result<tokio::runtime::Runtime> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.enable_all();
        if let Some(jobs) = self.jobs {
            builder.max_blocking_threads(jobs + 1);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("squid").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = Config::from_args(parse(&["docs"]).unwrap());
        assert_eq!(config.source, PathBuf::from("docs"));
        assert_eq!(config.output, None);
        assert_eq!(config.output_root(), PathBuf::from("build/"));
        assert_eq!(config.strip_components, 0);
        assert_eq!(config.stylesheet, None);
        assert_eq!(config.jobs, None);
    }

    #[test]
    fn positional_destination_sets_output() {
        let config = Config::from_args(parse(&["docs", "public", "--css", "t.css"]).unwrap());
        assert_eq!(config.output_root(), PathBuf::from("public"));
        assert_eq!(config.stylesheet, Some(PathBuf::from("t.css")));
    }

    #[test]
    fn output_flag_and_strip() {
        let args = parse(&["-o", "site", "-s", "1", "-j", "4", "docs"]).unwrap();
        let config = Config::from_args(args);
        assert_eq!(config.output, Some(PathBuf::from("site")));
        assert_eq!(config.strip_components, 1);
        assert_eq!(config.jobs, Some(4));
    }

    #[test]
    fn destination_and_output_conflict() {
        assert!(parse(&["docs", "public", "-o", "site"]).is_err());
    }

    #[test]
    fn source_is_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn zero_jobs_is_rejected() {
        assert!(parse(&["-j", "0", "docs"]).is_err());
    }

    #[test]
    fn log_level_flags() {
        assert_eq!(parse(&["docs"]).unwrap().log_level(), None);
        assert_eq!(parse(&["-v", "docs"]).unwrap().log_level(), Some(Level::Debug));
        assert_eq!(parse(&["-vv", "docs"]).unwrap().log_level(), Some(Level::Trace));
        assert_eq!(parse(&["-q", "docs"]).unwrap().log_level(), Some(Level::Error));
        assert!(parse(&["-q", "-v", "docs"]).is_err());
    }
}

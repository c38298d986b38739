use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

pub enum LogOutput {
    Stdout,
    Stderr,
}

pub struct Logger {
    pub write_to_std: Option<LogOutput>,
    pub severity: Level,
    pub file: Option<Arc<Mutex<File>>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger; a file sink is opened only when `file_path` is given
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        write_to_std: Option<LogOutput>,
        enable_colors: bool,
    ) -> Self {
        let mut file = None;

        if let Some(path_ref) = file_path.as_ref() {
            if let Some(parent) = path_ref.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            file = File::create(path_ref).ok().map(|f| Arc::new(Mutex::new(f)));
        }

        Logger {
            write_to_std,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    /// Current UTC time as HH:MM:SS
    fn get_timestamp() -> String {
        let now = OffsetDateTime::now_utc();
        format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
    }

    /// Get color code for log level
    fn get_color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[1;91m", // Bold bright red
            Level::Warn => "\x1b[33m",    // Yellow
            Level::Info => "\x1b[36m",    // Cyan
            Level::Debug => "\x1b[35m",   // Magenta
            Level::Trace => "\x1b[37m",   // White
        }
    }

    /// Get reset color code
    fn get_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Format one record for the terminal
    fn format_line(&self, record: &Record, timestamp: &str) -> String {
        let level_str = record.level().as_str();
        let args = record.args();
        if !self.enable_colors {
            return format!("[{timestamp}] {level_str} {args}\n");
        }
        let color = Self::get_color(record.level());
        let reset = Self::get_reset();
        if record.level() == Level::Error {
            // Whole line highlighted for errors
            format!("{color}[{timestamp}] {level_str} {args}{reset}\n")
        } else {
            format!("{color}[{timestamp}] {level_str}{reset} {args}\n")
        }
    }

    /// Initialize logger; `severity` overrides `SQUID_LOG` / `RUST_LOG`
    pub fn init(severity: Option<Level>, enable_colors: bool) -> Result<(), log::SetLoggerError> {
        let severity = severity.unwrap_or_else(|| {
            std::env::var("SQUID_LOG")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string())
                .parse::<Level>()
                .unwrap_or(Level::Info)
        });

        let file_path = std::env::var_os("SQUID_LOG_FILE").map(PathBuf::from);
        let enable_colors = enable_colors && std::env::var_os("NO_COLOR").is_none();

        let logger = Logger::new(
            file_path,
            Some(severity),
            Some(LogOutput::Stderr),
            enable_colors,
        );
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Self::get_timestamp();
        let formatted_message = self.format_line(record, &timestamp);

        if let Some(write_to_std) = &self.write_to_std {
            match write_to_std {
                LogOutput::Stdout => {
                    let _ = std::io::stdout().write_all(formatted_message.as_bytes());
                }
                LogOutput::Stderr => {
                    let _ = std::io::stderr().write_all(formatted_message.as_bytes());
                }
            }
        }

        // Write to file (without colors)
        if let Some(file) = &self.file {
            if let Ok(mut file_guard) = file.lock() {
                let level = record.level().as_str();
                let _ = writeln!(file_guard, "[{timestamp}] {level} {}", record.args());
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file_guard) = file.lock() {
                let _ = file_guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(colors: bool) -> Logger {
        Logger::new(None, Some(Level::Info), None, colors)
    }

    #[test]
    fn plain_lines_have_no_escape_codes() {
        let line = logger(false).format_line(
            &Record::builder()
                .args(format_args!("Copying a to b"))
                .level(Level::Info)
                .build(),
            "12:00:00",
        );
        assert_eq!(line, "[12:00:00] INFO Copying a to b\n");
    }

    #[test]
    fn errors_are_highlighted_end_to_end() {
        let line = logger(true).format_line(
            &Record::builder()
                .args(format_args!("boom"))
                .level(Level::Error)
                .build(),
            "12:00:00",
        );
        assert!(line.starts_with("\x1b[1;91m[12:00:00] ERROR boom"));
        assert!(line.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn severity_filters_records() {
        let logger = logger(false);
        assert!(logger.enabled(&Metadata::builder().level(Level::Warn).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }

    #[test]
    fn file_sink_gets_uncolored_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/squid.log");
        let logger = Logger::new(Some(path.clone()), Some(Level::Info), None, true);
        logger.log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .build(),
        );
        logger.flush();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.ends_with("INFO hello\n"));
        assert!(!text.contains('\x1b'));
    }
}

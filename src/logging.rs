/// Structured logging for the stop clustering service
///
/// Provides context-rich logging tagged with the pipeline stage that
/// produced each message, timestamps, and severity levels. Supports both
/// console output and file-based logging for unattended batch runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

/// The pipeline stage a log message originates from. The pipeline is a
/// strict linear flow, so the stage tag alone locates a message's origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Preprocess,
    Scale,
    Select,
    Cluster,
    Evaluate,
    Verify,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "INGEST"),
            Stage::Preprocess => write!(f, "PREP"),
            Stage::Scale => write!(f, "SCALE"),
            Stage::Select => write!(f, "SELECT"),
            Stage::Cluster => write!(f, "CLUSTER"),
            Stage::Evaluate => write!(f, "EVAL"),
            Stage::Verify => write!(f, "VERIFY"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Environment variable holding an optional log file path for the runner.
pub const LOG_PATH_ENV: &str = "STOPCLUST_LOG";

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    /// Log a message with the global logger
    fn log(&self, level: LogLevel, stage: &Stage, detail: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        // Format the log entry
        let detail_part = detail.map(|d| format!(" [{}]", d)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, stage, detail_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, detail_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, detail_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(stage: Stage, detail: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &stage, detail, message);
    }
}

/// Log a warning message
pub fn warn(stage: Stage, detail: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &stage, detail, message);
    }
}

/// Log an error message
pub fn error(stage: Stage, detail: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &stage, detail, message);
    }
}

/// Log a debug message
pub fn debug(stage: Stage, detail: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &stage, detail, message);
    }
}

// ---------------------------------------------------------------------------
// Stage Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a pipeline stage's row flow.
///
/// A stage that discards every row is reported as an error (the next stage
/// will fail on empty input); partial shrinkage is normal for the
/// preprocessor and logged at info level.
pub fn log_stage_summary(stage: Stage, rows_in: usize, rows_out: usize) {
    let message = format!("complete: {} rows in, {} rows out", rows_in, rows_out);

    if rows_out == 0 && rows_in > 0 {
        error(stage, None, &message);
    } else {
        info(stage, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_stage_tags_are_distinct() {
        // Tags appear in log files; two stages sharing a tag would make
        // grep-based triage ambiguous.
        let tags = [
            Stage::Ingest.to_string(),
            Stage::Preprocess.to_string(),
            Stage::Scale.to_string(),
            Stage::Select.to_string(),
            Stage::Cluster.to_string(),
            Stage::Evaluate.to_string(),
            Stage::Verify.to_string(),
            Stage::System.to_string(),
        ];
        let mut seen = std::collections::HashSet::new();
        for tag in &tags {
            assert!(seen.insert(tag), "duplicate stage tag '{}'", tag);
        }
    }

    #[test]
    fn test_logging_without_init_is_a_no_op() {
        // Library users may never call init_logger; logging must not panic.
        info(Stage::Preprocess, Some("stop 12"), "grouped");
        warn(Stage::Select, None, "skipped candidate");
        log_stage_summary(Stage::Ingest, 100, 97);
    }
}

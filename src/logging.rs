use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

const DEFAULT_LOG_FILTER: &str = "warn,quip=info";
const DEFAULT_LOG_FILE_PATH: &str = "logs/quip.log";

// Keeps the non-blocking appender's worker alive for the process lifetime.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
    Both,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogSettings {
    json: bool,
    output: LogOutput,
    file_path: PathBuf,
}

impl LogSettings {
    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let json = get_var("LOG_FORMAT")
            .map(|value| value.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let output = match get_var("LOG_OUTPUT").as_deref().map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("file") => LogOutput::File,
            Some(value) if value.eq_ignore_ascii_case("both") => LogOutput::Both,
            _ => LogOutput::Stderr,
        };
        let file_path = get_var("LOG_FILE_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH));

        Self {
            json,
            output,
            file_path,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn open_file_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::ffi::OsStr::new("quip.log"));

    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn select_writer(settings: &LogSettings) -> BoxMakeWriter {
    match settings.output {
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::File | LogOutput::Both => match open_file_writer(&settings.file_path) {
            Ok((file_writer, guard)) => {
                let _ = FILE_GUARD.set(guard);
                if settings.output == LogOutput::Both {
                    BoxMakeWriter::new(io::stderr.and(file_writer))
                } else {
                    BoxMakeWriter::new(file_writer)
                }
            }
            Err(err) => {
                eprintln!(
                    "quip: cannot open log file '{}': {}; logging to stderr",
                    settings.file_path.display(),
                    err
                );
                BoxMakeWriter::new(io::stderr)
            }
        },
    }
}

/// Installs the global subscriber. Never fails: an unusable log file falls
/// back to stderr, and a second initialization is silently ignored.
pub fn init() {
    let settings = LogSettings::from_env_with(|key| env::var(key).ok());
    let writer = select_writer(&settings);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer);

    let result = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    let _ = result;
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{DEFAULT_LOG_FILE_PATH, LogOutput, LogSettings};

    fn settings_from_pairs(pairs: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        LogSettings::from_env_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_pretty_stderr_logging() {
        let settings = settings_from_pairs(&[]);
        assert!(!settings.json);
        assert_eq!(settings.output, LogOutput::Stderr);
        assert_eq!(settings.file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }

    #[test]
    fn json_format_is_recognized_case_insensitively() {
        assert!(settings_from_pairs(&[("LOG_FORMAT", "json")]).json);
        assert!(settings_from_pairs(&[("LOG_FORMAT", " JSON ")]).json);
        assert!(!settings_from_pairs(&[("LOG_FORMAT", "pretty")]).json);
        assert!(!settings_from_pairs(&[("LOG_FORMAT", "unknown")]).json);
    }

    #[test]
    fn output_accepts_file_and_both() {
        assert_eq!(
            settings_from_pairs(&[("LOG_OUTPUT", "file")]).output,
            LogOutput::File
        );
        assert_eq!(
            settings_from_pairs(&[("LOG_OUTPUT", " BOTH ")]).output,
            LogOutput::Both
        );
    }

    #[test]
    fn output_falls_back_to_stderr_for_unknown_values() {
        assert_eq!(
            settings_from_pairs(&[("LOG_OUTPUT", "syslog")]).output,
            LogOutput::Stderr
        );
    }

    #[test]
    fn blank_file_path_uses_the_default() {
        let settings = settings_from_pairs(&[("LOG_FILE_PATH", "   ")]);
        assert_eq!(settings.file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }

    #[test]
    fn explicit_file_path_is_preserved() {
        let settings = settings_from_pairs(&[("LOG_FILE_PATH", "custom/quip.log")]);
        assert_eq!(settings.file_path, PathBuf::from("custom/quip.log"));
    }
}

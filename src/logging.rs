use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info_span, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_FILTER: &str = "chatpane=info";

/// Where log lines go
pub enum LogTarget {
    /// Append to a file; used while the chat screen owns the terminal
    File(PathBuf),
    Stderr,
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = match target {
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed.map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {}", err))
}

/// Span tagging every log line of one run with a fresh id
pub fn session_span() -> Span {
    info_span!("session", id = %Uuid::new_v4())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_log_file_is_created_with_parents_and_appended() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("chatpane.log");

        let mut file = open_log_file(&path)?;
        writeln!(file, "first")?;
        drop(file);

        let mut file = open_log_file(&path)?;
        writeln!(file, "second")?;
        drop(file);

        assert_eq!(fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn test_log_file_in_missing_location_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "")?;

        assert!(open_log_file(&blocker.join("chatpane.log")).is_err());
        Ok(())
    }

    #[test]
    fn test_session_span_carries_an_id() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = session_span();
            assert_eq!(span.metadata().map(|m| m.name()), Some("session"));
            assert!(span.field("id").is_some());
            assert_ne!(span.id(), session_span().id());
        });
    }
}

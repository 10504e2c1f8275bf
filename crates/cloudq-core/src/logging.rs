//! Logging init: file under XDG state dir, or graceful fallback to stderr.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,cloudq=debug";

/// Log sink: the log file, or stderr when the file handle cannot be cloned.
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize structured logging to `~/.local/state/cloudq/cloudq.log`.
/// Returns Err when the state dir is unwritable so the caller can fall back to stderr.
pub fn init_logging() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cloudq")?;
    let log_dir = xdg_dirs.get_state_home().join("cloudq");

    fs::create_dir_all(&log_dir)?;
    let log_file_path: PathBuf = log_dir.join("cloudq.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("cloudq logging initialized at {}", log_file_path.display());
    Ok(log_file_path)
}

/// Initialize logging to stderr only. Use when [`init_logging`] fails.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

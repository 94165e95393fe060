use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Local wall-clock timestamps for log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Append-only log file shared by every writer the subscriber makes
#[derive(Clone)]
pub struct LogFile {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl LogFile {
    /// Open a timestamped log file in `dir`, creating the directory
    pub fn create_in(dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("binlookup_{}.log", timestamp));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.lock() {
            Ok(mut file) => file.write(buf),
            // A writer panicked mid-line; drop the line rather than the process
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Default filter directive: `RUST_LOG` wins, then `--verbose`
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "binlist_lookup=debug,binlookup=debug,api_client=debug,config=debug,cli=debug"
    } else {
        "warn"
    }
}

/// Log file for a verbose run. Quiet runs never touch the log directory.
pub fn open_log_file<F>(verbose: bool, log_dir: F) -> Option<LogFile>
where
    F: FnOnce() -> anyhow::Result<PathBuf>,
{
    if !verbose {
        return None;
    }
    let dir = log_dir().ok()?;
    LogFile::create_in(&dir).ok()
}

/// Initialize tracing: compact lines on stderr, plus a log file on verbose
/// runs. Returns the log file path.
pub fn init_tracing(verbose: bool) -> Option<PathBuf> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();

    let log_file = open_log_file(verbose, crate::utils::app_paths::AppPaths::log_dir);
    let log_path = log_file.as_ref().map(|f| f.path().to_path_buf());

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_target(true)
            .with_ansi(false)
            .with_timer(LocalTimer)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    tracing::debug!(target: "cli", "Logging initialized, file: {:?}", log_path);
    log_path
}

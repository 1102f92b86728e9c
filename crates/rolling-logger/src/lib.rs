//! Rolling Logger
//!
//! Keeps the most recent log lines in a circular buffer and mirrors them to
//! `<dir>/<app>.log`. The file is rewritten from the buffer whenever enough
//! lines have been appended, so it never grows much past the buffer capacity.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Lines kept in memory (and in the file after compaction)
pub const DEFAULT_CAPACITY: usize = 1000;

static LOGGER: OnceLock<Arc<Shared>> = OnceLock::new();

/// Logger errors
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "Logger already initialized"),
            LoggerError::NotInitialized => write!(f, "Logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Fixed-size line buffer, oldest lines evicted first
#[derive(Debug)]
pub struct RollingBuffer {
    capacity: usize,
    lines: VecDeque<String>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug)]
struct State {
    buffer: RollingBuffer,
    appended_since_compact: usize,
}

/// Buffer + backing file
#[derive(Debug)]
struct Shared {
    path: PathBuf,
    state: Mutex<State>,
}

impl Shared {
    /// Opens the log file, seeding the buffer with its tail
    fn open(path: PathBuf, capacity: usize) -> io::Result<Self> {
        let mut buffer = RollingBuffer::new(capacity);
        if path.exists() {
            for line in fs::read_to_string(&path)?.lines() {
                buffer.push(line.to_string());
            }
        }
        Ok(Self {
            path,
            state: Mutex::new(State { buffer, appended_since_compact: 0 }),
        })
    }

    fn append(&self, text: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        for line in text.lines().filter(|l| !l.is_empty()) {
            state.buffer.push(line.to_string());
            writeln!(file, "{}", line)?;
            state.appended_since_compact += 1;
        }

        if state.appended_since_compact >= state.buffer.capacity {
            let mut file = File::create(&self.path)?;
            for line in state.buffer.lines.iter() {
                writeln!(file, "{}", line)?;
            }
            state.appended_since_compact = 0;
        }
        Ok(())
    }

    fn recent(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.buffer.lines()
    }
}

/// Writer handed to the fmt layer for each event
pub struct RollingWriter {
    shared: Arc<Shared>,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.shared.append(&String::from_utf8_lossy(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct RollingMakeWriter {
    shared: Arc<Shared>,
}

impl<'a> MakeWriter<'a> for RollingMakeWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { shared: self.shared.clone() }
    }
}

/// Local wall-clock timestamps
struct ChronoTimer;

impl FormatTime for ChronoTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with_capacity(log_dir, app_name, DEFAULT_CAPACITY)
}

pub fn init_logger_with_capacity(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    capacity: usize,
) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    fs::create_dir_all(log_dir.as_ref())?;
    let path = log_dir.as_ref().join(format!("{}.log", app_name));
    let shared = Arc::new(Shared::open(path, capacity)?);
    LOGGER
        .set(shared.clone())
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    // Also bridges the `log` facade into tracing
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_timer(ChronoTimer)
        .with_writer(RollingMakeWriter { shared })
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    log::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    log::error!("{}", msg);
    Ok(())
}

/// Lines currently held in the buffer, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|shared| shared.recent()).unwrap_or_default()
}

/// Path of the active log file
pub fn log_file_path() -> Option<PathBuf> {
    LOGGER.get().map(|shared| shared.path.clone())
}

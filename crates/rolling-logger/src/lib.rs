//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to a size-rotated log file and
//! keeps the most recent lines in a circular buffer, so the worker can hand
//! recent diagnostics to the UI without reading the file back.
//!
//! Records emitted through the `log` facade are bridged into `tracing`.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;

/// Rotate once the active file grows past this size
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
/// Rotated files kept next to the active one
pub const DEFAULT_KEEP_FILES: usize = 3;
/// Lines held in memory
pub const DEFAULT_RECENT_LINES: usize = 500;

static RECENT: OnceLock<Arc<Mutex<RecentLines>>> = OnceLock::new();

/// Size-rotated log file: `name.log`, `name.log.1` .. `name.log.{keep}`
pub struct RollingFile {
    dir: PathBuf,
    base_name: String,
    max_bytes: u64,
    keep: usize,
    file: File,
    written: u64,
}

impl RollingFile {
    pub fn open(dir: &Path, base_name: &str, max_bytes: u64, keep: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", base_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            base_name: base_name.to_string(),
            max_bytes,
            keep,
            file,
            written,
        })
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.keep == 0 {
            self.file = File::create(self.active_path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.keep);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.keep).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(self.active_path(), self.rotated_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Fixed-capacity buffer of the latest log lines
pub struct RecentLines {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RecentLines {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Last `n` lines, oldest first
    pub fn tail(&self, n: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Writer handed to the fmt layer; fans out to the file and the ring
#[derive(Clone)]
pub struct LogWriter {
    file: Arc<Mutex<RollingFile>>,
    recent: Arc<Mutex<RecentLines>>,
}

impl LogWriter {
    pub fn new(file: RollingFile, recent: Arc<Mutex<RecentLines>>) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
            recent,
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let mut file = self
                .file
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
            file.write_all(buf)?;
        }

        if let Ok(mut recent) = self.recent.lock() {
            for line in String::from_utf8_lossy(buf).lines() {
                if !line.trim().is_empty() {
                    recent.push(line.to_string());
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Initialize the global logger writing `{app_name}.log` under `log_dir`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    let mut file = RollingFile::open(&log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_KEEP_FILES)
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    writeln!(
        file,
        "--- {} started at {} ---",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    )
    .map_err(|e| format!("Failed to write log header: {}", e))?;

    let recent = Arc::new(Mutex::new(RecentLines::new(DEFAULT_RECENT_LINES)));
    let writer = LogWriter::new(file, recent.clone());

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    // Helpers report initialized only once the subscriber is live
    let _ = RECENT.set(recent);
    Ok(())
}

pub fn info(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", message);
    Ok(())
}

/// Most recent `n` lines written by the logger (empty before init)
pub fn recent_lines(n: usize) -> Vec<String> {
    RECENT
        .get()
        .and_then(|recent| recent.lock().ok().map(|r| r.tail(n)))
        .unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    if RECENT.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

//! Size-rotated log file plus a ring of recent lines.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone)]
pub struct RollingOptions {
    /// Rotate once the active file would grow past this
    pub max_file_bytes: u64,
    /// Rotated generations kept next to the active file
    pub max_files: usize,
    /// Lines kept in memory for `recent_lines`
    pub recent_capacity: usize,
    pub level: tracing::Level,
}

impl Default for RollingOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            recent_capacity: 200,
            level: tracing::Level::INFO,
        }
    }
}

struct RollingState {
    path: PathBuf,
    file: File,
    written: u64,
    options: RollingOptions,
    recent: VecDeque<String>,
    /// Bytes of a line not yet terminated
    partial: String,
}

/// Cloneable handle; all clones append to the same file
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingState>>,
}

impl RollingWriter {
    /// Open (or continue) `<dir>/<app_name>.log`
    pub fn open(dir: &Path, app_name: &str, options: RollingOptions) -> Result<Self, String> {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create log dir: {}", e))?;
        let path = dir.join(format!("{}.log", app_name));
        let file = open_append(&path).map_err(|e| format!("Failed to open log file: {}", e))?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            inner: Arc::new(Mutex::new(RollingState {
                path,
                file,
                written,
                recent: VecDeque::with_capacity(options.recent_capacity),
                options,
                partial: String::new(),
            })),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.lock().recent.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, RollingState> {
        // A panic mid-write must not silence logging for the rest of the run
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RollingState {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.options.max_file_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        self.remember(buf);
        Ok(())
    }

    fn rotated(&self, generation: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", generation));
        PathBuf::from(name)
    }

    /// app.log -> app.log.1 -> app.log.2 ... oldest dropped
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.options.max_files == 0 {
            self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated(self.options.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for generation in (1..self.options.max_files).rev() {
            let from = self.rotated(generation);
            if from.exists() {
                fs::rename(&from, self.rotated(generation + 1))?;
            }
        }
        fs::rename(&self.path, self.rotated(1))?;

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        if self.options.recent_capacity == 0 {
            return;
        }
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.recent.len() == self.options.recent_capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

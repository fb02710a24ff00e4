//! Host adapters: physical memory from `/proc/meminfo` and filesystem
//! queries against the local disk.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{HostEnvironment, MemoryError, MemoryProbe};
use crate::sensors::memory::{MemoryStatus, parse_meminfo};

const MEMINFO_PATH: &str = "/proc/meminfo";

/// [`MemoryProbe`] backed by a meminfo-format file.
pub struct ProcMemoryProbe {
    path: PathBuf,
}

impl ProcMemoryProbe {
    pub fn new() -> Self {
        Self::at(MEMINFO_PATH)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for ProcMemoryProbe {
    fn memory_status(&self) -> Result<MemoryStatus, MemoryError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MemoryError::Unavailable,
            _ => MemoryError::Io(e.to_string()),
        })?;
        parse_meminfo(&text)
    }
}

/// [`HostEnvironment`] for the local machine.
pub struct LocalHost {
    app_dir: PathBuf,
}

impl LocalHost {
    /// Use the executable's directory, falling back to the working directory.
    pub fn discover() -> Self {
        let app_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        info!("HOST | app dir {}", app_dir.display());
        Self { app_dir }
    }

    pub fn with_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }
}

impl HostEnvironment for LocalHost {
    fn app_dir(&self) -> PathBuf {
        self.app_dir.clone()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

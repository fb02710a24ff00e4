//! Physical memory statistics.
//!
//! `used = total - available`, reported in GiB with a percentage.
//! On Linux hosts the numbers come from `/proc/meminfo` (values in kB).

use crate::app::ports::MemoryError;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryStatus {
    pub fn total_gb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_GB
    }

    pub fn used_gb(&self) -> f64 {
        self.total_gb() - self.available_bytes as f64 / BYTES_PER_GB
    }

    /// Zero when the total is unknown.
    pub fn usage_percent(&self) -> f64 {
        let total = self.total_gb();
        if total <= 0.0 {
            return 0.0;
        }
        self.used_gb() / total * 100.0
    }
}

/// Parse the `MemTotal` and `MemAvailable` lines of a meminfo document.
pub fn parse_meminfo(text: &str) -> Result<MemoryStatus, MemoryError> {
    let mut total_kb = None;
    let mut available_kb = None;

    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total_kb,
            "MemAvailable" => &mut available_kb,
            _ => continue,
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| MemoryError::Parse(format!("bad value for {}", key.trim())))?;
        *slot = Some(value);
    }

    match (total_kb, available_kb) {
        (Some(total), Some(available)) => Ok(MemoryStatus {
            total_bytes: total * 1024,
            available_bytes: available.min(total) * 1024,
        }),
        _ => Err(MemoryError::Parse("MemTotal/MemAvailable missing".into())),
    }
}

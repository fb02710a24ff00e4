//! Newline-delimited frame codec.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────┬────┐
//! │ UTF-8 JSON envelope (N B)│ \n │
//! └──────────────────────────┴────┘
//! ```
//!
//! The decoder accumulates incoming bytes into a bounded buffer and yields
//! complete lines. A single read may carry part of a line, or several lines
//! concatenated; every complete line is delivered.

use heapless::Vec;
use log::warn;

/// Maximum line size (protects against memory exhaustion).
pub const MAX_LINE_SIZE: usize = 16 * 1024;

/// Streaming line decoder.
pub struct LineDecoder {
    buf: Vec<u8, MAX_LINE_SIZE>,
    /// Set after an overflow; bytes are dropped until the next newline.
    discarding: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// Feed bytes into the decoder, calling `on_line` once per complete,
    /// non-blank line (trailing `\r` stripped).
    ///
    /// Oversized and non-UTF-8 lines are dropped with a warning.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(&str)) {
        for &byte in data {
            if byte == b'\n' {
                if self.discarding {
                    self.discarding = false;
                } else {
                    self.emit(&mut on_line);
                }
                self.buf.clear();
                continue;
            }

            if self.discarding {
                continue;
            }

            if self.buf.push(byte).is_err() {
                warn!("CODEC: line exceeds {} bytes, discarding", MAX_LINE_SIZE);
                self.buf.clear();
                self.discarding = true;
            }
        }
    }

    /// Deliver whatever is buffered as a final line (end of stream).
    pub fn finish(&mut self, mut on_line: impl FnMut(&str)) {
        if !self.discarding {
            self.emit(&mut on_line);
        }
        self.reset();
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }

    fn emit(&self, on_line: &mut impl FnMut(&str)) {
        let bytes = self.buf.strip_suffix(b"\r").unwrap_or(&self.buf[..]);
        match core::str::from_utf8(bytes) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => on_line(line),
            Err(_) => warn!("CODEC: dropping non-UTF-8 line ({} bytes)", bytes.len()),
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode one envelope as a newline-terminated frame.
pub fn encode_line(json: &str) -> String {
    let mut line = String::with_capacity(json.len() + 1);
    line.push_str(json);
    line.push('\n');
    line
}

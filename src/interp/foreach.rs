//! Loop engine: `foreach` records a block of lines, `endfor` replays it once
//! per matched device.
//!
//! Collection stores lines verbatim; gating never filters what gets
//! recorded. Replay is device-major, line-minor: every recorded line runs
//! once per matched device, with the placeholder token substituted by that
//! pass's device name.

use crate::directory::DeviceInfo;

/// Reserved substitution marker in replayed parameter strings
pub const PLACEHOLDER: &str = "$";

/// State of the single (non-nestable) foreach loop
#[derive(Debug, Default)]
pub struct LoopState {
    pub collecting: bool,
    pub replaying: bool,
    mask: String,
    recorded: Vec<String>,
    devices: Vec<String>,
    cmd_cursor: usize,
    device_cursor: usize,
}

impl LoopState {
    /// Begin recording a loop body. Any previous loop state is discarded;
    /// loops do not nest.
    pub fn begin_collection(&mut self, mask: &str) {
        *self = Self {
            collecting: true,
            mask: mask.to_lowercase(),
            ..Self::default()
        };
    }

    /// Record one body line (verbatim, before any substitution)
    pub fn record(&mut self, line: &str) {
        self.recorded.push(line.to_string());
    }

    /// Stop collecting, match devices against the mask, and start replay if
    /// any lines were recorded. The snapshot must already be sorted by name.
    pub fn finish_collection(&mut self, snapshot: &[DeviceInfo]) {
        self.devices = snapshot
            .iter()
            .filter(|d| !d.name.is_empty())
            .filter(|d| self.mask.is_empty() || d.name.to_lowercase().starts_with(&self.mask))
            .map(|d| d.name.clone())
            .collect();
        self.cmd_cursor = 0;
        self.device_cursor = 0;
        self.collecting = false;
        self.replaying = !self.recorded.is_empty();
    }

    /// Next line to feed back into the interpreter, with the device name for
    /// the pass it belongs to. Returns `None` when replay is over, clearing
    /// the buffer and matches.
    pub fn next_line(&mut self) -> Option<(String, String)> {
        if !self.replaying {
            return None;
        }
        if self.device_cursor >= self.devices.len() {
            *self = Self::default();
            return None;
        }
        let device = self.devices[self.device_cursor].clone();
        let line = self.recorded[self.cmd_cursor].clone();
        self.cmd_cursor += 1;
        if self.cmd_cursor >= self.recorded.len() {
            self.cmd_cursor = 0;
            self.device_cursor += 1;
        }
        Some((line, device))
    }
}

//! Scripted bus and delay doubles shared by the unit tests.

use embedded_hal::delay::DelayNs;

use crate::interface::AdnsBus;

/// Error injected by [`ScriptedBus::fail_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedError;

/// Bus double that replays a reply script and records everything the driver
/// does: bytes written, select/deselect pairing, and the live select state.
///
/// Replies are consumed one per exchange, address phases included; once the
/// script runs out every exchange returns `0x00`.
pub struct ScriptedBus<'a> {
    replies: &'a [u8],
    cursor: usize,
    written: [u8; 32],
    written_len: usize,
    pub written_total: usize,
    pub selects: usize,
    pub deselects: usize,
    pub selected: bool,
    pub fail_after: Option<usize>,
}

impl<'a> ScriptedBus<'a> {
    pub fn new(replies: &'a [u8]) -> Self {
        Self {
            replies,
            cursor: 0,
            written: [0; 32],
            written_len: 0,
            written_total: 0,
            selects: 0,
            deselects: 0,
            selected: false,
            fail_after: None,
        }
    }

    /// The first recorded written bytes, capped at the recording capacity.
    pub fn written(&self) -> &[u8] {
        &self.written[..self.written_len]
    }
}

impl AdnsBus for ScriptedBus<'_> {
    type Error = ScriptedError;

    fn select(&mut self) -> Result<(), Self::Error> {
        assert!(!self.selected, "chip selected while already selected");
        self.selected = true;
        self.selects += 1;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        assert!(self.selected, "chip deselected while not selected");
        self.selected = false;
        self.deselects += 1;
        Ok(())
    }

    fn transfer_byte(&mut self, out: u8) -> Result<u8, Self::Error> {
        assert!(self.selected, "byte exchanged while chip not selected");
        if self.fail_after == Some(self.written_total) {
            return Err(ScriptedError);
        }
        if self.written_len < self.written.len() {
            self.written[self.written_len] = out;
            self.written_len += 1;
        }
        self.written_total += 1;

        let reply = self.replies.get(self.cursor).copied().unwrap_or(0x00);
        self.cursor += 1;
        Ok(reply)
    }
}

/// Delay double accumulating every requested wait.
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self { total_ns: 0 }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

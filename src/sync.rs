//! Start sequence alignment.
//!
//! Records carry no delimiter, so a reader that joins a stream mid-record
//! stays misaligned forever. A peer can send a start sequence once before
//! its first record; everything up to and including it is discarded.

use crate::config::{ConfigError, StartSequence, MAX_START_LEN};
use crate::source::ByteSource;
use heapless::Deque;

/// Sliding-window matcher for the start sequence
pub struct StartSync {
    pattern: StartSequence,
    window: Deque<u8, MAX_START_LEN>,
    locked: bool,
}

impl StartSync {
    /// An empty pattern is locked from the start
    pub fn new(pattern: StartSequence) -> Self {
        let locked = pattern.is_empty();

        Self {
            pattern,
            window: Deque::new(),
            locked,
        }
    }

    pub fn from_slice(pattern: &[u8]) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::EmptyStartSequence);
        }

        StartSequence::from_slice(pattern)
            .map(Self::new)
            .map_err(|_| ConfigError::StartSequenceTooLong { len: pattern.len() })
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Forgets a previous match
    pub fn reset(&mut self) {
        self.window.clear();
        self.locked = self.pattern.is_empty();
    }

    /// Returns `true` once the last bytes fed equal the pattern
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.locked {
            return true;
        }

        if self.window.len() == self.pattern.len() {
            self.window.pop_front();
        }
        // Can't fail, the window is shorter than the pattern here
        self.window.push_back(byte).ok();

        if self.window.iter().eq(self.pattern.iter()) {
            debug!("start sequence found");
            self.window.clear();
            self.locked = true;
        }

        self.locked
    }

    /// Consumes bytes from `source` one at a time until locked.
    ///
    /// Returns `WouldBlock` when the source runs dry first.
    pub fn scan<S>(&mut self, source: &mut S) -> nb::Result<(), S::Error>
    where
        S: ByteSource + ?Sized,
    {
        while !self.locked {
            if source.available() == 0 {
                return Err(nb::Error::WouldBlock);
            }

            let mut byte = [0];
            source.read_exact(&mut byte).map_err(nb::Error::Other)?;
            self.feed(byte[0]);
        }

        Ok(())
    }
}

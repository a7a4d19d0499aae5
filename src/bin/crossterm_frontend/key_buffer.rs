use crossterm::event::KeyCode;
use std::{
    collections::VecDeque,
    sync::Mutex,
    time::{Duration, Instant},
};

/// A thread-safe buffer for storing keys and timestamps.
/// For use with a producer of keys and a consumer of keys.
/// Wrap it in an `std::sync::Arc` and you are good to go.
pub struct KeyBuffer {
    timeout: Duration,
    buffer: Mutex<VecDeque<(KeyCode, Instant)>>,
}

impl KeyBuffer {

    /// Create a new `KeyBuffer`, but don't return keypresses that are older than `timeout`.
    pub fn new(timeout: Duration) -> KeyBuffer {
        KeyBuffer {
            timeout,
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Push a new keypress to the buffer.
    pub fn push(&self, key_code: KeyCode) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push_back((key_code, Instant::now()));
        }
    }

    /// Take every buffered keypress that is fresh enough, oldest first.
    pub fn drain(&self) -> Vec<KeyCode> {
        match self.buffer.lock() {
            Ok(mut buffer) => buffer
                .drain(..)
                .filter(|(_, ts)| ts.elapsed() < self.timeout)
                .map(|(kc, _)| kc)
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

//! Outbound user messages

use std::sync::{Arc, Mutex};

/// Platform adapter delivering text to a user
pub trait MessageSink: Send {
    fn send(&mut self, recipient: &str, message: &str);
}

/// Writes messages to the log at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn send(&mut self, recipient: &str, message: &str) {
        log::info!("[{}] {}", recipient, message);
    }
}

/// Collects messages in a shared buffer. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Most recent message, if any
    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }

    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

impl MessageSink for BufferSink {
    fn send(&mut self, _recipient: &str, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

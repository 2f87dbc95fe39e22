//! Undo history kept across reconnects

use std::collections::HashMap;

use crate::queue::UndoQueue;

/// Parks a player's history by name while they are offline
#[derive(Debug, Default)]
pub struct OfflineUndoHandler {
    parked: HashMap<String, UndoQueue>,
}

impl OfflineUndoHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `history` for `name`, replacing anything stored before
    pub fn park(&mut self, name: &str, history: UndoQueue) {
        log::debug!("Parked {} history entries for {}", history.len(), name);
        self.parked.insert(name.to_string(), history);
    }

    /// Take back the history stored for `name`
    pub fn restore(&mut self, name: &str) -> Option<UndoQueue> {
        self.parked.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parked.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_park_and_restore() {
        let mut handler = OfflineUndoHandler::new();
        handler.park("alice", UndoQueue::new(7));
        assert!(handler.contains("alice"));

        let history = handler.restore("alice").unwrap();
        assert_eq!(history.depth(), 7);
        assert!(handler.restore("alice").is_none());
        assert!(handler.is_empty());
    }
}

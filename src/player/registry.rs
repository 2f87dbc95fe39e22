//! Connected players

use crate::core::{Error, Result};
use super::{Player, Sniper};

/// Players in connection order. Turn allocation walks this order.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player, replacing any existing session with the same name in
    /// place.
    pub fn insert(&mut self, player: Player) -> Option<Player> {
        let name = player.name().to_string();
        match self.position(&name) {
            Some(index) => Some(std::mem::replace(&mut self.players[index], player)),
            None => {
                self.players.push(player);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Player> {
        let index = self.position(name)?;
        Some(self.players.remove(index))
    }

    pub fn get(&self, name: &str) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::UnknownPlayer(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::UnknownPlayer(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Players with at least one pending queue
    pub fn pending_count(&self) -> usize {
        self.players.iter().filter(|p| p.has_pending()).count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }
}

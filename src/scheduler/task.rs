//! Per-turn distribution of the global write budget

use crate::config::Configuration;
use crate::core::Error;
use crate::player::{Player, PlayerRegistry, Sniper};
use crate::queue::ExecutionState;
use crate::world::WorldRegistry;

const FAILURE_MESSAGE: &str = "An error occurred while applying your changes, see console for more details.";

/// Summary of one scheduler turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnStats {
    /// Players that received an allocation
    pub players_served: usize,
    /// Voxel writes performed
    pub changes: usize,
    /// Queues that finished and were dequeued
    pub queues_finished: usize,
    /// Queues force-dequeued after an error or a stall
    pub queues_dropped: usize,
}

enum Step {
    Progress,
    Finished,
    Stalled,
    Failed(Error),
}

/// Drains pending change queues a slice at a time.
///
/// Each turn shares `changes_per_turn` writes among the players that have
/// pending work, in registry order. Every served player gets at least one
/// write. Leftover allocation rolls forward to later players, which gives
/// earlier players a slight edge within a turn.
#[derive(Debug, Clone)]
pub struct ChangeQueueTask {
    changes_per_turn: usize,
}

impl ChangeQueueTask {
    pub fn new(changes_per_turn: usize) -> Self {
        Self { changes_per_turn }
    }

    /// Budget taken from `blockChangesPerSecond / turnsPerSecond`
    pub fn from_config(config: &Configuration) -> Self {
        Self::new(config.changes_per_turn().max(0) as usize)
    }

    pub fn changes_per_turn(&self) -> usize {
        self.changes_per_turn
    }

    /// Run one turn over every player with pending work
    pub fn run_one_turn(&self, players: &mut PlayerRegistry, worlds: &mut WorldRegistry) -> TurnStats {
        let mut stats = TurnStats::default();
        let mut n_left = players.pending_count();
        if n_left == 0 {
            return stats;
        }

        let mut remaining = self.changes_per_turn as i64;
        for player in players.iter_mut() {
            if !player.has_pending() {
                continue;
            }
            let allocation = (remaining / n_left as i64).max(1) as usize;
            n_left = n_left.saturating_sub(1);

            let actual = Self::serve(player, worlds, allocation, &mut stats);
            stats.players_served += 1;
            stats.changes += actual;
            remaining -= actual as i64;
            if remaining <= 0 {
                break;
            }
        }

        if stats.changes > 0 {
            log::trace!(
                "Turn applied {} changes for {} players",
                stats.changes,
                stats.players_served
            );
        }
        stats
    }

    /// Drive the player's head queues until `allocation` writes are spent or
    /// nothing is left. Returns the writes performed.
    fn serve(player: &mut Player, worlds: &mut WorldRegistry, allocation: usize, stats: &mut TurnStats) -> usize {
        let mut actual = 0;
        while actual < allocation {
            let step = {
                let Some(queue) = player.peek_next_pending_mut() else {
                    break;
                };
                let before = queue.state();
                let performed = match worlds.get_mut(queue.world_name()) {
                    Ok(world) => queue.perform(world, allocation - actual),
                    Err(e) => Err(e),
                };
                match performed {
                    Ok(count) => {
                        actual += count;
                        if queue.is_finished() {
                            Step::Finished
                        } else if count == 0 && queue.state() == before && before != ExecutionState::Unstarted {
                            Step::Stalled
                        } else {
                            Step::Progress
                        }
                    }
                    Err(e) => Step::Failed(e),
                }
            };

            match step {
                Step::Progress => {}
                Step::Finished => {
                    player.remove_next_pending(false);
                    stats.queues_finished += 1;
                }
                Step::Stalled => {
                    log::warn!("Dropping change queue for {} that made no progress", player.name());
                    player.remove_next_pending(true);
                    stats.queues_dropped += 1;
                }
                Step::Failed(e) => {
                    log::error!("Error while performing change operation for {}: {}", player.name(), e);
                    player.remove_next_pending(true);
                    player.send_message(FAILURE_MESSAGE);
                    stats.queues_dropped += 1;
                    break;
                }
            }
        }
        actual
    }
}

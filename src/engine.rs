//! Engine composition root
//!
//! Owns configuration, registries, connected players, worlds and the
//! scheduler. Every user-facing command goes through here.

use std::time::Duration;

use glam::IVec3;

use crate::brush::{keys, BrushRegistry, ExecutionResult, Scope, Value};
use crate::config::{defaults, Configuration};
use crate::core::{Error, Result};
use crate::material::MaterialRegistry;
use crate::player::{MessageSink, OfflineUndoHandler, Player, PlayerRegistry, Sniper};
use crate::queue::UndoQueue;
use crate::scheduler::{ChangeQueueTask, TurnStats};
use crate::shape::Direction;
use crate::world::{World, WorldRegistry};

const BRUSH_ERROR_MESSAGE: &str = "Error executing brush, see console for more details.";

pub struct Engine {
    config: Configuration,
    materials: MaterialRegistry,
    brushes: BrushRegistry,
    players: PlayerRegistry,
    worlds: WorldRegistry,
    scheduler: ChangeQueueTask,
    offline: OfflineUndoHandler,
}

impl Engine {
    /// Engine with the default materials and built-in brushes
    pub fn new(config: Configuration) -> Self {
        let scheduler = ChangeQueueTask::from_config(&config);
        log::info!(
            "Engine ready: {} changes per turn, {} turns per second",
            scheduler.changes_per_turn(),
            config.turns_per_second()
        );
        Self {
            config,
            materials: MaterialRegistry::with_defaults(),
            brushes: BrushRegistry::with_defaults(),
            players: PlayerRegistry::new(),
            worlds: WorldRegistry::new(),
            scheduler,
            offline: OfflineUndoHandler::new(),
        }
    }

    /// Replace the material registry (builder pattern)
    pub fn with_materials(mut self, materials: MaterialRegistry) -> Self {
        self.materials = materials;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn brushes(&self) -> &BrushRegistry {
        &self.brushes
    }

    pub fn brushes_mut(&mut self) -> &mut BrushRegistry {
        &mut self.brushes
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn player_mut(&mut self, name: &str) -> Result<&mut Player> {
        self.players.get_mut(name)
    }

    pub fn add_world(&mut self, name: &str, world: Box<dyn World>) {
        self.worlds.insert(name, world);
    }

    pub fn world(&self, name: &str) -> Result<&dyn World> {
        self.worlds.get(name)
    }

    /// Time between scheduler turns
    pub fn turn_period(&self) -> Duration {
        Duration::from_millis((1000 / self.config.turns_per_second()).max(1) as u64)
    }

    /// Create a session for `name` in `world` with default settings. Undo
    /// history parked at the last disconnect is restored.
    pub fn connect_player(&mut self, name: &str, world: &str, sink: Box<dyn MessageSink>) -> Result<()> {
        self.worlds.get(world)?;

        let mut player = Player::new(name, world, self.config.undo_history_size(), sink);
        player.reset_settings(&self.brushes, &self.config, &self.materials);
        if let Some(history) = self.offline.restore(name) {
            log::info!("Restored {} history entries for {}", history.len(), name);
            player.replace_history(history);
        }

        if self.players.insert(player).is_some() {
            log::warn!("{} reconnected while still connected; old session replaced", name);
        }
        log::info!("{} connected to '{}'", name, world);
        Ok(())
    }

    /// End a session, parking its undo history. Pending changes are dropped.
    pub fn disconnect_player(&mut self, name: &str) -> Result<()> {
        let mut player = self
            .players
            .remove(name)
            .ok_or_else(|| Error::UnknownPlayer(name.to_string()))?;
        if player.has_pending() {
            log::warn!("{} disconnected with {} pending changes", name, player.pending_len());
        }
        let depth = player.history().depth();
        let history = player.replace_history(UndoQueue::new(depth));
        self.offline.park(name, history);
        log::info!("{} disconnected", name);
        Ok(())
    }

    /// Run the player's brush against `target`.
    ///
    /// A brush that fails at runtime is reported to the player and logged;
    /// the call still succeeds with [`ExecutionResult::Abort`].
    pub fn snipe(&mut self, name: &str, target: IVec3, face: Direction) -> Result<ExecutionResult> {
        let player = self.players.get_mut(name)?;
        let world = self.worlds.get(player.world_name())?;
        match player.snipe(world, target, face) {
            Ok(result) => Ok(result),
            Err(e) => {
                log::error!("Error executing brush '{}' for {}: {}", player.chain().name(), name, e);
                player.send_message(BRUSH_ERROR_MESSAGE);
                Ok(ExecutionResult::Abort)
            }
        }
    }

    /// Replace the player's brush chain
    pub fn set_brush(&mut self, name: &str, brush: &str) -> Result<()> {
        let player = self.players.get_mut(name)?;
        player.set_brush(brush, &self.brushes);
        Ok(())
    }

    /// Select the player's material by name. Returns false when the name is
    /// not registered.
    pub fn set_material(&mut self, name: &str, material_name: &str) -> Result<bool> {
        let player = self.players.get_mut(name)?;
        let Some(material) = self.materials.get(material_name) else {
            let message = self.config.get_or(
                defaults::MATERIAL_NOT_FOUND_MESSAGE_KEY,
                defaults::MATERIAL_NOT_FOUND_MESSAGE.to_string(),
            );
            player.send_message(&message);
            return Ok(false);
        };

        let shown = self.materials.name_of(material).unwrap_or(material_name);
        let template = self.config.get_or(
            defaults::MATERIAL_SET_MESSAGE_KEY,
            defaults::MATERIAL_SET_MESSAGE.to_string(),
        );
        player.send_message(&template.replacen("{}", shown, 1));
        player.vars_mut().set(Scope::Global, keys::MATERIAL, material);
        Ok(true)
    }

    /// Set a global brush variable from its textual form
    pub fn set_param(&mut self, name: &str, key: &str, raw: &str) -> Result<()> {
        let player = self.players.get_mut(name)?;
        let value = Value::parse(raw);
        log::debug!("{} set {} = {:?}", name, key, value);
        player.vars_mut().set(Scope::Global, key, value);
        player.send_message(&format!("Set {} to {}", key, raw.trim()));
        Ok(())
    }

    /// Restore the player's configured defaults
    pub fn reset_settings(&mut self, name: &str) -> Result<()> {
        let player = self.players.get_mut(name)?;
        player.reset_settings(&self.brushes, &self.config, &self.materials);
        Ok(())
    }

    pub fn undo(&mut self, name: &str, n: usize) -> Result<usize> {
        Ok(self.players.get_mut(name)?.undo_history(n))
    }

    pub fn redo(&mut self, name: &str, n: usize) -> Result<usize> {
        Ok(self.players.get_mut(name)?.redo_history(n))
    }

    /// Drop the player's pending changes. Voxels already written stay and
    /// undo history is kept. Returns how many queues were dropped.
    pub fn cancel(&mut self, name: &str) -> Result<usize> {
        let player = self.players.get_mut(name)?;
        let dropped = player.clear_pending();
        log::info!("{} cancelled {} pending changes", name, dropped);
        player.send_message(&format!("Cancelled {} pending changes.", dropped));
        Ok(dropped)
    }

    /// Perform one scheduler turn
    pub fn run_one_turn(&mut self) -> TurnStats {
        self.scheduler.run_one_turn(&mut self.players, &mut self.worlds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::player::BufferSink;
    use crate::world::MemoryWorld;

    fn engine() -> (Engine, BufferSink) {
        let mut engine = Engine::new(Configuration::new());
        engine.add_world("w", Box::new(MemoryWorld::new()));
        let sink = BufferSink::new();
        engine.connect_player("alice", "w", Box::new(sink.clone())).unwrap();
        (engine, sink)
    }

    fn run_until_idle(engine: &mut Engine) {
        for _ in 0..100 {
            if engine.players().pending_count() == 0 {
                return;
            }
            engine.run_one_turn();
        }
        panic!("engine never went idle");
    }

    #[test]
    fn test_connect_applies_defaults() {
        let (engine, sink) = engine();
        let player = engine.players().get("alice").unwrap();
        assert_eq!(player.chain().name(), "snipe material");
        assert_eq!(player.history().depth(), 20);
        assert!(sink.messages().contains(&"Set material to air".to_string()));
    }

    #[test]
    fn test_connect_unknown_world() {
        let mut engine = Engine::new(Configuration::new());
        assert!(engine.connect_player("alice", "nowhere", Box::new(BufferSink::new())).is_err());
    }

    #[test]
    fn test_snipe_turn_undo() {
        let (mut engine, sink) = engine();
        assert!(engine.set_material("alice", "stone").unwrap());
        assert_eq!(sink.last().as_deref(), Some("Set material to stone"));

        engine.snipe("alice", IVec3::new(4, 5, 6), Direction::Up).unwrap();
        run_until_idle(&mut engine);
        let stone = engine.materials().get("stone").unwrap();
        assert_eq!(engine.world("w").unwrap().material_at(IVec3::new(4, 5, 6)).unwrap(), stone);

        assert_eq!(engine.undo("alice", 1).unwrap(), 1);
        run_until_idle(&mut engine);
        assert_eq!(
            engine.world("w").unwrap().material_at(IVec3::new(4, 5, 6)).unwrap(),
            Material::AIR
        );

        assert_eq!(engine.redo("alice", 1).unwrap(), 1);
        run_until_idle(&mut engine);
        assert_eq!(engine.world("w").unwrap().material_at(IVec3::new(4, 5, 6)).unwrap(), stone);
    }

    #[test]
    fn test_unknown_material_message() {
        let mut config = Configuration::new();
        config.set(defaults::MATERIAL_NOT_FOUND_MESSAGE_KEY, "No such thing").unwrap();
        let mut engine = Engine::new(config);
        engine.add_world("w", Box::new(MemoryWorld::new()));
        let sink = BufferSink::new();
        engine.connect_player("alice", "w", Box::new(sink.clone())).unwrap();

        assert!(!engine.set_material("alice", "unobtainium").unwrap());
        assert_eq!(sink.last().as_deref(), Some("No such thing"));
    }

    #[test]
    fn test_missing_parameter_queues_nothing() {
        let (mut engine, sink) = engine();
        engine.set_brush("alice", "cylinder material").unwrap();
        let result = engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap();
        assert_eq!(result, ExecutionResult::Abort);
        assert_eq!(
            sink.last().as_deref(),
            Some("Please specify a height for the cylinder: /param cylinder height=#")
        );
        assert_eq!(engine.players().pending_count(), 0);

        engine.set_param("alice", "height", "3").unwrap();
        let result = engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap();
        assert_eq!(result, ExecutionResult::Continue);
        assert_eq!(engine.players().pending_count(), 1);
    }

    #[test]
    fn test_blend_smooths_bump() {
        let (mut engine, _) = engine();
        let stone = engine.materials().get("stone").unwrap();
        let mut world = MemoryWorld::new();
        world.fill(IVec3::new(-3, -3, -3), IVec3::new(3, -1, 3), stone).unwrap();
        world.set_material(IVec3::ZERO, stone).unwrap();
        engine.add_world("w", Box::new(world));

        engine.set_brush("alice", "kernel snipe blend").unwrap();
        engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap();
        run_until_idle(&mut engine);
        // Eight air neighbors at y = 0 and nine above outvote nine stone below
        assert_eq!(engine.world("w").unwrap().material_at(IVec3::ZERO).unwrap(), Material::AIR);
    }

    #[test]
    fn test_disconnect_keeps_history() {
        let (mut engine, _) = engine();
        engine.set_material("alice", "dirt").unwrap();
        engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap();
        run_until_idle(&mut engine);

        engine.disconnect_player("alice").unwrap();
        assert!(engine.players().get("alice").is_err());

        engine.connect_player("alice", "w", Box::new(BufferSink::new())).unwrap();
        assert_eq!(engine.players().get("alice").unwrap().history().undoable(), 1);
        engine.undo("alice", 1).unwrap();
        run_until_idle(&mut engine);
        assert_eq!(engine.world("w").unwrap().material_at(IVec3::ZERO).unwrap(), Material::AIR);
    }

    #[test]
    fn test_unknown_player() {
        let (mut engine, _) = engine();
        assert!(engine.snipe("bob", IVec3::ZERO, Direction::Up).is_err());
        assert!(engine.undo("bob", 1).is_err());
        assert!(engine.cancel("bob").is_err());
    }

    fn solid_count(engine: &Engine) -> usize {
        let world = engine.world("w").unwrap();
        let mut count = 0;
        for x in -3..=3 {
            for y in -3..=3 {
                for z in -3..=3 {
                    if !world.material_at(IVec3::new(x, y, z)).unwrap().is_air() {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    #[test]
    fn test_cancel_stops_half_drained_queue() {
        let mut config = Configuration::new();
        config.set(defaults::BLOCK_CHANGES_PER_SECOND_KEY, 20).unwrap();
        config.set(defaults::TURNS_PER_SECOND_KEY, 1).unwrap();
        let mut engine = Engine::new(config);
        engine.add_world("w", Box::new(MemoryWorld::new()));
        let sink = BufferSink::new();
        engine.connect_player("alice", "w", Box::new(sink.clone())).unwrap();

        engine.set_brush("alice", "ball material").unwrap();
        engine.set_param("alice", "brushSize", "3").unwrap();
        engine.set_material("alice", "stone").unwrap();
        assert_eq!(engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap(), ExecutionResult::Continue);

        engine.run_one_turn();
        let written = solid_count(&engine);
        assert!(written > 0);
        assert_eq!(engine.players().pending_count(), 1);

        assert_eq!(engine.cancel("alice").unwrap(), 1);
        assert_eq!(sink.last().as_deref(), Some("Cancelled 1 pending changes."));
        assert_eq!(engine.players().pending_count(), 0);

        engine.run_one_turn();
        assert_eq!(solid_count(&engine), written);
        assert_eq!(engine.players().get("alice").unwrap().history().undoable(), 1);

        assert_eq!(engine.cancel("alice").unwrap(), 0);
    }

    #[test]
    fn test_huge_brush_size_is_refused() {
        let (mut engine, sink) = engine();
        engine.set_brush("alice", "ball material").unwrap();
        engine.set_param("alice", "brushSize", "3000000000").unwrap();
        let result = engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap();
        assert_eq!(result, ExecutionResult::Abort);
        assert_eq!(sink.last().as_deref(), Some("brushSize must be between 0 and 64."));
        assert_eq!(engine.players().pending_count(), 0);
    }

    #[test]
    fn test_max_brush_size_from_config() {
        let mut config = Configuration::new();
        config.set(defaults::MAX_BRUSH_SIZE_KEY, 2.0).unwrap();
        let mut engine = Engine::new(config);
        engine.add_world("w", Box::new(MemoryWorld::new()));
        engine.connect_player("alice", "w", Box::new(BufferSink::new())).unwrap();
        engine.set_brush("alice", "ball material").unwrap();

        engine.set_param("alice", "brushSize", "3").unwrap();
        assert_eq!(engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap(), ExecutionResult::Abort);
        engine.set_param("alice", "brushSize", "2").unwrap();
        assert_eq!(engine.snipe("alice", IVec3::ZERO, Direction::Up).unwrap(), ExecutionResult::Continue);
    }
}

//! Users of the engine
//!
//! [`Sniper`] is the narrow view stages and queues get of a user. [`Player`]
//! is the full session: brush variables, the active chain, pending change
//! queues and undo history.

pub mod message;
pub mod registry;
pub mod offline;

pub use message::{BufferSink, LogSink, MessageSink};
pub use registry::PlayerRegistry;
pub use offline::OfflineUndoHandler;

use std::collections::VecDeque;
use std::sync::Arc;

use glam::IVec3;

use crate::brush::{keys, BrushChain, BrushLookup, BrushRegistry, BrushVars, ExecutionResult, Scope};
use crate::config::{defaults, Configuration};
use crate::core::Result;
use crate::material::MaterialRegistry;
use crate::queue::{ChangeQueue, HistoryEntry, UndoQueue};
use crate::shape::Direction;
use crate::world::World;

/// What a brush needs from the user running it
pub trait Sniper {
    fn name(&self) -> &str;

    /// World the user is currently editing
    fn world_name(&self) -> &str;

    fn send_message(&mut self, message: &str);

    /// Append a queue to the user's pending list
    fn add_pending(&mut self, queue: Box<dyn ChangeQueue>);

    /// Record an applied change for undo
    fn add_history(&mut self, entry: HistoryEntry);

    /// Largest brush size, radius or height this user may request
    fn max_brush_size(&self) -> f64 {
        defaults::MAX_BRUSH_SIZE
    }
}

/// One user session
pub struct Player {
    name: String,
    world: String,
    vars: BrushVars,
    chain: Arc<BrushChain>,
    personal_brushes: BrushRegistry,
    pending: VecDeque<Box<dyn ChangeQueue>>,
    history: UndoQueue,
    max_brush_size: f64,
    sink: Box<dyn MessageSink>,
}

impl Player {
    pub fn new(name: &str, world: &str, history_depth: usize, sink: Box<dyn MessageSink>) -> Self {
        Self {
            name: name.to_string(),
            world: world.to_string(),
            vars: BrushVars::new(),
            chain: Arc::new(BrushChain::new()),
            personal_brushes: BrushRegistry::new(),
            pending: VecDeque::new(),
            history: UndoQueue::new(history_depth),
            max_brush_size: defaults::MAX_BRUSH_SIZE,
            sink,
        }
    }

    pub fn vars(&self) -> &BrushVars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut BrushVars {
        &mut self.vars
    }

    pub fn chain(&self) -> &BrushChain {
        &self.chain
    }

    pub fn history(&self) -> &UndoQueue {
        &self.history
    }

    /// Replace the undo history, returning the old one
    pub fn replace_history(&mut self, history: UndoQueue) -> UndoQueue {
        std::mem::replace(&mut self.history, history)
    }

    pub fn personal_brushes(&self) -> &BrushRegistry {
        &self.personal_brushes
    }

    pub fn personal_brushes_mut(&mut self) -> &mut BrushRegistry {
        &mut self.personal_brushes
    }

    /// Clear every variable and restore the configured brush, size and
    /// material.
    pub fn reset_settings(&mut self, global: &BrushRegistry, config: &Configuration, materials: &MaterialRegistry) {
        self.vars.clear();
        self.max_brush_size = config.max_brush_size();

        let brush = config.get_or(defaults::DEFAULT_BRUSH_KEY, defaults::DEFAULT_BRUSH.to_string());
        self.set_brush(&brush, global);

        let size = config.get_or(defaults::DEFAULT_BRUSH_SIZE_KEY, defaults::DEFAULT_BRUSH_SIZE);
        self.vars.set(Scope::Global, keys::BRUSH_SIZE, size);
        self.send_message(&format!("Your brush size was changed to {}", size));

        let material_name = config.get_or(
            defaults::DEFAULT_BRUSH_MATERIAL_KEY,
            defaults::DEFAULT_BRUSH_MATERIAL.to_string(),
        );
        let material = materials.get(&material_name).unwrap_or_else(|| materials.air());
        let shown = materials.name_of(material).unwrap_or("air").to_string();
        self.vars.set(Scope::Global, keys::MATERIAL, material);
        self.send_message(&format!("Set material to {}", shown));
    }

    /// Rebuild the active chain from space-separated brush names, searching
    /// personal brushes before `global`. Unknown names are reported and
    /// skipped.
    pub fn set_brush(&mut self, names: &str, global: &BrushRegistry) {
        let mut chain = BrushChain::new();
        let mut missing = Vec::new();
        {
            let lookup = BrushLookup::new(vec![&self.personal_brushes, global]);
            for name in names.split_whitespace() {
                match lookup.get(name) {
                    Some(stage) => chain.chain(stage),
                    None => missing.push(name.to_string()),
                }
            }
        }
        for name in missing {
            self.send_message(&format!("Could not find brush: {}", name));
        }
        self.send_message(&format!("Your brush has been set to {}", chain.name()));
        self.chain = Arc::new(chain);
    }

    /// Run the active chain against `target`.
    ///
    /// Runtime variables are cleared first, then seeded with the target
    /// block and face.
    pub fn snipe(&mut self, world: &dyn World, target: IVec3, face: Direction) -> Result<ExecutionResult> {
        let mut vars = std::mem::take(&mut self.vars);
        vars.clear_runtime();
        vars.set(Scope::Runtime, keys::TARGET_BLOCK, target);
        vars.set(Scope::Runtime, keys::TARGET_FACE, face);

        let chain = Arc::clone(&self.chain);
        let result = chain.run(self, world, &mut vars);
        self.vars = vars;
        result
    }

    /// Undo up to `n` changes. Returns how many were undone.
    pub fn undo_history(&mut self, n: usize) -> usize {
        let count = self.history.undo(n, &mut self.pending);
        self.send_message(&format!("{} changes undone.", count));
        count
    }

    /// Redo up to `n` changes. Returns how many were re-applied.
    pub fn redo_history(&mut self, n: usize) -> usize {
        let count = self.history.redo(n, &mut self.pending);
        self.send_message(&format!("{} changes re-applied.", count));
        count
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Head of the pending list
    pub fn peek_next_pending_mut(&mut self) -> Option<&mut Box<dyn ChangeQueue>> {
        self.pending.front_mut()
    }

    /// Drop the head queue if it has finished, or unconditionally when
    /// `force` is set.
    pub fn remove_next_pending(&mut self, force: bool) -> Option<Box<dyn ChangeQueue>> {
        let front = self.pending.front_mut()?;
        if force || front.is_finished() {
            self.pending.pop_front()
        } else {
            None
        }
    }

    /// Drop every pending queue, returning how many there were. Voxels
    /// already written stay; history is untouched.
    pub fn clear_pending(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }
}

impl Sniper for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn world_name(&self) -> &str {
        &self.world
    }

    fn send_message(&mut self, message: &str) {
        self.sink.send(&self.name, message);
    }

    fn add_pending(&mut self, mut queue: Box<dyn ChangeQueue>) {
        queue.reset();
        self.pending.push_back(queue);
    }

    fn add_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    fn max_brush_size(&self) -> f64 {
        self.max_brush_size
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("world", &self.world)
            .field("brush", &self.chain.name())
            .field("pending", &self.pending.len())
            .field("history", &self.history.len())
            .finish()
    }
}

//! Pipeline stage abstraction

use crate::core::Result;
use crate::player::Sniper;
use crate::world::World;
use super::vars::{BrushVars, FromValue};

/// Outcome of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Run the next stage
    Continue,
    /// Stop the chain; variables keep whatever was written so far
    Abort,
}

/// What a stage contributes to a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrushPartType {
    /// Writes `shape` into the runtime scope
    Shape,
    /// Reads shape and material and queues a world change
    Effect,
    Misc,
}

/// A named, stateless unit of brush logic.
///
/// Stages are shared between every player; all per-player state lives in the
/// [`BrushVars`] passed to [`Stage::run`]. Stages never mutate the world
/// directly, they hand change queues to the sniper.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> BrushPartType;

    /// One-line usage text
    fn help(&self) -> &str {
        ""
    }

    fn run(&self, sniper: &mut dyn Sniper, world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult>;
}

/// Read `key` from either scope, or tell the sniper `message` and return `None`.
pub fn require<T: FromValue>(sniper: &mut dyn Sniper, vars: &BrushVars, key: &str, message: &str) -> Option<T> {
    let value = vars.get_any(key);
    if value.is_none() {
        sniper.send_message(message);
    }
    value
}

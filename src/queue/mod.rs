//! Resumable, undoable world mutations
//!
//! A [`ChangeQueue`] is a unit of world edits executed in bounded slices by
//! the scheduler. Queues move through [`ExecutionState`] in one direction
//! only and are able to build their own inverse for the history stack.

pub mod shape_queue;
pub mod history;

pub use shape_queue::ShapeChangeQueue;
pub use history::{HistoryEntry, UndoQueue};

use std::fmt;

use crate::core::Result;
use crate::player::Sniper;
use crate::world::World;

/// Lifecycle of a change queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    /// Nothing performed yet; the next `perform` runs the seeding pass
    #[default]
    Unstarted,
    /// Seeding done; `perform` advances the cursor within its budget
    Incremental,
    /// Cursor reached the end. Terminal.
    Done,
}

/// Which voxels a shape queue writes in which pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Eligibility {
    /// Seeding pass writes nothing; the incremental pass writes every
    /// selected voxel.
    Any,
    /// Seeding pass writes selected voxels currently holding liquid or
    /// environment-reliant materials, so they stop flowing or falling before
    /// the bulk edit. The incremental pass writes every other selected voxel.
    #[default]
    SettleUnstable,
}

/// A resumable unit of world edits.
pub trait ChangeQueue: Send + fmt::Debug {
    /// Name of the player that owns this queue
    fn owner(&self) -> &str;

    /// Name of the world this queue edits
    fn world_name(&self) -> &str;

    fn state(&self) -> ExecutionState;

    /// Perform up to `budget` writes and return how many happened.
    ///
    /// The seeding pass (first call from [`ExecutionState::Unstarted`]) is not
    /// bounded by `budget`. Every later call writes at most `budget` voxels and
    /// never revisits a voxel.
    fn perform(&mut self, world: &mut dyn World, budget: usize) -> Result<usize>;

    /// True once every voxel has been visited. Moves the state to
    /// [`ExecutionState::Done`] the first time it holds.
    fn is_finished(&mut self) -> bool;

    /// Build a queue that undoes this one, reading the world as it is now.
    fn invert(&self, world: &dyn World) -> Result<Box<dyn ChangeQueue>>;

    /// Back to [`ExecutionState::Unstarted`] with the cursor at the start.
    fn reset(&mut self);

    fn boxed_clone(&self) -> Box<dyn ChangeQueue>;
}

impl Clone for Box<dyn ChangeQueue> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Submit a queue: invert it against the current world, reset it, hand it to
/// the owner's pending list and record the inverse in the owner's history.
pub fn flush(mut queue: Box<dyn ChangeQueue>, world: &dyn World, owner: &mut dyn Sniper) -> Result<()> {
    let inverse = queue.invert(world)?;
    queue.reset();
    let redo = queue.boxed_clone();
    log::debug!(
        "{} queued a change in '{}'",
        owner.name(),
        queue.world_name()
    );
    owner.add_pending(queue);
    owner.add_history(HistoryEntry::new(inverse, redo));
    Ok(())
}

//! Brushwork - incremental, undoable voxel editing
//!
//! Users run brushes that describe a change; the change becomes a resumable
//! queue drained a slice at a time by a fair, rate-limited scheduler, so
//! large edits never stall the world.

pub mod core;
pub mod config;
pub mod material;
pub mod shape;
pub mod world;
pub mod queue;
pub mod brush;
pub mod player;
pub mod scheduler;
pub mod engine;

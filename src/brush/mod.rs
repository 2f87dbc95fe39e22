//! Brush pipeline
//!
//! A brush is a [`BrushChain`] of [`Stage`]s. Shape stages describe *where*
//! to edit, effect stages decide *what* to write and hand the result to the
//! player as a change queue. Per-player state lives in [`BrushVars`].

pub mod keys;
pub mod vars;
pub mod stage;
pub mod chain;
pub mod registry;
pub mod shapes;
pub mod effects;
pub mod blend;

pub use vars::{BrushVars, FromValue, Scope, Value};
pub use stage::{BrushPartType, ExecutionResult, Stage};
pub use chain::BrushChain;
pub use registry::{BrushLookup, BrushRegistry};

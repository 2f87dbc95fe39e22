//! Turn scheduling
//!
//! [`ChangeQueueTask`] performs one turn; [`driver`] repeats it on a tokio
//! interval.

pub mod task;
pub mod driver;

pub use task::{ChangeQueueTask, TurnStats};
pub use driver::{spawn_turns, TurnHandle};

//! Error types for the brush engine

use glam::IVec3;
use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown world: {0}")]
    UnknownWorld(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Position {0} is outside the world bounds")]
    OutOfBounds(IVec3),

    #[error("Index ({x}, {y}, {z}) is outside a {width}x{height}x{length} shape")]
    ShapeIndex {
        x: u32,
        y: u32,
        z: u32,
        width: u32,
        height: u32,
        length: u32,
    },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}

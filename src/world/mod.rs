//! World storage capability
//!
//! The engine never owns block storage. It reads and writes through the
//! [`World`] trait; [`MemoryWorld`] is the sparse in-memory implementation.

pub mod memory;

pub use memory::MemoryWorld;

use std::collections::HashMap;

use glam::IVec3;

use crate::core::{Error, Result};
use crate::material::Material;

/// Synchronous block access in integer voxel coordinates.
pub trait World: Send {
    /// Material at a position
    fn material_at(&self, pos: IVec3) -> Result<Material>;

    /// Overwrite the material at a position
    fn set_material(&mut self, pos: IVec3, material: Material) -> Result<()>;

    /// Inclusive vertical bounds `(min_y, max_y)`
    fn height_bounds(&self) -> (i32, i32) {
        (i32::MIN, i32::MAX)
    }
}

/// Worlds by name
#[derive(Default)]
pub struct WorldRegistry {
    worlds: HashMap<String, Box<dyn World>>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a world
    pub fn insert(&mut self, name: &str, world: Box<dyn World>) {
        log::info!("Registered world '{}'", name);
        self.worlds.insert(name.to_string(), world);
    }

    pub fn get(&self, name: &str) -> Result<&dyn World> {
        self.worlds
            .get(name)
            .map(|w| w.as_ref())
            .ok_or_else(|| Error::UnknownWorld(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut (dyn World + 'static)> {
        self.worlds
            .get_mut(name)
            .map(|w| w.as_mut())
            .ok_or_else(|| Error::UnknownWorld(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.worlds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

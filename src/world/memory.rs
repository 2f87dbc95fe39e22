//! Sparse in-memory world

use std::collections::HashMap;

use glam::IVec3;

use crate::core::{Error, Result};
use crate::material::Material;
use super::World;

/// Hash-map backed world. Unset positions read as air; setting air removes
/// the entry.
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    blocks: HashMap<IVec3, Material>,
    min_y: i32,
    max_y: i32,
    /// Total successful writes, for diagnostics
    writes: u64,
}

impl MemoryWorld {
    /// Unbounded world
    pub fn new() -> Self {
        Self::with_height_bounds(i32::MIN, i32::MAX)
    }

    /// World that rejects access outside `min_y..=max_y`
    pub fn with_height_bounds(min_y: i32, max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            min_y,
            max_y,
            writes: 0,
        }
    }

    /// Fill an axis-aligned box (inclusive corners)
    pub fn fill(&mut self, min: IVec3, max: IVec3, material: Material) -> Result<()> {
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    self.set_material(IVec3::new(x, y, z), material)?;
                }
            }
        }
        Ok(())
    }

    /// Number of non-air blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn check(&self, pos: IVec3) -> Result<()> {
        if pos.y < self.min_y || pos.y > self.max_y {
            return Err(Error::OutOfBounds(pos));
        }
        Ok(())
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl World for MemoryWorld {
    fn material_at(&self, pos: IVec3) -> Result<Material> {
        self.check(pos)?;
        Ok(self.blocks.get(&pos).copied().unwrap_or(Material::AIR))
    }

    fn set_material(&mut self, pos: IVec3, material: Material) -> Result<()> {
        self.check(pos)?;
        if material.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, material);
        }
        self.writes += 1;
        Ok(())
    }

    fn height_bounds(&self) -> (i32, i32) {
        (self.min_y, self.max_y)
    }
}

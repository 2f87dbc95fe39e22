//! Shapes paired with the materials to write

use glam::IVec3;

use crate::core::{Error, Result};
use crate::material::Material;
use super::Shape;

/// What to write at each selected voxel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialFill {
    /// Same material everywhere
    Uniform(Material),
    /// Per-voxel assignment by linear index; `None` means leave untouched
    Complex(Vec<Option<Material>>),
}

/// A [`Shape`] with materials assigned to its selected voxels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialShape {
    shape: Shape,
    fill: MaterialFill,
}

impl MaterialShape {
    /// Every selected voxel receives `material`
    pub fn uniform(shape: Shape, material: Material) -> Self {
        Self {
            shape,
            fill: MaterialFill::Uniform(material),
        }
    }

    /// Per-voxel materials, initially `default` everywhere
    pub fn complex(shape: Shape, default: Option<Material>) -> Self {
        let fill = MaterialFill::Complex(vec![default; shape.volume()]);
        Self { shape, fill }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn fill(&self) -> &MaterialFill {
        &self.fill
    }

    pub fn width(&self) -> u32 {
        self.shape.width()
    }

    pub fn height(&self) -> u32 {
        self.shape.height()
    }

    pub fn length(&self) -> u32 {
        self.shape.length()
    }

    pub fn origin(&self) -> IVec3 {
        self.shape.origin()
    }

    pub fn volume(&self) -> usize {
        self.shape.volume()
    }

    /// Material to write at a linear index, or `None` if the voxel is not
    /// selected or has no assignment
    pub fn material_at_index(&self, index: usize) -> Option<Material> {
        if !self.shape.get_index(index) {
            return None;
        }
        match &self.fill {
            MaterialFill::Uniform(material) => Some(*material),
            MaterialFill::Complex(materials) => materials.get(index).copied().flatten(),
        }
    }

    pub fn material_at(&self, x: u32, y: u32, z: u32) -> Option<Material> {
        if !self.shape.contains(x, y, z) {
            return None;
        }
        self.material_at_index(self.shape.index(x, y, z))
    }

    /// Assign a material to one voxel. A uniform fill is expanded to a
    /// complex one on first per-voxel assignment.
    pub fn set_material(&mut self, x: u32, y: u32, z: u32, material: Option<Material>) -> Result<()> {
        self.shape.try_get(x, y, z)?;
        let index = self.shape.index(x, y, z);
        if let MaterialFill::Uniform(uniform) = self.fill {
            self.fill = MaterialFill::Complex(vec![Some(uniform); self.shape.volume()]);
        }
        if let MaterialFill::Complex(materials) = &mut self.fill {
            materials[index] = material;
        }
        Ok(())
    }

    /// Number of voxels that will actually be written
    pub fn write_count(&self) -> usize {
        (0..self.volume())
            .filter(|&index| self.material_at_index(index).is_some())
            .count()
    }

    /// Build a complex shape from explicit per-index materials.
    pub fn from_materials(shape: Shape, materials: Vec<Option<Material>>) -> Result<Self> {
        if materials.len() != shape.volume() {
            return Err(Error::ShapeMismatch(format!(
                "{} materials for a shape of volume {}",
                materials.len(),
                shape.volume()
            )));
        }
        Ok(Self {
            shape,
            fill: MaterialFill::Complex(materials),
        })
    }
}

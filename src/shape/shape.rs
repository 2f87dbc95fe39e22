//! Boolean voxel mask

use glam::IVec3;

use crate::core::{Error, Result};

/// Finite 3D selection mask.
///
/// Voxels are stored x-fastest, then y, then z, so `(x, y, z)` maps to the
/// linear index `z * (width * height) + y * width + x`. Change queues use the
/// same index as their resumption cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    width: u32,
    height: u32,
    length: u32,
    /// Mask-space position aligned with the target block
    origin: IVec3,
    mask: Vec<bool>,
}

impl Shape {
    /// Create an empty (nothing selected) shape
    pub fn new(width: u32, height: u32, length: u32, origin: IVec3) -> Self {
        let volume = width as usize * height as usize * length as usize;
        Self {
            width,
            height,
            length,
            origin,
            mask: vec![false; volume],
        }
    }

    /// Create a shape with every voxel selected
    pub fn filled(width: u32, height: u32, length: u32, origin: IVec3) -> Self {
        let mut shape = Self::new(width, height, length, origin);
        shape.mask.fill(true);
        shape
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    /// Total number of voxels in the bounding volume, selected or not
    pub fn volume(&self) -> usize {
        self.mask.len()
    }

    /// Number of selected voxels
    pub fn selected_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }

    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.width && y < self.height && z < self.length
    }

    /// Linear index of `(x, y, z)`. Does not bounds check.
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        let plane = self.width as usize * self.height as usize;
        z as usize * plane + y as usize * self.width as usize + x as usize
    }

    /// Inverse of [`Shape::index`]
    pub fn coords(&self, index: usize) -> (u32, u32, u32) {
        let plane = self.width as usize * self.height as usize;
        let z = index / plane;
        let rem = index % plane;
        let y = rem / self.width as usize;
        let x = rem % self.width as usize;
        (x as u32, y as u32, z as u32)
    }

    /// Is `(x, y, z)` selected?
    ///
    /// # Panics
    /// Panics if the coordinates are outside the shape, like slice indexing.
    pub fn get(&self, x: u32, y: u32, z: u32) -> bool {
        assert!(
            self.contains(x, y, z),
            "shape index ({}, {}, {}) out of bounds for {}x{}x{}",
            x, y, z, self.width, self.height, self.length
        );
        self.mask[self.index(x, y, z)]
    }

    /// Checked variant of [`Shape::get`]
    pub fn try_get(&self, x: u32, y: u32, z: u32) -> Result<bool> {
        if !self.contains(x, y, z) {
            return Err(self.index_error(x, y, z));
        }
        Ok(self.mask[self.index(x, y, z)])
    }

    /// Selection state by linear index
    pub fn get_index(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Select or deselect a voxel
    pub fn set(&mut self, x: u32, y: u32, z: u32, selected: bool) -> Result<()> {
        if !self.contains(x, y, z) {
            return Err(self.index_error(x, y, z));
        }
        let index = self.index(x, y, z);
        self.mask[index] = selected;
        Ok(())
    }

    /// Iterate selected voxels in linear index order
    pub fn iter_selected(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, selected)| **selected)
            .map(|(index, _)| self.coords(index))
    }

    /// Selected voxels as offsets from the origin
    pub fn offsets(&self) -> Vec<IVec3> {
        self.iter_selected()
            .map(|(x, y, z)| IVec3::new(x as i32, y as i32, z as i32) - self.origin)
            .collect()
    }

    fn index_error(&self, x: u32, y: u32, z: u32) -> Error {
        Error::ShapeIndex {
            x,
            y,
            z,
            width: self.width,
            height: self.height,
            length: self.length,
        }
    }
}

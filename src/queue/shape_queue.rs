//! Change queue that writes a material shape into the world

use glam::IVec3;

use crate::core::Result;
use crate::material::Material;
use crate::player::Sniper;
use crate::shape::MaterialShape;
use crate::world::World;
use super::{ChangeQueue, Eligibility, ExecutionState};

/// Writes a [`MaterialShape`] at a fixed world position.
///
/// Resumption is addressed by the shape's linear index, so a queue can stop
/// after any voxel and pick up exactly where it left off. Voxels outside the
/// world's vertical bounds are skipped and never counted.
#[derive(Debug, Clone)]
pub struct ShapeChangeQueue {
    owner: String,
    world: String,
    /// World position of mask voxel (0, 0, 0)
    corner: IVec3,
    shape: MaterialShape,
    eligibility: Eligibility,
    state: ExecutionState,
    /// Next linear index the incremental pass visits
    position: usize,
    /// Indices already written by the seeding pass
    seeded: Vec<bool>,
}

impl ShapeChangeQueue {
    /// Queue `shape` so that its origin lands on `target`
    pub fn new(owner: &str, world: &str, target: IVec3, shape: MaterialShape) -> Self {
        let corner = target - shape.origin();
        Self::at_corner(owner, world, corner, shape)
    }

    fn at_corner(owner: &str, world: &str, corner: IVec3, shape: MaterialShape) -> Self {
        Self {
            owner: owner.to_string(),
            world: world.to_string(),
            corner,
            shape,
            eligibility: Eligibility::default(),
            state: ExecutionState::Unstarted,
            position: 0,
            seeded: Vec::new(),
        }
    }

    /// Set the eligibility rule (builder pattern)
    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.shape.volume()
    }

    pub fn shape(&self) -> &MaterialShape {
        &self.shape
    }

    pub fn corner(&self) -> IVec3 {
        self.corner
    }

    /// Box and submit through [`super::flush`]
    pub fn flush(self, world: &dyn World, owner: &mut dyn Sniper) -> Result<()> {
        super::flush(Box::new(self), world, owner)
    }

    /// World position and material for a linear index, if this queue writes it
    fn target(&self, index: usize, bounds: (i32, i32)) -> Option<(IVec3, Material)> {
        let material = self.shape.material_at_index(index)?;
        let (x, y, z) = self.shape.shape().coords(index);
        let pos = self.corner + IVec3::new(x as i32, y as i32, z as i32);
        if pos.y < bounds.0 || pos.y > bounds.1 {
            return None;
        }
        Some((pos, material))
    }

    fn seed(&mut self, world: &mut dyn World) -> Result<usize> {
        if self.eligibility == Eligibility::Any {
            return Ok(0);
        }
        let bounds = world.height_bounds();
        self.seeded = vec![false; self.total()];
        let mut count = 0;
        for index in 0..self.total() {
            let Some((pos, material)) = self.target(index, bounds) else {
                continue;
            };
            if world.material_at(pos)?.is_unstable() {
                world.set_material(pos, material)?;
                self.seeded[index] = true;
                count += 1;
            }
        }
        Ok(count)
    }

    fn advance(&mut self, world: &mut dyn World, budget: usize) -> Result<usize> {
        let bounds = world.height_bounds();
        let total = self.total();
        let mut count = 0;
        while self.position < total && count < budget {
            let index = self.position;
            self.position += 1;
            if self.seeded.get(index).copied().unwrap_or(false) {
                continue;
            }
            if let Some((pos, material)) = self.target(index, bounds) {
                world.set_material(pos, material)?;
                count += 1;
            }
        }
        if self.position == total {
            self.state = ExecutionState::Done;
        }
        Ok(count)
    }
}

impl ChangeQueue for ShapeChangeQueue {
    fn owner(&self) -> &str {
        &self.owner
    }

    fn world_name(&self) -> &str {
        &self.world
    }

    fn state(&self) -> ExecutionState {
        self.state
    }

    fn perform(&mut self, world: &mut dyn World, budget: usize) -> Result<usize> {
        match self.state {
            ExecutionState::Unstarted => {
                let count = self.seed(world)?;
                self.state = ExecutionState::Incremental;
                log::debug!("Seeded {} unstable voxels for {}", count, self.owner);
                Ok(count)
            }
            ExecutionState::Incremental => self.advance(world, budget),
            ExecutionState::Done => Ok(0),
        }
    }

    fn is_finished(&mut self) -> bool {
        if self.position == self.total() {
            self.state = ExecutionState::Done;
        }
        self.state == ExecutionState::Done
    }

    fn invert(&self, world: &dyn World) -> Result<Box<dyn ChangeQueue>> {
        let bounds = world.height_bounds();
        let mut previous = Vec::with_capacity(self.total());
        for index in 0..self.total() {
            match self.target(index, bounds) {
                Some((pos, _)) => previous.push(Some(world.material_at(pos)?)),
                None => previous.push(None),
            }
        }
        let shape = MaterialShape::from_materials(self.shape.shape().clone(), previous)?;
        let inverse = Self::at_corner(&self.owner, &self.world, self.corner, shape)
            .with_eligibility(self.eligibility);
        Ok(Box::new(inverse))
    }

    fn reset(&mut self) {
        self.state = ExecutionState::Unstarted;
        self.position = 0;
        self.seeded.clear();
    }

    fn boxed_clone(&self) -> Box<dyn ChangeQueue> {
        Box::new(self.clone())
    }
}

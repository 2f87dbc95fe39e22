//! Built-in effect stages

use std::sync::Arc;

use glam::IVec3;

use crate::core::Result;
use crate::material::Material;
use crate::player::Sniper;
use crate::queue::ShapeChangeQueue;
use crate::shape::{MaterialShape, Shape};
use crate::world::World;
use super::blend;
use super::keys;
use super::stage::{require, BrushPartType, ExecutionResult, Stage};
use super::vars::BrushVars;

const NO_TARGET: &str = "You must be targeting a block.";

/// Fills the current shape with the selected material
#[derive(Debug, Default)]
pub struct MaterialBrush;

impl Stage for MaterialBrush {
    fn name(&self) -> &str {
        "material"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Effect
    }

    fn help(&self) -> &str {
        "Sets every voxel of the shape to your material"
    }

    fn run(&self, sniper: &mut dyn Sniper, world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        let Some(shape) = require::<Arc<Shape>>(
            sniper,
            vars,
            keys::SHAPE,
            "You must have at least one shape brush before your material brush.",
        ) else {
            return Ok(ExecutionResult::Abort);
        };
        let Some(material) = require::<Material>(sniper, vars, keys::MATERIAL, "You must select a material.") else {
            return Ok(ExecutionResult::Abort);
        };
        let Some(target) = require::<IVec3>(sniper, vars, keys::TARGET_BLOCK, NO_TARGET) else {
            return Ok(ExecutionResult::Abort);
        };

        let fill = MaterialShape::uniform(Shape::clone(&shape), material);
        ShapeChangeQueue::new(sniper.name(), sniper.world_name(), target, fill).flush(world, sniper)?;
        Ok(ExecutionResult::Continue)
    }
}

/// Replaces each voxel of the shape with the majority material of its
/// neighborhood, as defined by the structuring element.
#[derive(Debug, Default)]
pub struct BlendBrush;

impl Stage for BlendBrush {
    fn name(&self) -> &str {
        "blend"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Effect
    }

    fn help(&self) -> &str {
        "Smooths the shape toward its most common neighbor; excludeFluid defaults to true"
    }

    fn run(&self, sniper: &mut dyn Sniper, world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        let exclude_fluid = vars.get_any::<bool>(keys::EXCLUDE_FLUID).unwrap_or(true);
        let Some(shape) = require::<Arc<Shape>>(
            sniper,
            vars,
            keys::SHAPE,
            "You must have at least one shape brush before your blend brush.",
        ) else {
            return Ok(ExecutionResult::Abort);
        };
        let Some(kernel) = require::<Arc<Shape>>(
            sniper,
            vars,
            keys::STRUCTURING_ELEMENT,
            "You must define a structuring element before your blend brush.",
        ) else {
            return Ok(ExecutionResult::Abort);
        };
        let Some(target) = require::<IVec3>(sniper, vars, keys::TARGET_BLOCK, NO_TARGET) else {
            return Ok(ExecutionResult::Abort);
        };

        let fill = blend::resolve(world, &shape, target, &kernel, exclude_fluid)?;
        ShapeChangeQueue::new(sniper.name(), sniper.world_name(), target, fill).flush(world, sniper)?;
        Ok(ExecutionResult::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::vars::Scope;
    use crate::player::{BufferSink, Player};
    use crate::shape::primitive;
    use crate::world::MemoryWorld;

    const STONE: Material = Material::new(1);

    fn player() -> (Player, BufferSink) {
        let sink = BufferSink::new();
        (Player::new("alice", "w", 5, Box::new(sink.clone())), sink)
    }

    #[test]
    fn test_material_requires_shape() {
        let (mut player, sink) = player();
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        vars.set(Scope::Global, keys::MATERIAL, STONE);

        let result = MaterialBrush.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Abort);
        assert_eq!(
            sink.last().as_deref(),
            Some("You must have at least one shape brush before your material brush.")
        );
        assert!(!player.has_pending());
    }

    #[test]
    fn test_material_requires_material() {
        let (mut player, sink) = player();
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        vars.set(Scope::Runtime, keys::SHAPE, primitive::ball(1.0));

        let result = MaterialBrush.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Abort);
        assert_eq!(sink.last().as_deref(), Some("You must select a material."));
    }

    #[test]
    fn test_material_queues_change_and_history() {
        let (mut player, _) = player();
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        vars.set(Scope::Runtime, keys::SHAPE, primitive::ball(1.0));
        vars.set(Scope::Global, keys::MATERIAL, STONE);
        vars.set(Scope::Runtime, keys::TARGET_BLOCK, IVec3::new(3, 4, 5));

        let result = MaterialBrush.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Continue);
        assert!(player.has_pending());
        assert_eq!(player.history().undoable(), 1);
    }

    #[test]
    fn test_blend_requires_structuring_element() {
        let (mut player, sink) = player();
        let world = MemoryWorld::new();
        let mut vars = BrushVars::new();
        vars.set(Scope::Runtime, keys::SHAPE, primitive::ball(1.0));
        vars.set(Scope::Runtime, keys::TARGET_BLOCK, IVec3::ZERO);

        let result = BlendBrush.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Abort);
        assert_eq!(
            sink.last().as_deref(),
            Some("You must define a structuring element before your blend brush.")
        );
    }

    #[test]
    fn test_blend_queues_change() {
        let (mut player, _) = player();
        let mut world = MemoryWorld::new();
        world.fill(IVec3::new(-2, -2, -2), IVec3::new(2, -1, 2), STONE).unwrap();
        let mut vars = BrushVars::new();
        vars.set(Scope::Runtime, keys::SHAPE, primitive::cuboid(1, 1, 1, IVec3::ZERO));
        vars.set(Scope::Runtime, keys::STRUCTURING_ELEMENT, primitive::cuboid(3, 3, 3, IVec3::ONE));
        vars.set(Scope::Runtime, keys::TARGET_BLOCK, IVec3::ZERO);

        let result = BlendBrush.run(&mut player, &world, &mut vars).unwrap();
        assert_eq!(result, ExecutionResult::Continue);
        assert!(player.has_pending());
    }
}

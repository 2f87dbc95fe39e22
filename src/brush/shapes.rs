//! Built-in shape stages
//!
//! Each stage builds a [`Shape`] from the brush variables and stores it in
//! the runtime scope under [`keys::SHAPE`] (or [`keys::STRUCTURING_ELEMENT`]
//! for the kernel).

use glam::IVec3;

use crate::core::Result;
use crate::player::Sniper;
use crate::shape::{primitive, Axis, Direction, Shape};
use crate::world::World;
use super::keys;
use super::stage::{require, BrushPartType, ExecutionResult, Stage};
use super::vars::{BrushVars, Scope};

const SIZE_MISSING: &str = "Please set a brush size first: /size #";

/// Cross-section axis: the clicked face's axis when `useFace` is set,
/// vertical otherwise.
fn face_axis(vars: &BrushVars) -> Axis {
    if vars.get_any::<bool>(keys::USE_FACE).unwrap_or(false) {
        vars.get_any::<Direction>(keys::TARGET_FACE).unwrap_or_default().axis()
    } else {
        Axis::Y
    }
}

/// Read a size, radius or height. Absent values send `missing`; values that
/// are not finite, negative or above the user's limit are refused.
fn dimension(sniper: &mut dyn Sniper, vars: &BrushVars, key: &str, missing: &str) -> Option<f64> {
    let value = require::<f64>(sniper, vars, key, missing)?;
    let max = sniper.max_brush_size();
    if !value.is_finite() || value < 0.0 || value > max {
        log::debug!("{}: refused {key}={value} (limit {max})", sniper.name());
        sniper.send_message(&format!("{key} must be between 0 and {max}."));
        return None;
    }
    Some(value)
}

fn store(vars: &mut BrushVars, key: &str, shape: Shape) -> ExecutionResult {
    vars.set(Scope::Runtime, key, shape);
    ExecutionResult::Continue
}

/// Single voxel at the target
#[derive(Debug, Default)]
pub struct SnipeBrush;

impl Stage for SnipeBrush {
    fn name(&self) -> &str {
        "snipe"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Shape
    }

    fn help(&self) -> &str {
        "A single voxel at the target block"
    }

    fn run(&self, _sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        Ok(store(vars, keys::SHAPE, primitive::cuboid(1, 1, 1, IVec3::ZERO)))
    }
}

/// Sphere of radius `brushSize`
#[derive(Debug, Default)]
pub struct BallBrush;

impl Stage for BallBrush {
    fn name(&self) -> &str {
        "ball"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Shape
    }

    fn help(&self) -> &str {
        "A sphere of radius brushSize centered on the target"
    }

    fn run(&self, sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        let Some(size) = dimension(sniper, vars, keys::BRUSH_SIZE, SIZE_MISSING) else {
            return Ok(ExecutionResult::Abort);
        };
        Ok(store(vars, keys::SHAPE, primitive::ball(size)))
    }
}

/// Flat circle of radius `brushSize`
#[derive(Debug, Default)]
pub struct DiscBrush;

impl Stage for DiscBrush {
    fn name(&self) -> &str {
        "disc"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Shape
    }

    fn help(&self) -> &str {
        "A one voxel thick circle; set useFace=true to orient it to the clicked face"
    }

    fn run(&self, sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        let Some(size) = dimension(sniper, vars, keys::BRUSH_SIZE, SIZE_MISSING) else {
            return Ok(ExecutionResult::Abort);
        };
        let axis = face_axis(vars);
        Ok(store(vars, keys::SHAPE, primitive::disc(size, axis)))
    }
}

/// Cylinder of radius `brushSize` and height `height`
#[derive(Debug, Default)]
pub struct CylinderBrush;

impl Stage for CylinderBrush {
    fn name(&self) -> &str {
        "cylinder"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Shape
    }

    fn help(&self) -> &str {
        "A cylinder of radius brushSize; requires height"
    }

    fn run(&self, sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        let Some(size) = dimension(sniper, vars, keys::BRUSH_SIZE, SIZE_MISSING) else {
            return Ok(ExecutionResult::Abort);
        };
        let Some(height) = dimension(
            sniper,
            vars,
            keys::HEIGHT,
            "Please specify a height for the cylinder: /param cylinder height=#",
        ) else {
            return Ok(ExecutionResult::Abort);
        };
        let height = height.max(1.0).floor() as u32;
        let axis = face_axis(vars);
        Ok(store(vars, keys::SHAPE, primitive::cylinder(size, height, size, axis)))
    }
}

/// Flat ellipse with radii `radiusX` and `radiusY`
#[derive(Debug, Default)]
pub struct EllipseBrush;

impl Stage for EllipseBrush {
    fn name(&self) -> &str {
        "ellipse"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Shape
    }

    fn help(&self) -> &str {
        "A one voxel thick ellipse; requires radiusX and radiusY"
    }

    fn run(&self, sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        const MISSING: &str = "Please specify both radii for the ellipse: /param ellipse radiusX=# radiusY=#";
        let Some(rx) = dimension(sniper, vars, keys::RADIUS_X, MISSING) else {
            return Ok(ExecutionResult::Abort);
        };
        let Some(ry) = dimension(sniper, vars, keys::RADIUS_Y, MISSING) else {
            return Ok(ExecutionResult::Abort);
        };
        let axis = face_axis(vars);
        Ok(store(vars, keys::SHAPE, primitive::cylinder(rx, 1, ry, axis)))
    }
}

/// Cubic structuring element of radius `kernelRadius` (default 1) for
/// neighborhood effects such as blend.
#[derive(Debug, Default)]
pub struct KernelBrush;

impl Stage for KernelBrush {
    fn name(&self) -> &str {
        "kernel"
    }

    fn kind(&self) -> BrushPartType {
        BrushPartType::Shape
    }

    fn help(&self) -> &str {
        "Sets a cubic structuring element of radius kernelRadius (default 1)"
    }

    fn run(&self, _sniper: &mut dyn Sniper, _world: &dyn World, vars: &mut BrushVars) -> Result<ExecutionResult> {
        let radius = vars.get_any::<i32>(keys::KERNEL_RADIUS).unwrap_or(1).clamp(0, 64);
        let side = radius as u32 * 2 + 1;
        let kernel = primitive::cuboid(side, side, side, IVec3::splat(radius));
        Ok(store(vars, keys::STRUCTURING_ELEMENT, kernel))
    }
}

//! Voxel selection masks
//!
//! A [`Shape`] is a finite boolean volume with an origin used to align it to
//! a target block. A [`MaterialShape`] pairs a shape with the material(s) an
//! edit should write.

pub mod shape;
pub mod material_shape;
pub mod primitive;

pub use shape::Shape;
pub use material_shape::{MaterialFill, MaterialShape};
pub use primitive::{Axis, Direction};

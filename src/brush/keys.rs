//! Well-known brush variable names

pub const BRUSH_SIZE: &str = "brushSize";
pub const MATERIAL: &str = "material";
pub const SHAPE: &str = "shape";
pub const STRUCTURING_ELEMENT: &str = "structuringElement";
pub const TARGET_BLOCK: &str = "targetBlock";
pub const TARGET_FACE: &str = "targetFace";
pub const HEIGHT: &str = "height";
pub const RADIUS_X: &str = "radiusX";
pub const RADIUS_Y: &str = "radiusY";
pub const USE_FACE: &str = "useFace";
pub const EXCLUDE_FLUID: &str = "excludeFluid";
pub const KERNEL_RADIUS: &str = "kernelRadius";

//! Rasterized brush primitives

use glam::IVec3;
use serde::{Deserialize, Serialize};

use super::Shape;

/// Axis for oriented primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Block face hit by a snipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Axis perpendicular to this face
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::East | Direction::West => Axis::X,
        }
    }
}

/// Voxels spanned by a radius: `2 * floor(r) + 1`, saturating at `u32::MAX`
fn extent(radius: f64) -> u32 {
    (radius.max(0.0).floor() as u32).saturating_mul(2).saturating_add(1)
}

/// Normalized squared distance used for ellipse membership. The half voxel
/// of slack keeps small radii from collapsing into plus signs.
fn ellipse_term(offset: i32, radius: f64) -> f64 {
    let r = radius.max(0.0) + 0.5;
    let d = offset as f64 / r;
    d * d
}

/// Solid box with the given origin
pub fn cuboid(width: u32, height: u32, length: u32, origin: IVec3) -> Shape {
    Shape::filled(width.max(1), height.max(1), length.max(1), origin)
}

/// Ellipsoid centered on its origin
pub fn ellipsoid(rx: f64, ry: f64, rz: f64) -> Shape {
    let (w, h, l) = (extent(rx), extent(ry), extent(rz));
    let center = IVec3::new((w / 2) as i32, (h / 2) as i32, (l / 2) as i32);
    let mut shape = Shape::new(w, h, l, center);
    for z in 0..l {
        for y in 0..h {
            for x in 0..w {
                let d = ellipse_term(x as i32 - center.x, rx)
                    + ellipse_term(y as i32 - center.y, ry)
                    + ellipse_term(z as i32 - center.z, rz);
                if d <= 1.0 {
                    let _ = shape.set(x, y, z, true);
                }
            }
        }
    }
    shape
}

/// Sphere of the given radius
pub fn ball(radius: f64) -> Shape {
    ellipsoid(radius, radius, radius)
}

/// Elliptic cylinder extruded `height` voxels along `axis`.
///
/// `ru` and `rv` are the radii of the cross-section on the two remaining axes
/// in x, y, z order. The origin sits at the cross-section center and at the
/// base along the axis.
pub fn cylinder(ru: f64, height: u32, rv: f64, axis: Axis) -> Shape {
    let height = height.max(1);
    let (eu, ev) = (extent(ru), extent(rv));
    let (cu, cv) = ((eu / 2) as i32, (ev / 2) as i32);

    let (w, h, l, origin) = match axis {
        Axis::X => (height, eu, ev, IVec3::new(0, cu, cv)),
        Axis::Y => (eu, height, ev, IVec3::new(cu, 0, cv)),
        Axis::Z => (eu, ev, height, IVec3::new(cu, cv, 0)),
    };

    let mut shape = Shape::new(w, h, l, origin);
    for z in 0..l {
        for y in 0..h {
            for x in 0..w {
                let (u, v) = match axis {
                    Axis::X => (y, z),
                    Axis::Y => (x, z),
                    Axis::Z => (x, y),
                };
                let d = ellipse_term(u as i32 - cu, ru) + ellipse_term(v as i32 - cv, rv);
                if d <= 1.0 {
                    let _ = shape.set(x, y, z, true);
                }
            }
        }
    }
    shape
}

/// One-voxel-thick circle perpendicular to `axis`
pub fn disc(radius: f64, axis: Axis) -> Shape {
    cylinder(radius, 1, radius, axis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_axis() {
        assert_eq!(Direction::Up.axis(), Axis::Y);
        assert_eq!(Direction::South.axis(), Axis::Z);
        assert_eq!(Direction::West.axis(), Axis::X);
    }

    #[test]
    fn test_extent_saturates() {
        assert_eq!(extent(2.7), 5);
        assert_eq!(extent(3.0e9), u32::MAX);
        assert_eq!(extent(f64::INFINITY), u32::MAX);
        assert_eq!(extent(f64::NAN), 1);
        assert_eq!(extent(-4.0), 1);
    }

    #[test]
    fn test_cuboid() {
        let shape = cuboid(2, 3, 4, IVec3::ZERO);
        assert_eq!(shape.selected_count(), 24);
    }

    #[test]
    fn test_ball_radius_zero_is_single_voxel() {
        let shape = ball(0.0);
        assert_eq!(shape.volume(), 1);
        assert_eq!(shape.selected_count(), 1);
        assert_eq!(shape.origin(), IVec3::ZERO);
    }

    #[test]
    fn test_ball_radius_one() {
        let shape = ball(1.0);
        assert_eq!((shape.width(), shape.height(), shape.length()), (3, 3, 3));
        assert_eq!(shape.origin(), IVec3::ONE);
        assert!(shape.get(1, 1, 1));
        // Face neighbours in, corners out
        assert!(shape.get(0, 1, 1));
        assert!(!shape.get(0, 0, 0));
    }

    #[test]
    fn test_ball_symmetry() {
        let shape = ball(4.0);
        let (w, h, l) = (shape.width(), shape.height(), shape.length());
        for (x, y, z) in shape.iter_selected() {
            assert!(shape.get(w - 1 - x, y, z));
            assert!(shape.get(x, h - 1 - y, z));
            assert!(shape.get(x, y, l - 1 - z));
        }
    }

    #[test]
    fn test_cylinder_axes() {
        let up = cylinder(2.0, 4, 2.0, Axis::Y);
        assert_eq!((up.width(), up.height(), up.length()), (5, 4, 5));
        assert_eq!(up.origin(), IVec3::new(2, 0, 2));

        let east = cylinder(2.0, 4, 2.0, Axis::X);
        assert_eq!((east.width(), east.height(), east.length()), (4, 5, 5));
        assert_eq!(east.selected_count(), up.selected_count());
    }

    #[test]
    fn test_disc_is_flat() {
        let shape = disc(3.0, Axis::Y);
        assert_eq!(shape.height(), 1);
        assert!(shape.get(3, 0, 3));
    }
}

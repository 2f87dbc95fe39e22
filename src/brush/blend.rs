//! Majority-vote material smoothing

use std::collections::HashMap;

use glam::IVec3;

use crate::core::Result;
use crate::material::Material;
use crate::shape::{MaterialShape, Shape};
use crate::world::World;

/// Material with the strictly highest count. `None` when empty or tied at
/// the top.
pub fn majority(counts: &HashMap<Material, usize>) -> Option<Material> {
    let mut best: Option<(Material, usize)> = None;
    let mut tied = false;
    for (&material, &count) in counts {
        match best {
            Some((_, top)) if count < top => {}
            Some((_, top)) if count == top => tied = true,
            _ => {
                best = Some((material, count));
                tied = false;
            }
        }
    }
    if tied { None } else { best.map(|(material, _)| material) }
}

/// Blend every voxel `shape` selects at `target` toward its neighborhood.
///
/// Neighbors are the voxels `kernel` selects, taken relative to the kernel
/// origin, excluding the center itself. Sample heights clamp to the world's
/// vertical bounds. Voxels whose winner matches what is already there, or
/// whose vote is tied, are left unassigned.
pub fn resolve(
    world: &dyn World,
    shape: &Shape,
    target: IVec3,
    kernel: &Shape,
    exclude_fluid: bool,
) -> Result<MaterialShape> {
    let (min_y, max_y) = world.height_bounds();
    let neighbors: Vec<IVec3> = kernel
        .offsets()
        .into_iter()
        .filter(|offset| *offset != IVec3::ZERO)
        .collect();

    let corner = target - shape.origin();
    let mut result = MaterialShape::complex(shape.clone(), None);
    let mut counts: HashMap<Material, usize> = HashMap::with_capacity(8);

    for (x, y, z) in shape.iter_selected() {
        let center = corner + IVec3::new(x as i32, y as i32, z as i32);
        if center.y < min_y || center.y > max_y {
            continue;
        }

        counts.clear();
        for offset in &neighbors {
            let mut sample = center + *offset;
            sample.y = sample.y.clamp(min_y, max_y);
            let material = world.material_at(sample)?;
            if exclude_fluid && material.is_liquid() {
                continue;
            }
            *counts.entry(material).or_insert(0) += 1;
        }

        if let Some(winner) = majority(&counts) {
            if winner != world.material_at(center)? {
                result.set_material(x, y, z, Some(winner))?;
            }
        }
    }

    log::debug!(
        "Blend resolved {} of {} voxels",
        result.write_count(),
        shape.selected_count()
    );
    Ok(result)
}

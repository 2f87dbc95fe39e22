//! Block materials
//!
//! A [`Material`] is a small copyable handle. Names live in the
//! [`MaterialRegistry`]; the handle itself only carries the id and the
//! physical flags the change queues care about.

pub mod registry;

pub use registry::MaterialRegistry;

use serde::{Deserialize, Serialize};

/// Material flags
pub mod flags {
    /// Flows (water, lava)
    pub const LIQUID: u8 = 1 << 0;
    /// Falls or breaks without support (sand, torches)
    pub const RELIANT_ON_ENVIRONMENT: u8 = 1 << 1;
}

/// Material handle - exactly 4 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material {
    /// Registry id; 0 is always air
    pub id: u16,
    /// Physical flags
    pub flags: u8,
}

impl Material {
    /// Air
    pub const AIR: Material = Material { id: 0, flags: 0 };

    /// Create a plain solid material
    pub const fn new(id: u16) -> Self {
        Self { id, flags: 0 }
    }

    /// Create a copy with the given flags value
    pub const fn with_flags(self, flags: u8) -> Self {
        Self { flags, ..self }
    }

    pub fn is_air(&self) -> bool {
        self.id == 0
    }

    pub fn is_liquid(&self) -> bool {
        self.flags & flags::LIQUID != 0
    }

    pub fn is_reliant_on_environment(&self) -> bool {
        self.flags & flags::RELIANT_ON_ENVIRONMENT != 0
    }

    /// Liquids and environment-reliant materials settle on their own and
    /// are written before the bulk of an edit.
    pub fn is_unstable(&self) -> bool {
        self.is_liquid() || self.is_reliant_on_environment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_size() {
        assert_eq!(std::mem::size_of::<Material>(), 4);
    }

    #[test]
    fn test_air() {
        assert!(Material::AIR.is_air());
        assert!(!Material::AIR.is_unstable());
        assert_eq!(Material::default(), Material::AIR);
    }

    #[test]
    fn test_flags() {
        let water = Material::new(7).with_flags(flags::LIQUID);
        assert!(water.is_liquid());
        assert!(!water.is_reliant_on_environment());
        assert!(water.is_unstable());

        let sand = Material::new(5).with_flags(flags::RELIANT_ON_ENVIRONMENT);
        assert!(!sand.is_liquid());
        assert!(sand.is_unstable());

        assert!(!Material::new(1).is_unstable());
    }
}

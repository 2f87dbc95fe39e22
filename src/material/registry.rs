//! Name to material lookup

use std::collections::HashMap;

use super::{flags, Material};

/// Registry of named materials.
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    by_name: HashMap<String, Material>,
    names: HashMap<u16, String>,
    next_id: u16,
}

impl MaterialRegistry {
    /// Create a registry containing only air.
    pub fn new() -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            names: HashMap::new(),
            next_id: 1,
        };
        registry.by_name.insert("air".to_string(), Material::AIR);
        registry.names.insert(Material::AIR.id, "air".to_string());
        registry
    }

    /// Registry with the common terrain materials.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("stone", 0);
        registry.register("dirt", 0);
        registry.register("grass", 0);
        registry.register("sand", flags::RELIANT_ON_ENVIRONMENT);
        registry.register("gravel", flags::RELIANT_ON_ENVIRONMENT);
        registry.register("water", flags::LIQUID);
        registry.register("lava", flags::LIQUID);
        registry.register("torch", flags::RELIANT_ON_ENVIRONMENT);
        registry
    }

    /// Register a material under `name`, returning its handle. Re-registering
    /// a name returns the existing handle unchanged.
    pub fn register(&mut self, name: &str, material_flags: u8) -> Material {
        let key = name.to_ascii_lowercase();
        if let Some(existing) = self.by_name.get(&key) {
            return *existing;
        }
        let material = Material::new(self.next_id).with_flags(material_flags);
        self.next_id += 1;
        self.by_name.insert(key.clone(), material);
        self.names.insert(material.id, key);
        material
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<Material> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn name_of(&self, material: Material) -> Option<&str> {
        self.names.get(&material.id).map(String::as_str)
    }

    pub fn air(&self) -> Material {
        Material::AIR
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// All registered materials
    pub fn materials(&self) -> impl Iterator<Item = Material> + '_ {
        self.by_name.values().copied()
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_air() {
        let registry = MaterialRegistry::new();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("air"), Some(Material::AIR));
        assert_eq!(registry.name_of(Material::AIR), Some("air"));
    }

    #[test]
    fn test_defaults() {
        let registry = MaterialRegistry::with_defaults();
        assert!(registry.get("water").unwrap().is_liquid());
        assert!(registry.get("sand").unwrap().is_reliant_on_environment());
        assert!(!registry.get("stone").unwrap().is_unstable());
        assert_eq!(registry.get("STONE"), registry.get("stone"));
        assert_eq!(registry.get("unobtainium"), None);
    }

    #[test]
    fn test_register_twice() {
        let mut registry = MaterialRegistry::new();
        let a = registry.register("Marble", 0);
        let b = registry.register("marble", flags::LIQUID);
        assert_eq!(a, b);
        assert!(!b.is_liquid());
        assert_eq!(registry.name_of(a), Some("marble"));
    }
}

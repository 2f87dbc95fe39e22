//! Brush lookup tables

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::effects::{BlendBrush, MaterialBrush};
use super::shapes::{BallBrush, CylinderBrush, DiscBrush, EllipseBrush, KernelBrush, SnipeBrush};
use super::stage::Stage;

/// Stages by case-insensitive name
#[derive(Clone, Default)]
pub struct BrushRegistry {
    brushes: HashMap<String, Arc<dyn Stage>>,
}

impl BrushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in brush
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn Stage>; 8] = [
            Arc::new(SnipeBrush),
            Arc::new(BallBrush),
            Arc::new(DiscBrush),
            Arc::new(CylinderBrush),
            Arc::new(EllipseBrush),
            Arc::new(KernelBrush),
            Arc::new(MaterialBrush),
            Arc::new(BlendBrush),
        ];
        for stage in builtins {
            registry.register(stage);
        }
        registry
    }

    /// Add or replace a stage under its own name
    pub fn register(&mut self, stage: Arc<dyn Stage>) {
        let name = stage.name().to_lowercase();
        if self.brushes.insert(name, Arc::clone(&stage)).is_some() {
            log::debug!("Replaced brush '{}'", stage.name());
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Stage>> {
        self.brushes.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.brushes.contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.brushes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }
}

impl fmt::Debug for BrushRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrushRegistry").field("brushes", &self.names()).finish()
    }
}

/// Ordered stack of registries; the first layer holding a name wins.
#[derive(Debug, Clone, Default)]
pub struct BrushLookup<'a> {
    layers: Vec<&'a BrushRegistry>,
}

impl<'a> BrushLookup<'a> {
    pub fn new(layers: Vec<&'a BrushRegistry>) -> Self {
        Self { layers }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Stage>> {
        self.layers.iter().find_map(|layer| layer.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains(name))
    }
}

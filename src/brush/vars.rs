//! Scoped brush variables
//!
//! Every player carries one [`BrushVars`]. Global entries (size, material)
//! persist across snipes; runtime entries (target block, the shape built by
//! the current chain) are cleared at the start of every snipe.

use std::collections::HashMap;
use std::sync::Arc;

use glam::IVec3;

use crate::material::Material;
use crate::shape::{Direction, Shape};

/// Variable scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Persists until explicitly reset
    Global,
    /// Cleared before every triggering action
    Runtime,
}

/// Dynamically typed variable value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Material(Material),
    Shape(Arc<Shape>),
    Position(IVec3),
    Face(Direction),
}

impl Value {
    /// Parse a command-line style argument: booleans, integers, floats,
    /// otherwise a string.
    pub fn parse(raw: &str) -> Value {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(raw.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Material> for Value {
    fn from(v: Material) -> Self {
        Value::Material(v)
    }
}

impl From<Shape> for Value {
    fn from(v: Shape) -> Self {
        Value::Shape(Arc::new(v))
    }
}

impl From<Arc<Shape>> for Value {
    fn from(v: Arc<Shape>) -> Self {
        Value::Shape(v)
    }
}

impl From<IVec3> for Value {
    fn from(v: IVec3) -> Self {
        Value::Position(v)
    }
}

impl From<Direction> for Value {
    fn from(v: Direction) -> Self {
        Value::Face(v)
    }
}

/// Typed extraction from a [`Value`]. `None` on a type mismatch.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Material {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Material(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for Arc<Shape> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Shape(v) => Some(Arc::clone(v)),
            _ => None,
        }
    }
}

impl FromValue for IVec3 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Position(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for Direction {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Face(v) => Some(*v),
            _ => None,
        }
    }
}

/// Two-scope variable store
#[derive(Debug, Clone, Default)]
pub struct BrushVars {
    global: HashMap<String, Value>,
    runtime: HashMap<String, Value>,
}

impl BrushVars {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope(&self, scope: Scope) -> &HashMap<String, Value> {
        match scope {
            Scope::Global => &self.global,
            Scope::Runtime => &self.runtime,
        }
    }

    fn scope_mut(&mut self, scope: Scope) -> &mut HashMap<String, Value> {
        match scope {
            Scope::Global => &mut self.global,
            Scope::Runtime => &mut self.runtime,
        }
    }

    /// Typed read from one scope
    pub fn get<T: FromValue>(&self, scope: Scope, key: &str) -> Option<T> {
        self.scope(scope).get(key).and_then(T::from_value)
    }

    /// Typed read, runtime scope first, then global
    pub fn get_any<T: FromValue>(&self, key: &str) -> Option<T> {
        self.get(Scope::Runtime, key)
            .or_else(|| self.get(Scope::Global, key))
    }

    pub fn set(&mut self, scope: Scope, key: &str, value: impl Into<Value>) {
        self.scope_mut(scope).insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, scope: Scope, key: &str) -> Option<Value> {
        self.scope_mut(scope).remove(key)
    }

    /// Present in either scope
    pub fn has(&self, key: &str) -> bool {
        self.runtime.contains_key(key) || self.global.contains_key(key)
    }

    pub fn has_in(&self, scope: Scope, key: &str) -> bool {
        self.scope(scope).contains_key(key)
    }

    /// Remove everything from both scopes
    pub fn clear(&mut self) {
        self.global.clear();
        self.runtime.clear();
    }

    /// Remove runtime entries only
    pub fn clear_runtime(&mut self) {
        self.runtime.clear();
    }

    pub fn len(&self) -> usize {
        self.global.len() + self.runtime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.runtime.is_empty()
    }
}

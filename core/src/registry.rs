//! Shader and condition registries
//!
//! Both map a name to a small dense index that fits the material bit
//! layout. Registration is idempotent: registering an existing name returns
//! its index.

use canvas_shared::{ConditionIndex, PoolIndex, ShaderIndex};
use hashbrown::HashMap;

use crate::error::MaterialError;
use crate::material::{MAX_CONDITIONS, MAX_SHADERS};

/// Name of the condition registered at index 0
pub const ALWAYS_CONDITION: &str = "always";

/// Dense name → index registry with a fixed capacity
pub struct NamedRegistry<I: PoolIndex> {
    /// Registry kind (for error messages)
    kind: &'static str,
    capacity: usize,
    /// Names by index
    names: Vec<String>,
    map: HashMap<String, I>,
}

impl<I: PoolIndex> std::fmt::Debug for NamedRegistry<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedRegistry")
            .field("kind", &self.kind)
            .field("capacity", &self.capacity)
            .field("len", &self.names.len())
            .finish()
    }
}

impl<I: PoolIndex> NamedRegistry<I> {
    pub fn new(kind: &'static str, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            names: Vec::new(),
            map: HashMap::new(),
        }
    }

    /// Registry whose index 0 is `first`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_first(kind: &'static str, capacity: usize, first: &str) -> Self {
        assert!(capacity > 0, "{} registry needs room for '{}'", kind, first);
        let mut registry = Self::new(kind, capacity);
        registry.names.push(first.to_string());
        registry.map.insert(first.to_string(), I::from_raw(0));
        registry
    }

    /// Register `name`, returning its index (deduplicates)
    pub fn register(&mut self, name: &str) -> Result<I, MaterialError> {
        if let Some(&existing) = self.map.get(name) {
            return Ok(existing);
        }

        let idx = self.names.len();
        if idx >= self.capacity {
            return Err(MaterialError::RegistryFull {
                kind: self.kind,
                capacity: self.capacity,
                name: name.to_string(),
            });
        }

        let index = I::from_raw(idx as u32);
        self.names.push(name.to_string());
        self.map.insert(name.to_string(), index);
        tracing::debug!(kind = self.kind, name, index = idx, "registered");

        Ok(index)
    }

    pub fn find(&self, name: &str) -> Option<I> {
        self.map.get(name).copied()
    }

    /// Like [`find`](Self::find), but an unknown name is an error
    pub fn lookup(&self, name: &str) -> Result<I, MaterialError> {
        self.find(name).ok_or_else(|| MaterialError::UnknownName {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub fn name(&self, index: I) -> Option<&str> {
        self.names.get(index.as_raw() as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over `(index, name)` in registration order
    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (I::from_raw(i as u32), name.as_str()))
    }
}

/// Shader programs; index 0 is the default shader
#[derive(Debug)]
pub struct ShaderRegistry {
    inner: NamedRegistry<ShaderIndex>,
}

impl ShaderRegistry {
    pub fn new(default_shader: &str) -> Self {
        Self {
            inner: NamedRegistry::with_first("shader", MAX_SHADERS, default_shader),
        }
    }

    pub fn default_shader(&self) -> ShaderIndex {
        ShaderIndex(0)
    }

    pub fn register(&mut self, name: &str) -> Result<ShaderIndex, MaterialError> {
        self.inner.register(name)
    }

    pub fn find(&self, name: &str) -> Option<ShaderIndex> {
        self.inner.find(name)
    }

    pub fn lookup(&self, name: &str) -> Result<ShaderIndex, MaterialError> {
        self.inner.lookup(name)
    }

    pub fn name(&self, index: ShaderIndex) -> Option<&str> {
        self.inner.name(index)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShaderIndex, &str)> {
        self.inner.iter()
    }
}

/// Visibility conditions; index 0 is always visible
#[derive(Debug)]
pub struct ConditionRegistry {
    inner: NamedRegistry<ConditionIndex>,
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self {
            inner: NamedRegistry::with_first("condition", MAX_CONDITIONS, ALWAYS_CONDITION),
        }
    }

    pub fn always(&self) -> ConditionIndex {
        ConditionIndex(0)
    }

    pub fn register(&mut self, name: &str) -> Result<ConditionIndex, MaterialError> {
        self.inner.register(name)
    }

    pub fn find(&self, name: &str) -> Option<ConditionIndex> {
        self.inner.find(name)
    }

    pub fn lookup(&self, name: &str) -> Result<ConditionIndex, MaterialError> {
        self.inner.lookup(name)
    }

    pub fn name(&self, index: ConditionIndex) -> Option<&str> {
        self.inner.name(index)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConditionIndex, &str)> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_add_and_find() {
        let mut registry: NamedRegistry<ShaderIndex> = NamedRegistry::new("shader", 8);
        let a = registry.register("a").unwrap();
        let b = registry.register("b").unwrap();

        assert_eq!(a, ShaderIndex(0));
        assert_eq!(b, ShaderIndex(1));
        assert_eq!(registry.find("b"), Some(b));
        assert_eq!(registry.name(a), Some("a"));
        assert_eq!(registry.find("c"), None);
    }

    #[test]
    fn test_registry_deduplication() {
        let mut registry: NamedRegistry<ShaderIndex> = NamedRegistry::new("shader", 8);
        let first = registry.register("same").unwrap();
        let second = registry.register("same").unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_full() {
        let mut registry: NamedRegistry<ConditionIndex> = NamedRegistry::new("condition", 2);
        registry.register("a").unwrap();
        registry.register("b").unwrap();

        let err = registry.register("c").unwrap_err();
        assert!(matches!(
            err,
            MaterialError::RegistryFull { capacity: 2, .. }
        ));
        // Existing names still resolve when full
        assert_eq!(registry.register("a").unwrap(), ConditionIndex(0));
    }

    #[test]
    fn test_registry_with_first_entry() {
        let mut registry: NamedRegistry<ShaderIndex> =
            NamedRegistry::with_first("shader", 1, "canvas:default");
        assert_eq!(registry.find("canvas:default"), Some(ShaderIndex(0)));
        assert_eq!(registry.register("canvas:default").unwrap(), ShaderIndex(0));
        assert!(registry.register("canvas:wavy").is_err());
    }

    #[test]
    #[should_panic(expected = "needs room")]
    fn test_registry_with_first_zero_capacity_panics() {
        NamedRegistry::<ShaderIndex>::with_first("shader", 0, "canvas:default");
    }

    #[test]
    fn test_registry_lookup_unknown() {
        let registry = ConditionRegistry::new();
        assert!(matches!(
            registry.lookup("raining"),
            Err(MaterialError::UnknownName { kind: "condition", .. })
        ));
    }

    #[test]
    fn test_shader_registry_default_at_zero() {
        let mut shaders = ShaderRegistry::new("canvas:default");
        assert_eq!(shaders.default_shader(), ShaderIndex(0));
        assert_eq!(shaders.name(ShaderIndex(0)), Some("canvas:default"));

        let wavy = shaders.register("canvas:wavy").unwrap();
        assert_eq!(wavy, ShaderIndex(1));
        assert_eq!(shaders.len(), 2);
    }

    #[test]
    fn test_condition_registry_always_at_zero() {
        let conditions = ConditionRegistry::new();
        assert_eq!(conditions.always(), ConditionIndex(0));
        assert_eq!(conditions.find(ALWAYS_CONDITION), Some(ConditionIndex(0)));
        assert_eq!(
            conditions.iter().collect::<Vec<_>>(),
            vec![(ConditionIndex(0), ALWAYS_CONDITION)]
        );
    }

    #[test]
    fn test_condition_registry_capacity_matches_layout() {
        let mut conditions = ConditionRegistry::new();
        for i in 1..MAX_CONDITIONS {
            conditions.register(&format!("condition_{i}")).unwrap();
        }
        assert_eq!(conditions.len(), MAX_CONDITIONS);
        assert!(conditions.register("one_too_many").is_err());
    }
}

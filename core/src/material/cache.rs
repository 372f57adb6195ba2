//! Canonical material state cache
//!
//! Maps every distinct packed pattern to exactly one [`MaterialState`].
//! Lookup, creation and variant derivation for a request all happen in one
//! critical section, so a state is fully derived before any caller can see it.

use std::sync::{Arc, Mutex, MutexGuard};

use canvas_shared::{MaterialIndex, ShaderIndex};
use hashbrown::HashMap;

use super::attributes::{MaterialAttributes, PackedMaterial};
use super::state::MaterialState;
use super::variants;
use crate::config::MaterialConfig;
use crate::error::MaterialError;
use crate::registry::ShaderRegistry;
use crate::timer::MicroTimer;

/// How a newly created state gets its variants
pub(crate) enum Derivation<'a> {
    /// Derive before returning (top-level lookups)
    Now,
    /// Queue for the derivation already in progress
    Deferred(&'a mut Vec<Arc<MaterialState>>),
}

pub(crate) struct CacheInner {
    /// States by index
    states: Vec<Arc<MaterialState>>,
    /// Deduplication map (pattern -> index)
    map: HashMap<PackedMaterial, MaterialIndex>,
    timer: Option<MicroTimer>,
}

impl CacheInner {
    fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(initial_capacity),
            map: HashMap::with_capacity(initial_capacity),
            timer: None,
        }
    }

    pub(crate) fn find_or_create(
        &mut self,
        key: PackedMaterial,
        derivation: Derivation<'_>,
    ) -> Arc<MaterialState> {
        if let Some(&existing) = self.map.get(&key) {
            return Arc::clone(&self.states[existing.as_usize()]);
        }

        assert!(
            key.cutout_flags_consistent(),
            "material bits {:#014x} have cutout flags that disagree with their blend modes",
            key.bits()
        );

        let Ok(raw) = u32::try_from(self.states.len()) else {
            panic!("material index space exhausted");
        };
        let index = MaterialIndex(raw);
        let state = Arc::new(MaterialState::new(index, key));
        self.states.push(Arc::clone(&state));
        self.map.insert(key, index);

        tracing::debug!(
            index = raw,
            bits = format_args!("{:#014x}", key.bits()),
            depth = key.sprite_depth(),
            "created material state"
        );

        match derivation {
            Derivation::Now => self.derive_pending(Arc::clone(&state)),
            Derivation::Deferred(pending) => pending.push(Arc::clone(&state)),
        }

        state
    }

    /// Derive `root` and every state created while doing so
    fn derive_pending(&mut self, root: Arc<MaterialState>) {
        let mut pending = vec![root];
        while let Some(state) = pending.pop() {
            let derived = variants::derive(&state, self, &mut pending);
            state.set_variants(derived);
        }
    }
}

/// Deduplicating store of canonical material states.
///
/// States live as long as the cache; there is no eviction. All methods take
/// `&self` and are safe to call from many threads.
pub struct MaterialCache {
    default_shader: ShaderIndex,
    inner: Mutex<CacheInner>,
}

impl std::fmt::Debug for MaterialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialCache")
            .field("default_shader", &self.default_shader)
            .field("len", &self.len())
            .finish()
    }
}

impl MaterialCache {
    /// Create an empty cache.
    ///
    /// `default_shader` is substituted for materials that do not pick one.
    pub fn new(default_shader: ShaderIndex) -> Self {
        Self::with_inner(default_shader, CacheInner::with_capacity(0))
    }

    /// Create a cache from configuration.
    ///
    /// The default shader is looked up by name in `shaders`.
    pub fn with_config(
        config: &MaterialConfig,
        shaders: &ShaderRegistry,
    ) -> Result<Self, MaterialError> {
        let default_shader = shaders.lookup(&config.shaders.default_shader)?;

        let mut inner = CacheInner::with_capacity(config.cache.initial_capacity);
        if config.timing.enabled {
            inner.timer = Some(MicroTimer::new("material lookup", config.timing.sample_size));
        }

        tracing::info!(
            default_shader = %config.shaders.default_shader,
            initial_capacity = config.cache.initial_capacity,
            timing = config.timing.enabled,
            "material cache created"
        );

        Ok(Self::with_inner(default_shader, inner))
    }

    fn with_inner(default_shader: ShaderIndex, inner: CacheInner) -> Self {
        Self {
            default_shader,
            inner: Mutex::new(inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // A panic mid-derivation can leave a state without variants; the
        // cache cannot be trusted after that.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("material cache mutex poisoned by an earlier panic"),
        }
    }

    /// Shader used for materials that do not select one
    pub fn default_shader(&self) -> ShaderIndex {
        self.default_shader
    }

    /// Canonical state for `attributes`, creating and deriving it if needed.
    ///
    /// `attributes` must already be validated and carry a concrete shader;
    /// [`MaterialFinder::find`](super::MaterialFinder::find) is the public
    /// entry point.
    pub(crate) fn resolve(&self, attributes: &MaterialAttributes) -> Arc<MaterialState> {
        self.resolve_packed(attributes.encode())
    }

    pub(crate) fn resolve_packed(&self, key: PackedMaterial) -> Arc<MaterialState> {
        let mut inner = self.lock();

        if let Some(timer) = inner.timer.as_mut() {
            timer.start();
        }

        let state = inner.find_or_create(key, Derivation::Now);

        if let Some(timer) = inner.timer.as_mut() {
            timer.stop();
        }

        state
    }

    /// State by index.
    ///
    /// # Panics
    ///
    /// Panics if no state with this index exists.
    pub fn by_index(&self, index: MaterialIndex) -> Arc<MaterialState> {
        match self.get(index) {
            Some(state) => state,
            None => panic!(
                "material index {} out of range ({} states)",
                index,
                self.len()
            ),
        }
    }

    /// State by index, `None` when out of range
    pub fn get(&self, index: MaterialIndex) -> Option<Arc<MaterialState>> {
        self.lock().states.get(index.as_usize()).cloned()
    }

    /// Number of canonical states
    pub fn len(&self) -> usize {
        self.lock().states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().states.is_empty()
    }

    /// Snapshot of all states in index order
    pub fn states(&self) -> Vec<Arc<MaterialState>> {
        self.lock().states.clone()
    }

    /// Force a timing report for lookups since the last one
    pub fn report_timing(&self) {
        if let Some(timer) = self.lock().timer.as_mut() {
            timer.report_and_clear();
        }
    }
}

impl Default for MaterialCache {
    fn default() -> Self {
        Self::new(ShaderIndex(0))
    }
}

//! Standard materials for quads that carry no material of their own

use std::sync::Arc;

use super::cache::MaterialCache;
use super::finder::MaterialFinder;
use super::state::MaterialState;
use crate::error::MaterialError;

/// The four single-layer fallback materials.
///
/// All inherit their blend mode; only diffuse shading and AO vary.
#[derive(Debug, Clone)]
pub struct StandardMaterials {
    /// Diffuse and AO disabled
    pub flat: Arc<MaterialState>,
    /// AO disabled
    pub shaded: Arc<MaterialState>,
    /// Diffuse disabled
    pub ao_flat: Arc<MaterialState>,
    /// Diffuse and AO enabled
    pub ao_shaded: Arc<MaterialState>,
}

impl StandardMaterials {
    pub fn new(cache: &MaterialCache) -> Result<Self, MaterialError> {
        let mut finder = MaterialFinder::new();

        let flat = finder
            .disable_diffuse(0, true)?
            .disable_ao(0, true)?
            .find(cache);
        let shaded = finder.clear().disable_ao(0, true)?.find(cache);
        let ao_flat = finder.clear().disable_diffuse(0, true)?.find(cache);
        let ao_shaded = finder.clear().find(cache);

        Ok(Self {
            flat,
            shaded,
            ao_flat,
            ao_shaded,
        })
    }

    /// Material for a quad with the given shading requirements
    pub fn select(&self, disable_diffuse: bool, use_ao: bool) -> &Arc<MaterialState> {
        match (disable_diffuse, use_ao) {
            (true, true) => &self.ao_flat,
            (true, false) => &self.flat,
            (false, true) => &self.ao_shaded,
            (false, false) => &self.shaded,
        }
    }
}

//! Tag-keyed material presets.

use std::collections::HashMap;

use cgmath::Vector3;

/// A lighting material: diffuse and specular reflectance plus the specular
/// exponent. Color components are conventionally in `[0, 1]`; shininess
/// must be positive.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: f32,
}

impl Material {
    pub fn new(
        tag: &str,
        diffuse: (f32, f32, f32),
        specular: (f32, f32, f32),
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            diffuse: diffuse.into(),
            specular: specular.into(),
            shininess,
        }
    }

    /// Neutral matte gray, uploaded for draws that name no material so that
    /// no draw inherits uniform state from the previous one.
    pub fn default_neutral() -> Self {
        Self::new("", (0.8, 0.8, 0.8), (0.0, 0.0, 0.0), 1.0)
    }
}

/// Flat registry of material presets, populated once during scene
/// preparation and immutable afterwards.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    by_tag: HashMap<String, Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preset. The first entry for a tag wins; a duplicate tag
    /// is dropped with a warning. A non-positive shininess is accepted but
    /// flagged, since it breaks the specular exponent contract.
    pub fn define(&mut self, material: Material) {
        if material.shininess <= 0.0 {
            log::warn!(
                "material {:?} has non-positive shininess {}",
                material.tag,
                material.shininess
            );
        }
        if self.by_tag.contains_key(&material.tag) {
            log::warn!(
                "material tag {:?} is already defined, keeping the first entry",
                material.tag
            );
            return;
        }
        self.by_tag.insert(material.tag.clone(), material);
    }

    /// Look up a preset by exact tag. Returns `None` whenever no entry
    /// matches, including for a populated registry.
    pub fn find(&self, tag: &str) -> Option<&Material> {
        self.by_tag.get(tag)
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

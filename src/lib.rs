//! still-life
//!
//! A scene-preparation and immediate-mode rendering layer for a fixed
//! tabletop scene (a table, two chairs, plates and mugs) built from a small
//! library of primitive meshes. The crate owns texture and material
//! registries, a transform composer and the per-draw uniform binding; the
//! graphics context, the shader-parameter store and the mesh cache sit
//! behind traits so the core can be driven by the wgpu backend or by a
//! recording double in tests.
//!
//! High-level modules
//! - `shader`: uniform names and the [`shader::ShaderParams`] seam
//! - `transform`: scale/rotation/translation to model-matrix composition
//! - `resources`: texture registry, material registry and primitive meshes
//! - `lights`: the fixed directional + point light rig
//! - `render`: draw directives and the generic submit routine
//! - `scene`: prepare/render lifecycle and the canonical scene script
//! - `context`, `pipelines`: the wgpu production backend
//!
//! The intended flow is one call to [`scene::Scene::prepare`] followed by
//! one [`scene::Scene::render`] per displayed frame.

pub mod context;
pub mod lights;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shader;
pub mod transform;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;

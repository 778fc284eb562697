//! Scene resources: textures, materials and primitive meshes.
//!
//! - `texture` contains the slot-bounded texture registry and upload seam
//! - `material` contains the tag-keyed material presets
//! - `mesh` contains the primitive kinds, procedural geometry and the
//!   mesh-cache seam

pub mod material;
pub mod mesh;
pub mod texture;

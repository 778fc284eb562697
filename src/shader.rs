//! Uniform names and the shader-parameter seam.
//!
//! The rendering core never talks to a graphics API directly; it pushes
//! named uniform values through [`ShaderParams`]. The production backend
//! ([`crate::context::GpuContext`]) maps the names onto uniform-buffer
//! fields, tests substitute a recording implementation.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

/// Fixed uniform names shared between the core and every backend.
pub mod uniform {
    pub const MODEL: &str = "model";
    pub const OBJECT_COLOR: &str = "objectColor";
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    pub const USE_TEXTURE: &str = "bUseTexture";
    pub const USE_LIGHTING: &str = "bUseLighting";
    pub const UV_SCALE: &str = "UVscale";
    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    pub const MATERIAL_SHININESS: &str = "material.shininess";
}

/// Named-uniform setter interface consumed by every draw call.
///
/// Implementations are free to ignore names they do not know, but should
/// log them; the core only ever uses the names in [`uniform`] and the
/// light-rig names written by [`crate::lights::LightingRig::configure`].
pub trait ShaderParams {
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>);
    /// Select the bound texture unit sampled by `name`.
    fn set_sampler(&mut self, name: &str, unit: u32);
}

//! Draw directives and the generic submit routine.
//!
//! The scene script is a plain list of [`DrawDirective`] values. [`submit`]
//! is the single place that turns one directive into uniform uploads and a
//! draw call, always in the same order: transform, fill, material, draw.
//! Every directive carries its complete state; nothing leaks from one draw
//! into the next.

use cgmath::{Vector2, Vector4};

use crate::{
    resources::{
        material::{Material, MaterialRegistry},
        mesh::{MeshLibrary, Primitive},
        texture::TextureRegistry,
    },
    shader::{ShaderParams, uniform},
    transform::Transform,
};

/// Flat-color fallback when a directive references an unknown texture tag.
const MISSING_TEXTURE_COLOR: Vector4<f32> = Vector4::new(1.0, 0.0, 1.0, 1.0);

/// How a surface is filled: a flat color or a tagged texture. The two are
/// mutually exclusive per draw; a textured-and-tinted object is not
/// supported by the binder.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(Vector4<f32>),
    Textured {
        tag: String,
        uv_scale: Vector2<f32>,
    },
}

/// One object instance to render: complete transform, fill, material and
/// primitive kind.
#[derive(Clone, Debug)]
pub struct DrawDirective {
    pub transform: Transform,
    pub fill: Fill,
    pub material: Option<String>,
    pub primitive: Primitive,
}

impl DrawDirective {
    pub fn solid(primitive: Primitive, transform: Transform, rgba: (f32, f32, f32, f32)) -> Self {
        Self {
            transform,
            fill: Fill::Solid(Vector4::new(rgba.0, rgba.1, rgba.2, rgba.3)),
            material: None,
            primitive,
        }
    }

    pub fn textured(primitive: Primitive, transform: Transform, tag: &str) -> Self {
        Self {
            transform,
            fill: Fill::Textured {
                tag: tag.to_string(),
                uv_scale: Vector2::new(1.0, 1.0),
            },
            material: None,
            primitive,
        }
    }

    pub fn with_material(mut self, tag: &str) -> Self {
        self.material = Some(tag.to_string());
        self
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        if let Fill::Textured { uv_scale, .. } = &mut self.fill {
            *uv_scale = Vector2::new(u, v);
        }
        self
    }
}

/// Render one directive: upload its transform, fill and material uniforms,
/// then issue the draw call.
///
/// An unresolvable texture tag never reaches the sampler uniform; it is
/// logged and the draw degrades to a flat debug color. A missing or
/// unresolvable material uploads the neutral default so stale material
/// uniforms from an earlier draw are never re-used.
pub fn submit<B: ShaderParams + MeshLibrary, H>(
    backend: &mut B,
    textures: &TextureRegistry<H>,
    materials: &MaterialRegistry,
    directive: &DrawDirective,
) {
    backend.set_mat4(uniform::MODEL, directive.transform.matrix());

    match &directive.fill {
        Fill::Solid(color) => {
            backend.set_bool(uniform::USE_TEXTURE, false);
            backend.set_vec4(uniform::OBJECT_COLOR, *color);
        }
        Fill::Textured { tag, uv_scale } => match textures.find_unit(tag) {
            Some(unit) => {
                backend.set_bool(uniform::USE_TEXTURE, true);
                backend.set_sampler(uniform::OBJECT_TEXTURE, unit as u32);
                backend.set_vec2(uniform::UV_SCALE, *uv_scale);
            }
            None => {
                log::error!("no texture registered for tag {tag:?}, drawing flat");
                backend.set_bool(uniform::USE_TEXTURE, false);
                backend.set_vec4(uniform::OBJECT_COLOR, MISSING_TEXTURE_COLOR);
            }
        },
    }

    let neutral = Material::default_neutral();
    let material = match &directive.material {
        Some(tag) => materials.find(tag).unwrap_or_else(|| {
            log::error!("no material defined for tag {tag:?}, using the neutral default");
            &neutral
        }),
        None => &neutral,
    };
    backend.set_vec3(uniform::MATERIAL_DIFFUSE, material.diffuse);
    backend.set_vec3(uniform::MATERIAL_SPECULAR, material.specular);
    backend.set_float(uniform::MATERIAL_SHININESS, material.shininess);

    backend.draw(directive.primitive);
}

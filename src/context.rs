//! The wgpu production backend.
//!
//! [`GpuContext`] implements all three seams the scene core talks through:
//! [`ShaderParams`] by mapping uniform names onto two bytemuck blocks (one
//! per-draw block carried per draw with a dynamic offset, one globals block
//! with camera and lights), [`TextureUpload`] with one bind group per
//! loaded texture, and [`MeshLibrary`] with vertex/index buffers generated
//! from the procedural primitives.
//!
//! Draw calls are collected in script order during [`crate::scene::Scene::
//! render`] and flushed into a single depth-tested render pass by
//! [`GpuContext::render_frame`]. The surface, window and camera controls
//! stay with the host; it hands in the target views and the
//! view-projection via [`GpuContext::set_view`].

use std::{collections::HashMap, iter};

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix4, Point3, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    pipelines,
    resources::{
        mesh::{MeshData, MeshLibrary, Primitive},
        texture::TextureUpload,
    },
    shader::{ShaderParams, uniform},
};

/// Dynamic-offset stride for the per-draw uniform block; the common
/// minimum uniform-buffer offset alignment.
const DRAW_UNIFORM_STRIDE: wgpu::BufferAddress = 256;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    object_color: [f32; 4],
    material_diffuse: [f32; 3],
    material_shininess: f32,
    material_specular: [f32; 3],
    use_texture: u32,
    uv_scale: [f32; 2],
    _padding: [f32; 2],
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            model: Matrix4::identity().into(),
            object_color: [1.0, 1.0, 1.0, 1.0],
            material_diffuse: [0.8, 0.8, 0.8],
            material_shininess: 1.0,
            material_specular: [0.0, 0.0, 0.0],
            use_texture: 0,
            uv_scale: [1.0, 1.0],
            _padding: [0.0, 0.0],
        }
    }
}

// Vec3 fields need 16 byte alignment in uniform blocks, hence the padding
// slots after each one.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
struct LightUniform {
    position: [f32; 3],
    active: u32,
    ambient: [f32; 3],
    _padding0: u32,
    diffuse: [f32; 3],
    _padding1: u32,
    specular: [f32; 3],
    _padding2: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct GlobalUniforms {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 3],
    use_lighting: u32,
    directional: LightUniform,
    point_lights: [LightUniform; 3],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            camera_position: [0.0, 0.0, 0.0],
            use_lighting: 0,
            directional: LightUniform::default(),
            point_lights: [LightUniform::default(); 3],
        }
    }
}

/// A GPU-resident scene texture: the resource plus its ready-made bind
/// group.
#[derive(Clone, Debug)]
pub struct SceneTexture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
}

#[derive(Debug)]
struct FrameDraw {
    uniforms: DrawUniforms,
    unit: Option<usize>,
    primitive: Primitive,
}

#[derive(Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    draw_layout: wgpu::BindGroupLayout,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    default_texture_group: wgpu::BindGroup,
    units: Vec<wgpu::BindGroup>,
    meshes: HashMap<Primitive, GpuMesh>,
    globals: GlobalUniforms,
    current: DrawUniforms,
    current_unit: Option<usize>,
    frame: Vec<FrameDraw>,
    draw_buffer: Option<(wgpu::Buffer, wgpu::BindGroup, usize)>,
}

impl GpuContext {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let draw_layout = pipelines::scene::draw_uniform_layout(
            &device,
            std::mem::size_of::<DrawUniforms>() as wgpu::BufferAddress,
        );
        let globals_layout = pipelines::scene::globals_layout(&device);
        let texture_layout = pipelines::scene::texture_layout(&device);
        let pipeline = pipelines::scene::mk_scene_pipeline(
            &device,
            color_format,
            Self::DEPTH_FORMAT,
            &draw_layout,
            &globals_layout,
            &texture_layout,
        );

        let globals = GlobalUniforms::default();
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::bytes_of(&globals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: Some("globals_bind_group"),
        });

        let default_texture_group =
            create_default_texture_group(&device, &queue, &texture_layout);

        Self {
            device,
            queue,
            pipeline,
            draw_layout,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            default_texture_group,
            units: Vec::new(),
            meshes: HashMap::new(),
            globals: GlobalUniforms::default(),
            current: DrawUniforms::default(),
            current_unit: None,
            frame: Vec::new(),
            draw_buffer: None,
        }
    }

    /// Take the host camera's product for this frame.
    pub fn set_view(&mut self, view_proj: Matrix4<f32>, eye: Point3<f32>) {
        self.globals.view_proj = view_proj.into();
        self.globals.camera_position = [eye.x, eye.y, eye.z];
    }

    /// Create a depth texture matching a render target of `size` pixels.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size[0].max(1),
                height: size[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Pending draw submissions collected since the last flush.
    pub fn pending_draws(&self) -> usize {
        self.frame.len()
    }

    /// Flush every collected draw into one depth-tested pass on `view`.
    pub fn render_frame(
        &mut self,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear_colour: wgpu::Color,
    ) {
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&self.globals));

        // One dynamic-offset uniform buffer carries all draws; grow it when
        // the script outgrows the previous frame's allocation.
        let needed = self.frame.len().max(1);
        let grow = match &self.draw_buffer {
            Some((_, _, capacity)) => *capacity < needed,
            None => true,
        };
        if grow {
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Draw Uniform Buffer"),
                size: needed as wgpu::BufferAddress * DRAW_UNIFORM_STRIDE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.draw_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(
                            std::mem::size_of::<DrawUniforms>() as wgpu::BufferAddress
                        ),
                    }),
                }],
                label: Some("draw_uniform_bind_group"),
            });
            self.draw_buffer = Some((buffer, bind_group, needed));
        }
        let Some((draw_buffer, draw_bind_group, _)) = self.draw_buffer.as_ref() else {
            return;
        };

        for (i, draw) in self.frame.iter().enumerate() {
            self.queue.write_buffer(
                draw_buffer,
                i as wgpu::BufferAddress * DRAW_UNIFORM_STRIDE,
                bytemuck::bytes_of(&draw.uniforms),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            for (i, draw) in self.frame.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.primitive) else {
                    continue;
                };
                let offset = i as wgpu::BufferAddress * DRAW_UNIFORM_STRIDE;
                render_pass.set_bind_group(0, draw_bind_group, &[offset as u32]);
                render_pass.set_bind_group(1, &self.globals_bind_group, &[]);
                let texture_group = draw
                    .unit
                    .and_then(|unit| self.units.get(unit))
                    .unwrap_or(&self.default_texture_group);
                render_pass.set_bind_group(2, texture_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        self.frame.clear();
    }

    /// Route a uniform name to the light slot and field it addresses.
    fn light_slot(&mut self, name: &str) -> Option<(&mut LightUniform, &'static str)> {
        let field_of = |field: &str| -> Option<&'static str> {
            match field {
                "position" | "direction" => Some("position"),
                "ambient" => Some("ambient"),
                "diffuse" => Some("diffuse"),
                "specular" => Some("specular"),
                "bActive" => Some("bActive"),
                _ => None,
            }
        };
        if let Some(field) = name.strip_prefix("directionalLight.") {
            return Some((&mut self.globals.directional, field_of(field)?));
        }
        if let Some(rest) = name.strip_prefix("pointLights[") {
            let (index, field) = rest.split_once("].")?;
            let index: usize = index.parse().ok()?;
            let field = field_of(field)?;
            return self
                .globals
                .point_lights
                .get_mut(index)
                .map(|light| (light, field));
        }
        None
    }
}

fn create_default_texture_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::BindGroup {
    // 1x1 white stand-in bound for untextured draws; the shader skips
    // sampling for those, but the bind group slot must be filled.
    let size = wgpu::Extent3d {
        width: 1,
        height: 1,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("default white texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        &[255, 255, 255, 255],
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(1),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = create_scene_sampler(device);
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some("default_texture_bind_group"),
    })
}

// Repeat wrapping plus linear min/mag filtering, matching the scene's
// tiling floor and tabletop textures.
fn create_scene_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}

impl ShaderParams for GpuContext {
    fn set_bool(&mut self, name: &str, value: bool) {
        if name == uniform::USE_TEXTURE {
            self.current.use_texture = value as u32;
            if !value {
                self.current_unit = None;
            }
            return;
        }
        if name == uniform::USE_LIGHTING {
            self.globals.use_lighting = value as u32;
            return;
        }
        if let Some((light, "bActive")) = self.light_slot(name) {
            light.active = value as u32;
            return;
        }
        log::warn!("unknown bool uniform {name:?}");
    }

    fn set_int(&mut self, name: &str, _value: i32) {
        log::warn!("unknown int uniform {name:?}");
    }

    fn set_float(&mut self, name: &str, value: f32) {
        if name == uniform::MATERIAL_SHININESS {
            self.current.material_shininess = value;
            return;
        }
        log::warn!("unknown float uniform {name:?}");
    }

    fn set_vec2(&mut self, name: &str, value: cgmath::Vector2<f32>) {
        if name == uniform::UV_SCALE {
            self.current.uv_scale = value.into();
            return;
        }
        log::warn!("unknown vec2 uniform {name:?}");
    }

    fn set_vec3(&mut self, name: &str, value: cgmath::Vector3<f32>) {
        match name {
            uniform::MATERIAL_DIFFUSE => {
                self.current.material_diffuse = value.into();
                return;
            }
            uniform::MATERIAL_SPECULAR => {
                self.current.material_specular = value.into();
                return;
            }
            _ => {}
        }
        if let Some((light, field)) = self.light_slot(name) {
            let value: [f32; 3] = value.into();
            match field {
                "position" => light.position = value,
                "ambient" => light.ambient = value,
                "diffuse" => light.diffuse = value,
                "specular" => light.specular = value,
                _ => {}
            }
            return;
        }
        log::warn!("unknown vec3 uniform {name:?}");
    }

    fn set_vec4(&mut self, name: &str, value: cgmath::Vector4<f32>) {
        if name == uniform::OBJECT_COLOR {
            self.current.object_color = value.into();
            return;
        }
        log::warn!("unknown vec4 uniform {name:?}");
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        if name == uniform::MODEL {
            self.current.model = value.into();
            return;
        }
        log::warn!("unknown mat4 uniform {name:?}");
    }

    fn set_sampler(&mut self, name: &str, unit: u32) {
        if name == uniform::OBJECT_TEXTURE {
            self.current_unit = Some(unit as usize);
            return;
        }
        log::warn!("unknown sampler uniform {name:?}");
    }
}

impl TextureUpload for GpuContext {
    type Handle = SceneTexture;

    fn upload(&mut self, label: &str, image: &image::RgbaImage) -> Result<SceneTexture> {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            image,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_scene_sampler(&self.device);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some(label),
        });
        Ok(SceneTexture {
            texture,
            view,
            sampler,
            bind_group,
        })
    }

    fn bind(&mut self, unit: usize, handle: &SceneTexture) {
        if self.units.len() <= unit {
            self.units
                .resize(unit + 1, self.default_texture_group.clone());
        }
        self.units[unit] = handle.bind_group.clone();
    }
}

impl MeshLibrary for GpuContext {
    fn load(&mut self, primitive: Primitive) {
        if self.meshes.contains_key(&primitive) {
            return;
        }
        let data = MeshData::generate(primitive);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{primitive:?} Vertex Buffer")),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{primitive:?} Index Buffer")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.meshes.insert(
            primitive,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                num_elements: data.indices.len() as u32,
            },
        );
    }

    fn draw(&mut self, primitive: Primitive) {
        if !self.meshes.contains_key(&primitive) {
            log::warn!("{primitive:?} drawn before its mesh was loaded, skipping");
            return;
        }
        self.frame.push(FrameDraw {
            uniforms: self.current,
            unit: if self.current.use_texture != 0 {
                self.current_unit
            } else {
                None
            },
            primitive,
        });
    }
}

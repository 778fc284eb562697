//! Primitive meshes: kinds, procedural geometry and the cache seam.
//!
//! Geometry for each primitive kind is generated exactly once during scene
//! preparation and reused for every draw. The dimensions follow the unit
//! conventions the scene script was authored against: the plane spans
//! `[-1, 1]` in XZ, the box is a unit cube centered on the origin, both
//! cylinders have unit height with their base circle on `y = 0`, and the
//! torus has major radius 1 with a 0.25 tube.

use bytemuck::{Pod, Zeroable};

/// Around-the-axis tessellation for cylinders and the torus.
const RADIAL_SEGMENTS: u32 = 32;
/// Around-the-tube tessellation for the torus.
const TUBE_SEGMENTS: u32 = 18;

const TAPERED_TOP_RADIUS: f32 = 0.5;
const TORUS_TUBE_RADIUS: f32 = 0.25;

/// One of the fixed mesh shapes shared by all scripted objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Plane,
    Box,
    TaperedCylinder,
    Cylinder,
    Torus,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Plane,
        Primitive::Box,
        Primitive::TaperedCylinder,
        Primitive::Cylinder,
        Primitive::Torus,
    ];
}

/// Seam to the mesh-geometry cache.
///
/// `load` generates and caches the vertex data for one primitive kind;
/// `draw` emits a draw call against the cached geometry. Loading happens
/// once during Prepare no matter how often the primitive is drawn.
pub trait MeshLibrary {
    fn load(&mut self, primitive: Primitive);
    fn draw(&mut self, primitive: Primitive);
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU-side geometry for one primitive, ready for buffer upload.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn generate(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Plane => plane(),
            Primitive::Box => boxed(),
            Primitive::TaperedCylinder => cylinder(1.0, TAPERED_TOP_RADIUS),
            Primitive::Cylinder => cylinder(1.0, 1.0),
            Primitive::Torus => torus(1.0, TORUS_TUBE_RADIUS),
        }
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            position,
            normal,
            tex_coords,
        });
        index
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    let up = [0.0, 1.0, 0.0];
    let a = mesh.push([-1.0, 0.0, -1.0], up, [0.0, 1.0]);
    let b = mesh.push([-1.0, 0.0, 1.0], up, [0.0, 0.0]);
    let c = mesh.push([1.0, 0.0, 1.0], up, [1.0, 0.0]);
    let d = mesh.push([1.0, 0.0, -1.0], up, [1.0, 1.0]);
    mesh.quad(a, b, c, d);
    mesh
}

fn boxed() -> MeshData {
    let mut mesh = MeshData::default();
    // One face per normal so the shading stays flat; 24 vertices total.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // (normal, tangent-u, tangent-v), face center = normal / 2
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| {
            [
                0.5 * (n[0] + su * u[0] + sv * v[0]),
                0.5 * (n[1] + su * u[1] + sv * v[1]),
                0.5 * (n[2] + su * u[2] + sv * v[2]),
            ]
        };
        let a = mesh.push(corner(-1.0, -1.0), n, [0.0, 0.0]);
        let b = mesh.push(corner(1.0, -1.0), n, [1.0, 0.0]);
        let c = mesh.push(corner(1.0, 1.0), n, [1.0, 1.0]);
        let d = mesh.push(corner(-1.0, 1.0), n, [0.0, 1.0]);
        mesh.quad(a, b, c, d);
    }
    mesh
}

/// Open-profile cylinder/frustum with base radius `bottom` on `y = 0`, top
/// radius `top` on `y = 1`, plus both caps.
fn cylinder(bottom: f32, top: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let tau = std::f32::consts::TAU;

    // Lateral surface: the seam column is duplicated for clean UVs. The
    // outward normal of the sloped profile is (cos, bottom - top, sin)
    // before normalization.
    for segment in 0..=RADIAL_SEGMENTS {
        let t = segment as f32 / RADIAL_SEGMENTS as f32;
        let (sin, cos) = (t * tau).sin_cos();
        let slope = bottom - top;
        let len = (1.0 + slope * slope).sqrt();
        let normal = [cos / len, slope / len, sin / len];
        mesh.push([bottom * cos, 0.0, bottom * sin], normal, [t, 0.0]);
        mesh.push([top * cos, 1.0, top * sin], normal, [t, 1.0]);
    }
    for segment in 0..RADIAL_SEGMENTS {
        let base = segment * 2;
        mesh.quad(base, base + 2, base + 3, base + 1);
    }

    // Caps as triangle fans around a center vertex.
    for (y, radius, ny) in [(0.0, bottom, -1.0), (1.0, top, 1.0)] {
        let normal = [0.0, ny, 0.0];
        let center = mesh.push([0.0, y, 0.0], normal, [0.5, 0.5]);
        let mut ring = Vec::with_capacity(RADIAL_SEGMENTS as usize + 1);
        for segment in 0..=RADIAL_SEGMENTS {
            let t = segment as f32 / RADIAL_SEGMENTS as f32;
            let (sin, cos) = (t * tau).sin_cos();
            ring.push(mesh.push(
                [radius * cos, y, radius * sin],
                normal,
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            ));
        }
        for pair in ring.windows(2) {
            mesh.indices.extend_from_slice(&[center, pair[0], pair[1]]);
        }
    }
    mesh
}

/// Torus in the XZ plane centered on the origin.
fn torus(major: f32, tube: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let tau = std::f32::consts::TAU;

    for ring in 0..=RADIAL_SEGMENTS {
        let u = ring as f32 / RADIAL_SEGMENTS as f32;
        let (ring_sin, ring_cos) = (u * tau).sin_cos();
        for side in 0..=TUBE_SEGMENTS {
            let v = side as f32 / TUBE_SEGMENTS as f32;
            let (tube_sin, tube_cos) = (v * tau).sin_cos();
            let radial = major + tube * tube_cos;
            mesh.push(
                [radial * ring_cos, tube * tube_sin, radial * ring_sin],
                [tube_cos * ring_cos, tube_sin, tube_cos * ring_sin],
                [u, v],
            );
        }
    }
    let stride = TUBE_SEGMENTS + 1;
    for ring in 0..RADIAL_SEGMENTS {
        for side in 0..TUBE_SEGMENTS {
            let a = ring * stride + side;
            let b = (ring + 1) * stride + side;
            mesh.quad(a, b, b + 1, a + 1);
        }
    }
    mesh
}

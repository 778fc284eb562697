use std::path::PathBuf;

use anyhow::{Result, bail};
use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use still_life::{
    resources::{
        mesh::{MeshLibrary, Primitive},
        texture::TextureUpload,
    },
    shader::ShaderParams,
};

/// Everything a backend can be asked to do, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    SetBool(String, bool),
    SetInt(String, i32),
    SetFloat(String, f32),
    SetVec2(String, [f32; 2]),
    SetVec3(String, [f32; 3]),
    SetVec4(String, [f32; 4]),
    SetMat4(String, [[f32; 4]; 4]),
    SetSampler(String, u32),
    Upload(String, u32, u32),
    Bind(usize, u32),
    Load(Primitive),
    Draw(Primitive),
}

/// Backend double that records every call instead of touching a GPU.
/// Texture handles are sequential ids.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub ops: Vec<Op>,
    pub fail_uploads: bool,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<Primitive> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Draw(primitive) => Some(*primitive),
                _ => None,
            })
            .collect()
    }

    pub fn loads(&self) -> Vec<Primitive> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Load(primitive) => Some(*primitive),
                _ => None,
            })
            .collect()
    }
}

impl ShaderParams for RecordingBackend {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.ops.push(Op::SetBool(name.to_string(), value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.ops.push(Op::SetInt(name.to_string(), value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.ops.push(Op::SetFloat(name.to_string(), value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.ops.push(Op::SetVec2(name.to_string(), value.into()));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.ops.push(Op::SetVec3(name.to_string(), value.into()));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.ops.push(Op::SetVec4(name.to_string(), value.into()));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.ops.push(Op::SetMat4(name.to_string(), value.into()));
    }

    fn set_sampler(&mut self, name: &str, unit: u32) {
        self.ops.push(Op::SetSampler(name.to_string(), unit));
    }
}

impl TextureUpload for RecordingBackend {
    type Handle = u32;

    fn upload(&mut self, label: &str, image: &image::RgbaImage) -> Result<u32> {
        if self.fail_uploads {
            bail!("upload rejected by test backend");
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.ops
            .push(Op::Upload(label.to_string(), image.width(), image.height()));
        Ok(handle)
    }

    fn bind(&mut self, unit: usize, handle: &u32) {
        self.ops.push(Op::Bind(unit, *handle));
    }
}

impl MeshLibrary for RecordingBackend {
    fn load(&mut self, primitive: Primitive) {
        self.ops.push(Op::Load(primitive));
    }

    fn draw(&mut self, primitive: Primitive) {
        self.ops.push(Op::Draw(primitive));
    }
}

/// Route core log output through the test harness.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write a small RGB png fixture and return its path. `name` must be
/// unique per test to keep parallel runs apart.
pub fn rgb_png_fixture(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("still-life-{}-{name}.png", std::process::id()));
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([180, 120, 60]));
    img.save(&path).unwrap();
    path
}

/// Write a single-channel grayscale png fixture and return its path.
pub fn gray_png_fixture(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("still-life-{}-{name}.png", std::process::id()));
    let img = image::GrayImage::from_pixel(4, 4, image::Luma([128]));
    img.save(&path).unwrap();
    path
}

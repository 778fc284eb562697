//! The fixed light rig and its one-shot shader configuration.

use cgmath::Vector3;

use crate::shader::{ShaderParams, uniform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
}

/// One light source. `position` is the world position for point lights and
/// the surface-to-light direction for the directional light.
#[derive(Clone, Debug)]
pub struct LightSource {
    pub kind: LightKind,
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

impl LightSource {
    fn new(
        kind: LightKind,
        position: (f32, f32, f32),
        ambient: (f32, f32, f32),
        diffuse: (f32, f32, f32),
        specular: (f32, f32, f32),
    ) -> Self {
        Self {
            kind,
            position: position.into(),
            ambient: ambient.into(),
            diffuse: diffuse.into(),
            specular: specular.into(),
            active: true,
        }
    }
}

/// The scene's light set: one directional light plus three point lights,
/// configured once during Prepare and immutable afterwards.
#[derive(Clone, Debug)]
pub struct LightingRig {
    pub directional: LightSource,
    pub points: Vec<LightSource>,
}

impl LightingRig {
    /// The rig the tabletop scene was authored with: a dim-bright overall
    /// directional light, a yellow light above the table and one yellow
    /// light to each side.
    pub fn table_scene() -> Self {
        Self {
            directional: LightSource::new(
                LightKind::Directional,
                (-6.0, 5.0, 5.0),
                (0.4, 0.4, 0.4),
                (0.6, 0.6, 0.6),
                (0.0, 0.0, 0.0),
            ),
            points: vec![
                LightSource::new(
                    LightKind::Point,
                    (0.0, 15.0, -8.0),
                    (0.03, 0.03, 0.0),
                    (0.4, 0.4, 0.0),
                    (1.0, 1.0, 0.0),
                ),
                LightSource::new(
                    LightKind::Point,
                    (5.0, 0.0, 10.0),
                    (0.0, 0.0, 0.0),
                    (0.2, 0.2, 0.0),
                    (1.0, 1.0, 0.0),
                ),
                LightSource::new(
                    LightKind::Point,
                    (-5.0, 0.0, 10.0),
                    (0.0, 0.0, 0.0),
                    (0.2, 0.2, 0.0),
                    (1.0, 1.0, 0.0),
                ),
            ],
        }
    }

    /// Write the whole rig plus the global lighting-enable flag into the
    /// shader parameters. Called once during Prepare; there is no runtime
    /// light mutation path.
    pub fn configure(&self, params: &mut impl ShaderParams) {
        params.set_vec3("directionalLight.direction", self.directional.position);
        params.set_vec3("directionalLight.ambient", self.directional.ambient);
        params.set_vec3("directionalLight.diffuse", self.directional.diffuse);
        params.set_vec3("directionalLight.specular", self.directional.specular);
        params.set_bool("directionalLight.bActive", self.directional.active);

        for (i, light) in self.points.iter().enumerate() {
            params.set_vec3(&format!("pointLights[{i}].position"), light.position);
            params.set_vec3(&format!("pointLights[{i}].ambient"), light.ambient);
            params.set_vec3(&format!("pointLights[{i}].diffuse"), light.diffuse);
            params.set_vec3(&format!("pointLights[{i}].specular"), light.specular);
            params.set_bool(&format!("pointLights[{i}].bActive"), light.active);
        }

        params.set_bool(uniform::USE_LIGHTING, true);
    }
}

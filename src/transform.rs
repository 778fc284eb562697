//! Model-matrix composition from scale, per-axis rotation and translation.

use cgmath::{Deg, Matrix4, Vector3};

/// Per-draw transform parameters: scale, rotation in degrees per axis, and
/// translation. Recomputed and re-uploaded for every draw call.
///
/// The composition order is a contract: translation outermost, then the Z,
/// Y and X rotations (applied in X-then-Y-then-Z order around the object's
/// local origin), innermost scale. Callers supplying rotation degrees rely
/// on exactly `T * Rz * Ry * Rx * S`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation_deg: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Transform {
    pub fn new(
        scale: (f32, f32, f32),
        rotation_deg: (f32, f32, f32),
        position: (f32, f32, f32),
    ) -> Self {
        Self {
            scale: scale.into(),
            rotation_deg: rotation_deg.into(),
            position: position.into(),
        }
    }

    /// Compose the model matrix as `T * Rz * Ry * Rx * S`.
    pub fn matrix(&self) -> Matrix4<f32> {
        let scale =
            Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation_x = Matrix4::from_angle_x(Deg(self.rotation_deg.x));
        let rotation_y = Matrix4::from_angle_y(Deg(self.rotation_deg.y));
        let rotation_z = Matrix4::from_angle_z(Deg(self.rotation_deg.z));
        let translation = Matrix4::from_translation(self.position);

        translation * rotation_z * rotation_y * rotation_x * scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_deg: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

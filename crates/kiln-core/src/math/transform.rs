// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::world;
use glam::{Mat4, Quat, Vec3};

/// Position, orientation, and scale of a scene entity.
///
/// The orientation maps world space into the entity's view space, so the
/// view matrix is `R * T(-position)` and the forward direction is the world
/// Z axis rotated by the inverse orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation.
    pub orientation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// A transform at `position` with identity orientation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// `T * R * S`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_quat(self.orientation)
            * Mat4::from_scale(self.scale)
    }

    /// `R * T(-position)`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orientation) * Mat4::from_translation(-self.position)
    }

    /// The world Z axis expressed in this transform's frame.
    pub fn direction(&self) -> Vec3 {
        self.orientation.conjugate() * world::Z
    }

    /// The world up axis expressed in this transform's frame.
    pub fn up(&self) -> Vec3 {
        self.orientation.conjugate() * world::Y
    }

    /// Orients the transform to look along `direction`.
    pub fn look_towards(&mut self, direction: Vec3) {
        let look_at = Mat4::look_at_rh(self.position, self.position + direction, world::Y);
        self.orientation = Quat::from_mat4(&look_at).normalize();
    }

    /// Applies pitch, yaw, and roll in degrees around the world axes.
    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.orientation = Quat::from_axis_angle(world::X, pitch.to_radians()) * self.orientation;
        self.orientation = Quat::from_axis_angle(world::Y, yaw.to_radians()) * self.orientation;
        self.orientation = Quat::from_axis_angle(world::Z, roll.to_radians()) * self.orientation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_matrix_scales_then_rotates_then_translates() {
        let transform = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            orientation: Quat::from_axis_angle(Vec3::Y, 90f32.to_radians()),
            scale: Vec3::splat(2.0),
        };
        let p = transform.model_matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let eye = transform.view_matrix().transform_point3(transform.position);
        assert_relative_eq!(eye.length(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_towards_matches_view_forward() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 5.0));
        transform.look_towards(Vec3::new(1.0, 0.0, 0.0));
        // A point ahead of the camera ends up on the view-space -Z axis.
        let ahead = transform
            .view_matrix()
            .transform_point3(Vec3::new(4.0, 0.0, 5.0));
        assert_relative_eq!(ahead.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ahead.z, -4.0, epsilon = 1e-5);
        // The world Z axis seen from the camera points backwards along the look direction.
        assert_relative_eq!(transform.direction().x, -1.0, epsilon = 1e-5);
    }
}

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

use crate::ecs::{Component, ComponentKind, SparseSet};
use crate::scene::Scene;
use kiln_core::math::Mat4;

/// Perspective projection parameters of the scene camera.
///
/// The camera looks through its entity's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width divided by height.
    pub aspect_ratio: f32,
    /// Distance to the near clipping plane.
    pub z_near: f32,
    /// Distance to the far clipping plane.
    pub z_far: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            z_near: 0.1,
            z_far: 1000.0,
        }
    }
}

impl CameraComponent {
    /// A perspective camera.
    pub fn new(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Right-handed perspective projection with OpenGL clip depth.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.z_near,
            self.z_far,
        )
    }
}

impl Component for CameraComponent {
    const KIND: ComponentKind = ComponentKind::Camera;

    fn storage(scene: &Scene) -> &SparseSet<Self> {
        &scene.cameras
    }

    fn storage_mut(scene: &mut Scene) -> &mut SparseSet<Self> {
        &mut scene.cameras
    }
}

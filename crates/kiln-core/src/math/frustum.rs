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

use glam::{Mat4, Vec3, Vec4};

/// A plane `normal . p + distance = 0` with a unit normal pointing inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub distance: f32,
}

impl Plane {
    fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length <= f32::EPSILON {
            return Self {
                normal: Vec3::ZERO,
                distance: coefficients.w,
            };
        }
        Self {
            normal: normal / length,
            distance: coefficients.w / length,
        }
    }

    /// Signed distance of `point` to the plane, positive on the inner side.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// The six planes bounding a camera's visible volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes from a view-projection matrix with OpenGL clip depth.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r3 + r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Conservative sphere test: only spheres entirely behind one plane are rejected.
    pub fn is_sphere_inside(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(center) >= -radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_frustum() -> Frustum {
        // Camera at the origin looking down -Z.
        let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 1.0, 0.1, 100.0);
        Frustum::from_view_projection(&projection)
    }

    #[test]
    fn test_sphere_fully_inside() {
        assert!(camera_frustum().is_sphere_inside(Vec3::new(0.0, 0.0, -10.0), 1.0));
    }

    #[test]
    fn test_sphere_fully_outside() {
        let frustum = camera_frustum();
        assert!(!frustum.is_sphere_inside(Vec3::new(0.0, 0.0, 10.0), 1.0));
        assert!(!frustum.is_sphere_inside(Vec3::new(100.0, 0.0, -10.0), 1.0));
        assert!(!frustum.is_sphere_inside(Vec3::new(0.0, 0.0, -200.0), 5.0));
    }

    #[test]
    fn test_sphere_straddling_plane_is_kept() {
        // Centre just behind the camera, radius reaching past the near plane.
        assert!(camera_frustum().is_sphere_inside(Vec3::new(0.0, 0.0, 0.5), 2.0));
        // Centre beyond the far plane, radius reaching back inside.
        assert!(camera_frustum().is_sphere_inside(Vec3::new(0.0, 0.0, -101.0), 2.0));
    }

    #[test]
    fn test_planes_are_normalized() {
        for plane in camera_frustum().planes {
            approx::assert_relative_eq!(plane.normal.length(), 1.0, epsilon = 1e-5);
        }
    }
}

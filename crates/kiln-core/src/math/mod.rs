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

//! Math types used across the engine.
//!
//! Vectors, matrices, and quaternions come from `glam`; this module adds the
//! engine-specific geometry on top.

mod frustum;
mod transform;

pub use self::frustum::{Frustum, Plane};
pub use self::transform::Transform;
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// World axes.
pub mod world {
    use glam::Vec3;

    /// The world X axis.
    pub const X: Vec3 = Vec3::X;
    /// The world up axis.
    pub const Y: Vec3 = Vec3::Y;
    /// The world Z axis.
    pub const Z: Vec3 = Vec3::Z;
}

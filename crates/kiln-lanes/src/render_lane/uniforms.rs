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

//! CPU mirrors of the engine's std140 uniform blocks.
//!
//! The GLSL declarations produced by [`UniformBlockLayout::glsl`] are
//! prepended to every compiled shader, so any stage can read the camera,
//! timer, and screen data without declaring them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// The `Camera` block at binding 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraBlock {
    /// World-space eye position.
    pub position: Vec3,
    _pad0: f32,
    /// Direction the camera faces.
    pub direction: Vec3,
    _pad1: f32,
    /// Perspective projection.
    pub projection_matrix: Mat4,
    /// World to view.
    pub view_matrix: Mat4,
    /// Projection times view.
    pub view_projection_matrix: Mat4,
}

impl CameraBlock {
    /// Packs the camera data with std140 padding.
    pub fn new(position: Vec3, direction: Vec3, projection_matrix: Mat4, view_matrix: Mat4) -> Self {
        Self {
            position,
            _pad0: 0.0,
            direction,
            _pad1: 0.0,
            projection_matrix,
            view_matrix,
            view_projection_matrix: projection_matrix * view_matrix,
        }
    }
}

/// The `Timer` block at binding 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TimerBlock {
    /// Milliseconds since start-up.
    pub time: u32,
}

/// The `Screen` block at binding 2.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct ScreenBlock {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// A uniform block's name, binding point, and member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBlockLayout {
    /// Block name.
    pub name: &'static str,
    /// Instance name used in shader bodies.
    pub instance: &'static str,
    /// Indexed binding point.
    pub binding: u32,
    /// Member declarations, one per line.
    pub members: &'static [&'static str],
}

impl UniformBlockLayout {
    /// The GLSL declaration of this block.
    pub fn glsl(&self) -> String {
        let mut source = format!(
            "layout( std140, binding = {} ) uniform {}\n{{\n",
            self.binding, self.name
        );
        for member in self.members {
            source.push('\t');
            source.push_str(member);
            source.push_str(";\n");
        }
        source.push_str("} ");
        source.push_str(self.instance);
        source.push_str(";\n");
        source
    }
}

/// Camera position, direction, and matrices.
pub const CAMERA_BLOCK: UniformBlockLayout = UniformBlockLayout {
    name: "Camera",
    instance: "camera",
    binding: 0,
    members: &[
        "vec3 position",
        "vec3 direction",
        "mat4 projectionMatrix",
        "mat4 viewMatrix",
        "mat4 viewProjectionMatrix",
    ],
};

/// Elapsed time.
pub const TIMER_BLOCK: UniformBlockLayout = UniformBlockLayout {
    name: "Timer",
    instance: "timer",
    binding: 1,
    members: &["uint time"],
};

/// Output size.
pub const SCREEN_BLOCK: UniformBlockLayout = UniformBlockLayout {
    name: "Screen",
    instance: "screen",
    binding: 2,
    members: &["uint width", "uint height"],
};

/// Every engine uniform block, ordered by binding.
pub const UNIFORM_BLOCKS: [UniformBlockLayout; 3] = [CAMERA_BLOCK, TIMER_BLOCK, SCREEN_BLOCK];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_block_matches_std140_size() {
        assert_eq!(std::mem::size_of::<CameraBlock>(), 16 + 16 + 3 * 64);
        assert_eq!(std::mem::size_of::<ScreenBlock>(), 8);
    }

    #[test]
    fn test_camera_block_offsets() {
        let block = CameraBlock::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z, Mat4::IDENTITY, Mat4::IDENTITY);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&block));
        assert_eq!(&floats[0..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&floats[4..7], &[0.0, 0.0, 1.0]);
        // First column of the projection matrix starts at byte 32.
        assert_eq!(floats[8], 1.0);
    }

    #[test]
    fn test_block_declaration() {
        assert_eq!(
            TIMER_BLOCK.glsl(),
            "layout( std140, binding = 1 ) uniform Timer\n{\n\tuint time;\n} timer;\n"
        );
        assert!(CAMERA_BLOCK.glsl().contains("\tmat4 viewProjectionMatrix;\n"));
    }
}

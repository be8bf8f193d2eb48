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

//! CPU-side geometry uploaded through [`GraphicsDevice::create_mesh`](crate::renderer::GraphicsDevice::create_mesh).

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One interleaved vertex, laid out to match the attribute table.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Location 0.
    pub position: [f32; 3],
    /// Location 1.
    pub normal: [f32; 3],
    /// Location 2.
    pub tangent: [f32; 3],
    /// Location 3.
    pub bitangent: [f32; 3],
    /// Location 4.
    pub color: [f32; 3],
    /// Locations 5 to 8.
    pub uv: [[f32; 2]; 4],
}

/// Indexed triangle geometry.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// The vertices.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// The per-axis maximum absolute extent of the vertex positions.
    ///
    /// Scaling this vector by an entity's scale and taking its length gives a
    /// conservative world-space bounding radius around the entity origin.
    pub fn bounding_radius_vector(&self) -> Vec3 {
        self.vertices
            .iter()
            .map(|vertex| Vec3::from(vertex.position).abs())
            .fold(Vec3::ZERO, Vec3::max)
    }
}

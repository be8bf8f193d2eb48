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

//! The frame's draw list, ready for submission.

use glam::{Mat4, Vec4};
use kiln_core::asset::{AssetHandle, Material};
use kiln_core::renderer::{Mesh, ShaderProgram};
use std::cmp::Ordering;

/// Everything needed to issue one draw call.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// The geometry.
    pub mesh: AssetHandle<Mesh>,
    /// The surface.
    pub material: AssetHandle<Material>,
    /// The program of the material's first layer.
    pub program: AssetHandle<ShaderProgram>,
    /// Model to world.
    pub model_matrix: Mat4,
    /// Squared distance from the camera.
    pub view_depth: f32,
    /// Whether the material blends.
    pub translucent: bool,
}

/// Draw commands sharing one camera.
#[derive(Debug, Clone, Default)]
pub struct RenderLayer {
    /// World to view.
    pub view_matrix: Mat4,
    /// Projection times view.
    pub view_projection_matrix: Mat4,
    /// The commands, in submission order once sorted.
    pub draw_commands: Vec<DrawCommand>,
}

impl RenderLayer {
    /// An empty layer seen through the given matrices.
    pub fn new(view_matrix: Mat4, view_projection_matrix: Mat4) -> Self {
        Self {
            view_matrix,
            view_projection_matrix,
            draw_commands: Vec::new(),
        }
    }

    /// Orders the commands for submission.
    ///
    /// Opaque commands come first, nearest first, with equal depths grouped
    /// by program, material, then mesh. Translucent commands follow, farthest
    /// first.
    pub fn sort(&mut self) {
        let (mut opaque, mut translucent): (Vec<_>, Vec<_>) = self
            .draw_commands
            .drain(..)
            .partition(|command| !command.translucent);

        opaque.sort_by(|a, b| {
            a.view_depth
                .total_cmp(&b.view_depth)
                .then_with(|| state_order(a, b))
        });
        translucent.sort_by(|a, b| b.view_depth.total_cmp(&a.view_depth));

        opaque.append(&mut translucent);
        self.draw_commands = opaque;
    }
}

fn state_order(a: &DrawCommand, b: &DrawCommand) -> Ordering {
    a.program
        .id()
        .cmp(&b.program.id())
        .then_with(|| a.material.id().cmp(&b.material.id()))
        .then_with(|| a.mesh.id().cmp(&b.mesh.id()))
}

/// One frame's worth of rendering work.
#[derive(Debug, Clone, Default)]
pub struct RenderPackage {
    /// Color the target is cleared to.
    pub clear_color: Vec4,
    /// Layers in submission order.
    pub layers: Vec<RenderLayer>,
}

impl RenderPackage {
    /// Total number of draw commands.
    pub fn draw_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.draw_commands.len()).sum()
    }
}

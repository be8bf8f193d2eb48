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

//! Turns a sorted render package into device calls.

use super::{FrameStats, RenderPackage};
use kiln_core::renderer::{EngineUniform, FramebufferId, GraphicsDevice, UniformValue};

/// Issues draw calls, rebinding program, material, and mesh only when they
/// differ from the previous command.
#[derive(Debug, Default)]
pub struct SubmitLane;

impl SubmitLane {
    /// Creates a new `SubmitLane`.
    pub fn new() -> Self {
        Self
    }

    /// Clears `framebuffer` and draws every command of `package` in order.
    pub fn run(
        &self,
        device: &dyn GraphicsDevice,
        package: &RenderPackage,
        framebuffer: Option<FramebufferId>,
        stats: &mut FrameStats,
    ) {
        device.bind_framebuffer(framebuffer);
        device.clear(package.clear_color);

        // Handle identities, so an in-place reload still counts as the same object.
        let mut current_program = None;
        let mut current_material = None;
        let mut current_mesh = None;

        for layer in &package.layers {
            for command in &layer.draw_commands {
                let program = command.program.borrow();

                if current_program != Some(command.program.id()) {
                    device.use_program(program.id());
                    current_program = Some(command.program.id());
                    current_material = None;
                    stats.program_binds += 1;
                }

                if current_material != Some(command.material.id()) {
                    command.material.borrow().activate(device);
                    current_material = Some(command.material.id());
                    stats.material_binds += 1;
                }

                let mesh = command.mesh.borrow();
                if current_mesh != Some(command.mesh.id()) {
                    mesh.bind();
                    current_mesh = Some(command.mesh.id());
                    stats.mesh_binds += 1;
                }

                for &(location, uniform) in program.required_engine_uniforms() {
                    let matrix = match uniform {
                        EngineUniform::ModelViewProjectionMatrix => {
                            layer.view_projection_matrix * command.model_matrix
                        }
                        EngineUniform::ModelViewMatrix => layer.view_matrix * command.model_matrix,
                        EngineUniform::ModelMatrix => command.model_matrix,
                    };
                    device.set_uniform(location, &UniformValue::Mat4(matrix));
                }

                mesh.draw();
                stats.draws += 1;
            }
        }
    }
}

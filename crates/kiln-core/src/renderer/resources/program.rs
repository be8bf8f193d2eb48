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

use crate::asset::Asset;
use crate::renderer::api::{EngineUniform, GlslType, ProgramId, VertexAttribute};
use crate::renderer::traits::GraphicsDevice;
use std::rc::Rc;

/// A uniform the program needs from outside the engine table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredUniform {
    /// The uniform location.
    pub location: i32,
    /// The uniform name.
    pub name: String,
    /// The declared type.
    pub ty: GlslType,
}

/// The classified interface of a linked program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInterface {
    /// Vertex attributes the program reads.
    pub attributes: Vec<VertexAttribute>,
    /// Uniforms the renderer supplies on every draw.
    pub engine_uniforms: Vec<(i32, EngineUniform)>,
    /// Uniforms the material supplies.
    pub material_uniforms: Vec<RequiredUniform>,
    /// Samplers, one texture unit each, in unit order.
    pub samplers: Vec<RequiredUniform>,
}

/// A linked shader program together with its classified interface.
#[derive(Debug)]
pub struct ShaderProgram {
    device: Rc<dyn GraphicsDevice>,
    id: ProgramId,
    interface: ProgramInterface,
    placeholder: bool,
}

impl ShaderProgram {
    /// Wraps a linked and validated program.
    pub fn from_linked(
        device: Rc<dyn GraphicsDevice>,
        id: ProgramId,
        interface: ProgramInterface,
    ) -> Self {
        Self {
            device,
            id,
            interface,
            placeholder: false,
        }
    }

    /// Flags this program as the dummy.
    pub fn into_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// The device id.
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Whether this is the dummy program.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The attributes the program reads.
    pub fn required_attributes(&self) -> &[VertexAttribute] {
        &self.interface.attributes
    }

    /// Engine uniforms with their locations.
    pub fn required_engine_uniforms(&self) -> &[(i32, EngineUniform)] {
        &self.interface.engine_uniforms
    }

    /// Uniforms the material has to provide.
    pub fn required_material_uniforms(&self) -> &[RequiredUniform] {
        &self.interface.material_uniforms
    }

    /// Samplers in texture-unit order.
    pub fn required_samplers(&self) -> &[RequiredUniform] {
        &self.interface.samplers
    }

    /// Location of a material uniform by name.
    pub fn material_uniform_location(&self, name: &str) -> Option<i32> {
        self.interface
            .material_uniforms
            .iter()
            .find(|uniform| uniform.name == name)
            .map(|uniform| uniform.location)
    }

    /// Releases the device object, invalidates the id, and clears the interface.
    pub fn reset(&mut self) {
        if self.id.is_valid() {
            self.device.destroy_program(self.id);
        }
        self.id = ProgramId::INVALID;
        self.interface = ProgramInterface::default();
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.reset();
    }
}

impl Asset for ShaderProgram {}

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

//! GPU-owning resource descriptors.
//!
//! Each descriptor owns exactly one device object and releases it on drop.
//! `reset` releases the object early and leaves the descriptor in place with
//! an invalid id, which is how a resource is emptied before a reload.

mod mesh;
mod program;
mod sampler;
mod shader;
mod texture;
mod uniform_buffer;

pub use self::mesh::Mesh;
pub use self::program::{ProgramInterface, RequiredUniform, ShaderProgram};
pub use self::sampler::Sampler;
pub use self::shader::Shader;
pub use self::texture::Texture;
pub use self::uniform_buffer::UniformBuffer;

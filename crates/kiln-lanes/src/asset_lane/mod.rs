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

//! Loading lanes for shaders, programs, textures, samplers, and materials.

mod composite;
mod error;
mod material_loader;
mod program_compiler;
mod program_loader;
mod sampler_manager;
mod shader_compiler;
mod shader_loader;
mod texture_loader;

pub use composite::{parse_array, parse_cubemap, CompositeImages, CUBE_FACES, MAX_ARRAY_LAYERS};
pub use error::{MaterialError, TextureError};
pub use material_loader::{parse_tc_mod, MaterialLoader};
pub use program_compiler::{classify_interface, ProgramCompiler};
pub use program_loader::{program_id, ProgramLoader};
pub use sampler_manager::SamplerManager;
pub use shader_compiler::{dummy_body, ShaderCompiler};
pub use shader_loader::ShaderLoader;
pub use texture_loader::{TextureLoader, DUMMY_CELL_SIZE, DUMMY_TEXTURE_SIZE, MAX_PICMIP};

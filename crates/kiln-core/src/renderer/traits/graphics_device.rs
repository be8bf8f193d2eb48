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

use crate::renderer::api::*;
use crate::renderer::capabilities::DeviceInfo;
use crate::renderer::error::{ProgramError, ResourceError, ShaderError};
use glam::Vec4;
use std::fmt::Debug;

/// An immediate-mode, OpenGL-like graphics device.
///
/// The device owns every GPU object; Kiln refers to them through the opaque
/// ids in [`crate::renderer::api::ids`]. All calls happen on the render thread,
/// and binding state (current program, mesh, texture units) is global to the
/// device. Resource descriptors hold an `Rc<dyn GraphicsDevice>` so they can
/// release their objects on drop.
pub trait GraphicsDevice: Debug + 'static {
    /// Reports vendor strings, extensions, and limits.
    fn info(&self) -> DeviceInfo;

    /// Asks the device which internal format it prefers for RGBA8 data of `kind`.
    /// ## Returns
    /// `None` if the device cannot answer, in which case callers use
    /// [`InternalFormat::Rgba8`].
    fn preferred_internal_format(&self, kind: TextureKind) -> Option<InternalFormat>;

    /// Compiles one shader stage from complete GLSL source.
    /// ## Arguments
    /// * `stage` - The pipeline stage.
    /// * `source` - The full source, preamble included.
    /// ## Returns
    /// The id of the compiled shader.
    /// ## Errors
    /// * `ShaderError::CompilationError` - Carries the compiler info log. No
    ///   shader object is retained in that case.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderId, ShaderError>;

    /// Releases a shader object.
    fn destroy_shader(&self, id: ShaderId);

    /// Links compiled stages into a program.
    /// ## Arguments
    /// * `shaders` - The stages to attach, typically vertex and fragment.
    /// ## Errors
    /// * `ProgramError::LinkError` - Carries the linker info log. No program
    ///   object is retained in that case.
    fn link_program(&self, shaders: &[ShaderId]) -> Result<ProgramId, ProgramError>;

    /// Releases a program object.
    fn destroy_program(&self, id: ProgramId);

    /// Lists the active vertex inputs of a linked program.
    fn active_attributes(&self, program: ProgramId) -> Vec<ActiveAttribute>;

    /// Lists the active uniforms of a linked program, block members included.
    fn active_uniforms(&self, program: ProgramId) -> Vec<ActiveUniform>;

    /// Allocates immutable storage for a texture and uploads every image.
    /// ## Arguments
    /// * `descriptor` - Kind, format, and the face or layer images.
    /// ## Errors
    /// * `ResourceError` - If the images are inconsistent or allocation fails.
    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, ResourceError>;

    /// Releases a texture object.
    fn destroy_texture(&self, id: TextureId);

    /// Creates a sampler object.
    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError>;

    /// Releases a sampler object.
    fn destroy_sampler(&self, id: SamplerId);

    /// Creates a uniform buffer of `size` bytes bound to the indexed binding point.
    fn create_uniform_buffer(&self, size: usize, binding: u32) -> Result<BufferId, ResourceError>;

    /// Overwrites part of a uniform buffer.
    fn write_uniform_buffer(&self, id: BufferId, offset: usize, data: &[u8]);

    /// Releases a buffer object.
    fn destroy_uniform_buffer(&self, id: BufferId);

    /// Uploads indexed geometry.
    fn create_mesh(&self, data: &MeshData) -> Result<MeshId, ResourceError>;

    /// Releases a mesh and its buffers.
    fn destroy_mesh(&self, id: MeshId);

    /// Makes `framebuffer` the render target, `None` selects the default framebuffer.
    fn bind_framebuffer(&self, framebuffer: Option<FramebufferId>);

    /// Clears color and depth of the bound framebuffer.
    fn clear(&self, color: Vec4);

    /// Applies culling, polygon mode, and blending.
    fn set_raster_state(&self, state: &RasterState);

    /// Makes `program` current.
    fn use_program(&self, program: ProgramId);

    /// Binds `texture` and `sampler` to texture unit `unit`.
    fn bind_texture_unit(&self, unit: u32, texture: TextureId, sampler: SamplerId);

    /// Sets a free-standing uniform of the current program.
    fn set_uniform(&self, location: i32, value: &UniformValue);

    /// Makes `mesh` the current vertex source.
    fn bind_mesh(&self, mesh: MeshId);

    /// Draws `index_count` indices of the currently bound mesh.
    fn draw_indexed(&self, index_count: u32);
}

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

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::mem::{offset_of, size_of};
use std::num::NonZeroU32;

use glow::HasContext;

use kiln_core::renderer::api::*;
use kiln_core::renderer::capabilities::{DeviceInfo, INTERNALFORMAT_QUERY2};
use kiln_core::renderer::{GraphicsDevice, ProgramError, ResourceError, ShaderError};
use kiln_core::math::Vec4;

use super::conversions::{from_gl_internal_format, from_gl_type, pixel_format, IntoGl};

#[derive(Debug, Clone, Copy)]
struct GlTexture {
    texture: glow::Texture,
    target: u32,
}

#[derive(Debug, Clone, Copy)]
struct GlMesh {
    vertex_array: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
}

/// A [`GraphicsDevice`] issuing OpenGL 4.5 calls through `glow`.
///
/// Ids handed out are the raw GL object names. Textures and meshes keep a
/// side table because binding them needs more than the name.
pub struct GlowDevice {
    gl: glow::Context,
    textures: RefCell<HashMap<TextureId, GlTexture>>,
    meshes: RefCell<HashMap<MeshId, GlMesh>>,
}

impl fmt::Debug for GlowDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowDevice")
            .field("textures", &self.textures.borrow().len())
            .field("meshes", &self.meshes.borrow().len())
            .finish()
    }
}

fn gl_name(id: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(id)
}

impl GlowDevice {
    /// Wraps a loaded GL context and sets the state the renderer relies on.
    ///
    /// # Safety
    /// `gl` must belong to an OpenGL 4.5 context that is current on the
    /// calling thread, and stays current for as long as the device lives.
    pub unsafe fn new(gl: glow::Context) -> Self {
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);
            gl.enable(glow::TEXTURE_CUBE_MAP_SEAMLESS);
        }
        log::info!("GlowDevice: created on {:?}", gl.version());
        Self {
            gl,
            textures: RefCell::new(HashMap::new()),
            meshes: RefCell::new(HashMap::new()),
        }
    }

    fn parameter_u32(&self, parameter: u32) -> u32 {
        let value = unsafe { self.gl.get_parameter_i32(parameter) };
        u32::try_from(value).unwrap_or(0)
    }

    fn upload_layers(&self, target: u32, descriptor: &TextureDescriptor<'_>) {
        let gl = &self.gl;
        let width = descriptor.width() as i32;
        let height = descriptor.height() as i32;
        let levels = descriptor.mip_levels() as i32;
        let internal_format = descriptor.internal_format.into_gl();

        unsafe {
            match descriptor.kind {
                TextureKind::Flat | TextureKind::Cube => {
                    gl.tex_storage_2d(target, levels, internal_format, width, height);
                    for (face, image) in descriptor.images.iter().enumerate() {
                        let image_target = if descriptor.kind == TextureKind::Cube {
                            glow::TEXTURE_CUBE_MAP_POSITIVE_X + face as u32
                        } else {
                            target
                        };
                        gl.tex_sub_image_2d(
                            image_target,
                            0,
                            0,
                            0,
                            width,
                            height,
                            pixel_format(image),
                            glow::UNSIGNED_BYTE,
                            glow::PixelUnpackData::Slice(Some(&image.pixels)),
                        );
                    }
                }
                TextureKind::Array => {
                    let layers = descriptor.images.len() as i32;
                    gl.tex_storage_3d(target, levels, internal_format, width, height, layers);
                    for (layer, image) in descriptor.images.iter().enumerate() {
                        gl.tex_sub_image_3d(
                            target,
                            0,
                            0,
                            0,
                            layer as i32,
                            width,
                            height,
                            1,
                            pixel_format(image),
                            glow::UNSIGNED_BYTE,
                            glow::PixelUnpackData::Slice(Some(&image.pixels)),
                        );
                    }
                }
            }
        }
    }
}

fn validate_images(descriptor: &TextureDescriptor<'_>) -> Result<(), ResourceError> {
    let Some(first) = descriptor.images.first() else {
        return Err(ResourceError::InvalidData("texture has no images".to_string()));
    };
    let expected = match descriptor.kind {
        TextureKind::Flat => Some(1),
        TextureKind::Cube => Some(6),
        TextureKind::Array => None,
    };
    if let Some(expected) = expected {
        if descriptor.images.len() != expected {
            return Err(ResourceError::InvalidData(format!(
                "{} texture needs {expected} images, got {}",
                descriptor.kind,
                descriptor.images.len()
            )));
        }
    }
    let consistent = descriptor.images.iter().all(|image| {
        image.width == first.width
            && image.height == first.height
            && image.bits_per_pixel == first.bits_per_pixel
            && image.pixels.len() == image.width as usize * image.height as usize * image.channels()
    });
    if !consistent {
        return Err(ResourceError::InvalidData(
            "texture images differ in size or pixel format".to_string(),
        ));
    }
    Ok(())
}

/// Component count and byte offset of every attribute inside [`Vertex`].
fn attribute_layout(attribute: VertexAttribute) -> (i32, i32) {
    let uv = offset_of!(Vertex, uv);
    let uv_size = size_of::<[f32; 2]>();
    let offset = match attribute {
        VertexAttribute::Position => offset_of!(Vertex, position),
        VertexAttribute::Normal => offset_of!(Vertex, normal),
        VertexAttribute::Tangent => offset_of!(Vertex, tangent),
        VertexAttribute::Bitangent => offset_of!(Vertex, bitangent),
        VertexAttribute::Color => offset_of!(Vertex, color),
        VertexAttribute::Uv0 => uv,
        VertexAttribute::Uv1 => uv + uv_size,
        VertexAttribute::Uv2 => uv + 2 * uv_size,
        VertexAttribute::Uv3 => uv + 3 * uv_size,
    };
    let components = match attribute.interface().ty {
        GlslType::Vec2 => 2,
        _ => 3,
    };
    (components, offset as i32)
}

impl GraphicsDevice for GlowDevice {
    fn info(&self) -> DeviceInfo {
        let gl = &self.gl;
        let (vendor, renderer, version) = unsafe {
            (
                gl.get_parameter_string(glow::VENDOR),
                gl.get_parameter_string(glow::RENDERER),
                gl.get_parameter_string(glow::VERSION),
            )
        };
        DeviceInfo {
            vendor,
            renderer,
            version,
            extensions: gl.supported_extensions().clone(),
            max_texture_size: self.parameter_u32(glow::MAX_TEXTURE_SIZE),
            max_cube_map_texture_size: self.parameter_u32(glow::MAX_CUBE_MAP_TEXTURE_SIZE),
            max_combined_texture_units: self.parameter_u32(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
            max_anisotropy: unsafe { gl.get_parameter_f32(glow::MAX_TEXTURE_MAX_ANISOTROPY_EXT) },
        }
    }

    fn preferred_internal_format(&self, kind: TextureKind) -> Option<InternalFormat> {
        if !self.gl.supported_extensions().contains(INTERNALFORMAT_QUERY2) {
            return None;
        }
        let mut preferred = [0i32; 1];
        unsafe {
            self.gl.get_internal_format_i32_slice(
                kind.into_gl(),
                glow::RGBA8,
                glow::INTERNALFORMAT_PREFERRED,
                &mut preferred,
            );
        }
        match u32::try_from(preferred[0]) {
            Ok(0) | Err(_) => None,
            Ok(raw) => Some(from_gl_internal_format(raw)),
        }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderId, ShaderError> {
        let gl = &self.gl;
        unsafe {
            let shader = gl.create_shader(stage.into_gl()).map_err(|details| {
                log::error!("GlowDevice: cannot create {stage} shader: {details}");
                ShaderError::CreationFailed { stage }
            })?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let details = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::CompilationError { stage, details });
            }
            Ok(ShaderId(shader.0.get()))
        }
    }

    fn destroy_shader(&self, id: ShaderId) {
        if let Some(name) = gl_name(id.0) {
            unsafe { self.gl.delete_shader(glow::NativeShader(name)) };
        }
    }

    fn link_program(&self, shaders: &[ShaderId]) -> Result<ProgramId, ProgramError> {
        let gl = &self.gl;
        let stages: Vec<glow::Shader> = shaders
            .iter()
            .filter_map(|id| gl_name(id.0))
            .map(glow::NativeShader)
            .collect();
        unsafe {
            let program = gl.create_program().map_err(|details| {
                log::error!("GlowDevice: cannot create program: {details}");
                ProgramError::CreationFailed
            })?;
            for &stage in &stages {
                gl.attach_shader(program, stage);
            }
            gl.link_program(program);
            for &stage in &stages {
                gl.detach_shader(program, stage);
            }
            if !gl.get_program_link_status(program) {
                let details = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ProgramError::LinkError { details });
            }
            Ok(ProgramId(program.0.get()))
        }
    }

    fn destroy_program(&self, id: ProgramId) {
        if let Some(name) = gl_name(id.0) {
            unsafe { self.gl.delete_program(glow::NativeProgram(name)) };
        }
    }

    fn active_attributes(&self, program: ProgramId) -> Vec<ActiveAttribute> {
        let Some(name) = gl_name(program.0) else {
            return Vec::new();
        };
        let program = glow::NativeProgram(name);
        let gl = &self.gl;
        let mut attributes = Vec::new();
        unsafe {
            for index in 0..gl.get_active_attributes(program) {
                let Some(attribute) = gl.get_active_attribute(program, index) else {
                    continue;
                };
                let location = gl
                    .get_attrib_location(program, &attribute.name)
                    .map_or(-1, |location| location as i32);
                attributes.push(ActiveAttribute {
                    ty: from_gl_type(attribute.atype),
                    name: attribute.name,
                    location,
                });
            }
        }
        attributes
    }

    fn active_uniforms(&self, program: ProgramId) -> Vec<ActiveUniform> {
        let Some(name) = gl_name(program.0) else {
            return Vec::new();
        };
        let program = glow::NativeProgram(name);
        let gl = &self.gl;
        let mut uniforms = Vec::new();
        unsafe {
            for index in 0..gl.get_active_uniforms(program) {
                let Some(uniform) = gl.get_active_uniform(program, index) else {
                    continue;
                };
                let block_index = gl
                    .get_active_uniforms_parameter(program, &[index], glow::UNIFORM_BLOCK_INDEX)
                    .first()
                    .copied()
                    .unwrap_or(-1);
                let location = gl
                    .get_uniform_location(program, &uniform.name)
                    .map_or(-1, |location| location.0 as i32);
                uniforms.push(ActiveUniform {
                    ty: from_gl_type(uniform.utype),
                    name: uniform.name,
                    location,
                    block_index,
                });
            }
        }
        uniforms
    }

    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, ResourceError> {
        validate_images(descriptor)?;
        let gl = &self.gl;
        let target = descriptor.kind.into_gl();
        let texture = unsafe { gl.create_texture() }.map_err(|details| {
            ResourceError::CreationFailed {
                what: "texture",
                details,
            }
        })?;
        unsafe {
            gl.bind_texture(target, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }
        self.upload_layers(target, descriptor);
        unsafe {
            gl.generate_mipmap(target);
            gl.bind_texture(target, None);
        }

        let id = TextureId(texture.0.get());
        self.textures
            .borrow_mut()
            .insert(id, GlTexture { texture, target });
        log::debug!(
            "GlowDevice: {} texture {} is {}x{} with {} image(s)",
            descriptor.kind,
            id.0,
            descriptor.width(),
            descriptor.height(),
            descriptor.images.len()
        );
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) {
        if let Some(entry) = self.textures.borrow_mut().remove(&id) {
            unsafe { self.gl.delete_texture(entry.texture) };
        }
    }

    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError> {
        let gl = &self.gl;
        unsafe {
            let sampler = gl.create_sampler().map_err(|details| ResourceError::CreationFailed {
                what: "sampler",
                details,
            })?;
            let axes = [glow::TEXTURE_WRAP_S, glow::TEXTURE_WRAP_T, glow::TEXTURE_WRAP_R];
            for (axis, wrap) in axes.into_iter().zip(descriptor.wrap) {
                gl.sampler_parameter_i32(sampler, axis, wrap.into_gl() as i32);
            }
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_MIN_FILTER,
                descriptor.min_filter.into_gl() as i32,
            );
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_MAG_FILTER,
                descriptor.mag_filter.into_gl() as i32,
            );
            gl.sampler_parameter_f32(
                sampler,
                glow::TEXTURE_MAX_ANISOTROPY_EXT,
                descriptor.max_anisotropy,
            );
            Ok(SamplerId(sampler.0.get()))
        }
    }

    fn destroy_sampler(&self, id: SamplerId) {
        if let Some(name) = gl_name(id.0) {
            unsafe { self.gl.delete_sampler(glow::NativeSampler(name)) };
        }
    }

    fn create_uniform_buffer(&self, size: usize, binding: u32) -> Result<BufferId, ResourceError> {
        let size = i32::try_from(size)
            .map_err(|_| ResourceError::InvalidData(format!("uniform buffer of {size} bytes")))?;
        let gl = &self.gl;
        unsafe {
            let buffer = gl.create_buffer().map_err(|details| ResourceError::CreationFailed {
                what: "uniform buffer",
                details,
            })?;
            gl.bind_buffer(glow::UNIFORM_BUFFER, Some(buffer));
            gl.buffer_data_size(glow::UNIFORM_BUFFER, size, glow::DYNAMIC_DRAW);
            gl.bind_buffer_base(glow::UNIFORM_BUFFER, binding, Some(buffer));
            gl.bind_buffer(glow::UNIFORM_BUFFER, None);
            Ok(BufferId(buffer.0.get()))
        }
    }

    fn write_uniform_buffer(&self, id: BufferId, offset: usize, data: &[u8]) {
        let Some(name) = gl_name(id.0) else {
            return;
        };
        let gl = &self.gl;
        unsafe {
            gl.bind_buffer(glow::UNIFORM_BUFFER, Some(glow::NativeBuffer(name)));
            gl.buffer_sub_data_u8_slice(glow::UNIFORM_BUFFER, offset as i32, data);
            gl.bind_buffer(glow::UNIFORM_BUFFER, None);
        }
    }

    fn destroy_uniform_buffer(&self, id: BufferId) {
        if let Some(name) = gl_name(id.0) {
            unsafe { self.gl.delete_buffer(glow::NativeBuffer(name)) };
        }
    }

    fn create_mesh(&self, data: &MeshData) -> Result<MeshId, ResourceError> {
        let gl = &self.gl;
        let failed = |what: &'static str| move |details: String| ResourceError::CreationFailed { what, details };
        unsafe {
            let vertex_array = gl.create_vertex_array().map_err(failed("vertex array"))?;
            let vertex_buffer = gl.create_buffer().map_err(failed("vertex buffer"))?;
            let index_buffer = gl.create_buffer().map_err(failed("index buffer"))?;

            gl.bind_vertex_array(Some(vertex_array));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&data.vertices),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&data.indices),
                glow::STATIC_DRAW,
            );

            let stride = size_of::<Vertex>() as i32;
            for (attribute, _) in ALLOWED_ATTRIBUTES {
                let (components, offset) = attribute_layout(attribute);
                gl.enable_vertex_attrib_array(attribute.location());
                gl.vertex_attrib_pointer_f32(
                    attribute.location(),
                    components,
                    glow::FLOAT,
                    false,
                    stride,
                    offset,
                );
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            let id = MeshId(vertex_array.0.get());
            self.meshes.borrow_mut().insert(
                id,
                GlMesh {
                    vertex_array,
                    vertex_buffer,
                    index_buffer,
                },
            );
            Ok(id)
        }
    }

    fn destroy_mesh(&self, id: MeshId) {
        if let Some(mesh) = self.meshes.borrow_mut().remove(&id) {
            unsafe {
                self.gl.delete_vertex_array(mesh.vertex_array);
                self.gl.delete_buffer(mesh.vertex_buffer);
                self.gl.delete_buffer(mesh.index_buffer);
            }
        }
    }

    fn bind_framebuffer(&self, framebuffer: Option<FramebufferId>) {
        let framebuffer = framebuffer
            .and_then(|id| gl_name(id.0))
            .map(glow::NativeFramebuffer);
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer) };
    }

    fn clear(&self, color: Vec4) {
        unsafe {
            self.gl.clear_color(color.x, color.y, color.z, color.w);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_raster_state(&self, state: &RasterState) {
        let gl = &self.gl;
        unsafe {
            match state.cull_mode {
                Some(mode) => {
                    gl.enable(glow::CULL_FACE);
                    gl.cull_face(mode.into_gl());
                }
                None => gl.disable(glow::CULL_FACE),
            }
            gl.polygon_mode(glow::FRONT_AND_BACK, state.polygon_mode.into_gl());
            match state.blend {
                Some((source, destination)) => {
                    gl.enable(glow::BLEND);
                    gl.blend_func(source.into_gl(), destination.into_gl());
                }
                None => gl.disable(glow::BLEND),
            }
        }
    }

    fn use_program(&self, program: ProgramId) {
        let program = gl_name(program.0).map(glow::NativeProgram);
        unsafe { self.gl.use_program(program) };
    }

    fn bind_texture_unit(&self, unit: u32, texture: TextureId, sampler: SamplerId) {
        let gl = &self.gl;
        let entry = self.textures.borrow().get(&texture).copied();
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            match entry {
                Some(entry) => gl.bind_texture(entry.target, Some(entry.texture)),
                None => log::warn!("GlowDevice: texture {} is not live", texture.0),
            }
            gl.bind_sampler(unit, gl_name(sampler.0).map(glow::NativeSampler));
        }
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        let Ok(location) = u32::try_from(location) else {
            return;
        };
        let location = glow::NativeUniformLocation(location);
        let location = Some(&location);
        let gl = &self.gl;
        unsafe {
            match value {
                UniformValue::Float(v) => gl.uniform_1_f32(location, *v),
                UniformValue::Vec2(v) => gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => {
                    gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
                UniformValue::Int(v) => gl.uniform_1_i32(location, *v),
                UniformValue::UInt(v) => gl.uniform_1_u32(location, *v),
            }
        }
    }

    fn bind_mesh(&self, mesh: MeshId) {
        let vertex_array = self.meshes.borrow().get(&mesh).map(|mesh| mesh.vertex_array);
        unsafe { self.gl.bind_vertex_array(vertex_array) };
    }

    fn draw_indexed(&self, index_count: u32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> ImageData {
        ImageData {
            width,
            height,
            bits_per_pixel: 32,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_attribute_layout_matches_vertex() {
        assert_eq!(attribute_layout(VertexAttribute::Position), (3, 0));
        assert_eq!(attribute_layout(VertexAttribute::Color), (3, 48));
        assert_eq!(attribute_layout(VertexAttribute::Uv0), (2, 60));
        assert_eq!(attribute_layout(VertexAttribute::Uv3), (2, 84));
        assert_eq!(size_of::<Vertex>(), 92);
    }

    #[test]
    fn test_cube_needs_six_faces() {
        let images = vec![image(4, 4); 5];
        let descriptor = TextureDescriptor {
            kind: TextureKind::Cube,
            internal_format: InternalFormat::Rgba8,
            images: &images,
        };
        assert!(matches!(
            validate_images(&descriptor),
            Err(ResourceError::InvalidData(_))
        ));
    }

    #[test]
    fn test_array_layers_must_agree() {
        let images = [image(4, 4), image(8, 4)];
        let descriptor = TextureDescriptor {
            kind: TextureKind::Array,
            internal_format: InternalFormat::Rgba8,
            images: &images,
        };
        assert!(validate_images(&descriptor).is_err());

        let images = [image(4, 4), image(4, 4)];
        let descriptor = TextureDescriptor { images: &images, ..descriptor };
        assert!(validate_images(&descriptor).is_ok());
    }
}

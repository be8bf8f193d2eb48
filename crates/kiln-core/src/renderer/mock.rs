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

//! A headless [`GraphicsDevice`] for tests.
//!
//! The mock hands out sequential ids, keeps a log of every state-changing
//! call, and understands just enough GLSL to report the declared vertex
//! inputs and uniforms of a linked program. A declaration counts as active
//! when its name is used at least once beyond the declaration itself, and
//! compilation fails for any source containing `#error`.

use super::api::*;
use super::capabilities::{DeviceInfo, INTERNALFORMAT_QUERY2, REQUIRED_EXTENSIONS};
use super::error::{ProgramError, ResourceError, ShaderError};
use super::traits::GraphicsDevice;
use glam::Vec4;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum DeviceCall {
    CreateShader(ShaderId, ShaderStage),
    DestroyShader(ShaderId),
    CreateProgram(ProgramId),
    DestroyProgram(ProgramId),
    CreateTexture(TextureId, MockTexture),
    DestroyTexture(TextureId),
    CreateSampler(SamplerId, SamplerDescriptor),
    DestroySampler(SamplerId),
    CreateUniformBuffer { id: BufferId, size: usize, binding: u32 },
    WriteUniformBuffer { id: BufferId, offset: usize, len: usize },
    DestroyUniformBuffer(BufferId),
    CreateMesh(MeshId, u32),
    DestroyMesh(MeshId),
    BindFramebuffer(Option<FramebufferId>),
    Clear(Vec4),
    SetRasterState(RasterState),
    UseProgram(ProgramId),
    BindTexture { unit: u32, texture: TextureId, sampler: SamplerId },
    SetUniform { location: i32, value: UniformValue },
    BindMesh(MeshId),
    Draw(u32),
}

/// What the mock remembers about a texture it allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTexture {
    /// Dimensionality.
    pub kind: TextureKind,
    /// Storage format.
    pub internal_format: InternalFormat,
    /// Base level width.
    pub width: u32,
    /// Base level height.
    pub height: u32,
    /// Number of uploaded images.
    pub layers: u32,
    /// Allocated mip levels.
    pub mip_levels: u32,
}

#[derive(Debug, Clone)]
struct CompiledShader {
    stage: ShaderStage,
    source: String,
}

#[derive(Debug, Clone, Default)]
struct LinkedProgram {
    attributes: Vec<ActiveAttribute>,
    uniforms: Vec<ActiveUniform>,
}

/// Headless device recording every call it receives.
#[derive(Debug)]
pub struct MockGraphicsDevice {
    info: DeviceInfo,
    preferred_format: Option<InternalFormat>,
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<ShaderId, CompiledShader>>,
    programs: RefCell<HashMap<ProgramId, LinkedProgram>>,
    textures: RefCell<HashMap<TextureId, MockTexture>>,
    samplers: RefCell<HashMap<SamplerId, SamplerDescriptor>>,
    buffers: RefCell<HashMap<BufferId, (u32, Vec<u8>)>>,
    meshes: RefCell<HashMap<MeshId, u32>>,
    calls: RefCell<Vec<DeviceCall>>,
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphicsDevice {
    /// A device supporting every required extension with generous limits.
    pub fn new() -> Self {
        Self::with_info(Self::default_info())
    }

    /// A device reporting exactly `info`.
    pub fn with_info(info: DeviceInfo) -> Self {
        Self {
            info,
            preferred_format: None,
            next_id: Cell::new(1),
            shaders: RefCell::default(),
            programs: RefCell::default(),
            textures: RefCell::default(),
            samplers: RefCell::default(),
            buffers: RefCell::default(),
            meshes: RefCell::default(),
            calls: RefCell::default(),
        }
    }

    /// The info [`MockGraphicsDevice::new`] reports.
    pub fn default_info() -> DeviceInfo {
        DeviceInfo {
            vendor: "Kiln".to_string(),
            renderer: "Mock".to_string(),
            version: "4.5 mock".to_string(),
            extensions: REQUIRED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_texture_size: 4096,
            max_cube_map_texture_size: 2048,
            max_combined_texture_units: 16,
            max_anisotropy: 16.0,
        }
    }

    /// Answers internal format queries with `format` and advertises
    /// `GL_ARB_internalformat_query2`.
    pub fn with_preferred_internal_format(mut self, format: InternalFormat) -> Self {
        self.preferred_format = Some(format);
        self.info.extensions.insert(INTERNALFORMAT_QUERY2.to_string());
        self
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn record(&self, call: DeviceCall) {
        self.calls.borrow_mut().push(call);
    }

    /// A copy of the call log.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    /// Empties the call log.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Number of logged calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// The logged draw, bind, and state calls, in order.
    pub fn frame_calls(&self) -> Vec<DeviceCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    DeviceCall::BindFramebuffer(_)
                        | DeviceCall::Clear(_)
                        | DeviceCall::SetRasterState(_)
                        | DeviceCall::UseProgram(_)
                        | DeviceCall::BindTexture { .. }
                        | DeviceCall::SetUniform { .. }
                        | DeviceCall::BindMesh(_)
                        | DeviceCall::Draw(_)
                )
            })
            .cloned()
            .collect()
    }

    /// The full source a live shader was compiled from.
    pub fn shader_source(&self, id: ShaderId) -> Option<String> {
        self.shaders.borrow().get(&id).map(|shader| shader.source.clone())
    }

    /// Details of a live texture.
    pub fn texture(&self, id: TextureId) -> Option<MockTexture> {
        self.textures.borrow().get(&id).copied()
    }

    /// The descriptor a live sampler was created with.
    pub fn sampler(&self, id: SamplerId) -> Option<SamplerDescriptor> {
        self.samplers.borrow().get(&id).copied()
    }

    /// Binding point and contents of a live uniform buffer.
    pub fn uniform_buffer(&self, id: BufferId) -> Option<(u32, Vec<u8>)> {
        self.buffers.borrow().get(&id).cloned()
    }

    /// Contents of the live uniform buffer attached to `binding`.
    pub fn uniform_buffer_at(&self, binding: u32) -> Option<Vec<u8>> {
        self.buffers
            .borrow()
            .values()
            .find(|(b, _)| *b == binding)
            .map(|(_, data)| data.clone())
    }

    /// Number of shaders not yet destroyed.
    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    /// Number of programs not yet destroyed.
    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    /// Number of textures not yet destroyed.
    pub fn live_textures(&self) -> usize {
        self.textures.borrow().len()
    }

    /// Number of samplers not yet destroyed.
    pub fn live_samplers(&self) -> usize {
        self.samplers.borrow().len()
    }

    /// Number of meshes not yet destroyed.
    pub fn live_meshes(&self) -> usize {
        self.meshes.borrow().len()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn info(&self) -> DeviceInfo {
        self.info.clone()
    }

    fn preferred_internal_format(&self, _kind: TextureKind) -> Option<InternalFormat> {
        self.preferred_format
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderId, ShaderError> {
        if let Some(line) = source.lines().find(|line| line.trim_start().starts_with("#error")) {
            return Err(ShaderError::CompilationError {
                stage,
                details: format!("0:1(1): error: {}", line.trim()),
            });
        }
        let id = ShaderId(self.next_id());
        self.shaders.borrow_mut().insert(
            id,
            CompiledShader {
                stage,
                source: source.to_string(),
            },
        );
        self.record(DeviceCall::CreateShader(id, stage));
        Ok(id)
    }

    fn destroy_shader(&self, id: ShaderId) {
        self.shaders.borrow_mut().remove(&id);
        self.record(DeviceCall::DestroyShader(id));
    }

    fn link_program(&self, shaders: &[ShaderId]) -> Result<ProgramId, ProgramError> {
        let stages: Vec<CompiledShader> = {
            let compiled = self.shaders.borrow();
            shaders
                .iter()
                .map(|id| {
                    compiled.get(id).cloned().ok_or_else(|| ProgramError::LinkError {
                        details: format!("error: shader {} is not compiled", id.0),
                    })
                })
                .collect::<Result<_, _>>()?
        };

        for required in [ShaderStage::Vertex, ShaderStage::Fragment] {
            if !stages.iter().any(|shader| shader.stage == required) {
                return Err(ProgramError::LinkError {
                    details: format!("error: program lacks a {required} shader"),
                });
            }
        }

        let mut program = LinkedProgram::default();
        let mut next_location = 0;
        let mut blocks: Vec<String> = Vec::new();
        for shader in &stages {
            for declaration in parse_declarations(&shader.source) {
                match declaration {
                    Declaration::Input { name, ty, location } => {
                        if shader.stage == ShaderStage::Vertex && is_used(&shader.source, &name) {
                            program.attributes.push(ActiveAttribute { name, location, ty });
                        }
                    }
                    Declaration::Uniform { name, ty } => {
                        let seen = program.uniforms.iter().any(|u| u.name == name);
                        if !seen && is_used(&shader.source, &name) {
                            program.uniforms.push(ActiveUniform {
                                name,
                                location: next_location,
                                ty,
                                block_index: -1,
                            });
                            next_location += 1;
                        }
                    }
                    Declaration::BlockMember { block, member, ty } => {
                        let name = format!("{block}.{member}");
                        if program.uniforms.iter().any(|u| u.name == name) {
                            continue;
                        }
                        let block_index = match blocks.iter().position(|b| *b == block) {
                            Some(index) => index,
                            None => {
                                blocks.push(block);
                                blocks.len() - 1
                            }
                        };
                        program.uniforms.push(ActiveUniform {
                            name,
                            location: -1,
                            ty,
                            block_index: block_index as i32,
                        });
                    }
                }
            }
        }

        let id = ProgramId(self.next_id());
        self.programs.borrow_mut().insert(id, program);
        self.record(DeviceCall::CreateProgram(id));
        Ok(id)
    }

    fn destroy_program(&self, id: ProgramId) {
        self.programs.borrow_mut().remove(&id);
        self.record(DeviceCall::DestroyProgram(id));
    }

    fn active_attributes(&self, program: ProgramId) -> Vec<ActiveAttribute> {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.attributes.clone())
            .unwrap_or_default()
    }

    fn active_uniforms(&self, program: ProgramId) -> Vec<ActiveUniform> {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.uniforms.clone())
            .unwrap_or_default()
    }

    fn create_texture(&self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, ResourceError> {
        let Some(first) = descriptor.images.first() else {
            return Err(ResourceError::InvalidData("texture without images".to_string()));
        };
        if descriptor.kind == TextureKind::Cube && descriptor.images.len() != 6 {
            return Err(ResourceError::InvalidData(format!(
                "cubemap needs 6 faces, got {}",
                descriptor.images.len()
            )));
        }
        if descriptor
            .images
            .iter()
            .any(|image| image.width != first.width || image.height != first.height)
        {
            return Err(ResourceError::InvalidData("images differ in size".to_string()));
        }

        let texture = MockTexture {
            kind: descriptor.kind,
            internal_format: descriptor.internal_format,
            width: first.width,
            height: first.height,
            layers: descriptor.images.len() as u32,
            mip_levels: descriptor.mip_levels(),
        };
        let id = TextureId(self.next_id());
        self.textures.borrow_mut().insert(id, texture);
        self.record(DeviceCall::CreateTexture(id, texture));
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) {
        self.textures.borrow_mut().remove(&id);
        self.record(DeviceCall::DestroyTexture(id));
    }

    fn create_sampler(&self, descriptor: &SamplerDescriptor) -> Result<SamplerId, ResourceError> {
        let id = SamplerId(self.next_id());
        self.samplers.borrow_mut().insert(id, *descriptor);
        self.record(DeviceCall::CreateSampler(id, *descriptor));
        Ok(id)
    }

    fn destroy_sampler(&self, id: SamplerId) {
        self.samplers.borrow_mut().remove(&id);
        self.record(DeviceCall::DestroySampler(id));
    }

    fn create_uniform_buffer(&self, size: usize, binding: u32) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.next_id());
        self.buffers.borrow_mut().insert(id, (binding, vec![0; size]));
        self.record(DeviceCall::CreateUniformBuffer { id, size, binding });
        Ok(id)
    }

    fn write_uniform_buffer(&self, id: BufferId, offset: usize, data: &[u8]) {
        if let Some((_, contents)) = self.buffers.borrow_mut().get_mut(&id) {
            let end = (offset + data.len()).min(contents.len());
            if offset < end {
                contents[offset..end].copy_from_slice(&data[..end - offset]);
            }
        }
        self.record(DeviceCall::WriteUniformBuffer {
            id,
            offset,
            len: data.len(),
        });
    }

    fn destroy_uniform_buffer(&self, id: BufferId) {
        self.buffers.borrow_mut().remove(&id);
        self.record(DeviceCall::DestroyUniformBuffer(id));
    }

    fn create_mesh(&self, data: &MeshData) -> Result<MeshId, ResourceError> {
        let id = MeshId(self.next_id());
        let index_count = data.indices.len() as u32;
        self.meshes.borrow_mut().insert(id, index_count);
        self.record(DeviceCall::CreateMesh(id, index_count));
        Ok(id)
    }

    fn destroy_mesh(&self, id: MeshId) {
        self.meshes.borrow_mut().remove(&id);
        self.record(DeviceCall::DestroyMesh(id));
    }

    fn bind_framebuffer(&self, framebuffer: Option<FramebufferId>) {
        self.record(DeviceCall::BindFramebuffer(framebuffer));
    }

    fn clear(&self, color: Vec4) {
        self.record(DeviceCall::Clear(color));
    }

    fn set_raster_state(&self, state: &RasterState) {
        self.record(DeviceCall::SetRasterState(*state));
    }

    fn use_program(&self, program: ProgramId) {
        self.record(DeviceCall::UseProgram(program));
    }

    fn bind_texture_unit(&self, unit: u32, texture: TextureId, sampler: SamplerId) {
        self.record(DeviceCall::BindTexture {
            unit,
            texture,
            sampler,
        });
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        self.record(DeviceCall::SetUniform {
            location,
            value: *value,
        });
    }

    fn bind_mesh(&self, mesh: MeshId) {
        self.record(DeviceCall::BindMesh(mesh));
    }

    fn draw_indexed(&self, index_count: u32) {
        self.record(DeviceCall::Draw(index_count));
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Declaration {
    Input {
        name: String,
        ty: GlslType,
        location: i32,
    },
    Uniform {
        name: String,
        ty: GlslType,
    },
    BlockMember {
        block: String,
        member: String,
        ty: GlslType,
    },
}

/// GL enum values for the types the engine does not accept.
fn glsl_type(name: &str) -> GlslType {
    GlslType::from_glsl_name(name).unwrap_or(match name {
        "bool" => GlslType::Unsupported(0x8B56),
        "ivec2" => GlslType::Unsupported(0x8B53),
        "ivec3" => GlslType::Unsupported(0x8B54),
        "ivec4" => GlslType::Unsupported(0x8B55),
        "mat2" => GlslType::Unsupported(0x8B5A),
        "sampler1D" => GlslType::Unsupported(0x8B5D),
        "sampler3D" => GlslType::Unsupported(0x8B5F),
        "sampler2DShadow" => GlslType::Unsupported(0x8B62),
        _ => GlslType::Unsupported(0),
    })
}

fn strip_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| match line.find("//") {
            Some(index) => &line[..index],
            None => line,
        })
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tokenize(statement: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in statement.chars() {
        if c.is_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']' {
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        if matches!(c, '(' | ')' | '{' | '}' | '=' | ',') {
            tokens.push(c.to_string());
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Consumes a leading `layout( ... )` and returns its location qualifier.
fn take_layout(tokens: &[String]) -> (Option<i32>, &[String]) {
    if tokens.first().map(String::as_str) != Some("layout") {
        return (None, tokens);
    }
    let Some(close) = tokens.iter().position(|t| t == ")") else {
        return (None, tokens);
    };
    let location = tokens[..close]
        .windows(3)
        .find(|w| w[0] == "location" && w[1] == "=")
        .and_then(|w| w[2].parse().ok());
    (location, &tokens[close + 1..])
}

fn parse_declarations(source: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut block: Option<String> = None;

    for statement in strip_comments(source).split(';') {
        let tokens = tokenize(statement);
        if tokens.is_empty() {
            continue;
        }

        if let Some(name) = &block {
            if tokens[0] == "}" {
                block = None;
                continue;
            }
            if let [ty, member, ..] = tokens.as_slice() {
                declarations.push(Declaration::BlockMember {
                    block: name.clone(),
                    member: member.clone(),
                    ty: glsl_type(ty),
                });
            }
            continue;
        }

        let (location, rest) = take_layout(&tokens);
        match rest {
            [qualifier, ty, name, ..] if qualifier == "in" && ty != "{" => {
                declarations.push(Declaration::Input {
                    name: name.clone(),
                    ty: glsl_type(ty),
                    location: location.unwrap_or(-1),
                });
            }
            [qualifier, name, brace, ty, member, ..] if qualifier == "uniform" && brace == "{" => {
                declarations.push(Declaration::BlockMember {
                    block: name.clone(),
                    member: member.clone(),
                    ty: glsl_type(ty),
                });
                block = Some(name.clone());
            }
            [qualifier, ty, name, ..] if qualifier == "uniform" => {
                declarations.push(Declaration::Uniform {
                    name: name.clone(),
                    ty: glsl_type(ty),
                });
            }
            _ => {}
        }
    }
    declarations
}

/// Whether `name` appears as an identifier more often than its declaration.
fn is_used(source: &str, name: &str) -> bool {
    strip_comments(source)
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| *word == name)
        .count()
        >= 2
}

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

//! The fixed shader interface every program is validated against.
//!
//! Vertex attributes live at well-known locations that match the vertex
//! layout of [`MeshData`](super::MeshData), and three engine uniforms are
//! supplied by the renderer on every draw. Both tables are immutable.

use super::enums::GlslType;

/// A name/type pair describing one slot of a shader interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderInterface {
    /// The GLSL identifier.
    pub name: &'static str,
    /// The GLSL type.
    pub ty: GlslType,
}

/// A vertex attribute the engine knows how to feed.
///
/// The discriminant is the attribute location.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum VertexAttribute {
    Position = 0,
    Normal = 1,
    Tangent = 2,
    Bitangent = 3,
    Color = 4,
    Uv0 = 5,
    Uv1 = 6,
    Uv2 = 7,
    Uv3 = 8,
}

/// Every allowed attribute, ordered by location.
pub const ALLOWED_ATTRIBUTES: [(VertexAttribute, ShaderInterface); 9] = [
    (VertexAttribute::Position, ShaderInterface { name: "position", ty: GlslType::Vec3 }),
    (VertexAttribute::Normal, ShaderInterface { name: "normal", ty: GlslType::Vec3 }),
    (VertexAttribute::Tangent, ShaderInterface { name: "tangent", ty: GlslType::Vec3 }),
    (VertexAttribute::Bitangent, ShaderInterface { name: "bitangent", ty: GlslType::Vec3 }),
    (VertexAttribute::Color, ShaderInterface { name: "color", ty: GlslType::Vec3 }),
    (VertexAttribute::Uv0, ShaderInterface { name: "uv0", ty: GlslType::Vec2 }),
    (VertexAttribute::Uv1, ShaderInterface { name: "uv1", ty: GlslType::Vec2 }),
    (VertexAttribute::Uv2, ShaderInterface { name: "uv2", ty: GlslType::Vec2 }),
    (VertexAttribute::Uv3, ShaderInterface { name: "uv3", ty: GlslType::Vec2 }),
];

impl VertexAttribute {
    /// The attribute bound at `location`, if the location is part of the table.
    pub fn from_location(location: i32) -> Option<Self> {
        ALLOWED_ATTRIBUTES
            .iter()
            .find(|(attribute, _)| *attribute as i32 == location)
            .map(|(attribute, _)| *attribute)
    }

    /// The attribute location.
    pub fn location(self) -> u32 {
        self as u32
    }

    /// The expected name and type at this location.
    pub fn interface(self) -> ShaderInterface {
        ALLOWED_ATTRIBUTES[self as usize].1
    }
}

/// A uniform whose value is supplied by the renderer for every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineUniform {
    /// Projection * view * model.
    ModelViewProjectionMatrix,
    /// View * model.
    ModelViewMatrix,
    /// Model to world.
    ModelMatrix,
}

/// Every engine uniform with its declared name and type.
pub const ENGINE_UNIFORMS: [(EngineUniform, ShaderInterface); 3] = [
    (
        EngineUniform::ModelViewProjectionMatrix,
        ShaderInterface { name: "modelViewProjectionMatrix", ty: GlslType::Mat4 },
    ),
    (
        EngineUniform::ModelViewMatrix,
        ShaderInterface { name: "modelViewMatrix", ty: GlslType::Mat4 },
    ),
    (
        EngineUniform::ModelMatrix,
        ShaderInterface { name: "modelMatrix", ty: GlslType::Mat4 },
    ),
];

impl EngineUniform {
    /// Looks an engine uniform up by its GLSL name.
    pub fn from_name(name: &str) -> Option<(Self, ShaderInterface)> {
        ENGINE_UNIFORMS
            .iter()
            .find(|(_, interface)| interface.name == name)
            .copied()
    }

    /// The declared name and type.
    pub fn interface(self) -> ShaderInterface {
        let index = match self {
            EngineUniform::ModelViewProjectionMatrix => 0,
            EngineUniform::ModelViewMatrix => 1,
            EngineUniform::ModelMatrix => 2,
        };
        ENGINE_UNIFORMS[index].1
    }
}

/// An active vertex input reported by program introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAttribute {
    /// The attribute name.
    pub name: String,
    /// The bound location, `-1` for built-ins.
    pub location: i32,
    /// The attribute type.
    pub ty: GlslType,
}

/// An active uniform reported by program introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// The uniform name (block members are reported as `Block.member`).
    pub name: String,
    /// The uniform location, `-1` for block members.
    pub location: i32,
    /// The uniform type.
    pub ty: GlslType,
    /// Index of the enclosing uniform block, `-1` for free-standing uniforms.
    pub block_index: i32,
}

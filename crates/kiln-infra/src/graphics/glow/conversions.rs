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

use kiln_core::renderer::api::{
    BlendFactor, CullMode, FilterMode, GlslType, ImageData, InternalFormat, PolygonMode,
    ShaderStage, TextureKind, WrapMode,
};

/// A local extension trait to convert engine types into OpenGL enums.
/// This avoids the orphan rule while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl {
    /// Consumes self and returns the matching `GLenum`.
    fn into_gl(self) -> u32;
}

impl IntoGl for ShaderStage {
    fn into_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl IntoGl for TextureKind {
    fn into_gl(self) -> u32 {
        match self {
            TextureKind::Flat => glow::TEXTURE_2D,
            TextureKind::Cube => glow::TEXTURE_CUBE_MAP,
            TextureKind::Array => glow::TEXTURE_2D_ARRAY,
        }
    }
}

impl IntoGl for InternalFormat {
    fn into_gl(self) -> u32 {
        match self {
            InternalFormat::Rgba8 => glow::RGBA8,
            InternalFormat::Rgb8 => glow::RGB8,
            InternalFormat::Srgb8Alpha8 => glow::SRGB8_ALPHA8,
            InternalFormat::Other(raw) => raw,
        }
    }
}

impl IntoGl for WrapMode {
    fn into_gl(self) -> u32 {
        match self {
            WrapMode::Repeat => glow::REPEAT,
            WrapMode::ClampToBorder => glow::CLAMP_TO_BORDER,
            WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
        }
    }
}

impl IntoGl for FilterMode {
    fn into_gl(self) -> u32 {
        match self {
            FilterMode::Nearest => glow::NEAREST,
            FilterMode::Linear => glow::LINEAR,
            FilterMode::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }
    }
}

impl IntoGl for CullMode {
    fn into_gl(self) -> u32 {
        match self {
            CullMode::Front => glow::FRONT,
            CullMode::Back => glow::BACK,
            CullMode::FrontAndBack => glow::FRONT_AND_BACK,
        }
    }
}

impl IntoGl for PolygonMode {
    fn into_gl(self) -> u32 {
        match self {
            PolygonMode::Point => glow::POINT,
            PolygonMode::Line => glow::LINE,
            PolygonMode::Fill => glow::FILL,
        }
    }
}

impl IntoGl for BlendFactor {
    fn into_gl(self) -> u32 {
        match self {
            BlendFactor::Zero => glow::ZERO,
            BlendFactor::One => glow::ONE,
            BlendFactor::SrcColor => glow::SRC_COLOR,
            BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
            BlendFactor::DstColor => glow::DST_COLOR,
            BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
            BlendFactor::SrcAlpha => glow::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstAlpha => glow::DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
            BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
            BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
            BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
            BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
            BlendFactor::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
        }
    }
}

/// Maps an introspected `GLenum` type back to the engine's classification.
pub fn from_gl_type(raw: u32) -> GlslType {
    match raw {
        glow::FLOAT => GlslType::Float,
        glow::FLOAT_VEC2 => GlslType::Vec2,
        glow::FLOAT_VEC3 => GlslType::Vec3,
        glow::FLOAT_VEC4 => GlslType::Vec4,
        glow::FLOAT_MAT3 => GlslType::Mat3,
        glow::FLOAT_MAT4 => GlslType::Mat4,
        glow::INT => GlslType::Int,
        glow::UNSIGNED_INT => GlslType::UInt,
        glow::SAMPLER_2D => GlslType::Sampler2D,
        glow::SAMPLER_CUBE => GlslType::SamplerCube,
        glow::SAMPLER_2D_ARRAY => GlslType::Sampler2DArray,
        other => GlslType::Unsupported(other),
    }
}

/// Maps a queried internal format back, keeping unknown values as raw enums.
pub fn from_gl_internal_format(raw: u32) -> InternalFormat {
    match raw {
        glow::RGBA8 => InternalFormat::Rgba8,
        glow::RGB8 => InternalFormat::Rgb8,
        glow::SRGB8_ALPHA8 => InternalFormat::Srgb8Alpha8,
        other => InternalFormat::Other(other),
    }
}

/// The client pixel format of tightly packed 8-bit image data.
pub fn pixel_format(image: &ImageData) -> u32 {
    if image.has_alpha() {
        glow::RGBA
    } else {
        glow::RGB
    }
}

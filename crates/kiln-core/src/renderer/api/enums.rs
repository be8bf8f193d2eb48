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

//! Enumerations shared between the device contract and the asset formats.

use std::fmt;

/// A programmable stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex processing.
    Vertex,
    /// Per-primitive processing.
    Geometry,
    /// Per-fragment processing.
    Fragment,
}

impl ShaderStage {
    /// Chooses the stage from a shader file name (`*.vs.glsl`, `*.gs.glsl`, `*.fs.glsl`).
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with("vs.glsl") {
            Some(Self::Vertex)
        } else if path.ends_with("gs.glsl") {
            Some(Self::Geometry)
        } else if path.ends_with("fs.glsl") {
            Some(Self::Fragment)
        } else {
            None
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// The dimensionality of a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// A single 2D image.
    Flat,
    /// Six square faces.
    Cube,
    /// A stack of equally sized 2D layers.
    Array,
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureKind::Flat => "2D",
            TextureKind::Cube => "CUBEMAP",
            TextureKind::Array => "2D_ARRAY",
        };
        f.write_str(name)
    }
}

/// Which faces are discarded by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// Front-facing polygons are culled.
    Front,
    /// Back-facing polygons are culled.
    Back,
    /// All polygons are culled.
    FrontAndBack,
}

impl CullMode {
    /// Parses the material-file spelling (`FRONT`, `BACK`, `FRONT_AND_BACK`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FRONT" => Some(Self::Front),
            "BACK" => Some(Self::Back),
            "FRONT_AND_BACK" => Some(Self::FrontAndBack),
            _ => None,
        }
    }
}

/// How polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Vertices only.
    Point,
    /// Edges only.
    Line,
    /// Filled interiors.
    #[default]
    Fill,
}

impl PolygonMode {
    /// Parses the material-file spelling (`POINT`, `LINE`, `FILL`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "POINT" => Some(Self::Point),
            "LINE" => Some(Self::Line),
            "FILL" => Some(Self::Fill),
            _ => None,
        }
    }
}

/// A blend-equation factor, named after the standard OpenGL factors.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
}

impl BlendFactor {
    /// Parses the material-file spelling, e.g. `ONE_MINUS_SRC_ALPHA`.
    pub fn from_name(name: &str) -> Option<Self> {
        let factor = match name {
            "ZERO" => Self::Zero,
            "ONE" => Self::One,
            "SRC_COLOR" => Self::SrcColor,
            "ONE_MINUS_SRC_COLOR" => Self::OneMinusSrcColor,
            "DST_COLOR" => Self::DstColor,
            "ONE_MINUS_DST_COLOR" => Self::OneMinusDstColor,
            "SRC_ALPHA" => Self::SrcAlpha,
            "ONE_MINUS_SRC_ALPHA" => Self::OneMinusSrcAlpha,
            "DST_ALPHA" => Self::DstAlpha,
            "ONE_MINUS_DST_ALPHA" => Self::OneMinusDstAlpha,
            "CONSTANT_COLOR" => Self::ConstantColor,
            "ONE_MINUS_CONSTANT_COLOR" => Self::OneMinusConstantColor,
            "CONSTANT_ALPHA" => Self::ConstantAlpha,
            "ONE_MINUS_CONSTANT_ALPHA" => Self::OneMinusConstantAlpha,
            "SRC_ALPHA_SATURATE" => Self::SrcAlphaSaturate,
            _ => return None,
        };
        Some(factor)
    }
}

/// Fixed-function state applied when a material is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterState {
    /// Face culling, `None` disables it.
    pub cull_mode: Option<CullMode>,
    /// Polygon rasterization mode.
    pub polygon_mode: PolygonMode,
    /// Source and destination blend factors, `None` disables blending.
    pub blend: Option<(BlendFactor, BlendFactor)>,
}

/// The GLSL type of an attribute or uniform, as reported by program introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslType {
    /// `float`
    Float,
    /// `vec2`
    Vec2,
    /// `vec3`
    Vec3,
    /// `vec4`
    Vec4,
    /// `mat3`
    Mat3,
    /// `mat4`
    Mat4,
    /// `int`
    Int,
    /// `uint`
    UInt,
    /// `sampler2D`
    Sampler2D,
    /// `samplerCube`
    SamplerCube,
    /// `sampler2DArray`
    Sampler2DArray,
    /// Any type the engine does not classify, carrying the raw device enum.
    Unsupported(u32),
}

impl GlslType {
    /// The GLSL keyword for this type.
    pub fn glsl_name(self) -> &'static str {
        match self {
            GlslType::Float => "float",
            GlslType::Vec2 => "vec2",
            GlslType::Vec3 => "vec3",
            GlslType::Vec4 => "vec4",
            GlslType::Mat3 => "mat3",
            GlslType::Mat4 => "mat4",
            GlslType::Int => "int",
            GlslType::UInt => "uint",
            GlslType::Sampler2D => "sampler2D",
            GlslType::SamplerCube => "samplerCube",
            GlslType::Sampler2DArray => "sampler2DArray",
            GlslType::Unsupported(_) => "<unsupported>",
        }
    }

    /// Parses a GLSL keyword. Unknown keywords yield `None`.
    pub fn from_glsl_name(name: &str) -> Option<Self> {
        let ty = match name {
            "float" => GlslType::Float,
            "vec2" => GlslType::Vec2,
            "vec3" => GlslType::Vec3,
            "vec4" => GlslType::Vec4,
            "mat3" => GlslType::Mat3,
            "mat4" => GlslType::Mat4,
            "int" => GlslType::Int,
            "uint" => GlslType::UInt,
            "sampler2D" => GlslType::Sampler2D,
            "samplerCube" => GlslType::SamplerCube,
            "sampler2DArray" => GlslType::Sampler2DArray,
            _ => return None,
        };
        Some(ty)
    }

    /// The texture kind a sampler of this type must be bound to.
    pub fn sampler_kind(self) -> Option<TextureKind> {
        match self {
            GlslType::Sampler2D => Some(TextureKind::Flat),
            GlslType::SamplerCube => Some(TextureKind::Cube),
            GlslType::Sampler2DArray => Some(TextureKind::Array),
            _ => None,
        }
    }

    /// Scalar, vector, and matrix types that can be set as a plain uniform.
    pub fn is_plain_data(self) -> bool {
        matches!(
            self,
            GlslType::Float
                | GlslType::Vec2
                | GlslType::Vec3
                | GlslType::Vec4
                | GlslType::Mat3
                | GlslType::Mat4
                | GlslType::Int
                | GlslType::UInt
        )
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlslType::Unsupported(raw) => write!(f, "<unsupported 0x{raw:04X}>"),
            other => f.write_str(other.glsl_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_path() {
        assert_eq!(ShaderStage::from_path("shaders/sky.vs.glsl"), Some(ShaderStage::Vertex));
        assert_eq!(ShaderStage::from_path("shaders/sky.fs.glsl"), Some(ShaderStage::Fragment));
        assert_eq!(ShaderStage::from_path("shaders/sky.gs.glsl"), Some(ShaderStage::Geometry));
        assert_eq!(ShaderStage::from_path("shaders/sky.glsl"), None);
    }

    #[test]
    fn test_material_enum_spellings() {
        assert_eq!(CullMode::from_name("FRONT_AND_BACK"), Some(CullMode::FrontAndBack));
        assert_eq!(CullMode::from_name("front"), None);
        assert_eq!(PolygonMode::from_name("LINE"), Some(PolygonMode::Line));
        assert_eq!(
            BlendFactor::from_name("ONE_MINUS_SRC_ALPHA"),
            Some(BlendFactor::OneMinusSrcAlpha)
        );
        assert_eq!(BlendFactor::from_name("HALF"), None);
    }

    #[test]
    fn test_glsl_type_classification() {
        assert_eq!(GlslType::from_glsl_name("samplerCube"), Some(GlslType::SamplerCube));
        assert_eq!(GlslType::SamplerCube.sampler_kind(), Some(TextureKind::Cube));
        assert!(GlslType::Mat3.is_plain_data());
        assert!(!GlslType::Sampler2D.is_plain_data());
        assert!(!GlslType::Unsupported(0x8B56).is_plain_data());
        assert_eq!(GlslType::from_glsl_name("bool"), None);
    }
}

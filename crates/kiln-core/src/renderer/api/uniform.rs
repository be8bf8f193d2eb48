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

use super::enums::GlslType;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// A value for a free-standing uniform.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
    Int(i32),
    UInt(u32),
}

impl UniformValue {
    /// The GLSL type this value can be assigned to.
    pub fn glsl_type(&self) -> GlslType {
        match self {
            UniformValue::Float(_) => GlslType::Float,
            UniformValue::Vec2(_) => GlslType::Vec2,
            UniformValue::Vec3(_) => GlslType::Vec3,
            UniformValue::Vec4(_) => GlslType::Vec4,
            UniformValue::Mat3(_) => GlslType::Mat3,
            UniformValue::Mat4(_) => GlslType::Mat4,
            UniformValue::Int(_) => GlslType::Int,
            UniformValue::UInt(_) => GlslType::UInt,
        }
    }
}

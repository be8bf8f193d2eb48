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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Errors come in two tiers. [`InitError`] is fatal: it is returned from
//! constructors and aborts engine start-up. [`LoadError`] is recoverable:
//! loaders return it, and the owning manager logs it and substitutes a
//! placeholder resource.

use crate::renderer::api::{GlslType, ShaderStage};
use std::fmt;

/// An error related to the compilation of a single shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The device refused to create a shader object.
    CreationFailed {
        /// The requested stage.
        stage: ShaderStage,
    },
    /// The source failed to compile.
    CompilationError {
        /// The stage being compiled.
        stage: ShaderStage,
        /// The compiler's info log.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CreationFailed { stage } => {
                write!(f, "Failed to create {stage} shader object")
            }
            ShaderError::CompilationError { stage, details } => {
                write!(f, "Error compiling {stage} shader: {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error raised while linking a program or validating its interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    /// The device refused to create a program object.
    CreationFailed,
    /// The device reported a link failure.
    LinkError {
        /// The linker's info log.
        details: String,
    },
    /// An active attribute sits at a location outside the allowed table.
    AttributeLocationNotAllowed {
        /// The attribute name.
        name: String,
        /// The offending location.
        location: i32,
    },
    /// An active attribute has the wrong name or type for its location.
    AttributeMismatch {
        /// The attribute name.
        name: String,
        /// The declared type.
        ty: GlslType,
        /// The attribute location.
        location: i32,
    },
    /// The program uses more samplers than the device has texture units.
    TooManySamplers {
        /// Samplers found so far.
        count: usize,
        /// The device limit.
        max: usize,
    },
    /// An engine uniform was declared with the wrong type.
    EngineUniformType {
        /// The uniform name.
        name: String,
        /// The type the renderer supplies.
        expected: GlslType,
        /// The type found in the program.
        found: GlslType,
    },
    /// A free-standing uniform has a type the engine cannot supply.
    UnsupportedUniform {
        /// The uniform name.
        name: String,
        /// The declared type.
        ty: GlslType,
    },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::CreationFailed => write!(f, "Failed to create program object"),
            ProgramError::LinkError { details } => write!(f, "Error linking program: {details}"),
            ProgramError::AttributeLocationNotAllowed { name, location } => {
                write!(f, "Attribute '{name}' uses location '{location}' which is not allowed")
            }
            ProgramError::AttributeMismatch { name, ty, location } => {
                write!(
                    f,
                    "Attribute '{name}' with type {ty} is not allowed at location '{location}'"
                )
            }
            ProgramError::TooManySamplers { count, max } => {
                write!(f, "Program uses {count} samplers but max {max} are allowed")
            }
            ProgramError::EngineUniformType {
                name,
                expected,
                found,
            } => write!(
                f,
                "Uniform '{name}' needs to be of type '{expected}' but was declared as '{found}'"
            ),
            ProgramError::UnsupportedUniform { name, ty } => {
                write!(f, "Unsupported uniform type {ty} for uniform '{name}'")
            }
        }
    }
}

impl std::error::Error for ProgramError {}

/// An error related to the creation of textures, samplers, buffers, or meshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The device could not allocate the object.
    CreationFailed {
        /// What was being created.
        what: &'static str,
        /// Device-provided detail.
        details: String,
    },
    /// The supplied data does not describe a valid resource.
    InvalidData(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::CreationFailed { what, details } => {
                write!(f, "Failed to create {what}: {details}")
            }
            ResourceError::InvalidData(details) => write!(f, "Invalid resource data: {details}"),
        }
    }
}

impl std::error::Error for ResourceError {}

/// A fatal error that prevents the renderer from starting.
#[derive(Debug)]
pub enum InitError {
    /// The device lacks a required extension.
    MissingExtension(String),
    /// A built-in dummy shader failed to compile.
    DummyShader(ShaderError),
    /// The built-in dummy program failed to link.
    DummyProgram(ProgramError),
    /// A resource cache for the same type was registered twice.
    DuplicateCache {
        /// The resource type name.
        type_name: &'static str,
    },
    /// A start-up resource (uniform buffer, sampler, ...) could not be created.
    Resource(ResourceError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::MissingExtension(name) => {
                write!(f, "Required extension '{name}' is not supported")
            }
            InitError::DummyShader(e) => write!(f, "Couldn't create dummy shader: {e}"),
            InitError::DummyProgram(e) => write!(f, "Couldn't create dummy program: {e}"),
            InitError::DuplicateCache { type_name } => {
                write!(f, "A resource cache for '{type_name}' is already registered")
            }
            InitError::Resource(e) => write!(f, "Failed to create start-up resource: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::DummyShader(e) => Some(e),
            InitError::DummyProgram(e) => Some(e),
            InitError::Resource(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResourceError> for InitError {
    fn from(e: ResourceError) -> Self {
        InitError::Resource(e)
    }
}

/// A recoverable failure while loading an asset.
///
/// Callers log it and substitute the matching placeholder.
#[derive(Debug)]
pub enum LoadError {
    /// The asset file does not exist.
    NotFound {
        /// The requested path.
        path: String,
    },
    /// A shader stage failed to compile.
    Shader(ShaderError),
    /// A program failed to link or validate.
    Program(ProgramError),
    /// A device resource could not be created.
    Resource(ResourceError),
    /// The asset document is malformed or inconsistent.
    Asset {
        /// The asset path.
        path: String,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { path } => write!(f, "'{path}' does not exist"),
            LoadError::Shader(e) => write!(f, "Shader error: {e}"),
            LoadError::Program(e) => write!(f, "Program error: {e}"),
            LoadError::Resource(e) => write!(f, "Resource error: {e}"),
            LoadError::Asset { path, reason } => write!(f, "Failed to load '{path}': {reason}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Shader(e) => Some(e),
            LoadError::Program(e) => Some(e),
            LoadError::Resource(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShaderError> for LoadError {
    fn from(e: ShaderError) -> Self {
        LoadError::Shader(e)
    }
}

impl From<ProgramError> for LoadError {
    fn from(e: ProgramError) -> Self {
        LoadError::Program(e)
    }
}

impl From<ResourceError> for LoadError {
    fn from(e: ResourceError) -> Self {
        LoadError::Resource(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationError {
            stage: ShaderStage::Fragment,
            details: "0:3: 'colr' undeclared".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error compiling fragment shader: 0:3: 'colr' undeclared"
        );
    }

    #[test]
    fn program_error_display() {
        let err = ProgramError::EngineUniformType {
            name: "modelMatrix".to_string(),
            expected: GlslType::Mat4,
            found: GlslType::Mat3,
        };
        assert_eq!(
            err.to_string(),
            "Uniform 'modelMatrix' needs to be of type 'mat4' but was declared as 'mat3'"
        );
        let err = ProgramError::TooManySamplers { count: 17, max: 16 };
        assert!(err.to_string().contains("17 samplers"));
    }

    #[test]
    fn init_error_source_chain() {
        let err = InitError::DummyShader(ShaderError::CreationFailed {
            stage: ShaderStage::Geometry,
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Couldn't create dummy shader"));

        let err = InitError::MissingExtension("GL_ARB_texture_storage".into());
        assert!(err.source().is_none());
    }

    #[test]
    fn load_error_from_conversions() {
        let err: LoadError = ProgramError::LinkError {
            details: "boom".into(),
        }
        .into();
        assert!(matches!(err, LoadError::Program(_)));
        assert!(err.source().is_some());
    }
}

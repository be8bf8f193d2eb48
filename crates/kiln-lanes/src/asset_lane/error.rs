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

use kiln_core::renderer::{LoadError, ResourceError, TextureKind};
use thiserror::Error;

/// Why a texture could not be built.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The file does not exist.
    #[error("'{path}' does not exist")]
    NotFound {
        /// The requested path.
        path: String,
    },

    /// The file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The image data could not be decoded.
    #[error("image '{path}' couldn't be decoded: {source}")]
    Decode {
        /// The image path.
        path: String,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A cubemap or array description is not valid JSON.
    #[error("failed to parse '{path}': {source}")]
    Json {
        /// The description path.
        path: String,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A cubemap description lists no faces.
    #[error("no faces defined in '{path}'")]
    NoFaces {
        /// The description path.
        path: String,
    },

    /// A cubemap description lists fewer than six faces.
    #[error("there are only {count} faces defined in '{path}'")]
    TooFewFaces {
        /// The description path.
        path: String,
        /// The number of faces found.
        count: usize,
    },

    /// A cubemap description lists more than six faces.
    #[error("there are too many ({count}) faces defined in '{path}'")]
    TooManyFaces {
        /// The description path.
        path: String,
        /// The number of faces found.
        count: usize,
    },

    /// An array description lists no layers.
    #[error("no layers defined in '{path}'")]
    NoLayers {
        /// The description path.
        path: String,
    },

    /// An array description lists more than 255 layers.
    #[error("more than the maximum of 255 layers ({count}) defined in '{path}'")]
    TooManyLayers {
        /// The description path.
        path: String,
        /// The number of layers found.
        count: usize,
    },

    /// A face or layer differs from the first one.
    #[error("image {index} of '{path}' differs from the first one in {property}")]
    Mismatch {
        /// The description path.
        path: String,
        /// Index of the offending face or layer.
        index: usize,
        /// `size`, `bpp`, or `alpha`.
        property: &'static str,
    },

    /// The device rejected the texture.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl From<TextureError> for LoadError {
    fn from(e: TextureError) -> Self {
        match e {
            TextureError::NotFound { path } => LoadError::NotFound { path },
            TextureError::Resource(e) => LoadError::Resource(e),
            TextureError::Io { ref path, .. }
            | TextureError::Decode { ref path, .. }
            | TextureError::Json { ref path, .. }
            | TextureError::NoFaces { ref path }
            | TextureError::TooFewFaces { ref path, .. }
            | TextureError::TooManyFaces { ref path, .. }
            | TextureError::NoLayers { ref path }
            | TextureError::TooManyLayers { ref path, .. }
            | TextureError::Mismatch { ref path, .. } => LoadError::Asset {
                path: path.clone(),
                reason: e.to_string(),
            },
        }
    }
}

/// Why a material could not be built.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// The file does not exist.
    #[error("'{path}' does not exist")]
    NotFound {
        /// The requested path.
        path: String,
    },

    /// The file does not carry the `.mat` extension.
    #[error("file is not a material: '{path}'")]
    NotAMaterial {
        /// The requested path.
        path: String,
    },

    /// The file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has wrongly typed fields.
    #[error("failed to parse '{path}': {source}")]
    Json {
        /// The file path.
        path: String,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },

    /// `layers` is missing or empty.
    #[error("no layers specified in '{path}'")]
    NoLayers {
        /// The file path.
        path: String,
    },

    /// A layer has no `shaders` object, or lacks `vs` or `fs`.
    #[error("no {stage} shader specified in layer '{layer}' of '{path}'")]
    MissingShader {
        /// The file path.
        path: String,
        /// One-based layer index.
        layer: usize,
        /// `vertex` or `fragment`.
        stage: &'static str,
    },

    /// The program samples textures but the layer lists none.
    #[error("no textures specified in layer '{layer}' of '{path}'")]
    NoTextures {
        /// The file path.
        path: String,
        /// One-based layer index.
        layer: usize,
    },

    /// A required sampler has no texture.
    #[error("required texture for sampler '{sampler}' not specified in layer '{layer}' of '{path}'")]
    MissingTexture {
        /// The file path.
        path: String,
        /// One-based layer index.
        layer: usize,
        /// The sampler uniform name.
        sampler: String,
    },

    /// The texture does not fit the sampler type.
    #[error("required texture for sampler '{sampler}' has to be of type {expected} in layer '{layer}' of '{path}', got {found}")]
    TextureKindMismatch {
        /// The file path.
        path: String,
        /// One-based layer index.
        layer: usize,
        /// The sampler uniform name.
        sampler: String,
        /// The kind the sampler needs.
        expected: TextureKind,
        /// The kind of the texture.
        found: TextureKind,
    },
}

impl MaterialError {
    /// The material path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            MaterialError::NotFound { path }
            | MaterialError::NotAMaterial { path }
            | MaterialError::Io { path, .. }
            | MaterialError::Json { path, .. }
            | MaterialError::NoLayers { path }
            | MaterialError::MissingShader { path, .. }
            | MaterialError::NoTextures { path, .. }
            | MaterialError::MissingTexture { path, .. }
            | MaterialError::TextureKindMismatch { path, .. } => path,
        }
    }
}

impl From<MaterialError> for LoadError {
    fn from(e: MaterialError) -> Self {
        match e {
            MaterialError::NotFound { path } => LoadError::NotFound { path },
            other => LoadError::Asset {
                path: other.path().to_string(),
                reason: other.to_string(),
            },
        }
    }
}

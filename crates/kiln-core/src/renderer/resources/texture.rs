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

use crate::asset::Asset;
use crate::renderer::api::{InternalFormat, TextureDescriptor, TextureId, TextureKind};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;
use std::rc::Rc;

/// A device texture: 2D, cubemap, or 2D array.
#[derive(Debug)]
pub struct Texture {
    device: Rc<dyn GraphicsDevice>,
    id: TextureId,
    kind: TextureKind,
    internal_format: InternalFormat,
    width: u32,
    height: u32,
    layers: u32,
    placeholder: bool,
}

impl Texture {
    /// Allocates and uploads a texture.
    ///
    /// # Errors
    /// Returns [`ResourceError::InvalidData`] if the descriptor carries no
    /// images, or the device error if allocation fails.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<Self, ResourceError> {
        if descriptor.images.is_empty() {
            return Err(ResourceError::InvalidData(
                "texture descriptor without images".to_string(),
            ));
        }

        let id = device.create_texture(descriptor)?;

        Ok(Self {
            device,
            id,
            kind: descriptor.kind,
            internal_format: descriptor.internal_format,
            width: descriptor.width(),
            height: descriptor.height(),
            layers: descriptor.images.len() as u32,
            placeholder: false,
        })
    }

    /// A placeholder that owns no device object.
    ///
    /// Used when even the built-in dummy texture cannot be allocated.
    pub fn empty(device: Rc<dyn GraphicsDevice>, kind: TextureKind) -> Self {
        Self {
            device,
            id: TextureId::INVALID,
            kind,
            internal_format: InternalFormat::default(),
            width: 0,
            height: 0,
            layers: 0,
            placeholder: true,
        }
    }

    /// Flags this texture as a stand-in for an asset that failed to load.
    pub fn into_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// The device id, [`TextureId::INVALID`] after [`Texture::reset`].
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Dimensionality.
    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    /// The storage format chosen at load time.
    pub fn internal_format(&self) -> InternalFormat {
        self.internal_format
    }

    /// Base level width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Base level height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of faces or layers (1 for a flat texture).
    pub fn layers(&self) -> u32 {
        self.layers
    }

    /// Whether this is the checkerboard placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Releases the device object and invalidates the id.
    pub fn reset(&mut self) {
        if self.id.is_valid() {
            self.device.destroy_texture(self.id);
        }
        self.id = TextureId::INVALID;
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.reset();
    }
}

impl Asset for Texture {}

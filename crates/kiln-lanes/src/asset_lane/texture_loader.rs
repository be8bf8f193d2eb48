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

//! Texture loading: single images, cubemaps, and texture arrays.

use super::{composite, CompositeImages, TextureError, CUBE_FACES};
use image::imageops::FilterType;
use image::DynamicImage;
use kiln_core::renderer::{
    DeviceCapabilities, GraphicsDevice, ImageData, InternalFormat, Texture, TextureDescriptor,
    TextureKind,
};
use kiln_core::vfs::{self, FileSystem};
use kiln_core::Settings;
use kiln_data::ResourceLoader;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::SystemTime;

/// Upper bound of the configured picmip.
pub const MAX_PICMIP: u32 = 3;

/// Edge length of the checkerboard dummy.
pub const DUMMY_TEXTURE_SIZE: u32 = 64;

/// Edge length of one checkerboard cell.
pub const DUMMY_CELL_SIZE: u32 = 8;

/// Decodes image files and uploads them as textures.
#[derive(Debug)]
pub struct TextureLoader {
    device: Rc<dyn GraphicsDevice>,
    fs: Rc<dyn FileSystem>,
    flat_format: InternalFormat,
    cube_format: InternalFormat,
    array_format: InternalFormat,
    picmip: u32,
    max_texture_size: u32,
    max_cube_map_texture_size: u32,
}

impl TextureLoader {
    /// Resolves internal formats and the effective picmip once.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        fs: Rc<dyn FileSystem>,
        capabilities: &DeviceCapabilities,
        settings: &Settings,
    ) -> Self {
        let resolve = |kind: TextureKind| {
            let format = if capabilities.supports_internalformat_query2 {
                device.preferred_internal_format(kind).unwrap_or_default()
            } else {
                InternalFormat::default()
            };
            log::debug!("TextureLoader: {kind} textures use {format:?}");
            format
        };
        let flat_format = resolve(TextureKind::Flat);
        let cube_format = resolve(TextureKind::Cube);
        let array_format = resolve(TextureKind::Array);

        let picmip = settings.renderer.textures.picmip.min(MAX_PICMIP);
        if picmip != settings.renderer.textures.picmip {
            log::warn!("TextureLoader: picmip clamped to {picmip}");
        }

        Self {
            device,
            fs,
            flat_format,
            cube_format,
            array_format,
            picmip,
            max_texture_size: capabilities.max_texture_size,
            max_cube_map_texture_size: capabilities.max_cube_map_texture_size,
        }
    }

    /// The effective picmip.
    pub fn picmip(&self) -> u32 {
        self.picmip
    }

    /// The internal format used for textures of `kind`.
    pub fn internal_format(&self, kind: TextureKind) -> InternalFormat {
        match kind {
            TextureKind::Flat => self.flat_format,
            TextureKind::Cube => self.cube_format,
            TextureKind::Array => self.array_format,
        }
    }

    /// Loads the texture at `path`, dispatching on its extension.
    ///
    /// # Errors
    /// The first problem found: a missing or unreadable file, an invalid
    /// description, an undecodable image, a face or layer mismatch, or a
    /// device failure.
    pub fn load_texture(&self, path: &str) -> Result<Texture, TextureError> {
        match vfs::extension(path) {
            "cub" => self.load_cubemap(path),
            "arr" => self.load_array(path),
            _ => {
                let image = self.decode(path, self.max_texture_size)?;
                self.upload(TextureKind::Flat, &[image])
            }
        }
    }

    /// A fresh checkerboard texture, flagged as placeholder.
    pub fn dummy(&self) -> Texture {
        let image = ImageData::checkerboard(DUMMY_TEXTURE_SIZE, DUMMY_CELL_SIZE);
        match self.upload(TextureKind::Flat, &[image]) {
            Ok(texture) => texture.into_placeholder(),
            Err(e) => {
                log::error!("TextureLoader: couldn't create dummy texture: {e}");
                Texture::empty(self.device.clone(), TextureKind::Flat)
            }
        }
    }

    fn load_cubemap(&self, path: &str) -> Result<Texture, TextureError> {
        let faces = composite::parse_cubemap(path, &self.read_description(path)?)?;
        let images = self.load_composite(path, &faces, self.max_cube_map_texture_size)?;
        debug_assert_eq!(images.len(), CUBE_FACES);
        self.upload(TextureKind::Cube, &images)
    }

    fn load_array(&self, path: &str) -> Result<Texture, TextureError> {
        let layers = composite::parse_array(path, &self.read_description(path)?)?;
        let images = self.load_composite(path, &layers, self.max_texture_size)?;
        self.upload(TextureKind::Array, &images)
    }

    fn read_description(&self, path: &str) -> Result<String, TextureError> {
        if !self.fs.exists(path) {
            return Err(TextureError::NotFound {
                path: path.to_string(),
            });
        }
        self.fs.read_to_string(path).map_err(|source| TextureError::Io {
            path: path.to_string(),
            source,
        })
    }

    fn load_composite(
        &self,
        path: &str,
        names: &[String],
        max_size: u32,
    ) -> Result<Vec<ImageData>, TextureError> {
        let dir = vfs::parent_dir(path, self.fs.dir_separator());
        let mut images = CompositeImages::new(path, names.len());
        for name in names {
            images.add(self.decode(&format!("{dir}{name}"), max_size)?)?;
        }
        Ok(images.into_images())
    }

    fn decode(&self, path: &str, max_size: u32) -> Result<ImageData, TextureError> {
        if !self.fs.exists(path) {
            return Err(TextureError::NotFound {
                path: path.to_string(),
            });
        }
        let bytes = self.fs.read(path).map_err(|source| TextureError::Io {
            path: path.to_string(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
            path: path.to_string(),
            source,
        })?;

        Ok(to_image_data(self.shrink(image, max_size)))
    }

    fn shrink(&self, mut image: DynamicImage, max_size: u32) -> DynamicImage {
        for _ in 0..self.picmip {
            image = halve(&image);
        }
        while image.width().max(image.height()) > max_size.max(1) {
            image = halve(&image);
        }
        image
    }

    fn upload(&self, kind: TextureKind, images: &[ImageData]) -> Result<Texture, TextureError> {
        let descriptor = TextureDescriptor {
            kind,
            internal_format: self.internal_format(kind),
            images,
        };
        Ok(Texture::new(self.device.clone(), &descriptor)?)
    }
}

fn halve(image: &DynamicImage) -> DynamicImage {
    let width = (image.width() / 2).max(1);
    let height = (image.height() / 2).max(1);
    image.resize_exact(width, height, FilterType::Triangle)
}

fn to_image_data(image: DynamicImage) -> ImageData {
    let (width, height) = (image.width(), image.height());
    if image.color().has_alpha() {
        ImageData {
            width,
            height,
            bits_per_pixel: 32,
            pixels: image.into_rgba8().into_raw(),
        }
    } else {
        ImageData {
            width,
            height,
            bits_per_pixel: 24,
            pixels: image.into_rgb8().into_raw(),
        }
    }
}

impl ResourceLoader<Texture> for TextureLoader {
    type Error = Infallible;

    fn load(&self, id: &str) -> Result<Texture, Infallible> {
        match self.load_texture(id) {
            Ok(texture) => {
                log::debug!(
                    "TextureLoader: loaded '{id}' ({}x{}, {} image(s))",
                    texture.width(),
                    texture.height(),
                    texture.layers()
                );
                Ok(texture)
            }
            Err(e) => {
                log::warn!("TextureLoader: {e}, using dummy texture");
                Ok(self.dummy())
            }
        }
    }

    /// For cubemaps and arrays, the latest of the description and its images.
    fn modified(&self, id: &str) -> Option<SystemTime> {
        let own = self.fs.modified(id)?;
        let parse: fn(&str, &str) -> Result<Vec<String>, TextureError> = match vfs::extension(id) {
            "cub" => composite::parse_cubemap,
            "arr" => composite::parse_array,
            _ => return Some(own),
        };
        let Some(names) = self
            .fs
            .read_to_string(id)
            .ok()
            .and_then(|json| parse(id, &json).ok())
        else {
            return Some(own);
        };

        let dir = vfs::parent_dir(id, self.fs.dir_separator());
        let latest = names
            .iter()
            .filter_map(|name| self.fs.modified(&format!("{dir}{name}")))
            .fold(own, SystemTime::max);
        Some(latest)
    }
}

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

//! Decoded images and texture creation descriptors.

use super::enums::TextureKind;

/// The storage format the device allocates for a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InternalFormat {
    /// 8-bit RGBA, the fallback when the device cannot recommend a format.
    #[default]
    Rgba8,
    /// 8-bit RGB.
    Rgb8,
    /// sRGB-encoded 8-bit RGBA.
    Srgb8Alpha8,
    /// A device-specific format enum.
    Other(u32),
}

/// Tightly packed, row-major 8-bit pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// 24 for RGB, 32 for RGBA.
    pub bits_per_pixel: u8,
    /// Pixels, `width * height * bits_per_pixel / 8` bytes.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Whether the pixels carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.bits_per_pixel == 32
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }

    /// A magenta/black RGBA checkerboard of `size` x `size` pixels with square cells.
    pub fn checkerboard(size: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let on = ((x / cell) + (y / cell)) % 2 == 0;
                let texel = if on {
                    [255, 0, 255, 255]
                } else {
                    [0, 0, 0, 255]
                };
                pixels.extend_from_slice(&texel);
            }
        }
        Self {
            width: size,
            height: size,
            bits_per_pixel: 32,
            pixels,
        }
    }
}

/// Everything the device needs to allocate and fill a texture.
#[derive(Debug, Clone, Copy)]
pub struct TextureDescriptor<'a> {
    /// Dimensionality.
    pub kind: TextureKind,
    /// Storage format.
    pub internal_format: InternalFormat,
    /// One image for [`TextureKind::Flat`], six faces (+X, -X, +Y, -Y, +Z, -Z)
    /// for [`TextureKind::Cube`], or one image per layer for [`TextureKind::Array`].
    /// All images share size and pixel format.
    pub images: &'a [ImageData],
}

impl TextureDescriptor<'_> {
    /// Width of the base level.
    pub fn width(&self) -> u32 {
        self.images.first().map_or(0, |image| image.width)
    }

    /// Height of the base level.
    pub fn height(&self) -> u32 {
        self.images.first().map_or(0, |image| image.height)
    }

    /// The number of mip levels of a full chain.
    pub fn mip_levels(&self) -> u32 {
        let largest = self.width().max(self.height()).max(1);
        u32::BITS - largest.leading_zeros()
    }
}

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

//! Cubemap (`.cub`) and texture array (`.arr`) descriptions.
//!
//! Both are small JSON documents listing image paths relative to the
//! description file:
//!
//! ```json
//! { "faces": ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"] }
//! { "layers": ["grass.png", "rock.png"] }
//! ```

use super::TextureError;
use kiln_core::renderer::ImageData;
use serde::Deserialize;

/// Faces of a cubemap, ordered +X, -X, +Y, -Y, +Z, -Z.
pub const CUBE_FACES: usize = 6;

/// Largest layer count of a texture array.
pub const MAX_ARRAY_LAYERS: usize = 255;

#[derive(Debug, Deserialize)]
struct CubemapDocument {
    #[serde(default)]
    faces: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ArrayDocument {
    #[serde(default)]
    layers: Vec<String>,
}

/// Reads the face list of the cubemap description at `path`.
///
/// # Errors
/// Malformed JSON, or a face count other than [`CUBE_FACES`].
pub fn parse_cubemap(path: &str, json: &str) -> Result<Vec<String>, TextureError> {
    let document: CubemapDocument = serde_json::from_str(json).map_err(|source| TextureError::Json {
        path: path.to_string(),
        source,
    })?;

    let count = document.faces.len();
    match count {
        0 => Err(TextureError::NoFaces {
            path: path.to_string(),
        }),
        c if c < CUBE_FACES => Err(TextureError::TooFewFaces {
            path: path.to_string(),
            count,
        }),
        c if c > CUBE_FACES => Err(TextureError::TooManyFaces {
            path: path.to_string(),
            count,
        }),
        _ => Ok(document.faces),
    }
}

/// Reads the layer list of the array description at `path`.
///
/// # Errors
/// Malformed JSON, no layers, or more than [`MAX_ARRAY_LAYERS`].
pub fn parse_array(path: &str, json: &str) -> Result<Vec<String>, TextureError> {
    let document: ArrayDocument = serde_json::from_str(json).map_err(|source| TextureError::Json {
        path: path.to_string(),
        source,
    })?;

    let count = document.layers.len();
    if count == 0 {
        return Err(TextureError::NoLayers {
            path: path.to_string(),
        });
    }
    if count > MAX_ARRAY_LAYERS {
        return Err(TextureError::TooManyLayers {
            path: path.to_string(),
            count,
        });
    }
    Ok(document.layers)
}

/// Collects the images of a composite texture, checking each against the first.
#[derive(Debug)]
pub struct CompositeImages {
    path: String,
    images: Vec<ImageData>,
}

impl CompositeImages {
    /// An empty collection for the description at `path`.
    pub fn new(path: impl Into<String>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            images: Vec::with_capacity(capacity),
        }
    }

    /// Appends `image`.
    ///
    /// # Errors
    /// [`TextureError::Mismatch`] naming the first property (`size`, then
    /// `bpp`) in which `image` differs from the first image. Alpha follows
    /// from `bpp`: 32-bit images carry it, 24-bit ones do not.
    pub fn add(&mut self, image: ImageData) -> Result<(), TextureError> {
        if let Some(first) = self.images.first() {
            let property = if (image.width, image.height) != (first.width, first.height) {
                Some("size")
            } else if image.bits_per_pixel != first.bits_per_pixel {
                Some("bpp")
            } else {
                None
            };

            if let Some(property) = property {
                return Err(TextureError::Mismatch {
                    path: self.path.clone(),
                    index: self.images.len(),
                    property,
                });
            }
        }

        self.images.push(image);
        Ok(())
    }

    /// Number of images collected so far.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image was added yet.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The collected images, in insertion order.
    pub fn into_images(self) -> Vec<ImageData> {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32, bits_per_pixel: u8) -> ImageData {
        ImageData {
            width,
            height,
            bits_per_pixel,
            pixels: vec![0; (width * height) as usize * usize::from(bits_per_pixel / 8)],
        }
    }

    #[test]
    fn test_cubemap_face_count() {
        let faces = r#"{ "faces": ["a", "b", "c", "d", "e", "f"] }"#;
        assert_eq!(parse_cubemap("sky.cub", faces).unwrap().len(), 6);

        assert!(matches!(
            parse_cubemap("sky.cub", r#"{ "faces": [] }"#),
            Err(TextureError::NoFaces { .. })
        ));
        assert!(matches!(
            parse_cubemap("sky.cub", "{}"),
            Err(TextureError::NoFaces { .. })
        ));
        assert!(matches!(
            parse_cubemap("sky.cub", r#"{ "faces": ["a", "b", "c", "d", "e"] }"#),
            Err(TextureError::TooFewFaces { count: 5, .. })
        ));
        assert!(matches!(
            parse_cubemap("sky.cub", r#"{ "faces": ["a", "b", "c", "d", "e", "f", "g"] }"#),
            Err(TextureError::TooManyFaces { count: 7, .. })
        ));
    }

    #[test]
    fn test_too_few_faces_message() {
        let error = parse_cubemap("sky.cub", r#"{ "faces": ["a", "b", "c", "d", "e"] }"#).unwrap_err();
        assert_eq!(error.to_string(), "there are only 5 faces defined in 'sky.cub'");
    }

    #[test]
    fn test_array_layer_count() {
        assert_eq!(parse_array("t.arr", r#"{ "layers": ["a"] }"#).unwrap(), vec!["a"]);
        assert!(matches!(
            parse_array("t.arr", r#"{ "layers": [] }"#),
            Err(TextureError::NoLayers { .. })
        ));

        let layers = |count: usize| {
            let names: Vec<String> = (0..count).map(|i| format!("\"l{i}.png\"")).collect();
            format!("{{ \"layers\": [{}] }}", names.join(","))
        };
        let limit = parse_array("t.arr", &layers(MAX_ARRAY_LAYERS)).unwrap();
        assert_eq!(limit.len(), 255);
        assert_eq!(limit[254], "l254.png");
        assert!(matches!(
            parse_array("t.arr", &layers(MAX_ARRAY_LAYERS + 1)),
            Err(TextureError::TooManyLayers { count: 256, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_array("t.arr", "{ layers"),
            Err(TextureError::Json { .. })
        ));
    }

    #[test]
    fn test_composite_rejects_first_mismatch() {
        let mut images = CompositeImages::new("sky.cub", 6);
        images.add(image(4, 4, 32)).unwrap();
        images.add(image(4, 4, 32)).unwrap();

        let size = images.add(image(8, 8, 32)).unwrap_err();
        let bpp = images.add(image(4, 4, 24)).unwrap_err();

        assert!(matches!(size, TextureError::Mismatch { index: 2, property: "size", .. }));
        assert!(matches!(bpp, TextureError::Mismatch { property: "bpp", .. }));
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_alpha_mismatch_is_a_bpp_mismatch() {
        let opaque = image(4, 4, 24);
        let translucent = image(4, 4, 32);
        assert!(!opaque.has_alpha());
        assert!(translucent.has_alpha());
        let mut images = CompositeImages::new("t.arr", 2);
        images.add(opaque).unwrap();

        let error = images.add(translucent).unwrap_err();

        assert!(matches!(error, TextureError::Mismatch { index: 1, property: "bpp", .. }));
    }
}

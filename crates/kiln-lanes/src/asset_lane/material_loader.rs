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

//! Material documents (`*.mat`).
//!
//! ```json
//! {
//!     "name": "water",
//!     "cullmode": "BACK",
//!     "polygonmode": "FILL",
//!     "blending": { "src": "SRC_ALPHA", "dst": "ONE_MINUS_SRC_ALPHA" },
//!     "layers": [
//!         {
//!             "shaders": { "vs": "shaders/water.vs.glsl", "fs": "shaders/water.fs.glsl" },
//!             "textures": { "diffuse": "textures/water.png" },
//!             "samplers": { "diffuse": "REPEAT_2D" },
//!             "tcmods": [ { "mode": "SCROLL", "uspeed": 0.1, "vspeed": 0.0 } ]
//!         }
//!     ]
//! }
//! ```

use super::{program_id, MaterialError, ProgramLoader, SamplerManager, TextureLoader};
use kiln_core::asset::{AssetHandle, Material, MaterialLayer, TexCoordMod, TextureBinding};
use kiln_core::renderer::{
    BlendFactor, CullMode, PolygonMode, RasterState, SamplerType, ShaderProgram, Texture,
    TextureKind,
};
use kiln_core::vfs::{self, FileSystem};
use kiln_data::{ResourceLoader, SharedCache};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::SystemTime;

const MATERIAL_EXTENSION: &str = "mat";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MaterialDocument {
    name: String,
    cullmode: Option<String>,
    polygonmode: Option<String>,
    blending: Option<BlendingDocument>,
    layers: Vec<LayerDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlendingDocument {
    src: Option<String>,
    dst: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LayerDocument {
    shaders: Option<ShadersDocument>,
    textures: HashMap<String, String>,
    samplers: HashMap<String, String>,
    tcmods: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShadersDocument {
    vs: Option<String>,
    fs: Option<String>,
}

/// Reads one `tcmods` entry.
///
/// Numeric fields default to `0.0`. Returns `None`, after a warning naming
/// `context`, for `TURB` and for unknown modes.
pub fn parse_tc_mod(entry: &Value, context: &str) -> Option<TexCoordMod> {
    let number = |key: &str| entry.get(key).and_then(Value::as_f64).unwrap_or(0.0) as f32;
    let mode = entry.get("mode").and_then(Value::as_str).unwrap_or_default();

    match mode {
        "SCALE" => Some(TexCoordMod::Scale {
            u: number("uscale"),
            v: number("vscale"),
        }),
        "SCROLL" => Some(TexCoordMod::Scroll {
            u_speed: number("uspeed"),
            v_speed: number("vspeed"),
        }),
        "ROTATE" => Some(TexCoordMod::Rotate {
            degrees_per_second: number("deg"),
        }),
        "MOVE" => Some(TexCoordMod::Move {
            u: number("umove"),
            v: number("vmove"),
        }),
        "TURB" => {
            log::warn!("MaterialLoader: tcmod '{mode}' in {context} not implemented yet");
            None
        }
        _ => {
            log::warn!("MaterialLoader: unknown tcmod '{mode}' in {context}");
            None
        }
    }
}

fn parse_raster(document: &MaterialDocument) -> RasterState {
    let cull_mode = document
        .cullmode
        .as_deref()
        .filter(|name| !name.is_empty())
        .and_then(CullMode::from_name);

    let polygon_mode = document
        .polygonmode
        .as_deref()
        .and_then(PolygonMode::from_name)
        .unwrap_or_default();

    let blend = document.blending.as_ref().and_then(|blending| {
        let src = blending.src.as_deref().and_then(BlendFactor::from_name)?;
        let dst = blending.dst.as_deref().and_then(BlendFactor::from_name)?;
        Some((src, dst))
    });

    RasterState {
        cull_mode,
        polygon_mode,
        blend,
    }
}

fn default_sampler(kind: TextureKind) -> SamplerType {
    match kind {
        TextureKind::Flat | TextureKind::Array => SamplerType::Repeat2D,
        TextureKind::Cube => SamplerType::RepeatCube,
    }
}

/// Builds materials, pulling programs and textures from their caches.
#[derive(Debug)]
pub struct MaterialLoader {
    fs: Rc<dyn FileSystem>,
    programs: SharedCache<ShaderProgram, ProgramLoader>,
    textures: SharedCache<Texture, TextureLoader>,
    samplers: Rc<SamplerManager>,
    dummy: AssetHandle<Material>,
}

impl MaterialLoader {
    /// A loader resolving dependencies through the given caches.
    ///
    /// `dummy` is the shared material handed out for materials that fail to
    /// load; a copy of it replaces a material whose reload fails.
    pub fn new(
        fs: Rc<dyn FileSystem>,
        programs: SharedCache<ShaderProgram, ProgramLoader>,
        textures: SharedCache<Texture, TextureLoader>,
        samplers: Rc<SamplerManager>,
        dummy: AssetHandle<Material>,
    ) -> Self {
        Self {
            fs,
            programs,
            textures,
            samplers,
            dummy,
        }
    }

    /// The shared dummy material.
    pub fn dummy(&self) -> &AssetHandle<Material> {
        &self.dummy
    }

    fn parse_layer(
        &self,
        path: &str,
        index: usize,
        document: &LayerDocument,
    ) -> Result<MaterialLayer, MaterialError> {
        let layer = index + 1;
        let missing_shader = |stage| MaterialError::MissingShader {
            path: path.to_string(),
            layer,
            stage,
        };

        let shaders = document.shaders.as_ref().ok_or_else(|| missing_shader("vertex"))?;
        let vertex = shaders.vs.as_deref().ok_or_else(|| missing_shader("vertex"))?;
        let fragment = shaders.fs.as_deref().ok_or_else(|| missing_shader("fragment"))?;

        let program = self.programs.borrow_mut().get(&program_id(vertex, fragment));
        let required = program.borrow().required_samplers().to_vec();

        let mut material_layer = MaterialLayer::new(program);

        if !required.is_empty() && document.textures.is_empty() {
            return Err(MaterialError::NoTextures {
                path: path.to_string(),
                layer,
            });
        }

        for sampler in &required {
            let Some(texture_path) = document.textures.get(&sampler.name) else {
                return Err(MaterialError::MissingTexture {
                    path: path.to_string(),
                    layer,
                    sampler: sampler.name.clone(),
                });
            };

            let texture = self.textures.borrow_mut().get(texture_path);
            let found = texture.borrow().kind();
            if let Some(expected) = sampler.ty.sampler_kind() {
                if expected != found {
                    return Err(MaterialError::TextureKindMismatch {
                        path: path.to_string(),
                        layer,
                        sampler: sampler.name.clone(),
                        expected,
                        found,
                    });
                }
            }

            let configured = document.samplers.get(&sampler.name).and_then(|name| {
                let configured = self.samplers.from_name(name);
                if configured.is_none() {
                    log::debug!(
                        "MaterialLoader: invalid sampler '{name}' specified for texture '{}' in layer '{layer}' of '{path}'",
                        sampler.name
                    );
                }
                configured
            });
            let sampler_object =
                configured.unwrap_or_else(|| self.samplers.from_type(default_sampler(found)));

            material_layer.textures.push(TextureBinding {
                location: sampler.location,
                name: sampler.name.clone(),
                texture,
                sampler: sampler_object,
            });
        }

        let context = format!("layer '{layer}' of '{path}'");
        material_layer.tc_mods = document
            .tcmods
            .iter()
            .filter_map(|entry| parse_tc_mod(entry, &context))
            .collect();

        Ok(material_layer)
    }
}

impl ResourceLoader<Material> for MaterialLoader {
    type Error = MaterialError;

    fn load(&self, id: &str) -> Result<Material, MaterialError> {
        if !self.fs.exists(id) {
            return Err(MaterialError::NotFound {
                path: id.to_string(),
            });
        }
        if vfs::extension(id) != MATERIAL_EXTENSION {
            return Err(MaterialError::NotAMaterial {
                path: id.to_string(),
            });
        }

        let definition = self.fs.read_to_string(id).map_err(|source| MaterialError::Io {
            path: id.to_string(),
            source,
        })?;
        let document: MaterialDocument =
            serde_json::from_str(&definition).map_err(|source| MaterialError::Json {
                path: id.to_string(),
                source,
            })?;

        if document.layers.is_empty() {
            return Err(MaterialError::NoLayers {
                path: id.to_string(),
            });
        }

        let mut material = Material::new(document.name.clone());
        material.raster = parse_raster(&document);
        material.layers = document
            .layers
            .iter()
            .enumerate()
            .map(|(index, layer)| self.parse_layer(id, index, layer))
            .collect::<Result<_, _>>()?;

        log::debug!(
            "MaterialLoader: loaded '{id}' with {} layer(s)",
            material.layers.len()
        );

        Ok(material)
    }

    /// The latest of the document's own time and its layers' shader times.
    ///
    /// A shader edit therefore re-resolves every material drawn with it.
    fn modified(&self, id: &str) -> Option<SystemTime> {
        let own = self.fs.modified(id)?;
        let Some(document) = self
            .fs
            .read_to_string(id)
            .ok()
            .and_then(|definition| serde_json::from_str::<MaterialDocument>(&definition).ok())
        else {
            return Some(own);
        };

        let latest = document
            .layers
            .iter()
            .filter_map(|layer| layer.shaders.as_ref())
            .flat_map(|shaders| [shaders.vs.as_deref(), shaders.fs.as_deref()])
            .flatten()
            .filter_map(|path| self.fs.modified(path))
            .fold(own, SystemTime::max);
        Some(latest)
    }

    fn placeholder(&self, _id: &str) -> Option<Material> {
        Some(self.dummy.borrow().clone())
    }

    /// Keeps the modifier clock running across reloads.
    fn reloaded(&self, previous: &Material, next: &mut Material) {
        next.set_time(previous.time());
    }
}

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

//! Materials: raster state plus an ordered stack of shaded, textured layers.

use super::{Asset, AssetHandle};
use crate::renderer::api::{RasterState, UniformValue};
use crate::renderer::resources::{Sampler, ShaderProgram, Texture};
use crate::renderer::traits::GraphicsDevice;
use glam::{Mat3, Vec2};
use std::rc::Rc;

/// Name of the material uniform that receives the composed texture-coordinate modifiers.
pub const TEX_COORD_MATRIX_UNIFORM: &str = "texCoordMatrix";

/// A texture-coordinate modifier, evaluated at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TexCoordMod {
    /// Multiplies the coordinates.
    Scale {
        /// Factor along U.
        u: f32,
        /// Factor along V.
        v: f32,
    },
    /// Translates the coordinates by speed times elapsed seconds.
    Scroll {
        /// Units per second along U.
        u_speed: f32,
        /// Units per second along V.
        v_speed: f32,
    },
    /// Rotates around the texture center.
    Rotate {
        /// Degrees per second.
        degrees_per_second: f32,
    },
    /// Translates the coordinates by a constant offset.
    Move {
        /// Offset along U.
        u: f32,
        /// Offset along V.
        v: f32,
    },
}

impl TexCoordMod {
    /// The homogeneous 2D transform of this modifier at `time` seconds.
    pub fn matrix(&self, time: f32) -> Mat3 {
        match *self {
            TexCoordMod::Scale { u, v } => Mat3::from_scale(Vec2::new(u, v)),
            TexCoordMod::Scroll { u_speed, v_speed } => {
                Mat3::from_translation(Vec2::new((u_speed * time).fract(), (v_speed * time).fract()))
            }
            TexCoordMod::Rotate { degrees_per_second } => {
                let center = Vec2::splat(0.5);
                Mat3::from_translation(center)
                    * Mat3::from_angle((degrees_per_second * time).to_radians())
                    * Mat3::from_translation(-center)
            }
            TexCoordMod::Move { u, v } => Mat3::from_translation(Vec2::new(u, v)),
        }
    }
}

/// A texture bound to one of the program's samplers.
#[derive(Debug, Clone)]
pub struct TextureBinding {
    /// Sampler uniform location.
    pub location: i32,
    /// Sampler uniform name.
    pub name: String,
    /// The bound texture.
    pub texture: AssetHandle<Texture>,
    /// The sampling configuration.
    pub sampler: Rc<Sampler>,
}

/// One shaded pass of a material.
#[derive(Debug, Clone)]
pub struct MaterialLayer {
    /// The program used to draw this layer.
    pub program: AssetHandle<ShaderProgram>,
    /// One binding per required sampler, in texture-unit order.
    pub textures: Vec<TextureBinding>,
    /// Texture-coordinate modifiers in declaration order.
    pub tc_mods: Vec<TexCoordMod>,
}

impl MaterialLayer {
    /// A layer drawn with `program` and no textures.
    pub fn new(program: AssetHandle<ShaderProgram>) -> Self {
        Self {
            program,
            textures: Vec::new(),
            tc_mods: Vec::new(),
        }
    }

    /// Composes every modifier, first declared applied first.
    pub fn tex_coord_matrix(&self, time: f32) -> Mat3 {
        self.tc_mods
            .iter()
            .fold(Mat3::IDENTITY, |acc, tc_mod| tc_mod.matrix(time) * acc)
    }
}

/// A named surface description.
#[derive(Debug, Clone)]
pub struct Material {
    /// The name from the material file.
    pub name: String,
    /// Culling, polygon mode, and blending.
    pub raster: RasterState,
    /// Layers in draw order.
    pub layers: Vec<MaterialLayer>,
    time: f32,
}

impl Material {
    /// An empty material with default raster state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raster: RasterState::default(),
            layers: Vec::new(),
            time: 0.0,
        }
    }

    /// Whether draws with this material go into the translucent queue.
    pub fn is_blended(&self) -> bool {
        self.raster.blend.is_some()
    }

    /// Seconds accumulated through [`Material::update`].
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances the modifier clock.
    pub fn update(&mut self, delta: f32) {
        self.time += delta;
    }

    /// Sets the modifier clock to `time` seconds.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// The program of the first layer, the one the renderer draws with.
    pub fn program(&self) -> Option<&AssetHandle<ShaderProgram>> {
        self.layers.first().map(|layer| &layer.program)
    }

    /// Applies raster state, binds textures to units, and uploads the
    /// material uniforms of the first layer. The layer's program must
    /// already be current.
    pub fn activate(&self, device: &dyn GraphicsDevice) {
        device.set_raster_state(&self.raster);

        let Some(layer) = self.layers.first() else {
            return;
        };

        for (unit, binding) in layer.textures.iter().enumerate() {
            device.bind_texture_unit(unit as u32, binding.texture.borrow().id(), binding.sampler.id());
            device.set_uniform(binding.location, &UniformValue::Int(unit as i32));
        }

        let program = layer.program.borrow();
        if let Some(location) = program.material_uniform_location(TEX_COORD_MATRIX_UNIFORM) {
            device.set_uniform(location, &UniformValue::Mat3(layer.tex_coord_matrix(self.time)));
        }
    }
}

impl Asset for Material {}

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

use kiln_core::renderer::{DeviceCapabilities, GraphicsDevice, InitError, Sampler, SamplerType};
use kiln_core::Settings;
use std::rc::Rc;

/// Owns one sampler object per [`SamplerType`].
#[derive(Debug)]
pub struct SamplerManager {
    samplers: Vec<Rc<Sampler>>,
    anisotropy: f32,
}

impl SamplerManager {
    /// Creates every sampler type with the configured anisotropy, clamped to
    /// the device limit.
    ///
    /// # Errors
    /// [`InitError::Resource`] if the device refuses a sampler.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        capabilities: &DeviceCapabilities,
        settings: &Settings,
    ) -> Result<Self, InitError> {
        let requested = settings.renderer.textures.anisotropic_level as f32;
        let anisotropy = requested.min(capabilities.max_anisotropy);

        let samplers = SamplerType::ALL
            .into_iter()
            .map(|ty| Sampler::new(device.clone(), ty, anisotropy).map(Rc::new))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "SamplerManager: created {} samplers, anisotropy {anisotropy}",
            samplers.len()
        );

        Ok(Self {
            samplers,
            anisotropy,
        })
    }

    /// The shared sampler of type `ty`.
    pub fn from_type(&self, ty: SamplerType) -> Rc<Sampler> {
        self.samplers[ty.index()].clone()
    }

    /// The shared sampler named `name` in material files, e.g. `REPEAT_2D`.
    pub fn from_name(&self, name: &str) -> Option<Rc<Sampler>> {
        SamplerType::from_name(name).map(|ty| self.from_type(ty))
    }

    /// The anisotropy every sampler was created with.
    pub fn anisotropy(&self) -> f32 {
        self.anisotropy
    }
}

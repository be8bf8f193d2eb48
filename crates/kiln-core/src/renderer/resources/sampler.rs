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

use crate::renderer::api::{SamplerId, SamplerType};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;
use std::rc::Rc;

/// A device sampler created from one of the fixed [`SamplerType`]s.
#[derive(Debug)]
pub struct Sampler {
    device: Rc<dyn GraphicsDevice>,
    id: SamplerId,
    ty: SamplerType,
}

impl Sampler {
    /// Creates the sampler object for `ty`.
    ///
    /// # Errors
    /// Returns the device error if the sampler cannot be created.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        ty: SamplerType,
        max_anisotropy: f32,
    ) -> Result<Self, ResourceError> {
        let id = device.create_sampler(&ty.descriptor(max_anisotropy))?;
        Ok(Self { device, id, ty })
    }

    /// The device id.
    pub fn id(&self) -> SamplerId {
        self.id
    }

    /// The configuration this sampler was built from.
    pub fn sampler_type(&self) -> SamplerType {
        self.ty
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if self.id.is_valid() {
            self.device.destroy_sampler(self.id);
        }
    }
}

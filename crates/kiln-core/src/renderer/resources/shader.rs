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
use crate::renderer::api::{ShaderId, ShaderStage};
use crate::renderer::traits::GraphicsDevice;
use std::rc::Rc;

/// A compiled shader stage.
#[derive(Debug)]
pub struct Shader {
    device: Rc<dyn GraphicsDevice>,
    id: ShaderId,
    stage: ShaderStage,
    placeholder: bool,
}

impl Shader {
    /// Wraps a shader object the device just compiled.
    pub fn from_compiled(device: Rc<dyn GraphicsDevice>, id: ShaderId, stage: ShaderStage) -> Self {
        Self {
            device,
            id,
            stage,
            placeholder: false,
        }
    }

    /// Flags this shader as the dummy for its stage.
    pub fn into_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// The device id.
    pub fn id(&self) -> ShaderId {
        self.id
    }

    /// The pipeline stage.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Whether this is a dummy standing in for a shader that failed to load.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Releases the device object and invalidates the id.
    pub fn reset(&mut self) {
        if self.id.is_valid() {
            self.device.destroy_shader(self.id);
        }
        self.id = ShaderId::INVALID;
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.reset();
    }
}

impl Asset for Shader {}

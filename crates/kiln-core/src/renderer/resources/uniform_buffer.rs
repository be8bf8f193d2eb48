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

use crate::renderer::api::BufferId;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;
use std::rc::Rc;

/// A fixed-size uniform block bound to an indexed binding point.
#[derive(Debug)]
pub struct UniformBuffer {
    device: Rc<dyn GraphicsDevice>,
    id: BufferId,
    binding: u32,
    size: usize,
}

impl UniformBuffer {
    /// Allocates `size` bytes at `binding`.
    ///
    /// # Errors
    /// Returns the device error if the buffer cannot be created.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        size: usize,
        binding: u32,
    ) -> Result<Self, ResourceError> {
        let id = device.create_uniform_buffer(size, binding)?;
        Ok(Self {
            device,
            id,
            binding,
            size,
        })
    }

    /// Writes `data` at `offset`. Writes past the end are truncated.
    pub fn write(&self, offset: usize, data: &[u8]) {
        if offset >= self.size {
            log::warn!(
                "UniformBuffer: write at offset {offset} outside buffer of {} bytes",
                self.size
            );
            return;
        }
        let len = data.len().min(self.size - offset);
        self.device.write_uniform_buffer(self.id, offset, &data[..len]);
    }

    /// The device id.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// The binding point.
    pub fn binding(&self) -> u32 {
        self.binding
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for UniformBuffer {
    fn drop(&mut self) {
        if self.id.is_valid() {
            self.device.destroy_uniform_buffer(self.id);
        }
    }
}

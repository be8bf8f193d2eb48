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
use crate::renderer::api::{MeshData, MeshId};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsDevice;
use glam::Vec3;
use std::rc::Rc;

/// Uploaded indexed geometry.
#[derive(Debug)]
pub struct Mesh {
    device: Rc<dyn GraphicsDevice>,
    id: MeshId,
    index_count: u32,
    bounding_radius_vector: Vec3,
}

impl Mesh {
    /// Uploads `data` and records its bounding extent.
    ///
    /// # Errors
    /// Returns [`ResourceError::InvalidData`] for geometry without indices,
    /// or the device error if the upload fails.
    pub fn new(device: Rc<dyn GraphicsDevice>, data: &MeshData) -> Result<Self, ResourceError> {
        if data.indices.is_empty() {
            return Err(ResourceError::InvalidData("mesh without indices".to_string()));
        }
        let id = device.create_mesh(data)?;
        Ok(Self {
            device,
            id,
            index_count: data.indices.len() as u32,
            bounding_radius_vector: data.bounding_radius_vector(),
        })
    }

    /// The device id.
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Number of indices drawn.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Per-axis extent of the geometry around its origin.
    pub fn bounding_radius_vector(&self) -> Vec3 {
        self.bounding_radius_vector
    }

    /// Makes this mesh the current vertex source.
    pub fn bind(&self) {
        self.device.bind_mesh(self.id);
    }

    /// Draws the bound mesh.
    pub fn draw(&self) {
        self.device.draw_indexed(self.index_count);
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if self.id.is_valid() {
            self.device.destroy_mesh(self.id);
        }
    }
}

impl Asset for Mesh {}

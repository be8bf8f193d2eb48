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

use crate::ecs::{Component, ComponentKind, SparseSet};
use crate::scene::Scene;
use kiln_core::asset::{AssetHandle, Material};
use kiln_core::renderer::Mesh;

/// Makes an entity drawable as an overlay in screen space.
///
/// GUI models are never culled and are drawn after the world.
#[derive(Debug, Clone)]
pub struct GuiModelComponent {
    /// The geometry, in pixels.
    pub mesh: AssetHandle<Mesh>,
    /// The surface.
    pub material: AssetHandle<Material>,
}

impl GuiModelComponent {
    /// Pairs a mesh with a material.
    pub fn new(mesh: AssetHandle<Mesh>, material: AssetHandle<Material>) -> Self {
        Self { mesh, material }
    }
}

impl Component for GuiModelComponent {
    const KIND: ComponentKind = ComponentKind::GuiModel;

    fn storage(scene: &Scene) -> &SparseSet<Self> {
        &scene.gui_models
    }

    fn storage_mut(scene: &mut Scene) -> &mut SparseSet<Self> {
        &mut scene.gui_models
    }
}

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

//! The scene the renderer draws: entities with transforms and components.

use crate::ecs::{
    CameraComponent, Component, ComponentKind, ComponentMask, EntityId, GuiModelComponent,
    ModelComponent, SparseSet,
};
use kiln_core::math::{Transform, Vec4};

#[derive(Debug, Clone)]
struct EntitySlot {
    generation: u32,
    alive: bool,
    transform: Transform,
    mask: ComponentMask,
}

/// A set of entities, at most one of which is the camera.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<EntitySlot>,
    free: Vec<u32>,
    pub(crate) cameras: SparseSet<CameraComponent>,
    pub(crate) models: SparseSet<ModelComponent>,
    pub(crate) gui_models: SparseSet<GuiModelComponent>,
    clear_color: Option<Vec4>,
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity at `transform` with no components.
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            slot.transform = transform;
            slot.mask = ComponentMask::EMPTY;
            return EntityId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(EntitySlot {
            generation: 0,
            alive: true,
            transform,
            mask: ComponentMask::EMPTY,
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    fn slot(&self, entity: EntityId) -> Option<&EntitySlot> {
        self.slots
            .get(entity.index as usize)
            .filter(|slot| slot.alive && slot.generation == entity.generation)
    }

    fn slot_mut(&mut self, entity: EntityId) -> Option<&mut EntitySlot> {
        self.slots
            .get_mut(entity.index as usize)
            .filter(|slot| slot.alive && slot.generation == entity.generation)
    }

    /// Removes `entity` and all its components.
    ///
    /// Returns `false` if the entity was already gone.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        let Some(slot) = self.slot_mut(entity) else {
            return false;
        };
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.mask = ComponentMask::EMPTY;
        self.free.push(entity.index);
        self.cameras.remove(entity);
        self.models.remove(entity);
        self.gui_models.remove(entity);
        true
    }

    /// Whether `entity` is alive.
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the scene has no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The transform of `entity`.
    pub fn transform(&self, entity: EntityId) -> Option<&Transform> {
        self.slot(entity).map(|slot| &slot.transform)
    }

    /// Mutable access to the transform of `entity`.
    pub fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.slot_mut(entity).map(|slot| &mut slot.transform)
    }

    /// The components `entity` carries.
    pub fn mask(&self, entity: EntityId) -> ComponentMask {
        self.slot(entity).map_or(ComponentMask::EMPTY, |slot| slot.mask)
    }

    /// Attaches `component` to `entity`, replacing any previous one.
    ///
    /// Attaching a camera moves the camera role to `entity`. Returns `false`
    /// if the entity is not alive.
    pub fn insert<C: Component>(&mut self, entity: EntityId, component: C) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        if C::KIND == ComponentKind::Camera {
            let previous: Vec<EntityId> = self
                .cameras
                .iter()
                .map(|(owner, _)| owner)
                .filter(|owner| *owner != entity)
                .collect();
            for owner in previous {
                log::debug!("Scene: camera moves from {owner:?} to {entity:?}");
                self.remove::<CameraComponent>(owner);
            }
        }

        C::storage_mut(self).insert(entity, component);
        if let Some(slot) = self.slot_mut(entity) {
            slot.mask.insert(C::KIND);
        }
        true
    }

    /// Detaches and returns the `C` of `entity`.
    pub fn remove<C: Component>(&mut self, entity: EntityId) -> Option<C> {
        let removed = C::storage_mut(self).remove(entity)?;
        if let Some(slot) = self.slot_mut(entity) {
            slot.mask.remove(C::KIND);
        }
        Some(removed)
    }

    /// The `C` of `entity`.
    pub fn get<C: Component>(&self, entity: EntityId) -> Option<&C> {
        C::storage(self).get(entity)
    }

    /// Mutable access to the `C` of `entity`.
    pub fn get_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut C> {
        C::storage_mut(self).get_mut(entity)
    }

    /// Live entities carrying every component in `required`, in index order.
    pub fn query(&self, required: ComponentMask) -> impl Iterator<Item = EntityId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, slot)| slot.alive && slot.mask.contains(required))
            .map(|(index, slot)| EntityId {
                index: index as u32,
                generation: slot.generation,
            })
    }

    /// The camera entity with its transform and projection.
    pub fn camera(&self) -> Option<(EntityId, &Transform, &CameraComponent)> {
        let (entity, camera) = self.cameras.iter().next()?;
        Some((entity, self.transform(entity)?, camera))
    }

    /// Every drawable entity with its transform and model.
    pub fn models(&self) -> impl Iterator<Item = (EntityId, &Transform, &ModelComponent)> + '_ {
        self.query(ComponentKind::Model.mask()).filter_map(move |entity| {
            Some((entity, self.transform(entity)?, self.models.get(entity)?))
        })
    }

    /// Every screen-space drawable entity with its transform and model.
    ///
    /// Transforms of these entities are in pixels, origin at the bottom left.
    pub fn gui_models(
        &self,
    ) -> impl Iterator<Item = (EntityId, &Transform, &GuiModelComponent)> + '_ {
        self.query(ComponentKind::GuiModel.mask()).filter_map(move |entity| {
            Some((entity, self.transform(entity)?, self.gui_models.get(entity)?))
        })
    }

    /// The color the frame is cleared to, if the scene overrides the default.
    pub fn clear_color(&self) -> Option<Vec4> {
        self.clear_color
    }

    /// Overrides the clear color.
    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = Some(color);
    }
}

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

use super::storage::SparseSet;
use crate::scene::Scene;
use std::ops::{BitAnd, BitOr};

/// The numeric kind of an optional component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ComponentKind {
    /// [`CameraComponent`](super::CameraComponent).
    Camera = 0,
    /// [`ModelComponent`](super::ModelComponent).
    Model = 1,
    /// [`GuiModelComponent`](super::GuiModelComponent).
    GuiModel = 2,
}

impl ComponentKind {
    /// The single-bit mask of this kind.
    pub const fn mask(self) -> ComponentMask {
        ComponentMask(1 << self as u32)
    }
}

/// A set of [`ComponentKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask(pub u64);

impl ComponentMask {
    /// No components.
    pub const EMPTY: Self = Self(0);

    /// Whether every kind in `required` is in `self`.
    pub fn contains(self, required: ComponentMask) -> bool {
        self.0 & required.0 == required.0
    }

    /// Adds `kind`.
    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= kind.mask().0;
    }

    /// Removes `kind`.
    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !kind.mask().0;
    }
}

impl From<ComponentKind> for ComponentMask {
    fn from(kind: ComponentKind) -> Self {
        kind.mask()
    }
}

impl BitOr for ComponentMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr for ComponentKind {
    type Output = ComponentMask;
    fn bitor(self, rhs: Self) -> ComponentMask {
        self.mask() | rhs.mask()
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// A type that can be attached to a scene entity.
///
/// Each implementation names its kind and where the scene keeps it.
pub trait Component: Sized + 'static {
    /// The kind bit of this component.
    const KIND: ComponentKind;

    /// The scene's storage for this component.
    fn storage(scene: &Scene) -> &SparseSet<Self>;

    /// Mutable access to the scene's storage for this component.
    fn storage_mut(scene: &mut Scene) -> &mut SparseSet<Self>;
}

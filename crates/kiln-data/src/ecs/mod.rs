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

//! A minimal sparse-set entity store.
//!
//! Every entity has a [`Transform`](kiln_core::math::Transform) and a
//! [`ComponentMask`] recording which optional components it carries. Each
//! component type lives in its own [`SparseSet`], and queries are bitmask
//! tests against the per-entity masks.

mod component;
mod components;
mod entity;
mod storage;

pub use component::{Component, ComponentKind, ComponentMask};
pub use components::*;
pub use entity::EntityId;
pub use storage::SparseSet;

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

//! Shared-ownership handles and the asset types that flow through the caches.

mod handle;
mod material;

pub use handle::AssetHandle;
pub use material::*;

/// A marker trait for any data that can be stored in a resource cache.
///
/// Resources are owned by the single render thread, so no `Send`/`Sync`
/// bound is required; the `'static` bound lets caches be stored in a
/// type-keyed registry.
///
/// # Examples
///
/// ```
/// use kiln_core::asset::Asset;
///
/// struct Sound {
///     samples: Vec<i16>,
/// }
///
/// impl Asset for Sound {}
/// ```
pub trait Asset: 'static {}

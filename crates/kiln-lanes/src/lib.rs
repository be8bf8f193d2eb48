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

//! Lanes: the hot-path work of the engine.
//!
//! [`asset_lane`] turns files into validated GPU resources, [`render_lane`]
//! turns a scene into sorted, state-diffed draw calls.

#![warn(missing_docs)]

pub mod asset_lane;
pub mod render_lane;

#[cfg(test)]
pub(crate) mod test_support;

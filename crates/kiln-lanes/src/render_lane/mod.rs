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

//! Rendering lanes: per-frame extraction, sorting, and submission.
//!
//! A frame flows through [`ExtractLane`], which culls the scene against the
//! camera and produces a [`RenderPackage`], then through [`SubmitLane`], which
//! turns the sorted package into device calls while skipping redundant state
//! changes.

mod extract_lane;
mod package;
mod submit_lane;
pub mod uniforms;

pub use extract_lane::*;
pub use package::*;
pub use submit_lane::*;

/// Counters collected while rendering one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Models that passed the frustum test.
    pub visible: usize,
    /// Models rejected by the frustum test.
    pub culled: usize,
    /// Draw calls issued.
    pub draws: usize,
    /// Times a program was made current.
    pub program_binds: usize,
    /// Times a material was activated.
    pub material_binds: usize,
    /// Times a mesh was bound.
    pub mesh_binds: usize,
}

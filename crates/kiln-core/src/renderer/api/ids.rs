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

//! Opaque device-side identifiers.
//!
//! Each id is a thin wrapper over the raw name the device hands out. The
//! value `0` never names a live object and is used as the "reset" state.

macro_rules! gpu_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// The id of an object that was never created or has been reset.
            pub const INVALID: Self = Self(0);

            /// Returns `true` unless this is [`Self::INVALID`].
            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

gpu_id!(
    /// A device texture object.
    TextureId
);
gpu_id!(
    /// A compiled shader stage.
    ShaderId
);
gpu_id!(
    /// A linked shader program.
    ProgramId
);
gpu_id!(
    /// A sampler object.
    SamplerId
);
gpu_id!(
    /// A buffer object, used for uniform blocks.
    BufferId
);
gpu_id!(
    /// A vertex array together with its vertex and index buffers.
    MeshId
);
gpu_id!(
    /// An off-screen framebuffer.
    FramebufferId
);

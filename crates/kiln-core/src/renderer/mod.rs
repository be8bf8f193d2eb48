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

//! The device abstraction, GPU resource descriptors, and renderer error types.

pub mod api;
pub mod capabilities;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod resources;
pub mod traits;

pub use self::api::*;
pub use self::capabilities::{DeviceCapabilities, REQUIRED_EXTENSIONS};
pub use self::error::{InitError, LoadError, ProgramError, ResourceError, ShaderError};
pub use self::resources::*;
pub use self::traits::GraphicsDevice;

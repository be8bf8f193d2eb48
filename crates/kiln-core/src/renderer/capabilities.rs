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

//! Start-up validation of the graphics device.

use super::error::InitError;
use super::traits::GraphicsDevice;
use std::collections::HashSet;

/// Extensions the renderer cannot run without.
pub const REQUIRED_EXTENSIONS: [&str; 5] = [
    "GL_EXT_texture_filter_anisotropic",
    "GL_ARB_shading_language_420pack",
    "GL_ARB_texture_storage",
    "GL_ARB_program_interface_query",
    "GL_ARB_direct_state_access",
];

/// Lets the device recommend internal texture formats.
pub const INTERNALFORMAT_QUERY2: &str = "GL_ARB_internalformat_query2";

/// Raw facts reported by a device, before validation.
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    /// `GL_VENDOR`.
    pub vendor: String,
    /// `GL_RENDERER`.
    pub renderer: String,
    /// `GL_VERSION`.
    pub version: String,
    /// Supported extension names.
    pub extensions: HashSet<String>,
    /// `GL_MAX_TEXTURE_SIZE`.
    pub max_texture_size: u32,
    /// `GL_MAX_CUBE_MAP_TEXTURE_SIZE`.
    pub max_cube_map_texture_size: u32,
    /// `GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS`.
    pub max_combined_texture_units: u32,
    /// `GL_MAX_TEXTURE_MAX_ANISOTROPY`.
    pub max_anisotropy: f32,
}

/// The validated limits every other subsystem sizes itself against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceCapabilities {
    /// Largest 2D or array texture edge.
    pub max_texture_size: u32,
    /// Largest cubemap face edge.
    pub max_cube_map_texture_size: u32,
    /// Texture units available to one program.
    pub max_combined_texture_units: u32,
    /// Largest anisotropic filtering level.
    pub max_anisotropy: f32,
    /// Whether [`GraphicsDevice::preferred_internal_format`] can be trusted.
    pub supports_internalformat_query2: bool,
}

impl DeviceCapabilities {
    /// Queries `device` and checks every entry of [`REQUIRED_EXTENSIONS`].
    ///
    /// # Errors
    /// Returns [`InitError::MissingExtension`] naming the first extension
    /// the device does not support.
    pub fn validate(device: &dyn GraphicsDevice) -> Result<Self, InitError> {
        let info = device.info();

        log::info!("DeviceCapabilities: vendor '{}'", info.vendor);
        log::info!("DeviceCapabilities: renderer '{}'", info.renderer);
        log::info!("DeviceCapabilities: version '{}'", info.version);

        for extension in REQUIRED_EXTENSIONS {
            if !info.extensions.contains(extension) {
                log::error!("DeviceCapabilities: extension '{extension}' is not supported");
                return Err(InitError::MissingExtension(extension.to_string()));
            }
        }

        let caps = Self {
            max_texture_size: info.max_texture_size,
            max_cube_map_texture_size: info.max_cube_map_texture_size,
            max_combined_texture_units: info.max_combined_texture_units,
            max_anisotropy: info.max_anisotropy,
            supports_internalformat_query2: info.extensions.contains(INTERNALFORMAT_QUERY2),
        };

        log::debug!("DeviceCapabilities: {caps:?}");

        Ok(caps)
    }
}

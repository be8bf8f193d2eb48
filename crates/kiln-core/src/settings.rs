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

//! User-facing engine settings.
//!
//! Every field has a default, so a settings file only needs to list what it
//! overrides.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Renderer configuration.
    pub renderer: RendererSettings,
}

/// Settings consumed by the renderer and its loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Output size.
    pub window: WindowSettings,
    /// Texture quality.
    pub textures: TextureSettings,
    /// Color the framebuffer is cleared to when the scene does not set one.
    pub clear_color: Vec4,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            textures: TextureSettings::default(),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Output size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Texture quality knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// How many times every image is halved before upload. Clamped by the loader.
    pub picmip: u32,
    /// Requested anisotropic filtering level. Clamped to the device limit.
    pub anisotropic_level: u32,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            picmip: 0,
            anisotropic_level: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "renderer": { "textures": { "picmip": 2 } } }"#).unwrap();
        assert_eq!(settings.renderer.textures.picmip, 2);
        assert_eq!(settings.renderer.textures.anisotropic_level, 16);
        assert_eq!(settings.renderer.window.width, 1280);
    }

    #[test]
    fn test_empty_document_is_default() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }
}

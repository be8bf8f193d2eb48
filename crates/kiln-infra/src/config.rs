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

//! Settings file loading.

use anyhow::{Context, Result};
use kiln_core::Settings;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the JSON settings document at `path`.
///
/// A missing file is not an error: the defaults are returned. Any other I/O
/// failure, or a malformed document, is.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            log::info!("Settings: '{}' not found, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(error) => {
            return Err(error).with_context(|| format!("reading '{}'", path.display()));
        }
    };

    let settings: Settings = serde_json::from_str(&text)
        .with_context(|| format!("parsing settings '{}'", path.display()))?;
    log::info!("Settings: loaded '{}'", path.display());
    log::debug!("Settings: {settings:?}");
    Ok(settings)
}

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

//! The read-only file system view the loaders work against.
//!
//! Asset identifiers are plain path strings relative to the file system root.
//! Loaders never touch `std::fs` directly, which lets tests substitute
//! in-memory or temporary-directory implementations.

use std::fmt::Debug;
use std::io;
use std::time::SystemTime;

/// Narrow, read-only access to asset files.
pub trait FileSystem: Debug {
    /// Whether `path` names an existing file.
    fn exists(&self, path: &str) -> bool;

    /// Reads a whole text file.
    fn read_to_string(&self, path: &str) -> io::Result<String>;

    /// Reads a whole binary file.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Last modification time, `None` if the file is missing or the platform
    /// does not record it.
    fn modified(&self, path: &str) -> Option<SystemTime>;

    /// The separator used in asset identifiers.
    fn dir_separator(&self) -> char {
        '/'
    }
}

/// Everything up to and including the last `separator` of `path`.
///
/// Returns an empty string for bare file names, so that joining the result
/// with a relative name yields that name unchanged.
pub fn parent_dir(path: &str, separator: char) -> &str {
    match path.rfind(separator) {
        Some(index) => &path[..=index],
        None => "",
    }
}

/// The text after the last `.` of the file name, without the dot.
pub fn extension(path: &str) -> &str {
    let name = path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path);
    match name.rfind('.') {
        Some(index) => &name[index + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir_keeps_trailing_separator() {
        assert_eq!(parent_dir("textures/sky/sky.cub", '/'), "textures/sky/");
        assert_eq!(parent_dir("sky.cub", '/'), "");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("textures/sky.cub"), "cub");
        assert_eq!(extension("shaders/base.vs.glsl"), "glsl");
        assert_eq!(extension("textures.v2/README"), "");
    }
}

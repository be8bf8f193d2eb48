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

//! Disk-backed [`FileSystem`].

use kiln_core::vfs::FileSystem;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Resolves asset identifiers against a base directory on disk.
#[derive(Debug, Clone)]
pub struct StdFileSystem {
    root: PathBuf,
}

impl StdFileSystem {
    /// Creates a file system rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The base directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }

    fn modified(&self, path: &str) -> Option<SystemTime> {
        fs::metadata(self.resolve(path))
            .and_then(|metadata| metadata.modified())
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_under_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("shaders")).unwrap();
        fs::write(dir.path().join("shaders/flat.fs.glsl"), "void main() {}").unwrap();
        let fs = StdFileSystem::new(dir.path());

        assert!(fs.exists("shaders/flat.fs.glsl"));
        assert!(!fs.exists("shaders"));
        assert_eq!(fs.read_to_string("shaders/flat.fs.glsl").unwrap(), "void main() {}");
        assert!(fs.modified("shaders/flat.fs.glsl").is_some());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = StdFileSystem::new(dir.path());

        assert!(!fs.exists("nope.mat"));
        assert!(fs.read("nope.mat").is_err());
        assert_eq!(fs.modified("nope.mat"), None);
    }
}

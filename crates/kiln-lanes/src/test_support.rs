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

//! Shared fixtures for the lane tests.

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use kiln_core::renderer::mock::MockGraphicsDevice;
use kiln_core::renderer::DeviceCapabilities;
use kiln_core::vfs::FileSystem;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// An in-memory file system with a manual clock.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RefCell<HashMap<String, (Vec<u8>, SystemTime)>>,
    clock: RefCell<u64>,
}

impl MemoryFileSystem {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Writes `contents` to `path` with a modification time later than every previous write.
    pub fn write(&self, path: &str, contents: impl Into<Vec<u8>>) {
        let mut clock = self.clock.borrow_mut();
        *clock += 1;
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(*clock);
        self.files
            .borrow_mut()
            .insert(path.to_string(), (contents.into(), modified));
    }

    pub fn remove(&self, path: &str) {
        self.files.borrow_mut().remove(path);
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }

    fn modified(&self, path: &str) -> Option<SystemTime> {
        self.files.borrow().get(path).map(|(_, modified)| *modified)
    }
}

/// A mock device and its validated capabilities.
pub fn mock_device() -> (Rc<MockGraphicsDevice>, DeviceCapabilities) {
    let device = Rc::new(MockGraphicsDevice::new());
    let caps = DeviceCapabilities::validate(device.as_ref()).unwrap();
    (device, caps)
}

/// PNG bytes of a solid image, RGBA when `alpha` is set.
pub fn png(width: u32, height: u32, alpha: bool) -> Vec<u8> {
    let image = if alpha {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 128])))
    } else {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30])))
    };
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

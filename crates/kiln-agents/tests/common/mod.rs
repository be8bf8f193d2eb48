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

//! Shared fixtures: a temporary asset directory, a mock device, and helpers
//! to build agents on top of them.

#![allow(dead_code)]

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use kiln_agents::{AssetAgent, RenderAgent};
use kiln_core::renderer::capabilities::DeviceInfo;
use kiln_core::renderer::mock::MockGraphicsDevice;
use kiln_core::renderer::{DeviceCapabilities, MeshData, Vertex};
use kiln_core::vfs::FileSystem;
use kiln_core::Settings;
use kiln_infra::StdFileSystem;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

pub const BASE_VS: &str =
    "void main() { gl_Position = modelViewProjectionMatrix * vec4( position, 1 ); }\n";
pub const PLAIN_FS: &str = "out vec4 color;\nvoid main() { color = vec4( 1 ); }\n";
pub const TEXTURED_FS: &str = "uniform sampler2D diffuse;
out vec4 color;
void main() { color = texture( diffuse, vec2( 0 ) ); }
";

/// A temporary asset root with a mock device.
pub struct TestAssets {
    pub dir: TempDir,
    pub device: Rc<MockGraphicsDevice>,
    pub capabilities: DeviceCapabilities,
    pub settings: Settings,
}

impl TestAssets {
    pub fn new() -> Result<Self> {
        Self::with_info(MockGraphicsDevice::default_info())
    }

    pub fn with_info(info: DeviceInfo) -> Result<Self> {
        let device = Rc::new(MockGraphicsDevice::with_info(info));
        let capabilities = DeviceCapabilities::validate(device.as_ref())?;
        Ok(Self {
            dir: tempfile::tempdir()?,
            device,
            capabilities,
            settings: Settings::default(),
        })
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.dir.path().join(path)
    }

    /// Writes `contents` to `path`, creating parent directories.
    pub fn write(&self, path: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let full = self.path(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, contents)?;
        Ok(())
    }

    /// Overwrites `path` and moves its modification time forward, so the
    /// change is seen even on file systems with coarse timestamps.
    pub fn rewrite(&self, path: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let full = self.path(path);
        let previous = fs::metadata(&full)?.modified()?;
        fs::write(&full, contents)?;
        fs::File::options()
            .write(true)
            .open(&full)?
            .set_modified(previous + Duration::from_secs(10))?;
        Ok(())
    }

    pub fn fs(&self) -> Rc<dyn FileSystem> {
        Rc::new(StdFileSystem::new(self.dir.path()))
    }

    pub fn asset_agent(&self) -> Result<AssetAgent> {
        Ok(AssetAgent::new(
            self.device.clone(),
            &self.capabilities,
            self.fs(),
            &self.settings,
            RenderAgent::uniform_block_sources(),
        )?)
    }

    pub fn render_agent(&self) -> Result<RenderAgent> {
        Ok(RenderAgent::new(
            self.device.clone(),
            &self.capabilities,
            &self.settings,
        )?)
    }

    /// The shaders every material in the tests draws with.
    pub fn write_shaders(&self) -> Result<()> {
        self.write("shaders/base.vs.glsl", BASE_VS)?;
        self.write("shaders/plain.fs.glsl", PLAIN_FS)?;
        self.write("shaders/textured.fs.glsl", TEXTURED_FS)
    }

    /// A single-layer material without textures.
    pub fn write_plain_material(&self, path: &str, translucent: bool) -> Result<()> {
        let blending = if translucent {
            r#", "blending": { "src": "SRC_ALPHA", "dst": "ONE_MINUS_SRC_ALPHA" }"#
        } else {
            ""
        };
        let document = format!(
            r#"{{ "name": "{path}", "cullmode": "BACK"{blending},
                 "layers": [ {{ "shaders": {{ "vs": "shaders/base.vs.glsl", "fs": "shaders/plain.fs.glsl" }} }} ] }}"#
        );
        self.write(path, document)
    }
}

/// PNG bytes of a solid image, RGBA when `alpha` is set.
pub fn png(width: u32, height: u32, alpha: bool) -> Vec<u8> {
    let image = if alpha {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 128])))
    } else {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40])))
    };
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encoding a PNG in memory");
    bytes.into_inner()
}

/// A unit triangle whose index buffer holds `index_count` indices, so draws
/// can be told apart by their count.
pub fn triangle(index_count: u32) -> MeshData {
    let corner = |x: f32, y: f32| Vertex {
        position: [x, y, 0.0],
        ..Default::default()
    };
    MeshData {
        vertices: vec![corner(-0.5, -0.5), corner(0.5, -0.5), corner(0.0, 0.5)],
        indices: (0..index_count).map(|i| i % 3).collect(),
    }
}

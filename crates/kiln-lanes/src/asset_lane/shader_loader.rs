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

use super::ShaderCompiler;
use kiln_core::renderer::{Shader, ShaderId, ShaderStage};
use kiln_core::vfs::FileSystem;
use kiln_data::ResourceLoader;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::SystemTime;

/// Loads `*.vs.glsl`, `*.gs.glsl`, and `*.fs.glsl` files.
///
/// Never fails: a missing or broken shader is replaced by the dummy of its
/// stage.
#[derive(Debug)]
pub struct ShaderLoader {
    fs: Rc<dyn FileSystem>,
    compiler: Rc<ShaderCompiler>,
}

impl ShaderLoader {
    /// A loader reading from `fs`.
    pub fn new(fs: Rc<dyn FileSystem>, compiler: Rc<ShaderCompiler>) -> Self {
        Self { fs, compiler }
    }

    /// The compiler shaders are built with.
    pub fn compiler(&self) -> &Rc<ShaderCompiler> {
        &self.compiler
    }

    fn dummy(&self, stage: ShaderStage) -> Shader {
        self.compiler.compile_dummy(stage).unwrap_or_else(|e| {
            log::error!("ShaderLoader: couldn't compile dummy {stage} shader: {e}");
            Shader::from_compiled(self.compiler.device().clone(), ShaderId::INVALID, stage)
                .into_placeholder()
        })
    }
}

impl ResourceLoader<Shader> for ShaderLoader {
    type Error = Infallible;

    fn load(&self, id: &str) -> Result<Shader, Infallible> {
        let stage = ShaderStage::from_path(id).unwrap_or_else(|| {
            log::warn!("ShaderLoader: can't tell the stage of '{id}', assuming fragment");
            ShaderStage::Fragment
        });

        if !self.fs.exists(id) {
            log::warn!("ShaderLoader: '{id}' does not exist");
            return Ok(self.dummy(stage));
        }

        let body = match self.fs.read_to_string(id) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("ShaderLoader: couldn't read '{id}': {e}");
                return Ok(self.dummy(stage));
            }
        };

        match self.compiler.compile(stage, &body) {
            Ok(shader) => {
                log::debug!("ShaderLoader: compiled '{id}'");
                Ok(shader)
            }
            Err(_) => {
                log::warn!("ShaderLoader: using dummy {stage} shader for '{id}'");
                Ok(self.dummy(stage))
            }
        }
    }

    fn modified(&self, id: &str) -> Option<SystemTime> {
        self.fs.modified(id)
    }
}

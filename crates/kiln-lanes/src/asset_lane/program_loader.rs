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

use super::{ProgramCompiler, ShaderCompiler, ShaderLoader};
use kiln_core::renderer::{ProgramId, ProgramInterface, Shader, ShaderProgram};
use kiln_core::vfs::FileSystem;
use kiln_data::{ResourceLoader, SharedCache};
use std::convert::Infallible;
use std::rc::Rc;
use std::time::SystemTime;

const SEPARATOR: char = '|';

/// The cache identifier of the program built from `vertex` and `fragment`.
pub fn program_id(vertex: &str, fragment: &str) -> String {
    format!("{vertex}{SEPARATOR}{fragment}")
}

/// Links programs identified by `"<vertex path>|<fragment path>"`.
///
/// Stages come from the shared shader cache, so a stage used by several
/// programs is compiled once.
#[derive(Debug)]
pub struct ProgramLoader {
    fs: Rc<dyn FileSystem>,
    shaders: SharedCache<Shader, ShaderLoader>,
    compiler: Rc<ProgramCompiler>,
    shader_compiler: Rc<ShaderCompiler>,
}

impl ProgramLoader {
    /// A loader pulling stages from `shaders`.
    pub fn new(
        fs: Rc<dyn FileSystem>,
        shaders: SharedCache<Shader, ShaderLoader>,
        compiler: Rc<ProgramCompiler>,
        shader_compiler: Rc<ShaderCompiler>,
    ) -> Self {
        Self {
            fs,
            shaders,
            compiler,
            shader_compiler,
        }
    }

    fn dummy(&self) -> ShaderProgram {
        self.compiler.link_dummy(&self.shader_compiler).unwrap_or_else(|e| {
            log::error!("ProgramLoader: couldn't link dummy program: {e}");
            ShaderProgram::from_linked(
                self.shader_compiler.device().clone(),
                ProgramId::INVALID,
                ProgramInterface::default(),
            )
            .into_placeholder()
        })
    }
}

impl ResourceLoader<ShaderProgram> for ProgramLoader {
    type Error = Infallible;

    fn load(&self, id: &str) -> Result<ShaderProgram, Infallible> {
        let Some((vertex_path, fragment_path)) = id.split_once(SEPARATOR) else {
            log::warn!("ProgramLoader: '{id}' is not a '<vertex>|<fragment>' pair");
            return Ok(self.dummy());
        };

        let (vertex, fragment) = {
            let mut shaders = self.shaders.borrow_mut();
            (shaders.get(vertex_path), shaders.get(fragment_path))
        };

        let linked = self
            .compiler
            .link(&vertex.borrow(), &fragment.borrow(), None);
        match linked {
            Ok(program) => Ok(program),
            Err(_) => {
                log::warn!("ProgramLoader: using dummy program for '{id}'");
                Ok(self.dummy())
            }
        }
    }

    fn modified(&self, id: &str) -> Option<SystemTime> {
        let (vertex, fragment) = id.split_once(SEPARATOR)?;
        match (self.fs.modified(vertex), self.fs.modified(fragment)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

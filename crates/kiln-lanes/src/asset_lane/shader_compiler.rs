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

//! GLSL source synthesis and stage compilation.
//!
//! Every shader body is compiled behind a generated preamble: the version
//! directive, the fixed vertex inputs (vertex stage only), the engine
//! uniforms, and the registered uniform blocks.

use kiln_core::renderer::{
    GraphicsDevice, InitError, Shader, ShaderError, ShaderStage, ALLOWED_ATTRIBUTES,
    ENGINE_UNIFORMS,
};
use std::fmt::Write;
use std::rc::Rc;

const VERSION_DIRECTIVE: &str = "#version 430\n";

const DUMMY_VERTEX_BODY: &str = "
void main()
{
	gl_Position = modelViewProjectionMatrix * vec4( position, 1 );
}
";

const DUMMY_GEOMETRY_BODY: &str = "
layout( points ) in;
layout( points, max_vertices = 1 ) out;
void main()
{
	gl_Position = gl_in[ 0 ].gl_Position;
	EmitVertex();

	EndPrimitive();
}
";

const DUMMY_FRAGMENT_BODY: &str = "
out vec4 color;
void main()
{
	color = vec4( 1, 0, 1, 1 ).rgba;
}
";

/// The body of the built-in dummy shader for `stage`.
///
/// The vertex dummy transforms `position` by `modelViewProjectionMatrix`,
/// the geometry dummy passes its first vertex through, and the fragment
/// dummy writes magenta.
pub fn dummy_body(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => DUMMY_VERTEX_BODY,
        ShaderStage::Geometry => DUMMY_GEOMETRY_BODY,
        ShaderStage::Fragment => DUMMY_FRAGMENT_BODY,
    }
}

/// Compiles shader bodies behind the engine preamble.
#[derive(Debug)]
pub struct ShaderCompiler {
    device: Rc<dyn GraphicsDevice>,
    uniform_blocks: Vec<String>,
    dummy_vertex: Shader,
    dummy_geometry: Shader,
    dummy_fragment: Shader,
}

impl ShaderCompiler {
    /// Creates the compiler and compiles the three dummy shaders.
    ///
    /// # Errors
    /// [`InitError::DummyShader`] if any dummy fails to compile.
    pub fn new(device: Rc<dyn GraphicsDevice>, uniform_blocks: Vec<String>) -> Result<Self, InitError> {
        let compile = |stage: ShaderStage| {
            let source = synthesize(&uniform_blocks, stage, dummy_body(stage));
            let id = device.compile_shader(stage, &source).map_err(|e| {
                log::error!("ShaderCompiler: couldn't create dummy {stage} shader");
                InitError::DummyShader(e)
            })?;
            Ok::<_, InitError>(Shader::from_compiled(device.clone(), id, stage).into_placeholder())
        };

        let dummy_vertex = compile(ShaderStage::Vertex)?;
        let dummy_geometry = compile(ShaderStage::Geometry)?;
        let dummy_fragment = compile(ShaderStage::Fragment)?;

        log::info!(
            "ShaderCompiler: initialized with {} uniform block(s)",
            uniform_blocks.len()
        );

        Ok(Self {
            device,
            uniform_blocks,
            dummy_vertex,
            dummy_geometry,
            dummy_fragment,
        })
    }

    /// The device shaders are compiled on.
    pub fn device(&self) -> &Rc<dyn GraphicsDevice> {
        &self.device
    }

    /// Adds a uniform block declaration to every later compilation.
    pub fn register_uniform_block(&mut self, source: impl Into<String>) {
        self.uniform_blocks.push(source.into());
    }

    /// The registered uniform block declarations.
    pub fn uniform_blocks(&self) -> &[String] {
        &self.uniform_blocks
    }

    /// The complete source compiled for `body` at `stage`.
    pub fn synthesize(&self, stage: ShaderStage, body: &str) -> String {
        synthesize(&self.uniform_blocks, stage, body)
    }

    /// Compiles `body` for `stage`.
    ///
    /// # Errors
    /// The device's [`ShaderError`]; the compiler log is also written at
    /// warning level.
    pub fn compile(&self, stage: ShaderStage, body: &str) -> Result<Shader, ShaderError> {
        let source = self.synthesize(stage, body);
        match self.device.compile_shader(stage, &source) {
            Ok(id) => Ok(Shader::from_compiled(self.device.clone(), id, stage)),
            Err(e) => {
                log::warn!("ShaderCompiler: error compiling {stage} shader: {e}");
                Err(e)
            }
        }
    }

    /// Compiles a fresh copy of the dummy shader for `stage`.
    ///
    /// # Errors
    /// The device's [`ShaderError`].
    pub fn compile_dummy(&self, stage: ShaderStage) -> Result<Shader, ShaderError> {
        self.compile(stage, dummy_body(stage))
            .map(Shader::into_placeholder)
    }

    /// The dummy shader compiled at start-up for `stage`.
    pub fn dummy(&self, stage: ShaderStage) -> &Shader {
        match stage {
            ShaderStage::Vertex => &self.dummy_vertex,
            ShaderStage::Geometry => &self.dummy_geometry,
            ShaderStage::Fragment => &self.dummy_fragment,
        }
    }
}

fn synthesize(uniform_blocks: &[String], stage: ShaderStage, body: &str) -> String {
    let mut source = String::from(VERSION_DIRECTIVE);

    if stage == ShaderStage::Vertex {
        source.push('\n');
        for (attribute, interface) in ALLOWED_ATTRIBUTES {
            // Writing into a String cannot fail.
            let _ = writeln!(
                source,
                "layout( location = {} ) in {} {};",
                attribute.location(),
                interface.ty.glsl_name(),
                interface.name
            );
        }
    }

    source.push('\n');
    for (_, interface) in ENGINE_UNIFORMS {
        let _ = writeln!(source, "uniform {} {};", interface.ty.glsl_name(), interface.name);
    }

    if !uniform_blocks.is_empty() {
        source.push('\n');
        for block in uniform_blocks {
            source.push_str(block);
            source.push('\n');
        }
    }

    source.push('\n');
    source.push_str(body);
    source
}

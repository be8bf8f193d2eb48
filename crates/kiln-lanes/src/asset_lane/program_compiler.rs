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

//! Program linking and interface classification.

use super::ShaderCompiler;
use kiln_core::renderer::{
    ActiveAttribute, ActiveUniform, DeviceCapabilities, EngineUniform, GraphicsDevice,
    ProgramError, ProgramInterface, RequiredUniform, Shader, ShaderProgram, ShaderStage,
    VertexAttribute,
};
use std::rc::Rc;

/// Sorts a program's active inputs and uniforms into the engine's contract.
///
/// * Attributes must sit at a location of the fixed table with the exact name
///   and type listed there. Built-in inputs (`gl_*`) are ignored.
/// * Uniforms inside a block are skipped.
/// * Sampler uniforms become required samplers, at most `max_samplers`.
/// * Scalar, vector, and matrix uniforms are engine uniforms when their name
///   is in the engine table (the type must match) and material uniforms
///   otherwise.
/// * Any other uniform type is rejected.
///
/// # Errors
/// The first violation found.
pub fn classify_interface(
    attributes: &[ActiveAttribute],
    uniforms: &[ActiveUniform],
    max_samplers: usize,
) -> Result<ProgramInterface, ProgramError> {
    let mut interface = ProgramInterface::default();

    for attribute in attributes {
        if attribute.name.starts_with("gl_") {
            continue;
        }
        let Some(allowed) = VertexAttribute::from_location(attribute.location) else {
            return Err(ProgramError::AttributeLocationNotAllowed {
                name: attribute.name.clone(),
                location: attribute.location,
            });
        };
        let expected = allowed.interface();
        if expected.name != attribute.name || expected.ty != attribute.ty {
            return Err(ProgramError::AttributeMismatch {
                name: attribute.name.clone(),
                ty: attribute.ty,
                location: attribute.location,
            });
        }
        interface.attributes.push(allowed);
    }

    for uniform in uniforms.iter().filter(|u| u.block_index < 0) {
        let required = RequiredUniform {
            location: uniform.location,
            name: uniform.name.clone(),
            ty: uniform.ty,
        };

        if uniform.ty.sampler_kind().is_some() {
            interface.samplers.push(required);
            if interface.samplers.len() > max_samplers {
                return Err(ProgramError::TooManySamplers {
                    count: interface.samplers.len(),
                    max: max_samplers,
                });
            }
        } else if uniform.ty.is_plain_data() {
            match EngineUniform::from_name(&uniform.name) {
                Some((_, expected)) if expected.ty != uniform.ty => {
                    return Err(ProgramError::EngineUniformType {
                        name: uniform.name.clone(),
                        expected: expected.ty,
                        found: uniform.ty,
                    });
                }
                Some((engine, _)) => interface.engine_uniforms.push((uniform.location, engine)),
                None => interface.material_uniforms.push(required),
            }
        } else {
            return Err(ProgramError::UnsupportedUniform {
                name: uniform.name.clone(),
                ty: uniform.ty,
            });
        }
    }

    Ok(interface)
}

/// Links shaders into programs and validates their interface.
#[derive(Debug)]
pub struct ProgramCompiler {
    device: Rc<dyn GraphicsDevice>,
    max_samplers: usize,
}

impl ProgramCompiler {
    /// A compiler limited to the device's combined texture units.
    pub fn new(device: Rc<dyn GraphicsDevice>, capabilities: &DeviceCapabilities) -> Self {
        Self {
            device,
            max_samplers: capabilities.max_combined_texture_units as usize,
        }
    }

    /// The sampler budget of one program.
    pub fn max_samplers(&self) -> usize {
        self.max_samplers
    }

    /// Links `vertex`, `fragment`, and optionally `geometry`.
    ///
    /// # Errors
    /// The link log, or the first interface violation found by
    /// [`classify_interface`]. The device program is destroyed before an
    /// interface error is returned.
    pub fn link(
        &self,
        vertex: &Shader,
        fragment: &Shader,
        geometry: Option<&Shader>,
    ) -> Result<ShaderProgram, ProgramError> {
        let mut shaders = vec![vertex.id(), fragment.id()];
        shaders.extend(geometry.map(Shader::id));

        let id = self.device.link_program(&shaders).map_err(|e| {
            log::warn!("ProgramCompiler: {e}");
            e
        })?;

        let attributes = self.device.active_attributes(id);
        let uniforms = self.device.active_uniforms(id);
        match classify_interface(&attributes, &uniforms, self.max_samplers) {
            Ok(interface) => {
                log::debug!(
                    "ProgramCompiler: linked program {} ({} engine, {} material uniforms, {} samplers)",
                    id.0,
                    interface.engine_uniforms.len(),
                    interface.material_uniforms.len(),
                    interface.samplers.len()
                );
                Ok(ShaderProgram::from_linked(self.device.clone(), id, interface))
            }
            Err(e) => {
                log::error!("ProgramCompiler: {e}");
                self.device.destroy_program(id);
                Err(e)
            }
        }
    }

    /// Links the dummy vertex and fragment shaders of `shaders`.
    ///
    /// # Errors
    /// As [`ProgramCompiler::link`].
    pub fn link_dummy(&self, shaders: &ShaderCompiler) -> Result<ShaderProgram, ProgramError> {
        self.link(
            shaders.dummy(ShaderStage::Vertex),
            shaders.dummy(ShaderStage::Fragment),
            None,
        )
        .map(ShaderProgram::into_placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::renderer::mock::{DeviceCall, MockGraphicsDevice};
    use kiln_core::renderer::GlslType;

    fn attribute(name: &str, location: i32, ty: GlslType) -> ActiveAttribute {
        ActiveAttribute {
            name: name.to_string(),
            location,
            ty,
        }
    }

    fn uniform(name: &str, location: i32, ty: GlslType) -> ActiveUniform {
        ActiveUniform {
            name: name.to_string(),
            location,
            ty,
            block_index: -1,
        }
    }

    #[test]
    fn test_attribute_at_unknown_location_is_rejected() {
        let result = classify_interface(&[attribute("position", 9, GlslType::Vec3)], &[], 16);
        assert!(matches!(
            result,
            Err(ProgramError::AttributeLocationNotAllowed { location: 9, .. })
        ));
    }

    #[test]
    fn test_attribute_with_wrong_name_or_type_is_rejected() {
        let wrong_name = classify_interface(&[attribute("pos", 0, GlslType::Vec3)], &[], 16);
        let wrong_type = classify_interface(&[attribute("position", 0, GlslType::Vec4)], &[], 16);
        assert!(matches!(wrong_name, Err(ProgramError::AttributeMismatch { .. })));
        assert!(matches!(wrong_type, Err(ProgramError::AttributeMismatch { .. })));
    }

    #[test]
    fn test_uniforms_are_classified() {
        let mut block_member = uniform("Camera.position", -1, GlslType::Vec3);
        block_member.block_index = 0;
        let uniforms = [
            uniform("modelViewProjectionMatrix", 0, GlslType::Mat4),
            block_member,
            uniform("tint", 1, GlslType::Vec4),
            uniform("diffuse", 2, GlslType::Sampler2D),
            uniform("sky", 3, GlslType::SamplerCube),
        ];

        let interface = classify_interface(&[attribute("position", 0, GlslType::Vec3)], &uniforms, 16).unwrap();

        assert_eq!(interface.attributes, vec![VertexAttribute::Position]);
        assert_eq!(interface.engine_uniforms, vec![(0, EngineUniform::ModelViewProjectionMatrix)]);
        assert_eq!(interface.material_uniforms.len(), 1);
        assert_eq!(interface.material_uniforms[0].name, "tint");
        let samplers: Vec<&str> = interface.samplers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(samplers, vec!["diffuse", "sky"]);
    }

    #[test]
    fn test_engine_uniform_with_wrong_type_is_rejected() {
        let result = classify_interface(&[], &[uniform("modelMatrix", 0, GlslType::Mat3)], 16);
        assert!(matches!(
            result,
            Err(ProgramError::EngineUniformType {
                expected: GlslType::Mat4,
                found: GlslType::Mat3,
                ..
            })
        ));
    }

    #[test]
    fn test_sampler_budget() {
        let uniforms: Vec<ActiveUniform> = (0..3)
            .map(|i| uniform(&format!("t{i}"), i, GlslType::Sampler2D))
            .collect();

        assert!(classify_interface(&[], &uniforms[..2], 2).is_ok());
        assert!(matches!(
            classify_interface(&[], &uniforms, 2),
            Err(ProgramError::TooManySamplers { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_unsupported_uniform_type_is_rejected() {
        let result = classify_interface(&[], &[uniform("flag", 0, GlslType::Unsupported(0x8B56))], 16);
        assert!(matches!(result, Err(ProgramError::UnsupportedUniform { .. })));
    }

    #[test]
    fn test_rejected_program_is_destroyed() {
        let device = Rc::new(MockGraphicsDevice::new());
        let shaders = ShaderCompiler::new(device.clone(), Vec::new()).unwrap();
        let caps = DeviceCapabilities::validate(device.as_ref()).unwrap();
        let programs = ProgramCompiler::new(device.clone(), &caps);

        let vertex = shaders
            .compile(ShaderStage::Vertex, "void main() { gl_Position = vec4( position, 1 ); }")
            .unwrap();
        let fragment = shaders
            .compile(
                ShaderStage::Fragment,
                "uniform bool flag;\nout vec4 color;\nvoid main() { color = vec4( flag ); }",
            )
            .unwrap();

        let result = programs.link(&vertex, &fragment, None);

        assert!(matches!(result, Err(ProgramError::UnsupportedUniform { .. })));
        assert_eq!(device.live_programs(), 0);
        assert_eq!(device.count_calls(|c| matches!(c, DeviceCall::DestroyProgram(_))), 1);
    }

    #[test]
    fn test_dummy_program_links() {
        let device = Rc::new(MockGraphicsDevice::new());
        let shaders = ShaderCompiler::new(device.clone(), Vec::new()).unwrap();
        let caps = DeviceCapabilities::validate(device.as_ref()).unwrap();

        let dummy = ProgramCompiler::new(device.clone(), &caps).link_dummy(&shaders).unwrap();

        assert!(dummy.is_placeholder());
        assert_eq!(dummy.required_attributes(), &[VertexAttribute::Position]);
        assert_eq!(
            dummy.required_engine_uniforms(),
            &[(0, EngineUniform::ModelViewProjectionMatrix)]
        );
        assert!(dummy.required_samplers().is_empty());
    }
}

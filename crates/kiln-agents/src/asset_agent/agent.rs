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

use std::rc::Rc;

use kiln_core::asset::{AssetHandle, Material, MaterialLayer};
use kiln_core::renderer::{
    DeviceCapabilities, GraphicsDevice, InitError, Mesh, MeshData, ResourceError, Shader,
    ShaderProgram, Texture,
};
use kiln_core::vfs::FileSystem;
use kiln_core::Settings;
use kiln_data::{CacheRegistry, ResourceCache, SharedCache};
use kiln_lanes::asset_lane::{
    program_id, MaterialLoader, ProgramCompiler, ProgramLoader, SamplerManager, ShaderCompiler,
    ShaderLoader, TextureLoader,
};

const DUMMY_MATERIAL_NAME: &str = "dummy";

/// Owns the resource caches and the fallbacks handed out when loads fail.
pub struct AssetAgent {
    device: Rc<dyn GraphicsDevice>,
    registry: CacheRegistry,
    shaders: SharedCache<Shader, ShaderLoader>,
    textures: SharedCache<Texture, TextureLoader>,
    programs: SharedCache<ShaderProgram, ProgramLoader>,
    materials: SharedCache<Material, MaterialLoader>,
    shader_compiler: Rc<ShaderCompiler>,
    program_compiler: Rc<ProgramCompiler>,
    samplers: Rc<SamplerManager>,
    dummy_program: AssetHandle<ShaderProgram>,
    dummy_material: AssetHandle<Material>,
}

impl AssetAgent {
    /// Builds the compilers, the sampler set, the dummies, and one cache per
    /// resource type.
    ///
    /// `uniform_blocks` are the GLSL declarations prepended to every shader;
    /// they must be known before the first compilation, dummies included.
    ///
    /// # Errors
    /// Any [`InitError`]: a dummy shader or program that does not build, a
    /// sampler the device refuses, or a cache registered twice.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        capabilities: &DeviceCapabilities,
        fs: Rc<dyn FileSystem>,
        settings: &Settings,
        uniform_blocks: Vec<String>,
    ) -> Result<Self, InitError> {
        let shader_compiler = Rc::new(ShaderCompiler::new(device.clone(), uniform_blocks)?);
        let program_compiler = Rc::new(ProgramCompiler::new(device.clone(), capabilities));
        let samplers = Rc::new(SamplerManager::new(device.clone(), capabilities, settings)?);

        let dummy_program = program_compiler
            .link_dummy(&shader_compiler)
            .map_err(InitError::DummyProgram)?;
        let dummy_program = AssetHandle::new(dummy_program);
        let mut dummy_material = Material::new(DUMMY_MATERIAL_NAME);
        dummy_material
            .layers
            .push(MaterialLayer::new(dummy_program.clone()));
        let dummy_material = AssetHandle::new(dummy_material);

        // Dependencies first: reload walks this order, collection the reverse.
        let mut registry = CacheRegistry::new();
        let shader_loader = ShaderLoader::new(fs.clone(), shader_compiler.clone());
        let shaders: SharedCache<Shader, ShaderLoader> =
            registry.register(ResourceCache::new(shader_loader))?;

        let texture_loader = TextureLoader::new(device.clone(), fs.clone(), capabilities, settings);
        let textures: SharedCache<Texture, TextureLoader> =
            registry.register(ResourceCache::new(texture_loader))?;

        let program_loader = ProgramLoader::new(
            fs.clone(),
            shaders.clone(),
            program_compiler.clone(),
            shader_compiler.clone(),
        );
        let programs: SharedCache<ShaderProgram, ProgramLoader> =
            registry.register(ResourceCache::new(program_loader))?;

        let material_loader = MaterialLoader::new(
            fs,
            programs.clone(),
            textures.clone(),
            samplers.clone(),
            dummy_material.clone(),
        );
        let materials: SharedCache<Material, MaterialLoader> =
            registry.register(ResourceCache::new(material_loader))?;

        log::info!("AssetAgent: initialized");

        Ok(Self {
            device,
            registry,
            shaders,
            textures,
            programs,
            materials,
            shader_compiler,
            program_compiler,
            samplers,
            dummy_program,
            dummy_material,
        })
    }

    /// The shader at `path`, compiled on first use.
    ///
    /// Never fails: a missing or broken shader yields the dummy of its stage.
    pub fn shader(&self, path: &str) -> AssetHandle<Shader> {
        self.shaders.borrow_mut().get(path)
    }

    /// The texture at `path`, uploaded on first use.
    ///
    /// Never fails: a missing or broken texture yields the checkerboard.
    pub fn texture(&self, path: &str) -> AssetHandle<Texture> {
        self.textures.borrow_mut().get(path)
    }

    /// The program linking `vertex` and `fragment`, built on first use.
    ///
    /// Never fails: a program that does not link or validate yields the
    /// dummy program.
    pub fn program(&self, vertex: &str, fragment: &str) -> AssetHandle<ShaderProgram> {
        self.programs.borrow_mut().get(&program_id(vertex, fragment))
    }

    /// The material at `path`, loaded on first use.
    ///
    /// A material that cannot be loaded is not cached; the shared dummy
    /// material is returned instead, the same handle every time.
    pub fn material(&self, path: &str) -> AssetHandle<Material> {
        match self.materials.borrow_mut().try_get(path) {
            Ok(material) => material,
            Err(e) => {
                log::warn!("AssetAgent: {e}, using dummy material");
                self.dummy_material.clone()
            }
        }
    }

    /// Uploads `data` as a new mesh.
    ///
    /// Meshes are not file-backed, so they bypass the caches and are
    /// released when the last handle drops.
    ///
    /// # Errors
    /// The device [`ResourceError`].
    pub fn create_mesh(&self, data: &MeshData) -> Result<AssetHandle<Mesh>, ResourceError> {
        Mesh::new(self.device.clone(), data).map(AssetHandle::new)
    }

    /// Advances the clock of every cached material by `delta` seconds.
    pub fn update(&self, delta: f32) {
        self.materials
            .borrow_mut()
            .for_each_mut(|_, material| material.update(delta));
    }

    /// Releases every resource nothing outside the caches refers to.
    ///
    /// Returns how many resources were released.
    pub fn collect_garbage(&self) -> usize {
        self.registry.collect_garbage_all()
    }

    /// Reloads every resource whose source file changed.
    ///
    /// Returns how many resources changed contents.
    pub fn reload(&self) -> usize {
        self.registry.reload_all()
    }

    /// Number of resources held across all caches.
    pub fn resource_count(&self) -> usize {
        self.registry.resource_count()
    }

    /// The shared fallback material.
    pub fn dummy_material(&self) -> &AssetHandle<Material> {
        &self.dummy_material
    }

    /// The shared fallback program.
    pub fn dummy_program(&self) -> &AssetHandle<ShaderProgram> {
        &self.dummy_program
    }

    /// The sampler set.
    pub fn samplers(&self) -> &Rc<SamplerManager> {
        &self.samplers
    }

    /// The shader compiler, with the uniform blocks it was created with.
    pub fn shader_compiler(&self) -> &Rc<ShaderCompiler> {
        &self.shader_compiler
    }

    /// The program compiler.
    pub fn program_compiler(&self) -> &Rc<ProgramCompiler> {
        &self.program_compiler
    }
}

impl std::fmt::Debug for AssetAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetAgent")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

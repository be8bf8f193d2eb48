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

//! Material documents resolved through the asset agent, and the program
//! contracts they depend on.

mod common;

use anyhow::Result;
use common::{png, TestAssets, BASE_VS};
use kiln_core::renderer::{CullMode, PolygonMode, SamplerType, TextureKind};

const SKY_FS: &str = "uniform samplerCube sky;
out vec4 color;
void main() { color = texture( sky, vec3( 0 ) ); }
";

fn textured_material(texture: &str) -> String {
    format!(
        r#"{{
            "name": "textured",
            "cullmode": "BACK",
            "polygonmode": "LINE",
            "layers": [
                {{
                    "shaders": {{ "vs": "shaders/base.vs.glsl", "fs": "shaders/textured.fs.glsl" }},
                    "textures": {{ "diffuse": "{texture}" }},
                    "samplers": {{ "diffuse": "EDGE_2D" }},
                    "tcmods": [ {{ "mode": "SCROLL", "uspeed": 0.5, "vspeed": 0.0 }}, {{ "mode": "TURB" }} ]
                }},
                {{
                    "shaders": {{ "vs": "shaders/base.vs.glsl", "fs": "shaders/plain.fs.glsl" }}
                }}
            ]
        }}"#
    )
}

fn write_sky(assets: &TestAssets) -> Result<()> {
    let faces = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];
    for face in faces {
        assets.write(&format!("textures/sky/{face}"), png(4, 4, false))?;
    }
    assets.write(
        "textures/sky/sky.cub",
        r#"{ "faces": ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"] }"#,
    )
}

#[test]
fn test_material_document_is_resolved() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    assets.write("textures/rock.png", png(8, 8, false))?;
    assets.write("materials/rock.mat", textured_material("textures/rock.png"))?;
    let agent = assets.asset_agent()?;

    // --- ACT ---
    let material = agent.material("materials/rock.mat");

    // --- ASSERT ---
    let material = material.borrow();
    assert_eq!(material.name, "textured");
    assert_eq!(material.raster.cull_mode, Some(CullMode::Back));
    assert_eq!(material.raster.polygon_mode, PolygonMode::Line);
    assert!(!material.is_blended());
    assert_eq!(material.layers.len(), 2);

    let layer = &material.layers[0];
    assert_eq!(layer.textures.len(), 1);
    assert_eq!(layer.textures[0].name, "diffuse");
    assert_eq!(layer.textures[0].sampler.sampler_type(), SamplerType::Edge2D);
    // TURB is dropped with a warning.
    assert_eq!(layer.tc_mods.len(), 1);
    assert!(layer.program.ptr_eq(&agent.program("shaders/base.vs.glsl", "shaders/textured.fs.glsl")));
    assert!(material.layers[1].textures.is_empty());
    Ok(())
}

#[test]
fn test_unusable_materials_share_the_dummy() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    assets.write("textures/rock.png", png(8, 8, false))?;
    assets.write("materials/broken.mat", "{ \"layers\": [ ")?;
    assets.write("materials/empty.mat", r#"{ "name": "empty", "layers": [] }"#)?;
    assets.write(
        "materials/untextured.mat",
        r#"{ "layers": [ { "shaders": { "vs": "shaders/base.vs.glsl", "fs": "shaders/textured.fs.glsl" } } ] }"#,
    )?;
    let agent = assets.asset_agent()?;
    let requests = [
        "materials/missing.mat",
        "textures/rock.png",
        "materials/broken.mat",
        "materials/empty.mat",
        "materials/untextured.mat",
    ];

    // --- ACT ---
    let materials: Vec<_> = requests.iter().map(|path| agent.material(path)).collect();

    // --- ASSERT ---
    for (path, material) in requests.iter().zip(&materials) {
        assert!(material.ptr_eq(agent.dummy_material()), "{path} should fall back");
    }
    assert!(agent.material("materials/broken.mat").ptr_eq(agent.dummy_material()));
    let dummy = agent.dummy_material().borrow();
    assert_eq!(dummy.layers.len(), 1);
    assert!(dummy.layers[0].textures.is_empty());
    assert!(dummy.layers[0].program.borrow().is_placeholder());
    Ok(())
}

#[test]
fn test_texture_kind_must_match_sampler() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    write_sky(&assets)?;
    assets.write("shaders/sky.fs.glsl", SKY_FS)?;
    assets.write("materials/wrong.mat", textured_material("textures/sky/sky.cub"))?;
    assets.write(
        "materials/sky.mat",
        r#"{ "layers": [ { "shaders": { "vs": "shaders/base.vs.glsl", "fs": "shaders/sky.fs.glsl" },
                          "textures": { "sky": "textures/sky/sky.cub" } } ] }"#,
    )?;
    let agent = assets.asset_agent()?;

    // --- ACT ---
    let wrong = agent.material("materials/wrong.mat");
    let sky = agent.material("materials/sky.mat");

    // --- ASSERT ---
    assert!(wrong.ptr_eq(agent.dummy_material()));
    assert!(!sky.ptr_eq(agent.dummy_material()));
    let sky = sky.borrow();
    let binding = &sky.layers[0].textures[0];
    assert_eq!(binding.texture.borrow().kind(), TextureKind::Cube);
    assert_eq!(binding.sampler.sampler_type(), SamplerType::RepeatCube);
    Ok(())
}

#[test]
fn test_material_time_advances_with_update() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    assets.write_plain_material("materials/plain.mat", false)?;
    let agent = assets.asset_agent()?;
    let material = agent.material("materials/plain.mat");

    // --- ACT ---
    agent.update(0.25);
    agent.update(0.5);

    // --- ASSERT ---
    approx::assert_relative_eq!(material.borrow().time(), 0.75);
    Ok(())
}

#[test]
fn test_material_time_survives_reload() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    assets.write_plain_material("materials/plain.mat", false)?;
    let agent = assets.asset_agent()?;
    let material = agent.material("materials/plain.mat");
    agent.update(0.75);

    // --- ACT ---
    let document = std::fs::read_to_string(assets.path("materials/plain.mat"))?;
    assets.rewrite("materials/plain.mat", document.replace("\"BACK\"", "\"FRONT\""))?;
    let reloaded = agent.reload();

    // --- ASSERT ---
    assert_eq!(reloaded, 1);
    let material = material.borrow();
    assert_eq!(material.raster.cull_mode, Some(CullMode::Front));
    approx::assert_relative_eq!(material.time(), 0.75);
    Ok(())
}

#[test]
fn test_attribute_outside_table_yields_dummy_program() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    assets.write(
        "shaders/extra.vs.glsl",
        format!("layout( location = 9 ) in vec3 extra;\n{}", BASE_VS.replace("position, 1", "position + extra, 1")),
    )?;
    let agent = assets.asset_agent()?;

    // --- ACT ---
    let valid = agent.program("shaders/base.vs.glsl", "shaders/plain.fs.glsl");
    let invalid = agent.program("shaders/extra.vs.glsl", "shaders/plain.fs.glsl");

    // --- ASSERT ---
    assert!(!valid.borrow().is_placeholder());
    assert!(invalid.borrow().is_placeholder());
    assert!(!agent.shader("shaders/extra.vs.glsl").borrow().is_placeholder());
    Ok(())
}

#[test]
fn test_sampler_count_is_bounded_by_texture_units() -> Result<()> {
    // --- ARRANGE ---
    let mut info = kiln_core::renderer::mock::MockGraphicsDevice::default_info();
    info.max_combined_texture_units = 2;
    let assets = TestAssets::with_info(info)?;
    assets.write_shaders()?;
    let fragment = |count: usize| {
        let declarations: String = (0..count)
            .map(|i| format!("uniform sampler2D map{i};\n"))
            .collect();
        let sum: Vec<String> = (0..count)
            .map(|i| format!("texture( map{i}, vec2( 0 ) )"))
            .collect();
        format!(
            "{declarations}out vec4 color;\nvoid main() {{ color = {}; }}\n",
            sum.join(" + ")
        )
    };
    assets.write("shaders/two.fs.glsl", fragment(2))?;
    assets.write("shaders/three.fs.glsl", fragment(3))?;
    let agent = assets.asset_agent()?;

    // --- ACT ---
    let two = agent.program("shaders/base.vs.glsl", "shaders/two.fs.glsl");
    let three = agent.program("shaders/base.vs.glsl", "shaders/three.fs.glsl");

    // --- ASSERT ---
    assert_eq!(two.borrow().required_samplers().len(), 2);
    assert!(!two.borrow().is_placeholder());
    assert!(three.borrow().is_placeholder());
    Ok(())
}

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

//! Cache behavior seen through the asset agent: sharing, garbage
//! collection, and hot reload over real files.

mod common;

use anyhow::Result;
use common::{png, TestAssets, PLAIN_FS, TEXTURED_FS};
use kiln_core::renderer::mock::DeviceCall;
use kiln_core::renderer::{TextureKind, TextureId};

const ROCK_MATERIAL: &str = r#"{
    "name": "rock",
    "layers": [
        {
            "shaders": { "vs": "shaders/base.vs.glsl", "fs": "shaders/textured.fs.glsl" },
            "textures": { "diffuse": "textures/rock.png" }
        }
    ]
}"#;

fn rock_assets() -> Result<TestAssets> {
    let assets = TestAssets::new()?;
    assets.write_shaders()?;
    assets.write("textures/rock.png", png(8, 8, false))?;
    assets.write("materials/rock.mat", ROCK_MATERIAL)?;
    Ok(assets)
}

#[test]
fn test_repeated_requests_share_one_handle() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    let agent = assets.asset_agent()?;

    // --- ACT ---
    let first = agent.material("materials/rock.mat");
    let textures_after_first = assets.device.live_textures();
    let second = agent.material("materials/rock.mat");
    let texture = agent.texture("textures/rock.png");

    // --- ASSERT ---
    assert!(first.ptr_eq(&second));
    assert!(!first.ptr_eq(agent.dummy_material()));
    assert_eq!(assets.device.live_textures(), textures_after_first);
    assert!(first.borrow().layers[0].textures[0].texture.ptr_eq(&texture));
    // Shaders, texture, program, and material.
    assert_eq!(agent.resource_count(), 5);
    Ok(())
}

#[test]
fn test_garbage_collection_spares_held_resources() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    let agent = assets.asset_agent()?;
    let material = agent.material("materials/rock.mat");
    let texture_id = material.borrow().layers[0].textures[0].texture.borrow().id();

    // --- ACT ---
    let released = agent.collect_garbage();

    // --- ASSERT ---
    // Linked programs do not keep their stages alive.
    assert_eq!(released, 2);
    assert_eq!(agent.resource_count(), 3);
    assert!(agent.material("materials/rock.mat").ptr_eq(&material));
    assert!(assets.device.texture(texture_id).is_some());

    // --- ACT ---
    drop(material);
    let released = agent.collect_garbage();

    // --- ASSERT ---
    assert_eq!(released, 3);
    assert_eq!(agent.resource_count(), 0);
    assert!(assets.device.texture(texture_id).is_none());
    Ok(())
}

#[test]
fn test_reload_without_changes_touches_nothing() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    let agent = assets.asset_agent()?;
    let _material = agent.material("materials/rock.mat");
    assets.device.clear_calls();

    // --- ACT ---
    let reloaded = agent.reload();

    // --- ASSERT ---
    assert_eq!(reloaded, 0);
    assert!(assets.device.calls().is_empty());
    Ok(())
}

#[test]
fn test_texture_reload_reaches_material() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    let agent = assets.asset_agent()?;
    let material = agent.material("materials/rock.mat");
    let old_id = material.borrow().layers[0].textures[0].texture.borrow().id();

    // --- ACT ---
    assets.rewrite("textures/rock.png", png(16, 16, true))?;
    let reloaded = agent.reload();

    // --- ASSERT ---
    assert_eq!(reloaded, 1);
    let layer_texture = material.borrow().layers[0].textures[0].texture.clone();
    assert!(layer_texture.ptr_eq(&agent.texture("textures/rock.png")));
    let texture = layer_texture.borrow();
    assert_eq!(texture.width(), 16);
    assert_ne!(texture.id(), old_id);
    assert!(assets.device.texture(old_id).is_none());
    assert_eq!(
        assets
            .device
            .count_calls(|call| matches!(call, DeviceCall::DestroyTexture(id) if *id == old_id)),
        1
    );
    Ok(())
}

#[test]
fn test_shader_reload_relinks_program() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    let agent = assets.asset_agent()?;
    let program = agent.program("shaders/base.vs.glsl", "shaders/plain.fs.glsl");
    let old_id = program.borrow().id();

    // --- ACT ---
    assets.rewrite(
        "shaders/plain.fs.glsl",
        PLAIN_FS.replace("vec4( 1 )", "vec4( 0.5 )"),
    )?;
    let reloaded = agent.reload();

    // --- ASSERT ---
    assert_eq!(reloaded, 2);
    assert!(program.ptr_eq(&agent.program("shaders/base.vs.glsl", "shaders/plain.fs.glsl")));
    let program = program.borrow();
    assert!(!program.is_placeholder());
    assert_ne!(program.id(), old_id);
    Ok(())
}

#[test]
fn test_shader_reload_rebinds_material_samplers() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    assets.write(
        "materials/detailed.mat",
        r#"{ "name": "detailed", "layers": [ {
            "shaders": { "vs": "shaders/base.vs.glsl", "fs": "shaders/textured.fs.glsl" },
            "textures": { "diffuse": "textures/rock.png", "detail": "textures/rock.png" }
        } ] }"#,
    )?;
    let agent = assets.asset_agent()?;
    let material = agent.material("materials/detailed.mat");
    assert_eq!(material.borrow().layers[0].textures.len(), 1);

    // --- ACT ---
    assets.rewrite(
        "shaders/textured.fs.glsl",
        "uniform sampler2D diffuse;
uniform sampler2D detail;
out vec4 color;
void main() { color = texture( diffuse, vec2( 0 ) ) * texture( detail, vec2( 0 ) ); }
",
    )?;
    let reloaded = agent.reload();

    // --- ASSERT ---
    // Shader, program, and material.
    assert_eq!(reloaded, 3);
    let material = material.borrow();
    let layer = &material.layers[0];
    let program = layer.program.borrow();
    assert_eq!(program.required_samplers().len(), 2);
    let bound: Vec<(i32, &str)> = layer
        .textures
        .iter()
        .map(|binding| (binding.location, binding.name.as_str()))
        .collect();
    let required: Vec<(i32, &str)> = program
        .required_samplers()
        .iter()
        .map(|sampler| (sampler.location, sampler.name.as_str()))
        .collect();
    assert_eq!(bound, required);
    Ok(())
}

#[test]
fn test_broken_shader_reload_links_magenta_stage() -> Result<()> {
    // --- ARRANGE ---
    let assets = rock_assets()?;
    let agent = assets.asset_agent()?;
    let program = agent.program("shaders/base.vs.glsl", "shaders/textured.fs.glsl");
    assert_eq!(program.borrow().required_samplers().len(), 1);

    // --- ACT ---
    assets.rewrite(
        "shaders/textured.fs.glsl",
        format!("#error broken on purpose\n{TEXTURED_FS}"),
    )?;
    agent.reload();

    // --- ASSERT ---
    let shader = agent.shader("shaders/textured.fs.glsl");
    assert!(shader.borrow().is_placeholder());
    let program = program.borrow();
    assert!(program.id().is_valid());
    assert!(program.required_samplers().is_empty());
    Ok(())
}

#[test]
fn test_cubemap_needs_six_faces() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    let faces = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];
    for face in faces {
        assets.write(&format!("textures/sky/{face}"), png(4, 4, false))?;
    }
    assets.write(
        "textures/sky/sky.cub",
        r#"{ "faces": ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"] }"#,
    )?;
    assets.write(
        "textures/sky/broken.cub",
        r#"{ "faces": ["px.png", "nx.png", "py.png", "ny.png", "pz.png"] }"#,
    )?;
    let agent = assets.asset_agent()?;

    // --- ACT ---
    let sky = agent.texture("textures/sky/sky.cub");
    let broken = agent.texture("textures/sky/broken.cub");

    // --- ASSERT ---
    let sky = sky.borrow();
    assert_eq!(sky.kind(), TextureKind::Cube);
    assert_eq!(sky.layers(), 6);
    assert!(!sky.is_placeholder());

    let broken = broken.borrow();
    assert!(broken.is_placeholder());
    assert_eq!(broken.kind(), TextureKind::Flat);
    assert_eq!((broken.width(), broken.height()), (64, 64));
    Ok(())
}

#[test]
fn test_missing_texture_is_a_placeholder_and_recovers() -> Result<()> {
    // --- ARRANGE ---
    let assets = TestAssets::new()?;
    let agent = assets.asset_agent()?;
    let texture = agent.texture("textures/later.png");
    assert!(texture.borrow().is_placeholder());
    assert_ne!(texture.borrow().id(), TextureId::INVALID);

    // --- ACT ---
    assets.write("textures/later.png", png(4, 4, false))?;
    let reloaded = agent.reload();

    // --- ASSERT ---
    assert_eq!(reloaded, 1);
    assert!(!texture.borrow().is_placeholder());
    assert_eq!(texture.borrow().width(), 4);
    Ok(())
}

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

//! Culling and draw-list construction.

use super::{DrawCommand, FrameStats, RenderLayer, RenderPackage};
use glam::{Mat4, Vec3, Vec4};
use kiln_core::asset::{AssetHandle, Material};
use kiln_core::math::{Frustum, Transform};
use kiln_core::renderer::Mesh;
use kiln_data::ecs::{CameraComponent, EntityId};
use kiln_data::Scene;

/// Everything derived from the scene camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World-space eye position.
    pub position: Vec3,
    /// The world Z axis seen through the camera orientation.
    pub direction: Vec3,
    /// Perspective projection.
    pub projection_matrix: Mat4,
    /// World to view.
    pub view_matrix: Mat4,
    /// Projection times view.
    pub view_projection_matrix: Mat4,
    /// Planes of the visible volume.
    pub frustum: Frustum,
}

impl CameraView {
    /// Derives the matrices and frustum of `camera` placed at `transform`.
    pub fn new(transform: &Transform, camera: &CameraComponent) -> Self {
        let projection_matrix = camera.projection_matrix();
        let view_matrix = transform.view_matrix();
        let view_projection_matrix = projection_matrix * view_matrix;
        Self {
            position: transform.position,
            direction: transform.direction(),
            projection_matrix,
            view_matrix,
            view_projection_matrix,
            frustum: Frustum::from_view_projection(&view_projection_matrix),
        }
    }
}

/// Depth range of the GUI projection; GUI models sit anywhere within it.
pub const GUI_Z_NEAR: f32 = -1000.0;
/// See [`GUI_Z_NEAR`].
pub const GUI_Z_FAR: f32 = 1000.0;

/// Culls the scene's models against the camera and records a sorted draw list.
///
/// GUI models go to a second layer seen through an orthographic projection
/// over the screen, in pixels with the origin at the bottom left.
#[derive(Debug)]
pub struct ExtractLane {
    gui_projection: Mat4,
}

impl ExtractLane {
    /// Creates a new `ExtractLane` for a `width` x `height` screen.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            gui_projection: Mat4::orthographic_rh_gl(
                0.0,
                width as f32,
                0.0,
                height as f32,
                GUI_Z_NEAR,
                GUI_Z_FAR,
            ),
        }
    }

    /// The orthographic projection of the GUI layer.
    pub fn gui_projection(&self) -> Mat4 {
        self.gui_projection
    }

    /// Builds the frame's render package.
    ///
    /// A model survives culling unless its bounding sphere (centered on the
    /// entity, radius `|bounding radius vector * scale|`) lies entirely
    /// behind one frustum plane. Materials without layers are skipped.
    ///
    /// The world layer always comes first. A GUI layer follows it when the
    /// scene holds GUI models; those are never culled.
    pub fn run(
        &self,
        scene: &Scene,
        view: &CameraView,
        clear_color: Vec4,
        stats: &mut FrameStats,
    ) -> RenderPackage {
        let mut layer = RenderLayer::new(view.view_matrix, view.view_projection_matrix);

        for (entity, transform, model) in scene.models() {
            let radius = (model.mesh.borrow().bounding_radius_vector() * transform.scale).length();
            if !view.frustum.is_sphere_inside(transform.position, radius) {
                stats.culled += 1;
                continue;
            }
            stats.visible += 1;

            let depth = transform.position.distance_squared(view.position);
            push_command(&mut layer, entity, transform, &model.mesh, &model.material, depth);
        }
        layer.sort();

        let mut layers = vec![layer];

        let mut gui = RenderLayer::new(Mat4::IDENTITY, self.gui_projection);
        let mut has_gui = false;
        for (entity, transform, model) in scene.gui_models() {
            has_gui = true;
            // Larger z is nearer the viewer.
            let depth = -transform.position.z;
            push_command(&mut gui, entity, transform, &model.mesh, &model.material, depth);
        }
        if has_gui {
            gui.sort();
            layers.push(gui);
        }

        RenderPackage {
            clear_color,
            layers,
        }
    }
}

fn push_command(
    layer: &mut RenderLayer,
    entity: EntityId,
    transform: &Transform,
    mesh: &AssetHandle<Mesh>,
    material: &AssetHandle<Material>,
    view_depth: f32,
) {
    let borrowed = material.borrow();
    let Some(program) = borrowed.program() else {
        log::debug!("ExtractLane: material '{}' of {entity:?} has no layers", borrowed.name);
        return;
    };

    layer.draw_commands.push(DrawCommand {
        mesh: mesh.clone(),
        material: material.clone(),
        program: program.clone(),
        model_matrix: transform.model_matrix(),
        view_depth,
        translucent: borrowed.is_blended(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mock_device;
    use kiln_core::asset::{AssetHandle, Material, MaterialLayer};
    use kiln_core::renderer::{Mesh, MeshData, ProgramId, ProgramInterface, ShaderProgram, Vertex};
    use kiln_data::ecs::{GuiModelComponent, ModelComponent};

    fn unit_model() -> ModelComponent {
        let (device, _) = mock_device();
        let data = MeshData {
            vertices: vec![
                Vertex {
                    position: [-1.0, -1.0, -1.0],
                    ..Default::default()
                },
                Vertex {
                    position: [1.0, 1.0, 1.0],
                    ..Default::default()
                },
            ],
            indices: vec![0, 1, 0],
        };
        let mesh = AssetHandle::new(Mesh::new(device.clone(), &data).unwrap());
        let program = AssetHandle::new(ShaderProgram::from_linked(
            device,
            ProgramId(1),
            ProgramInterface::default(),
        ));
        let mut material = Material::new("unit");
        material.layers.push(MaterialLayer::new(program));
        ModelComponent::new(mesh, AssetHandle::new(material))
    }

    fn scene_with_camera() -> (Scene, CameraView) {
        let mut scene = Scene::new();
        let camera = scene.spawn(Transform::default());
        scene.insert(camera, CameraComponent::new(60.0, 1.0, 0.1, 100.0));
        let view = CameraView::new(&Transform::default(), &CameraComponent::new(60.0, 1.0, 0.1, 100.0));
        (scene, view)
    }

    #[test]
    fn test_culls_spheres_outside_and_keeps_straddling() {
        let (mut scene, view) = scene_with_camera();
        let model = unit_model();
        for z in [-10.0, 10.0, 0.5, -200.0] {
            let entity = scene.spawn(Transform::from_position(Vec3::new(0.0, 0.0, z)));
            scene.insert(entity, model.clone());
        }
        let mut stats = FrameStats::default();

        let package = ExtractLane::new(800, 600).run(&scene, &view, Vec4::ONE, &mut stats);

        assert_eq!(stats.visible, 2);
        assert_eq!(stats.culled, 2);
        assert_eq!(package.draw_count(), 2);
        assert_eq!(package.clear_color, Vec4::ONE);
    }

    #[test]
    fn test_scale_grows_the_bounding_sphere() {
        let (mut scene, view) = scene_with_camera();
        // Just beyond the far plane: only the scaled copy reaches back inside.
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, -102.0));
        let small = scene.spawn(transform);
        scene.insert(small, unit_model());
        transform.scale = Vec3::splat(2.0);
        let large = scene.spawn(transform);
        scene.insert(large, unit_model());
        let mut stats = FrameStats::default();

        ExtractLane::new(800, 600).run(&scene, &view, Vec4::ZERO, &mut stats);

        assert_eq!((stats.visible, stats.culled), (1, 1));
    }

    #[test]
    fn test_commands_record_depth_and_matrix() {
        let (mut scene, view) = scene_with_camera();
        let entity = scene.spawn(Transform::from_position(Vec3::new(3.0, 0.0, -4.0)));
        scene.insert(entity, unit_model());
        let mut stats = FrameStats::default();

        let package = ExtractLane::new(800, 600).run(&scene, &view, Vec4::ZERO, &mut stats);

        let command = &package.layers[0].draw_commands[0];
        approx::assert_relative_eq!(command.view_depth, 25.0);
        assert_eq!(command.model_matrix.w_axis.truncate(), Vec3::new(3.0, 0.0, -4.0));
        assert!(!command.translucent);
    }

    #[test]
    fn test_material_without_layers_is_skipped() {
        let (mut scene, view) = scene_with_camera();
        let mut model = unit_model();
        model.material = AssetHandle::new(Material::new("empty"));
        let entity = scene.spawn(Transform::from_position(Vec3::new(0.0, 0.0, -5.0)));
        scene.insert(entity, model);
        let mut stats = FrameStats::default();

        let package = ExtractLane::new(800, 600).run(&scene, &view, Vec4::ZERO, &mut stats);

        assert_eq!(stats.visible, 1);
        assert_eq!(package.draw_count(), 0);
    }

    fn gui_model(model: &ModelComponent) -> GuiModelComponent {
        GuiModelComponent::new(model.mesh.clone(), model.material.clone())
    }

    #[test]
    fn test_gui_layer_follows_world_layer() {
        let (mut scene, view) = scene_with_camera();
        let model = unit_model();
        let world = scene.spawn(Transform::from_position(Vec3::new(0.0, 0.0, -5.0)));
        scene.insert(world, model.clone());
        // Far outside the camera frustum, GUI models are not culled.
        let gui = scene.spawn(Transform::from_position(Vec3::new(400.0, 300.0, 0.0)));
        scene.insert(gui, gui_model(&model));
        let lane = ExtractLane::new(800, 600);
        let mut stats = FrameStats::default();

        let package = lane.run(&scene, &view, Vec4::ZERO, &mut stats);

        assert_eq!(package.layers.len(), 2);
        assert_eq!((stats.visible, stats.culled), (1, 0));
        let gui_layer = &package.layers[1];
        assert_eq!(gui_layer.view_matrix, Mat4::IDENTITY);
        assert_eq!(gui_layer.view_projection_matrix, lane.gui_projection());
        assert_eq!(gui_layer.draw_commands.len(), 1);
        // The screen center lands on the clip-space origin.
        let center = gui_layer.view_projection_matrix * gui_layer.draw_commands[0].model_matrix;
        assert!(center.w_axis.truncate().abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_no_gui_layer_without_gui_models() {
        let (scene, view) = scene_with_camera();
        let mut stats = FrameStats::default();

        let package = ExtractLane::new(800, 600).run(&scene, &view, Vec4::ZERO, &mut stats);

        assert_eq!(package.layers.len(), 1);
    }

    #[test]
    fn test_gui_layer_sorts_by_height_above_screen() {
        let (mut scene, view) = scene_with_camera();
        let model = unit_model();
        for z in [-20.0, 10.0, 0.0] {
            let entity = scene.spawn(Transform::from_position(Vec3::new(10.0, 10.0, z)));
            scene.insert(entity, gui_model(&model));
        }
        let mut stats = FrameStats::default();

        let package = ExtractLane::new(800, 600).run(&scene, &view, Vec4::ZERO, &mut stats);

        let depths: Vec<f32> = package.layers[1]
            .draw_commands
            .iter()
            .map(|command| command.model_matrix.w_axis.z)
            .collect();
        // Opaque commands go front to back.
        assert_eq!(depths, vec![10.0, 0.0, -20.0]);
    }
}

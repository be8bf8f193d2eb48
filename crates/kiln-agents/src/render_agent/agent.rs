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

use std::mem::size_of;
use std::rc::Rc;

use kiln_core::math::Vec4;
use kiln_core::renderer::{
    DeviceCapabilities, FramebufferId, GraphicsDevice, InitError, UniformBuffer,
};
use kiln_core::Settings;
use kiln_data::Scene;
use kiln_lanes::render_lane::uniforms::{
    CameraBlock, ScreenBlock, TimerBlock, UniformBlockLayout, CAMERA_BLOCK, SCREEN_BLOCK,
    TIMER_BLOCK, UNIFORM_BLOCKS,
};
use kiln_lanes::render_lane::{CameraView, ExtractLane, FrameStats, SubmitLane};

/// Rounds a block size up to the std140 base alignment.
fn std140_size<T>() -> usize {
    size_of::<T>().next_multiple_of(16)
}

fn block_buffer<T>(
    device: &Rc<dyn GraphicsDevice>,
    layout: &UniformBlockLayout,
) -> Result<UniformBuffer, InitError> {
    let buffer = UniformBuffer::new(device.clone(), std140_size::<T>(), layout.binding)?;
    log::debug!(
        "RenderAgent: '{}' block bound at {} ({} bytes)",
        layout.name,
        layout.binding,
        buffer.size()
    );
    Ok(buffer)
}

/// The agent responsible for turning a scene into draw calls, one frame at a time.
pub struct RenderAgent {
    device: Rc<dyn GraphicsDevice>,
    // Engine uniform blocks, bound once at their fixed binding points.
    camera_buffer: UniformBuffer,
    timer_buffer: UniformBuffer,
    _screen_buffer: UniformBuffer,
    extract_lane: ExtractLane,
    submit_lane: SubmitLane,
    clear_color: Vec4,
    // Total number of frames rendered since agent creation.
    frame_count: u64,
    last_stats: FrameStats,
}

impl RenderAgent {
    /// The GLSL declarations of the engine uniform blocks, ordered by binding.
    ///
    /// These must be handed to the shader compiler before any shader is built.
    pub fn uniform_block_sources() -> Vec<String> {
        UNIFORM_BLOCKS.iter().map(UniformBlockLayout::glsl).collect()
    }

    /// Allocates the engine uniform buffers and writes the screen block.
    ///
    /// # Errors
    /// [`InitError::Resource`] if the device refuses a buffer.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        capabilities: &DeviceCapabilities,
        settings: &Settings,
    ) -> Result<Self, InitError> {
        let camera_buffer = block_buffer::<CameraBlock>(&device, &CAMERA_BLOCK)?;
        let timer_buffer = block_buffer::<TimerBlock>(&device, &TIMER_BLOCK)?;
        let screen_buffer = block_buffer::<ScreenBlock>(&device, &SCREEN_BLOCK)?;

        let window = settings.renderer.window;
        let screen = ScreenBlock {
            width: window.width,
            height: window.height,
        };
        screen_buffer.write(0, bytemuck::bytes_of(&screen));

        log::info!(
            "RenderAgent: initialized for {}x{}, {} texture units",
            window.width,
            window.height,
            capabilities.max_combined_texture_units
        );

        Ok(Self {
            device,
            camera_buffer,
            timer_buffer,
            _screen_buffer: screen_buffer,
            extract_lane: ExtractLane::new(window.width, window.height),
            submit_lane: SubmitLane::new(),
            clear_color: settings.renderer.clear_color,
            frame_count: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Renders `scene` into `framebuffer` (`None` for the default one).
    ///
    /// `time_us` is the engine clock in microseconds; shaders see it in
    /// milliseconds through the timer block.
    ///
    /// Returns `None` without touching the device if the scene has no camera.
    pub fn render(
        &mut self,
        scene: &Scene,
        framebuffer: Option<FramebufferId>,
        time_us: u64,
    ) -> Option<FrameStats> {
        let Some((_, transform, camera)) = scene.camera() else {
            log::warn!("RenderAgent: scene has no camera");
            return None;
        };

        let view = CameraView::new(transform, camera);
        self.update_uniforms(&view, time_us);

        let mut stats = FrameStats::default();
        let clear_color = scene.clear_color().unwrap_or(self.clear_color);
        let package = self.extract_lane.run(scene, &view, clear_color, &mut stats);
        self.submit_lane
            .run(self.device.as_ref(), &package, framebuffer, &mut stats);

        self.frame_count += 1;
        self.last_stats = stats;
        log::trace!("RenderAgent: frame {} {stats:?}", self.frame_count);
        Some(stats)
    }

    fn update_uniforms(&self, view: &CameraView, time_us: u64) {
        let timer = TimerBlock {
            time: (time_us / 1000) as u32,
        };
        self.timer_buffer.write(0, bytemuck::bytes_of(&timer));

        let camera = CameraBlock::new(
            view.position,
            view.direction,
            view.projection_matrix,
            view.view_matrix,
        );
        self.camera_buffer.write(0, bytemuck::bytes_of(&camera));
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Counters of the last rendered frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

impl std::fmt::Debug for RenderAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderAgent")
            .field("frame_count", &self.frame_count)
            .field("last_stats", &self.last_stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std140_sizes() {
        assert_eq!(std140_size::<TimerBlock>(), 16);
        assert_eq!(std140_size::<ScreenBlock>(), 16);
        assert_eq!(std140_size::<CameraBlock>(), 224);
    }

    #[test]
    fn test_block_sources_follow_binding_order() {
        let sources = RenderAgent::uniform_block_sources();
        assert_eq!(sources.len(), 3);
        assert!(sources[0].contains("binding = 0 ) uniform Camera"));
        assert!(sources[2].contains("uint height;"));
    }
}

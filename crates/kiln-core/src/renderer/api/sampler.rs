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

//! Sampler configurations.

use std::fmt;

/// Texture coordinate wrapping behavior along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Tile the texture.
    Repeat,
    /// Return the border color outside `[0, 1]`.
    ClampToBorder,
    /// Repeat the outermost texel.
    ClampToEdge,
}

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest texel.
    Nearest,
    /// Bilinear.
    Linear,
    /// Trilinear across mip levels.
    LinearMipmapLinear,
}

/// A complete sampler description handed to the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDescriptor {
    /// Wrapping along S, T and R.
    pub wrap: [WrapMode; 3],
    /// Minification filter.
    pub min_filter: FilterMode,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Anisotropic filtering level, `1.0` disables it.
    pub max_anisotropy: f32,
}

/// The fixed set of sampler configurations materials can refer to by name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerType {
    Repeat2D,
    Border2D,
    Edge2D,
    RepeatBorder2D,
    RepeatCube,
    BorderCube,
    EdgeCube,
}

impl SamplerType {
    /// Every sampler type, in registry order.
    pub const ALL: [SamplerType; 7] = [
        SamplerType::Repeat2D,
        SamplerType::Border2D,
        SamplerType::Edge2D,
        SamplerType::RepeatBorder2D,
        SamplerType::RepeatCube,
        SamplerType::BorderCube,
        SamplerType::EdgeCube,
    ];

    /// The name used in material files.
    pub fn name(self) -> &'static str {
        match self {
            SamplerType::Repeat2D => "REPEAT_2D",
            SamplerType::Border2D => "BORDER_2D",
            SamplerType::Edge2D => "EDGE_2D",
            SamplerType::RepeatBorder2D => "REPEAT_BORDER_2D",
            SamplerType::RepeatCube => "REPEAT_CUBE",
            SamplerType::BorderCube => "BORDER_CUBE",
            SamplerType::EdgeCube => "EDGE_CUBE",
        }
    }

    /// Parses the name used in material files.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Position in [`SamplerType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Builds the device description of this sampler type.
    pub fn descriptor(self, max_anisotropy: f32) -> SamplerDescriptor {
        use WrapMode::*;
        let wrap = match self {
            SamplerType::Repeat2D | SamplerType::RepeatCube => [Repeat; 3],
            SamplerType::Border2D | SamplerType::BorderCube => [ClampToBorder; 3],
            SamplerType::Edge2D | SamplerType::EdgeCube => [ClampToEdge; 3],
            SamplerType::RepeatBorder2D => [Repeat, ClampToBorder, ClampToBorder],
        };
        SamplerDescriptor {
            wrap,
            min_filter: FilterMode::LinearMipmapLinear,
            mag_filter: FilterMode::Linear,
            max_anisotropy: max_anisotropy.max(1.0),
        }
    }
}

impl fmt::Display for SamplerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_for_every_type() {
        for ty in SamplerType::ALL {
            assert_eq!(SamplerType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(SamplerType::from_name("MIRROR_2D"), None);
    }

    #[test]
    fn test_repeat_border_wraps_s_only() {
        let desc = SamplerType::RepeatBorder2D.descriptor(8.0);
        assert_eq!(desc.wrap[0], WrapMode::Repeat);
        assert_eq!(desc.wrap[1], WrapMode::ClampToBorder);
        assert_eq!(desc.max_anisotropy, 8.0);
    }

    #[test]
    fn test_anisotropy_never_below_one() {
        assert_eq!(SamplerType::Edge2D.descriptor(0.0).max_anisotropy, 1.0);
    }
}

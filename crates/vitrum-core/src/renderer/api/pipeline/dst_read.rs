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

//! How a pipeline reads back the destination color.

use serde::{Deserialize, Serialize};

/// How a pipeline reads the color previously written at the pixel it shades.
///
/// Blend modes that fixed-function blending cannot express need the destination
/// color inside the fragment shader. The variant set follows the shader
/// generation stage; the pipeline core only carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DstReadRequirement {
    /// The pipeline never reads the destination.
    #[default]
    None,
    /// The destination region is copied to a texture before the draw.
    TextureCopy,
    /// The destination is bound and sampled directly as a texture.
    TextureSample,
    /// The destination color is read in-shader through framebuffer fetch.
    FramebufferFetch,
}

impl DstReadRequirement {
    /// Returns `true` for every variant that must read the destination.
    pub const fn needs_dst_read(&self) -> bool {
        !matches!(self, DstReadRequirement::None)
    }

    /// Returns `true` if the destination reaches the shader as a bound texture.
    pub const fn uses_dst_texture(&self) -> bool {
        matches!(
            self,
            DstReadRequirement::TextureCopy | DstReadRequirement::TextureSample
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_none_skips_dst_reads() {
        assert!(!DstReadRequirement::None.needs_dst_read());
        assert!(DstReadRequirement::TextureCopy.needs_dst_read());
        assert!(DstReadRequirement::TextureSample.needs_dst_read());
        assert!(DstReadRequirement::FramebufferFetch.needs_dst_read());
        assert!(!DstReadRequirement::FramebufferFetch.uses_dst_texture());
        assert_eq!(DstReadRequirement::default(), DstReadRequirement::None);
    }
}

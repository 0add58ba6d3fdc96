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


//! The shader description a graphics pipeline is derived from.

use crate::renderer::api::pipeline::DstReadRequirement;

/// A fully resolved description of one draw technique's shader stages and bindings.
///
/// It is produced by the shader generation stage and is assumed valid; the
/// pipeline core copies what it needs from it and never validates it.
pub trait ShaderDescription {
    /// How the fragment stage reads the previously written destination color.
    fn dst_read_requirement(&self) -> DstReadRequirement;
    /// The number of texture/sampler pairs bound to the fragment stage.
    fn num_frag_textures_and_samplers(&self) -> u32;
    /// Whether the pipeline consumes paint-level uniforms.
    fn has_paint_uniforms(&self) -> bool;
    /// Whether the pipeline consumes per-render-step uniforms.
    fn has_step_uniforms(&self) -> bool;
    /// Whether the pipeline reads gradient stops from a storage buffer.
    fn has_gradient_buffer(&self) -> bool;
    /// A human-readable name for the technique.
    fn label(&self) -> &str;
    /// The portable (backend-neutral) vertex shader text.
    fn vertex_source(&self) -> &str;
    /// The portable (backend-neutral) fragment shader text.
    fn fragment_source(&self) -> &str;
}

/// A plain-value [`ShaderDescription`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderInfo {
    label: String,
    vertex_source: String,
    fragment_source: String,
    dst_read_requirement: DstReadRequirement,
    num_frag_textures_and_samplers: u32,
    has_paint_uniforms: bool,
    has_step_uniforms: bool,
    has_gradient_buffer: bool,
}

impl ShaderInfo {
    /// Starts building a shader description named `label`.
    pub fn builder(label: impl Into<String>) -> ShaderInfoBuilder {
        ShaderInfoBuilder {
            info: ShaderInfo {
                label: label.into(),
                ..Default::default()
            },
        }
    }
}

impl ShaderDescription for ShaderInfo {
    fn dst_read_requirement(&self) -> DstReadRequirement {
        self.dst_read_requirement
    }

    fn num_frag_textures_and_samplers(&self) -> u32 {
        self.num_frag_textures_and_samplers
    }

    fn has_paint_uniforms(&self) -> bool {
        self.has_paint_uniforms
    }

    fn has_step_uniforms(&self) -> bool {
        self.has_step_uniforms
    }

    fn has_gradient_buffer(&self) -> bool {
        self.has_gradient_buffer
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    fn fragment_source(&self) -> &str {
        &self.fragment_source
    }
}

/// Builder for [`ShaderInfo`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ShaderInfoBuilder {
    info: ShaderInfo,
}

impl ShaderInfoBuilder {
    /// Sets the portable vertex and fragment shader text.
    pub fn sources(mut self, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.info.vertex_source = vertex.into();
        self.info.fragment_source = fragment.into();
        self
    }

    /// Sets the destination-read requirement.
    pub fn dst_read_requirement(mut self, requirement: DstReadRequirement) -> Self {
        self.info.dst_read_requirement = requirement;
        self
    }

    /// Sets the number of fragment texture/sampler pairs.
    pub fn frag_textures_and_samplers(mut self, count: u32) -> Self {
        self.info.num_frag_textures_and_samplers = count;
        self
    }

    /// Declares whether paint-level uniforms are consumed.
    pub fn paint_uniforms(mut self, used: bool) -> Self {
        self.info.has_paint_uniforms = used;
        self
    }

    /// Declares whether per-render-step uniforms are consumed.
    pub fn step_uniforms(mut self, used: bool) -> Self {
        self.info.has_step_uniforms = used;
        self
    }

    /// Declares whether a gradient buffer is read.
    pub fn gradient_buffer(mut self, used: bool) -> Self {
        self.info.has_gradient_buffer = used;
        self
    }

    /// Finishes the description.
    pub fn build(self) -> ShaderInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_every_field() {
        let info = ShaderInfo::builder("CoverBounds + SolidColor")
            .sources("vs", "fs")
            .dst_read_requirement(DstReadRequirement::TextureCopy)
            .frag_textures_and_samplers(3)
            .paint_uniforms(true)
            .step_uniforms(true)
            .gradient_buffer(true)
            .build();

        assert_eq!(info.label(), "CoverBounds + SolidColor");
        assert_eq!(info.vertex_source(), "vs");
        assert_eq!(info.fragment_source(), "fs");
        assert_eq!(info.dst_read_requirement(), DstReadRequirement::TextureCopy);
        assert_eq!(info.num_frag_textures_and_samplers(), 3);
        assert!(info.has_paint_uniforms());
        assert!(info.has_step_uniforms());
        assert!(info.has_gradient_buffer());
    }

    #[test]
    fn builder_defaults_are_empty() {
        let info = ShaderInfo::builder("Depth only").build();
        assert_eq!(info.dst_read_requirement(), DstReadRequirement::None);
        assert_eq!(info.num_frag_textures_and_samplers(), 0);
        assert!(!info.has_paint_uniforms());
        assert!(info.vertex_source().is_empty());
    }
}

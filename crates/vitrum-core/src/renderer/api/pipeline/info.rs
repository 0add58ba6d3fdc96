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


//! The descriptor info summarizing a compiled pipeline.

use super::creation_flags::PipelineCreationFlags;
use super::dst_read::DstReadRequirement;
use crate::renderer::api::shader::ShaderDescription;

/// Everything a consumer needs to know about a pipeline without touching the
/// backend-native object.
///
/// The info is fully determined by the shader description and the creation flags
/// it was built from. Draw batching reads it to decide which uniforms, textures
/// and destination copies a draw needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineInfo {
    /// How the pipeline reads the destination color.
    pub dst_read_requirement: DstReadRequirement,
    /// The number of texture/sampler pairs bound to the fragment stage.
    pub num_frag_textures_and_samplers: u32,
    /// The pipeline consumes paint-level uniforms.
    pub has_paint_uniforms: bool,
    /// The pipeline consumes per-render-step uniforms.
    pub has_step_uniforms: bool,
    /// The pipeline reads gradient stops from a storage buffer.
    pub has_gradient_buffer: bool,
    /// Shader text and labels kept for viewers and debugging.
    #[cfg(feature = "diagnostics")]
    pub diagnostics: PipelineDiagnostics,
}

/// Introspection data only present in builds with the `diagnostics` feature.
///
/// This is not enough to recreate the pipeline: the render pass it was built
/// against is not preserved.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineDiagnostics {
    /// A human-readable name for the pipeline.
    pub label: String,
    /// The portable vertex shader text.
    pub portable_vertex_shader: String,
    /// The portable fragment shader text.
    pub portable_fragment_shader: String,
    /// The vertex shader in the backend's native language. Filled in by the backend.
    pub native_vertex_shader: String,
    /// The fragment shader in the backend's native language. Filled in by the backend.
    pub native_fragment_shader: String,
    /// The pipeline was built by a precompilation pass.
    pub from_precompile: bool,
}

impl PipelineInfo {
    /// Derives the info for a pipeline built from `shader` with `flags`.
    pub fn new(shader: &dyn ShaderDescription, flags: PipelineCreationFlags) -> Self {
        #[cfg(not(feature = "diagnostics"))]
        let _ = flags;

        Self {
            dst_read_requirement: shader.dst_read_requirement(),
            num_frag_textures_and_samplers: shader.num_frag_textures_and_samplers(),
            has_paint_uniforms: shader.has_paint_uniforms(),
            has_step_uniforms: shader.has_step_uniforms(),
            has_gradient_buffer: shader.has_gradient_buffer(),
            #[cfg(feature = "diagnostics")]
            diagnostics: PipelineDiagnostics {
                label: shader.label().to_owned(),
                portable_vertex_shader: shader.vertex_source().to_owned(),
                portable_fragment_shader: shader.fragment_source().to_owned(),
                native_vertex_shader: String::new(),
                native_fragment_shader: String::new(),
                from_precompile: flags.contains(PipelineCreationFlags::FOR_PRECOMPILATION),
            },
        }
    }

    /// Attaches the backend-translated shader text.
    ///
    /// Only stored with the `diagnostics` feature; otherwise the text is dropped.
    #[must_use]
    #[cfg_attr(not(feature = "diagnostics"), allow(unused_mut))]
    pub fn with_native_shaders(
        mut self,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        #[cfg(feature = "diagnostics")]
        {
            self.diagnostics.native_vertex_shader = vertex.into();
            self.diagnostics.native_fragment_shader = fragment.into();
        }
        #[cfg(not(feature = "diagnostics"))]
        let _ = (vertex, fragment);
        self
    }

    /// Returns `true` if the pipeline consumes any uniform data.
    pub fn has_uniforms(&self) -> bool {
        self.has_paint_uniforms || self.has_step_uniforms
    }
}

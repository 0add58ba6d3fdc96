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


//! The backend-agnostic keys a pipeline is looked up and built by.

use super::dst_read::DstReadRequirement;
use crate::renderer::api::util::{LoadOp, SampleCount, StoreOp, TextureFormat};

/// Identifies one render step (the geometry half of a draw technique).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderStepId(pub u32);

/// Identifies a unique combination of paint parameters (the shading half).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniquePaintParamsId(pub u32);

impl UniquePaintParamsId {
    /// The id used by steps that produce no color, such as depth-only stencil passes.
    pub const INVALID: Self = Self(u32::MAX);

    /// Returns `true` unless this is [`UniquePaintParamsId::INVALID`].
    pub const fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }
}

/// The draw-specific half of a pipeline's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphicsPipelineDesc {
    /// The render step that supplies geometry and coverage.
    pub render_step: RenderStepId,
    /// The paint parameters that supply color.
    pub paint_params: UniquePaintParamsId,
}

impl GraphicsPipelineDesc {
    /// Creates a description from a render step and paint combination.
    pub const fn new(render_step: RenderStepId, paint_params: UniquePaintParamsId) -> Self {
        Self {
            render_step,
            paint_params,
        }
    }
}

/// The render-target half of a pipeline's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassDesc {
    /// The format of the color attachment.
    pub color_format: TextureFormat,
    /// The format of the depth/stencil attachment, if any.
    pub depth_stencil_format: Option<TextureFormat>,
    /// The number of samples per pixel of every attachment.
    pub sample_count: SampleCount,
    /// How the color attachment is loaded.
    pub load_op: LoadOp,
    /// How the color attachment is stored.
    pub store_op: StoreOp,
    /// How draws inside the pass get at the destination color, if they need it.
    pub dst_read_strategy: DstReadRequirement,
}

impl RenderPassDesc {
    /// A single-sampled pass rendering into `color_format` without depth.
    pub const fn new(color_format: TextureFormat) -> Self {
        Self {
            color_format,
            depth_stencil_format: None,
            sample_count: SampleCount::X1,
            load_op: LoadOp::Load,
            store_op: StoreOp::Store,
            dst_read_strategy: DstReadRequirement::None,
        }
    }

    /// Adds a depth/stencil attachment.
    #[must_use]
    pub const fn with_depth_stencil(mut self, format: TextureFormat) -> Self {
        self.depth_stencil_format = Some(format);
        self
    }

    /// Sets the sample count.
    #[must_use]
    pub const fn with_sample_count(mut self, sample_count: SampleCount) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets how destination reads are satisfied inside the pass.
    #[must_use]
    pub const fn with_dst_read_strategy(mut self, strategy: DstReadRequirement) -> Self {
        self.dst_read_strategy = strategy;
        self
    }
}

/// The full identity of a graphics pipeline: one native pipeline exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    /// The draw configuration.
    pub desc: GraphicsPipelineDesc,
    /// The render-target configuration.
    pub render_pass: RenderPassDesc,
}

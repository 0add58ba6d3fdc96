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


//! The backend-neutral graphics pipeline resource.

use super::dst_read::DstReadRequirement;
use super::info::PipelineInfo;
use crate::renderer::api::core::{GraphicsBackend, SharedContext};
use crate::renderer::api::resource::Resource;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// The backend-specific half of a graphics pipeline.
///
/// Each backend implements this for its native object (a Metal render pipeline
/// state, a Dawn render pipeline, a D3D12 pipeline state object, a Vulkan
/// pipeline). Dropping the value releases the native state.
pub trait NativeGraphicsPipeline: Debug + Send + Sync + 'static {
    /// The backend the native object belongs to.
    fn backend(&self) -> GraphicsBackend;

    /// The debug label given to the native object.
    fn label(&self) -> &str;

    /// An estimate of the GPU memory held by the native object, in bytes.
    fn estimated_size(&self) -> usize {
        0
    }

    /// Allows a backend to recover its concrete native type.
    fn as_any(&self) -> &dyn Any;
}

/// A compiled, backend-specific rendering pipeline.
///
/// This is the handle draw submission works with. It is built once per unique
/// (draw configuration, render-target configuration) pair by a backend factory,
/// owned by the pipeline cache through an [`Arc`], and never mutated afterwards:
/// a different configuration always means a different pipeline.
///
/// Since it holds no mutable state after construction, it can be read from any
/// number of threads without locking.
#[derive(Debug)]
pub struct GraphicsPipeline {
    context: Arc<SharedContext>,
    info: PipelineInfo,
    native: Box<dyn NativeGraphicsPipeline>,
}

impl GraphicsPipeline {
    /// The label reported through [`Resource::resource_type`].
    pub const RESOURCE_TYPE: &'static str = "Graphics Pipeline";

    /// Wraps a finished native pipeline object together with its descriptor info.
    ///
    /// Backends call this once the native object is complete; there is no partially
    /// built pipeline. A backend that fails to build the native object returns an
    /// error instead of calling this.
    pub fn new(
        context: Arc<SharedContext>,
        info: PipelineInfo,
        native: Box<dyn NativeGraphicsPipeline>,
    ) -> Self {
        debug_assert_eq!(
            native.backend(),
            context.backend(),
            "native pipeline built for a different backend than its context"
        );
        log::debug!(
            "GraphicsPipeline: Created '{}' on {:?} ({} textures, dst read {:?})",
            native.label(),
            context.backend(),
            info.num_frag_textures_and_samplers,
            info.dst_read_requirement
        );
        Self {
            context,
            info,
            native,
        }
    }

    /// The descriptor info the pipeline was built with.
    pub fn pipeline_info(&self) -> &PipelineInfo {
        &self.info
    }

    /// How the pipeline reads the destination color.
    pub fn dst_read_requirement(&self) -> DstReadRequirement {
        self.info.dst_read_requirement
    }

    /// The number of texture/sampler pairs bound to the fragment stage.
    pub fn num_frag_textures_and_samplers(&self) -> u32 {
        self.info.num_frag_textures_and_samplers
    }

    /// Whether the pipeline consumes paint-level uniforms.
    pub fn has_paint_uniforms(&self) -> bool {
        self.info.has_paint_uniforms
    }

    /// Whether the pipeline consumes per-render-step uniforms.
    pub fn has_step_uniforms(&self) -> bool {
        self.info.has_step_uniforms
    }

    /// Whether the pipeline reads a gradient buffer.
    pub fn has_gradient_buffer(&self) -> bool {
        self.info.has_gradient_buffer
    }

    /// Whether the pipeline was built by a precompilation pass.
    #[cfg(feature = "diagnostics")]
    pub fn from_precompile(&self) -> bool {
        self.info.diagnostics.from_precompile
    }

    /// The backend-specific native object.
    pub fn native(&self) -> &dyn NativeGraphicsPipeline {
        self.native.as_ref()
    }

    /// The native object as a concrete backend type, if it is one.
    pub fn native_as<T: NativeGraphicsPipeline>(&self) -> Option<&T> {
        self.native.as_any().downcast_ref::<T>()
    }

    /// The backend the pipeline was built for.
    pub fn backend(&self) -> GraphicsBackend {
        self.context.backend()
    }
}

impl Resource for GraphicsPipeline {
    fn resource_type(&self) -> &'static str {
        Self::RESOURCE_TYPE
    }

    fn shared_context(&self) -> &Arc<SharedContext> {
        &self.context
    }

    fn gpu_memory_size(&self) -> usize {
        self.native.estimated_size()
    }
}

impl Drop for GraphicsPipeline {
    fn drop(&mut self) {
        log::trace!(
            "GraphicsPipeline: Releasing '{}' on {:?}",
            self.native.label(),
            self.context.backend()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubNative;

    impl NativeGraphicsPipeline for StubNative {
        fn backend(&self) -> GraphicsBackend {
            GraphicsBackend::Metal
        }

        fn label(&self) -> &str {
            "stub"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn stub_pipeline(info: PipelineInfo) -> GraphicsPipeline {
        let context = Arc::new(SharedContext::with_default_caps(GraphicsBackend::Metal));
        GraphicsPipeline::new(context, info, Box::new(StubNative))
    }

    #[test]
    fn accessors_project_the_stored_info() {
        let info = PipelineInfo {
            dst_read_requirement: DstReadRequirement::FramebufferFetch,
            num_frag_textures_and_samplers: 5,
            has_paint_uniforms: false,
            has_step_uniforms: true,
            has_gradient_buffer: true,
            ..Default::default()
        };
        let pipeline = stub_pipeline(info.clone());

        assert_eq!(pipeline.pipeline_info(), &info);
        assert_eq!(pipeline.dst_read_requirement(), DstReadRequirement::FramebufferFetch);
        assert_eq!(pipeline.num_frag_textures_and_samplers(), 5);
        assert!(!pipeline.has_paint_uniforms());
        assert!(pipeline.has_step_uniforms());
        assert!(pipeline.has_gradient_buffer());
    }

    #[test]
    fn resource_type_is_constant() {
        let a = stub_pipeline(PipelineInfo::default());
        let b = stub_pipeline(PipelineInfo::default());
        assert_eq!(a.resource_type(), "Graphics Pipeline");
        assert_eq!(a.resource_type(), b.resource_type());
        assert_eq!(a.resource_type(), a.resource_type());
    }

    #[test]
    fn native_downcast() {
        let pipeline = stub_pipeline(PipelineInfo::default());
        assert!(pipeline.native_as::<StubNative>().is_some());
        assert_eq!(pipeline.native().label(), "stub");
        assert_eq!(pipeline.backend(), GraphicsBackend::Metal);
        assert_eq!(pipeline.gpu_memory_size(), 0);
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphicsPipeline>();
    }
}

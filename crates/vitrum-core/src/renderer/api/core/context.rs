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

//! The backend, its capabilities and the device context resources belong to.

use crate::renderer::api::util::SampleCount;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The native graphics API a pipeline is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphicsBackend {
    /// Apple's Metal API (`MTLRenderPipelineState`).
    Metal,
    /// Dawn's WebGPU implementation (`wgpu::RenderPipeline`).
    Dawn,
    /// Microsoft's Direct3D 12 API (`ID3D12PipelineState`).
    Direct3D12,
    /// The Vulkan API (`VkPipeline`).
    Vulkan,
}

impl GraphicsBackend {
    /// Every backend, in a stable order.
    pub const ALL: [GraphicsBackend; 4] = [
        GraphicsBackend::Metal,
        GraphicsBackend::Dawn,
        GraphicsBackend::Direct3D12,
        GraphicsBackend::Vulkan,
    ];

    /// The name of the native shading language the backend consumes.
    pub const fn shading_language(&self) -> &'static str {
        match self {
            GraphicsBackend::Metal => "MSL",
            GraphicsBackend::Dawn => "WGSL",
            GraphicsBackend::Direct3D12 => "HLSL",
            GraphicsBackend::Vulkan => "SPIR-V",
        }
    }
}

/// The capabilities of a device that affect how pipelines can be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCaps {
    /// The backend can compile pipelines off the calling thread.
    pub supports_async_pipeline_creation: bool,
    /// Fragment shaders can read the destination color directly.
    pub supports_framebuffer_fetch: bool,
    /// The maximum number of texture/sampler pairs a fragment stage may bind.
    pub max_fragment_textures: u32,
    /// The render target sample counts pipelines may be built for.
    pub supported_sample_counts: Vec<SampleCount>,
}

impl BackendCaps {
    /// Returns the typical capabilities of a device running `backend`.
    pub fn for_backend(backend: GraphicsBackend) -> Self {
        match backend {
            GraphicsBackend::Metal => Self {
                supports_async_pipeline_creation: false,
                supports_framebuffer_fetch: true,
                max_fragment_textures: 16,
                supported_sample_counts: vec![SampleCount::X1, SampleCount::X4],
            },
            GraphicsBackend::Dawn => Self {
                supports_async_pipeline_creation: true,
                supports_framebuffer_fetch: false,
                max_fragment_textures: 16,
                supported_sample_counts: vec![SampleCount::X1, SampleCount::X4],
            },
            GraphicsBackend::Direct3D12 => Self {
                supports_async_pipeline_creation: true,
                supports_framebuffer_fetch: false,
                max_fragment_textures: 32,
                supported_sample_counts: vec![
                    SampleCount::X1,
                    SampleCount::X2,
                    SampleCount::X4,
                    SampleCount::X8,
                ],
            },
            GraphicsBackend::Vulkan => Self {
                supports_async_pipeline_creation: false,
                supports_framebuffer_fetch: true,
                max_fragment_textures: 16,
                supported_sample_counts: vec![
                    SampleCount::X1,
                    SampleCount::X2,
                    SampleCount::X4,
                    SampleCount::X8,
                    SampleCount::X16,
                ],
            },
        }
    }

    /// Returns `true` if render targets with `count` samples are supported.
    pub fn supports_sample_count(&self, count: SampleCount) -> bool {
        self.supported_sample_counts.contains(&count)
    }
}

/// The device/backend instance that owns a set of GPU resources.
///
/// Every resource keeps an `Arc<SharedContext>` so it can be traced back to the
/// device that created it. The context also counts live native pipeline objects,
/// which makes the release of native state observable.
#[derive(Debug)]
pub struct SharedContext {
    backend: GraphicsBackend,
    caps: BackendCaps,
    live_native_pipelines: AtomicUsize,
}

impl SharedContext {
    /// Creates a context for `backend` with the given capabilities.
    pub fn new(backend: GraphicsBackend, caps: BackendCaps) -> Self {
        Self {
            backend,
            caps,
            live_native_pipelines: AtomicUsize::new(0),
        }
    }

    /// Creates a context for `backend` with its typical capabilities.
    pub fn with_default_caps(backend: GraphicsBackend) -> Self {
        Self::new(backend, BackendCaps::for_backend(backend))
    }

    /// The backend this context drives.
    pub fn backend(&self) -> GraphicsBackend {
        self.backend
    }

    /// The device capabilities.
    pub fn caps(&self) -> &BackendCaps {
        &self.caps
    }

    /// Records that a native pipeline object was created.
    pub fn native_pipeline_created(&self) {
        self.live_native_pipelines.fetch_add(1, Ordering::AcqRel);
    }

    /// Records that a native pipeline object was released.
    pub fn native_pipeline_released(&self) {
        let previous = self.live_native_pipelines.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "native pipeline released more often than created");
    }

    /// The number of native pipeline objects currently alive on this device.
    pub fn live_native_pipelines(&self) -> usize {
        self.live_native_pipelines.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_differ_per_backend() {
        let dawn = BackendCaps::for_backend(GraphicsBackend::Dawn);
        let metal = BackendCaps::for_backend(GraphicsBackend::Metal);
        assert!(dawn.supports_async_pipeline_creation);
        assert!(!dawn.supports_framebuffer_fetch);
        assert!(metal.supports_framebuffer_fetch);
        assert!(!metal.supports_sample_count(SampleCount::X8));
        assert!(BackendCaps::for_backend(GraphicsBackend::Vulkan).supports_sample_count(SampleCount::X16));
    }

    #[test]
    fn live_pipeline_counter() {
        let context = SharedContext::with_default_caps(GraphicsBackend::Vulkan);
        assert_eq!(context.live_native_pipelines(), 0);
        context.native_pipeline_created();
        context.native_pipeline_created();
        context.native_pipeline_released();
        assert_eq!(context.live_native_pipelines(), 1);
        assert_eq!(context.backend(), GraphicsBackend::Vulkan);
    }

    #[test]
    fn shading_languages() {
        let languages: Vec<_> = GraphicsBackend::ALL
            .iter()
            .map(GraphicsBackend::shading_language)
            .collect();
        assert_eq!(languages, ["MSL", "WGSL", "HLSL", "SPIR-V"]);
    }
}

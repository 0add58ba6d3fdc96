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


//! Models of the native pipeline objects of each supported API.

use std::any::Any;
use std::sync::Arc;
use vitrum_core::renderer::{
    CreationMode, DstReadRequirement, GraphicsBackend, NativeGraphicsPipeline, RenderPassDesc,
    ShaderDescription, SharedContext, TextureFormat,
};

/// A resource bound by a pipeline, in binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineBinding {
    /// Per-render-step uniform buffer.
    StepUniforms,
    /// Paint-level uniform buffer.
    PaintUniforms,
    /// Storage buffer holding gradient stops.
    GradientBuffer,
    /// A texture/sampler pair used by the paint.
    TextureSampler(u32),
    /// A copy of the destination bound as a texture.
    DstTexture,
    /// The destination read through a subpass input attachment.
    InputAttachment,
}

impl PipelineBinding {
    /// Returns `true` for buffer bindings.
    pub fn is_buffer(&self) -> bool {
        matches!(
            self,
            PipelineBinding::StepUniforms
                | PipelineBinding::PaintUniforms
                | PipelineBinding::GradientBuffer
        )
    }
}

/// Lists the resources `shader` binds when rendering on `backend`.
pub fn pipeline_bindings(
    backend: GraphicsBackend,
    shader: &dyn ShaderDescription,
) -> Vec<PipelineBinding> {
    let mut bindings = Vec::new();
    if shader.has_step_uniforms() {
        bindings.push(PipelineBinding::StepUniforms);
    }
    if shader.has_paint_uniforms() {
        bindings.push(PipelineBinding::PaintUniforms);
    }
    if shader.has_gradient_buffer() {
        bindings.push(PipelineBinding::GradientBuffer);
    }
    bindings.extend((0..shader.num_frag_textures_and_samplers()).map(PipelineBinding::TextureSampler));
    match shader.dst_read_requirement() {
        DstReadRequirement::None => {}
        DstReadRequirement::TextureCopy | DstReadRequirement::TextureSample => {
            bindings.push(PipelineBinding::DstTexture)
        }
        // Metal reads the destination as a fragment input, no binding needed.
        DstReadRequirement::FramebufferFetch => {
            if backend == GraphicsBackend::Vulkan {
                bindings.push(PipelineBinding::InputAttachment);
            }
        }
    }
    bindings
}

/// Metal's separate depth/stencil state object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalDepthStencilState {
    /// Depth writes are enabled.
    pub depth_write_enabled: bool,
    /// The attachment has a stencil aspect.
    pub stencil_enabled: bool,
}

/// A model of `MTLRenderPipelineState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalRenderPipelineState {
    /// The vertex function name.
    pub vertex_function: String,
    /// The fragment function name.
    pub fragment_function: String,
    /// The color attachment's pixel format.
    pub color_pixel_format: TextureFormat,
    /// The depth attachment's pixel format.
    pub depth_attachment_pixel_format: Option<TextureFormat>,
    /// Samples per pixel.
    pub raster_sample_count: u32,
    /// Argument buffer slots used by uniforms and the gradient buffer.
    pub buffer_slots: u32,
    /// Texture slots used by the fragment stage.
    pub texture_slots: u32,
    /// The depth/stencil state, created next to the pipeline state.
    pub depth_stencil_state: Option<MetalDepthStencilState>,
}

/// A bind group layout of a Dawn pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DawnBindGroupLayout {
    /// The bindings of the group.
    pub entries: Vec<PipelineBinding>,
}

/// A model of a Dawn `RenderPipeline` with explicit bind group layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DawnRenderPipeline {
    /// Group 0 holds buffers, group 1 holds textures.
    pub bind_group_layouts: Vec<DawnBindGroupLayout>,
    /// The color target format.
    pub color_target: TextureFormat,
    /// The depth/stencil format.
    pub depth_stencil: Option<TextureFormat>,
    /// Samples per pixel.
    pub multisample_count: u32,
}

/// A model of a D3D12 root signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D3D12RootSignature {
    /// Root constant buffer views.
    pub root_cbvs: u32,
    /// Root shader resource views.
    pub root_srvs: u32,
    /// Entries in the SRV descriptor table.
    pub srv_table_size: u32,
    /// Entries in the sampler descriptor table.
    pub sampler_table_size: u32,
}

/// A model of `ID3D12PipelineState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct D3D12PipelineState {
    /// The root signature the PSO was created against.
    pub root_signature: D3D12RootSignature,
    /// The render target view format.
    pub rtv_format: TextureFormat,
    /// The depth/stencil view format.
    pub dsv_format: Option<TextureFormat>,
    /// `DXGI_SAMPLE_DESC::Count`.
    pub sample_desc_count: u32,
}

/// A Vulkan descriptor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VulkanDescriptorType {
    /// `VK_DESCRIPTOR_TYPE_UNIFORM_BUFFER`.
    UniformBuffer,
    /// `VK_DESCRIPTOR_TYPE_STORAGE_BUFFER`.
    StorageBuffer,
    /// `VK_DESCRIPTOR_TYPE_COMBINED_IMAGE_SAMPLER`.
    CombinedImageSampler,
    /// `VK_DESCRIPTOR_TYPE_INPUT_ATTACHMENT`.
    InputAttachment,
}

/// The render pass properties a Vulkan pipeline must be compatible with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulkanRenderPassCompat {
    /// The color attachment format.
    pub color_format: TextureFormat,
    /// The depth/stencil attachment format.
    pub depth_stencil_format: Option<TextureFormat>,
    /// Samples per pixel.
    pub samples: u32,
    /// The pass exposes the color attachment as an input attachment.
    pub reads_input_attachment: bool,
}

/// A model of a Vulkan graphics `VkPipeline` and its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulkanPipeline {
    /// Descriptor set layouts: set 0 for buffers, set 1 for images.
    pub descriptor_set_layouts: Vec<Vec<VulkanDescriptorType>>,
    /// Render pass compatibility.
    pub render_pass: VulkanRenderPassCompat,
}

/// The native object of one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativePipelineState {
    /// A Metal pipeline state.
    Metal(MetalRenderPipelineState),
    /// A Dawn render pipeline.
    Dawn(DawnRenderPipeline),
    /// A Direct3D 12 pipeline state object.
    Direct3D12(D3D12PipelineState),
    /// A Vulkan pipeline.
    Vulkan(VulkanPipeline),
}

impl NativePipelineState {
    /// Builds the native object `backend` would create for the pair.
    pub fn build(
        backend: GraphicsBackend,
        shader: &dyn ShaderDescription,
        render_pass: &RenderPassDesc,
    ) -> Self {
        let bindings = pipeline_bindings(backend, shader);
        let (buffers, images): (Vec<_>, Vec<_>) =
            bindings.iter().copied().partition(PipelineBinding::is_buffer);
        let samples = render_pass.sample_count.count();

        match backend {
            GraphicsBackend::Metal => NativePipelineState::Metal(MetalRenderPipelineState {
                vertex_function: "vertexMain".to_owned(),
                fragment_function: "fragmentMain".to_owned(),
                color_pixel_format: render_pass.color_format,
                depth_attachment_pixel_format: render_pass.depth_stencil_format,
                raster_sample_count: samples,
                buffer_slots: buffers.len() as u32,
                texture_slots: images.len() as u32,
                depth_stencil_state: render_pass.depth_stencil_format.map(|format| {
                    MetalDepthStencilState {
                        depth_write_enabled: true,
                        stencil_enabled: format.has_stencil(),
                    }
                }),
            }),
            GraphicsBackend::Dawn => NativePipelineState::Dawn(DawnRenderPipeline {
                bind_group_layouts: vec![
                    DawnBindGroupLayout { entries: buffers },
                    DawnBindGroupLayout { entries: images },
                ],
                color_target: render_pass.color_format,
                depth_stencil: render_pass.depth_stencil_format,
                multisample_count: samples,
            }),
            GraphicsBackend::Direct3D12 => {
                let root_srvs = buffers
                    .iter()
                    .filter(|b| **b == PipelineBinding::GradientBuffer)
                    .count() as u32;
                NativePipelineState::Direct3D12(D3D12PipelineState {
                    root_signature: D3D12RootSignature {
                        root_cbvs: buffers.len() as u32 - root_srvs,
                        root_srvs,
                        srv_table_size: images.len() as u32,
                        sampler_table_size: images.len() as u32,
                    },
                    rtv_format: render_pass.color_format,
                    dsv_format: render_pass.depth_stencil_format,
                    sample_desc_count: samples,
                })
            }
            GraphicsBackend::Vulkan => {
                let descriptor_type = |binding: &PipelineBinding| match binding {
                    PipelineBinding::StepUniforms | PipelineBinding::PaintUniforms => {
                        VulkanDescriptorType::UniformBuffer
                    }
                    PipelineBinding::GradientBuffer => VulkanDescriptorType::StorageBuffer,
                    PipelineBinding::InputAttachment => VulkanDescriptorType::InputAttachment,
                    PipelineBinding::TextureSampler(_) | PipelineBinding::DstTexture => {
                        VulkanDescriptorType::CombinedImageSampler
                    }
                };
                NativePipelineState::Vulkan(VulkanPipeline {
                    descriptor_set_layouts: vec![
                        buffers.iter().map(descriptor_type).collect(),
                        images.iter().map(descriptor_type).collect(),
                    ],
                    render_pass: VulkanRenderPassCompat {
                        color_format: render_pass.color_format,
                        depth_stencil_format: render_pass.depth_stencil_format,
                        samples,
                        reads_input_attachment: images.contains(&PipelineBinding::InputAttachment),
                    },
                })
            }
        }
    }

    /// The backend the state belongs to.
    pub fn backend(&self) -> GraphicsBackend {
        match self {
            NativePipelineState::Metal(_) => GraphicsBackend::Metal,
            NativePipelineState::Dawn(_) => GraphicsBackend::Dawn,
            NativePipelineState::Direct3D12(_) => GraphicsBackend::Direct3D12,
            NativePipelineState::Vulkan(_) => GraphicsBackend::Vulkan,
        }
    }
}

/// The headless backend's native pipeline object.
///
/// Creation and release are reported to the owning [`SharedContext`].
#[derive(Debug)]
pub struct HeadlessNativePipeline {
    label: String,
    creation_mode: CreationMode,
    state: NativePipelineState,
    context: Arc<SharedContext>,
}

impl HeadlessNativePipeline {
    /// Wraps a built native state and registers it with `context`.
    pub fn new(
        context: Arc<SharedContext>,
        label: impl Into<String>,
        creation_mode: CreationMode,
        state: NativePipelineState,
    ) -> Self {
        context.native_pipeline_created();
        Self {
            label: label.into(),
            creation_mode,
            state,
            context,
        }
    }

    /// Whether the object was compiled on the calling thread or on the worker.
    pub fn creation_mode(&self) -> CreationMode {
        self.creation_mode
    }

    /// The backend-specific state.
    pub fn state(&self) -> &NativePipelineState {
        &self.state
    }
}

impl NativeGraphicsPipeline for HeadlessNativePipeline {
    fn backend(&self) -> GraphicsBackend {
        self.state.backend()
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn estimated_size(&self) -> usize {
        let bindings = match &self.state {
            NativePipelineState::Metal(state) => state.buffer_slots + state.texture_slots,
            NativePipelineState::Dawn(state) => state
                .bind_group_layouts
                .iter()
                .map(|group| group.entries.len() as u32)
                .sum(),
            NativePipelineState::Direct3D12(state) => {
                let root = state.root_signature;
                root.root_cbvs + root.root_srvs + root.srv_table_size + root.sampler_table_size
            }
            NativePipelineState::Vulkan(state) => state
                .descriptor_set_layouts
                .iter()
                .map(|set| set.len() as u32)
                .sum(),
        };
        4096 + 256 * bindings as usize
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for HeadlessNativePipeline {
    fn drop(&mut self) {
        log::trace!("HeadlessNativePipeline: Released '{}'", self.label);
        self.context.native_pipeline_released();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrum_core::renderer::{SampleCount, ShaderInfo};

    fn gradient_shader(dst_read: DstReadRequirement) -> ShaderInfo {
        ShaderInfo::builder("Tessellate + LinearGradient")
            .frag_textures_and_samplers(1)
            .paint_uniforms(true)
            .step_uniforms(true)
            .gradient_buffer(true)
            .dst_read_requirement(dst_read)
            .build()
    }

    #[test]
    fn bindings_follow_usage_flags() {
        let bindings = pipeline_bindings(
            GraphicsBackend::Dawn,
            &gradient_shader(DstReadRequirement::TextureCopy),
        );
        assert_eq!(
            bindings,
            vec![
                PipelineBinding::StepUniforms,
                PipelineBinding::PaintUniforms,
                PipelineBinding::GradientBuffer,
                PipelineBinding::TextureSampler(0),
                PipelineBinding::DstTexture,
            ]
        );
    }

    #[test]
    fn framebuffer_fetch_needs_an_input_attachment_only_on_vulkan() {
        let shader = gradient_shader(DstReadRequirement::FramebufferFetch);
        assert!(pipeline_bindings(GraphicsBackend::Vulkan, &shader)
            .contains(&PipelineBinding::InputAttachment));
        assert!(!pipeline_bindings(GraphicsBackend::Metal, &shader)
            .contains(&PipelineBinding::InputAttachment));
    }

    #[test]
    fn each_backend_builds_its_own_model() {
        let shader = gradient_shader(DstReadRequirement::None);
        let pass = RenderPassDesc::new(TextureFormat::Bgra8Unorm)
            .with_depth_stencil(TextureFormat::Depth24PlusStencil8)
            .with_sample_count(SampleCount::X4);

        for backend in GraphicsBackend::ALL {
            assert_eq!(NativePipelineState::build(backend, &shader, &pass).backend(), backend);
        }

        match NativePipelineState::build(GraphicsBackend::Metal, &shader, &pass) {
            NativePipelineState::Metal(state) => {
                assert_eq!(state.buffer_slots, 3);
                assert_eq!(state.texture_slots, 1);
                assert_eq!(state.raster_sample_count, 4);
                assert!(state.depth_stencil_state.unwrap().stencil_enabled);
            }
            other => panic!("expected a Metal state, got {other:?}"),
        }

        match NativePipelineState::build(GraphicsBackend::Direct3D12, &shader, &pass) {
            NativePipelineState::Direct3D12(state) => {
                assert_eq!(state.root_signature.root_cbvs, 2);
                assert_eq!(state.root_signature.root_srvs, 1);
                assert_eq!(state.root_signature.srv_table_size, 1);
            }
            other => panic!("expected a D3D12 state, got {other:?}"),
        }

        match NativePipelineState::build(GraphicsBackend::Vulkan, &shader, &pass) {
            NativePipelineState::Vulkan(pipeline) => {
                assert_eq!(
                    pipeline.descriptor_set_layouts[0],
                    vec![
                        VulkanDescriptorType::UniformBuffer,
                        VulkanDescriptorType::UniformBuffer,
                        VulkanDescriptorType::StorageBuffer,
                    ]
                );
                assert!(!pipeline.render_pass.reads_input_attachment);
            }
            other => panic!("expected a Vulkan pipeline, got {other:?}"),
        }
    }

    #[test]
    fn native_objects_report_creation_and_release() {
        let context = Arc::new(SharedContext::with_default_caps(GraphicsBackend::Dawn));
        let state = NativePipelineState::build(
            GraphicsBackend::Dawn,
            &gradient_shader(DstReadRequirement::None),
            &RenderPassDesc::new(TextureFormat::Rgba8Unorm),
        );
        let native =
            HeadlessNativePipeline::new(context.clone(), "dawn", CreationMode::Asynchronous, state);
        assert_eq!(context.live_native_pipelines(), 1);
        assert_eq!(native.creation_mode(), CreationMode::Asynchronous);
        assert_eq!(native.estimated_size(), 4096 + 256 * 4);
        drop(native);
        assert_eq!(context.live_native_pipelines(), 0);
    }
}

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

//! The backend seam that turns a shader description into a pipeline.

use crate::renderer::api::*;
use crate::renderer::error::PipelineError;
use std::fmt::Debug;
use std::sync::Arc;

/// Builds [`GraphicsPipeline`]s for a single backend.
///
/// The pipeline cache is the only caller: it invokes the factory on a cache miss
/// and takes ownership of the result.
pub trait GraphicsPipelineFactory: Send + Sync + Debug + 'static {
    /// The backend this factory builds for.
    fn backend(&self) -> GraphicsBackend;

    /// The device the built pipelines belong to.
    fn shared_context(&self) -> &Arc<SharedContext>;

    /// Builds a pipeline for `shader` rendering into `render_pass`.
    /// ## Arguments
    /// * `shader` - The resolved shader description of the draw technique.
    /// * `render_pass` - The render-target configuration the pipeline must be compatible with.
    /// * `flags` - Creation modifiers, e.g. forcing synchronous creation for precompilation.
    /// ## Returns
    /// The finished pipeline. On failure no pipeline exists.
    /// ## Errors
    /// * `PipelineError` - If the backend cannot build the native object.
    fn create_graphics_pipeline(
        &self,
        shader: &ShaderInfo,
        render_pass: &RenderPassDesc,
        flags: PipelineCreationFlags,
    ) -> Result<GraphicsPipeline, PipelineError>;
}

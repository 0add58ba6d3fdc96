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

//! The seam that resolves a draw configuration to a shader description.

use crate::renderer::api::*;
use crate::renderer::error::ShaderError;
use std::fmt::Debug;

/// Produces shader descriptions for draw configurations.
pub trait ShaderGenerator: Send + Sync + Debug + 'static {
    /// Describes the shaders needed to draw `desc` into `render_pass`.
    /// ## Errors
    /// * `ShaderError` - If the configuration cannot be expressed.
    fn generate(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Result<ShaderInfo, ShaderError>;
}

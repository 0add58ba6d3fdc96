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


//! Defines the seams between the pipeline core and its collaborators.
//!
//! - [`GraphicsPipelineFactory`]: Builds native pipelines for one backend.
//! - [`ShaderGenerator`]: Describes the shaders for a draw configuration.

mod graphics_pipeline_factory;
mod shader_generator;

pub use self::graphics_pipeline_factory::GraphicsPipelineFactory;
pub use self::shader_generator::ShaderGenerator;

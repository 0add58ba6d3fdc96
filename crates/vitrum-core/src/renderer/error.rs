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


//! Defines the error types for shader generation and pipeline creation.

use crate::renderer::api::core::GraphicsBackend;
use crate::renderer::api::pipeline::{DstReadRequirement, RenderStepId};
use crate::renderer::api::util::SampleCount;
use std::fmt;
use std::time::Duration;

/// An error raised by the shader generation stage while describing a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The generator could not produce shader code for the requested configuration.
    GenerationFailed {
        /// A descriptive label for the shader, if available.
        label: String,
        /// Detailed error messages from the generator.
        details: String,
    },
    /// The draw configuration referenced a render step the generator does not know.
    UnknownRenderStep(RenderStepId),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::GenerationFailed { label, details } => {
                write!(f, "Shader generation failed for '{label}': {details}")
            }
            ShaderError::UnknownRenderStep(id) => {
                write!(f, "Unknown render step: {id:?}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation of a graphics pipeline.
///
/// A failed creation never yields a pipeline resource; the caller decides how to
/// handle the missing pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The shader description for the pipeline could not be produced.
    Shader(ShaderError),
    /// The graphics backend failed to compile the full pipeline state object.
    CompilationFailed {
        /// A descriptive label for the pipeline.
        label: String,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// The render target's sample count is not supported by the backend.
    UnsupportedSampleCount {
        /// The backend that rejected the sample count.
        backend: GraphicsBackend,
        /// The requested sample count.
        count: SampleCount,
    },
    /// A required graphics feature is not supported by the device.
    FeatureNotSupported(String),
    /// The pipeline binds more fragment textures and samplers than the device allows.
    TooManyTextureBindings {
        /// The number of bindings the shader declares.
        requested: u32,
        /// The device limit.
        max: u32,
    },
    /// The shader reads the destination in a way the render pass does not provide.
    DstReadMismatch {
        /// What the shader needs.
        required: DstReadRequirement,
        /// What the render pass was set up for.
        strategy: DstReadRequirement,
    },
    /// An asynchronous compile did not finish in time.
    CompilationTimedOut {
        /// A descriptive label for the pipeline.
        label: String,
        /// How long the caller waited.
        timeout: Duration,
    },
    /// The background compile worker is no longer running.
    WorkerDisconnected,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Shader(err) => write!(f, "Pipeline shader error: {err}"),
            PipelineError::CompilationFailed { label, details } => {
                write!(f, "Pipeline compilation failed for '{label}': {details}")
            }
            PipelineError::UnsupportedSampleCount { backend, count } => {
                write!(
                    f,
                    "Sample count {} is not supported by the {backend:?} backend",
                    count.count()
                )
            }
            PipelineError::FeatureNotSupported(msg) => {
                write!(f, "Feature not supported: {msg}")
            }
            PipelineError::TooManyTextureBindings { requested, max } => {
                write!(
                    f,
                    "Pipeline requests {requested} fragment textures and samplers, the device allows {max}"
                )
            }
            PipelineError::DstReadMismatch { required, strategy } => {
                write!(
                    f,
                    "Pipeline reads the destination with {required:?} but the render pass provides {strategy:?}"
                )
            }
            PipelineError::CompilationTimedOut { label, timeout } => {
                write!(
                    f,
                    "Pipeline compilation for '{label}' timed out after {} ms",
                    timeout.as_millis()
                )
            }
            PipelineError::WorkerDisconnected => {
                write!(f, "The pipeline compile worker has shut down.")
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for PipelineError {
    fn from(err: ShaderError) -> Self {
        PipelineError::Shader(err)
    }
}

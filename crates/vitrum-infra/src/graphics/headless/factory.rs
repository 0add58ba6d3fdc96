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


use super::native::{HeadlessNativePipeline, NativePipelineState};
#[cfg(feature = "diagnostics")]
use super::translate::native_shader_sources;
use crate::graphics::worker::CompileWorker;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vitrum_core::renderer::{
    CreationMode, DstReadRequirement, GraphicsBackend, GraphicsPipeline, GraphicsPipelineFactory,
    PipelineCreationFlags, PipelineError, PipelineInfo, PipelineSettings, RenderPassDesc,
    ShaderDescription, ShaderInfo, SharedContext,
};

/// Builds [`GraphicsPipeline`]s backed by [`HeadlessNativePipeline`]s.
///
/// When both the settings and the device allow it, builds run on a dedicated
/// [`CompileWorker`] and the caller waits up to the configured timeout.
/// Precompilation requests always build on the calling thread.
#[derive(Debug)]
pub struct HeadlessPipelineFactory {
    context: Arc<SharedContext>,
    settings: PipelineSettings,
    worker: Option<CompileWorker>,
    simulated_compile_time: Option<Duration>,
}

impl HeadlessPipelineFactory {
    /// Creates a factory for a device with the default capabilities of `backend`.
    /// ## Errors
    /// * If the compile worker thread cannot be started.
    pub fn new(backend: GraphicsBackend, settings: PipelineSettings) -> anyhow::Result<Self> {
        Self::with_context(Arc::new(SharedContext::with_default_caps(backend)), settings)
    }

    /// Creates a factory building for an existing device.
    /// ## Errors
    /// * If the compile worker thread cannot be started.
    pub fn with_context(
        context: Arc<SharedContext>,
        settings: PipelineSettings,
    ) -> anyhow::Result<Self> {
        let wants_async = settings.use_async_pipeline_creation
            && context.caps().supports_async_pipeline_creation;
        let worker = if wants_async {
            let name = format!("vitrum-{:?}-compile", context.backend()).to_lowercase();
            Some(CompileWorker::spawn(name).context("Failed to start the pipeline compile worker")?)
        } else {
            None
        };

        log::info!(
            "HeadlessPipelineFactory: {:?} backend ready (async creation: {}).",
            context.backend(),
            wants_async
        );

        Ok(Self {
            context,
            settings,
            worker,
            simulated_compile_time: None,
        })
    }

    /// Creates a factory with settings read from a JSON file.
    /// ## Errors
    /// * If the file cannot be read or parsed, or the worker cannot be started.
    pub fn from_settings_file(backend: GraphicsBackend, path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let settings = PipelineSettings::from_json_file(path)?;
        Self::new(backend, settings)
    }

    /// Makes every native build take at least `duration`, as a driver compile would.
    #[must_use]
    pub fn with_simulated_compile_time(mut self, duration: Duration) -> Self {
        self.simulated_compile_time = Some(duration);
        self
    }

    /// The settings the factory was created with.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The mode a build with `flags` would use.
    pub fn creation_mode(&self, flags: PipelineCreationFlags) -> CreationMode {
        CreationMode::resolve(flags, self.worker.is_some())
    }

    fn validate(&self, shader: &ShaderInfo, render_pass: &RenderPassDesc) -> Result<(), PipelineError> {
        let caps = self.context.caps();

        if !caps.supports_sample_count(render_pass.sample_count) {
            return Err(PipelineError::UnsupportedSampleCount {
                backend: self.context.backend(),
                count: render_pass.sample_count,
            });
        }

        if shader.dst_read_requirement() == DstReadRequirement::FramebufferFetch
            && !caps.supports_framebuffer_fetch
        {
            return Err(PipelineError::FeatureNotSupported(format!(
                "framebuffer fetch on {:?}",
                self.context.backend()
            )));
        }

        let required = shader.dst_read_requirement();
        if required.needs_dst_read() && render_pass.dst_read_strategy != required {
            return Err(PipelineError::DstReadMismatch {
                required,
                strategy: render_pass.dst_read_strategy,
            });
        }

        let max = caps.max_fragment_textures.min(self.settings.max_fragment_textures);
        let requested = shader.num_frag_textures_and_samplers();
        if requested > max {
            return Err(PipelineError::TooManyTextureBindings { requested, max });
        }

        Ok(())
    }

    fn build_native_state(
        &self,
        mode: CreationMode,
        shader: &ShaderInfo,
        render_pass: &RenderPassDesc,
    ) -> Result<NativePipelineState, PipelineError> {
        let backend = self.context.backend();
        let delay = self.simulated_compile_time;

        let worker = match (mode, &self.worker) {
            (CreationMode::Asynchronous, Some(worker)) => worker,
            _ => {
                if let Some(delay) = delay {
                    thread::sleep(delay);
                }
                return Ok(NativePipelineState::build(backend, shader, render_pass));
            }
        };

        let job_shader = shader.clone();
        let job_render_pass = *render_pass;
        let receiver = worker.submit(move || {
            if let Some(delay) = delay {
                thread::sleep(delay);
            }
            NativePipelineState::build(backend, &job_shader, &job_render_pass)
        })?;

        let timeout = self.settings.async_compile_timeout();
        receiver.recv_timeout(timeout).map_err(|err| match err {
            flume::RecvTimeoutError::Timeout => {
                log::warn!(
                    "HeadlessPipelineFactory: '{}' did not compile within {:?}.",
                    shader.label(),
                    timeout
                );
                PipelineError::CompilationTimedOut {
                    label: shader.label().to_owned(),
                    timeout,
                }
            }
            flume::RecvTimeoutError::Disconnected => PipelineError::WorkerDisconnected,
        })
    }
}

impl GraphicsPipelineFactory for HeadlessPipelineFactory {
    fn backend(&self) -> GraphicsBackend {
        self.context.backend()
    }

    fn shared_context(&self) -> &Arc<SharedContext> {
        &self.context
    }

    fn create_graphics_pipeline(
        &self,
        shader: &ShaderInfo,
        render_pass: &RenderPassDesc,
        flags: PipelineCreationFlags,
    ) -> Result<GraphicsPipeline, PipelineError> {
        self.validate(shader, render_pass).inspect_err(|err| {
            log::error!("HeadlessPipelineFactory: Rejected '{}': {err}", shader.label());
        })?;

        let mode = self.creation_mode(flags);
        let state = self.build_native_state(mode, shader, render_pass)?;
        log::trace!(
            "HeadlessPipelineFactory: Built '{}' ({:?}).",
            shader.label(),
            mode
        );

        let info = PipelineInfo::new(shader, flags);
        #[cfg(feature = "diagnostics")]
        let info = {
            let (vertex, fragment) = native_shader_sources(self.context.backend(), shader);
            info.with_native_shaders(vertex, fragment)
        };
        let native = HeadlessNativePipeline::new(self.context.clone(), shader.label(), mode, state);

        Ok(GraphicsPipeline::new(self.context.clone(), info, Box::new(native)))
    }
}

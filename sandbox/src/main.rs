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


use std::sync::Arc;
use vitrum_core::renderer::*;
use vitrum_infra::{logging, HeadlessPipelineFactory};

#[derive(Debug)]
struct DemoGenerator;

impl ShaderGenerator for DemoGenerator {
    fn generate(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Result<ShaderInfo, ShaderError> {
        Ok(ShaderInfo::builder(format!("demo-step{}", desc.render_step.0))
            .sources("vertex main", "fragment main")
            .dst_read_requirement(render_pass.dst_read_strategy)
            .step_uniforms(true)
            .paint_uniforms(desc.paint_params.is_valid())
            .frag_textures_and_samplers(desc.render_step.0 % 3)
            .build())
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    // An optional settings file path, otherwise defaults.
    let settings = match std::env::args().nth(1) {
        Some(path) => PipelineSettings::from_json_file(path)?,
        None => PipelineSettings::default(),
    };

    let pass = RenderPassDesc::new(TextureFormat::Bgra8Unorm)
        .with_depth_stencil(TextureFormat::Depth24PlusStencil8);

    for backend in GraphicsBackend::ALL {
        let factory = Arc::new(HeadlessPipelineFactory::new(backend, settings.clone())?);
        let cache = GraphicsPipelineCache::new(Arc::new(DemoGenerator), factory);

        for step in 0..4 {
            let desc = GraphicsPipelineDesc::new(RenderStepId(step), UniquePaintParamsId(step));
            cache.precompile(&desc, &pass)?;
            let pipeline = cache.find_or_create(&desc, &pass)?;
            log::info!(
                "{backend:?}: step {step} -> {} textures, {} bytes",
                pipeline.num_frag_textures_and_samplers(),
                pipeline.gpu_memory_size()
            );
        }

        log::info!("{backend:?}: {:?}", cache.stats());
    }

    Ok(())
}

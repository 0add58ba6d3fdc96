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


use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use vitrum_core::renderer::*;

// --- TEST DOUBLES ---

/// Describes every render step as a textured, paint-uniform technique except step 99,
/// which it refuses to generate.
#[derive(Debug, Default)]
struct FixedGenerator;

impl ShaderGenerator for FixedGenerator {
    fn generate(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Result<ShaderInfo, ShaderError> {
        if desc.render_step == RenderStepId(99) {
            return Err(ShaderError::UnknownRenderStep(desc.render_step));
        }
        Ok(ShaderInfo::builder(format!("step{}", desc.render_step.0))
            .sources("vertex main", "fragment main")
            .dst_read_requirement(render_pass.dst_read_strategy)
            .frag_textures_and_samplers(2)
            .paint_uniforms(desc.paint_params.is_valid())
            .step_uniforms(false)
            .gradient_buffer(false)
            .build())
    }
}

/// Holds the generation of one render step until the test releases it.
#[derive(Debug)]
struct GatedGenerator {
    gated_step: RenderStepId,
    started: Barrier,
    release: Barrier,
}

impl GatedGenerator {
    fn new(gated_step: RenderStepId) -> Self {
        Self {
            gated_step,
            started: Barrier::new(2),
            release: Barrier::new(2),
        }
    }
}

impl ShaderGenerator for GatedGenerator {
    fn generate(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Result<ShaderInfo, ShaderError> {
        if desc.render_step == self.gated_step {
            self.started.wait();
            self.release.wait();
        }
        FixedGenerator.generate(desc, render_pass)
    }
}

#[derive(Debug)]
struct CountingNative {
    label: String,
    flags: PipelineCreationFlags,
    context: Arc<SharedContext>,
}

impl NativeGraphicsPipeline for CountingNative {
    fn backend(&self) -> GraphicsBackend {
        GraphicsBackend::Vulkan
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for CountingNative {
    fn drop(&mut self) {
        self.context.native_pipeline_released();
    }
}

#[derive(Debug)]
struct CountingFactory {
    context: Arc<SharedContext>,
    builds: AtomicUsize,
    seen_flags: Mutex<Vec<PipelineCreationFlags>>,
}

impl CountingFactory {
    fn new() -> Self {
        Self {
            context: Arc::new(SharedContext::with_default_caps(GraphicsBackend::Vulkan)),
            builds: AtomicUsize::new(0),
            seen_flags: Mutex::new(Vec::new()),
        }
    }
}

impl GraphicsPipelineFactory for CountingFactory {
    fn backend(&self) -> GraphicsBackend {
        GraphicsBackend::Vulkan
    }

    fn shared_context(&self) -> &Arc<SharedContext> {
        &self.context
    }

    fn create_graphics_pipeline(
        &self,
        shader: &ShaderInfo,
        _render_pass: &RenderPassDesc,
        flags: PipelineCreationFlags,
    ) -> Result<GraphicsPipeline, PipelineError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.seen_flags.lock().unwrap().push(flags);
        self.context.native_pipeline_created();
        let native = CountingNative {
            label: shader.label().to_owned(),
            flags,
            context: Arc::clone(&self.context),
        };
        Ok(GraphicsPipeline::new(
            Arc::clone(&self.context),
            PipelineInfo::new(shader, flags),
            Box::new(native),
        ))
    }
}

fn setup() -> (Arc<CountingFactory>, GraphicsPipelineCache) {
    let factory = Arc::new(CountingFactory::new());
    let cache = GraphicsPipelineCache::new(Arc::new(FixedGenerator), factory.clone());
    (factory, cache)
}

fn solid_fill() -> GraphicsPipelineDesc {
    GraphicsPipelineDesc::new(RenderStepId(1), UniquePaintParamsId(10))
}

fn main_pass() -> RenderPassDesc {
    RenderPassDesc::new(TextureFormat::Rgba8Unorm).with_depth_stencil(TextureFormat::Depth32Float)
}

// --- TESTS ---

#[test]
fn miss_builds_once_and_hits_share_the_pipeline() {
    let (factory, cache) = setup();

    let first = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();
    let second = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(
        cache.stats(),
        PipelineCacheStats {
            hits: 1,
            misses: 1,
            creation_failures: 0
        }
    );
}

#[test]
fn different_render_pass_builds_a_distinct_pipeline() {
    let (factory, cache) = setup();
    let msaa = main_pass().with_sample_count(SampleCount::X4);

    let single = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();
    let multi = cache.find_or_create(&solid_fill(), &msaa).unwrap();

    assert!(!Arc::ptr_eq(&single, &multi));
    assert_eq!(factory.builds.load(Ordering::SeqCst), 2);
    assert!(cache.find(&solid_fill(), &msaa).is_some());
}

#[test]
fn accessors_match_the_generated_description() {
    let (_factory, cache) = setup();
    let pass = main_pass().with_dst_read_strategy(DstReadRequirement::TextureCopy);

    let pipeline = cache.find_or_create(&solid_fill(), &pass).unwrap();
    let expected = PipelineInfo::new(
        &FixedGenerator.generate(&solid_fill(), &pass).unwrap(),
        PipelineCreationFlags::NONE,
    );

    assert_eq!(pipeline.pipeline_info(), &expected);
    assert_eq!(pipeline.dst_read_requirement(), DstReadRequirement::TextureCopy);
    assert_eq!(pipeline.num_frag_textures_and_samplers(), 2);
    assert!(pipeline.has_paint_uniforms());
    assert!(!pipeline.has_step_uniforms());
    assert!(!pipeline.has_gradient_buffer());
    assert_eq!(pipeline.resource_type(), GraphicsPipeline::RESOURCE_TYPE);
}

#[test]
fn precompile_passes_the_precompilation_flag() {
    let (factory, cache) = setup();

    let precompiled = cache.precompile(&solid_fill(), &main_pass()).unwrap();
    // A later regular lookup reuses the precompiled pipeline.
    let reused = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();

    assert!(Arc::ptr_eq(&precompiled, &reused));
    assert_eq!(
        *factory.seen_flags.lock().unwrap(),
        vec![PipelineCreationFlags::FOR_PRECOMPILATION]
    );
    let native = precompiled.native_as::<CountingNative>().unwrap();
    assert_eq!(native.flags, PipelineCreationFlags::FOR_PRECOMPILATION);
}

#[test]
fn failed_generation_caches_nothing() {
    let (factory, cache) = setup();
    let broken = GraphicsPipelineDesc::new(RenderStepId(99), UniquePaintParamsId(0));

    let err = cache.find_or_create(&broken, &main_pass()).unwrap_err();

    assert_eq!(
        err,
        PipelineError::Shader(ShaderError::UnknownRenderStep(RenderStepId(99)))
    );
    assert!(cache.is_empty());
    assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
    assert_eq!(cache.stats().creation_failures, 1);
}

#[test]
fn purge_releases_only_unreferenced_pipelines() {
    let (factory, cache) = setup();
    let depth_only = GraphicsPipelineDesc::new(RenderStepId(2), UniquePaintParamsId::INVALID);

    let held = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();
    cache.find_or_create(&depth_only, &main_pass()).unwrap();
    assert_eq!(factory.context.live_native_pipelines(), 2);

    let purged = cache.purge_unreferenced();

    assert_eq!(purged, 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(factory.context.live_native_pipelines(), 1);

    // The held pipeline survives clearing the cache until the last reference goes.
    cache.clear();
    assert_eq!(factory.context.live_native_pipelines(), 1);
    drop(held);
    assert_eq!(factory.context.live_native_pipelines(), 0);
}

#[test]
fn concurrent_lookups_build_each_key_once() {
    let (factory, cache) = setup();
    let cache = Arc::new(cache);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.find_or_create(&solid_fill(), &main_pass()).unwrap())
        })
        .collect();
    let pipelines: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    assert!(pipelines.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn hits_do_not_wait_on_an_unrelated_build() {
    let factory = Arc::new(CountingFactory::new());
    let generator = Arc::new(GatedGenerator::new(RenderStepId(7)));
    let cache = Arc::new(GraphicsPipelineCache::new(generator.clone(), factory.clone()));
    let slow = GraphicsPipelineDesc::new(RenderStepId(7), UniquePaintParamsId(3));

    let warm = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();

    let builder = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.find_or_create(&slow, &main_pass()).unwrap())
    };
    generator.started.wait();

    // The slow build is in progress: it is not visible yet, and hits still go through.
    assert!(cache.find(&slow, &main_pass()).is_none());
    assert_eq!(cache.len(), 1);
    let (sender, receiver) = mpsc::channel();
    {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            let hit = cache.find_or_create(&solid_fill(), &main_pass()).unwrap();
            sender.send(hit).unwrap();
        });
    }
    let hit = receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("a cache hit waited on an unrelated build");
    assert!(Arc::ptr_eq(&hit, &warm));

    generator.release.wait();
    let built = builder.join().unwrap();

    assert_eq!(cache.len(), 2);
    assert!(Arc::ptr_eq(&cache.find(&slow, &main_pass()).unwrap(), &built));
    assert_eq!(factory.builds.load(Ordering::SeqCst), 2);
}

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


//! Resolves pipeline keys to shared pipelines, building them on a miss.

use super::creation_flags::PipelineCreationFlags;
use super::desc::{GraphicsPipelineDesc, PipelineKey, RenderPassDesc};
use super::graphics_pipeline::GraphicsPipeline;
use crate::renderer::error::PipelineError;
use crate::renderer::traits::{GraphicsPipelineFactory, ShaderGenerator};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

type BuildResult = Result<Arc<GraphicsPipeline>, PipelineError>;

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineCacheStats {
    /// Lookups answered from the cache, including those that waited on a build
    /// already running for the same key.
    pub hits: u64,
    /// Lookups that required building a pipeline.
    pub misses: u64,
    /// Builds that failed and produced no pipeline.
    pub creation_failures: u64,
}

/// A build running on some thread, shared with lookups of the same key.
#[derive(Debug, Default)]
struct InFlight {
    result: Mutex<Option<BuildResult>>,
    done: Condvar,
}

impl InFlight {
    fn wait(&self) -> BuildResult {
        let mut result = self.result.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(outcome) = result.as_ref() {
                return outcome.clone();
            }
            result = self.done.wait(result).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn complete(&self, outcome: BuildResult) {
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
        self.done.notify_all();
    }
}

#[derive(Debug)]
enum CacheEntry {
    Ready(Arc<GraphicsPipeline>),
    Building(Arc<InFlight>),
}

enum Lookup {
    Hit(Arc<GraphicsPipeline>),
    Wait(Arc<InFlight>),
    Build(Arc<InFlight>),
}

/// Publishes the outcome of a build to the map and to waiting lookups.
///
/// Dropped without an outcome (the build panicked), it withdraws the slot and
/// fails the waiters.
struct BuildSlot<'a> {
    cache: &'a GraphicsPipelineCache,
    key: PipelineKey,
    in_flight: Arc<InFlight>,
    published: bool,
}

impl BuildSlot<'_> {
    fn publish(&mut self, outcome: BuildResult) {
        self.published = true;
        {
            let mut pipelines = self.cache.lock_pipelines();
            let ours = matches!(
                pipelines.get(&self.key),
                Some(CacheEntry::Building(slot)) if Arc::ptr_eq(slot, &self.in_flight)
            );
            match &outcome {
                Ok(pipeline) => {
                    pipelines.insert(self.key, CacheEntry::Ready(Arc::clone(pipeline)));
                }
                Err(_) if ours => {
                    pipelines.remove(&self.key);
                }
                Err(_) => {}
            }
        }
        self.in_flight.complete(outcome);
    }
}

impl Drop for BuildSlot<'_> {
    fn drop(&mut self) {
        if !self.published {
            log::error!("GraphicsPipelineCache: Build for {:?} panicked.", self.key);
            self.publish(Err(PipelineError::CompilationFailed {
                label: format!("{:?}", self.key.desc),
                details: "the pipeline build panicked".to_owned(),
            }));
        }
    }
}

/// Owns every graphics pipeline of a device and hands out shared references.
///
/// Each [`PipelineKey`] maps to at most one pipeline. The cache holds one strong
/// reference to every entry; draws hold further clones while they need the
/// pipeline. Entries stay until [`purge_unreferenced`](Self::purge_unreferenced)
/// or [`clear`](Self::clear) removes them; choosing when to call those is up to
/// the owner.
///
/// The map lock is only held for lookups and inserts. A miss builds outside it,
/// so hits never wait on a compile; lookups of a key that is being built wait
/// for that one build instead of starting another.
#[derive(Debug)]
pub struct GraphicsPipelineCache {
    generator: Arc<dyn ShaderGenerator>,
    factory: Arc<dyn GraphicsPipelineFactory>,
    pipelines: Mutex<HashMap<PipelineKey, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    creation_failures: AtomicU64,
}

impl GraphicsPipelineCache {
    /// Creates an empty cache building pipelines with `factory`.
    pub fn new(
        generator: Arc<dyn ShaderGenerator>,
        factory: Arc<dyn GraphicsPipelineFactory>,
    ) -> Self {
        log::info!(
            "GraphicsPipelineCache initialized for the {:?} backend.",
            factory.backend()
        );
        Self {
            generator,
            factory,
            pipelines: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            creation_failures: AtomicU64::new(0),
        }
    }

    /// The factory used on a miss.
    pub fn factory(&self) -> &Arc<dyn GraphicsPipelineFactory> {
        &self.factory
    }

    /// Returns the pipeline for the pair, building it with the backend's default
    /// creation behavior if it is not cached yet.
    /// ## Errors
    /// * `PipelineError` - If shader generation or the backend build fails. Nothing is cached.
    pub fn find_or_create(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Result<Arc<GraphicsPipeline>, PipelineError> {
        self.find_or_create_with_flags(desc, render_pass, PipelineCreationFlags::NONE)
    }

    /// Like [`find_or_create`](Self::find_or_create), but a miss is built
    /// synchronously as part of a precompilation pass.
    pub fn precompile(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Result<Arc<GraphicsPipeline>, PipelineError> {
        self.find_or_create_with_flags(
            desc,
            render_pass,
            PipelineCreationFlags::FOR_PRECOMPILATION,
        )
    }

    /// Looks up a pipeline without building it. A key still being built is absent.
    pub fn find(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
    ) -> Option<Arc<GraphicsPipeline>> {
        let key = PipelineKey {
            desc: *desc,
            render_pass: *render_pass,
        };
        match self.lock_pipelines().get(&key) {
            Some(CacheEntry::Ready(pipeline)) => Some(Arc::clone(pipeline)),
            _ => None,
        }
    }

    fn find_or_create_with_flags(
        &self,
        desc: &GraphicsPipelineDesc,
        render_pass: &RenderPassDesc,
        flags: PipelineCreationFlags,
    ) -> Result<Arc<GraphicsPipeline>, PipelineError> {
        let key = PipelineKey {
            desc: *desc,
            render_pass: *render_pass,
        };

        let lookup = {
            let mut pipelines = self.lock_pipelines();
            match pipelines.get(&key) {
                Some(CacheEntry::Ready(pipeline)) => Lookup::Hit(Arc::clone(pipeline)),
                Some(CacheEntry::Building(in_flight)) => Lookup::Wait(Arc::clone(in_flight)),
                None => {
                    let in_flight = Arc::new(InFlight::default());
                    pipelines.insert(key, CacheEntry::Building(Arc::clone(&in_flight)));
                    Lookup::Build(in_flight)
                }
            }
        };

        let in_flight = match lookup {
            Lookup::Hit(pipeline) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::trace!("GraphicsPipelineCache: Hit for {key:?}");
                return Ok(pipeline);
            }
            Lookup::Wait(in_flight) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::trace!("GraphicsPipelineCache: Waiting on the build of {key:?}");
                return in_flight.wait();
            }
            Lookup::Build(in_flight) => in_flight,
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut slot = BuildSlot {
            cache: self,
            key,
            in_flight,
            published: false,
        };
        let outcome = self
            .generator
            .generate(desc, render_pass)
            .map_err(PipelineError::from)
            .and_then(|shader| {
                self.factory
                    .create_graphics_pipeline(&shader, render_pass, flags)
            })
            .map(Arc::new);

        match &outcome {
            Ok(_) => log::debug!("GraphicsPipelineCache: Built pipeline for {key:?}"),
            Err(err) => {
                self.creation_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("GraphicsPipelineCache: Failed to build pipeline for {key:?}: {err}");
            }
        }
        slot.publish(outcome.clone());
        outcome
    }

    /// Drops every pipeline nobody outside the cache still references.
    ///
    /// Returns the number of pipelines released. Builds in progress are kept.
    pub fn purge_unreferenced(&self) -> usize {
        let mut pipelines = self.lock_pipelines();
        let before = pipelines.len();
        pipelines.retain(|_, entry| match entry {
            CacheEntry::Ready(pipeline) => Arc::strong_count(pipeline) > 1,
            CacheEntry::Building(_) => true,
        });
        let purged = before - pipelines.len();
        if purged > 0 {
            log::info!("GraphicsPipelineCache: Purged {purged} unreferenced pipelines.");
        }
        purged
    }

    /// Drops the cache's reference to every finished pipeline.
    ///
    /// Pipelines still held by draws stay alive until those references go away.
    /// Builds in progress still land in the cache when they finish.
    pub fn clear(&self) {
        self.lock_pipelines()
            .retain(|_, entry| matches!(entry, CacheEntry::Building(_)));
    }

    /// The number of cached pipelines.
    pub fn len(&self) -> usize {
        self.lock_pipelines()
            .values()
            .filter(|entry| matches!(entry, CacheEntry::Ready(_)))
            .count()
    }

    /// Returns `true` if no pipeline is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of the cache counters.
    pub fn stats(&self) -> PipelineCacheStats {
        PipelineCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            creation_failures: self.creation_failures.load(Ordering::Relaxed),
        }
    }

    fn lock_pipelines(&self) -> MutexGuard<'_, HashMap<PipelineKey, CacheEntry>> {
        self.pipelines.lock().unwrap_or_else(|poisoned| {
            // Entries are only inserted whole, so the map is consistent even after a panic.
            log::warn!("GraphicsPipelineCache: Mutex poisoned, recovering.");
            poisoned.into_inner()
        })
    }
}

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


//! The lifecycle contract every cached GPU resource satisfies.
//!
//! Resources are created by a backend, owned by a cache through an [`Arc`], and
//! handed out to consumers as further `Arc` clones. A resource is reclaimed when
//! the cache drops it and no consumer still holds a reference; releasing native
//! state happens in `Drop`, which runs exactly once.
//!
//! [`Arc`]: std::sync::Arc

use crate::renderer::api::core::SharedContext;
use std::sync::Arc;

/// A GPU resource that can be stored in a resource cache.
pub trait Resource: Send + Sync {
    /// A fixed label naming the resource's category, used by logs and cache tooling.
    fn resource_type(&self) -> &'static str;

    /// The device that owns the resource.
    fn shared_context(&self) -> &Arc<SharedContext>;

    /// An estimate of the GPU memory the resource holds, in bytes.
    fn gpu_memory_size(&self) -> usize {
        0
    }
}

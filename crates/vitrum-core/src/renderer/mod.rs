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


//! Provides the public, backend-agnostic graphics pipeline contracts.
//!
//! This module defines the "what" of pipeline management: the value types that
//! describe a pipeline, the [`GraphicsPipeline`] resource itself, and the traits
//! ([`GraphicsPipelineFactory`], [`ShaderGenerator`]) that concrete backends and
//! shader generation stages implement. The "how", building an actual native
//! pipeline object, lives in a backend crate such as `vitrum-infra`.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{PipelineError, ShaderError};
pub use self::traits::{GraphicsPipelineFactory, ShaderGenerator};

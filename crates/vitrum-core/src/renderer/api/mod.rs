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


//! Backend-agnostic pipeline API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`core`]**: Shared device context, backend capabilities and settings.
//! - **[`draw`]**: The draw-type flag space used to select a rendering technique.
//! - **[`shader`]**: The shader description a pipeline is built from.
//! - **[`pipeline`]**: Pipeline keys, descriptor info, the pipeline resource and its cache.
//! - **[`resource`]**: The lifecycle contract shared by every cached GPU resource.
//! - **[`util`]**: Formats and other small enumerations.

pub mod core;
pub mod draw;
pub mod pipeline;
pub mod resource;
pub mod shader;
pub mod util;

pub use self::core::*;
pub use self::draw::*;
pub use self::pipeline::*;
pub use self::resource::*;
pub use self::shader::*;
pub use self::util::*;

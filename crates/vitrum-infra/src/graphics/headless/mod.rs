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


//! A pipeline backend that builds native pipeline descriptions without a driver.
//!
//! Each supported API gets a model of its own native pipeline object, built with
//! the same validation and creation-mode rules a driver-backed backend follows.
//! It drives the pipeline core in tests, tools and precompilation dry runs.

mod factory;
mod native;
mod translate;

pub use self::factory::HeadlessPipelineFactory;
pub use self::native::*;
pub use self::translate::native_shader_sources;

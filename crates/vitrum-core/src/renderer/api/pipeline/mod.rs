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


//! Graphics pipeline state, descriptors and the pipeline resource.

pub mod cache;
pub mod creation_flags;
pub mod desc;
pub mod dst_read;
pub mod graphics_pipeline;
pub mod info;

pub use self::cache::*;
pub use self::creation_flags::*;
pub use self::desc::*;
pub use self::dst_read::*;
pub use self::graphics_pipeline::*;
pub use self::info::*;

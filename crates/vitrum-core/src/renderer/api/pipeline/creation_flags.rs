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

//! Flags that change how, not what, a pipeline is built.

use crate::vitrum_bitflags;

vitrum_bitflags! {
    /// Modifies how a pipeline is built without changing what it renders.
    pub struct PipelineCreationFlags: u8 {
        /// Use the backend's default construction behavior.
        const NONE = 0b000;
        /// The pipeline is built by a precompilation pass. Forces synchronous
        /// creation even on backends that compile asynchronously by default.
        const FOR_PRECOMPILATION = 0b001;
    }
}

/// Whether a native pipeline is built on the calling thread or off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreationMode {
    /// The call blocks until the native object is ready.
    Synchronous,
    /// The native object is compiled off the calling thread.
    Asynchronous,
}

impl CreationMode {
    /// Picks the creation mode for a build.
    ///
    /// [`PipelineCreationFlags::FOR_PRECOMPILATION`] always wins; otherwise the
    /// backend's preference decides.
    pub const fn resolve(flags: PipelineCreationFlags, backend_prefers_async: bool) -> Self {
        if flags.contains(PipelineCreationFlags::FOR_PRECOMPILATION) || !backend_prefers_async {
            CreationMode::Synchronous
        } else {
            CreationMode::Asynchronous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precompilation_forces_synchronous_creation() {
        assert_eq!(
            CreationMode::resolve(PipelineCreationFlags::FOR_PRECOMPILATION, true),
            CreationMode::Synchronous
        );
        assert_eq!(
            CreationMode::resolve(PipelineCreationFlags::FOR_PRECOMPILATION, false),
            CreationMode::Synchronous
        );
    }

    #[test]
    fn backend_default_applies_without_flags() {
        assert_eq!(
            CreationMode::resolve(PipelineCreationFlags::NONE, true),
            CreationMode::Asynchronous
        );
        assert_eq!(
            CreationMode::resolve(PipelineCreationFlags::NONE, false),
            CreationMode::Synchronous
        );
    }
}

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

//! Pipeline creation settings, loadable from JSON.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for how pipelines are built.
///
/// Missing fields fall back to [`PipelineSettings::default`] when loading from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Compile pipelines off the calling thread when the backend supports it.
    /// Precompilation requests always build synchronously regardless.
    pub use_async_pipeline_creation: bool,
    /// How long to wait for an asynchronous compile before giving up, in milliseconds.
    pub async_compile_timeout_ms: u64,
    /// An upper bound on fragment texture/sampler bindings, applied on top of the device limit.
    pub max_fragment_textures: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            use_async_pipeline_creation: true,
            async_compile_timeout_ms: 5_000,
            max_fragment_textures: 16,
        }
    }
}

impl PipelineSettings {
    /// The asynchronous compile timeout as a [`Duration`].
    pub fn async_compile_timeout(&self) -> Duration {
        Duration::from_millis(self.async_compile_timeout_ms)
    }

    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse pipeline settings")
    }

    /// Loads settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline settings from '{}'", path.display()))?;
        let settings = Self::from_json_str(&json)?;
        log::debug!("Loaded pipeline settings from '{}': {settings:?}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = PipelineSettings::default();
        assert!(settings.use_async_pipeline_creation);
        assert_eq!(settings.async_compile_timeout(), Duration::from_secs(5));
        assert_eq!(settings.max_fragment_textures, 16);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            PipelineSettings::from_json_str(r#"{ "use_async_pipeline_creation": false }"#)
                .expect("valid settings");
        assert!(!settings.use_async_pipeline_creation);
        assert_eq!(settings.async_compile_timeout_ms, 5_000);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = PipelineSettings::from_json_str("{ not json").unwrap_err();
        assert!(err.to_string().contains("pipeline settings"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = PipelineSettings::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}

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


use vitrum_core::renderer::{GraphicsBackend, ShaderDescription};

/// Produces the stand-in native shader text for `shader` on `backend`.
///
/// A driver-backed backend would translate the portable source into the native
/// language here; the headless backend tags the portable text with its target.
pub fn native_shader_sources(
    backend: GraphicsBackend,
    shader: &dyn ShaderDescription,
) -> (String, String) {
    let language = backend.shading_language();
    let vertex = format!(
        "// {language} vertex stage for '{}'\n{}",
        shader.label(),
        shader.vertex_source()
    );
    let fragment = format!(
        "// {language} fragment stage for '{}'\n{}",
        shader.label(),
        shader.fragment_source()
    );
    (vertex, fragment)
}

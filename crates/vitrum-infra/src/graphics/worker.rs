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


//! A background thread that runs pipeline compile jobs.

use std::fmt;
use std::thread::{self, JoinHandle};
use vitrum_core::renderer::PipelineError;

type CompileTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs compile jobs one after another on a dedicated thread.
///
/// Jobs are fed over a `flume` channel and each job answers on its own channel,
/// so callers decide how long to wait for a result. Dropping the worker closes
/// the queue, lets queued jobs finish, and joins the thread.
pub struct CompileWorker {
    name: String,
    sender: Option<flume::Sender<CompileTask>>,
    handle: Option<JoinHandle<()>>,
}

impl CompileWorker {
    /// Starts a worker thread called `name`.
    /// ## Errors
    /// * `std::io::Error` - If the operating system refuses to create the thread.
    pub fn spawn(name: impl Into<String>) -> std::io::Result<Self> {
        let name = name.into();
        let (sender, receiver) = flume::unbounded::<CompileTask>();
        let thread_name = name.clone();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            log::debug!("CompileWorker '{thread_name}' started.");
            while let Ok(task) = receiver.recv() {
                task();
            }
            log::debug!("CompileWorker '{thread_name}' stopped.");
        })?;

        Ok(Self {
            name,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queues `job` and returns the channel its result arrives on.
    /// ## Errors
    /// * `PipelineError::WorkerDisconnected` - If the worker thread is gone.
    pub fn submit<T, F>(&self, job: F) -> Result<flume::Receiver<T>, PipelineError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_sender, result_receiver) = flume::bounded(1);
        let task: CompileTask = Box::new(move || {
            if result_sender.send(job()).is_err() {
                log::trace!("Compile result dropped: the caller stopped waiting.");
            }
        });

        let sender = self.sender.as_ref().ok_or(PipelineError::WorkerDisconnected)?;
        sender.send(task).map_err(|_| {
            log::error!("CompileWorker '{}' is disconnected.", self.name);
            PipelineError::WorkerDisconnected
        })?;
        Ok(result_receiver)
    }

    /// The worker's thread name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CompileWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileWorker")
            .field("name", &self.name)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

impl Drop for CompileWorker {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop once pending jobs are done.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("CompileWorker '{}' panicked.", self.name);
            }
        }
    }
}

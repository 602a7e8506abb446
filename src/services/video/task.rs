use std::future::Future;

use tokio::task::JoinHandle;

/// Owned background task that is aborted when dropped.
///
/// Timers and event pumps are held through this guard so that dropping the
/// player handle that owns them also stops them.
#[derive(Debug)]
pub(crate) struct TaskGuard {
    handle: Option<JoinHandle<()>>,
}

impl TaskGuard {
    /// Spawn `future` on the runtime and guard it.
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    /// Whether the task has run to completion or was aborted.
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Release the task without aborting it.
    ///
    /// Used by a task that replaces its own guard while it is still running.
    pub(crate) fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

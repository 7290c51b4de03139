use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::task::JoinHandle;
use tracing::debug;

/// Owns every subscription and timer task of one wrapper instance.
///
/// `release()` aborts all of them and is safe to call more than once. Tasks
/// spawned after release are aborted immediately. Dropping the last clone
/// aborts whatever is still running.
#[derive(Clone, Default)]
pub struct ResourceHandles {
    inner: Arc<Mutex<HandleSet>>,
}

#[derive(Default)]
struct HandleSet {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
    released: bool,
}

impl ResourceHandles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if set.released {
            handle.abort();
            return;
        }
        set.tasks.retain(|(_, task)| !task.is_finished());
        set.tasks.push((name, handle));
    }

    pub fn release(&self) {
        let mut set = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if set.released {
            return;
        }
        set.released = true;
        for (name, handle) in set.tasks.drain(..) {
            debug!("releasing {name}");
            handle.abort();
        }
    }

    pub fn is_released(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .released
    }

    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tasks
            .iter()
            .filter(|(_, task)| !task.is_finished())
            .count()
    }
}

impl Drop for HandleSet {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn release_aborts_every_task_once() {
        let handles = ResourceHandles::new();
        handles.spawn("first", std::future::pending());
        handles.spawn("second", std::future::pending());
        assert_eq!(handles.active(), 2);

        handles.release();
        handles.release();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(handles.is_released());
        assert_eq!(handles.active(), 0);
    }

    #[tokio::test]
    async fn dropping_the_collection_aborts_tasks() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handles = ResourceHandles::new();
        handles.spawn("holder", async move {
            let _tx = tx;
            std::future::pending::<()>().await;
        });
        drop(handles);

        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn spawn_after_release_is_aborted() {
        let handles = ResourceHandles::new();
        handles.release();
        handles.spawn("late", std::future::pending());
        assert_eq!(handles.active(), 0);
    }
}

//! Single-consumer task queue bound to the UI-owning thread.
//!
//! Other threads never touch the proxy field directly; they post a task
//! through a [`UiHandle`] and the UI thread drains the [`UiQueue`] in FIFO
//! order. Tasks are never reordered or cancelled once posted.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::QueueError;

type Waker = Arc<dyn Fn() + Send + Sync>;

struct Shared<T> {
    tasks: Mutex<Inner<T>>,
    waker: Mutex<Option<Waker>>,
}

struct Inner<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// Consumer end, owned by the UI thread.
pub struct UiQueue<T> {
    shared: Arc<Shared<T>>,
}

/// Cloneable producer end.
pub struct UiHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for UiHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for UiQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UiQueue<T> {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// `wake` runs after every post, e.g. to poke the event loop.
    pub fn with_waker(wake: impl Fn() + Send + Sync + 'static) -> Self {
        Self::build(Some(Arc::new(wake)))
    }

    fn build(waker: Option<Waker>) -> Self {
        Self {
            shared: Arc::new(Shared {
                tasks: Mutex::new(Inner {
                    queue: VecDeque::new(),
                    closed: false,
                }),
                waker: Mutex::new(waker),
            }),
        }
    }

    /// Installs or replaces the waker. Handles already given out use it
    /// from their next post on.
    pub fn set_waker(&self, wake: impl Fn() + Send + Sync + 'static) {
        *self.shared.waker.lock() = Some(Arc::new(wake));
    }

    pub fn handle(&self) -> UiHandle<T> {
        UiHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn pop(&self) -> Option<T> {
        self.shared.tasks.lock().queue.pop_front()
    }

    /// Takes everything queued so far. Tasks posted while the batch runs wait
    /// for the next drain.
    pub fn drain(&self) -> Vec<T> {
        self.shared.tasks.lock().queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.shared.tasks.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops accepting new tasks. Already queued tasks can still be drained.
    pub fn close(&self) {
        self.shared.tasks.lock().closed = true;
    }
}

impl<T> Drop for UiQueue<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> UiHandle<T> {
    pub fn post(&self, task: T) -> Result<(), QueueError> {
        {
            let mut inner = self.shared.tasks.lock();
            if inner.closed {
                return Err(QueueError::Closed);
            }
            inner.queue.push_back(task);
        }
        // run outside the lock so a waker may post or swap itself
        let wake = self.shared.waker.lock().clone();
        if let Some(wake) = wake {
            wake();
        }
        Ok(())
    }
}

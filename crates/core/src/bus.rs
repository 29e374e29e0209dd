//! Typed publish/subscribe channel between the parts of the course-details screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::trace;

use crate::model::{File, FileGroup, NodeId};
use crate::modal::{PostModal, PutDeleteModal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Events exchanged on the course-details screen.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseEvent {
    PostModeChanged(PostModal),
    /// An empty `title` leaves the current title in place.
    PutDeleteModeChanged { mode: PutDeleteModal, title: String },
    FileGroupDeleted(NodeId),
    /// A file group and/or file was picked for renaming.
    FileUpdateTargeted { file_group: Option<FileGroup>, file: Option<File> },
    FilesEditionChanged(bool),
}

struct Inner<E> {
    next_id: AtomicU64,
    // Kept in registration order; that order is the delivery order.
    subscribers: Mutex<Vec<(SubscriptionId, Sender<E>)>>,
}

/// Cloning yields another handle to the same bus.
pub struct NotificationBus<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for NotificationBus<E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<E: Clone> Default for NotificationBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> NotificationBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner { next_id: AtomicU64::new(1), subscribers: Mutex::new(Vec::new()) }),
        }
    }

    pub fn subscribe(&self) -> Subscription<E> {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = unbounded();
        self.inner.subscribers.lock().push((id, tx));
        trace!(subscription = id.0, "subscribed");
        Subscription { id, rx }
    }

    /// Returns whether the id was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.lock();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        before != subs.len()
    }

    /// Hands a copy of `event` to every live subscriber, oldest registration first.
    /// Subscribers whose receiver is gone are dropped. Returns the number reached.
    pub fn publish(&self, event: E) -> usize {
        let mut subs = self.inner.subscribers.lock();
        subs.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        subs.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

pub struct Subscription<E> {
    id: SubscriptionId,
    rx: Receiver<E>,
}

impl<E> Subscription<E> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn try_next(&self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Everything queued so far, in publish order.
    pub fn drain(&self) -> Vec<E> {
        self.rx.try_iter().collect()
    }
}

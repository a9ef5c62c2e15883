//! Reference counted texture handles.
//!
//! Every clone of a [`Handle`] shares one slot. When the last clone goes away
//! the slot reports its id back to the store that issued it, which frees the
//! texture on its next garbage collection.

use std::{
    hash::{Hash, Hasher},
    sync::{mpsc::Sender, Arc, Weak},
};

pub type HandleId = u64;

#[derive(Debug)]
struct Slot {
    id: HandleId,
    released: Sender<HandleId>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        // the store may already be gone
        let _ = self.released.send(self.id);
    }
}

/// Shared reference to a texture held by a [`TextureStore`](crate::asset::TextureStore)
#[derive(Debug, Clone)]
pub struct Handle(Arc<Slot>);

impl Handle {
    pub(crate) fn new(id: HandleId, released: Sender<HandleId>) -> Self {
        Self(Arc::new(Slot { id, released }))
    }

    pub fn id(&self) -> HandleId {
        self.0.id
    }

    /// Number of live clones of this handle
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub(crate) fn downgrade(&self) -> WeakHandle {
        WeakHandle {
            id: self.id(),
            slot: Arc::downgrade(&self.0),
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

/// Handle that does not keep its texture alive
#[derive(Debug, Clone)]
pub(crate) struct WeakHandle {
    id: HandleId,
    slot: Weak<Slot>,
}

impl WeakHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn upgrade(&self) -> Option<Handle> {
        self.slot.upgrade().map(Handle)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;

    #[test]
    fn test_last_clone_reports_release() {
        let (sender, receiver) = channel();
        let handle = Handle::new(7, sender);
        let other = handle.clone();
        assert_eq!(handle, other);
        assert_eq!(handle.strong_count(), 2);

        drop(handle);
        assert!(receiver.try_recv().is_err());
        drop(other);
        assert_eq!(receiver.try_recv(), Ok(7));
    }

    #[test]
    fn test_weak_handle() {
        let (sender, _receiver) = channel();
        let handle = Handle::new(3, sender);
        let weak = handle.downgrade();
        assert_eq!(weak.id(), 3);
        assert_eq!(weak.upgrade(), Some(handle.clone()));
        assert_eq!(handle.strong_count(), 1);

        drop(handle);
        assert!(weak.upgrade().is_none());
    }
}

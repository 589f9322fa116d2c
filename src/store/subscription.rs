//! Active-file listeners.
//!
//! Replaces implicit reactive tracking with an explicit registry: the store
//! fires every listener, in registration order, after the active file has
//! been (re)compiled.

use rustc_hash::FxHashMap;

use crate::file::VirtualFile;

/// Handle returned by [`PlaygroundStore::subscribe`](super::PlaygroundStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&VirtualFile) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: FxHashMap<SubscriptionId, Listener>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub(crate) fn notify(&self, file: &VirtualFile) {
        // FxHashMap has no stable order; ids are monotonic.
        let mut ids: Vec<_> = self.listeners.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(listener) = self.listeners.get(&id) {
                listener(file);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}

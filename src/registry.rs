//! Bookkeeping of open collections per transaction.
//!
//! Every [`ElementCollection`](crate::collection::ElementCollection) is backed
//! by a [`CollectionHandle`] recorded here under the transaction that created
//! it. Closing a handle unregisters it; stopping a transaction drains its
//! entry. An entry stays in the table until [`CollectionRegistry::close_all`]
//! runs for its transaction, so a transaction that produced collections and
//! was never stopped is visible at shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::{engine::SessionId, errors::TypedGraphError, session::GraphContext};

#[derive(Debug)]
pub struct CollectionHandle {
    id: u64,
    session: SessionId,
    closed: AtomicBool,
}

impl CollectionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Marks the handle closed; returns whether it was open.
    pub(crate) fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    /// Closes the handle and unregisters it. Closing twice is a no-op.
    pub fn close(&self, registry: &CollectionRegistry) -> Result<(), TypedGraphError> {
        if self.mark_closed() {
            registry.unregister(self)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct CollectionRegistry {
    inner: Mutex<AHashMap<SessionId, Vec<Arc<CollectionHandle>>>>,
    next_id: AtomicU64,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new handle under the active transaction of `ctx`.
    pub fn register(&self, ctx: &GraphContext) -> Result<Arc<CollectionHandle>, TypedGraphError> {
        let session = ctx
            .transaction()
            .ok_or_else(|| TypedGraphError::invalid_state("transaction has not been started"))?;
        let handle = Arc::new(CollectionHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            session,
            closed: AtomicBool::new(false),
        });
        self.inner
            .lock()
            .entry(session)
            .or_default()
            .push(Arc::clone(&handle));
        Ok(handle)
    }

    pub fn unregister(&self, handle: &CollectionHandle) -> Result<(), TypedGraphError> {
        let mut inner = self.inner.lock();
        let list = inner.get_mut(&handle.session).ok_or_else(|| {
            TypedGraphError::invalid_state("transaction with no collections")
        })?;
        if let Some(position) = list.iter().position(|h| h.id == handle.id) {
            list.remove(position);
        }
        Ok(())
    }

    /// Closes every collection tracked under `session` and drops its entry.
    pub fn close_all(&self, session: SessionId) -> Result<(), TypedGraphError> {
        loop {
            // The lock is released before closing: closing re-enters `unregister`.
            let next = {
                let inner = self.inner.lock();
                inner.get(&session).and_then(|list| list.first().cloned())
            };
            let Some(handle) = next else {
                break;
            };
            handle.mark_closed();
            self.unregister(&handle)?;
        }
        self.inner.lock().remove(&session);
        Ok(())
    }

    /// Number of open collections tracked under `session`.
    pub fn tracked(&self, session: SessionId) -> usize {
        self.inner.lock().get(&session).map_or(0, Vec::len)
    }

    pub fn is_registered(&self, handle: &CollectionHandle) -> bool {
        self.inner
            .lock()
            .get(&handle.session)
            .is_some_and(|list| list.iter().any(|h| h.id == handle.id))
    }

    /// Transactions that still have an entry; zero is required at shutdown.
    pub fn open_transactions(&self) -> usize {
        self.inner.lock().len()
    }
}

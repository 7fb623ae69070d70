use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use crate::{
    element::GraphElement,
    engine::{AttributeId, GraphEngine, Oid, SessionId},
    errors::TypedGraphError,
    registry::{CollectionHandle, CollectionRegistry},
    value::PropertyValue,
};

/// One input of a collection: a selection as returned by the engine, or a
/// selection filtered client-side by attribute equality.
#[derive(Clone, Debug)]
pub enum Source {
    Objects(Vec<Oid>),
    Filtered {
        objects: Vec<Oid>,
        attribute: AttributeId,
        value: PropertyValue,
    },
}

/// Lazily evaluated result set owned by the transaction that produced it.
///
/// Several sources are read one after the other, each in engine order. The
/// collection is tracked by the graph's registry until it is closed, dropped,
/// or its transaction is stopped; iterating a closed collection yields an
/// invalid-state error.
pub struct ElementCollection<T: GraphElement> {
    handle: Arc<CollectionHandle>,
    sources: Vec<Source>,
    engine: Arc<dyn GraphEngine>,
    registry: Weak<CollectionRegistry>,
    _marker: PhantomData<(T, *const ())>,
}

impl<T: GraphElement> ElementCollection<T> {
    pub(crate) fn new(
        handle: Arc<CollectionHandle>,
        sources: Vec<Source>,
        engine: Arc<dyn GraphEngine>,
        registry: &Arc<CollectionRegistry>,
    ) -> Self {
        Self {
            handle,
            sources,
            engine,
            registry: Arc::downgrade(registry),
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> u64 {
        self.handle.id()
    }

    pub fn transaction(&self) -> SessionId {
        self.handle.session()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn is_composite(&self) -> bool {
        self.sources.len() > 1
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn iter(&self) -> Result<ElementIter<'_, T>, TypedGraphError> {
        if self.is_closed() {
            return Err(closed_error());
        }
        Ok(ElementIter {
            collection: self,
            source: 0,
            position: 0,
            done: false,
        })
    }

    pub fn to_vec(&self) -> Result<Vec<T>, TypedGraphError> {
        self.iter()?.collect()
    }

    /// Closes the collection and unregisters it from its transaction.
    pub fn close(&self) -> Result<(), TypedGraphError> {
        match self.registry.upgrade() {
            Some(registry) => self.handle.close(&registry),
            None => {
                self.handle.mark_closed();
                Ok(())
            }
        }
    }
}

impl<T: GraphElement> Drop for ElementCollection<T> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("failed to close collection {}: {err}", self.handle.id());
        }
    }
}

impl<T: GraphElement> std::fmt::Debug for ElementCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementCollection")
            .field("id", &self.handle.id())
            .field("kind", &T::KIND)
            .field("sources", &self.sources.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn closed_error() -> TypedGraphError {
    TypedGraphError::invalid_state("collection is closed")
}

/// Forward-only iterator chaining the sources of a collection.
pub struct ElementIter<'a, T: GraphElement> {
    collection: &'a ElementCollection<T>,
    source: usize,
    position: usize,
    done: bool,
}

impl<T: GraphElement> Iterator for ElementIter<'_, T> {
    type Item = Result<T, TypedGraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let collection = self.collection;
        if collection.is_closed() {
            self.done = true;
            return Some(Err(closed_error()));
        }
        while let Some(source) = collection.sources.get(self.source) {
            match source {
                Source::Objects(oids) => {
                    if let Some(&oid) = oids.get(self.position) {
                        self.position += 1;
                        return Some(Ok(T::from_id(oid)));
                    }
                }
                Source::Filtered {
                    objects,
                    attribute,
                    value,
                } => {
                    while let Some(&oid) = objects.get(self.position) {
                        self.position += 1;
                        let stored = collection.engine.attribute_value(
                            collection.transaction(),
                            oid,
                            *attribute,
                        );
                        match stored {
                            Ok(Some(stored)) if value.matches(&stored) => {
                                return Some(Ok(T::from_id(oid)));
                            }
                            Ok(_) => {}
                            Err(err) => {
                                self.done = true;
                                return Some(Err(err));
                            }
                        }
                    }
                }
            }
            self.source += 1;
            self.position = 0;
        }
        self.done = true;
        None
    }
}

//! Per-caller transaction state.
//!
//! A [`GraphContext`] replaces implicit per-thread binding: each thread (or
//! task) owns one context and passes it into every graph operation. The context
//! is neither `Send` nor `Sync`, so the transaction it carries never leaves the
//! thread that opened it.

use std::marker::PhantomData;

use crate::{
    engine::{GraphEngine, SessionId},
    errors::TypedGraphError,
    registry::CollectionRegistry,
};

/// How a transaction ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conclusion {
    Success,
    /// Rollback. The engine has no rollback primitive, so this is rejected.
    Failure,
}

/// Caller-owned transaction binding plus the current type label.
#[derive(Debug)]
pub struct GraphContext {
    graph: u64,
    session: Option<SessionId>,
    label: Option<String>,
    _thread_bound: PhantomData<*const ()>,
}

impl GraphContext {
    pub(crate) fn new(graph: u64) -> Self {
        Self {
            graph,
            session: None,
            label: None,
            _thread_bound: PhantomData,
        }
    }

    pub(crate) fn graph_id(&self) -> u64 {
        self.graph
    }

    /// Active transaction, if one has been started.
    pub fn transaction(&self) -> Option<SessionId> {
        self.session
    }

    /// Label selecting the target type of the next create, scoped lookup or
    /// index call.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<S: Into<String>>(&mut self, label: S) {
        self.label = Some(label.into());
    }

    pub fn clear_label(&mut self) {
        self.label = None;
    }
}

pub struct SessionManager<'a> {
    engine: &'a dyn GraphEngine,
    registry: &'a CollectionRegistry,
}

impl<'a> SessionManager<'a> {
    pub fn new(engine: &'a dyn GraphEngine, registry: &'a CollectionRegistry) -> Self {
        Self { engine, registry }
    }

    /// Starts a transaction on `ctx` unless one is already bound.
    pub fn ensure_transaction(&self, ctx: &mut GraphContext) -> Result<SessionId, TypedGraphError> {
        if let Some(session) = ctx.session {
            if !self.engine.is_session_open(session) {
                return Err(TypedGraphError::invalid_state(format!(
                    "transaction {} is already closed",
                    session.0
                )));
            }
            return Ok(session);
        }
        let session = self.engine.open_session()?;
        ctx.session = Some(session);
        log::debug!("transaction {} started", session.0);
        Ok(session)
    }

    pub fn current_transaction(
        &self,
        ctx: &GraphContext,
        required: bool,
    ) -> Result<Option<SessionId>, TypedGraphError> {
        match ctx.session {
            Some(session) => Ok(Some(session)),
            None if required => Err(TypedGraphError::invalid_state(
                "transaction has not been started",
            )),
            None => Ok(None),
        }
    }

    /// Ends the transaction bound to `ctx`, closing every collection it still
    /// owns. Without a transaction this does nothing.
    pub fn stop_transaction(
        &self,
        ctx: &mut GraphContext,
        conclusion: Conclusion,
    ) -> Result<(), TypedGraphError> {
        let Some(session) = ctx.session else {
            return Ok(());
        };
        if conclusion == Conclusion::Failure {
            return Err(TypedGraphError::unsupported(
                "FAILURE conclusion is not supported",
            ));
        }
        let tracked = self.registry.tracked(session);
        self.registry.close_all(session)?;
        if self.engine.is_session_open(session) {
            self.engine.close_session(session)?;
        }
        ctx.session = None;
        log::debug!(
            "transaction {} stopped, closed {} collection(s)",
            session.0,
            tracked
        );
        Ok(())
    }
}

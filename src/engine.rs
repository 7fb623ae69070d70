//! Engine trait bridging the property-graph facade with a typed graph store.
//!
//! The adapter never looks inside the store: every catalog lookup, object
//! mutation and selection goes through [`GraphEngine`]. Each call carries the
//! [`SessionId`] it runs under; an engine rejects calls on sessions it does not
//! know or has already closed. [`SqliteEngine`] is the file-backed engine
//! shipped with the crate.

mod metrics;
mod sqlite;

use crate::{
    errors::TypedGraphError,
    value::{DataType, Value},
};

pub use metrics::{EngineMetrics, EngineMetricsSnapshot};
pub use sqlite::SqliteEngine;

/// Engine-assigned object identifier, unique across nodes and edges.
pub type Oid = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Node,
    Edge,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Node => "node",
            ObjectType::Edge => "edge",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "node" => Some(ObjectType::Node),
            "edge" => Some(ObjectType::Edge),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// No secondary structure; lookups need a full type scan.
    Basic,
    Indexed,
    Unique,
}

impl AttributeKind {
    pub fn is_indexed(&self) -> bool {
        matches!(self, AttributeKind::Indexed | AttributeKind::Unique)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Basic => "basic",
            AttributeKind::Indexed => "indexed",
            AttributeKind::Unique => "unique",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "basic" => Some(AttributeKind::Basic),
            "indexed" => Some(AttributeKind::Indexed),
            "unique" => Some(AttributeKind::Unique),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgesDirection {
    Outgoing,
    Ingoing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: String,
    pub object_type: ObjectType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeInfo {
    pub id: AttributeId,
    pub type_id: TypeId,
    pub name: String,
    pub data_type: DataType,
    pub kind: AttributeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeData {
    pub edge: Oid,
    pub tail: Oid,
    pub head: Oid,
}

/// Result of an engine selection, in the engine's native order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Objects {
    oids: Vec<Oid>,
}

impl Objects {
    pub fn new(oids: Vec<Oid>) -> Self {
        Self { oids }
    }

    pub fn len(&self) -> usize {
        self.oids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oids.is_empty()
    }

    pub fn into_vec(self) -> Vec<Oid> {
        self.oids
    }
}

pub trait GraphEngine: Send + Sync {
    fn open_session(&self) -> Result<SessionId, TypedGraphError>;
    fn close_session(&self, session: SessionId) -> Result<(), TypedGraphError>;
    fn is_session_open(&self, session: SessionId) -> bool;

    fn find_type(&self, session: SessionId, name: &str) -> Result<Option<TypeId>, TypedGraphError>;
    fn type_info(&self, session: SessionId, ty: TypeId) -> Result<TypeInfo, TypedGraphError>;
    fn new_node_type(&self, session: SessionId, name: &str) -> Result<TypeId, TypedGraphError>;
    fn new_edge_type(
        &self,
        session: SessionId,
        name: &str,
        directed: bool,
        neighbors: bool,
    ) -> Result<TypeId, TypedGraphError>;
    fn find_types(
        &self,
        session: SessionId,
        object_type: ObjectType,
    ) -> Result<Vec<TypeId>, TypedGraphError>;

    fn find_attribute(
        &self,
        session: SessionId,
        ty: TypeId,
        name: &str,
    ) -> Result<Option<AttributeId>, TypedGraphError>;
    fn find_attributes(
        &self,
        session: SessionId,
        ty: TypeId,
    ) -> Result<Vec<AttributeId>, TypedGraphError>;
    fn attribute_info(
        &self,
        session: SessionId,
        attr: AttributeId,
    ) -> Result<AttributeInfo, TypedGraphError>;
    fn new_attribute(
        &self,
        session: SessionId,
        ty: TypeId,
        name: &str,
        data_type: DataType,
        kind: AttributeKind,
    ) -> Result<AttributeId, TypedGraphError>;
    fn index_attribute(
        &self,
        session: SessionId,
        attr: AttributeId,
        kind: AttributeKind,
    ) -> Result<(), TypedGraphError>;

    fn new_node(&self, session: SessionId, ty: TypeId) -> Result<Oid, TypedGraphError>;
    fn new_edge(
        &self,
        session: SessionId,
        ty: TypeId,
        tail: Oid,
        head: Oid,
    ) -> Result<Oid, TypedGraphError>;
    /// Type of `oid`, or `None` when no such object exists.
    fn object_type(&self, session: SessionId, oid: Oid) -> Result<Option<TypeId>, TypedGraphError>;
    fn edge_data(&self, session: SessionId, edge: Oid) -> Result<EdgeData, TypedGraphError>;
    fn drop_object(&self, session: SessionId, oid: Oid) -> Result<(), TypedGraphError>;

    fn select_type(&self, session: SessionId, ty: TypeId) -> Result<Objects, TypedGraphError>;
    /// Objects whose value of `attr` equals `value`, read from the secondary
    /// index; basic attributes are rejected.
    fn select_value(
        &self,
        session: SessionId,
        attr: AttributeId,
        value: &Value,
    ) -> Result<Objects, TypedGraphError>;
    /// Edges of `edge_type` incident to `node`.
    fn explode(
        &self,
        session: SessionId,
        node: Oid,
        edge_type: TypeId,
        direction: EdgesDirection,
    ) -> Result<Objects, TypedGraphError>;

    fn attribute_value(
        &self,
        session: SessionId,
        oid: Oid,
        attr: AttributeId,
    ) -> Result<Option<Value>, TypedGraphError>;
    fn set_attribute_value(
        &self,
        session: SessionId,
        oid: Oid,
        attr: AttributeId,
        value: &Value,
    ) -> Result<(), TypedGraphError>;
    fn remove_attribute_value(
        &self,
        session: SessionId,
        oid: Oid,
        attr: AttributeId,
    ) -> Result<Option<Value>, TypedGraphError>;

    fn metrics(&self) -> EngineMetricsSnapshot;
    /// Human readable location of the store, used by `Display`.
    fn location(&self) -> String;
    fn close(&self) -> Result<(), TypedGraphError>;
}

use std::fmt;

use crate::engine::{ObjectType, Oid};

/// Which half of the property graph an API call addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl ElementKind {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ElementKind::Vertex => ObjectType::Node,
            ElementKind::Edge => ObjectType::Edge,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Vertex => "vertex",
            ElementKind::Edge => "edge",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Out,
    In,
    Both,
}

/// Element handle produced by collections; only carries the engine id.
pub trait GraphElement: Copy + fmt::Debug {
    const KIND: ElementKind;

    fn id(&self) -> Oid;
    fn from_id(id: Oid) -> Self;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vertex(pub Oid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub Oid);

impl GraphElement for Vertex {
    const KIND: ElementKind = ElementKind::Vertex;

    fn id(&self) -> Oid {
        self.0
    }

    fn from_id(id: Oid) -> Self {
        Vertex(id)
    }
}

impl GraphElement for Edge {
    const KIND: ElementKind = ElementKind::Edge;

    fn id(&self) -> Oid {
        self.0
    }

    fn from_id(id: Oid) -> Self {
        Edge(id)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.0)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e[{}]", self.0)
    }
}

/// Identifier accepted by `get_vertex`/`get_edge`: a native id or its textual
/// form.
#[derive(Clone, Debug, PartialEq)]
pub enum RawId {
    Oid(Oid),
    Text(String),
}

impl From<Oid> for RawId {
    fn from(id: Oid) -> Self {
        RawId::Oid(id)
    }
}

impl From<&str> for RawId {
    fn from(id: &str) -> Self {
        RawId::Text(id.to_string())
    }
}

impl From<String> for RawId {
    fn from(id: String) -> Self {
        RawId::Text(id)
    }
}

impl From<Vertex> for RawId {
    fn from(v: Vertex) -> Self {
        RawId::Oid(v.0)
    }
}

impl From<Edge> for RawId {
    fn from(e: Edge) -> Self {
        RawId::Oid(e.0)
    }
}

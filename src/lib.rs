//! Property-graph adapter over a typed graph storage engine.
//!
//! Every vertex and edge belongs to exactly one named type and every property
//! is an attribute scoped to that type. [`TypedGraph`] exposes this model as a
//! plain property graph: labels, key/value properties, key lookups, key
//! indices and explicit transaction conclusion.
//! Run Criterion benchmarks with `cargo bench` to compare scan and index lookups.

pub mod catalog;
pub mod client;
pub mod collection;
pub mod config;
pub mod element;
pub mod engine;
pub mod errors;
pub mod features;
pub mod graph;
pub mod key_index;
pub mod planner;
pub mod registry;
pub mod schema;
pub mod session;
pub mod value;

pub use crate::collection::{ElementCollection, ElementIter};
pub use crate::config::{DEFAULT_VERTEX_LABEL, GraphConfig, SqliteConfig};
pub use crate::element::{Direction, Edge, ElementKind, GraphElement, RawId, Vertex};
pub use crate::engine::{GraphEngine, SqliteEngine};
pub use crate::errors::TypedGraphError;
pub use crate::features::Features;
pub use crate::graph::TypedGraph;
pub use crate::planner::{LABEL_KEY, LookupPlan, Route};
pub use crate::session::{Conclusion, GraphContext};
pub use crate::value::{DataType, PropertyValue, Value};

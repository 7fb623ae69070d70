//! Property-graph facade over a [`GraphEngine`].
//!
//! [`TypedGraph`] is shared between threads; every operation takes the
//! caller's [`GraphContext`], starts a transaction on it when none is active,
//! and works inside that transaction until the caller stops it. Lookups return
//! [`ElementCollection`]s tracked by the graph's [`CollectionRegistry`].
//!
//! ```rust
//! use typedgraph::{GraphConfig, PropertyValue, TypedGraph};
//!
//! let graph = TypedGraph::open_in_memory(&GraphConfig::default()).unwrap();
//! let mut ctx = graph.context();
//! ctx.set_label("Person");
//! let alice = graph.add_vertex(&mut ctx).unwrap();
//! graph.set_property(&mut ctx, alice, "name", "alice").unwrap();
//! let found = graph.vertices_by(&mut ctx, "name", "alice").unwrap();
//! assert_eq!(found.to_vec().unwrap(), vec![alice]);
//! assert_eq!(
//!     graph.property(&mut ctx, alice, "name").unwrap(),
//!     Some(PropertyValue::from("alice"))
//! );
//! drop(found);
//! graph.shutdown(&mut ctx).unwrap();
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashSet;

use crate::{
    catalog::Catalog,
    collection::{ElementCollection, Source},
    config::GraphConfig,
    element::{Direction, Edge, ElementKind, GraphElement, RawId, Vertex},
    engine::{EdgesDirection, GraphEngine, Oid, SessionId, SqliteEngine, TypeId, TypeInfo},
    errors::TypedGraphError,
    features::{FEATURES, Features},
    key_index::{DEFAULT_INDEX_DATA_TYPE, KeyIndexManager},
    planner::{LABEL_KEY, LookupPlan, QueryPlanner},
    registry::CollectionRegistry,
    session::{Conclusion, GraphContext, SessionManager},
    value::{DataType, PropertyValue},
};

/// Property key that reads the element id; it cannot be written.
pub const ID_KEY: &str = "id";

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

pub struct TypedGraph<E: GraphEngine + 'static = SqliteEngine> {
    engine: Arc<E>,
    registry: Arc<CollectionRegistry>,
    config: GraphConfig,
    id: u64,
}

impl TypedGraph<SqliteEngine> {
    /// Opens the store at `path`, creating it (and missing parent
    /// directories) when the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P, config: &GraphConfig) -> Result<Self, TypedGraphError> {
        config.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                TypedGraphError::connection(format!(
                    "could not create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let engine = if path.exists() {
            SqliteEngine::open(path, &config.sqlite)?
        } else {
            SqliteEngine::create(path, &config.sqlite)?
        };
        Self::with_engine(engine, config.clone())
    }

    pub fn open_in_memory(config: &GraphConfig) -> Result<Self, TypedGraphError> {
        config.validate()?;
        let engine = SqliteEngine::in_memory(&config.sqlite)?;
        Self::with_engine(engine, config.clone())
    }
}

impl<E: GraphEngine + 'static> TypedGraph<E> {
    pub fn with_engine(engine: E, config: GraphConfig) -> Result<Self, TypedGraphError> {
        config.validate()?;
        Ok(Self {
            engine: Arc::new(engine),
            registry: Arc::new(CollectionRegistry::new()),
            config,
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    pub fn features(&self) -> Features {
        FEATURES
    }

    /// New context for the calling thread, with no transaction and no label.
    pub fn context(&self) -> GraphContext {
        GraphContext::new(self.id)
    }

    fn sessions(&self) -> SessionManager<'_> {
        SessionManager::new(&*self.engine, &self.registry)
    }

    fn catalog(&self, session: SessionId) -> Catalog<'_> {
        Catalog::new(&*self.engine, session)
    }

    fn check_context(&self, ctx: &GraphContext) -> Result<(), TypedGraphError> {
        if ctx.graph_id() != self.id {
            return Err(TypedGraphError::invalid_state(
                "context belongs to another graph",
            ));
        }
        Ok(())
    }

    fn begin(&self, ctx: &mut GraphContext) -> Result<SessionId, TypedGraphError> {
        self.check_context(ctx)?;
        self.sessions().ensure_transaction(ctx)
    }

    fn collect<T: GraphElement>(
        &self,
        ctx: &GraphContext,
        sources: Vec<Source>,
    ) -> Result<ElementCollection<T>, TypedGraphError> {
        let handle = self.registry.register(ctx)?;
        let engine: Arc<dyn GraphEngine> = self.engine.clone();
        Ok(ElementCollection::new(handle, sources, engine, &self.registry))
    }

    pub fn ensure_transaction(&self, ctx: &mut GraphContext) -> Result<SessionId, TypedGraphError> {
        self.begin(ctx)
    }

    pub fn current_transaction(
        &self,
        ctx: &GraphContext,
        required: bool,
    ) -> Result<Option<SessionId>, TypedGraphError> {
        self.check_context(ctx)?;
        self.sessions().current_transaction(ctx, required)
    }

    /// Ends the transaction of `ctx`. Every collection it produced is closed.
    pub fn stop_transaction(
        &self,
        ctx: &mut GraphContext,
        conclusion: Conclusion,
    ) -> Result<(), TypedGraphError> {
        self.check_context(ctx)?;
        self.sessions().stop_transaction(ctx, conclusion)
    }

    /// Stops the caller's transaction and closes the engine.
    ///
    /// Fails with [`TypedGraphError::LeakedTransactions`], leaving the engine
    /// open, while another transaction still owns collections.
    pub fn shutdown(&self, ctx: &mut GraphContext) -> Result<(), TypedGraphError> {
        self.stop_transaction(ctx, Conclusion::Success)?;
        let open = self.registry.open_transactions();
        if open > 0 {
            return Err(TypedGraphError::LeakedTransactions(open));
        }
        self.engine.close()?;
        log::debug!("closed graph {}", self.engine.location());
        Ok(())
    }

    // Vertices

    /// Adds a vertex to the type named by the context label, or to the
    /// default vertex type when no label is set.
    pub fn add_vertex(&self, ctx: &mut GraphContext) -> Result<Vertex, TypedGraphError> {
        let session = self.begin(ctx)?;
        let label = ctx
            .label()
            .unwrap_or(self.config.default_vertex_label.as_str())
            .to_string();
        let ty = self.catalog(session).ensure_type(&label, ElementKind::Vertex)?;
        let oid = self.engine.new_node(session, ty)?;
        Ok(Vertex(oid))
    }

    pub fn get_vertex<I: Into<RawId>>(
        &self,
        ctx: &mut GraphContext,
        id: I,
    ) -> Result<Option<Vertex>, TypedGraphError> {
        self.get_element(ctx, id.into())
    }

    pub fn remove_vertex(&self, ctx: &mut GraphContext, vertex: Vertex) -> Result<(), TypedGraphError> {
        self.remove_element(ctx, vertex)
    }

    pub fn vertices(&self, ctx: &mut GraphContext) -> Result<ElementCollection<Vertex>, TypedGraphError> {
        self.all_elements(ctx)
    }

    /// Vertices whose property `key` equals `value`, scoped to the context
    /// label when one is set.
    pub fn vertices_by<V: Into<PropertyValue>>(
        &self,
        ctx: &mut GraphContext,
        key: &str,
        value: V,
    ) -> Result<ElementCollection<Vertex>, TypedGraphError> {
        self.lookup(ctx, key, &value.into())
    }

    // Edges

    /// Adds an edge from `out` to `inbound`; the edge type is created
    /// directed on first use.
    pub fn add_edge(
        &self,
        ctx: &mut GraphContext,
        out: Vertex,
        inbound: Vertex,
        label: &str,
    ) -> Result<Edge, TypedGraphError> {
        let session = self.begin(ctx)?;
        let ty = self.catalog(session).ensure_type(label, ElementKind::Edge)?;
        let oid = self.engine.new_edge(session, ty, out.0, inbound.0)?;
        Ok(Edge(oid))
    }

    pub fn get_edge<I: Into<RawId>>(
        &self,
        ctx: &mut GraphContext,
        id: I,
    ) -> Result<Option<Edge>, TypedGraphError> {
        self.get_element(ctx, id.into())
    }

    pub fn remove_edge(&self, ctx: &mut GraphContext, edge: Edge) -> Result<(), TypedGraphError> {
        self.remove_element(ctx, edge)
    }

    pub fn edges(&self, ctx: &mut GraphContext) -> Result<ElementCollection<Edge>, TypedGraphError> {
        self.all_elements(ctx)
    }

    pub fn edges_by<V: Into<PropertyValue>>(
        &self,
        ctx: &mut GraphContext,
        key: &str,
        value: V,
    ) -> Result<ElementCollection<Edge>, TypedGraphError> {
        self.lookup(ctx, key, &value.into())
    }

    /// Tail (`Out`) or head (`In`) of `edge`.
    pub fn edge_vertex(
        &self,
        ctx: &mut GraphContext,
        edge: Edge,
        direction: Direction,
    ) -> Result<Vertex, TypedGraphError> {
        let session = self.begin(ctx)?;
        let data = self.engine.edge_data(session, edge.0)?;
        match direction {
            Direction::Out => Ok(Vertex(data.tail)),
            Direction::In => Ok(Vertex(data.head)),
            Direction::Both => Err(TypedGraphError::invalid_input(
                "a direction of BOTH is not supported",
            )),
        }
    }

    // Adjacency

    /// Edges incident to `vertex` in `direction`, restricted to the edge
    /// types named in `labels` (all edge types when empty).
    pub fn vertex_edges(
        &self,
        ctx: &mut GraphContext,
        vertex: Vertex,
        direction: Direction,
        labels: &[&str],
    ) -> Result<ElementCollection<Edge>, TypedGraphError> {
        let session = self.begin(ctx)?;
        let sources = self
            .incident_edges(session, vertex, direction, labels)?
            .into_iter()
            .map(|(_, edges)| Source::Objects(edges))
            .collect();
        self.collect(ctx, sources)
    }

    /// Vertices at the other end of the edges returned by
    /// [`vertex_edges`](Self::vertex_edges). A vertex reached through several
    /// edges appears once per edge.
    pub fn adjacent_vertices(
        &self,
        ctx: &mut GraphContext,
        vertex: Vertex,
        direction: Direction,
        labels: &[&str],
    ) -> Result<ElementCollection<Vertex>, TypedGraphError> {
        let session = self.begin(ctx)?;
        let mut sources = Vec::new();
        for (edge_direction, edges) in self.incident_edges(session, vertex, direction, labels)? {
            let mut neighbors = Vec::with_capacity(edges.len());
            for edge in edges {
                let data = self.engine.edge_data(session, edge)?;
                neighbors.push(match edge_direction {
                    EdgesDirection::Ingoing => data.tail,
                    EdgesDirection::Outgoing => data.head,
                });
            }
            sources.push(Source::Objects(neighbors));
        }
        self.collect(ctx, sources)
    }

    fn incident_edges(
        &self,
        session: SessionId,
        vertex: Vertex,
        direction: Direction,
        labels: &[&str],
    ) -> Result<Vec<(EdgesDirection, Vec<Oid>)>, TypedGraphError> {
        let catalog = self.catalog(session);
        let edge_types: Vec<TypeId> = if labels.is_empty() {
            catalog.types_of(ElementKind::Edge)?
        } else {
            let mut types = Vec::new();
            for label in labels {
                if let Some(info) = catalog.find_type_of_kind(label, ElementKind::Edge)? {
                    types.push(info.id);
                }
            }
            types
        };
        let directions: &[EdgesDirection] = match direction {
            Direction::Out => &[EdgesDirection::Outgoing],
            Direction::In => &[EdgesDirection::Ingoing],
            Direction::Both => &[EdgesDirection::Outgoing, EdgesDirection::Ingoing],
        };
        let mut result = Vec::new();
        for &edge_direction in directions {
            for &ty in &edge_types {
                let edges = self.engine.explode(session, vertex.0, ty, edge_direction)?;
                result.push((edge_direction, edges.into_vec()));
            }
        }
        Ok(result)
    }

    // Properties

    /// Value of `key` on `element`. `"label"` reads the type name and `"id"`
    /// the element id.
    pub fn property<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        element: T,
        key: &str,
    ) -> Result<Option<PropertyValue>, TypedGraphError> {
        let session = self.begin(ctx)?;
        let catalog = self.catalog(session);
        let info = element_type(&catalog, element)?;
        if key == LABEL_KEY {
            return Ok(Some(PropertyValue::String(info.name)));
        }
        if key == ID_KEY {
            return Ok(Some(PropertyValue::Long(element.id())));
        }
        match catalog.attribute(info.id, key)? {
            Some(attr) => Ok(self
                .engine
                .attribute_value(session, element.id(), attr.id)?
                .map(PropertyValue::from)),
            None => Ok(None),
        }
    }

    /// Stores `value` under `key`, creating a basic attribute with the
    /// value's data kind when the element's type does not define `key`.
    pub fn set_property<T: GraphElement, V: Into<PropertyValue>>(
        &self,
        ctx: &mut GraphContext,
        element: T,
        key: &str,
        value: V,
    ) -> Result<(), TypedGraphError> {
        check_writable_key(key)?;
        let value = value.into();
        check_storable_value(key, &value)?;
        let session = self.begin(ctx)?;
        let catalog = self.catalog(session);
        let info = element_type(&catalog, element)?;
        let attr = catalog.ensure_attribute(info.id, key, value.data_type())?;
        self.engine
            .set_attribute_value(session, element.id(), attr.id, &value.to_native())
    }

    pub fn remove_property<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        element: T,
        key: &str,
    ) -> Result<Option<PropertyValue>, TypedGraphError> {
        check_writable_key(key)?;
        let session = self.begin(ctx)?;
        let catalog = self.catalog(session);
        let info = element_type(&catalog, element)?;
        match catalog.attribute(info.id, key)? {
            Some(attr) => Ok(self
                .engine
                .remove_attribute_value(session, element.id(), attr.id)?
                .map(PropertyValue::from)),
            None => Ok(None),
        }
    }

    /// Keys holding a value on `element`, in attribute creation order.
    pub fn property_keys<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        element: T,
    ) -> Result<Vec<String>, TypedGraphError> {
        let session = self.begin(ctx)?;
        let catalog = self.catalog(session);
        let info = element_type(&catalog, element)?;
        let mut keys = Vec::new();
        for attr in catalog.attributes(info.id)? {
            if self
                .engine
                .attribute_value(session, element.id(), attr.id)?
                .is_some()
            {
                keys.push(attr.name);
            }
        }
        Ok(keys)
    }

    pub fn label_of<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        element: T,
    ) -> Result<String, TypedGraphError> {
        let session = self.begin(ctx)?;
        Ok(element_type(&self.catalog(session), element)?.name)
    }

    /// Names of the types holding elements of `kind`.
    pub fn labels(
        &self,
        ctx: &mut GraphContext,
        kind: ElementKind,
    ) -> Result<Vec<String>, TypedGraphError> {
        let session = self.begin(ctx)?;
        self.catalog(session).type_names(kind)
    }

    // Key indices

    /// Indexes `key` on the type named by the context label. A new attribute
    /// gets the string data kind.
    pub fn create_key_index(
        &self,
        ctx: &mut GraphContext,
        kind: ElementKind,
        key: &str,
    ) -> Result<(), TypedGraphError> {
        self.create_key_index_with_type(ctx, kind, key, DEFAULT_INDEX_DATA_TYPE)
    }

    /// Like [`create_key_index`](Self::create_key_index), declaring the data
    /// kind used when the attribute has to be created.
    pub fn create_key_index_with_type(
        &self,
        ctx: &mut GraphContext,
        kind: ElementKind,
        key: &str,
        data_type: DataType,
    ) -> Result<(), TypedGraphError> {
        let session = self.begin(ctx)?;
        KeyIndexManager::new(self.catalog(session)).create(kind, ctx.label(), key, data_type)?;
        Ok(())
    }

    pub fn indexed_keys(
        &self,
        ctx: &mut GraphContext,
        kind: ElementKind,
    ) -> Result<AHashSet<String>, TypedGraphError> {
        let session = self.begin(ctx)?;
        KeyIndexManager::new(self.catalog(session)).indexed_keys(kind)
    }

    pub fn drop_key_index(
        &self,
        ctx: &mut GraphContext,
        kind: ElementKind,
        key: &str,
    ) -> Result<(), TypedGraphError> {
        let session = self.begin(ctx)?;
        KeyIndexManager::new(self.catalog(session)).drop_index(kind, key)
    }

    // Lookups

    /// Plan that `vertices_by`/`edges_by` would run for `key == value` with
    /// the current context label, without executing it.
    pub fn explain_lookup<V: Into<PropertyValue>>(
        &self,
        ctx: &mut GraphContext,
        kind: ElementKind,
        key: &str,
        value: V,
    ) -> Result<LookupPlan, TypedGraphError> {
        let session = self.begin(ctx)?;
        QueryPlanner::new(self.catalog(session)).plan(kind, key, &value.into(), ctx.label())
    }

    fn lookup<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        key: &str,
        value: &PropertyValue,
    ) -> Result<ElementCollection<T>, TypedGraphError> {
        let session = self.begin(ctx)?;
        let planner = QueryPlanner::new(self.catalog(session));
        let plan = planner.plan(T::KIND, key, value, ctx.label())?;
        let sources = planner.execute(&plan)?;
        self.collect(ctx, sources)
    }

    fn all_elements<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
    ) -> Result<ElementCollection<T>, TypedGraphError> {
        let session = self.begin(ctx)?;
        let planner = QueryPlanner::new(self.catalog(session));
        let sources = planner.execute(&planner.plan_all(T::KIND)?)?;
        self.collect(ctx, sources)
    }

    fn get_element<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        id: RawId,
    ) -> Result<Option<T>, TypedGraphError> {
        let Some(oid) = parse_id(&id)? else {
            return Ok(None);
        };
        let session = self.begin(ctx)?;
        let found = self.catalog(session).is_kind(oid, T::KIND)?;
        Ok(found.then(|| T::from_id(oid)))
    }

    fn remove_element<T: GraphElement>(
        &self,
        ctx: &mut GraphContext,
        element: T,
    ) -> Result<(), TypedGraphError> {
        let session = self.begin(ctx)?;
        element_type(&self.catalog(session), element)?;
        self.engine.drop_object(session, element.id())
    }
}

impl<E: GraphEngine + 'static> fmt::Display for TypedGraph<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "typedgraph[{}]", self.engine.location())
    }
}

fn element_type<T: GraphElement>(
    catalog: &Catalog<'_>,
    element: T,
) -> Result<TypeInfo, TypedGraphError> {
    match catalog.object_type(element.id())? {
        Some(info) if info.object_type == T::KIND.object_type() => Ok(info),
        _ => Err(TypedGraphError::not_found(format!(
            "{} {}",
            T::KIND,
            element.id()
        ))),
    }
}

fn check_writable_key(key: &str) -> Result<(), TypedGraphError> {
    if key.is_empty() {
        return Err(TypedGraphError::invalid_input("property key can not be empty"));
    }
    if key == ID_KEY || key == LABEL_KEY {
        return Err(TypedGraphError::invalid_input(format!(
            "property key '{key}' is reserved"
        )));
    }
    Ok(())
}

/// SQLite stores NaN as NULL, so only finite doubles are accepted.
fn check_storable_value(key: &str, value: &PropertyValue) -> Result<(), TypedGraphError> {
    let finite = match value {
        PropertyValue::Float(v) => v.is_finite(),
        PropertyValue::Double(v) => v.is_finite(),
        _ => true,
    };
    if finite {
        Ok(())
    } else {
        Err(TypedGraphError::invalid_input(format!(
            "property '{key}' can not hold the non-finite value {value}"
        )))
    }
}

/// Native id behind `id`. Text is read as a number and truncated; text that
/// is not a number names no element.
fn parse_id(id: &RawId) -> Result<Option<Oid>, TypedGraphError> {
    match id {
        RawId::Oid(oid) => Ok(Some(*oid)),
        RawId::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(TypedGraphError::invalid_input("element id can not be empty"));
            }
            Ok(text
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(|number| number.trunc() as Oid))
        }
    }
}

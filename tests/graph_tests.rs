use tempfile::TempDir;
use typedgraph::engine::{AttributeKind, GraphEngine};
use typedgraph::{
    Conclusion, Direction, ElementKind, GraphConfig, PropertyValue, TypedGraph, TypedGraphError,
    Vertex,
};

fn graph() -> TypedGraph {
    let _ = env_logger::builder().is_test(true).try_init();
    TypedGraph::open_in_memory(&GraphConfig::default()).expect("graph")
}

fn sorted<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items
}

#[test]
fn test_add_vertex_uses_default_label() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    assert_eq!(graph.label_of(&mut ctx, v).unwrap(), "VERTEX_LABEL");
    assert_eq!(
        graph.property(&mut ctx, v, "label").unwrap(),
        Some(PropertyValue::from("VERTEX_LABEL"))
    );
}

#[test]
fn test_configured_default_label() {
    let config = GraphConfig::from_json_str(r#"{"default_vertex_label": "Thing"}"#).unwrap();
    let graph = TypedGraph::open_in_memory(&config).unwrap();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    assert_eq!(graph.label_of(&mut ctx, v).unwrap(), "Thing");
}

#[test]
fn test_get_vertex_by_id_forms() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    assert_eq!(graph.get_vertex(&mut ctx, v).unwrap(), Some(v));
    assert_eq!(graph.get_vertex(&mut ctx, v.0).unwrap(), Some(v));
    assert_eq!(
        graph.get_vertex(&mut ctx, v.0.to_string()).unwrap(),
        Some(v)
    );
    assert_eq!(
        graph.get_vertex(&mut ctx, format!("{}.0", v.0)).unwrap(),
        Some(v)
    );
    assert_eq!(graph.get_vertex(&mut ctx, "abc").unwrap(), None);
    assert_eq!(graph.get_vertex(&mut ctx, v.0 + 1000).unwrap(), None);
    let err = graph.get_vertex(&mut ctx, "").unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
}

#[test]
fn test_get_checks_element_kind() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    let e = graph.add_edge(&mut ctx, a, b, "knows").unwrap();
    assert_eq!(graph.get_vertex(&mut ctx, e).unwrap(), None);
    assert_eq!(graph.get_edge(&mut ctx, a).unwrap(), None);
    assert_eq!(graph.get_edge(&mut ctx, e.0).unwrap(), Some(e));
}

#[test]
fn test_remove_vertex_removes_incident_edges() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    let c = graph.add_vertex(&mut ctx).unwrap();
    let ab = graph.add_edge(&mut ctx, a, b, "knows").unwrap();
    let bc = graph.add_edge(&mut ctx, b, c, "knows").unwrap();
    let ca = graph.add_edge(&mut ctx, c, a, "knows").unwrap();
    graph.set_property(&mut ctx, ab, "weight", 0.5).unwrap();

    graph.remove_vertex(&mut ctx, a).unwrap();
    assert_eq!(graph.get_vertex(&mut ctx, a).unwrap(), None);
    assert_eq!(graph.get_edge(&mut ctx, ab).unwrap(), None);
    assert_eq!(graph.get_edge(&mut ctx, ca).unwrap(), None);
    assert_eq!(graph.edges(&mut ctx).unwrap().to_vec().unwrap(), vec![bc]);

    let err = graph.remove_vertex(&mut ctx, a).unwrap_err();
    assert!(matches!(err, TypedGraphError::NotFound(_)));
}

#[test]
fn test_remove_edge_keeps_vertices() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    let e = graph.add_edge(&mut ctx, a, b, "knows").unwrap();
    graph.remove_edge(&mut ctx, e).unwrap();
    assert!(graph.edges(&mut ctx).unwrap().to_vec().unwrap().is_empty());
    assert_eq!(
        sorted(graph.vertices(&mut ctx).unwrap().to_vec().unwrap()),
        vec![a, b]
    );
    let err = graph.remove_edge(&mut ctx, typedgraph::Edge(a.0)).unwrap_err();
    assert!(matches!(err, TypedGraphError::NotFound(_)));
}

#[test]
fn test_property_round_trip_per_kind() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    graph.set_property(&mut ctx, v, "active", true).unwrap();
    graph.set_property(&mut ctx, v, "age", 31).unwrap();
    graph.set_property(&mut ctx, v, "visits", 1i64 << 40).unwrap();
    graph.set_property(&mut ctx, v, "ratio", 0.25f32).unwrap();
    graph.set_property(&mut ctx, v, "score", 9.75).unwrap();
    graph.set_property(&mut ctx, v, "name", "ann").unwrap();

    let read = |ctx: &mut typedgraph::GraphContext, key: &str| {
        graph.property(ctx, v, key).unwrap()
    };
    assert_eq!(read(&mut ctx, "active"), Some(PropertyValue::Bool(true)));
    assert_eq!(read(&mut ctx, "age"), Some(PropertyValue::Int(31)));
    assert_eq!(read(&mut ctx, "visits"), Some(PropertyValue::Long(1 << 40)));
    assert_eq!(read(&mut ctx, "ratio"), Some(PropertyValue::Double(0.25)));
    assert_eq!(read(&mut ctx, "score"), Some(PropertyValue::Double(9.75)));
    assert_eq!(read(&mut ctx, "name"), Some(PropertyValue::from("ann")));
    assert_eq!(read(&mut ctx, "missing"), None);
    assert_eq!(read(&mut ctx, "id"), Some(PropertyValue::Long(v.0)));
}

#[test]
fn test_set_property_rejects_reserved_and_mismatched() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    for key in ["id", "label", ""] {
        let err = graph.set_property(&mut ctx, v, key, "x").unwrap_err();
        assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    }
    graph.set_property(&mut ctx, v, "age", 31).unwrap();
    let err = graph.set_property(&mut ctx, v, "age", "old").unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    let err = graph.set_property(&mut ctx, v, "age", 31i64).unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    assert_eq!(
        graph.property(&mut ctx, v, "age").unwrap(),
        Some(PropertyValue::Int(31))
    );
}

#[test]
fn test_set_property_rejects_non_finite_doubles() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    graph.set_property(&mut ctx, v, "score", 1.0).unwrap();
    for value in [
        PropertyValue::Double(f64::NAN),
        PropertyValue::Double(f64::NEG_INFINITY),
        PropertyValue::Float(f32::INFINITY),
    ] {
        let err = graph.set_property(&mut ctx, v, "score", value).unwrap_err();
        assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    }
    let err = graph.set_property(&mut ctx, v, "fresh", f64::NAN).unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    assert_eq!(
        graph.property(&mut ctx, v, "score").unwrap(),
        Some(PropertyValue::Double(1.0))
    );
    assert_eq!(graph.property_keys(&mut ctx, v).unwrap(), vec!["score"]);
}

#[test]
fn test_property_on_missing_element() {
    let graph = graph();
    let mut ctx = graph.context();
    let err = graph.property(&mut ctx, Vertex(999), "name").unwrap_err();
    assert!(matches!(err, TypedGraphError::NotFound(_)));
    let err = graph
        .set_property(&mut ctx, Vertex(999), "name", "x")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::NotFound(_)));
}

#[test]
fn test_remove_property_and_keys() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    let other = graph.add_vertex(&mut ctx).unwrap();
    graph.set_property(&mut ctx, v, "name", "ann").unwrap();
    graph.set_property(&mut ctx, v, "age", 31).unwrap();
    graph.set_property(&mut ctx, other, "city", "Oslo").unwrap();

    assert_eq!(graph.property_keys(&mut ctx, v).unwrap(), vec!["name", "age"]);
    assert_eq!(graph.property_keys(&mut ctx, other).unwrap(), vec!["city"]);

    assert_eq!(
        graph.remove_property(&mut ctx, v, "name").unwrap(),
        Some(PropertyValue::from("ann"))
    );
    assert_eq!(graph.remove_property(&mut ctx, v, "name").unwrap(), None);
    assert_eq!(graph.remove_property(&mut ctx, v, "never").unwrap(), None);
    assert_eq!(graph.property_keys(&mut ctx, v).unwrap(), vec!["age"]);
    let err = graph.remove_property(&mut ctx, v, "id").unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
}

#[test]
fn test_edge_endpoints() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    let e = graph.add_edge(&mut ctx, a, b, "knows").unwrap();
    assert_eq!(graph.edge_vertex(&mut ctx, e, Direction::Out).unwrap(), a);
    assert_eq!(graph.edge_vertex(&mut ctx, e, Direction::In).unwrap(), b);
    let err = graph.edge_vertex(&mut ctx, e, Direction::Both).unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    assert_eq!(graph.label_of(&mut ctx, e).unwrap(), "knows");
}

#[test]
fn test_add_edge_with_vertex_label_rejected() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let err = graph
        .add_edge(&mut ctx, a, a, "VERTEX_LABEL")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    ctx.set_label("knows");
    let b = graph.add_vertex(&mut ctx).unwrap();
    let err = graph.add_edge(&mut ctx, a, b, "knows").unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
}

#[test]
fn test_adjacency_with_label_filters() {
    let graph = graph();
    let mut ctx = graph.context();
    let hub = graph.add_vertex(&mut ctx).unwrap();
    let friend = graph.add_vertex(&mut ctx).unwrap();
    let boss = graph.add_vertex(&mut ctx).unwrap();
    let fan = graph.add_vertex(&mut ctx).unwrap();
    let knows = graph.add_edge(&mut ctx, hub, friend, "knows").unwrap();
    let reports = graph.add_edge(&mut ctx, hub, boss, "reports_to").unwrap();
    let follows = graph.add_edge(&mut ctx, fan, hub, "follows").unwrap();

    let out = graph
        .vertex_edges(&mut ctx, hub, Direction::Out, &[])
        .unwrap();
    assert_eq!(sorted(out.to_vec().unwrap()), vec![knows, reports]);
    let inbound = graph
        .vertex_edges(&mut ctx, hub, Direction::In, &[])
        .unwrap();
    assert_eq!(inbound.to_vec().unwrap(), vec![follows]);
    let both = graph
        .vertex_edges(&mut ctx, hub, Direction::Both, &[])
        .unwrap();
    assert_eq!(sorted(both.to_vec().unwrap()), vec![knows, reports, follows]);

    let filtered = graph
        .vertex_edges(&mut ctx, hub, Direction::Both, &["knows", "follows", "nope"])
        .unwrap();
    assert_eq!(sorted(filtered.to_vec().unwrap()), vec![knows, follows]);

    let neighbors = graph
        .adjacent_vertices(&mut ctx, hub, Direction::Out, &["reports_to"])
        .unwrap();
    assert_eq!(neighbors.to_vec().unwrap(), vec![boss]);
    let neighbors = graph
        .adjacent_vertices(&mut ctx, hub, Direction::Both, &[])
        .unwrap();
    assert_eq!(
        sorted(neighbors.to_vec().unwrap()),
        vec![friend, boss, fan]
    );
}

#[test]
fn test_self_loop_seen_from_both_ends() {
    let graph = graph();
    let mut ctx = graph.context();
    let v = graph.add_vertex(&mut ctx).unwrap();
    let e = graph.add_edge(&mut ctx, v, v, "self").unwrap();
    let both = graph
        .vertex_edges(&mut ctx, v, Direction::Both, &[])
        .unwrap();
    assert_eq!(both.to_vec().unwrap(), vec![e, e]);
    let neighbors = graph
        .adjacent_vertices(&mut ctx, v, Direction::Both, &[])
        .unwrap();
    assert_eq!(neighbors.to_vec().unwrap(), vec![v, v]);
}

#[test]
fn test_iteration_spans_types() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Person");
    let p = graph.add_vertex(&mut ctx).unwrap();
    ctx.set_label("City");
    let c = graph.add_vertex(&mut ctx).unwrap();
    ctx.clear_label();
    let e = graph.add_edge(&mut ctx, p, c, "lives_in").unwrap();

    let vertices = graph.vertices(&mut ctx).unwrap();
    assert!(vertices.is_composite());
    assert_eq!(vertices.source_count(), 2);
    assert_eq!(sorted(vertices.to_vec().unwrap()), vec![p, c]);
    let by_label = graph.edges_by(&mut ctx, "label", "lives_in").unwrap();
    assert_eq!(by_label.to_vec().unwrap(), vec![e]);
    assert_eq!(
        sorted(graph.labels(&mut ctx, ElementKind::Vertex).unwrap()),
        vec!["City", "Person"]
    );
    assert_eq!(
        graph.labels(&mut ctx, ElementKind::Edge).unwrap(),
        vec!["lives_in"]
    );
}

#[test]
fn test_empty_graph_iteration() {
    let graph = graph();
    let mut ctx = graph.context();
    let vertices = graph.vertices(&mut ctx).unwrap();
    assert_eq!(vertices.source_count(), 0);
    assert!(vertices.iter().unwrap().next().is_none());
}

#[test]
fn test_unique_attribute_rejects_duplicates() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Account");
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    graph.set_property(&mut ctx, a, "login", "ann").unwrap();

    let session = graph.ensure_transaction(&mut ctx).unwrap();
    let engine = graph.engine();
    let ty = engine.find_type(session, "Account").unwrap().expect("type");
    let attr = engine
        .find_attribute(session, ty, "login")
        .unwrap()
        .expect("attribute");
    engine
        .index_attribute(session, attr, AttributeKind::Unique)
        .unwrap();

    let err = graph.set_property(&mut ctx, b, "login", "ann").unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    graph.set_property(&mut ctx, b, "login", "bob").unwrap();
    let plan = graph
        .explain_lookup(&mut ctx, ElementKind::Vertex, "login", "bob")
        .unwrap();
    assert_eq!(plan.index_lookups(), 1);
    assert_eq!(
        graph.vertices_by(&mut ctx, "login", "bob").unwrap().to_vec().unwrap(),
        vec![b]
    );
}

#[test]
fn test_persistence_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store").join("graph.db");
    let config = GraphConfig::default();
    let (alice, edge) = {
        let graph = TypedGraph::open(&path, &config).unwrap();
        let mut ctx = graph.context();
        ctx.set_label("Person");
        graph
            .create_key_index(&mut ctx, ElementKind::Vertex, "name")
            .unwrap();
        let alice = graph.add_vertex(&mut ctx).unwrap();
        let bob = graph.add_vertex(&mut ctx).unwrap();
        graph.set_property(&mut ctx, alice, "name", "alice").unwrap();
        let edge = graph.add_edge(&mut ctx, alice, bob, "knows").unwrap();
        graph.stop_transaction(&mut ctx, Conclusion::Success).unwrap();
        graph.shutdown(&mut ctx).unwrap();
        (alice, edge)
    };
    assert!(path.exists());

    let graph = TypedGraph::open(&path, &config).unwrap();
    let mut ctx = graph.context();
    assert_eq!(
        graph.property(&mut ctx, alice, "name").unwrap(),
        Some(PropertyValue::from("alice"))
    );
    assert_eq!(graph.edge_vertex(&mut ctx, edge, Direction::Out).unwrap(), alice);
    assert!(graph
        .indexed_keys(&mut ctx, ElementKind::Vertex)
        .unwrap()
        .contains("name"));
    let found = graph.vertices_by(&mut ctx, "name", "alice").unwrap();
    assert_eq!(found.to_vec().unwrap(), vec![alice]);
    drop(found);
    graph.shutdown(&mut ctx).unwrap();
}

#[test]
fn test_display_and_features() {
    let graph = graph();
    assert_eq!(graph.to_string(), "typedgraph[:memory:]");
    let features = graph.features();
    assert!(features.supports_key_indices);
    assert!(features.ignores_supplied_ids);
    assert!(!features.supports_transactions);
    assert!(!features.supports_map_property);
    assert_eq!(graph.engine().location(), ":memory:");
}

use typedgraph::engine::{AttributeInfo, AttributeKind, GraphEngine};
use typedgraph::{DataType, ElementKind, GraphConfig, PropertyValue, TypedGraph, TypedGraphError};

fn graph() -> TypedGraph {
    let _ = env_logger::builder().is_test(true).try_init();
    TypedGraph::open_in_memory(&GraphConfig::default()).expect("graph")
}

fn attribute(graph: &TypedGraph, label: &str, key: &str) -> Option<AttributeInfo> {
    let engine = graph.engine();
    let session = engine.open_session().expect("session");
    let info = engine
        .find_type(session, label)
        .expect("find type")
        .and_then(|ty| engine.find_attribute(session, ty, key).expect("find attribute"))
        .map(|attr| engine.attribute_info(session, attr).expect("attribute info"));
    engine.close_session(session).expect("close session");
    info
}

#[test]
fn test_create_on_fresh_graph() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Person");
    graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap();
    let info = attribute(&graph, "Person", "email").expect("email attribute");
    assert_eq!(info.kind, AttributeKind::Indexed);
    assert_eq!(info.data_type, DataType::String);
    assert_eq!(
        graph.labels(&mut ctx, ElementKind::Vertex).unwrap(),
        vec!["Person".to_string()]
    );
}

#[test]
fn test_create_twice_already_exists() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Person");
    graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap();
    let err = graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::AlreadyExists(_)));
}

#[test]
fn test_create_requires_label() {
    let graph = graph();
    let mut ctx = graph.context();
    let err = graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    ctx.set_label("");
    let err = graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
}

#[test]
fn test_create_on_label_of_other_kind() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    graph.add_edge(&mut ctx, a, b, "knows").unwrap();
    ctx.set_label("knows");
    let err = graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "since")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    assert!(attribute(&graph, "knows", "since").is_none());
}

#[test]
fn test_basic_attribute_promoted() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Person");
    let ann = graph.add_vertex(&mut ctx).unwrap();
    let bob = graph.add_vertex(&mut ctx).unwrap();
    graph.set_property(&mut ctx, ann, "age", 31).unwrap();
    graph.set_property(&mut ctx, bob, "age", 40).unwrap();
    assert_eq!(
        attribute(&graph, "Person", "age").expect("age").kind,
        AttributeKind::Basic
    );

    graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "age")
        .unwrap();
    let info = attribute(&graph, "Person", "age").expect("age");
    assert_eq!(info.kind, AttributeKind::Indexed);
    assert_eq!(info.data_type, DataType::Integer);

    let plan = graph
        .explain_lookup(&mut ctx, ElementKind::Vertex, "age", 40)
        .unwrap();
    assert_eq!(plan.index_lookups(), 1);
    let found = graph.vertices_by(&mut ctx, "age", 40).unwrap();
    assert_eq!(found.to_vec().unwrap(), vec![bob]);
}

#[test]
fn test_edge_key_index() {
    let graph = graph();
    let mut ctx = graph.context();
    let a = graph.add_vertex(&mut ctx).unwrap();
    let b = graph.add_vertex(&mut ctx).unwrap();
    ctx.set_label("Person");
    graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "name")
        .unwrap();
    ctx.set_label("knows");
    graph
        .create_key_index_with_type(&mut ctx, ElementKind::Edge, "since", DataType::Integer)
        .unwrap();
    let edge = graph.add_edge(&mut ctx, a, b, "knows").unwrap();
    graph.set_property(&mut ctx, edge, "since", 2001).unwrap();

    let vertex_keys = graph.indexed_keys(&mut ctx, ElementKind::Vertex).unwrap();
    let edge_keys = graph.indexed_keys(&mut ctx, ElementKind::Edge).unwrap();
    assert!(vertex_keys.contains("name"));
    assert!(!vertex_keys.contains("since"));
    assert_eq!(edge_keys.len(), 1);
    assert!(edge_keys.contains("since"));

    let found = graph.edges_by(&mut ctx, "since", 2001).unwrap();
    assert_eq!(found.to_vec().unwrap(), vec![edge]);
}

#[test]
fn test_declared_data_type_is_enforced() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Sensor");
    graph
        .create_key_index_with_type(&mut ctx, ElementKind::Vertex, "reading", DataType::Long)
        .unwrap();
    let sensor = graph.add_vertex(&mut ctx).unwrap();
    let err = graph
        .set_property(&mut ctx, sensor, "reading", "high")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::InvalidInput(_)));
    graph
        .set_property(&mut ctx, sensor, "reading", 9_000_000_000i64)
        .unwrap();
    let found = graph
        .vertices_by(&mut ctx, "reading", 9_000_000_000i64)
        .unwrap();
    assert_eq!(found.to_vec().unwrap(), vec![sensor]);
}

#[test]
fn test_drop_key_index_unsupported() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Person");
    graph
        .create_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap();
    let err = graph
        .drop_key_index(&mut ctx, ElementKind::Vertex, "email")
        .unwrap_err();
    assert!(matches!(err, TypedGraphError::Unsupported(_)));
    assert!(graph
        .indexed_keys(&mut ctx, ElementKind::Vertex)
        .unwrap()
        .contains("email"));
}

#[test]
fn test_every_declared_data_type_is_writable_and_searchable() {
    let graph = graph();
    let mut ctx = graph.context();
    ctx.set_label("Reading");
    let samples = [
        ("flag", DataType::Boolean, PropertyValue::Bool(true)),
        ("count", DataType::Integer, PropertyValue::Int(7)),
        ("total", DataType::Long, PropertyValue::Long(5)),
        ("ratio", DataType::Double, PropertyValue::Double(0.5)),
        ("tag", DataType::String, PropertyValue::from("hot")),
    ];
    for (key, data_type, _) in &samples {
        graph
            .create_key_index_with_type(&mut ctx, ElementKind::Vertex, key, *data_type)
            .unwrap();
    }
    let reading = graph.add_vertex(&mut ctx).unwrap();
    for (key, data_type, value) in &samples {
        graph
            .set_property(&mut ctx, reading, key, value.clone())
            .unwrap();
        assert_eq!(attribute(&graph, "Reading", key).expect("attribute").data_type, *data_type);
        let plan = graph
            .explain_lookup(&mut ctx, ElementKind::Vertex, key, value.clone())
            .unwrap();
        assert_eq!(plan.index_lookups(), 1);
        let found = graph.vertices_by(&mut ctx, key, value.clone()).unwrap();
        assert_eq!(found.to_vec().unwrap(), vec![reading]);
    }
}

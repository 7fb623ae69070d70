use crate::{
    Conclusion, ElementKind, GraphConfig, TypedGraph, TypedGraphError, engine::GraphEngine,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub database: String,
    pub config: Option<String>,
    pub command: String,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut database = String::from("memory");
        let mut config = None;
        let mut command = String::from("status");
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--db" | "--database" => {
                    database = iter
                        .next()
                        .ok_or_else(|| "--db requires a value".to_string())?
                        .to_string();
                }
                "--config" => {
                    config = Some(
                        iter.next()
                            .ok_or_else(|| "--config requires a value".to_string())?
                            .to_string(),
                    );
                }
                "--command" => {
                    command = iter
                        .next()
                        .ok_or_else(|| "--command requires a value".to_string())?
                        .to_string();
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    command = arg.to_string();
                }
            }
        }
        Ok(Self {
            database,
            config,
            command,
        })
    }

    pub fn help() -> &'static str {
        "Usage: typedgraph [--db memory|PATH] [--config FILE] [status|types|indexed]\n"
    }

    pub fn graph_config(&self) -> Result<GraphConfig, TypedGraphError> {
        match &self.config {
            Some(path) => GraphConfig::from_path(path),
            None => Ok(GraphConfig::default()),
        }
    }
}

/// Runs an inspection command and returns the lines to print.
pub fn run_command<E: GraphEngine + 'static>(
    graph: &TypedGraph<E>,
    command: &str,
) -> Result<Vec<String>, TypedGraphError> {
    let mut ctx = graph.context();
    let lines = match command {
        "status" => {
            let vertices = graph.vertices(&mut ctx)?.iter()?.count();
            let edges = graph.edges(&mut ctx)?.iter()?.count();
            let vertex_types = graph.labels(&mut ctx, ElementKind::Vertex)?.len();
            let edge_types = graph.labels(&mut ctx, ElementKind::Edge)?.len();
            vec![format!(
                "store={} vertices={vertices} edges={edges} vertex_types={vertex_types} edge_types={edge_types}",
                graph.engine().location()
            )]
        }
        "types" => {
            let mut lines = Vec::new();
            for kind in [ElementKind::Vertex, ElementKind::Edge] {
                for label in graph.labels(&mut ctx, kind)? {
                    lines.push(format!("{kind}:{label}"));
                }
            }
            lines
        }
        "indexed" => {
            let mut lines = Vec::new();
            for kind in [ElementKind::Vertex, ElementKind::Edge] {
                let mut keys: Vec<String> =
                    graph.indexed_keys(&mut ctx, kind)?.into_iter().collect();
                keys.sort();
                for key in keys {
                    lines.push(format!("{kind}:{key}"));
                }
            }
            lines
        }
        other => {
            return Err(TypedGraphError::invalid_input(format!(
                "unknown command {other}"
            )));
        }
    };
    graph.stop_transaction(&mut ctx, Conclusion::Success)?;
    Ok(lines)
}

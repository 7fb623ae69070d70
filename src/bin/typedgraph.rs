use std::{env, process};

use typedgraph::{
    TypedGraph,
    client::{CommandLineConfig, run_command},
};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let graph = match open_graph(&config) {
        Ok(g) => g,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    match run_command(&graph, &config.command) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(err) => {
            eprintln!("command failed: {err}");
            process::exit(1);
        }
    }

    let mut ctx = graph.context();
    if let Err(err) = graph.shutdown(&mut ctx) {
        eprintln!("shutdown failed: {err}");
        process::exit(1);
    }
}

fn open_graph(config: &CommandLineConfig) -> Result<TypedGraph, String> {
    let graph_config = config.graph_config().map_err(|e| e.to_string())?;
    if config.database == "memory" {
        TypedGraph::open_in_memory(&graph_config).map_err(|e| e.to_string())
    } else {
        TypedGraph::open(&config.database, &graph_config).map_err(|e| e.to_string())
    }
}

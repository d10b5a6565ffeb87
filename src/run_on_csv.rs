use anyhow::{Context, Result};
use apq_routes::{read_csv_edges, shortest_paths, Graph, Vertex};
use clap::Parser;
use csv::Writer;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::time::SystemTime;

#[derive(Parser, Debug)]
#[command(name = "csv")]
#[command(about = "Build a graph from a CSV with node_id,neighbor_id,weight rows and run Dijkstra from a series of source ids.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: String,

    /// Number of runs. Picks a new (deterministic) source id per run (0, 1, 2, 3, ...num_runs).
    #[arg(short, long)]
    num_runs: usize,

    /// Output CSV (node_id, distance) for the first run.
    #[arg(short, long)]
    out: Option<String>,

    /// Include unreachable nodes in output with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,
}

fn parse_csv_and_build_graph(path: &str) -> Result<Graph<usize, f64>> {
    let file = File::open(path).with_context(|| format!("opening {}", path))?;
    read_csv_edges(BufReader::new(file)).with_context(|| format!("reading {}", path))
}

fn write_distances(graph: &Graph<usize, f64>, source: &Vertex<usize>, out_path: &str, include_unreachable: bool) -> Result<()> {
    let paths = shortest_paths(graph, source)?;
    let mut dist: Vec<(usize, f64)> = graph
        .vertices()
        .map(|v| (*v.label(), paths.cost(v).unwrap_or(f64::INFINITY)))
        .filter(|(_, d)| d.is_finite() || include_unreachable)
        .collect();
    dist.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut wtr = Writer::from_path(out_path).with_context(|| format!("creating CSV {}", out_path))?;
    wtr.write_record(["node_id", "distance"])?;
    for (node_id, d) in &dist {
        let val = if d.is_finite() {
            format!("{:.6}", d)
        } else {
            String::from("inf")
        };
        wtr.write_record(&[node_id.to_string(), val])?;
    }
    wtr.flush()?;
    info!("Wrote distances for {} nodes to {}", dist.len(), out_path);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let graph = parse_csv_and_build_graph(&cli.csv)?;

    let mut duration_millis = Vec::new();
    for src_idx in 0..cli.num_runs {
        let Some(source) = graph.get_vertex_by_label(&src_idx) else {
            info!("Skipping source {}: not in graph", src_idx);
            continue;
        };
        let now = SystemTime::now();
        let paths = shortest_paths(&graph, &source)?;
        if let Ok(elapsed) = now.elapsed() {
            duration_millis.push(elapsed.as_secs_f64() * 1000.0);
        }
        info!("Source {} reaches {} nodes", src_idx, paths.len());
    }
    println!("{:?}", duration_millis);

    if let Some(out_path) = &cli.out {
        let first = graph
            .get_vertex_by_label(&0)
            .context("node 0 is not in the graph")?;
        write_distances(&graph, &first, out_path, cli.include_unreachable)?;
    }

    Ok(())
}

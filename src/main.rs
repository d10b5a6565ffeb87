use anyhow::{anyhow, Context, Result};
use apq_routes::{read_route_map, PathStep, RouteMap, WeightField};
use clap::{Parser, ValueEnum};
use csv::WriterBuilder;
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::time::SystemTime;

#[derive(Parser, Debug)]
#[command(name = "route")]
#[command(about = "Load a route map and print the cheapest route between two node ids.", long_about = None)]
struct Cli {
    /// Path to the route map file (Node/Edge records with gps)
    #[arg(short, long)]
    graph: String,

    /// Node id to start from
    #[arg(short, long)]
    source: i64,

    /// Node id to route to
    #[arg(short, long)]
    target: i64,

    /// Edge field used as the cost
    #[arg(short, long, value_enum, default_value_t = Weight::Time)]
    weight: Weight,

    /// Output file for the route table. If omitted, writes to stdout.
    #[arg(short, long)]
    out: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Weight {
    Length,
    Time,
}

impl From<Weight> for WeightField {
    fn from(weight: Weight) -> Self {
        match weight {
            Weight::Length => WeightField::Length,
            Weight::Time => WeightField::Time,
        }
    }
}

// One `W` row per step: type, latitude, longitude, element, cost.
fn write_path<W: io::Write>(map: &RouteMap<i64>, path: &[PathStep<i64>], out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(out);
    wtr.write_record(["type", "latitude", "longitude", "element", "cost"])?;
    for step in path {
        let gps = map
            .coordinates(&step.vertex)
            .with_context(|| format!("no coordinates for node {}", step.vertex))?;
        wtr.write_record(&[
            String::from("W"),
            gps.latitude.to_string(),
            gps.longitude.to_string(),
            step.vertex.to_string(),
            step.cost.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn summary(map: &RouteMap<i64>, path: &[PathStep<i64>]) -> String {
    let cost = path.last().map(|step| step.cost).unwrap_or(0.0);
    format!(
        "Cost: {:.2}; straight-line length (m): {:.2}",
        cost,
        map.path_length_meters(path)
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.graph).with_context(|| format!("opening {}", &cli.graph))?;
    let now = SystemTime::now();
    let map = read_route_map(BufReader::new(file), cli.weight.into())
        .with_context(|| format!("reading {}", &cli.graph))?;
    if let Ok(elapsed) = now.elapsed() {
        info!("Time to build graph {} s", elapsed.as_secs_f64());
    }

    let source = map
        .get_vertex_by_label(&cli.source)
        .ok_or_else(|| anyhow!("source node {} is not in the map", cli.source))?;
    let target = map
        .get_vertex_by_label(&cli.target)
        .ok_or_else(|| anyhow!("target node {} is not in the map", cli.target))?;

    let now = SystemTime::now();
    let path = map
        .sp(&source, &target)
        .with_context(|| format!("routing {} -> {}", cli.source, cli.target))?;
    if let Ok(elapsed) = now.elapsed() {
        info!("Time to get shortest path {} s", elapsed.as_secs_f64());
    }

    // Only the route table goes to stdout; progress and the summary go to stderr.
    match &cli.out {
        Some(out_path) => {
            let file = File::create(out_path).with_context(|| format!("creating {}", out_path))?;
            write_path(&map, &path, file)?;
            info!("Wrote {} steps to {}", path.len(), out_path);
        }
        None => write_path(&map, &path, io::stdout().lock())?,
    }
    eprintln!("{}", summary(&map, &path));

    Ok(())
}

/*
Reader for the line-oriented graph file format.

A file is a sequence of records. Each record starts with a header line, `Node` or
`Edge`, followed by `name value...` lines up to the next header:

    Node
    id: 1669466540
    gps: 51.893 -8.492
    Edge
    from: 1669466540
    to: 348809726
    length: 120.5
    time: 9.8
    oneway: N

Field names may carry a trailing colon. Blank lines and `#` comments are skipped.
`gps` is only required for route maps, `time` only when it is the chosen weight.

Plain edge lists can also be read from CSV with a header row and
`node_id,neighbor_id,weight` columns; see `read_csv_edges`.
*/

use hashbrown::HashMap;
use log::{info, warn};
use std::io::{BufRead, Read};

use crate::error::LoadError;
use crate::geo::Coordinates;
use crate::graph::Graph;
use crate::route_map::RouteMap;

/// Which edge field becomes the edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightField {
    #[default]
    Length,
    Time,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub line: usize,
    pub id: i64,
    pub gps: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub line: usize,
    pub from: i64,
    pub to: i64,
    pub length: f64,
    pub time: Option<f64>,
    /// Carried through as written; the graph is undirected either way.
    pub oneway: Option<String>,
}

impl EdgeRecord {
    pub fn weight(&self, field: WeightField) -> Result<f64, LoadError> {
        match field {
            WeightField::Length => Ok(self.length),
            WeightField::Time => self.time.ok_or_else(|| syntax(self.line, "edge has no time field")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Node(NodeRecord),
    Edge(EdgeRecord),
}

#[derive(Clone, Copy)]
enum RecordKind {
    Node,
    Edge,
}

impl RecordKind {
    fn knows(self, field: &str) -> bool {
        match self {
            RecordKind::Node => matches!(field, "id" | "gps"),
            RecordKind::Edge => matches!(field, "from" | "to" | "length" | "time" | "oneway"),
        }
    }
}

// A record whose fields have been split but not yet typed.
struct RawRecord {
    kind: RecordKind,
    line: usize,
    fields: HashMap<String, (usize, Vec<String>)>,
}

impl RawRecord {
    fn new(kind: RecordKind, line: usize) -> Self {
        Self {
            kind,
            line,
            fields: HashMap::new(),
        }
    }

    fn values(&self, name: &str) -> Option<(usize, &[String])> {
        self.fields
            .get(name)
            .map(|(line, values)| (*line, values.as_slice()))
    }

    fn required(&self, name: &str) -> Result<(usize, &[String]), LoadError> {
        self.values(name)
            .ok_or_else(|| syntax(self.line, &format!("record is missing field '{}'", name)))
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, LoadError> {
        let Some((line, values)) = self.values(name) else {
            return Ok(None);
        };
        let first = values
            .first()
            .ok_or_else(|| syntax(line, &format!("field '{}' has no value", name)))?;
        first
            .parse()
            .map(Some)
            .map_err(|_| syntax(line, &format!("cannot parse '{}' for field '{}'", first, name)))
    }

    fn required_number<T: std::str::FromStr>(&self, name: &str) -> Result<T, LoadError> {
        self.required(name)?;
        self.number(name)?
            .ok_or_else(|| syntax(self.line, &format!("record is missing field '{}'", name)))
    }

    fn finish(self) -> Result<Record, LoadError> {
        match self.kind {
            RecordKind::Node => {
                let gps = match self.values("gps") {
                    Some((line, [lat, lon, ..])) => {
                        let lat: f64 = lat
                            .parse()
                            .map_err(|_| syntax(line, &format!("bad latitude '{}'", lat)))?;
                        let lon: f64 = lon
                            .parse()
                            .map_err(|_| syntax(line, &format!("bad longitude '{}'", lon)))?;
                        Some(Coordinates::new(round6(lat), round6(lon)))
                    }
                    Some((line, _)) => return Err(syntax(line, "gps needs a latitude and a longitude")),
                    None => None,
                };
                Ok(Record::Node(NodeRecord {
                    line: self.line,
                    id: self.required_number("id")?,
                    gps,
                }))
            }
            RecordKind::Edge => Ok(Record::Edge(EdgeRecord {
                line: self.line,
                from: self.required_number("from")?,
                to: self.required_number("to")?,
                length: self.required_number("length")?,
                time: self.number("time")?,
                oneway: self
                    .values("oneway")
                    .and_then(|(_, values)| values.first().cloned()),
            })),
        }
    }
}

fn syntax(line: usize, message: &str) -> LoadError {
    LoadError::Syntax {
        line,
        message: message.to_string(),
    }
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Splits a graph file into typed records, in file order.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let kind = match trimmed {
            "Node" => Some(RecordKind::Node),
            "Edge" => Some(RecordKind::Edge),
            _ => None,
        };
        if let Some(kind) = kind {
            if let Some(raw) = current.take() {
                records.push(raw.finish()?);
            }
            current = Some(RawRecord::new(kind, line_no));
            continue;
        }

        let raw = current
            .as_mut()
            .ok_or_else(|| syntax(line_no, "field outside of a Node or Edge record"))?;
        let mut parts = trimmed.split_whitespace();
        let name = parts
            .next()
            .map(|name| name.trim_end_matches(':').to_ascii_lowercase())
            .unwrap_or_default();
        if let Some((first_line, _)) = raw.fields.get(&name) {
            return Err(syntax(
                line_no,
                &format!("field '{}' repeats line {}", name, first_line),
            ));
        }
        if !raw.kind.knows(&name) {
            warn!("line {}: ignoring unknown field '{}'", line_no, name);
        }
        raw.fields
            .insert(name, (line_no, parts.map(str::to_string).collect()));
    }
    if let Some(raw) = current {
        records.push(raw.finish()?);
    }
    Ok(records)
}

fn add_edges(graph: &mut Graph<i64, f64>, edges: &[EdgeRecord], weight: WeightField) -> Result<(), LoadError> {
    for edge in edges {
        let from = graph
            .get_vertex_by_label(&edge.from)
            .ok_or(LoadError::UnknownVertex { line: edge.line, label: edge.from })?;
        let to = graph
            .get_vertex_by_label(&edge.to)
            .ok_or(LoadError::UnknownVertex { line: edge.line, label: edge.to })?;
        let cost = edge.weight(weight)?;
        if graph.add_edge(&from, &to, cost).is_none() {
            warn!("line {}: skipping self-loop on {}", edge.line, edge.from);
        }
    }
    Ok(())
}

fn split(records: Vec<Record>) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for record in records {
        match record {
            Record::Node(node) => nodes.push(node),
            Record::Edge(edge) => edges.push(edge),
        }
    }
    (nodes, edges)
}

/// Builds a plain weighted graph; `gps` fields are ignored.
pub fn read_graph<R: BufRead>(reader: R, weight: WeightField) -> Result<Graph<i64, f64>, LoadError> {
    let (nodes, edges) = split(parse_records(reader)?);
    let mut graph = Graph::new();
    for node in &nodes {
        graph
            .add_vertex(node.id)
            .map_err(|source| LoadError::Graph { line: node.line, source })?;
    }
    info!("Read {} vertices and added {} into graph", nodes.len(), graph.num_vertices());

    add_edges(&mut graph, &edges, weight)?;
    info!("Read {} edges and added {} into graph", edges.len(), graph.num_edges());
    Ok(graph)
}

/// Builds a route map. Every node needs a `gps` field.
pub fn read_route_map<R: BufRead>(reader: R, weight: WeightField) -> Result<RouteMap<i64>, LoadError> {
    let (nodes, edges) = split(parse_records(reader)?);
    let mut map = RouteMap::new();
    for node in &nodes {
        let gps = node
            .gps
            .ok_or_else(|| syntax(node.line, "node has no gps field"))?;
        map.add_vertex(node.id, gps)
            .map_err(|source| LoadError::Graph { line: node.line, source })?;
    }
    info!("Read {} vertices, added {} into graph", nodes.len(), map.graph().num_vertices());

    add_edges(map.graph_mut(), &edges, weight)?;
    info!("Read {} edges, added {} into graph", edges.len(), map.graph().num_edges());
    Ok(map)
}

/// Builds a graph from CSV rows of `node_id,neighbor_id,weight` after a header row.
/// Vertices are created on first mention.
pub fn read_csv_edges<R: Read>(reader: R) -> Result<Graph<usize, f64>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut graph = Graph::new();
    let mut rows = 0;
    for result in rdr.records() {
        let record = result?;
        rows += 1;
        let line = record.position().map_or(rows + 1, |pos| pos.line() as usize);
        let field = |i: usize, name: &str| {
            record
                .get(i)
                .ok_or_else(|| syntax(line, &format!("row has no {} column", name)))
        };
        let node_id: usize = parse_column(field(0, "node_id")?, "node_id", line)?;
        let neighbor_id: usize = parse_column(field(1, "neighbor_id")?, "neighbor_id", line)?;
        let weight: f64 = parse_column(field(2, "weight")?, "weight", line)?;

        let u = graph.add_vertex_if_new(node_id);
        let v = graph.add_vertex_if_new(neighbor_id);
        if graph.add_edge(&u, &v, weight).is_none() {
            warn!("line {}: skipping self-loop on {}", line, node_id);
        }
    }
    info!(
        "Read {} rows into {} vertices and {} edges",
        rows,
        graph.num_vertices(),
        graph.num_edges()
    );
    Ok(graph)
}

fn parse_column<T: std::str::FromStr>(value: &str, name: &str, line: usize) -> Result<T, LoadError> {
    value
        .parse()
        .map_err(|_| syntax(line, &format!("cannot parse '{}' for column {}", value, name)))
}

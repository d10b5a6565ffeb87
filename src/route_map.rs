/*
Route map: an undirected graph of road junctions where every vertex carries GPS
coordinates and every edge a travel cost.
*/

use hashbrown::HashMap;
use std::hash::Hash;

use crate::dijkstra::{self, PathStep, ShortestPaths};
use crate::error::{GraphError, RouteError};
use crate::geo::Coordinates;
use crate::graph::{Edge, EdgeId, Graph, Vertex};

#[derive(Debug, Clone)]
pub struct RouteMap<L> {
    graph: Graph<L, f64>,
    coords: HashMap<Vertex<L>, Coordinates>,
}

impl<L: Clone + Eq + Hash> Default for RouteMap<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Clone + Eq + Hash> RouteMap<L> {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            coords: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &Graph<L, f64> {
        &self.graph
    }

    // Edge loading only; vertices must go through `add_vertex` to get coordinates.
    pub(crate) fn graph_mut(&mut self) -> &mut Graph<L, f64> {
        &mut self.graph
    }

    pub fn add_vertex(&mut self, label: L, coordinates: Coordinates) -> Result<Vertex<L>, GraphError> {
        let vertex = self.graph.add_vertex(label)?;
        self.coords.insert(vertex.clone(), coordinates);
        Ok(vertex)
    }

    pub fn add_edge(&mut self, v1: &Vertex<L>, v2: &Vertex<L>, cost: f64) -> Option<&Edge<L, f64>> {
        self.graph.add_edge(v1, v2, cost)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge<L, f64>> {
        self.graph.remove_edge(id)
    }

    pub fn remove_vertex(&mut self, v: &Vertex<L>) -> bool {
        self.coords.remove(v);
        self.graph.remove_vertex(v)
    }

    pub fn get_vertex_by_label(&self, label: &L) -> Option<Vertex<L>> {
        self.graph.get_vertex_by_label(label)
    }

    pub fn coordinates(&self, v: &Vertex<L>) -> Option<&Coordinates> {
        self.coords.get(v)
    }

    pub fn shortest_paths(&self, source: &Vertex<L>) -> Result<ShortestPaths<L>, RouteError> {
        dijkstra::shortest_paths(&self.graph, source)
    }

    /// Cheapest path from `source` to `target`, source first, with the
    /// accumulated cost at every step.
    pub fn sp(&self, source: &Vertex<L>, target: &Vertex<L>) -> Result<Vec<PathStep<L>>, RouteError> {
        if !self.graph.contains_vertex(target) {
            return Err(RouteError::UnknownVertex);
        }
        self.shortest_paths(source)?.path_to(target)
    }

    /// Straight-line length of a path in meters, summed leg by leg.
    pub fn path_length_meters(&self, path: &[PathStep<L>]) -> f64 {
        path.windows(2)
            .filter_map(|leg| {
                let from = self.coords.get(&leg[0].vertex)?;
                let to = self.coords.get(&leg[1].vertex)?;
                Some(from.distance_meters(to))
            })
            .sum()
    }
}

use hashbrown::HashMap;
use log::debug;
use ordered_float::OrderedFloat;
use std::hash::Hash;

use crate::error::RouteError;
use crate::graph::{Graph, Vertex};
use crate::searchable_apq::SearchableAPQ;

pub type Cost = f64;

/// Final cost of a closed vertex and the vertex it was reached from.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry<L> {
    pub cost: Cost,
    pub predecessor: Option<Vertex<L>>,
}

/// One vertex on a reconstructed path with its cost from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep<L> {
    pub vertex: Vertex<L>,
    pub cost: Cost,
}

/// The closed set of one Dijkstra run. Unreachable vertices are absent.
#[derive(Debug, Clone)]
pub struct ShortestPaths<L> {
    source: Vertex<L>,
    closed: HashMap<Vertex<L>, PathEntry<L>>,
}

impl<L: Clone + Eq + Hash> ShortestPaths<L> {
    pub fn source(&self) -> &Vertex<L> {
        &self.source
    }

    pub fn get(&self, v: &Vertex<L>) -> Option<&PathEntry<L>> {
        self.closed.get(v)
    }

    pub fn cost(&self, v: &Vertex<L>) -> Option<Cost> {
        self.closed.get(v).map(|entry| entry.cost)
    }

    pub fn predecessor(&self, v: &Vertex<L>) -> Option<&Vertex<L>> {
        self.closed.get(v)?.predecessor.as_ref()
    }

    pub fn contains(&self, v: &Vertex<L>) -> bool {
        self.closed.contains_key(v)
    }

    pub fn len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vertex<L>, &PathEntry<L>)> + '_ {
        self.closed.iter()
    }

    /// Walks predecessors back from `target` and returns the path in
    /// source -> target order.
    pub fn path_to(&self, target: &Vertex<L>) -> Result<Vec<PathStep<L>>, RouteError> {
        if !self.closed.contains_key(target) {
            return Err(RouteError::Unreachable);
        }
        let mut path = Vec::new();
        let mut current = Some(target.clone());
        while let Some(vertex) = current {
            let entry = self.closed.get(&vertex).ok_or(RouteError::Unreachable)?;
            current = entry.predecessor.clone();
            path.push(PathStep {
                vertex,
                cost: entry.cost,
            });
        }
        path.reverse();
        Ok(path)
    }
}

/// Dijkstra from `source` to every reachable vertex.
///
/// Edge weights must be non-negative. That is not checked: with a negative
/// weight a vertex can be closed before its cheapest route is seen.
pub fn shortest_paths<L, W>(graph: &Graph<L, W>, source: &Vertex<L>) -> Result<ShortestPaths<L>, RouteError>
where
    L: Clone + Eq + Hash,
    W: Copy + Into<f64>,
{
    if !graph.contains_vertex(source) {
        return Err(RouteError::UnknownVertex);
    }

    let mut open = SearchableAPQ::new();
    // Predecessors of vertices that are still open.
    let mut predecessors: HashMap<Vertex<L>, Option<Vertex<L>>> = HashMap::new();
    let mut closed = HashMap::new();

    open.add(OrderedFloat(0.0), source.clone())?;
    predecessors.insert(source.clone(), None);

    while let Some((OrderedFloat(cost), vertex)) = open.remove_min() {
        let predecessor = predecessors.remove(&vertex).flatten();
        closed.insert(vertex.clone(), PathEntry { cost, predecessor });

        for edge in graph.get_edges(&vertex) {
            let Some(opposite) = edge.opposite(&vertex) else {
                continue;
            };
            if closed.contains_key(opposite) {
                continue;
            }
            let new_cost = cost + (*edge.element()).into();
            match open.search(opposite) {
                // Unseen: open it.
                None => {
                    open.add(OrderedFloat(new_cost), opposite.clone())?;
                    predecessors.insert(opposite.clone(), Some(vertex.clone()));
                }
                // Already open: decrease its key in place if this route is cheaper.
                Some(handle) => {
                    let cheaper = open
                        .get_key(&handle)
                        .is_some_and(|&OrderedFloat(old_cost)| new_cost < old_cost);
                    if cheaper {
                        open.update_key(&handle, OrderedFloat(new_cost))?;
                        predecessors.insert(opposite.clone(), Some(vertex.clone()));
                    }
                }
            }
        }
    }

    debug!(
        "dijkstra closed {} of {} vertices",
        closed.len(),
        graph.num_vertices()
    );
    Ok(ShortestPaths {
        source: source.clone(),
        closed,
    })
}

/*
Undirected simple graph with labelled vertices and weighted edges.

Adjacency is a nested map: vertex -> (neighbour -> edge id). Every edge is stored once
in the edge table and referenced from both endpoints' neighbour maps, so the two sides
always agree on the same edge. The outer map doubles as the label index.

Multi-edges are not kept (a new edge between the same pair replaces the old one) and
self-loops are rejected.
*/

use hashbrown::HashMap;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use crate::error::GraphError;

/// A vertex, identified by its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vertex<L>(L);

impl<L> Vertex<L> {
    pub fn new(label: L) -> Self {
        Vertex(label)
    }

    pub fn label(&self) -> &L {
        &self.0
    }
}

// Lets the adjacency map be queried by a bare label.
impl<L> Borrow<L> for Vertex<L> {
    fn borrow(&self) -> &L {
        &self.0
    }
}

impl<L: fmt::Display> fmt::Display for Vertex<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Edge<L, W> {
    id: EdgeId,
    endpoints: (Vertex<L>, Vertex<L>),
    element: W,
}

impl<L: PartialEq, W> Edge<L, W> {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn element(&self) -> &W {
        &self.element
    }

    pub fn vertices(&self) -> (&Vertex<L>, &Vertex<L>) {
        (&self.endpoints.0, &self.endpoints.1)
    }

    pub fn start(&self) -> &Vertex<L> {
        &self.endpoints.0
    }

    pub fn end(&self) -> &Vertex<L> {
        &self.endpoints.1
    }

    /// The endpoint across from `v`, or `None` if the edge is not incident on `v`.
    pub fn opposite(&self, v: &Vertex<L>) -> Option<&Vertex<L>> {
        if *v == self.endpoints.0 {
            Some(&self.endpoints.1)
        } else if *v == self.endpoints.1 {
            Some(&self.endpoints.0)
        } else {
            None
        }
    }
}

impl<L: fmt::Display, W: fmt::Display> fmt::Display for Edge<L, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(E: {}; {} -- {})",
            self.element, self.endpoints.0, self.endpoints.1
        )
    }
}

/// Reachable vertices mapped to the edge they were discovered through.
pub type DepthFirstTree<L> = HashMap<Vertex<L>, Option<EdgeId>>;

/// Reachable vertices mapped to their discovering edge and hop count.
pub type BreadthFirstTree<L> = HashMap<Vertex<L>, (Option<EdgeId>, usize)>;

#[derive(Debug, Clone)]
pub struct Graph<L, W> {
    adj_map: HashMap<Vertex<L>, HashMap<Vertex<L>, EdgeId>>,
    edges: HashMap<EdgeId, Edge<L, W>>,
    next_edge_id: usize,
}

impl<L: Clone + Eq + Hash, W> Default for Graph<L, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Clone + Eq + Hash, W> Graph<L, W> {
    pub fn new() -> Self {
        Self {
            adj_map: HashMap::new(),
            edges: HashMap::new(),
            next_edge_id: 0,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.adj_map.len()
    }

    /// Every edge sits in two neighbour maps, so this is half their total size.
    pub fn num_edges(&self) -> usize {
        let total: usize = self.adj_map.values().map(|neighbors| neighbors.len()).sum();
        total / 2
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<L>> + '_ {
        self.adj_map.keys()
    }

    /// All edges, each once.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<L, W>> + '_ {
        self.edges.values()
    }

    pub fn contains_vertex(&self, v: &Vertex<L>) -> bool {
        self.adj_map.contains_key(v)
    }

    pub fn get_vertex_by_label(&self, label: &L) -> Option<Vertex<L>> {
        self.adj_map.get_key_value(label).map(|(v, _)| v.clone())
    }

    /// Adds a vertex. A label that is already present is rejected.
    pub fn add_vertex(&mut self, label: L) -> Result<Vertex<L>, GraphError> {
        if self.adj_map.contains_key(&label) {
            return Err(GraphError::DuplicateVertex);
        }
        let vertex = Vertex(label);
        self.adj_map.insert(vertex.clone(), HashMap::new());
        Ok(vertex)
    }

    pub fn add_vertex_if_new(&mut self, label: L) -> Vertex<L> {
        match self.get_vertex_by_label(&label) {
            Some(vertex) => vertex,
            None => {
                let vertex = Vertex(label);
                self.adj_map.insert(vertex.clone(), HashMap::new());
                vertex
            }
        }
    }

    /// Adds an edge between `v1` and `v2`, replacing any edge already joining them.
    ///
    /// Returns `None` and leaves the graph unchanged when either endpoint is
    /// missing or when `v1 == v2`.
    pub fn add_edge(&mut self, v1: &Vertex<L>, v2: &Vertex<L>, element: W) -> Option<&Edge<L, W>> {
        if v1 == v2 || !self.adj_map.contains_key(v1) || !self.adj_map.contains_key(v2) {
            return None;
        }
        if let Some(old) = self.adj_map.get(v1).and_then(|neighbors| neighbors.get(v2)) {
            self.edges.remove(old);
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.adj_map.get_mut(v1)?.insert(v2.clone(), id);
        self.adj_map.get_mut(v2)?.insert(v1.clone(), id);
        self.edges.insert(
            id,
            Edge {
                id,
                endpoints: (v1.clone(), v2.clone()),
                element,
            },
        );
        self.edges.get(&id)
    }

    /// Removes `v` and every edge incident on it. Returns whether `v` was present.
    pub fn remove_vertex(&mut self, v: &Vertex<L>) -> bool {
        let Some(neighbors) = self.adj_map.remove(v) else {
            return false;
        };
        for (neighbor, id) in neighbors {
            if let Some(other_side) = self.adj_map.get_mut(&neighbor) {
                other_side.remove(v);
            }
            self.edges.remove(&id);
        }
        true
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge<L, W>> {
        let edge = self.edges.remove(&id)?;
        let (v1, v2) = edge.vertices();
        if let Some(neighbors) = self.adj_map.get_mut(v1) {
            neighbors.remove(v2);
        }
        if let Some(neighbors) = self.adj_map.get_mut(v2) {
            neighbors.remove(v1);
        }
        Some(edge)
    }

    pub fn get_edge(&self, v1: &Vertex<L>, v2: &Vertex<L>) -> Option<&Edge<L, W>> {
        let id = self.adj_map.get(v1)?.get(v2)?;
        self.edges.get(id)
    }

    /// Edges incident on `v`. Empty when `v` is not in the graph.
    pub fn get_edges<'a>(&'a self, v: &Vertex<L>) -> impl Iterator<Item = &'a Edge<L, W>> + 'a {
        self.adj_map
            .get(v)
            .into_iter()
            .flat_map(move |neighbors| neighbors.values().filter_map(move |id| self.edges.get(id)))
    }

    pub fn degree(&self, v: &Vertex<L>) -> Option<usize> {
        self.adj_map.get(v).map(|neighbors| neighbors.len())
    }

    pub fn highest_degree(&self) -> Option<Vertex<L>> {
        self.adj_map
            .iter()
            .max_by_key(|(_, neighbors)| neighbors.len())
            .map(|(v, _)| v.clone())
    }

    /// Depth-first search from `v`. The start vertex maps to `None`.
    pub fn depth_first_search(&self, v: &Vertex<L>) -> DepthFirstTree<L> {
        let mut marked = HashMap::new();
        if !self.contains_vertex(v) {
            return marked;
        }
        let mut stack = vec![(v.clone(), None)];
        while let Some((vertex, via)) = stack.pop() {
            if marked.contains_key(&vertex) {
                continue;
            }
            for edge in self.get_edges(&vertex) {
                if let Some(opposite) = edge.opposite(&vertex) {
                    if !marked.contains_key(opposite) {
                        stack.push((opposite.clone(), Some(edge.id())));
                    }
                }
            }
            marked.insert(vertex, via);
        }
        marked
    }

    /// Breadth-first search from `v`, one full frontier per layer.
    pub fn breadth_first_search(&self, v: &Vertex<L>) -> BreadthFirstTree<L> {
        let mut marked = HashMap::new();
        if !self.contains_vertex(v) {
            return marked;
        }
        marked.insert(v.clone(), (None, 0));
        let mut layer = vec![v.clone()];
        let mut hops = 0;
        while !layer.is_empty() {
            hops += 1;
            let mut next_layer = Vec::new();
            for vertex in &layer {
                for edge in self.get_edges(vertex) {
                    if let Some(opposite) = edge.opposite(vertex) {
                        if !marked.contains_key(opposite) {
                            marked.insert(opposite.clone(), (Some(edge.id()), hops));
                            next_layer.push(opposite.clone());
                        }
                    }
                }
            }
            layer = next_layer;
        }
        marked
    }

    /// The vertex whose farthest reachable vertex is the fewest hops away.
    pub fn central_vertex(&self) -> Option<Vertex<L>> {
        self.vertices()
            .filter_map(|v| max_distance(&self.breadth_first_search(v)).map(|d| (v, d)))
            .min_by_key(|&(_, d)| d)
            .map(|(v, _)| v.clone())
    }
}

/// Largest hop count in a breadth-first tree.
pub fn max_distance<L>(bfs: &BreadthFirstTree<L>) -> Option<usize> {
    bfs.values().map(|&(_, hops)| hops).max()
}

impl<L, W> fmt::Display for Graph<L, W>
where
    L: Clone + Eq + Hash + fmt::Display,
    W: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "|V| = {}; |E| = {}", self.num_vertices(), self.num_edges())?;
        write!(f, "Vertices:")?;
        for vertex in self.vertices() {
            write!(f, " {}", vertex)?;
        }
        writeln!(f)?;
        write!(f, "Edges:")?;
        for edge in self.edges() {
            write!(f, " {}", edge)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 -- 2 -- 3 -- 4, plus 2 -- 5
    fn path_graph() -> (Graph<u32, f64>, Vec<Vertex<u32>>) {
        let mut graph = Graph::new();
        let v: Vec<_> = (1..=5).map(|l| graph.add_vertex(l).unwrap()).collect();
        graph.add_edge(&v[0], &v[1], 1.0);
        graph.add_edge(&v[1], &v[2], 1.0);
        graph.add_edge(&v[2], &v[3], 1.0);
        graph.add_edge(&v[1], &v[4], 1.0);
        (graph, v)
    }

    #[test]
    fn edges_are_symmetric() {
        let (graph, v) = path_graph();
        assert_eq!(graph.num_vertices(), 5);
        assert_eq!(graph.num_edges(), 4);
        for edge in graph.edges() {
            let (a, b) = edge.vertices();
            let forward = graph.get_edge(a, b).unwrap();
            let backward = graph.get_edge(b, a).unwrap();
            assert_eq!(forward.id(), backward.id());
            assert_eq!(forward, backward);
        }
        assert_eq!(graph.get_edge(&v[0], &v[3]), None);
    }

    #[test]
    fn remove_vertex_drops_incident_edges_on_both_sides() {
        let (mut graph, v) = path_graph();
        let before: Vec<_> = [0, 2, 4].iter().map(|&i| graph.degree(&v[i]).unwrap()).collect();
        assert!(graph.remove_vertex(&v[1]));
        for (n, &i) in [0, 2, 4].iter().enumerate() {
            assert_eq!(graph.degree(&v[i]), Some(before[n] - 1));
        }
        assert_eq!(graph.degree(&v[1]), None);
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.edges().count(), 1);
        assert!(!graph.remove_vertex(&v[1]));
    }

    #[test]
    fn add_edge_requires_both_endpoints() {
        let mut graph: Graph<u32, f64> = Graph::new();
        let a = graph.add_vertex(1).unwrap();
        let ghost = Vertex::new(99);
        assert!(graph.add_edge(&a, &ghost, 2.0).is_none());
        assert!(graph.add_edge(&ghost, &a, 2.0).is_none());
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.degree(&a), Some(0));
    }

    #[test]
    fn self_loops_are_rejected() {
        let mut graph: Graph<u32, f64> = Graph::new();
        let a = graph.add_vertex(1).unwrap();
        assert!(graph.add_edge(&a, &a, 1.0).is_none());
        assert_eq!(graph.degree(&a), Some(0));
    }

    #[test]
    fn second_edge_between_pair_replaces_the_first() {
        let mut graph: Graph<u32, f64> = Graph::new();
        let a = graph.add_vertex(1).unwrap();
        let b = graph.add_vertex(2).unwrap();
        graph.add_edge(&a, &b, 1.0);
        graph.add_edge(&b, &a, 7.0);
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.edges().count(), 1);
        assert_eq!(graph.get_edge(&a, &b).map(|e| *e.element()), Some(7.0));
    }

    #[test]
    fn remove_edge_clears_both_sides() {
        let (mut graph, v) = path_graph();
        let id = graph.get_edge(&v[2], &v[3]).unwrap().id();
        let removed = graph.remove_edge(id).unwrap();
        assert_eq!(removed.opposite(&v[2]), Some(&v[3]));
        assert_eq!(graph.get_edge(&v[3], &v[2]), None);
        assert_eq!(graph.degree(&v[3]), Some(0));
        assert!(graph.remove_edge(id).is_none());
    }

    #[test]
    fn vertices_are_found_by_label() {
        let mut graph: Graph<String, f64> = Graph::new();
        let cork = graph.add_vertex("cork".to_string()).unwrap();
        assert_eq!(graph.get_vertex_by_label(&"cork".to_string()), Some(cork.clone()));
        assert_eq!(graph.get_vertex_by_label(&"kerry".to_string()), None);
        assert_eq!(graph.add_vertex("cork".to_string()), Err(GraphError::DuplicateVertex));
        assert_eq!(graph.add_vertex_if_new("cork".to_string()), cork);
        assert_eq!(graph.num_vertices(), 1);
    }

    #[test]
    fn opposite_of_a_foreign_vertex_is_none() {
        let (graph, v) = path_graph();
        let edge = graph.get_edge(&v[0], &v[1]).unwrap();
        assert_eq!(edge.opposite(&v[0]), Some(&v[1]));
        assert_eq!(edge.opposite(&v[3]), None);
    }

    #[test]
    fn searches_reach_the_component() {
        let (mut graph, v) = path_graph();
        let island = graph.add_vertex(6).unwrap();

        let dfs = graph.depth_first_search(&v[0]);
        assert_eq!(dfs.len(), 5);
        assert_eq!(dfs[&v[0]], None);
        assert!(dfs.values().filter(|e| e.is_some()).count() == 4);
        assert!(!dfs.contains_key(&island));

        let bfs = graph.breadth_first_search(&v[0]);
        assert_eq!(bfs[&v[0]].1, 0);
        assert_eq!(bfs[&v[1]].1, 1);
        assert_eq!(bfs[&v[2]].1, 2);
        assert_eq!(bfs[&v[4]].1, 2);
        assert_eq!(bfs[&v[3]].1, 3);
        assert_eq!(max_distance(&bfs), Some(3));
    }

    #[test]
    fn central_and_busiest_vertex() {
        let (graph, v) = path_graph();
        assert_eq!(graph.highest_degree(), Some(v[1].clone()));
        // 2 and 3 both reach everything within two hops.
        let central = graph.central_vertex().unwrap();
        assert!(central == v[1] || central == v[2]);
    }

    #[test]
    fn display_summary() {
        let mut graph: Graph<u32, f64> = Graph::new();
        let a = graph.add_vertex(1).unwrap();
        let b = graph.add_vertex(2).unwrap();
        graph.add_edge(&a, &b, 3.5);
        let text = graph.to_string();
        assert!(text.starts_with("|V| = 2; |E| = 1"));
        assert!(text.contains("(E: 3.5; 1 -- 2)"));
    }
}

//! Adaptable priority queues, an undirected weighted graph, and Dijkstra's
//! shortest paths over road route maps.
//!
//! The [`AdaptablePQ`] hands out a [`Handle`] for every entry so entries can
//! be removed or re-keyed from anywhere in the heap in O(log n). The
//! [`SearchableAPQ`] adds lookup by payload, which is what
//! [`shortest_paths`] uses as its open set.
//!
//! ```
//! use apq_routes::{shortest_paths, Graph};
//!
//! let mut graph: Graph<u32, f64> = Graph::new();
//! let a = graph.add_vertex(1).unwrap();
//! let b = graph.add_vertex(2).unwrap();
//! let c = graph.add_vertex(3).unwrap();
//! graph.add_edge(&a, &b, 2.0);
//! graph.add_edge(&b, &c, 2.5);
//! graph.add_edge(&a, &c, 9.0);
//!
//! let paths = shortest_paths(&graph, &a).unwrap();
//! assert_eq!(paths.cost(&c), Some(4.5));
//! assert_eq!(paths.predecessor(&c), Some(&b));
//! ```

pub mod apq;
pub mod dijkstra;
pub mod error;
pub mod geo;
pub mod graph;
pub mod graph_file;
pub mod route_map;
pub mod searchable_apq;

pub use apq::{AdaptablePQ, Handle};
pub use dijkstra::{shortest_paths, Cost, PathEntry, PathStep, ShortestPaths};
pub use error::{GraphError, LoadError, QueueError, RouteError};
pub use geo::Coordinates;
pub use graph::{Edge, EdgeId, Graph, Vertex};
pub use graph_file::{read_csv_edges, read_graph, read_route_map, WeightField};
pub use route_map::RouteMap;
pub use searchable_apq::SearchableAPQ;

use apq_routes::{read_csv_edges, read_graph, read_route_map, shortest_paths, RouteError, Vertex, WeightField};
use std::fs::File;
use std::io::BufReader;

fn open(name: &str) -> BufReader<File> {
    let path = format!("{}/testfiles/{}", env!("CARGO_MANIFEST_DIR"), name);
    BufReader::new(File::open(path).unwrap())
}

#[test]
fn route_by_time() {
    let map = read_route_map(open("simplegraph1.txt"), WeightField::Time).unwrap();
    assert_eq!(map.graph().num_vertices(), 4);
    assert_eq!(map.graph().num_edges(), 5);

    let source = map.get_vertex_by_label(&1).unwrap();
    let target = map.get_vertex_by_label(&4).unwrap();
    let path = map.sp(&source, &target).unwrap();
    let steps: Vec<_> = path.iter().map(|s| (*s.vertex.label(), s.cost)).collect();
    assert_eq!(steps, vec![(1, 0.0), (2, 3.0), (4, 8.0)]);

    let meters = map.path_length_meters(&path);
    assert!(meters > 500.0 && meters < 2000.0, "got {}", meters);
}

#[test]
fn route_by_length_takes_the_direct_edge() {
    let map = read_route_map(open("simplegraph1.txt"), WeightField::Length).unwrap();
    let path = map.sp(&Vertex::new(1), &Vertex::new(4)).unwrap();
    let labels: Vec<_> = path.iter().map(|s| *s.vertex.label()).collect();
    assert_eq!(labels, vec![1, 4]);
    assert_eq!(path[1].cost, 930.0);
}

#[test]
fn cut_off_target_is_unreachable() {
    let mut map = read_route_map(open("simplegraph1.txt"), WeightField::Time).unwrap();
    let target = map.get_vertex_by_label(&4).unwrap();
    let incident: Vec<_> = map.graph().get_edges(&target).map(|e| e.id()).collect();
    assert_eq!(incident.len(), 3);
    for id in incident {
        assert!(map.remove_edge(id).is_some());
    }
    assert_eq!(map.graph().degree(&target), Some(0));
    assert_eq!(map.sp(&Vertex::new(1), &target), Err(RouteError::Unreachable));

    // The rest of the map still routes.
    let path = map.sp(&Vertex::new(3), &Vertex::new(2)).unwrap();
    assert_eq!(path.last().map(|s| s.cost), Some(7.0));
}

#[test]
fn plain_graph_ignores_gps() {
    let graph = read_graph(open("simplegraph1.txt"), WeightField::Time).unwrap();
    assert_eq!(graph.num_vertices(), 4);
    assert_eq!(graph.degree(&Vertex::new(1)), Some(3));
    // 1 and 4 both touch three edges.
    let busiest = *graph.highest_degree().unwrap().label();
    assert!(busiest == 1 || busiest == 4, "got {}", busiest);
}

#[test]
fn csv_edge_list_routes_around_the_heavy_edges() {
    let graph = read_csv_edges(open("sample_edges.csv")).unwrap();
    assert_eq!(graph.num_vertices(), 7);
    assert_eq!(graph.num_edges(), 7);

    let paths = shortest_paths(&graph, &Vertex::new(0)).unwrap();
    assert_eq!(paths.len(), 5);
    assert!(!paths.contains(&Vertex::new(5)));
    assert!(!paths.contains(&Vertex::new(6)));
    assert_eq!(paths.path_to(&Vertex::new(6)), Err(RouteError::Unreachable));

    assert_eq!(paths.cost(&Vertex::new(4)), Some(7.0));
    let path = paths.path_to(&Vertex::new(4)).unwrap();
    let labels: Vec<_> = path.iter().map(|s| *s.vertex.label()).collect();
    assert_eq!(labels, vec![0, 2, 1, 3, 4]);
}

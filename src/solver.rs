use log::{debug, info};
use petgraph::visit::EdgeRef;
use rand::seq::SliceRandom;

use crate::decomposition::VerticalDecomposition;
use crate::geometry;
use crate::input;
use crate::output::{self, Solution};
use crate::segment::Segment;
use crate::types::InstanceGraph;
use crate::vertex::Vertex;

/// Builds the ordered list of vertical decompositions for `graph`.
///
/// Every edge is offered to the decompositions in list order; the first one
/// that accepts it keeps it, and a fresh decomposition over the shared
/// bounding box is appended when all of them reject it. With `shuffle` the
/// edges are processed in a random order, which lowers the expected running
/// time and often the number of decompositions.
pub fn perform_decompositions(graph: &InstanceGraph, shuffle: bool) -> Vec<VerticalDecomposition> {
    let edges: Vec<(Vertex, Vertex, usize)> = graph
        .edge_references()
        .map(|e| (graph[e.source()], graph[e.target()], *e.weight()))
        .collect();
    let mut order: Vec<usize> = (0..edges.len()).collect();
    if shuffle {
        order.shuffle(&mut rand::rng());
    }

    let points: Vec<Vertex> = graph.node_weights().copied().collect();
    let bounding_box = geometry::find_bounding_box(&points);
    let mut decompositions = vec![VerticalDecomposition::new(bounding_box.clone())];

    for &position in &order {
        let (a, b, index) = edges[position];
        let segment = Segment::with_index(a, b, index);
        let placed = decompositions.iter_mut().any(|vd| vd.add_segment(segment));
        if !placed {
            let mut fresh = VerticalDecomposition::new(bounding_box.clone());
            let accepted = fresh.add_segment(segment);
            assert!(accepted, "Segment {segment} should fit an empty decomposition");
            decompositions.push(fresh);
            debug!("opened decomposition {} for {segment}", decompositions.len() - 1);
        }
    }

    decompositions
}

/// Colors the edges of `graph`: the color of an edge is the position of the
/// decomposition that accepted it. Colors are indexed by original edge order.
pub fn color_graph(graph: &InstanceGraph, shuffle: bool) -> Vec<usize> {
    let decompositions = perform_decompositions(graph, shuffle);

    let mut colors = vec![usize::MAX; graph.edge_count()];
    for (color, vd) in decompositions.iter().enumerate() {
        for segment in vd.segments() {
            let index = segment
                .index
                .expect("Segments placed by the solver should carry their edge index");
            colors[index] = color;
        }
    }
    assert!(
        colors.iter().all(|&color| color != usize::MAX),
        "Some edges are uncoloured"
    );
    colors
}

/// Checks a color assignment: edges sharing a color must be pairwise
/// non-crossing.
pub fn verify_coloring(graph: &InstanceGraph, colors: &[usize]) -> bool {
    let segments: Vec<(Segment, usize)> = graph
        .edge_references()
        .map(|e| {
            (
                Segment::with_index(graph[e.source()], graph[e.target()], *e.weight()),
                colors[*e.weight()],
            )
        })
        .collect();
    for (i, (first, first_color)) in segments.iter().enumerate() {
        for (second, second_color) in &segments[i + 1..] {
            if first_color == second_color && first.intersects(second) {
                return false;
            }
        }
    }
    true
}

/// Solves the instance stored at `file_name` and returns the solution.
///
/// With `save_to_file` the solution is written to
/// `solutions/<id>.solution.json`, but only when it improves on whatever that
/// file already holds.
pub fn solve(file_name: &str, shuffle: bool, save_to_file: bool) -> Solution {
    let instance = input::from_file(file_name);
    info!(
        "{}: {} points, {} edges",
        instance.id,
        instance.graph.node_count(),
        instance.graph.edge_count()
    );

    let colors = color_graph(&instance.graph, shuffle);
    let solution = Solution::new(instance.id.clone(), colors);
    info!("{}: colored with {} colors", instance.id, solution.num_colors);

    if save_to_file {
        std::fs::create_dir_all("solutions").expect("Solution directory should be creatable");
        let path = format!("solutions/{}.solution.json", instance.id);
        output::save_if_better(&solution, &path);
    }

    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_instances::{random_segments, segment_fan};
    use petgraph::graph::NodeIndex;

    fn graph_of(points: &[(i64, i64)], edges: &[(usize, usize)]) -> InstanceGraph {
        let mut graph = InstanceGraph::new_undirected();
        for &(x, y) in points {
            graph.add_node(Vertex::new(x, y));
        }
        for (index, &(i, j)) in edges.iter().enumerate() {
            graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), index);
        }
        graph
    }

    fn num_colors(colors: &[usize]) -> usize {
        colors.iter().max().map_or(0, |&c| c + 1)
    }

    fn colors_cover_range(colors: &[usize]) -> bool {
        (0..num_colors(colors)).all(|color| colors.contains(&color))
    }

    #[test]
    fn test_triangle_needs_one_color() {
        let graph = graph_of(
            &[(0, 0), (10, 0), (5, 9)],
            &[(0, 1), (1, 2), (2, 0)],
        );
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 1);
        assert!(verify_coloring(&graph, &colors));
    }

    #[test]
    fn test_crossing_diagonals_need_two_colors() {
        let graph = graph_of(&[(0, 0), (10, 10), (0, 10), (10, 0)], &[(0, 1), (2, 3)]);
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 2);
        assert_ne!(colors[0], colors[1]);
        assert!(verify_coloring(&graph, &colors));
    }

    #[test]
    fn test_bowtie_needs_two_colors() {
        let graph = graph_of(
            &[(0, 0), (10, 0), (0, 10), (10, 10)],
            &[(0, 1), (2, 3), (0, 3), (1, 2)],
        );
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 2);
        assert_ne!(colors[2], colors[3]);
        assert!(verify_coloring(&graph, &colors));
    }

    #[test]
    fn test_concurrent_segments_share_a_color() {
        let graph = graph_of(
            &[(0, 0), (10, 0), (5, 9), (-5, 9)],
            &[(0, 1), (0, 2), (0, 3)],
        );
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 1);
    }

    #[test]
    fn test_vertical_horizontal_cross_needs_two_colors() {
        let graph = graph_of(&[(0, 5), (10, 5), (5, 0), (5, 10)], &[(0, 1), (2, 3)]);
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 2);
    }

    #[test]
    fn test_disjoint_collinear_segments_share_a_color() {
        let graph = graph_of(&[(0, 0), (3, 0), (5, 0), (8, 0)], &[(0, 1), (2, 3)]);
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 1);
    }

    #[test]
    fn test_collinear_overlap_needs_two_colors() {
        // Overlapping collinear edges out of one point, as in the challenge's
        // verifier instance.
        let graph = graph_of(&[(0, 0), (-100, 0), (-50, 0)], &[(0, 1), (0, 2)]);
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 2);
    }

    #[test]
    fn test_every_color_in_range_is_used() {
        let (points, edges) = random_segments(40, 0xC65);
        let graph = graph_of(&points, &edges);
        let colors = color_graph(&graph, false);
        assert!(colors_cover_range(&colors));
        assert!(verify_coloring(&graph, &colors));
    }

    #[test]
    fn test_random_instances_are_colored_correctly() {
        for seed in 0..8 {
            let (points, edges) = random_segments(30, seed);
            let graph = graph_of(&points, &edges);
            let colors = color_graph(&graph, false);
            assert!(
                verify_coloring(&graph, &colors),
                "bad coloring for seed {seed}"
            );
        }
    }

    #[test]
    fn test_shuffled_runs_stay_correct() {
        let (points, edges) = random_segments(30, 7);
        let graph = graph_of(&points, &edges);
        for _ in 0..4 {
            let colors = color_graph(&graph, true);
            assert!(verify_coloring(&graph, &colors));
            assert!(colors_cover_range(&colors));
        }
    }

    #[test]
    fn test_fan_instance() {
        let (points, edges) = segment_fan(12);
        let graph = graph_of(&points, &edges);
        let colors = color_graph(&graph, false);
        assert_eq!(num_colors(&colors), 1);
    }
}

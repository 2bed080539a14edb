use petgraph::graph::NodeIndex;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

use crate::types::InstanceGraph;
use crate::vertex::Vertex;

/// On-disk shape of a CGSHOP2022 instance file.
#[derive(Deserialize)]
struct RawInstance {
    #[serde(rename = "type")]
    kind: String,
    id: String,
    #[serde(default)]
    n: Option<usize>,
    #[serde(default)]
    m: Option<usize>,
    x: Vec<i64>,
    y: Vec<i64>,
    edge_i: Vec<usize>,
    edge_j: Vec<usize>,
}

/// A parsed instance: its name and the geometric graph to color.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Instance name, echoed into the solution file.
    pub id: String,
    /// The instance's points and edges.
    pub graph: InstanceGraph,
}

/// This is equivalent to [`from_str`], but takes a file path as an input.
pub fn from_file(path: &str) -> Instance {
    let file = File::open(path).expect("Instance file should exist and be readable");
    let reader = BufReader::new(file);
    let raw: RawInstance =
        serde_json::from_reader(reader).expect("Instance file should be valid JSON");
    build(raw)
}

/// Reads an instance from a JSON string.
///
/// Expected shape (unknown keys such as `meta` are ignored):
///
/// ```text
/// { "type": "Instance_CGSHOP2022", "id": "tiny", "n": 3, "m": 2,
///   "x": [0, 10, 5], "y": [0, 0, 9],
///   "edge_i": [0, 1], "edge_j": [1, 2] }
/// ```
///
/// Malformed instances (wrong type tag, coordinate arrays of different
/// lengths, edge indices out of range, an edge joining a point to itself)
/// abort with a descriptive message.
pub fn from_str(input: &str) -> Instance {
    let raw: RawInstance = serde_json::from_str(input).expect("Instance should be valid JSON");
    build(raw)
}

fn build(raw: RawInstance) -> Instance {
    assert_eq!(
        raw.kind, "Instance_CGSHOP2022",
        "Instance {} should have type Instance_CGSHOP2022",
        raw.id
    );
    assert_eq!(
        raw.x.len(),
        raw.y.len(),
        "Instance {} should have as many x- as y-coordinates",
        raw.id
    );
    assert_eq!(
        raw.edge_i.len(),
        raw.edge_j.len(),
        "Instance {} should have as many edge sources as edge targets",
        raw.id
    );
    if let Some(n) = raw.n {
        assert_eq!(raw.x.len(), n, "Instance {} declares n inconsistently", raw.id);
    }
    if let Some(m) = raw.m {
        assert_eq!(raw.edge_i.len(), m, "Instance {} declares m inconsistently", raw.id);
    }

    let mut graph = InstanceGraph::new_undirected();
    for (&x, &y) in raw.x.iter().zip(raw.y.iter()) {
        graph.add_node(Vertex::new(x, y));
    }
    let node_count = graph.node_count();
    for (index, (&i, &j)) in raw.edge_i.iter().zip(raw.edge_j.iter()).enumerate() {
        assert!(
            i < node_count && j < node_count,
            "Edge {index} of instance {} references a missing point",
            raw.id
        );
        assert!(
            i != j,
            "Edge {index} of instance {} joins point {i} to itself",
            raw.id
        );
        graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), index);
    }

    Instance { id: raw.id, graph }
}

use crate::vertex::Vertex;

/// Result of the orientation predicate for an ordered point triple.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Orientation {
    /// Traversing the three points makes a right turn.
    Clockwise,
    /// Traversing the three points makes a left turn.
    CounterClockwise,
    /// The three points lie on a common line.
    Collinear,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Clockwise => write!(f, "Clockwise"),
            Orientation::CounterClockwise => write!(f, "CounterClockwise"),
            Orientation::Collinear => write!(f, "Collinear"),
        }
    }
}

/// Wrapper for petgraph's graph type used for parsed instances.
///
/// Node weights are the integer coordinates of the instance points, edge
/// weights are the positions of the edges in the instance file. Colors are
/// reported in that original edge order.
pub type InstanceGraph = petgraph::graph::UnGraph<Vertex, usize>;

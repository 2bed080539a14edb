use fixedbitset::FixedBitSet;
use hashbrown::HashSet;

use super::trapezoid::Trapezoid;
use crate::geometry;
use crate::segment::Segment;
use crate::types::Orientation;
use crate::vertex::Vertex;

/// Arena index of a search DAG node.
pub(crate) type NodeId = usize;

/// Payload of a search DAG node. Vertices split by x, segments split by
/// above/below, trapezoids are the leaves.
#[derive(Clone, Debug)]
pub(crate) enum DagContent {
    Vertex(Vertex),
    Segment(Segment),
    Trapezoid(Trapezoid),
}

/// One node of the search DAG.
///
/// Internal nodes carry two children; leaves carry the back-pointers needed
/// to splice them out (`parents`) and the adjacency across their vertical
/// sides (`left_neighbours` / `right_neighbours`). The structure is a DAG,
/// not a tree: a leaf reachable along several search paths has several
/// parents.
#[derive(Clone, Debug)]
pub(crate) struct DagNode {
    pub content: DagContent,
    pub left_child: Option<NodeId>,
    pub right_child: Option<NodeId>,
    pub parents: HashSet<NodeId>,
    pub left_neighbours: Vec<NodeId>,
    pub right_neighbours: Vec<NodeId>,
}

impl DagNode {
    fn new(content: DagContent) -> Self {
        Self {
            content,
            left_child: None,
            right_child: None,
            parents: HashSet::new(),
            left_neighbours: Vec::new(),
            right_neighbours: Vec::new(),
        }
    }
}

/// The search DAG of one vertical decomposition, stored as an arena.
///
/// Nodes are addressed by index and leaves are compared by index, never by
/// the shape of their trapezoid; two equal-looking cells at different places
/// stay distinct. Replaced leaves simply become unreachable.
#[derive(Clone, Debug)]
pub(crate) struct Dag {
    nodes: Vec<DagNode>,
    root: NodeId,
}

impl Dag {
    /// Starts a DAG whose only node is the initial bounding cell.
    pub fn new(initial: Trapezoid) -> Self {
        Self {
            nodes: vec![DagNode::new(DagContent::Trapezoid(initial))],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &DagNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut DagNode {
        &mut self.nodes[id]
    }

    /// The trapezoid stored in leaf `id`. Panics when `id` is an internal
    /// node; callers only hold leaf ids for trapezoid access.
    pub fn trap(&self, id: NodeId) -> &Trapezoid {
        match &self.nodes[id].content {
            DagContent::Trapezoid(t) => t,
            other => panic!("Node {id} should be a trapezoid leaf, found {other:?}"),
        }
    }

    pub fn trap_mut(&mut self, id: NodeId) -> &mut Trapezoid {
        match &mut self.nodes[id].content {
            DagContent::Trapezoid(t) => t,
            other => panic!("Node {id} should be a trapezoid leaf, found {other:?}"),
        }
    }

    /// Appends a fresh, unconnected node.
    pub fn add(&mut self, content: DagContent) -> NodeId {
        self.nodes.push(DagNode::new(content));
        self.nodes.len() - 1
    }

    pub fn set_left_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[parent].left_child {
            self.nodes[old].parents.remove(&parent);
        }
        self.nodes[parent].left_child = Some(child);
        self.nodes[child].parents.insert(parent);
    }

    pub fn set_right_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[parent].right_child {
            self.nodes[old].parents.remove(&parent);
        }
        self.nodes[parent].right_child = Some(child);
        self.nodes[child].parents.insert(parent);
    }

    /// Splices `replacement` into every position where `old` hangs in the
    /// DAG: all of `old`'s parents retarget the matching child edge, and the
    /// root moves when `old` was the root. `old` keeps its content but is no
    /// longer reachable.
    pub fn replace_leaf(&mut self, old: NodeId, replacement: NodeId) {
        let parents: Vec<NodeId> = self.nodes[old].parents.drain().collect();
        for parent in parents {
            if self.nodes[parent].left_child == Some(old) {
                self.nodes[parent].left_child = Some(replacement);
            }
            if self.nodes[parent].right_child == Some(old) {
                self.nodes[parent].right_child = Some(replacement);
            }
            self.nodes[replacement].parents.insert(parent);
        }
        if self.root == old {
            self.root = replacement;
        }
    }

    /// One step of point location for an endpoint of `segment`: the child to
    /// descend into, or `None` at a leaf.
    ///
    /// `first` tells which endpoint of `segment` is being located; the
    /// tie-breaks depend on it. On a shared x with a vertex splitter the left
    /// endpoint descends right and the right endpoint descends left, so the
    /// two locations straddle the splitter the way the segment itself does.
    /// On a point collinear with a segment splitter the other endpoint of
    /// `segment` decides the side.
    pub fn choose_child(&self, at: NodeId, segment: &Segment, first: bool) -> Option<NodeId> {
        let node = &self.nodes[at];
        let point = if first { segment.endpoint1 } else { segment.endpoint2 };
        let (left, right) = (node.left_child, node.right_child);
        match &node.content {
            DagContent::Trapezoid(_) => None,
            DagContent::Vertex(v) => {
                let chosen = match point.x.cmp(&v.x) {
                    std::cmp::Ordering::Less => left,
                    std::cmp::Ordering::Greater => right,
                    std::cmp::Ordering::Equal => {
                        if first {
                            right
                        } else {
                            left
                        }
                    }
                };
                Some(chosen.expect("Vertex node should have both children"))
            }
            DagContent::Segment(s) => {
                let chosen = match geometry::orientation(s.endpoint1, s.endpoint2, point) {
                    Orientation::Clockwise => left,
                    Orientation::CounterClockwise => right,
                    Orientation::Collinear => {
                        // The located endpoint lies on the splitter segment;
                        // the other endpoint of the query segment tells on
                        // which side the query continues.
                        let other = if first { segment.endpoint2 } else { segment.endpoint1 };
                        if geometry::orientation(s.endpoint1, s.endpoint2, other)
                            == Orientation::Clockwise
                        {
                            left
                        } else {
                            right
                        }
                    }
                };
                Some(chosen.expect("Segment node should have both children"))
            }
        }
    }

    /// All trapezoid leaves currently reachable from the root.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut visited = FixedBitSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        let mut out = Vec::new();
        while let Some(id) = stack.pop() {
            if visited.contains(id) {
                continue;
            }
            visited.insert(id);
            match self.nodes[id].content {
                DagContent::Trapezoid(_) => out.push(id),
                _ => {
                    if let Some(left) = self.nodes[id].left_child {
                        stack.push(left);
                    }
                    if let Some(right) = self.nodes[id].right_child {
                        stack.push(right);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cell() -> Trapezoid {
        Trapezoid::new(
            Segment::new(Vertex::new(0, 10), Vertex::new(10, 10)),
            vec![Vertex::new(0, 0)],
            vec![Vertex::new(10, 10)],
            Segment::new(Vertex::new(0, 0), Vertex::new(10, 0)),
        )
    }

    #[test]
    fn test_replace_leaf_moves_root_and_parents() {
        let mut dag = Dag::new(unit_cell());
        let old_root = dag.root();
        let splitter = dag.add(DagContent::Vertex(Vertex::new(5, 5)));
        let left = dag.add(DagContent::Trapezoid(unit_cell()));
        let right = dag.add(DagContent::Trapezoid(unit_cell()));
        dag.set_left_child(splitter, left);
        dag.set_right_child(splitter, right);
        dag.replace_leaf(old_root, splitter);

        assert_eq!(dag.root(), splitter);
        assert_eq!(dag.leaves().len(), 2);

        // Replacing a leaf with two parents retargets both edges.
        let merged = dag.add(DagContent::Trapezoid(unit_cell()));
        dag.replace_leaf(left, merged);
        dag.replace_leaf(right, merged);
        assert_eq!(dag.node(splitter).left_child, Some(merged));
        assert_eq!(dag.node(splitter).right_child, Some(merged));
        assert_eq!(dag.node(merged).parents.len(), 1);
        assert_eq!(dag.leaves(), vec![merged]);
    }

    #[test]
    fn test_choose_child_vertex_tie_breaks() {
        let mut dag = Dag::new(unit_cell());
        let root = dag.root();
        let splitter = dag.add(DagContent::Vertex(Vertex::new(5, 5)));
        let left = dag.add(DagContent::Trapezoid(unit_cell()));
        let right = dag.add(DagContent::Trapezoid(unit_cell()));
        dag.set_left_child(splitter, left);
        dag.set_right_child(splitter, right);
        dag.replace_leaf(root, splitter);

        let query = Segment::new(Vertex::new(5, 2), Vertex::new(5, 8));
        // The left endpoint of a query on the splitter's x goes right, the
        // right endpoint goes left.
        assert_eq!(dag.choose_child(splitter, &query, true), Some(right));
        assert_eq!(dag.choose_child(splitter, &query, false), Some(left));

        let plain = Segment::new(Vertex::new(2, 2), Vertex::new(4, 8));
        assert_eq!(dag.choose_child(splitter, &plain, true), Some(left));
    }

    #[test]
    fn test_choose_child_segment_collinear_uses_other_endpoint() {
        let mut dag = Dag::new(unit_cell());
        let root = dag.root();
        let splitter = dag.add(DagContent::Segment(Segment::new(
            Vertex::new(0, 5),
            Vertex::new(10, 5),
        )));
        let below = dag.add(DagContent::Trapezoid(unit_cell()));
        let above = dag.add(DagContent::Trapezoid(unit_cell()));
        dag.set_left_child(splitter, below);
        dag.set_right_child(splitter, above);
        dag.replace_leaf(root, splitter);

        // (0, 5) lies on the splitter; the query heading up resolves above,
        // the query heading down resolves below.
        let up = Segment::new(Vertex::new(0, 5), Vertex::new(4, 9));
        let down = Segment::new(Vertex::new(0, 5), Vertex::new(4, 1));
        assert_eq!(dag.choose_child(splitter, &up, true), Some(above));
        assert_eq!(dag.choose_child(splitter, &down, true), Some(below));
    }
}

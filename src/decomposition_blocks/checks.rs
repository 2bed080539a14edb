//! Structural validators for a decomposition's search DAG. They are wired
//! behind `debug_assert!` after every successful insertion and compiled out
//! of release builds.

use hashbrown::HashSet;

use super::dag::{Dag, DagContent, NodeId};

/// Runs every validator; `true` when the whole structure is sound.
pub(crate) fn consistent(dag: &Dag) -> bool {
    let leaves = dag.leaves();
    structure_sound(dag, &leaves)
        && neighbours_mutual(dag, &leaves)
        && cells_well_formed(dag, &leaves)
}

/// Parent/child pointers agree, internal nodes have both children and leaves
/// have none.
fn structure_sound(dag: &Dag, leaves: &[NodeId]) -> bool {
    let mut stack = vec![dag.root()];
    let mut seen: HashSet<NodeId> = HashSet::new();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let node = dag.node(id);
        match &node.content {
            DagContent::Trapezoid(_) => {
                if node.left_child.is_some() || node.right_child.is_some() {
                    return false;
                }
                for &parent in &node.parents {
                    let p = dag.node(parent);
                    if p.left_child != Some(id) && p.right_child != Some(id) {
                        return false;
                    }
                }
            }
            _ => {
                let (Some(left), Some(right)) = (node.left_child, node.right_child) else {
                    return false;
                };
                if !dag.node(left).parents.contains(&id) || !dag.node(right).parents.contains(&id) {
                    return false;
                }
                stack.push(left);
                stack.push(right);
            }
        }
    }
    leaves.iter().all(|id| seen.contains(id))
}

/// Neighbour lists are duplicate-free, point at live leaves only, mirror each
/// other, and every linked pair of sides genuinely overlaps at the same x.
fn neighbours_mutual(dag: &Dag, leaves: &[NodeId]) -> bool {
    let live: HashSet<NodeId> = leaves.iter().copied().collect();
    for &id in leaves {
        let node = dag.node(id);
        for list in [&node.left_neighbours, &node.right_neighbours] {
            let unique: HashSet<NodeId> = list.iter().copied().collect();
            if unique.len() != list.len() || !unique.iter().all(|n| live.contains(n)) {
                return false;
            }
        }
        for &right in &node.right_neighbours {
            if !dag.node(right).left_neighbours.contains(&id) {
                return false;
            }
            let own = dag.trap(id).right_chord();
            let other = dag.trap(right).left_chord();
            if own.x() != other.x() || !own.overlaps(other) {
                return false;
            }
        }
        for &left in &node.left_neighbours {
            if !dag.node(left).right_neighbours.contains(&id) {
                return false;
            }
        }
    }
    true
}

/// Per-cell shape invariants: anchors share their vertical side's x, the
/// left side is not right of the right side, and the bottom boundary stays
/// below the top boundary on both sides.
fn cells_well_formed(dag: &Dag, leaves: &[NodeId]) -> bool {
    for &id in leaves {
        let cell = dag.trap(id);
        if cell.left_chord().x() > cell.right_chord().x() {
            return false;
        }
        for chord in [cell.left_chord(), cell.right_chord()] {
            if chord.bottom() > chord.top() {
                return false;
            }
        }
        if !cell.left_points.iter().all(|p| p.x == cell.left_chord().x()) {
            return false;
        }
        if !cell.right_points.iter().all(|p| p.x == cell.right_chord().x()) {
            return false;
        }
    }
    true
}

//! Rewrites the search DAG when a segment is inserted: every trapezoid the
//! segment passes through is replaced by its refinement, neighbour lists are
//! rerouted and the point-location structure gains the decision nodes for the
//! new endpoints and the segment itself.

use super::dag::{Dag, DagContent, NodeId};
use super::trapezoid::Trapezoid;
use crate::segment::Segment;
use crate::vertex::Vertex;

/// Replaces the trapezoids on `path` by the refinement induced by `segment`.
///
/// Expects the path produced by the intersecting-trapezoid walk for a segment
/// that crosses none of the path cells' boundaries; under that precondition
/// the rewrite cannot fail.
pub(crate) fn refine(dag: &mut Dag, path: &[NodeId], segment: &Segment) {
    if let [only] = path {
        refine_single(dag, *only, segment);
    } else {
        refine_path(dag, path, segment);
    }
}

/// The segment lies entirely within one cell. Depending on whether its
/// endpoints sit on the cell's vertical sides the cell shatters into four,
/// three or two new cells.
fn refine_single(dag: &mut Dag, node: NodeId, segment: &Segment) {
    let cell = dag.trap(node).clone();
    let old_left = dag.node(node).left_neighbours.clone();
    let old_right = dag.node(node).right_neighbours.clone();
    let ep1 = segment.endpoint1;
    let ep2 = segment.endpoint2;
    let left_on = ep1.x == cell.left_chord().x();
    let right_on = ep2.x == cell.right_chord().x();

    match (left_on, right_on) {
        (false, false) => {
            let left_sliver = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                cell.left_points.clone(),
                vec![ep1],
                cell.bottom_segment,
            )));
            let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                vec![ep1],
                vec![ep2],
                *segment,
            )));
            let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
                *segment,
                vec![ep1],
                vec![ep2],
                cell.bottom_segment,
            )));
            let right_sliver = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                vec![ep2],
                cell.right_points.clone(),
                cell.bottom_segment,
            )));

            relink_left(dag, node, &old_left, &[left_sliver]);
            link(dag, left_sliver, above);
            link(dag, left_sliver, below);
            link(dag, above, right_sliver);
            link(dag, below, right_sliver);
            relink_right(dag, node, &old_right, &[right_sliver]);

            let point1_node = dag.add(DagContent::Vertex(ep1));
            let point2_node = dag.add(DagContent::Vertex(ep2));
            let segment_node = dag.add(DagContent::Segment(*segment));
            dag.set_left_child(point1_node, left_sliver);
            dag.set_right_child(point1_node, point2_node);
            dag.set_left_child(point2_node, segment_node);
            dag.set_right_child(point2_node, right_sliver);
            dag.set_left_child(segment_node, below);
            dag.set_right_child(segment_node, above);
            dag.replace_leaf(node, point1_node);
        }
        (true, false) => {
            let (left_above, left_below) = partition(&cell.left_points, Some(ep1), segment);
            let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                left_above,
                vec![ep2],
                *segment,
            )));
            let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
                *segment,
                left_below,
                vec![ep2],
                cell.bottom_segment,
            )));
            let right_sliver = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                vec![ep2],
                cell.right_points.clone(),
                cell.bottom_segment,
            )));

            relink_left(dag, node, &old_left, &[above, below]);
            link(dag, above, right_sliver);
            link(dag, below, right_sliver);
            relink_right(dag, node, &old_right, &[right_sliver]);

            let point2_node = dag.add(DagContent::Vertex(ep2));
            let segment_node = dag.add(DagContent::Segment(*segment));
            dag.set_left_child(point2_node, segment_node);
            dag.set_right_child(point2_node, right_sliver);
            dag.set_left_child(segment_node, below);
            dag.set_right_child(segment_node, above);
            dag.replace_leaf(node, point2_node);

            anchor_on_right_sides(dag, &old_left, ep1);
        }
        (false, true) => {
            let (right_above, right_below) = partition(&cell.right_points, Some(ep2), segment);
            let left_sliver = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                cell.left_points.clone(),
                vec![ep1],
                cell.bottom_segment,
            )));
            let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                vec![ep1],
                right_above,
                *segment,
            )));
            let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
                *segment,
                vec![ep1],
                right_below,
                cell.bottom_segment,
            )));

            relink_left(dag, node, &old_left, &[left_sliver]);
            link(dag, left_sliver, above);
            link(dag, left_sliver, below);
            relink_right(dag, node, &old_right, &[above, below]);

            let point1_node = dag.add(DagContent::Vertex(ep1));
            let segment_node = dag.add(DagContent::Segment(*segment));
            dag.set_left_child(point1_node, left_sliver);
            dag.set_right_child(point1_node, segment_node);
            dag.set_left_child(segment_node, below);
            dag.set_right_child(segment_node, above);
            dag.replace_leaf(node, point1_node);

            anchor_on_left_sides(dag, &old_right, ep2);
        }
        (true, true) => {
            let (left_above, left_below) = partition(&cell.left_points, Some(ep1), segment);
            let (right_above, right_below) = partition(&cell.right_points, Some(ep2), segment);
            let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
                cell.top_segment,
                left_above,
                right_above,
                *segment,
            )));
            let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
                *segment,
                left_below,
                right_below,
                cell.bottom_segment,
            )));

            relink_left(dag, node, &old_left, &[above, below]);
            relink_right(dag, node, &old_right, &[above, below]);

            let segment_node = dag.add(DagContent::Segment(*segment));
            dag.set_left_child(segment_node, below);
            dag.set_right_child(segment_node, above);
            dag.replace_leaf(node, segment_node);

            anchor_on_right_sides(dag, &old_left, ep1);
            anchor_on_left_sides(dag, &old_right, ep2);
        }
    }
}

/// The segment spans several cells. Walk them left to right; the first and
/// last cells split around their contained endpoint, the inner ones split
/// into an upper and a lower cell. A split whose right side ends up without
/// anchors stays open (the `carry`) and is merged into the first later cell
/// whose matching side has no left anchors of its own.
fn refine_path(dag: &mut Dag, path: &[NodeId], segment: &Segment) {
    let ep1 = segment.endpoint1;
    let ep2 = segment.endpoint2;
    let last = path.len() - 1;
    let mut carry: Option<NodeId> = None;
    let mut deferred_start = false;

    for (i, &node) in path.iter().enumerate() {
        let extra_left = if deferred_start {
            deferred_start = false;
            Some(ep1)
        } else {
            None
        };

        if i == 0 {
            let (left_x, right_x) = {
                let cell = dag.trap(node);
                (cell.left_chord().x(), cell.right_chord().x())
            };
            if ep1.x == right_x {
                // The segment only touches this cell's right side; record the
                // anchor here and let the split begin in the next cell.
                dag.trap_mut(node).add_right_point(ep1);
                deferred_start = true;
            } else if ep1.x == left_x {
                // The endpoint sits on the left side: the cell is spanned
                // like an inner one, with the endpoint anchored on both new
                // cells and on the neighbours sharing that side.
                let old_left = dag.node(node).left_neighbours.clone();
                split_spanning(dag, node, segment, Some(ep1), None, &mut carry);
                anchor_on_right_sides(dag, &old_left, ep1);
            } else {
                split_leftmost(dag, node, segment, &mut carry);
            }
            continue;
        }

        if i == last {
            let right_x = dag.trap(node).right_chord().x();
            if ep2.x == right_x {
                let old_right = dag.node(node).right_neighbours.clone();
                split_spanning(dag, node, segment, extra_left, Some(ep2), &mut carry);
                anchor_on_left_sides(dag, &old_right, ep2);
            } else {
                split_rightmost(dag, node, segment, extra_left, &mut carry);
            }
        } else {
            split_spanning(dag, node, segment, extra_left, None, &mut carry);
        }
    }

    debug_assert!(carry.is_none(), "no cell should stay open past the last split");
}

/// First cell of a multi-cell path, with the left endpoint in its interior:
/// a left sliver plus the two cells flanking the segment.
fn split_leftmost(dag: &mut Dag, node: NodeId, segment: &Segment, carry: &mut Option<NodeId>) {
    let cell = dag.trap(node).clone();
    let old_left = dag.node(node).left_neighbours.clone();
    let old_right = dag.node(node).right_neighbours.clone();
    let ep1 = segment.endpoint1;

    let (right_above, right_below) = partition(&cell.right_points, None, segment);
    let sliver = dag.add(DagContent::Trapezoid(Trapezoid::new(
        cell.top_segment,
        cell.left_points.clone(),
        vec![ep1],
        cell.bottom_segment,
    )));
    let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
        cell.top_segment,
        vec![ep1],
        right_above,
        *segment,
    )));
    let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
        *segment,
        vec![ep1],
        right_below,
        cell.bottom_segment,
    )));

    relink_left(dag, node, &old_left, &[sliver]);
    link(dag, sliver, above);
    link(dag, sliver, below);
    wire_right(dag, node, &old_right, above, below, carry);

    let point_node = dag.add(DagContent::Vertex(ep1));
    let segment_node = dag.add(DagContent::Segment(*segment));
    dag.set_left_child(point_node, sliver);
    dag.set_right_child(point_node, segment_node);
    dag.set_left_child(segment_node, below);
    dag.set_right_child(segment_node, above);
    dag.replace_leaf(node, point_node);
}

/// Inner cell of a multi-cell path: one cell above the segment, one below.
/// `extra_left` / `extra_right` carry an endpoint that sits exactly on the
/// corresponding vertical side.
fn split_spanning(
    dag: &mut Dag,
    node: NodeId,
    segment: &Segment,
    extra_left: Option<Vertex>,
    extra_right: Option<Vertex>,
    carry: &mut Option<NodeId>,
) {
    let cell = dag.trap(node).clone();
    let old_left = dag.node(node).left_neighbours.clone();
    let old_right = dag.node(node).right_neighbours.clone();

    let (left_above, left_below) = partition(&cell.left_points, extra_left, segment);
    let (right_above, right_below) = partition(&cell.right_points, extra_right, segment);
    let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
        cell.top_segment,
        left_above,
        right_above,
        *segment,
    )));
    let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
        *segment,
        left_below,
        right_below,
        cell.bottom_segment,
    )));

    wire_left(dag, node, &old_left, above, below, carry);
    wire_right(dag, node, &old_right, above, below, carry);

    let segment_node = dag.add(DagContent::Segment(*segment));
    dag.set_left_child(segment_node, below);
    dag.set_right_child(segment_node, above);
    dag.replace_leaf(node, segment_node);
}

/// Last cell of a multi-cell path, with the right endpoint in its interior:
/// the two cells flanking the segment plus a right sliver.
fn split_rightmost(
    dag: &mut Dag,
    node: NodeId,
    segment: &Segment,
    extra_left: Option<Vertex>,
    carry: &mut Option<NodeId>,
) {
    let cell = dag.trap(node).clone();
    let old_left = dag.node(node).left_neighbours.clone();
    let old_right = dag.node(node).right_neighbours.clone();
    let ep2 = segment.endpoint2;

    let (left_above, left_below) = partition(&cell.left_points, extra_left, segment);
    let above = dag.add(DagContent::Trapezoid(Trapezoid::new(
        cell.top_segment,
        left_above,
        vec![ep2],
        *segment,
    )));
    let below = dag.add(DagContent::Trapezoid(Trapezoid::new(
        *segment,
        left_below,
        vec![ep2],
        cell.bottom_segment,
    )));
    let sliver = dag.add(DagContent::Trapezoid(Trapezoid::new(
        cell.top_segment,
        vec![ep2],
        cell.right_points.clone(),
        cell.bottom_segment,
    )));

    wire_left(dag, node, &old_left, above, below, carry);
    link(dag, above, sliver);
    link(dag, below, sliver);
    relink_right(dag, node, &old_right, &[sliver]);

    let point_node = dag.add(DagContent::Vertex(ep2));
    let segment_node = dag.add(DagContent::Segment(*segment));
    dag.set_left_child(point_node, segment_node);
    dag.set_right_child(point_node, sliver);
    dag.set_left_child(segment_node, below);
    dag.set_right_child(segment_node, above);
    dag.replace_leaf(node, point_node);
}

/// Splits anchors by side of `segment`. A point on the segment itself lands
/// in both halves, so a split through an anchor keeps the anchor on each of
/// the two new cells.
fn partition(
    points: &[Vertex],
    extra: Option<Vertex>,
    segment: &Segment,
) -> (Vec<Vertex>, Vec<Vertex>) {
    let mut above = Vec::new();
    let mut below = Vec::new();
    for &point in points.iter().chain(extra.iter()) {
        if point.is_above(segment) {
            above.push(point);
        }
        if point.is_below(segment) {
            below.push(point);
        }
    }
    (above, below)
}

/// Connects the left-side halves of a split to the world: a half without left
/// anchors continues the open cell from an earlier split and absorbs it; the
/// others take over the overlapping share of the old cell's left neighbours.
fn wire_left(
    dag: &mut Dag,
    old: NodeId,
    old_left: &[NodeId],
    above: NodeId,
    below: NodeId,
    carry: &mut Option<NodeId>,
) {
    let above_open = dag.trap(above).left_points.is_empty();
    let below_open = dag.trap(below).left_points.is_empty();
    debug_assert!(
        (above_open || below_open) == carry.is_some(),
        "an open cell should exist exactly when one split half has no left anchors"
    );

    if above_open {
        let open = carry.take().expect("open cell expected above the segment");
        absorb_open_cell(dag, open, above);
        relink_left(dag, old, old_left, &[below]);
    } else if below_open {
        let open = carry.take().expect("open cell expected below the segment");
        absorb_open_cell(dag, open, below);
        relink_left(dag, old, old_left, &[above]);
    } else {
        relink_left(dag, old, old_left, &[above, below]);
    }
}

/// Connects the right-side halves of a split: a half without right anchors
/// becomes the new open cell and gets no right neighbours yet.
fn wire_right(
    dag: &mut Dag,
    old: NodeId,
    old_right: &[NodeId],
    above: NodeId,
    below: NodeId,
    carry: &mut Option<NodeId>,
) {
    let above_open = dag.trap(above).right_points.is_empty();
    let below_open = dag.trap(below).right_points.is_empty();
    debug_assert!(!(above_open && below_open), "at most one split half can stay open");

    if above_open {
        *carry = Some(above);
        relink_right(dag, old, old_right, &[below]);
    } else if below_open {
        *carry = Some(below);
        relink_right(dag, old, old_right, &[above]);
    } else {
        relink_right(dag, old, old_right, &[above, below]);
    }
}

/// Merges the open cell `open` into the freshly created `into`: `into` takes
/// over the open cell's left anchors and left neighbours, and every search
/// path that led to the open cell now leads to `into`.
fn absorb_open_cell(dag: &mut Dag, open: NodeId, into: NodeId) {
    let points = dag.trap(open).left_points.clone();
    let neighbours = dag.node(open).left_neighbours.clone();

    dag.trap_mut(into).update_left_points(points);
    for &neighbour in &neighbours {
        for slot in dag.node_mut(neighbour).right_neighbours.iter_mut() {
            if *slot == open {
                *slot = into;
            }
        }
    }
    dag.node_mut(into).left_neighbours = neighbours;
    dag.replace_leaf(open, into);
}

/// Makes two cells neighbours when their facing vertical sides genuinely
/// overlap; degenerate contact is not adjacency.
fn link(dag: &mut Dag, left: NodeId, right: NodeId) {
    if !dag.trap(left).right_chord().overlaps(dag.trap(right).left_chord()) {
        return;
    }
    if !dag.node(left).right_neighbours.contains(&right) {
        dag.node_mut(left).right_neighbours.push(right);
    }
    if !dag.node(right).left_neighbours.contains(&left) {
        dag.node_mut(right).left_neighbours.push(left);
    }
}

/// Reroutes the former left neighbours of a replaced cell onto the
/// replacement cells they overlap, purging the stale reference.
fn relink_left(dag: &mut Dag, old: NodeId, old_left: &[NodeId], cells: &[NodeId]) {
    for &neighbour in old_left {
        dag.node_mut(neighbour).right_neighbours.retain(|&id| id != old);
        for &cell in cells {
            link(dag, neighbour, cell);
        }
    }
}

/// Mirror of [`relink_left`] for the right side.
fn relink_right(dag: &mut Dag, old: NodeId, old_right: &[NodeId], cells: &[NodeId]) {
    for &neighbour in old_right {
        dag.node_mut(neighbour).left_neighbours.retain(|&id| id != old);
        for &cell in cells {
            link(dag, cell, neighbour);
        }
    }
}

/// Records `point` as a right anchor on every given cell whose right side
/// passes through it.
fn anchor_on_right_sides(dag: &mut Dag, cells: &[NodeId], point: Vertex) {
    for &cell in cells {
        if dag.trap(cell).right_chord().contains_point(point) {
            dag.trap_mut(cell).add_right_point(point);
        }
    }
}

/// Records `point` as a left anchor on every given cell whose left side
/// passes through it.
fn anchor_on_left_sides(dag: &mut Dag, cells: &[NodeId], point: Vertex) {
    for &cell in cells {
        if dag.trap(cell).left_chord().contains_point(point) {
            dag.trap_mut(cell).add_left_point(point);
        }
    }
}

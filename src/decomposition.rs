use log::debug;

use crate::decomposition_blocks::checks;
use crate::decomposition_blocks::dag::{Dag, NodeId};
use crate::decomposition_blocks::trapezoid::Trapezoid;
use crate::decomposition_blocks::update;
use crate::segment::Segment;

/// A vertical decomposition of the bounding rectangle induced by a set of
/// pairwise non-crossing segments, together with its point-location DAG.
///
/// Segments are offered one at a time through [`add_segment`]; a segment that
/// would cross any segment already present is rejected and the decomposition
/// is left untouched. The accepted segments of one decomposition form one
/// color class of the final coloring.
///
/// [`add_segment`]: Self::add_segment
#[derive(Clone, Debug)]
pub struct VerticalDecomposition {
    dag: Dag,
    segments: Vec<Segment>,
}

impl VerticalDecomposition {
    /// Starts an empty decomposition consisting of `bounding_box` alone.
    pub fn new(bounding_box: Trapezoid) -> Self {
        Self {
            dag: Dag::new(bounding_box),
            segments: Vec::new(),
        }
    }

    /// The segments accepted so far, in insertion order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Tries to insert `segment`. Returns `true` and refines the
    /// decomposition when the segment crosses none of the present segments;
    /// returns `false` and changes nothing otherwise.
    pub fn add_segment(&mut self, segment: Segment) -> bool {
        let path = self.find_intersecting_trapezoids(&segment);
        if path.is_empty() {
            debug!("segment {segment} is blocked by a vertical side or an endpoint conflict");
            return false;
        }
        if path
            .iter()
            .any(|&node| self.dag.trap(node).is_violated_by_segment(&segment))
        {
            debug!("segment {segment} crosses a boundary of an existing cell");
            return false;
        }

        debug!("segment {segment} passes through {} trapezoids", path.len());
        update::refine(&mut self.dag, &path, &segment);
        self.segments.push(segment);
        debug_assert!(
            checks::consistent(&self.dag),
            "decomposition inconsistent after inserting {segment}"
        );
        true
    }

    /// Locates both endpoints of `segment`, returning the leaves holding the
    /// left and the right endpoint. The descents share the segment because
    /// the tie-breaks on degenerate positions depend on which endpoint is
    /// being located and on where the other one lies.
    fn point_location_segment(&self, segment: &Segment) -> (NodeId, NodeId) {
        (self.locate(segment, true), self.locate(segment, false))
    }

    fn locate(&self, segment: &Segment, first: bool) -> NodeId {
        let mut current = self.dag.root();
        while let Some(next) = self.dag.choose_child(current, segment, first) {
            current = next;
        }
        current
    }

    /// The ordered list of leaves whose trapezoids `segment` passes through,
    /// from the cell of its left endpoint to the cell of its right endpoint.
    ///
    /// Returns an empty list when the segment cannot be inserted along a
    /// straight walk: an endpoint lies in the interior of an existing
    /// boundary segment, the segment stops against a vertical side it does
    /// not cross, or no right neighbour admits it.
    fn find_intersecting_trapezoids(&self, segment: &Segment) -> Vec<NodeId> {
        let (start, end) = self.point_location_segment(segment);
        if self.dag.trap(start).point_on_boundary(segment.endpoint1)
            || self.dag.trap(end).point_on_boundary(segment.endpoint2)
        {
            return Vec::new();
        }

        let mut path = vec![start];
        let mut current = start;
        while current != end {
            // The segment has to leave the cell through its right side;
            // otherwise it is stopped by a vertical cut.
            if !self.dag.trap(current).right_chord().crossed_by(segment) {
                return Vec::new();
            }
            let next = self
                .dag
                .node(current)
                .right_neighbours
                .iter()
                .copied()
                .find(|&neighbour| self.dag.trap(neighbour).segment_enter(segment));
            match next {
                Some(neighbour) => {
                    path.push(neighbour);
                    current = neighbour;
                }
                None => return Vec::new(),
            }
            debug_assert!(
                path.len() <= self.dag.len(),
                "walk for {segment} revisits a trapezoid"
            );
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::find_bounding_box;
    use crate::vertex::Vertex;

    fn vd_for(points: &[(i64, i64)]) -> VerticalDecomposition {
        let points: Vec<Vertex> = points.iter().map(|&(x, y)| Vertex::new(x, y)).collect();
        VerticalDecomposition::new(find_bounding_box(&points))
    }

    fn seg(ax: i64, ay: i64, bx: i64, by: i64) -> Segment {
        Segment::new(Vertex::new(ax, ay), Vertex::new(bx, by))
    }

    #[test]
    fn test_single_segment() {
        let mut vd = vd_for(&[(0, 0), (10, 10)]);
        assert!(vd.add_segment(seg(2, 5, 8, 6)));
        assert_eq!(vd.segments().len(), 1);
    }

    #[test]
    fn test_crossing_segment_is_rejected() {
        let mut vd = vd_for(&[(0, 0), (10, 10)]);
        assert!(vd.add_segment(seg(0, 0, 10, 10)));
        assert!(!vd.add_segment(seg(0, 10, 10, 0)));
        assert_eq!(vd.segments().len(), 1);

        // The failed attempt must not have changed anything.
        assert!(vd.add_segment(seg(2, 9, 6, 9)));
    }

    #[test]
    fn test_segments_on_a_path_of_trapezoids() {
        // Staircase from the original degenerate test set: each new segment
        // runs through the left, middle and right cells of the previous ones.
        let mut vd = vd_for(&[(1, 1), (10, 3)]);
        assert!(vd.add_segment(seg(5, 1, 10, 1)));
        assert!(vd.add_segment(seg(1, 3, 6, 3)));
        assert!(vd.add_segment(seg(3, 2, 8, 2)));
        assert_eq!(vd.segments().len(), 3);
    }

    #[test]
    fn test_shared_endpoint_fan() {
        let mut vd = vd_for(&[(-5, 0), (10, 9)]);
        assert!(vd.add_segment(seg(0, 0, 10, 0)));
        assert!(vd.add_segment(seg(0, 0, 5, 9)));
        assert!(vd.add_segment(seg(0, 0, -5, 9)));
        assert_eq!(vd.segments().len(), 3);
    }

    #[test]
    fn test_triangle() {
        let mut vd = vd_for(&[(0, 0), (10, 9)]);
        assert!(vd.add_segment(seg(0, 0, 10, 0)));
        assert!(vd.add_segment(seg(10, 0, 5, 9)));
        assert!(vd.add_segment(seg(5, 9, 0, 0)));
    }

    #[test]
    fn test_vertical_segment_blocks_crossers() {
        let mut vd = vd_for(&[(0, 0), (10, 10)]);
        assert!(vd.add_segment(seg(5, 0, 5, 10)));
        // A proper crossing through the vertical segment is refused.
        assert!(!vd.add_segment(seg(0, 5, 10, 5)));
        // Passing above its upper endpoint is fine.
        assert!(vd.add_segment(seg(0, 10, 4, 10)));
    }

    #[test]
    fn test_horizontal_then_vertical_cross() {
        let mut vd = vd_for(&[(0, 0), (10, 10)]);
        assert!(vd.add_segment(seg(0, 5, 10, 5)));
        assert!(!vd.add_segment(seg(5, 0, 5, 10)));
    }

    #[test]
    fn test_endpoint_in_segment_interior_is_rejected() {
        let mut vd = vd_for(&[(0, 0), (10, 10)]);
        assert!(vd.add_segment(seg(0, 0, 10, 0)));
        // (5, 0) lies in the interior of the first segment.
        assert!(!vd.add_segment(seg(5, 0, 8, 8)));
    }

    #[test]
    fn test_collinear_overlap_is_rejected() {
        let mut vd = vd_for(&[(0, 0), (15, 10)]);
        assert!(vd.add_segment(seg(0, 0, 10, 0)));
        assert!(!vd.add_segment(seg(5, 0, 15, 0)));
        // Disjoint collinear segments coexist.
        assert!(vd.add_segment(seg(12, 0, 15, 0)));
    }

    #[test]
    fn test_equal_x_endpoints() {
        // Two segments whose endpoints share x-coordinates, from the original
        // degenerate test set.
        let mut vd = vd_for(&[(1, 1), (5, 3)]);
        assert!(vd.add_segment(seg(1, 1, 5, 1)));
        assert!(vd.add_segment(seg(1, 3, 3, 3)));
        assert_eq!(vd.segments().len(), 2);
    }

    #[test]
    fn test_long_path_over_low_segments() {
        // The third segment runs above two low segments through five cells;
        // every inner cell keeps an open upper half until the next split
        // closes it.
        let mut vd = vd_for(&[(0, 0), (30, 10)]);
        assert!(vd.add_segment(seg(2, 2, 12, 2)));
        assert!(vd.add_segment(seg(14, 2, 24, 2)));
        assert!(vd.add_segment(seg(1, 5, 28, 5)));
        assert_eq!(vd.segments().len(), 3);
        // A probe climbing through the first low segment is refused.
        assert!(!vd.add_segment(seg(5, 0, 10, 4)));
        assert_eq!(vd.segments().len(), 3);
    }

    #[test]
    fn test_fan_of_shared_endpoint_segments() {
        let mut vd = vd_for(&[(0, 0), (20, 10)]);
        assert!(vd.add_segment(seg(0, 0, 20, 0)));
        assert!(vd.add_segment(seg(0, 0, 20, 2)));
        assert!(vd.add_segment(seg(0, 0, 20, 6)));
        assert!(vd.add_segment(seg(0, 0, 20, 10)));
        assert!(!vd.add_segment(seg(0, 2, 20, 1)));
        assert_eq!(vd.segments().len(), 4);
    }
}

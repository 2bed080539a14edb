use crate::geometry::{self, Rational};
use crate::segment::Segment;
use crate::types::Orientation;
use crate::vertex::Vertex;

/// Exact vertical side of a trapezoid: the chord of the vertical line at `x`
/// between the cell's bottom and top boundary segments.
///
/// The boundary segments have integer endpoints, so the chord ends at
/// rational y-coordinates; they are kept as [`Rational`] values instead of
/// rounded floats.
#[derive(Clone, Copy, Debug)]
pub struct VerticalChord {
    x: i64,
    bottom: Rational,
    top: Rational,
}

impl VerticalChord {
    fn at(x: i64, top_segment: &Segment, bottom_segment: &Segment) -> Self {
        Self {
            x,
            bottom: y_on(bottom_segment, x),
            top: y_on(top_segment, x),
        }
    }

    /// The x-coordinate of the vertical side.
    pub fn x(&self) -> i64 {
        self.x
    }

    /// Lower end of the chord.
    pub fn bottom(&self) -> Rational {
        self.bottom
    }

    /// Upper end of the chord.
    pub fn top(&self) -> Rational {
        self.top
    }

    /// `true` when the chord has no vertical extent.
    pub fn is_degenerate(&self) -> bool {
        self.bottom == self.top
    }

    /// Strict y-overlap with another vertical side: `true` when the two
    /// chords share more than a single point. Two trapezoids are neighbours
    /// exactly when their facing sides overlap in this sense at the same x.
    pub fn overlaps(&self, other: &VerticalChord) -> bool {
        self.bottom.max(other.bottom) < self.top.min(other.top)
    }

    /// `true` when `point` lies on the chord, endpoints included.
    pub fn contains_point(&self, point: Vertex) -> bool {
        self.x == point.x
            && self.bottom.cmp_int(point.y).is_le()
            && self.top.cmp_int(point.y).is_ge()
    }

    /// `true` when `segment` crosses or touches this vertical side: a proper
    /// crossing, an endpoint of `segment` on the chord, or an endpoint of
    /// `segment` coinciding with a chord end all count.
    ///
    /// Called on a cell's left side this decides whether the segment enters
    /// the cell; called on the right side it decides whether the segment
    /// continues past the cell or is stopped by a vertical cut.
    pub fn crossed_by(&self, segment: &Segment) -> bool {
        let orientation1 = self.side_of(segment.endpoint1);
        let orientation2 = self.side_of(segment.endpoint2);
        let orientation3 =
            geometry::orientation_rational(segment.endpoint1, segment.endpoint2, self.x, self.bottom);
        let orientation4 =
            geometry::orientation_rational(segment.endpoint1, segment.endpoint2, self.x, self.top);

        if orientation1 != orientation2 && orientation3 != orientation4 {
            return true;
        }

        // An endpoint meeting a chord end exactly counts as a crossing.
        if self.has_corner(segment.endpoint1) || self.has_corner(segment.endpoint2) {
            return true;
        }

        // So does an endpoint anywhere else on the chord.
        if (orientation1 == Orientation::Collinear && self.contains_point(segment.endpoint1))
            || (orientation2 == Orientation::Collinear && self.contains_point(segment.endpoint2))
        {
            return true;
        }

        false
    }

    /// Orientation of `point` against the chord directed bottom to top.
    fn side_of(&self, point: Vertex) -> Orientation {
        if self.is_degenerate() {
            return Orientation::Collinear;
        }
        match point.x.cmp(&self.x) {
            std::cmp::Ordering::Greater => Orientation::Clockwise,
            std::cmp::Ordering::Less => Orientation::CounterClockwise,
            std::cmp::Ordering::Equal => Orientation::Collinear,
        }
    }

    fn has_corner(&self, point: Vertex) -> bool {
        self.x == point.x
            && (self.bottom.cmp_int(point.y).is_eq() || self.top.cmp_int(point.y).is_eq())
    }
}

/// y-coordinate of `segment` at the vertical line `x`. Degenerate point
/// segments answer with their single y; callers never ask outside the
/// segment's x-range.
fn y_on(segment: &Segment, x: i64) -> Rational {
    let (a, b) = (segment.endpoint1, segment.endpoint2);
    if a.x == b.x {
        return Rational::from_int(a.y);
    }
    let dx = (b.x - a.x) as i128;
    Rational::new(a.y as i128 * dx + (b.y - a.y) as i128 * (x - a.x) as i128, dx)
}

/// A cell of a vertical decomposition: bounded above and below by segments
/// and on the left and right by vertical chords anchored at instance points.
#[derive(Clone, Debug)]
pub struct Trapezoid {
    /// Boundary segment above the cell. Vertical input segments collapse to
    /// the degenerate point segment at their lower endpoint here.
    pub top_segment: Segment,
    /// Boundary segment below the cell; vertical inputs collapse to their
    /// upper endpoint.
    pub bottom_segment: Segment,
    /// Instance points anchoring the left side; all share the side's x.
    pub left_points: Vec<Vertex>,
    /// Instance points anchoring the right side; all share the side's x.
    pub right_points: Vec<Vertex>,
    left_chord: VerticalChord,
    right_chord: VerticalChord,
}

impl Trapezoid {
    /// Builds a cell from its boundary segments and anchor point sets,
    /// normalizing vertical boundaries into degenerate point segments and
    /// deriving the vertical sides.
    pub fn new(
        top_segment: Segment,
        left_points: Vec<Vertex>,
        right_points: Vec<Vertex>,
        bottom_segment: Segment,
    ) -> Self {
        let top_segment = if top_segment.endpoint1.x == top_segment.endpoint2.x
            && !top_segment.is_degenerate()
        {
            // Canonical order puts the lower endpoint first.
            Segment::new(top_segment.endpoint1, top_segment.endpoint1)
        } else {
            top_segment
        };
        let bottom_segment = if bottom_segment.endpoint1.x == bottom_segment.endpoint2.x
            && !bottom_segment.is_degenerate()
        {
            Segment::new(bottom_segment.endpoint2, bottom_segment.endpoint2)
        } else {
            bottom_segment
        };

        let left_points = dedup(left_points);
        let right_points = dedup(right_points);

        let left_x = left_points
            .first()
            .map(|p| p.x)
            .unwrap_or_else(|| top_segment.endpoint1.x.max(bottom_segment.endpoint1.x));
        let right_x = right_points
            .first()
            .map(|p| p.x)
            .unwrap_or_else(|| top_segment.endpoint2.x.min(bottom_segment.endpoint2.x));

        Self {
            left_chord: VerticalChord::at(left_x, &top_segment, &bottom_segment),
            right_chord: VerticalChord::at(right_x, &top_segment, &bottom_segment),
            top_segment,
            bottom_segment,
            left_points,
            right_points,
        }
    }

    /// The cell's left vertical side.
    pub fn left_chord(&self) -> &VerticalChord {
        &self.left_chord
    }

    /// The cell's right vertical side.
    pub fn right_chord(&self) -> &VerticalChord {
        &self.right_chord
    }

    /// `true` when `segment` enters this cell through its left side.
    pub fn segment_enter(&self, segment: &Segment) -> bool {
        self.left_chord.crossed_by(segment)
    }

    /// `true` when `segment` crosses the top or bottom boundary, i.e. when it
    /// conflicts with a segment already present in the decomposition.
    pub fn is_violated_by_segment(&self, segment: &Segment) -> bool {
        self.bottom_segment.intersects(segment) || self.top_segment.intersects(segment)
    }

    /// `true` when `point` lies in the cell: weakly above the bottom
    /// boundary, strictly below the top boundary, within the x-range.
    pub fn contains(&self, point: Vertex) -> bool {
        point.is_above(&self.bottom_segment)
            && !point.is_above(&self.top_segment)
            && self.left_chord.x <= point.x
            && point.x <= self.right_chord.x
    }

    /// `true` when `point` lies in the interior of the top or bottom
    /// boundary. A segment whose endpoint does cannot be inserted without
    /// touching the boundary segment outside a shared endpoint, so the cell
    /// rejects it. Boundary segment endpoints themselves are fine.
    pub fn point_on_boundary(&self, point: Vertex) -> bool {
        on_interior(&self.top_segment, point) || on_interior(&self.bottom_segment, point)
    }

    /// Replaces the left anchors and re-derives the left side. Used when an
    /// open cell from an earlier split is merged into this one.
    pub fn update_left_points(&mut self, new_points: Vec<Vertex>) {
        self.left_points = dedup(new_points);
        let left_x = self
            .left_points
            .first()
            .map(|p| p.x)
            .unwrap_or_else(|| self.top_segment.endpoint1.x.max(self.bottom_segment.endpoint1.x));
        self.left_chord = VerticalChord::at(left_x, &self.top_segment, &self.bottom_segment);
    }

    /// Records an additional anchor on the left side.
    pub(crate) fn add_left_point(&mut self, point: Vertex) {
        debug_assert!(
            self.left_points.is_empty() || point.x == self.left_chord.x,
            "left anchor {point} should share the side's x"
        );
        if !self.left_points.contains(&point) {
            self.left_points.push(point);
        }
    }

    /// Records an additional anchor on the right side.
    pub(crate) fn add_right_point(&mut self, point: Vertex) {
        debug_assert!(
            self.right_points.is_empty() || point.x == self.right_chord.x,
            "right anchor {point} should share the side's x"
        );
        if !self.right_points.contains(&point) {
            self.right_points.push(point);
        }
    }
}

fn on_interior(segment: &Segment, point: Vertex) -> bool {
    point != segment.endpoint1
        && point != segment.endpoint2
        && geometry::orientation(segment.endpoint1, segment.endpoint2, point) == Orientation::Collinear
        && geometry::on_segment(segment.endpoint1, point, segment.endpoint2)
}

fn dedup(points: Vec<Vertex>) -> Vec<Vertex> {
    let mut out: Vec<Vertex> = Vec::with_capacity(points.len());
    for point in points {
        if !out.contains(&point) {
            out.push(point);
        }
    }
    out
}

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Generates `count` random segments in a small coordinate range, returned as
/// an instance-shaped point list plus edge list. The tight range makes shared
/// coordinates, crossings and collinear pairs likely, which is what the
/// decomposition tests want to see.
pub fn random_segments(count: usize, seed: u64) -> (Vec<(i64, i64)>, Vec<(usize, usize)>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(2 * count);
    let mut edges = Vec::with_capacity(count);

    for i in 0..count {
        let a = (rng.random_range(0..=60), rng.random_range(0..=60));
        let mut b = a;
        while b == a {
            b = (rng.random_range(0..=60), rng.random_range(0..=60));
        }
        points.push(a);
        points.push(b);
        edges.push((2 * i, 2 * i + 1));
    }

    (points, edges)
}

/// A fan of `count` segments out of a common endpoint. The segments pairwise
/// share only that endpoint, so one color suffices.
pub fn segment_fan(count: usize) -> (Vec<(i64, i64)>, Vec<(usize, usize)>) {
    let mut points = vec![(0, 0)];
    let mut edges = Vec::with_capacity(count);
    for i in 0..count {
        points.push((20, 2 * i as i64 - count as i64));
        edges.push((0, i + 1));
    }
    (points, edges)
}

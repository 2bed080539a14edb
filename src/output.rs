use log::info;
use serde::{Deserialize, Serialize};

/// A CGSHOP2022 solution: one color per instance edge, in the original edge
/// order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Always `"Solution_CGSHOP2022"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the solved instance.
    pub instance: String,
    /// Number of colors used; colors are `0..num_colors`.
    pub num_colors: usize,
    /// Color of edge `i` at position `i`.
    pub colors: Vec<usize>,
}

impl Solution {
    /// Wraps a color assignment into the solution payload.
    pub fn new(instance: String, colors: Vec<usize>) -> Self {
        let num_colors = colors.iter().max().map_or(0, |&c| c + 1);
        Self {
            kind: "Solution_CGSHOP2022".to_string(),
            instance,
            num_colors,
            colors,
        }
    }
}

/// Serializes a solution to its JSON representation.
pub fn to_json_str(solution: &Solution) -> String {
    serde_json::to_string_pretty(solution).expect("Solution should serialize")
}

/// Writes `solution` to `path` unless a solution with at most as many colors
/// is already stored there. Returns whether the file was written.
pub fn save_if_better(solution: &Solution, path: &str) -> bool {
    let existing = std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<Solution>(&content).ok());

    if let Some(existing) = existing {
        if existing.num_colors <= solution.num_colors {
            info!(
                "{}: stored solution with {} colors is no worse than {}, keeping it",
                solution.instance, existing.num_colors, solution.num_colors
            );
            return false;
        }
        info!(
            "{}: improving stored solution from {} to {} colors",
            solution.instance, existing.num_colors, solution.num_colors
        );
    }

    std::fs::write(path, to_json_str(solution)).expect("Solution file should be writable");
    true
}

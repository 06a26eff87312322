// Golden-angle spiral distribution of nodes over a sphere.
//
// Heights are spaced evenly from top to bottom, and each step advances the
// azimuth by 2*PI / golden ratio. Deterministic: the same count always gives
// the same nodes in the same order, so node i lines up with element i.

use std::f64::consts::PI;

/// Static angular position of one node on the sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereNode {
    pub index: usize,
    /// Azimuth in radians (not wrapped).
    pub theta: f64,
    /// Elevation in radians, in [-PI/2, PI/2].
    pub phi: f64,
    pub r: f64,
}

fn golden_ratio() -> f64 {
    (1.0 + 5f64.sqrt()) / 2.0
}

/// Spread `n` nodes over a sphere of radius `r`. Returns nodes with dense
/// indices `0..n`.
pub fn distribute(n: usize, r: f64) -> Vec<SphereNode> {
    let golden = golden_ratio();
    let count = n as f64;

    (0..n)
        .map(|i| {
            let fi = i as f64;
            let y = 1.0 - (2.0 * (fi + 0.5)) / count;
            SphereNode {
                index: i,
                theta: 2.0 * PI * fi / golden,
                phi: y.asin(),
                r,
            }
        })
        .collect()
}

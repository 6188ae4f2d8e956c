// Tolerances for layout comparisons (canvas units)

pub const EPS_POS: f64 = 1e-6;            // position coincidence threshold

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

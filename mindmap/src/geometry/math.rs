use crate::model::{BBox, Point};

pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x; let dy = a.y - b.y;
    (dx*dx + dy*dy).sqrt()
}

/// Distance from `p` to the nearest of the four corners of `bbox`.
pub fn corner_distance(p: Point, bbox: &BBox) -> f64 {
    bbox.corners()
        .iter()
        .map(|c| distance(p, *c))
        .fold(f64::INFINITY, f64::min)
}

/// Midpoint of the closed vertical span covered by `(y, height)` intervals.
pub fn vertical_span_mid(spans: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let mut lo = f64::INFINITY; let mut hi = f64::NEG_INFINITY;
    for (y, h) in spans {
        lo = lo.min(y); hi = hi.max(y + h);
    }
    if lo.is_finite() && hi.is_finite() { Some((lo + hi) / 2.0) } else { None }
}

use crate::config::Config;
use crate::geometry::math::corner_distance;
use crate::model::{Direction, Node, Point};

/// A navigation candidate with its score breakdown.
#[derive(Clone, Debug)]
pub struct Ranked<'a> {
    pub node: &'a Node,
    pub axis_offset: f64,
    pub endpoint_offset: f64,
    pub score: f64,
}

/// Strict half-plane test: `c` lies entirely on the `dir` side of `o`.
pub fn in_direction(o: &Node, c: &Node, dir: Direction) -> bool {
    if c.id == o.id {
        return false;
    }
    match dir {
        Direction::Right => c.x > o.x + o.width,
        Direction::Left => c.x + c.width < o.x,
        Direction::Up => c.y + c.height < o.y,
        Direction::Down => c.y > o.y + o.height,
    }
}

pub fn axis_offset(o: &Node, c: &Node, dir: Direction) -> f64 {
    if dir.is_horizontal() { (c.x - o.x).abs() } else { (c.y - o.y).abs() }
}

/// How well the two rectangles line up: the smallest gap between facing edges, with
/// an `e / extent` term so the result never lands on exactly zero.
/// Requires `o.width > 0` and `o.height > 0`.
pub fn endpoint_offset(o: &Node, c: &Node, eps: f64) -> f64 {
    let ey = eps / o.height;
    let ex = eps / o.width;
    (c.y - o.y + ey).abs()
        .min((c.y + c.height - o.y - ey).abs())
        .min((c.x - o.x + ex).abs())
        .min((c.x + c.width - o.x + ex).abs())
}

pub fn score(o: &Node, c: &Node, dir: Direction, cfg: &Config) -> f64 {
    axis_offset(o, c, dir) + endpoint_offset(o, c, cfg.alignment_epsilon).powf(cfg.offset_weight)
}

/// All candidates strictly in `dir`, best first. Equal scores keep input order.
pub fn rank<'a>(origin: &Node, dir: Direction, candidates: &'a [Node], cfg: &Config) -> Vec<Ranked<'a>> {
    let mut out: Vec<Ranked<'a>> = candidates
        .iter()
        .filter(|c| in_direction(origin, c, dir))
        .map(|c| {
            let axis = axis_offset(origin, c, dir);
            let end = endpoint_offset(origin, c, cfg.alignment_epsilon);
            Ranked { node: c, axis_offset: axis, endpoint_offset: end, score: axis + end.powf(cfg.offset_weight) }
        })
        .collect();
    out.sort_by(|a, b| a.score.total_cmp(&b.score));
    out
}

pub fn select_best<'a>(origin: &Node, dir: Direction, candidates: &'a [Node], cfg: &Config) -> Option<&'a Node> {
    candidates
        .iter()
        .filter(|c| in_direction(origin, c, dir))
        .map(|c| (c, score(origin, c, dir, cfg)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Node whose nearest bbox corner is closest to `p`. Ties go to the earlier node.
pub fn closest_by_corner(p: Point, nodes: &[Node]) -> Option<(&Node, f64)> {
    let mut best: Option<(&Node, f64)> = None;
    for n in nodes {
        let d = corner_distance(p, &n.bbox());
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((n, d));
        }
    }
    best
}

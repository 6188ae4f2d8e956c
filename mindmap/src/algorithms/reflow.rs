use crate::config::Config;
use crate::model::Node;

/// Total height of `children` stacked with `row_gap` between neighbours.
pub fn stack_height(children: &[Node], row_gap: f64) -> f64 {
    let sum: f64 = children.iter().map(|c| c.height).sum();
    let gaps = children.len().saturating_sub(1) as f64;
    sum + gaps * row_gap
}

/// Lay `children` out as one column to the right of `parent`, keeping their current
/// top-to-bottom order and centering the column on the parent's vertical midpoint.
/// Positions are written into `children`, which is left sorted by `y`.
pub fn reflow(parent: &Node, children: &mut [Node], cfg: &Config) {
    if children.is_empty() {
        return;
    }
    children.sort_by(|a, b| a.y.total_cmp(&b.y));

    let total = stack_height(children, cfg.row_gap);
    let top = parent.y + parent.height * 0.5 - total * 0.5;
    let x = parent.x + parent.width + cfg.column_gap;

    let mut cursor = top;
    for c in children.iter_mut() {
        c.x = x;
        c.y = cursor;
        cursor += c.height + cfg.row_gap;
    }
}

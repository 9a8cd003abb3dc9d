use hm_core::{LevelOrder, Pair};

/// All unordered pairs of the level order, each oriented earlier-first.
///
/// Order is by position, not by label: `(0,1), (0,2), …, (1,2), …`.
pub fn enumerate_pairs(order: &LevelOrder) -> Vec<Pair> {
    let levels = order.as_slice();
    let n = levels.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(Pair::new(levels[i].as_str(), levels[j].as_str()));
        }
    }
    out
}

/// Orient two labels by their level-order position.
///
/// `None` when either label is outside the order or both are the same level.
pub fn canonical_pair(order: &LevelOrder, a: &str, b: &str) -> Option<Pair> {
    let ia = order.position(a)?;
    let ib = order.position(b)?;
    match ia.cmp(&ib) {
        std::cmp::Ordering::Less => Some(Pair::new(a, b)),
        std::cmp::Ordering::Greater => Some(Pair::new(b, a)),
        std::cmp::Ordering::Equal => None,
    }
}

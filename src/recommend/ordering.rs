//! Dependency-respecting ordering with a rank tie-break.

/// Result of [`order_by_dependencies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOrder {
    /// Node indices, every node exactly once.
    pub order: Vec<usize>,
    /// `(dependent, dependency)` edges dropped to break cycles.
    pub broken: Vec<(usize, usize)>,
}

/// Order `n = deps.len()` nodes so each node comes after its dependencies.
///
/// Among the nodes whose dependencies are all placed, the one with the
/// smallest `rank` goes next (index breaks remaining ties). When no node is
/// ready the remaining nodes form a cycle: the best-ranked of them is placed
/// anyway and its unplaced dependency edges are reported in `broken`.
/// Out-of-range indices and self-edges are ignored.
pub fn order_by_dependencies<K, F>(deps: &[Vec<usize>], rank: F) -> DependencyOrder
where
    K: Ord,
    F: Fn(usize) -> K,
{
    let n = deps.len();
    let mut placed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut broken = Vec::new();

    while order.len() < n {
        let ready = (0..n)
            .filter(|&i| !placed[i])
            .filter(|&i| deps[i].iter().all(|&d| d >= n || d == i || placed[d]))
            .min_by_key(|&i| (rank(i), i));

        let next = match ready {
            Some(i) => i,
            None => {
                let Some(i) = (0..n).filter(|&i| !placed[i]).min_by_key(|&i| (rank(i), i)) else {
                    break;
                };
                for &d in &deps[i] {
                    if d < n && d != i && !placed[d] {
                        broken.push((i, d));
                    }
                }
                i
            }
        };

        placed[next] = true;
        order.push(next);
    }

    DependencyOrder { order, broken }
}

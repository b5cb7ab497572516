//! Weighted choice over candidate lists.
//!
//! Used by node2vec for its 2nd-order transition step. The sampler is a
//! linear cumulative scan: O(n) per draw, no preprocessing, which suits
//! per-step weights that change with every `(prev, cur)` pair.

use rand::prelude::*;

/// Draw one item with probability proportional to its weight.
///
/// - Weights must be non-negative and as many as `items`.
/// - If the weights sum to zero or less, falls back to a uniform draw.
/// - If rounding leaves the cumulative total short of the drawn target,
///   the last item is returned.
///
/// Returns `None` only if `items` is empty.
///
/// # Example
///
/// ```rust
/// use rand::SeedableRng;
/// use rand_xorshift::XorShiftRng;
/// use walkvec_core::algo::sampling::weighted_choice;
///
/// let mut rng = XorShiftRng::seed_from_u64(7);
/// let picked = weighted_choice(&["a", "b"], &[0.0, 1.0], &mut rng);
/// assert_eq!(picked, Some(&"b"));
/// ```
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Option<&'a T> {
    debug_assert_eq!(items.len(), weights.len());

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return items.choose(rng);
    }

    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for (item, &w) in items.iter().zip(weights) {
        cumulative += w;
        if cumulative >= target {
            return Some(item);
        }
    }

    items.last()
}

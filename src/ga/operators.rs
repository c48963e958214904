//! Fixed-endpoint route operators.
//!
//! Chromosomes are station-id sequences whose first and last genes are
//! pinned to the requested start and end. Both operators keep those two
//! genes in place and never introduce a repeated station.
//!
//! # Crossover Operators
//!
//! - [`one_point_crossover`]: cut each parent once, splice heads onto the
//!   other parent's tail with duplicates dropped
//!
//! # Mutation Operators
//!
//! - [`replace_mutation`]: swap one interior station for an unused one

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

// ============================================================================
// Crossover operators
// ============================================================================

/// One-point crossover for variable-length routes.
///
/// Independent cut points `p1 ∈ [1, len1 - 1]` and `p2 ∈ [1, len2 - 1]` are
/// drawn. `child1` is `parent1[..p1]` followed by every station of
/// `parent2[p2..]` not already in that head, in order; `child2` mirrors it.
///
/// When either parent has at most two stops there is nothing to recombine
/// and clones of the parents are returned.
///
/// Each child starts with its own parent's first stop. It ends with the
/// other parent's last stop as long as that stop is not already in the head,
/// which holds when both parents share start and end and are simple.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn one_point_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    if parent1.len() <= 2 || parent2.len() <= 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let p1 = rng.random_range(1..parent1.len());
    let p2 = rng.random_range(1..parent2.len());

    let child1 = splice(&parent1[..p1], &parent2[p2..]);
    let child2 = splice(&parent2[..p2], &parent1[p1..]);

    (child1, child2)
}

/// Head followed by the tail's stations that the head does not contain.
fn splice(head: &[usize], tail: &[usize]) -> Vec<usize> {
    let seen: HashSet<usize> = head.iter().copied().collect();
    let mut child = Vec::with_capacity(head.len() + tail.len());
    child.extend_from_slice(head);
    child.extend(tail.iter().copied().filter(|s| !seen.contains(s)));
    child
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Replaces one interior station with a station the route does not visit.
///
/// The position is drawn from `[1, len - 2]` and the replacement uniformly
/// from `candidates` minus the stations already on the route. Returns
/// `true` if the route changed.
///
/// Routes with two or fewer stops, or with no unused candidate, are left
/// untouched.
///
/// # Complexity
/// O(n + m) time for a route of n stops and m candidates
pub fn replace_mutation<R: Rng>(route: &mut [usize], candidates: &[usize], rng: &mut R) -> bool {
    if route.len() <= 2 {
        return false;
    }

    let used: HashSet<usize> = route.iter().copied().collect();
    let available: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|s| !used.contains(s))
        .collect();

    let Some(&replacement) = available.choose(rng) else {
        return false;
    };

    let idx = rng.random_range(1..route.len() - 1);
    route[idx] = replacement;
    true
}

// ============================================================================
// Tests
// ============================================================================

//! Ordered crossover (OX).
//!
//! A child keeps a slice of one parent at the same positions and receives the
//! remaining cities in the relative order they have in the other parent, read
//! from the end of the slice and wrapping around. Children are always valid
//! permutations.

use super::population::is_permutation;
use super::Tour;
use crate::error::{Result, TspError};
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Recombine a parent list into offspring of the same size.
///
/// Parents are shuffled, then paired as `(i, i + 1)` for even `i`. With an odd
/// count the last parent pairs with the first one again, and the surplus child
/// of that pair is dropped so the offspring count matches the parent count.
pub fn crossover<R: Rng + ?Sized>(mut parents: Vec<&Tour>, rng: &mut R) -> Result<Vec<Tour>> {
    parents.shuffle(rng);

    let n = parents.len();
    let mut offspring = Vec::with_capacity(n + 1);

    for i in (0..n).step_by(2) {
        let parent1 = parents[i];
        let parent2 = parents[(i + 1) % n];
        let (child1, child2) = order_crossover(parent1, parent2, rng)?;
        offspring.push(child1);
        offspring.push(child2);
    }

    offspring.truncate(n);
    Ok(offspring)
}

/// Order crossover of two parents over the same city set.
///
/// Two distinct cut points `start < end` are drawn; child 1 keeps
/// `parent1[start..end]` and is completed from `parent2`, child 2 symmetrically.
pub fn order_crossover<R: Rng + ?Sized>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> Result<(Tour, Tour)> {
    let n = parent1.len();
    if parent2.len() != n || !is_permutation(parent1, n) || !is_permutation(parent2, n) {
        return Err(TspError::InvalidParameter(
            "crossover parents must be permutations of the same city set".to_string(),
        ));
    }
    if n < 2 {
        return Ok((parent1.to_vec(), parent2.to_vec()));
    }

    let cuts = index::sample(rng, n, 2);
    let (a, b) = (cuts.index(0), cuts.index(1));
    let (start, end) = (a.min(b), a.max(b));

    log::trace!("OX cut [{}, {})", start, end);

    Ok((
        ox_build_child(parent1, parent2, start, end),
        ox_build_child(parent2, parent1, start, end),
    ))
}

/// Copy `template[start..end]`, then fill the free slots from `donor`.
///
/// Free slots are tracked with an occupancy mask; donor scanning and slot
/// writing both start at `end` and wrap modulo the tour length.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Tour {
    let n = template.len();
    let mut child = vec![0; n];
    let mut filled = vec![false; n];
    let mut present = vec![false; n];

    for i in start..end {
        child[i] = template[i];
        filled[i] = true;
        present[template[i]] = true;
    }

    let mut remaining = n - (end - start);
    let mut pos = end % n;
    let mut scan = end;

    while remaining > 0 {
        let city = donor[scan % n];
        scan += 1;
        if present[city] {
            continue;
        }

        while filled[pos] {
            pos = (pos + 1) % n;
        }
        child[pos] = city;
        filled[pos] = true;
        present[city] = true;
        remaining -= 1;
    }

    child
}

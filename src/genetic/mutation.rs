//! Swap mutation.

use super::Tour;
use crate::error::{Result, TspError};
use rand::seq::index;
use rand::Rng;

/// Swap the cities at two distinct random positions.
///
/// Returns the swapped positions, or `None` for tours shorter than two cities.
pub fn swap_mutation<R: Rng + ?Sized>(tour: &mut [usize], rng: &mut R) -> Option<(usize, usize)> {
    let n = tour.len();
    if n < 2 {
        return None;
    }

    let picks = index::sample(rng, n, 2);
    let (i, j) = (picks.index(0), picks.index(1));
    tour.swap(i, j);
    Some((i, j))
}

/// Apply [`swap_mutation`] to each tour independently with probability
/// `mutation_rate`. Exactly zero or two positions change per tour.
pub fn mutate<R: Rng + ?Sized>(
    mut offspring: Vec<Tour>,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<Vec<Tour>> {
    check_mutation_rate(mutation_rate)?;

    let mut mutated = 0usize;
    for tour in offspring.iter_mut() {
        if rng.gen::<f64>() < mutation_rate && swap_mutation(tour, rng).is_some() {
            mutated += 1;
        }
    }

    log::trace!("Mutated {}/{} offspring", mutated, offspring.len());
    Ok(offspring)
}

pub(crate) fn check_mutation_rate(mutation_rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&mutation_rate) {
        return Err(TspError::InvalidParameter(format!(
            "mutation rate must be within [0, 1], got {}",
            mutation_rate
        )));
    }
    Ok(())
}

//! Random initial population.

use super::Tour;
use crate::graph::WeightedGraph;
use rand::seq::SliceRandom;
use rand::Rng;

/// `pop_size` independent, uniformly random permutations of the graph's cities.
/// Duplicate tours across slots are allowed.
pub fn initialize_population<R: Rng + ?Sized>(
    pop_size: usize,
    graph: &WeightedGraph,
    rng: &mut R,
) -> Vec<Tour> {
    let cities: Tour = (0..graph.len()).collect();

    let mut population = Vec::with_capacity(pop_size);

    for _ in 0..pop_size {
        let mut tour = cities.clone();
        tour.shuffle(rng);
        population.push(tour);
    }

    population
}

/// True when `tour` visits each of the `n` cities exactly once
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

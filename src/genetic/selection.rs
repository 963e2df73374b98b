//! Tournament selection.
//!
//! Each parent slot is filled by an independent tournament: draw `k` distinct
//! individuals and keep the one with the strictly highest fitness, ties going to
//! the first one drawn.

use super::Tour;
use crate::error::{Result, TspError};
use crate::fitness::Fitness;
use rand::seq::index;
use rand::Rng;

pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Outcome of one tournament
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    /// Drawn population indices, in draw order
    pub contestants: Vec<usize>,
    /// Index of the winner
    pub winner: usize,
}

fn check_tournament_size(population_len: usize, tournament_size: usize) -> Result<()> {
    if tournament_size == 0 {
        return Err(TspError::InvalidParameter(
            "tournament size must be at least 1".to_string(),
        ));
    }
    if tournament_size > population_len {
        return Err(TspError::InvalidParameter(format!(
            "tournament size {} exceeds population size {}",
            tournament_size, population_len
        )));
    }
    Ok(())
}

/// Run a single tournament over a fitness vector
pub fn tournament<R: Rng + ?Sized>(
    fitness: &[Fitness],
    tournament_size: usize,
    rng: &mut R,
) -> Result<Tournament> {
    check_tournament_size(fitness.len(), tournament_size)?;
    Ok(run_tournament(fitness, tournament_size, rng))
}

fn run_tournament<R: Rng + ?Sized>(
    fitness: &[Fitness],
    tournament_size: usize,
    rng: &mut R,
) -> Tournament {
    let contestants = index::sample(rng, fitness.len(), tournament_size).into_vec();

    let mut winner = contestants[0];
    for &idx in &contestants[1..] {
        if fitness[idx] > fitness[winner] {
            winner = idx;
        }
    }

    Tournament { contestants, winner }
}

/// Fill `population.len()` parent slots by repeated tournaments.
///
/// Winners are borrowed from the population; the same tour may be selected
/// any number of times.
pub fn select<'a, R: Rng + ?Sized>(
    population: &'a [Tour],
    fitness: &[Fitness],
    tournament_size: usize,
    rng: &mut R,
) -> Result<Vec<&'a Tour>> {
    if population.len() != fitness.len() {
        return Err(TspError::InvalidParameter(format!(
            "population has {} tours but fitness vector has {} entries",
            population.len(),
            fitness.len()
        )));
    }
    check_tournament_size(population.len(), tournament_size)?;

    let mut parents = Vec::with_capacity(population.len());
    for _ in 0..population.len() {
        let winner = run_tournament(fitness, tournament_size, rng).winner;
        parents.push(&population[winner]);
    }

    Ok(parents)
}

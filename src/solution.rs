//! Solution representation for the TSP.
//!
//! A [`Solution`] carries the best tour both as city indices and as city names,
//! together with its distance, fitness and run metadata.

use crate::error::Result;
use crate::fitness::{total_distance, Fitness};
use crate::genetic::{is_permutation, Tour};
use crate::graph::WeightedGraph;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Represents a solution to the TSP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// City names in visiting order; the last city connects back to the first
    pub route: Vec<String>,
    /// The same tour as graph city indices
    pub tour: Tour,
    /// Total cyclic tour distance
    pub distance: f64,
    /// Fitness of the tour
    pub fitness: Fitness,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Seed of the run, if the engine seeded its own generator
    pub seed: Option<u64>,
    /// Number of generations run
    pub generations: usize,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Solution {
    /// Create a solution from an index tour
    pub fn from_tour(graph: &WeightedGraph, tour: Tour, algorithm: &str) -> Result<Self> {
        let distance = total_distance(&tour, graph)?;

        Ok(Solution {
            route: graph.route_names(&tour),
            tour,
            distance,
            fitness: Fitness::from_distance(distance),
            algorithm: algorithm.to_string(),
            seed: None,
            generations: 0,
            computation_time: 0.0,
        })
    }

    /// Check if every city of the graph is visited exactly once
    pub fn is_complete(&self, graph: &WeightedGraph) -> bool {
        is_permutation(&self.tour, graph.len()) && self.route.len() == graph.len()
    }

    /// Write the solution as pretty JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Best Route Found:")?;
        writeln!(f, "{}", self.route.join(" -> "))?;
        writeln!(f, "Total Distance Traveled: {} km", self.distance)?;
        writeln!(f, "Fitness Score: {}", self.fitness)?;
        writeln!(f, "Generations: {}", self.generations)?;
        write!(f, "Time: {:.4}s", self.computation_time)
    }
}

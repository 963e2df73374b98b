//! TSP Genetic Algorithm Library
//!
//! Approximates the Traveling Salesman Problem on a weighted city graph with a
//! generational genetic algorithm.
//!
//! # Features
//!
//! - Directed weighted graph with name interning, JSON and CSV loading
//! - Random permutation initialization, tournament selection, ordered
//!   crossover (OX) and swap mutation
//! - Seedable, reproducible runs through an explicit random generator
//! - Multi-seed benchmarking and SVG visualization
//!
//! # Example
//!
//! ```no_run
//! use tsp_genetic::graph::WeightedGraph;
//! use tsp_genetic::genetic::{GAConfig, GeneticAlgorithm};
//!
//! let graph = WeightedGraph::reference_dataset();
//! let config = GAConfig {
//!     population_size: 100,
//!     generations: 200,
//!     ..Default::default()
//! };
//!
//! let solution = GeneticAlgorithm::new(&graph, config)?.run()?;
//! println!("{}", solution);
//! # Ok::<(), tsp_genetic::TspError>(())
//! ```

pub mod error;
pub mod graph;
pub mod dataset;
pub mod fitness;
pub mod solution;
pub mod genetic;
pub mod benchmark;
pub mod visualization;

pub use error::{Result, TspError};
pub use fitness::{fitness, route_distance, total_distance, Fitness};
pub use genetic::{run_genetic_algorithm, GAConfig, GeneticAlgorithm, Tour};
pub use graph::WeightedGraph;
pub use solution::Solution;

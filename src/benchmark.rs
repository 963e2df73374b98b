//! Benchmarking module.
//!
//! Runs the genetic algorithm over a range of seeds, collects per-run results
//! and summarizes them.

use crate::error::{Result, TspError};
use crate::genetic::{GAConfig, GeneticAlgorithm};
use crate::graph::WeightedGraph;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::path::Path;

/// Result of a single seeded run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub seed: u64,
    /// Total distance of the best tour
    pub distance: f64,
    /// Fitness of the best tour (infinite for a zero-length tour)
    pub fitness: f64,
    pub generations: usize,
    /// Computation time in seconds
    pub time: f64,
    /// Best route, cities joined by ` -> `
    pub route: String,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    pub runs: usize,
    pub best_distance: f64,
    pub worst_distance: f64,
    pub mean_distance: f64,
    /// Sample standard deviation, 0 for a single run
    pub std_distance: f64,
    pub mean_time: f64,
    pub best_route: String,
}

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Number of independent runs
    pub runs: usize,
    /// Run `i` uses seed `base_seed + i`
    pub base_seed: u64,
    /// GA parameters shared by all runs; its seed is overridden per run
    pub ga: GAConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            runs: 5,
            base_seed: 0,
            ga: GAConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run all seeds on `graph`, calling `on_run` after each run
    pub fn run<F>(&mut self, graph: &WeightedGraph, mut on_run: F) -> Result<&[RunResult]>
    where
        F: FnMut(&RunResult),
    {
        self.results.clear();

        if self.config.runs > 0 && self.last_seed().is_none() {
            return Err(TspError::InvalidParameter(format!(
                "{} runs from seed {} overflow the seed range",
                self.config.runs, self.config.base_seed
            )));
        }

        for i in 0..self.config.runs as u64 {
            let seed = self.config.base_seed + i;
            let ga_config = GAConfig {
                seed,
                ..self.config.ga.clone()
            };

            let solution = GeneticAlgorithm::new(graph, ga_config)?.run()?;
            log::info!(
                "Benchmark run {} (seed {}): distance {:.2}",
                i + 1,
                seed,
                solution.distance
            );

            let result = RunResult {
                seed,
                distance: solution.distance,
                fitness: solution.fitness.value(),
                generations: solution.generations,
                time: solution.computation_time,
                route: solution.route.join(" -> "),
            };
            on_run(&result);
            self.results.push(result);
        }

        Ok(&self.results)
    }

    /// Seed of the final run, `None` for zero runs or when it would exceed `u64::MAX`
    fn last_seed(&self) -> Option<u64> {
        (self.config.runs as u64)
            .checked_sub(1)
            .and_then(|k| self.config.base_seed.checked_add(k))
    }

    /// Summarize the recorded runs, `None` before any run
    pub fn compute_statistics(&self) -> Option<BenchmarkStatistics> {
        let best = self
            .results
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))?;

        let distances: Vec<f64> = self.results.iter().map(|r| r.distance).collect();
        let times: Vec<f64> = self.results.iter().map(|r| r.time).collect();

        let std_distance = if distances.len() > 1 {
            distances.iter().std_dev()
        } else {
            0.0
        };

        Some(BenchmarkStatistics {
            runs: self.results.len(),
            best_distance: best.distance,
            worst_distance: distances.iter().cloned().fold(0.0, f64::max),
            mean_distance: distances.iter().mean(),
            std_distance,
            mean_time: times.iter().mean(),
            best_route: best.route.clone(),
        })
    }

    /// Export per-run results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export the summary to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        if let Some(stats) = self.compute_statistics() {
            writer.serialize(stats)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("       TSP Genetic Algorithm Benchmark\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let ga = &self.config.ga;
        report.push_str(&format!(
            "Population: {}  Generations: {}  Mutation rate: {}  Tournament: {}\n",
            ga.population_size, ga.generations, ga.mutation_rate, ga.tournament_size
        ));
        match self.last_seed() {
            Some(last) => report.push_str(&format!(
                "Seeds: {}..={}\n\n",
                self.config.base_seed, last
            )),
            None => report.push_str("Seeds: none\n\n"),
        }

        report.push_str(&format!("{:<8} {:>12} {:>12}\n", "Seed", "Distance", "Time"));
        report.push_str("-".repeat(34).as_str());
        report.push('\n');
        for result in &self.results {
            report.push_str(&format!(
                "{:<8} {:>12.2} {:>11.4}s\n",
                result.seed, result.distance, result.time
            ));
        }
        report.push_str("-".repeat(34).as_str());
        report.push('\n');

        match self.compute_statistics() {
            Some(stats) => {
                report.push_str(&format!("Best: {:.2}\n", stats.best_distance));
                report.push_str(&format!("Worst: {:.2}\n", stats.worst_distance));
                report.push_str(&format!(
                    "Mean: {:.2} (std {:.2})\n",
                    stats.mean_distance, stats.std_distance
                ));
                report.push_str(&format!("Mean time: {:.4}s\n", stats.mean_time));
                report.push_str(&format!("Best route: {}\n", stats.best_route));
            }
            None => report.push_str("No runs recorded\n"),
        }

        report
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

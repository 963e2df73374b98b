//! Tour length and fitness evaluation.
//!
//! Fitness is the inverse of the cyclic tour length. A zero-length tour gets the
//! explicit [`Fitness::Maximal`] value instead of an unbounded float.

use crate::error::{Result, TspError};
use crate::genetic::Tour;
use crate::graph::WeightedGraph;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Score of a tour, higher is better.
///
/// Variants are ordered: every `Score` is below `Maximal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fitness {
    /// `1 / total_distance` for a positive distance
    Score(OrderedFloat<f64>),
    /// Fitness of a zero-length tour
    Maximal,
}

impl Fitness {
    /// Fitness of a tour with the given total distance
    pub fn from_distance(distance: f64) -> Self {
        if distance == 0.0 {
            Fitness::Maximal
        } else {
            Fitness::Score(OrderedFloat(1.0 / distance))
        }
    }

    /// The finite score, `None` for [`Fitness::Maximal`]
    pub fn score(&self) -> Option<f64> {
        match self {
            Fitness::Score(s) => Some(s.into_inner()),
            Fitness::Maximal => None,
        }
    }

    /// Numeric value, with [`Fitness::Maximal`] mapped to positive infinity
    pub fn value(&self) -> f64 {
        self.score().unwrap_or(f64::INFINITY)
    }

    pub fn is_maximal(&self) -> bool {
        matches!(self, Fitness::Maximal)
    }

    /// Tour distance this fitness was computed from
    pub fn distance(&self) -> f64 {
        match self {
            Fitness::Score(s) => 1.0 / s.into_inner(),
            Fitness::Maximal => 0.0,
        }
    }
}

/// Unchecked wire form of [`Fitness`]
#[derive(Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
enum RawFitness {
    Score(OrderedFloat<f64>),
    Maximal,
}

impl<'de> Deserialize<'de> for Fitness {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match RawFitness::deserialize(deserializer)? {
            RawFitness::Score(s) if s.into_inner().is_finite() && s.into_inner() > 0.0 => Ok(Fitness::Score(s)),
            RawFitness::Score(s) => Err(serde::de::Error::custom(format!(
                "fitness score must be positive and finite, got {}",
                s
            ))),
            RawFitness::Maximal => Ok(Fitness::Maximal),
        }
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fitness::Score(s) => write!(f, "{}", s.into_inner()),
            Fitness::Maximal => write!(f, "maximal"),
        }
    }
}

/// Sum of the stored weights along the tour, including the closing step back to
/// the first city. Direction matters: step `a -> b` uses the `a` to `b` weight.
pub fn total_distance(tour: &[usize], graph: &WeightedGraph) -> Result<f64> {
    let n = tour.len();
    let mut distance = 0.0;

    for i in 0..n {
        let from = tour[i];
        let to = tour[(i + 1) % n];
        distance += graph
            .weight(from, to)
            .ok_or_else(|| missing_edge(graph, from, to))?;
    }

    Ok(distance)
}

/// [`total_distance`] for a route given by city names
pub fn route_distance<S: AsRef<str>>(route: &[S], graph: &WeightedGraph) -> Result<f64> {
    let tour = graph.route_indices(route)?;
    total_distance(&tour, graph)
}

fn missing_edge(graph: &WeightedGraph, from: usize, to: usize) -> TspError {
    let name = |idx: usize| {
        graph
            .name_of(idx)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", idx))
    };
    TspError::MissingEdge {
        from: name(from),
        to: name(to),
    }
}

/// Fitness of a single tour
pub fn fitness(tour: &[usize], graph: &WeightedGraph) -> Result<Fitness> {
    total_distance(tour, graph).map(Fitness::from_distance)
}

/// Fitness vector index-aligned with `population`
pub fn evaluate_population(population: &[Tour], graph: &WeightedGraph) -> Result<Vec<Fitness>> {
    population.iter().map(|tour| fitness(tour, graph)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> WeightedGraph {
        let mut graph = WeightedGraph::new();
        graph.add_neighbor("A", "B", 1.0).unwrap();
        graph.add_neighbor("B", "C", 2.0).unwrap();
        graph.add_neighbor("C", "A", 3.0).unwrap();
        graph.add_neighbor("B", "A", 10.0).unwrap();
        graph.add_neighbor("C", "B", 20.0).unwrap();
        graph.add_neighbor("A", "C", 30.0).unwrap();
        graph
    }

    #[test]
    fn test_total_distance_wraps_around() {
        let graph = triangle();
        assert_eq!(total_distance(&[0, 1, 2], &graph).unwrap(), 6.0);
        assert_eq!(route_distance(&["B", "C", "A"], &graph).unwrap(), 6.0);
    }

    #[test]
    fn test_total_distance_respects_direction() {
        let graph = triangle();
        assert_eq!(total_distance(&[2, 1, 0], &graph).unwrap(), 60.0);
    }

    #[test]
    fn test_missing_edge() {
        let mut graph = WeightedGraph::new();
        graph.add_neighbor("A", "B", 1.0).unwrap();

        match total_distance(&[0, 1], &graph) {
            Err(TspError::MissingEdge { from, to }) => {
                assert_eq!(from, "B");
                assert_eq!(to, "A");
            }
            other => panic!("expected MissingEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_route_distance_unknown_city() {
        let graph = triangle();
        assert!(matches!(
            route_distance(&["A", "Nowhere"], &graph),
            Err(TspError::CityNotFound(_))
        ));
    }

    #[test]
    fn test_zero_distance_is_maximal() {
        let mut graph = WeightedGraph::new();
        graph.add_neighbor("A", "B", 0.0).unwrap();
        graph.add_neighbor("B", "A", 0.0).unwrap();

        let f = fitness(&[0, 1], &graph).unwrap();
        assert!(f.is_maximal());
        assert_eq!(f.score(), None);
        assert!(f > Fitness::from_distance(1e-12));
    }

    #[test]
    fn test_fitness_is_inverse_distance() {
        let graph = triangle();
        let f = fitness(&[0, 1, 2], &graph).unwrap();
        assert!((f.value() - 1.0 / 6.0).abs() < 1e-12);
        assert!(Fitness::from_distance(5.0) > Fitness::from_distance(6.0));
    }

    #[test]
    fn test_evaluate_population_is_aligned() {
        let graph = triangle();
        let population = vec![vec![0, 1, 2], vec![2, 1, 0]];
        let scores = evaluate_population(&population, &graph).unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_fitness_serializes_tagged() {
        let json = serde_json::to_string(&Fitness::Maximal).unwrap();
        assert_eq!(json, r#"{"kind":"maximal"}"#);
        let back: Fitness = serde_json::from_str(r#"{"kind":"score","value":0.5}"#).unwrap();
        assert_eq!(back.score(), Some(0.5));
    }

    #[test]
    fn test_fitness_rejects_non_positive_score() {
        for json in [
            r#"{"kind":"score","value":0}"#,
            r#"{"kind":"score","value":-1.5}"#,
        ] {
            assert!(serde_json::from_str::<Fitness>(json).is_err(), "{} accepted", json);
        }

        let back: Fitness = serde_json::from_str(r#"{"kind":"maximal"}"#).unwrap();
        assert!(back.is_maximal());
    }
}

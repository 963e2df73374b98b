//! Weighted city graph.
//!
//! Cities are interned to dense indices in registration order. Connections are
//! directional as stored: a symmetric distance table needs both directions added.
//! The genetic engine works on index tours and only translates to names at the
//! boundary.

use crate::error::{Result, TspError};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Directed weighted graph of named cities
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    /// City names in registration order
    names: Vec<String>,
    /// Name -> dense index
    index: HashMap<String, usize>,
    /// Outgoing connections per city, keyed by neighbor index
    connections: Vec<BTreeMap<usize, f64>>,
}

/// Read-only view over the outgoing connections of one city
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    graph: &'a WeightedGraph,
    edges: &'a BTreeMap<usize, f64>,
}

impl<'a> Neighbors<'a> {
    /// Weight of the connection to `name`, if one is stored
    pub fn get(&self, name: &str) -> Option<f64> {
        let idx = self.graph.index_of(name)?;
        self.edges.get(&idx).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate `(neighbor, weight)` pairs sorted by neighbor registration index,
    /// not by the order the connections were added
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let graph = self.graph;
        let edges: &'a BTreeMap<usize, f64> = self.edges;
        edges
            .iter()
            .map(move |(&idx, &w)| (graph.names[idx].as_str(), w))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a city and return its index.
    ///
    /// Registering an existing city keeps its index but clears its outgoing
    /// connections.
    pub fn add_city(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            self.connections[idx].clear();
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.connections.push(BTreeMap::new());
        idx
    }

    fn ensure_city(&mut self, name: &str) -> usize {
        match self.index.get(name) {
            Some(&idx) => idx,
            None => self.add_city(name),
        }
    }

    /// Record a directed connection, registering both endpoints if needed.
    /// Adding the same pair again overwrites the weight.
    pub fn add_neighbor(&mut self, from: &str, to: &str, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(TspError::InvalidParameter(format!(
                "weight from '{}' to '{}' must be a non-negative number, got {}",
                from, to, weight
            )));
        }
        let from_idx = self.ensure_city(from);
        let to_idx = self.ensure_city(to);
        self.connections[from_idx].insert(to_idx, weight);
        Ok(())
    }

    /// City names in registration order
    pub fn get_cities(&self) -> &[String] {
        &self.names
    }

    /// Outgoing connections of `city`
    pub fn get_neighbors(&self, city: &str) -> Result<Neighbors<'_>> {
        let idx = self
            .index_of(city)
            .ok_or_else(|| TspError::CityNotFound(city.to_string()))?;
        Ok(Neighbors {
            graph: self,
            edges: &self.connections[idx],
        })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name_of(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    /// Weight of the stored connection between two city indices
    #[inline]
    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        self.connections.get(from)?.get(&to).copied()
    }

    /// Number of registered cities
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Total number of stored directed connections (self-loops included)
    pub fn num_connections(&self) -> usize {
        self.connections.iter().map(BTreeMap::len).sum()
    }

    /// Translate an index tour into city names
    pub fn route_names(&self, tour: &[usize]) -> Vec<String> {
        tour.iter().map(|&i| self.names[i].clone()).collect()
    }

    /// Translate a named route into an index tour
    pub fn route_indices<S: AsRef<str>>(&self, route: &[S]) -> Result<Vec<usize>> {
        route
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.index_of(name)
                    .ok_or_else(|| TspError::CityNotFound(name.to_string()))
            })
            .collect()
    }

    /// Every ordered pair of distinct cities has a connection
    pub fn is_complete(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| (0..n).filter(|&j| j != i).all(|j| self.weight(i, j).is_some()))
    }

    /// Every connection has a reverse connection of the same weight
    pub fn is_symmetric(&self) -> bool {
        self.connections.iter().enumerate().all(|(i, edges)| {
            edges.iter().all(|(&j, &w)| match self.weight(j, i) {
                Some(back) => (back - w).abs() < 1e-9,
                None => false,
            })
        })
    }

    /// Build a graph from a dict-of-dict distance table:
    /// `{ "A": { "A": 0, "B": 5 }, "B": { "A": 5, "B": 0 } }`
    pub fn from_distance_table(json: &str) -> Result<Self> {
        let table: Map<String, Value> = serde_json::from_str(json)?;
        Self::from_json_map(&table)
    }

    fn from_json_map(table: &Map<String, Value>) -> Result<Self> {
        let mut graph = WeightedGraph::new();
        for (city, row) in table {
            let row = row.as_object().ok_or_else(|| {
                TspError::Parse(format!("row for '{}' is not an object", city))
            })?;
            graph.ensure_city(city);
            for (neighbor, weight) in row {
                let weight = weight.as_f64().ok_or_else(|| {
                    TspError::Parse(format!(
                        "weight from '{}' to '{}' is not a number",
                        city, neighbor
                    ))
                })?;
                graph.add_neighbor(city, neighbor, weight)?;
            }
        }
        graph.log_shape();
        Ok(graph)
    }

    /// Load a dict-of-dict distance table from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let table: Map<String, Value> = serde_json::from_reader(BufReader::new(file))?;
        Self::from_json_map(&table)
    }

    /// Write the graph as a dict-of-dict distance table
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.to_json_value())?;
        Ok(())
    }

    pub fn to_json_value(&self) -> Value {
        let mut table = Map::new();
        for (i, name) in self.names.iter().enumerate() {
            let mut row = Map::new();
            for (&j, &w) in &self.connections[i] {
                row.insert(self.names[j].clone(), Value::from(w));
            }
            table.insert(name.clone(), Value::Object(row));
        }
        Value::Object(table)
    }

    /// Load a square distance matrix from CSV.
    ///
    /// The header row is `city,<name>,<name>,...`; each following row starts with
    /// the source city name. Empty cells mean no connection.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return Err(TspError::Parse("CSV header lists no cities".to_string()));
        }

        let mut graph = WeightedGraph::new();
        for name in &columns {
            graph.ensure_city(name);
        }

        for record in reader.records() {
            let record = record?;
            let city = record
                .get(0)
                .ok_or_else(|| TspError::Parse("empty CSV row".to_string()))?
                .to_string();
            if record.len() != columns.len() + 1 {
                return Err(TspError::Parse(format!(
                    "row for '{}' has {} weights, expected {}",
                    city,
                    record.len() - 1,
                    columns.len()
                )));
            }
            for (neighbor, cell) in columns.iter().zip(record.iter().skip(1)) {
                if cell.is_empty() {
                    continue;
                }
                let weight: f64 = cell.parse().map_err(|_| {
                    TspError::Parse(format!(
                        "invalid weight '{}' from '{}' to '{}'",
                        cell, city, neighbor
                    ))
                })?;
                graph.add_neighbor(&city, neighbor, weight)?;
            }
        }

        graph.log_shape();
        Ok(graph)
    }

    fn log_shape(&self) {
        log::info!(
            "Loaded graph with {} cities and {} connections",
            self.len(),
            self.num_connections()
        );
        if !self.is_complete() {
            log::warn!("Graph is not complete; some tours will have missing edges");
        }
        if !self.is_symmetric() {
            log::warn!("Graph is asymmetric; tour direction changes its length");
        }
        for (i, name) in self.names.iter().enumerate() {
            if let Some(w) = self.weight(i, i) {
                if w != 0.0 {
                    log::warn!("Self-loop on '{}' with weight {} is never used by a tour", name, w);
                }
            }
        }
    }

    /// Get statistics about the graph
    pub fn statistics(&self) -> GraphStatistics {
        let weights: Vec<f64> = self
            .connections
            .iter()
            .enumerate()
            .flat_map(|(i, edges)| {
                edges
                    .iter()
                    .filter(move |&(&j, _)| j != i)
                    .map(|(_, &w)| w)
            })
            .collect();

        let (avg_weight, min_weight, max_weight) = if weights.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                weights.iter().sum::<f64>() / weights.len() as f64,
                weights.iter().cloned().fold(f64::INFINITY, f64::min),
                weights.iter().cloned().fold(0.0, f64::max),
            )
        };

        GraphStatistics {
            num_cities: self.len(),
            num_connections: self.num_connections(),
            num_self_loops: (0..self.len())
                .filter(|&i| self.weight(i, i).is_some())
                .count(),
            avg_weight,
            min_weight,
            max_weight,
            complete: self.is_complete(),
            symmetric: self.is_symmetric(),
        }
    }
}

/// Statistics about a weighted graph
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GraphStatistics {
    pub num_cities: usize,
    pub num_connections: usize,
    pub num_self_loops: usize,
    /// Computed over connections between distinct cities
    pub avg_weight: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    pub complete: bool,
    pub symmetric: bool,
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph:")?;
        writeln!(f, "  Cities: {}", self.num_cities)?;
        writeln!(f, "  Connections: {} ({} self-loops)", self.num_connections, self.num_self_loops)?;
        writeln!(f, "  Avg weight: {:.2}", self.avg_weight)?;
        writeln!(f, "  Min weight: {:.2}", self.min_weight)?;
        writeln!(f, "  Max weight: {:.2}", self.max_weight)?;
        writeln!(f, "  Complete: {}", self.complete)?;
        writeln!(f, "  Symmetric: {}", self.symmetric)
    }
}

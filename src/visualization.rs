//! Visualization utilities for TSP graphs and solutions.
//!
//! Generates SVG drawings of the weighted graph (optionally with the best tour
//! highlighted) and of the convergence history. The graph is only read.

use crate::error::{Result, TspError};
use crate::genetic::GenerationStats;
use crate::graph::WeightedGraph;
use crate::solution::Solution;
use std::collections::HashSet;
use std::path::Path;
#[cfg(not(feature = "png"))]
use std::process::Command;
#[cfg(feature = "png")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "png")]
use resvg::usvg::{self, TreeParsing};

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 1100.0,
            height: 700.0,
            margin: 60.0,
            node_radius: 18.0,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cities evenly spaced on a circle, in registration order
    fn layout(&self, n: usize) -> Vec<(f64, f64)> {
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;
        let radius = (self.width.min(self.height) / 2.0 - self.margin).max(1.0);

        (0..n)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / n.max(1) as f64
                    - std::f64::consts::FRAC_PI_2;
                (cx + radius * angle.cos(), cy + radius * angle.sin())
            })
            .collect()
    }

    /// Generate SVG of the graph; each connection is drawn once with its weight
    /// and self-loops are skipped. The solution's tour, if given, is highlighted.
    pub fn generate_svg(&self, graph: &WeightedGraph, solution: Option<&Solution>) -> String {
        let mut svg = String::new();
        let positions = self.layout(graph.len());

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #87ceeb; stroke: #2c3e50; stroke-width: 2; }}
    .edge {{ stroke: #888888; stroke-width: 0.5; fill: none; }}
    .tour {{ stroke: #e74c3c; stroke-width: 3; fill: none; }}
    .weight {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .label {{ font-family: Arial; font-size: 12px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        let title = match solution {
            Some(sol) => format!(
                "Cities: {} | Distance: {} | Fitness: {}",
                graph.len(),
                sol.distance,
                sol.fitness
            ),
            None => format!("Cities: {}", graph.len()),
        };
        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">{}</text>
"##,
            self.margin, escape(&title)
        ));

        let mut drawn: HashSet<(usize, usize)> = HashSet::new();
        for (i, city) in graph.get_cities().iter().enumerate() {
            let neighbors = match graph.get_neighbors(city) {
                Ok(neighbors) => neighbors,
                Err(_) => continue,
            };
            for (neighbor, weight) in neighbors.iter() {
                let j = match graph.index_of(neighbor) {
                    Some(j) if j != i => j,
                    _ => continue,
                };
                if !drawn.insert((i.min(j), i.max(j))) {
                    continue;
                }

                let (x1, y1) = positions[i];
                let (x2, y2) = positions[j];
                svg.push_str(&format!(
                    r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="edge"/>
<text x="{:.2}" y="{:.2}" class="weight" text-anchor="middle">{}</text>
"##,
                    x1, y1, x2, y2,
                    (x1 + x2) / 2.0, (y1 + y2) / 2.0, weight
                ));
            }
        }

        if let Some(sol) = solution {
            let n = sol.tour.len();
            if n > 1 {
                for k in 0..n {
                    let from = sol.tour[k];
                    let to = sol.tour[(k + 1) % n];
                    if from >= positions.len() || to >= positions.len() {
                        continue;
                    }
                    let (x1, y1) = positions[from];
                    let (x2, y2) = positions[to];
                    svg.push_str(&format!(
                        r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="tour"/>
"##,
                        x1, y1, x2, y2
                    ));
                }
            }
        }

        for (city, &(x, y)) in graph.get_cities().iter().zip(positions.iter()) {
            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="node"/>
<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x, y, self.node_radius,
                x, y - self.node_radius - 4.0, escape(city)
            ));
        }

        svg.push_str("</svg>");

        svg
    }

    /// Generate a line chart of best and mean distance per generation
    pub fn generate_history_svg(&self, history: &[GenerationStats]) -> String {
        let mut svg = String::new();

        let width = self.width;
        let height = 300.0;
        let margin = 50.0;

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .best {{ stroke: #e74c3c; stroke-width: 2; fill: none; }}
    .mean {{ stroke: #3498db; stroke-width: 2; fill: none; }}
    .axis {{ stroke: #2c3e50; stroke-width: 1; }}
    .label {{ font-family: Arial; font-size: 12px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            width, height, width, height
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="25" class="title">Distance per generation (red: best, blue: mean)</text>
"#,
            margin
        ));

        let plot_width = width - 2.0 * margin;
        let plot_height = height - 2.0 * margin;

        svg.push_str(&format!(
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>
<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>
"##,
            margin, height - margin, width - margin, height - margin,
            margin, margin, margin, height - margin
        ));

        let y_max = history
            .iter()
            .map(|s| s.mean_distance)
            .fold(0.0, f64::max)
            .max(1.0);
        let x_scale = plot_width / history.len().saturating_sub(1).max(1) as f64;
        let y_scale = plot_height / y_max;

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label">{:.0}</text>
"#,
            5.0, margin + 5.0, y_max
        ));

        let polyline = |values: Vec<f64>| -> String {
            let mut path = String::new();
            for (i, value) in values.iter().enumerate() {
                let x = margin + i as f64 * x_scale;
                let y = height - margin - value * y_scale;
                if i == 0 {
                    path.push_str(&format!("M {:.2} {:.2}", x, y));
                } else {
                    path.push_str(&format!(" L {:.2} {:.2}", x, y));
                }
            }
            path
        };

        let best = polyline(history.iter().map(|s| s.best_distance).collect());
        let mean = polyline(history.iter().map(|s| s.mean_distance).collect());
        svg.push_str(&format!(
            r##"<path d="{}" class="mean"/>
<path d="{}" class="best"/>
"##,
            mean, best
        ));

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        std::fs::write(path, svg)?;
        Ok(())
    }

    /// Save SVG as PNG with the native renderer
    #[cfg(feature = "png")]
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        let render_error = |msg: String| TspError::Io(std::io::Error::new(std::io::ErrorKind::Other, msg));

        let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
            .map_err(|e| render_error(format!("usvg parse error: {}", e)))?;
        let rtree = resvg::Tree::from_usvg(&tree);

        let mut pixmap = Pixmap::new(self.width.max(1.0) as u32, self.height.max(1.0) as u32)
            .ok_or_else(|| render_error("Failed to create pixmap".to_string()))?;
        rtree.render(Transform::default(), &mut pixmap.as_mut());
        pixmap
            .save_png(path)
            .map_err(|e| render_error(format!("save_png failed: {}", e)))?;
        Ok(())
    }

    /// Save SVG as PNG using an external converter if available.
    /// Tries `rsvg-convert`, then `inkscape`.
    #[cfg(not(feature = "png"))]
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp_svg = path.with_extension("svg.tmp");
        std::fs::write(&tmp_svg, svg)?;

        let out = path.to_string_lossy().to_string();
        let tmp = tmp_svg.to_string_lossy().to_string();
        let attempts: [(&str, Vec<&str>); 2] = [
            ("rsvg-convert", vec!["-o", out.as_str(), tmp.as_str()]),
            ("inkscape", vec![tmp.as_str(), "--export-type=png", "--export-filename", out.as_str()]),
        ];

        for (program, args) in attempts.iter() {
            if let Ok(status) = Command::new(program).args(args).status() {
                if status.success() {
                    let _ = std::fs::remove_file(&tmp_svg);
                    return Ok(());
                }
            }
        }

        let _ = std::fs::remove_file(&tmp_svg);
        Err(TspError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "No SVG->PNG converter succeeded (tried rsvg-convert, inkscape)",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::reference_dataset;

    #[test]
    fn test_visualizer() {
        let graph = reference_dataset();
        let solution = Solution::from_tour(&graph, (0..8).collect(), "test").unwrap();

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&graph, Some(&solution));

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Glasgow"));
        // 28 undirected connections between 8 cities, each drawn once
        assert_eq!(svg.matches(r#"class="edge""#).count(), 28);
        assert_eq!(svg.matches(r#"class="tour""#).count(), 8);
        assert_eq!(svg.matches(r#"class="node""#).count(), 8);
    }

    #[test]
    fn test_names_are_escaped() {
        let mut graph = WeightedGraph::new();
        graph.add_neighbor("A&B", "<C>", 1.0).unwrap();

        let svg = Visualizer::new().generate_svg(&graph, None);
        assert!(svg.contains("A&amp;B"));
        assert!(svg.contains("&lt;C&gt;"));
    }

    #[test]
    fn test_history_svg() {
        let graph = reference_dataset();
        let config = crate::genetic::GAConfig {
            population_size: 10,
            generations: 4,
            ..Default::default()
        };
        let mut ga = crate::genetic::GeneticAlgorithm::new(&graph, config).unwrap();
        ga.run().unwrap();

        let svg = Visualizer::new().generate_history_svg(ga.history());
        assert!(svg.contains(r#"class="best""#));
        assert!(svg.ends_with("</svg>"));
    }
}

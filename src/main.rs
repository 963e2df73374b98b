//! TSP Genetic Algorithm - Command Line Interface
//!
//! Collects run parameters, runs the genetic algorithm and reports the best
//! route found.

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tsp_genetic::benchmark::{Benchmark, BenchmarkConfig};
use tsp_genetic::genetic::{GAConfig, GeneticAlgorithm};
use tsp_genetic::graph::WeightedGraph;
use tsp_genetic::visualization::Visualizer;
use tsp_genetic::Result;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tsp-genetic")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Approximate the Traveling Salesman Problem with a genetic algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Parameters shared by `solve` and `benchmark`; flags override the config file
#[derive(Args)]
struct GaArgs {
    /// Distance table (.json dict-of-dict or .csv matrix); defaults to the UK reference table
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// JSON file with GA parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Population size (at least 2)
    #[arg(short, long)]
    population_size: Option<usize>,

    /// Number of generations
    #[arg(short = 'n', long)]
    generations: Option<usize>,

    /// Mutation rate in [0, 1] (e.g. 0.01 for 1%)
    #[arg(short, long)]
    mutation_rate: Option<f64>,

    /// Tournament size for parent selection
    #[arg(short, long)]
    tournament_size: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the genetic algorithm once
    Solve {
        #[command(flatten)]
        ga: GaArgs,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output solution to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export per-generation statistics to CSV
        #[arg(long)]
        history: Option<PathBuf>,

        /// Generate SVG visualization of the graph and best route
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the genetic algorithm over several seeds
    Benchmark {
        #[command(flatten)]
        ga: GaArgs,

        /// Number of runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "0")]
        base_seed: u64,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Analyze a distance table
    Analyze {
        /// Distance table (.json or .csv); defaults to the UK reference table
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { ga, seed, output, history, svg, verbose } => {
            solve(&ga, seed, output, history, svg, verbose)
        }

        Commands::Benchmark { ga, runs, base_seed, output } => {
            run_benchmark(&ga, runs, base_seed, &output)
        }

        Commands::Analyze { graph } => analyze(graph.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_graph(path: Option<&Path>) -> Result<WeightedGraph> {
    match path {
        None => Ok(WeightedGraph::reference_dataset()),
        Some(path) => {
            println!("Loading graph from {:?}...", path);
            let is_csv = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv {
                WeightedGraph::from_csv_file(path)
            } else {
                WeightedGraph::from_json_file(path)
            }
        }
    }
}

fn build_config(args: &GaArgs) -> Result<GAConfig> {
    let mut config = match &args.config {
        Some(path) => GAConfig::from_file(path)?,
        None => GAConfig::default(),
    };

    if let Some(v) = args.population_size {
        config.population_size = v;
    }
    if let Some(v) = args.generations {
        config.generations = v;
    }
    if let Some(v) = args.mutation_rate {
        config.mutation_rate = v;
    }
    if let Some(v) = args.tournament_size {
        config.tournament_size = v;
    }

    config.validate()?;
    Ok(config)
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}",
    ) {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

fn solve(
    args: &GaArgs,
    seed: Option<u64>,
    output: Option<PathBuf>,
    history: Option<PathBuf>,
    svg: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let graph = load_graph(args.graph.as_deref())?;
    let mut config = build_config(args)?;
    if let Some(seed) = seed {
        config.seed = seed;
    }

    if verbose {
        println!("{}", graph.statistics());
        println!("{:?}", config);
    }

    println!("Solving with population {}, {} generations...", config.population_size, config.generations);
    let bar = progress_bar(config.generations as u64);

    let mut ga = GeneticAlgorithm::new(&graph, config)?;
    let solution = ga.run_with_observer(|stats| {
        if stats.generation > 0 {
            bar.inc(1);
        }
        bar.set_message(format!("best {:.2}", stats.best_distance));
    })?;
    bar.finish_and_clear();

    println!("\n========== Results ==========");
    println!("{}", solution);

    if verbose {
        println!("\nTour indices: {:?}", solution.tour);
        println!("Seed: {:?}", solution.seed);
        println!("Final diversity: {:.2}", ga.population_diversity());
    }

    if let Some(out_path) = output {
        solution.save_json(&out_path)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if let Some(history_path) = history {
        ga.export_history_csv(&history_path)?;
        println!("History exported to {:?}", history_path);
    }

    if let Some(svg_path) = svg {
        let viz = Visualizer::new();
        viz.save_svg(&viz.generate_svg(&graph, Some(&solution)), &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);

        let history_svg = svg_path.with_extension("history.svg");
        viz.save_svg(&viz.generate_history_svg(ga.history()), &history_svg)?;
        println!("Convergence chart saved to {:?}", history_svg);

        let png_path = svg_path.with_extension("png");
        match viz.save_png(&viz.generate_svg(&graph, Some(&solution)), &png_path) {
            Ok(()) => println!("PNG saved to {:?}", png_path),
            Err(e) => log::warn!("PNG conversion skipped: {}", e),
        }
    }

    Ok(())
}

fn run_benchmark(args: &GaArgs, runs: usize, base_seed: u64, output: &Path) -> Result<()> {
    let graph = load_graph(args.graph.as_deref())?;
    let ga = build_config(args)?;

    std::fs::create_dir_all(output)?;

    let mut benchmark = Benchmark::new(BenchmarkConfig { runs, base_seed, ga });

    println!("Running {} seeded runs...", runs);
    let bar = progress_bar(runs as u64);
    benchmark.run(&graph, |result| {
        bar.inc(1);
        bar.set_message(format!("seed {} -> {:.2}", result.seed, result.distance));
    })?;
    bar.finish_and_clear();

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

fn analyze(path: Option<&Path>) -> Result<()> {
    let graph = load_graph(path)?;

    println!("========== Graph Analysis ==========\n");
    println!("{}", graph.statistics());

    println!("Cities:");
    for city in graph.get_cities() {
        let neighbors = graph.get_neighbors(city)?;
        let nearest = neighbors
            .iter()
            .filter(|&(name, _)| name != city.as_str())
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((name, weight)) => println!(
                "  {:<15} {} connections, nearest {} ({})",
                city,
                neighbors.len(),
                name,
                weight
            ),
            None => println!("  {:<15} no outgoing connections", city),
        }
    }

    Ok(())
}

use clap::Parser;
use interaction_graph_stats::centrality::DEFAULT_TOLERANCE;
use interaction_graph_stats::{
    ClusterConnectivity, ClusterLabels, Error, GraphSampler, InteractionGraph, Progress, Seeding,
    Ticker, top_connected,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Cluster connectivity, centrality and sampled distance statistics for an interaction graph
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Edge table with Source and Target columns
    #[arg(long, default_value = "data/edges.csv")]
    edges: PathBuf,

    /// Node table with Id and modularity_class columns
    #[arg(long, default_value = "data/nodes.csv")]
    nodes: PathBuf,

    /// Node pairs sampled for the average path length
    #[arg(long, default_value_t = 100_000)]
    path_samples: usize,

    /// BFS sources sampled for the approximate diameter
    #[arg(long, default_value_t = 10)]
    diameter_probes: usize,

    /// Rows in the top-connected table
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Power-iteration cap for eigenvector centrality
    #[arg(long, default_value_t = 1000)]
    eigen_max_iter: usize,

    /// Fixed seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (default: one per logical CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Do not log sampling progress
    #[arg(long)]
    no_progress: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(Error::from)?;
    }
    let seeding = cli.seed.map_or(Seeding::Entropy, Seeding::Fixed);

    // 1. Cluster connectivity over the raw edge table
    let labels = ClusterLabels::from_csv(&cli.nodes)?;
    let stats = ClusterConnectivity::from_csv(&cli.edges, &labels)?;

    println!("Total Edges: {}", stats.total);
    println!("Within-Cluster Edges: {} ({:.2}%)", stats.within, stats.within_pct());
    println!("Cross-Cluster Edges: {} ({:.2}%)", stats.cross, stats.cross_pct());
    println!("Cluster Density: {}\n", stats.density());

    // 2. Largest connected component
    let graph = InteractionGraph::from_csv(&cli.edges)?.largest_component();

    // 3. Centrality
    let top = top_connected(&graph, cli.top, cli.eigen_max_iter, DEFAULT_TOLERANCE)?;
    println!("\nTop {} Connected Users by Degree with Eigenvector Centrality:", cli.top);
    println!("{:<24} {:>8} {:>24}", "Node", "Degree", "Eigenvector Centrality");
    for row in &top {
        println!("{:<24} {:>8} {:>24.6}", row.name, row.degree, row.eigenvector);
    }

    // 4. Sampled distances
    let start = Instant::now();
    let avg = with_progress(!cli.no_progress, "Avg Path Length", cli.path_samples, |ticker| {
        sampler(&graph, seeding, ticker).estimate_average_path_length(cli.path_samples)
    });
    println!("\nApproximate Average Path Length: {avg}");
    println!("Time taken: {:.2} seconds", start.elapsed().as_secs_f64());

    println!("\nCalculating approximate diameter with BFS...");
    let diameter = with_progress(!cli.no_progress, "Diameter", cli.diameter_probes, |ticker| {
        sampler(&graph, seeding, ticker).estimate_diameter(cli.diameter_probes)
    })?;
    println!("Approximate Diameter: {diameter}");

    Ok(())
}

fn sampler(
    graph: &InteractionGraph,
    seeding: Seeding,
    ticker: Option<Ticker>,
) -> GraphSampler<'_, String, ()> {
    let sampler = GraphSampler::new(graph.inner()).with_seeding(seeding);
    match ticker {
        Some(ticker) => sampler.with_progress(ticker),
        None => sampler,
    }
}

fn with_progress<T>(
    enabled: bool,
    label: &'static str,
    total: usize,
    run: impl FnOnce(Option<Ticker>) -> T,
) -> T {
    if !enabled {
        return run(None);
    }
    let progress = Progress::start(label, total);
    let out = run(Some(progress.ticker()));
    progress.finish();
    out
}

//! walkvec CLI - DeepWalk / node2vec baseline embeddings from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Train node2vec embeddings and write the vector file
//! walkvec embed graph.edgelist -o graph.vec --method node2vec --p 0.5 --q 2.0
//!
//! # Same, plus a JSON run summary
//! walkvec embed graph.edgelist -o graph.vec --method deepwalk --summary run.json
//!
//! # Dump the walks only
//! walkvec walks graph.edgelist -o walks.txt --method deepwalk --walk-length 80
//!
//! # Graph statistics
//! walkvec stats graph.edgelist
//! ```
//!
//! Logging goes to stderr and honors `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walkvec_core::algo::random_walk::{generate_walks, Method, RandomWalkConfig, WalkMode};
use walkvec_core::Graph;
use walkvec_nn::{embed, EmbedConfig};

const DEFAULT_LOG_FILTER: &str = "warn,walkvec=info,walkvec_core=info,walkvec_nn=info";

#[derive(Parser)]
#[command(name = "walkvec")]
#[command(about = "DeepWalk / node2vec node embeddings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train embeddings and write one vector per node
    Embed {
        /// Input edge list (`u v` per line)
        input: PathBuf,

        /// Output vector file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        walk: WalkArgs,

        #[command(flatten)]
        train: TrainArgs,

        /// Write a JSON run summary here
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Generate random walks (one walk per line)
    Walks {
        /// Input edge list (`u v` per line)
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Show statistics about an edge list
    Stats {
        /// Input edge list (`u v` per line)
        input: PathBuf,
    },
}

#[derive(Args)]
struct WalkArgs {
    /// Walk method: deepwalk or node2vec
    #[arg(long)]
    method: Method,

    /// Walk length
    #[arg(long, default_value = "40")]
    walk_length: usize,

    /// Number of walks per node
    #[arg(long, default_value = "10")]
    num_walks: usize,

    /// Return parameter p (node2vec only)
    #[arg(long, default_value = "1.0")]
    p: f64,

    /// In-out parameter q (node2vec only)
    #[arg(long, default_value = "1.0")]
    q: f64,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Generate walk batches on all cores (reproducible, but different walks)
    #[arg(long)]
    parallel_walks: bool,
}

impl WalkArgs {
    fn mode(&self) -> WalkMode {
        if self.parallel_walks {
            WalkMode::Parallel
        } else {
            WalkMode::Sequential
        }
    }

    fn config(&self) -> RandomWalkConfig {
        RandomWalkConfig {
            walk_length: self.walk_length,
            num_walks: self.num_walks,
            method: self.method,
            p: self.p,
            q: self.q,
            seed: self.seed,
            mode: self.mode(),
        }
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Embedding dimension
    #[arg(long, default_value = "128")]
    dim: usize,

    /// Skip-gram window radius
    #[arg(long, default_value = "5")]
    window: usize,

    /// Training epochs
    #[arg(long, default_value = "3")]
    epochs: usize,

    /// Negative samples per positive pair
    #[arg(long, default_value = "5")]
    neg: usize,

    /// Initial learning rate
    #[arg(long, default_value = "0.025")]
    lr: f32,
}

fn embed_config(walk: &WalkArgs, train: &TrainArgs) -> EmbedConfig {
    EmbedConfig::default()
        .with_method(walk.method)
        .with_embedding_dim(train.dim)
        .with_walk_length(walk.walk_length)
        .with_num_walks(walk.num_walks)
        .with_window(train.window)
        .with_epochs(train.epochs)
        .with_negative_samples(train.neg)
        .with_learning_rate(train.lr)
        .with_bias(walk.p, walk.q)
        .with_seed(walk.seed)
        .with_walk_mode(walk.mode())
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Embed {
            input,
            output,
            walk,
            train,
            summary,
        } => cmd_embed(
            &input,
            &output,
            &embed_config(&walk, &train),
            summary.as_deref(),
        ),
        Commands::Walks {
            input,
            output,
            walk,
        } => cmd_walks(&input, &output, &walk.config()),
        Commands::Stats { input } => cmd_stats(&input),
    }
}

fn load_graph(path: &Path) -> Result<Graph> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let graph = Graph::from_edgelist_file(path)
        .with_context(|| format!("Failed to load edge list {}", path.display()))?;

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    Ok(graph)
}

fn cmd_embed(
    input: &Path,
    output: &Path,
    config: &EmbedConfig,
    summary: Option<&Path>,
) -> Result<()> {
    config.validate()?;
    let graph = load_graph(input)?;

    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!(
        "Training {} (dim={}, l={}, n={}, epochs={})...",
        config.method, config.embedding_dim, config.walk_length, config.num_walks, config.epochs
    ));
    let (embedding, report) = embed(&graph, config, None).context("Embedding failed")?;
    pb.finish_with_message(format!("Trained in {:.2?}", start.elapsed()));

    // Nothing touches `output` until training has succeeded.
    fs::write(output, embedding.to_vector_string())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if let Some(path) = summary {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!(
        "Wrote {} vectors (dim {}) to {}",
        embedding.len(),
        config.embedding_dim,
        output.display()
    );
    Ok(())
}

fn cmd_walks(input: &Path, output: &Path, config: &RandomWalkConfig) -> Result<()> {
    config.validate()?;
    let graph = load_graph(input)?;

    println!(
        "Generating {} walks (l={}, n={}, p={}, q={})...",
        config.method, config.walk_length, config.num_walks, config.p, config.q
    );
    let start = Instant::now();
    let walks = generate_walks(&graph, config);
    println!("Generated {} walks in {:.2?}", walks.len(), start.elapsed());

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    for walk in &walks {
        let line: Vec<String> = walk.iter().map(u64::to_string).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    writer.flush()?;

    println!("Done.");
    Ok(())
}

fn cmd_stats(input: &Path) -> Result<()> {
    let graph = load_graph(input)?;
    let stats = graph.stats();

    println!("Graph Statistics");
    println!("================");
    println!("Nodes:          {}", stats.num_nodes);
    println!("Edges:          {}", stats.edge_count);
    println!("Self-loops:     {}", stats.self_loops);
    println!("Max degree:     {}", stats.max_degree);
    println!("Avg degree:     {:.2}", stats.avg_degree);

    Ok(())
}

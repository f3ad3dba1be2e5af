//! kgraph CLI
//!
//! Prints the saved-object dependency graph of a cluster, or export
//! records for selected objects, as JSON on stdout.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kgraph_graph::{Cluster, ClusterSet};
use kgraph_store::{AppConfig, MemoryStore};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// kgraph - dependency graph of saved dashboards, visualizations and searches
#[derive(Parser)]
#[command(name = "kgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file with global defaults and clusters
    #[arg(short, long, env = "KGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Store URL for a single ad hoc cluster (ignores --config)
    #[arg(long)]
    host: Option<String>,

    /// Saved-object index for --host (defaults to .kibana)
    #[arg(long, requires = "host")]
    index: Option<String>,

    /// Read saved objects from a JSON dump instead of a live store (ignores --config)
    #[arg(long, conflicts_with = "host")]
    dump: Option<PathBuf>,

    /// Cluster name (defaults to the first configured one)
    #[arg(short = 'C', long)]
    cluster: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node/edge graph
    Graph {
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print export records for the given object ids (e.g. dashboard:abc)
    Export {
        /// Object ids
        #[arg(required = true)]
        ids: Vec<String>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show node counts per type
    Stats,

    /// List configured clusters
    Clusters,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging; stdout is reserved for JSON output
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let clusters = load_clusters(&cli)?;
    let name = cli.cluster.as_deref();

    match cli.command {
        Commands::Graph { pretty } => {
            let graph = clusters.graph(name).await.context("Failed to build graph")?;
            print_json(graph.as_ref(), pretty)?;
        }

        Commands::Export { ids, pretty } => {
            let records = clusters
                .export(name, &ids)
                .await
                .context("Failed to export objects")?;
            print_json(&records, pretty)?;
        }

        Commands::Stats => {
            let graph = clusters.graph(name).await.context("Failed to build graph")?;

            println!("📊 Saved objects");
            for (object_type, count) in graph.count_by_type() {
                println!("  {:<15} {}", object_type, count);
            }
            println!("  {:<15} {}", "edges", graph.edges.len());
            if graph.has_missing() {
                println!("⚠️  Some references point at missing objects");
            }
        }

        Commands::Clusters => {
            for name in clusters.names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn load_clusters(cli: &Cli) -> Result<ClusterSet> {
    if let Some(path) = &cli.dump {
        let store = MemoryStore::from_json_file(path)
            .with_context(|| format!("Failed to read dump {}", path.display()))?;
        let config = AppConfig::single(format!("file://{}", path.display()), None);
        let settings = config.resolved().remove(0);
        info!("Using dump {}", path.display());
        return Ok(ClusterSet::new(vec![Cluster::new(settings, Arc::new(store))]));
    }

    let config = match (&cli.host, &cli.config) {
        (Some(host), _) => AppConfig::single(host.clone(), cli.index.clone()),
        (None, Some(path)) => {
            AppConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?
        }
        (None, None) => bail!("No cluster configured: pass --config, --host or --dump"),
    };

    ClusterSet::from_config(&config).context("Failed to set up clusters")
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

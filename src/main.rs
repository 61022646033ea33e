use clap::{Parser, Subcommand};
use homex_api::{RestApi, DEFAULT_NEARBY_LIMIT};
use homex_similarity::{DEFAULT_K, DEFAULT_RADIUS_KM};
use homex_storage::{CatalogConfig, CatalogManager};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Apartment recommendations and landmark proximity search
#[derive(Parser, Debug)]
#[command(name = "homex")]
#[command(about = "Similar-listing recommendations and nearby search", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct DatasetArgs {
    /// Path to the apartments CSV
    #[arg(short, long, default_value = "data/appartments.csv")]
    dataset: PathBuf,

    /// Directory for cached snapshots
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Keep every data row (by default the known malformed row is dropped)
    #[arg(long)]
    keep_all_rows: bool,
}

impl DatasetArgs {
    fn config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::new(&self.dataset);
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if self.keep_all_rows {
            config = config.with_drop_row(None);
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// HTTP API port
        #[arg(long, default_value_t = 8501)]
        http_port: u16,
    },
    /// Properties most similar to one property
    Recommend {
        #[command(flatten)]
        dataset: DatasetArgs,

        property: String,

        #[arg(short, default_value_t = DEFAULT_K)]
        k: usize,
    },
    /// Properties within a radius of a landmark
    Nearby {
        #[command(flatten)]
        dataset: DatasetArgs,

        landmark: String,

        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius_km: f64,

        #[arg(long, default_value_t = DEFAULT_NEARBY_LIMIT)]
        limit: usize,
    },
    /// List known landmarks
    Landmarks {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Serve { dataset, http_port } => {
            info!("Starting homex v{}", env!("CARGO_PKG_VERSION"));
            info!("Dataset: {:?}", dataset.dataset);

            let catalog = Arc::new(CatalogManager::open(dataset.config())?);
            info!("Catalog ready: {} properties", catalog.snapshot().len());

            let http_handle = std::thread::spawn(move || {
                info!("Starting HTTP server on port {}", http_port);
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(catalog, http_port).await {
                        tracing::error!("HTTP server error: {}", e);
                    }
                })
            });

            info!("HTTP API: http://localhost:{}/", http_port);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }
            info!("Shutting down...");
        }
        Command::Recommend { dataset, property, k } => {
            let catalog = CatalogManager::open(dataset.config())?;
            let results = catalog.facade().recommend(&property, k)?;
            println!("Properties similar to {}:", property);
            for (rank, n) in results.iter().enumerate() {
                println!(
                    "{:>2}. {} ({}) score {:.3} [facilities {:.3}, configuration {:.3}, location {:.3}]",
                    rank + 1,
                    n.property_name,
                    n.sub_name,
                    n.fused_score,
                    n.breakdown.facility,
                    n.breakdown.configuration,
                    n.breakdown.landmark,
                );
                if !n.top_facilities.is_empty() {
                    println!("    Top facilities: {}", n.top_facilities.join(", "));
                }
                if !n.nearby_locations_excerpt.is_empty() {
                    println!("    Nearby: {}...", n.nearby_locations_excerpt);
                }
            }
        }
        Command::Nearby {
            dataset,
            landmark,
            radius_km,
            limit,
        } => {
            let catalog = CatalogManager::open(dataset.config())?;
            let results = catalog.facade().search_nearby(&landmark, radius_km)?;
            if results.is_empty() {
                println!("No properties found within {} km of {}", radius_km, landmark);
            } else {
                println!(
                    "Found {} properties within {} km of {}",
                    results.len(),
                    radius_km,
                    landmark
                );
            }
            for p in results.iter().take(limit) {
                println!(
                    "{:>6.1} km  {} ({})",
                    p.distance_km, p.property_name, p.sub_name
                );
            }
        }
        Command::Landmarks { dataset } => {
            let catalog = CatalogManager::open(dataset.config())?;
            for name in catalog.facade().landmarks() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

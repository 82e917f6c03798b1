use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use keyscout::api::create_router;
use keyscout::config::Config;
use keyscout::export::{render_recommendations, render_table, write_csv};
use keyscout::keyword_engine::{KeywordEngine, domain_token, parse_target_url};
use keyscout::recommendations::recommendations;

#[derive(Parser, Debug)]
#[command(
    name = "keyscout",
    version,
    about = "Keyword opportunities for a site, from its search results"
)]
struct Cli {
    /// Seed for the synthetic metrics (overrides METRICS_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Analyze one or more sites and print the results
    Analyze {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Write CSV to this path instead of printing a table
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Rows to print per site
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if cli.seed.is_some() {
        config.metrics_seed = cli.seed;
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            serve(config).await
        }
        Command::Analyze { urls, csv, limit } => analyze(config, urls, csv, limit).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let engine = Arc::new(KeywordEngine::from_config(&config)?);
    if !engine.is_configured() {
        tracing::warn!("SERPSTACK_API_KEY is not set, every analysis will fail until it is");
    }

    let app = create_router(engine, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn analyze(
    config: Config,
    urls: Vec<String>,
    csv: Option<PathBuf>,
    limit: usize,
) -> Result<()> {
    let engine = KeywordEngine::from_config(&config)?;
    let analyses = join_all(urls.iter().map(|url| engine.analyze(Some(url.as_str())))).await;

    let mut failures = 0;
    for (idx, (url, analysis)) in urls.iter().zip(analyses).enumerate() {
        let result = match analysis {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("{url}: {e}");
                failures += 1;
                continue;
            }
        };

        match &csv {
            Some(path) => {
                let path = if urls.len() == 1 {
                    path.clone()
                } else {
                    csv_path_for(path, idx + 1, url)
                };
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_csv(&result.keywords, file)?;
                println!(
                    "{url}: wrote {} keywords to {}",
                    result.keywords.len(),
                    path.display()
                );
            }
            None => {
                println!("{url} ({})", result.timestamp);
                println!("{}", render_table(&result.keywords, limit));
                println!("{}\n", render_recommendations(&recommendations(&result.keywords)));
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} analyses failed", urls.len());
    }
    Ok(())
}

/// "out.csv", 2, "https://www.example.com" -> "out-2-example.csv"
fn csv_path_for(path: &Path, n: usize, url: &str) -> PathBuf {
    let token = parse_target_url(url)
        .map(|u| domain_token(&u))
        .unwrap_or_else(|_| "site".to_string());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "keywords".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}-{n}-{token}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{n}-{token}"),
    };
    path.with_file_name(file_name)
}

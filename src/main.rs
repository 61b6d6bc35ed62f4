use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use cotacoes::config::Config;
use cotacoes::pipeline::FetchPipeline;
use cotacoes::server::{app_router, AppState};
use cotacoes::{chart, export, logging};

#[derive(Parser)]
#[command(name = "cotacoes")]
#[command(about = "br.investing.com quotes scraper and dashboard")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Run one fetch cycle and write the CSV and chart artifacts
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Arc::new(Config::load(&cli.config)?);

    match cli.command {
        Commands::Serve { port } => {
            let app = app_router(AppState {
                config: config.clone(),
            });
            let bind_addr = format!("0.0.0.0:{}", port);
            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            println!(
                "Dashboard listening on {} (visit http://127.0.0.1:{})",
                bind_addr, port
            );
            axum::serve(listener, app).await?;
        }
        Commands::Fetch => {
            let pipeline = FetchPipeline::new(config.clone())?;
            match pipeline.run().await {
                Ok(dataset) => {
                    export::write_csv(&dataset, &config.csv_path)?;
                    if let Some(column) = config.variation_column() {
                        chart::render_variation_chart(&dataset, column, &config.chart_path)?;
                    }
                    println!("\n📊 Fetch cycle results:");
                    println!("   Rows: {}", dataset.len());
                    println!("   Skipped: {}", dataset.skipped_rows());
                    println!("   CSV: {}", config.csv_path.display());
                    println!("   Chart: {}", config.chart_path.display());
                }
                Err(e) => {
                    error!("fetch cycle failed: {}", e);
                    anyhow::bail!("fetch cycle failed: {e}");
                }
            }
        }
    }

    Ok(())
}

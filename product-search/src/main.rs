use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use product_search::handlers::QUERY_PARAM;
use product_search::{AppError, Dependencies};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "product-search")]
#[command(about = "Keep the product search index in sync and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a change stream delivery and print the items to redeliver
    Sync {
        /// Delivery JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// Search products and print the endpoint response
    Query {
        /// Free-text query
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "product-search failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let deps = Dependencies::from_env()?;

    match cli.command {
        Commands::Sync { input } => {
            let delivery = read_input(&input).await?;
            let handler = deps.stream_handler().await?;
            let response = handler.handle(serde_json::from_str(&delivery)?).await?;

            info!(
                failed = response.batch_item_failures.len(),
                "Delivery synchronized"
            );
            println!("{}", serde_json::to_string(&response)?);
        }
        Commands::Query { text } => {
            let params: HashMap<String, String> = text
                .map(|text| HashMap::from([(QUERY_PARAM.to_string(), text)]))
                .unwrap_or_default();
            let handler = deps.query_handler().await?;
            let response = handler.handle_request(&params).await;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

async fn read_input(input: &Path) -> Result<String, AppError> {
    if input.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        Ok(buffer)
    } else {
        Ok(tokio::fs::read_to_string(input).await?)
    }
}

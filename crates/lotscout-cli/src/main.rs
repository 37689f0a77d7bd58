use std::io::Read;

use clap::{Parser, Subcommand};

use lotscout_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "lotscout-cli")]
#[command(about = "Resolve vehicle-listing facts from a URL or pasted text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a listing URL and resolve it.
    Url { url: String },
    /// Resolve raw pasted listing text; pass `-` to read stdin.
    Text { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let resolution = match cli.command {
        Commands::Url { url } => lotscout_extractor::resolve_url(&url, None, &config).await?,
        Commands::Text { text } => {
            let text = if text == "-" {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                text
            };
            lotscout_extractor::resolve_text(&text, None, &config)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}

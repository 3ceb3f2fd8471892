use anyhow::Result;
use axum::Router;
use clap::Parser;
use docrank_core::{EngineConfig, NormalizerConfig};
use docrank_server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Processed corpus directory (one normalized file per document)
    #[arg(long, default_value = "./data/articles/processed")]
    corpus: PathBuf,
    /// Raw article directory served by /details
    #[arg(long, default_value = "./data/articles/raw")]
    raw_dir: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Saturation constant k of the scoring function
    #[arg(long, default_value_t = 1.0)]
    saturation: f32,
    /// Stopword and stemmer language for queries
    #[arg(long, default_value = "english")]
    language: String,
    /// File with additional stopwords, one per line
    #[arg(long)]
    stopwords: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = AppConfig {
        corpus_dir: args.corpus,
        raw_dir: args.raw_dir,
        engine: EngineConfig::with_saturation(args.saturation),
        normalizer: NormalizerConfig { language: args.language, stopwords_path: args.stopwords },
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

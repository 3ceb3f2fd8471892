use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docrank_core::{EngineConfig, Normalizer, NormalizerConfig, SearchEngine, DEFAULT_TOP_K};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod ingest;

use ingest::{collect_input_files, prepare_corpus, CorpusPaths};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Prepare and inspect document corpora", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NormalizerArgs {
    /// Stopword and stemmer language
    #[arg(long, default_value = "english")]
    language: String,
    /// File with additional stopwords, one per line
    #[arg(long)]
    stopwords: Option<PathBuf>,
}

impl NormalizerArgs {
    fn build(&self) -> Result<Normalizer> {
        let config = NormalizerConfig { language: self.language.clone(), stopwords_path: self.stopwords.clone() };
        Ok(Normalizer::new(&config)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Split JSON/JSONL/CSV articles into raw and processed documents
    Prepare {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Directory for raw article bodies
        #[arg(long, default_value = "./data/articles/raw")]
        raw_dir: PathBuf,
        /// Directory for normalized article bodies (the search corpus)
        #[arg(long, default_value = "./data/articles/processed")]
        processed_dir: PathBuf,
        /// Maximum number of articles to extract
        #[arg(long, default_value_t = 100)]
        max_articles: usize,
        #[command(flatten)]
        normalizer: NormalizerArgs,
    },
    /// Build the engine over a corpus and print its statistics
    Stats {
        #[arg(long, default_value = "./data/articles/processed")]
        corpus: PathBuf,
        /// Saturation constant k of the scoring function
        #[arg(long, default_value_t = 1.0)]
        saturation: f32,
    },
    /// Run one query against a corpus
    Query {
        #[arg(long, default_value = "./data/articles/processed")]
        corpus: PathBuf,
        /// Raw query text
        #[arg(long)]
        q: String,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        limit: usize,
        #[arg(long, default_value_t = 1.0)]
        saturation: f32,
        #[command(flatten)]
        normalizer: NormalizerArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare { input, raw_dir, processed_dir, max_articles, normalizer } => {
            let normalizer = normalizer.build()?;
            let files = collect_input_files(&input)?;
            let paths = CorpusPaths::new(raw_dir, processed_dir);
            let report = prepare_corpus(&files, &paths, &normalizer, max_articles)?;
            println!("wrote {} articles ({} skipped)", report.written, report.skipped);
            Ok(())
        }
        Commands::Stats { corpus, saturation } => {
            let engine = SearchEngine::build(&corpus, EngineConfig::with_saturation(saturation))
                .with_context(|| format!("building engine from {}", corpus.display()))?;
            println!("{}", serde_json::to_string_pretty(&engine.stats())?);
            Ok(())
        }
        Commands::Query { corpus, q, limit, saturation, normalizer } => {
            let normalizer = normalizer.build()?;
            let engine = SearchEngine::build(&corpus, EngineConfig::with_saturation(saturation))
                .with_context(|| format!("building engine from {}", corpus.display()))?;
            for hit in engine.search_text(&normalizer, &q, limit) {
                println!("{:.4}\t{}", hit.score, hit.name);
            }
            Ok(())
        }
    }
}

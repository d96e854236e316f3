use anyhow::Result;
use axum::Router;
use clap::Parser;
use docbase_core::DocBaseConfig;
use server::{build_app, AppOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "In-memory TF-IDF document search service", long_about = None)]
struct Args {
    /// Directory of text documents ingested at startup
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// File extensions picked up from the corpus directory
    #[arg(long, value_delimiter = ',', default_value = "txt,md")]
    extensions: Vec<String>,
    /// JSON document-base configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured default language
    #[arg(long)]
    default_lang: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut docbase = match &args.config {
        Some(path) => DocBaseConfig::load(path)?,
        None => DocBaseConfig::default(),
    };
    if let Some(lang) = args.default_lang {
        docbase.default_lang = lang;
    }
    let options = AppOptions {
        docbase,
        corpus_dir: args.corpus,
        extensions: args.extensions,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(&options)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

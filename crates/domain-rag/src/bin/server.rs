//! Domain RAG server binary
//!
//! Run with: cargo run -p domain-rag --bin domain-rag-server -- insurance

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain_rag::{
    config::RagConfig,
    providers,
    server::{state::AppState, RagServer},
    Domain, Secrets,
};

/// Serve structured answers over one knowledge-base domain
#[derive(Debug, Parser)]
#[command(name = "domain-rag-server", version, about)]
struct Args {
    /// Domain to serve; documents are read from <knowledge-base>/<domain>
    domain: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Knowledge base root directory
    #[arg(long)]
    knowledge_base: Option<PathBuf>,

    /// Host address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "domain_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                     Domain RAG Service                    ║
║        Structured decisions grounded in your documents    ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = RagConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = args.knowledge_base {
        config.knowledge_base.root = root;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let secrets = Secrets::from_env(&config.secrets).context("Missing required secret")?;
    let domain = Domain::resolve(&config.knowledge_base.root, &args.domain)?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Domain: {} ({})", domain.name(), domain.folder().display());
    tracing::info!("  - Embedding model: {} ({:?})", config.embeddings.model, config.embeddings.backend);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top K: {}", config.retrieval.top_k);
    tracing::debug!("Secrets loaded: {:?}", secrets);

    let (embedder, llm) = providers::from_config(&config, &secrets)?;

    let state = AppState::initialize(config, domain, embedder, llm)
        .await
        .context("Failed to build the domain index")?;
    let server = RagServer::new(state);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  Info: http://{}/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /predict   - {{\"query\": ..., \"domain\": ...}}");
    println!("  POST /evaluate  - {{\"query\": ...}}");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}

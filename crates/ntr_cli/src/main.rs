use anyhow::Context;
use clap::{Parser, Subcommand};
use ntr_core::AppConfig;
use ntr_inference::ArticleGenerator;
use ntr_publisher::{handle_command, BatchPublisher, PublishArgs, PublishCommands};
use ntr_storage::StorageKind;
use ntr_web::{create_app, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "NTR news site: API server and AI article publisher", long_about = None)]
pub struct Cli {
    /// Article store: memory, supabase or sqlite
    #[arg(long, default_value = "memory")]
    storage: String,
    /// Overrides the database URL (or the SQLite file path)
    #[arg(long)]
    backend_url: Option<String>,
    /// Read settings from this dotenv file instead of ./.env
    #[arg(long)]
    env_file: Option<std::path::PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    #[command(flatten)]
    Publisher(PublishCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ntr_publisher::init_logging();
    let cli = Cli::parse();
    let config = match cli.env_file.as_deref() {
        Some(path) => AppConfig::from_env_file(path)?,
        None => AppConfig::load(),
    };

    let kind: StorageKind = cli.storage.parse()?;
    let storage = ntr_storage::create_storage(kind, &config.backend, cli.backend_url.as_deref())
        .await
        .with_context(|| kind.get_error_message())?;
    info!("✨ Storage initialized (using {})", kind);

    match cli.command {
        Commands::Serve { addr } => {
            let state = AppState::new(config, storage);
            let app = create_app(state);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("🌐 Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Publisher(command) => {
            let generator = Arc::new(ArticleGenerator::from_config(&config.generation));
            info!("🧠 Generation models: {}", generator.models().join(", "));
            let publisher = BatchPublisher::new(generator.clone(), storage);
            handle_command(PublishArgs { command }, &generator, &publisher).await?;
        }
    }

    Ok(())
}

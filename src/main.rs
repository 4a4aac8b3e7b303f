//! Family Chat - talk with a family persona on the Gemini API
//!
//! Runs as a terminal REPL by default, or as an HTTP server with `--serve`.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use family_chat::config::{config_dir, FileConfig, Overrides, Settings};
use family_chat::repl::{colors, Repl};
use family_chat::server::{self, AppState};
use family_chat::{ConversationSession, GeminiClient, ModelResolver, PersonaCatalog};

#[derive(Parser)]
#[command(name = "family-chat")]
#[command(about = "우리 가족 사랑방 - family persona chat on Gemini")]
struct Args {
    /// Run as HTTP server instead of REPL
    #[arg(long)]
    serve: bool,

    /// HTTP server port (default: 3000)
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Persona to start with (father, mother, sibling, or a display label)
    #[arg(long, short = 'p')]
    persona: Option<String>,

    /// Skip model discovery and use the static candidate list
    #[arg(long)]
    no_discovery: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.family-chat/.env or current dir)
    let env_path = Some(config_dir().join(".env")).filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let overrides = Overrides {
        gemini_api_key: args.gemini_api_key,
        api_base_url: args.api_base_url,
        persona: args.persona,
        no_discovery: args.no_discovery,
    };
    let settings = Settings::resolve(overrides, FileConfig::load()?)?;

    let client = Arc::new(
        GeminiClient::new(settings.api_key.clone())
            .with_base_url(settings.api_base_url.clone())
            .with_timeout(settings.request_timeout),
    );

    let mut resolver = ModelResolver::new(settings.policy.clone())
        .with_static_candidates(settings.static_models.clone());
    if settings.discover_models {
        resolver = resolver.with_discovery(client.clone());
    }
    let resolver = Arc::new(resolver);
    let catalog = Arc::new(PersonaCatalog::new());

    info!(
        "Model policy: {} preferred, family '{}', discovery {}",
        settings.policy.preferred.len(),
        settings.policy.family,
        if settings.discover_models { "on" } else { "off" }
    );

    if args.serve {
        let state = AppState::new(resolver, catalog, client);
        return server::run(args.port, state).await;
    }

    println!();
    println!("{}", colors::header("우리 가족 사랑방 🏠"));
    println!("{}", colors::banner_line("Version", env!("CARGO_PKG_VERSION")));
    println!(
        "{}",
        colors::banner_line("Discovery", if settings.discover_models { "on" } else { "off" })
    );

    let session = ConversationSession::new(resolver, Arc::clone(&catalog), client);
    let mut repl = Repl::new(session, catalog)?;
    repl.run(settings.persona).await
}

//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; authentication is delegated to AuthService.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tg_digest::adapters::telegram::{self, GrammersAuthAdapter, GrammersTgGateway};
use tg_digest::adapters::ui::tui::{TuiInputPort, TuiPrompt};
use tg_digest::ports::{AuthPort, InputPort, PromptPort, TgGateway};
use tg_digest::shared::config::AppConfig;
use tg_digest::usecases::{AnalyzerService, AuthService, HistoryService};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for a malformed group identifier.
const EXIT_INVALID_INPUT: i32 = 2;
/// Exit status for every other failure.
const EXIT_FAILURE: i32 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    // Logs go to stderr; stdout carries only the rendered digest.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let preset = std::env::args().nth(1);
    if preset.is_none() {
        tg_digest::adapters::ui::init_ui();
    }

    let cfg = AppConfig::load().unwrap_or_default();
    let api_id = cfg.api_id_or_default();
    let api_hash = cfg.api_hash_or_default();
    if api_id == 0 || api_hash.is_empty() {
        anyhow::bail!(
            "Set TG_DIGEST_API_ID and TG_DIGEST_API_HASH (env or .env). Get them from https://my.telegram.org"
        );
    }

    // --- Telegram client (cloned for auth and gateway; same session) ---
    let session_path = PathBuf::from(cfg.session_path_or_default());
    let client = telegram::connect(api_id, &session_path).await?;

    // --- Auth: adapter + service, then run flow ---
    let auth_adapter: Arc<dyn AuthPort> = Arc::new(GrammersAuthAdapter::new(client.clone()));
    let prompt: Arc<dyn PromptPort> = Arc::new(TuiPrompt);
    let auth_service = AuthService::new(auth_adapter, prompt, api_hash, cfg.phone_number.clone());
    auth_service
        .run_auth_flow()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let tg: Arc<dyn TgGateway> = Arc::new(GrammersTgGateway::new(client));

    // --- History rate limit (EXPORT_DELAY_MS, default 0) ---
    let page_delay = Duration::from_millis(cfg.export_delay_ms_or_default());
    let page_size = cfg.page_size_or_default();
    info!(
        page_size,
        page_delay_ms = page_delay.as_millis() as u64,
        "history pagination"
    );
    let history = Arc::new(HistoryService::new(Arc::clone(&tg), page_size, page_delay));

    let analyzer = Arc::new(AnalyzerService::new(
        Arc::clone(&tg),
        history,
        cfg.window_days_or_default(),
        cfg.timezone_or_default(),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&tg),
        analyzer,
        cfg.output_format_or_default(),
    ));

    if let Err(e) = input_port.run(preset).await {
        if e.is_validation() {
            eprintln!("Invalid group identifier: {}", e);
            std::process::exit(EXIT_INVALID_INPUT);
        }
        eprintln!("Failed to analyze group: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use vocalis::api::{self, AppState};
use vocalis::domain::ports::Metering;
use vocalis::utils::{logger, validation::Validate};
use vocalis::{EventHub, Mailer, MetronomeClient, ServerArgs, Settings, StubMetering, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting vocalis server");

    // 載入與驗證配置
    let mut settings = Settings::from_file(&args.config)?;
    args.apply_to(&mut settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = Arc::new(settings);

    // Metering client: real when credentials exist, otherwise fail-fast stub
    let metering: Arc<dyn Metering> = if settings.metering_configured() {
        Arc::new(MetronomeClient::new(&settings.metronome)?)
    } else {
        tracing::warn!("⚠️ metronome.api_key not set - metering calls will fail fast");
        Arc::new(StubMetering)
    };

    let store = UserStore::open(Path::new(&settings.server.database_path))?;
    let mailer = Arc::new(Mailer::from_settings(&settings.email)?);
    let hub = EventHub::new();

    let state = AppState {
        settings: settings.clone(),
        metering,
        store,
        hub,
        mailer,
    };

    let app = api::router(state);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 {} listening on http://{}", settings.app.name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("🛑 Shutdown signal received");
}

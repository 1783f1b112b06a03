use mostaql_notifier::config::Config;
use mostaql_notifier::monitor::{HttpFetcher, PollController};
use mostaql_notifier::telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> mostaql_notifier::error::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    // Credentials are checked before any network activity.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("FATAL: {}. Check your .env file.", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Mostaql notifier for chat {}", config.chat_id);

    let fetcher = HttpFetcher::new(&config)?;
    let notifier = TelegramNotifier::new(&config)?;
    let controller = PollController::new(&config, Box::new(fetcher), Box::new(notifier))?;

    // The controller only suspends at sleeps and network calls, so an
    // interrupt takes effect at the next suspension point with the
    // seen-set file already in a consistent state.
    tokio::select! {
        result = controller.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Bot stopped by user.");
            Ok(())
        }
    }
}

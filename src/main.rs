use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overdue::api::router;
use overdue::config::Config;
use overdue::db;
use overdue::services::{LogReminderSink, ReminderScheduler};
use overdue::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "overdue=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pool = db::connect(&config.database_url, 5).await?;

    if config.reminder_interval_secs > 0 {
        let scheduler = ReminderScheduler::new(
            pool.clone(),
            Arc::new(LogReminderSink),
            config.reminder_interval_secs,
            config.default_offset(),
        );
        tokio::spawn(scheduler.start());
    }

    let addr = config.bind_addr;
    let state = AppState::new(pool, config);
    let app = router(state);

    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

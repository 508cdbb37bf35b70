use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_srs::clock::SystemClock;
use vocab_srs::state::AppState;
use vocab_srs::{config, db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vocab_srs=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = config::load();
  tracing::info!(
    "Using database {} with study time zone {}",
    settings.database_path.display(),
    settings.timezone
  );

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize database");
  let clock = Arc::new(SystemClock::new(settings.timezone));
  let app = handlers::router(AppState::new(pool, clock));

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}

use server::{AppState, Config, create_router};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Inizializza la configurazione
    let config = Config::from_env()?;
    config.print_info();

    let state = match &config.database_url {
        Some(database_url) => {
            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database connected, migrations applied");
            AppState::with_mysql(pool, config.jwt_secret.clone())
        }
        None => {
            warn!("DATABASE_URL not set, users are kept in memory only");
            AppState::in_memory(config.jwt_secret.clone())
        }
    };

    // Crea il router
    let app = create_router(Arc::new(state), config.frontend_origin()?);

    // Crea il listener TCP
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // Avvia il server
    axum::serve(listener, app).await?;

    Ok(())
}

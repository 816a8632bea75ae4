use anyhow::Result;
use mvc_template::{
    application::{
        ports::{
            authorization::AuthorizationProvider,
            security::{PasswordHasher, TicketManager},
            time::Clock,
        },
        services::ApplicationServices,
    },
    config::AppConfig,
    infrastructure::{
        database::{self, DataContext},
        security::{
            authorization::RolePermissionAuthorization, password::Argon2PasswordHasher,
            ticket::HmacTicketManager,
        },
        time::SystemClock,
    },
    presentation::http::{routes::build_router, state::HttpState},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;
    let context = DataContext::new(pool);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let ticket_manager: Arc<dyn TicketManager> = Arc::new(HmacTicketManager::new(
        config.cookie_secret(),
        config.cookie_name(),
        config.ticket_ttl(),
        Arc::clone(&clock),
    )?);
    let authorization: Arc<dyn AuthorizationProvider> =
        Arc::new(RolePermissionAuthorization::new(context.clone()));

    let services = Arc::new(
        ApplicationServices::new(
            context,
            password_hasher,
            ticket_manager,
            authorization,
            clock,
        )
        .with_recovery_window(config.recovery_window()),
    );
    services.seed(config.administrator()).await?;

    let app = build_router(HttpState::new(Arc::clone(&services), config.culture()));

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

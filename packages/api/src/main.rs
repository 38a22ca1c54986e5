use lambda_http::{run, Error};
use std::env::set_var;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use config::AppConfig;
use middleware::cors::cors_layer;
use shared::repositories::document_repository::DynamoDbDocumentRepository;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let on_lambda = std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok();
    if on_lambda {
        set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");
        // required to enable CloudWatch error logging by the runtime
        lambda_http::tracing::init_default_subscriber();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    // Set up the document store
    let mut loader = aws_config::from_env();
    if let Some(endpoint) = &config.dynamodb_endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let client = aws_sdk_dynamodb::Client::new(&loader.load().await);
    let repository = Arc::new(DynamoDbDocumentRepository::new(
        client,
        config.tables.clone(),
    ));

    match repository.ping().await {
        Ok(()) => info!(
            "Connected to DynamoDB tables {} and {}",
            config.tables.services, config.tables.bookings
        ),
        Err(e) => error!("DynamoDB ping failed: {}", e),
    }

    let app_state = state::AppState::new(
        repository,
        config.access_token_secret.clone(),
        config.secure_cookies,
    );
    let app = routes::router(app_state).layer(cors_layer(config.cors_origins.clone()));

    if on_lambda {
        return run(app).await;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("PrintHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("PrintHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

use crate::config::Config;
use crate::error::AppError;
use crate::handlers;
use crate::services::{importer, MongoDb, PaymentRepository};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use secrecy::ExposeSecret;
use std::future::IntoFuture;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: MongoDb,
    pub repository: PaymentRepository,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Connect to the store, create indexes, run the optional CSV import,
    /// and bind the listener. Traffic is not served until all of that is
    /// done; an import failure aborts startup.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = MongoDb::connect(
            config.database.uri.expose_secret(),
            &config.database.db_name,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            e
        })?;

        let repository = PaymentRepository::new(db.database());
        repository.init_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        if let Some(csv_path) = &config.import.csv_path {
            tracing::info!(path = %csv_path, "Importing payment records from CSV");
            importer::import_payments(&repository, csv_path).await?;
        }

        let state = AppState {
            config: config.clone(),
            db,
            repository,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/payments/create", post(handlers::create_payment))
            .route("/payments/update/:payment_id", put(handlers::update_payment))
            .route(
                "/payments/delete/:payment_id",
                delete(handlers::delete_payment),
            )
            .route("/payments/get_payments", get(handlers::get_payments))
            .route(
                "/payments/upload_evidence/:payment_id",
                post(handlers::upload_evidence),
            )
            .route(
                "/payments/download_evidence/:payment_id",
                get(handlers::download_evidence),
            )
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
            )
            .layer(CorsLayer::permissive())
            .with_state(state.clone());

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

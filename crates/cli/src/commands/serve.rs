use anyhow::Result;
use digital_register_core::Settings;
use digital_register_http::{create_router, AppState};
use digital_register_queue::{AmqpTransmitter, LegacyTransmitter};
use digital_register_search::{AddressApiClient, ElasticsearchClient, PropertySearch};
use digital_register_storage::StorageBackend;
use std::sync::Arc;

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let settings = Settings::from_env()?;
    tracing::info!(
        debug = settings.debug,
        testing = settings.testing,
        elasticsearch = %settings.elasticsearch.endpoint,
        max_results = settings.search.max_results,
        page_size = settings.search.page_size,
        "settings loaded"
    );

    let storage = Arc::new(StorageBackend::new_postgres(&settings.database_url).await?);

    let elasticsearch: Arc<dyn PropertySearch> =
        Arc::new(ElasticsearchClient::new(settings.elasticsearch.clone(), settings.search.max_results)?);
    let search: Arc<dyn PropertySearch> = match &settings.address_search_api {
        Some(api) => {
            tracing::info!("Postcode searches use the address search API at {}", api);
            Arc::new(AddressApiClient::new(api, elasticsearch)?)
        },
        None => elasticsearch,
    };

    let transmitter: Option<Arc<dyn LegacyTransmitter>> = match &settings.queue {
        Some(queue) => {
            tracing::info!(queue = %queue.queue, hostname = %queue.hostname, "legacy transmission enabled");
            Some(Arc::new(AmqpTransmitter::new(queue.clone())))
        },
        None => {
            tracing::info!("OUTGOING_QUEUE not set, legacy transmission disabled");
            None
        },
    };

    let state = Arc::new(AppState::new(&settings, storage, search, transmitter));
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received shutdown signal");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("Received TERM signal");
            },
            Err(e) => {
                tracing::error!("Failed to install TERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

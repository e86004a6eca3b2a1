use std::sync::Arc;

use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;

use sku_api::services::code_generator::SkuCodeGenerator;
use sku_api::services::skus::SkuService;
use sku_api::{app, config, db, events, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = db::establish_connection(&cfg).await?;
    if cfg.auto_migrate {
        db::run_migrations(&pool).await?;
    }
    let db_arc = Arc::new(pool);

    let (event_tx, event_rx) = mpsc::channel(1024);
    let event_sender = events::EventSender::new(event_tx);
    tokio::spawn(events::process_events(event_rx));

    let code_generator = Arc::new(SkuCodeGenerator::new(cfg.retailer_prefix.clone()));
    let sku_service = Arc::new(SkuService::new(
        db_arc.clone(),
        code_generator,
        event_sender,
    ));

    let state = AppState {
        db: db_arc,
        config: cfg.clone(),
        sku_service,
    };

    let addr = cfg.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("SKU API listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

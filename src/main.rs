use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use delivery_carriers::config::environment::DeliveryConfig;
use delivery_carriers::routes::create_app;
use delivery_carriers::services::delivery_manager::DeliveryManager;
use delivery_carriers::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG, por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Delivery Carriers API");
    info!("========================");

    let config = match DeliveryConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuración inválida: {}", e);
            return Err(anyhow::anyhow!("Error de configuración: {}", e));
        }
    };

    let manager = DeliveryManager::from_config(&config)?;
    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(manager, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /api/delivery/health - Health check");
    info!("   GET    /api/delivery/providers - Transportistas registrados");
    info!("   GET    /api/delivery/offices?city= - Oficinas de todos los transportistas");
    info!("   GET    /api/delivery/offices/search?q= - Buscar oficinas");
    info!("   POST   /api/delivery/calculate - Cotizar con todos");
    info!("   POST   /api/delivery/cheapest - Opción más barata");
    info!("   POST   /api/delivery/fastest - Opción más rápida");
    info!("   GET    /api/delivery/:provider/offices - Oficinas de un transportista");
    info!("   POST   /api/delivery/:provider/shipments - Crear envío");
    info!("   DELETE /api/delivery/:provider/shipments/:id - Cancelar envío");
    info!("   GET    /api/delivery/:provider/tracking/:number - Seguimiento");
    info!("   GET    /api/delivery/:provider/labels/:id - Etiqueta");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

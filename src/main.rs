use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use dotenvy::dotenv;
use fleet_reservations::config::environment::EnvironmentConfig;
use fleet_reservations::database;
use fleet_reservations::middleware::cors::cors_middleware;
use fleet_reservations::routes;
use fleet_reservations::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Fleet Reservations - Motor de reservas de flota");
    info!("==================================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Crear router de la API
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest(
            "/api/reservation",
            routes::reservation_routes::create_reservation_router(),
        )
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest(
            "/api/maintenance",
            routes::maintenance_routes::create_maintenance_router(),
        )
        .nest("/api/fleet", routes::fleet_routes::create_fleet_router())
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📅 Endpoints - Reservation:");
    info!("   POST /api/reservation - Crear reserva (pending)");
    info!("   GET  /api/reservation - Listar reservas");
    info!("   GET  /api/reservation/availability - Probe de disponibilidad");
    info!("   GET  /api/reservation/:id - Obtener reserva");
    info!("   POST /api/reservation/:id/transition - Transicionar estado");
    info!("   POST /api/reservation/:id/cancel - Cancelar reserva");
    info!("🚗 Endpoints - Vehicle:");
    info!("   POST /api/vehicle - Alta de vehículo");
    info!("   GET  /api/vehicle - Listar flota");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id/rate - Actualizar tarifa");
    info!("   DELETE /api/vehicle/:id - Retirar/eliminar vehículo");
    info!("🔧 Endpoints - Maintenance:");
    info!("   POST /api/maintenance - Programar servicio");
    info!("   GET  /api/maintenance/:id - Obtener servicio");
    info!("   POST /api/maintenance/:id/complete - Completar servicio");
    info!("   GET  /api/maintenance/vehicle/:vehicle_id - Servicios por vehículo");
    info!("📊 Endpoints - Fleet:");
    info!("   GET  /api/fleet/snapshot - Métricas de flota");
    info!("   GET  /api/fleet/maintenance-alerts - Alertas urgentes");

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

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Motor de reservas funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

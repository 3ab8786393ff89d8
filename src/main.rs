use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use bus_booking::build_router;
use bus_booking::config::environment::EnvironmentConfig;
use bus_booking::database;
use bus_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Bus Booking API - Sistema de reservas de asientos");
    info!("====================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Aplicar migraciones al arranque
    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(e);
    }

    let app_state = AppState::new(pool, config.clone());
    let app = build_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🔐 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login de usuario");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("🚌 Endpoints - Bus:");
    info!("   POST /api/bus - Crear bus con sus asientos (admin)");
    info!("   GET  /api/bus - Listar buses activos");
    info!("   GET  /api/bus/search - Buscar buses por trayecto");
    info!("   GET  /api/bus/:id - Obtener bus");
    info!("   GET  /api/bus/:id/available-seats - Asientos libres por fecha");
    info!("   GET  /api/bus/:id/seats - Mapa de asientos por fecha");
    info!("   PUT  /api/bus/:id - Actualizar bus (admin)");
    info!("   DELETE /api/bus/:id - Desactivar bus (admin)");
    info!("🗺️  Endpoints - Route:");
    info!("   POST /api/route - Crear ruta (admin)");
    info!("   GET  /api/route - Listar rutas");
    info!("   GET  /api/route/:id - Obtener ruta");
    info!("   GET  /api/route/bus/:bus_id - Rutas de un bus");
    info!("   PUT  /api/route/:id - Actualizar ruta (admin)");
    info!("   DELETE /api/route/:id - Eliminar ruta (admin)");
    info!("🎫 Endpoints - Booking:");
    info!("   POST /api/booking - Crear reserva con asientos");
    info!("   GET  /api/booking/:id - Detalle de billete");
    info!("   PUT  /api/booking/:id/cancel - Cancelar reserva");
    info!("   GET  /api/booking/user/:user_id - Reservas de un usuario");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
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

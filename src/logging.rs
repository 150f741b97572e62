// ==========================================
// Inicialización del sistema de logs
// ==========================================
// Usa tracing y tracing-subscriber
// El nivel se configura por variable de entorno
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Inicializa el sistema de logs
///
/// # Variables de entorno
/// - RUST_LOG: filtro de nivel (por defecto: info)
///   p.ej. RUST_LOG=debug o RUST_LOG=milsim_orbat=trace
///
/// # Ejemplo
/// ```no_run
/// use milsim_orbat::logging;
/// logging::init();
/// ```
pub fn init() {
    // Nivel desde la variable de entorno, por defecto info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Formato de log
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Inicializa los logs en entorno de test
///
/// Nivel más detallado para facilitar la depuración
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

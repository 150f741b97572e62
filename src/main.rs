// ==========================================
// Gestión ORBAT Milsim - Entrada principal
// ==========================================
// Abre (o crea) la base del roster y deja el estado montado; la capa
// de serving HTTP es un colaborador externo que embebe esta librería.
// ==========================================

use milsim_orbat::app::{get_default_db_path, AppState};
use milsim_orbat::logging;

fn main() {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", milsim_orbat::APP_NAME);
    tracing::info!("Versión: {}", milsim_orbat::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!("Base de datos: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("no se pudo inicializar el estado: {e:#}");
            std::process::exit(1);
        }
    };

    // Resumen de arranque: tablero actual y últimas acciones
    match app_state.roster_api.get_board() {
        Ok(Some(board)) => {
            let escuadras: usize = board
                .companias
                .iter()
                .flat_map(|c| &c.pelotones)
                .map(|p| p.escuadras.len())
                .sum();
            tracing::info!(
                regimiento = %board.regimiento,
                companias = board.companias.len(),
                escuadras,
                sin_destino = board.sin_destino.len(),
                "roster cargado"
            );
        }
        Ok(None) => tracing::info!("roster vacío: use seed_demo_roster para poblar una demo"),
        Err(e) => tracing::error!("no se pudo leer el tablero: {e}"),
    }

    match app_state.action_log_repo.count() {
        Ok(n) => tracing::info!(entradas = n, "registro de auditoría"),
        Err(e) => tracing::warn!("no se pudo leer la auditoría: {e}"),
    }
}

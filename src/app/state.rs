// ==========================================
// Gestión ORBAT Milsim - Estado de aplicación
// ==========================================
// Responsabilidad: cablear repositorios, motor y APIs sobre una única
// conexión compartida. La capa de serving externa (HTTP, auth, routing)
// recibe este estado ya montado; aquí no hay estado global ambiental.
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{RosterApi, TransferApi};
use crate::config::{config_keys, ConfigManager};
use crate::db;
use crate::engine::TransferEngine;
use crate::repository::{ActionLogRepository, MemberRepository, UnitRepository};

/// Ruta por defecto de la base de datos del roster
pub fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    base.join("milsim-orbat")
        .join("orbat.db")
        .to_string_lossy()
        .to_string()
}

/// Estado de aplicación
///
/// Contiene las APIs y los recursos compartidos
pub struct AppState {
    /// Ruta de la base de datos
    pub db_path: String,

    /// API de traslados
    pub transfer_api: Arc<TransferApi>,

    /// API del tablero ORBAT
    pub roster_api: Arc<RosterApi>,

    /// Repositorio de auditoría (consulta del registro de acciones)
    pub action_log_repo: Arc<ActionLogRepository>,

    /// Gestor de configuración
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// Monta el estado completo sobre la base de datos indicada.
    ///
    /// Abre la conexión con los PRAGMA unificados, inicializa el schema si
    /// hace falta y avisa si la versión de schema no es la esperada.
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = db::open_sqlite_connection(&db_path)?;
        db::init_schema(&conn)?;

        match db::read_schema_version(&conn)? {
            Some(v) if v == db::CURRENT_SCHEMA_VERSION => {}
            Some(v) => tracing::warn!(
                esperada = db::CURRENT_SCHEMA_VERSION,
                encontrada = v,
                "versión de schema distinta de la esperada"
            ),
            None => tracing::warn!("base de datos sin tabla schema_version"),
        }

        let conn = Arc::new(Mutex::new(conn));
        Ok(Self::from_connection(db_path, conn))
    }

    /// Cablea el estado sobre una conexión ya abierta (tests)
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Self {
        let units = Arc::new(UnitRepository::new(conn.clone()));
        let members = Arc::new(MemberRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let config = Arc::new(ConfigManager::new(conn.clone()));

        // El idioma de los mensajes de la API sale de la configuración
        if let Ok(Some(locale)) = config.get_string(config_keys::UI_LOCALE) {
            crate::i18n::set_locale(&locale);
        }

        let engine = Arc::new(TransferEngine::new(conn, action_log_repo.clone()));
        let transfer_api = Arc::new(TransferApi::new(engine));
        let roster_api = Arc::new(RosterApi::new(units, members));

        Self {
            db_path,
            transfer_api,
            roster_api,
            action_log_repo,
            config,
        }
    }
}

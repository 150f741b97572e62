// ==========================================
// Gestión ORBAT Milsim - Gestor de configuración
// ==========================================
// Almacenamiento: tabla config_kv
// La configuración es explícita y se inyecta en la capa de serving;
// el Transfer Engine NO lee estado global ambiental.
// ==========================================

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use crate::repository::error::{RepositoryError, RepositoryResult};

/// Claves de configuración conocidas
pub mod config_keys {
    /// Idioma de los mensajes de la API ("es" / "en")
    pub const UI_LOCALE: &str = "ui.locale";
    /// Actor por defecto para scripts administrativos
    pub const AUDIT_DEFAULT_ACTOR: &str = "audit.default_actor";
}

/// Valores por defecto cuando la clave no está en la base
fn default_for(key: &str) -> Option<&'static str> {
    match key {
        config_keys::UI_LOCALE => Some("es"),
        config_keys::AUDIT_DEFAULT_ACTOR => Some("sistema"),
        _ => None,
    }
}

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Crea el gestor sobre la conexión compartida
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Lee una clave; si no está, cae al valor por defecto conocido
    pub fn get_string(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.or_else(|| default_for(key).map(String::from)))
    }

    /// Escribe (o sobreescribe) una clave
    pub fn set_string(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        db::configure_sqlite_connection(&conn).unwrap();
        db::init_schema(&conn).unwrap();
        ConfigManager::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_conocidos() {
        let cfg = setup();
        assert_eq!(cfg.get_string(config_keys::UI_LOCALE).unwrap().unwrap(), "es");
        assert_eq!(cfg.get_string("clave.desconocida").unwrap(), None);
    }

    #[test]
    fn test_set_y_sobreescritura() {
        let cfg = setup();
        cfg.set_string(config_keys::UI_LOCALE, "en").unwrap();
        assert_eq!(cfg.get_string(config_keys::UI_LOCALE).unwrap().unwrap(), "en");
        cfg.set_string(config_keys::UI_LOCALE, "es").unwrap();
        assert_eq!(cfg.get_string(config_keys::UI_LOCALE).unwrap().unwrap(), "es");
    }
}

// ==========================================
// Gestión ORBAT Milsim - Inicialización SQLite
// ==========================================
// Objetivo:
// - Unificar el comportamiento PRAGMA de todos los Connection::open,
//   evitando "unos módulos con foreign_keys y otros sin"
// - Unificar busy_timeout para reducir errores busy esporádicos
//   cuando hay escrituras concurrentes
// ==========================================

use rusqlite::{Connection, OptionalExtension};
use std::time::Duration;

/// busy_timeout por defecto (milisegundos)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version que espera el código actual
///
/// Nota:
/// - El número se usa para avisar (no se migra automáticamente), evitando
///   arrancar en silencio sobre una base antigua con errores latentes.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Configura los PRAGMA unificados de una conexión SQLite
///
/// Nota:
/// - foreign_keys hay que activarlo "por conexión"
/// - busy_timeout hay que configurarlo "por conexión"
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Abre una conexión SQLite con la configuración unificada
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Lee schema_version (None si la tabla no existe)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Inicializa el schema ORBAT (idempotente)
///
/// Tablas:
/// - regiment / company / platoon / squad: jerarquía de mando (4 niveles)
/// - member: personal, con referencias desnormalizadas por nivel
/// - action_log: auditoría append-only (DELETE bloqueado por trigger)
/// - config_kv: configuración clave/valor
///
/// El trigger de action_log replica la regla "los logs de auditoría no se
/// pueden eliminar" que antes vivía en la capa de señales de la aplicación.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS regiment (
            regiment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS company (
            company_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            regiment_id INTEGER NOT NULL REFERENCES regiment(regiment_id)
        );

        CREATE TABLE IF NOT EXISTS platoon (
            platoon_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            company_id INTEGER NOT NULL REFERENCES company(company_id)
        );

        CREATE TABLE IF NOT EXISTS squad (
            squad_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            platoon_id INTEGER NOT NULL REFERENCES platoon(platoon_id)
        );

        CREATE TABLE IF NOT EXISTS member (
            member_id INTEGER PRIMARY KEY AUTOINCREMENT,
            nickname TEXT NOT NULL UNIQUE,
            rank TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            squad_id INTEGER REFERENCES squad(squad_id),
            platoon_id INTEGER REFERENCES platoon(platoon_id),
            company_id INTEGER REFERENCES company(company_id),
            regiment_id INTEGER REFERENCES regiment(regiment_id),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_member_squad ON member(squad_id);

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            action_type TEXT NOT NULL,
            member_id INTEGER,
            squad_id INTEGER,
            payload_json TEXT,
            detail TEXT
        );

        CREATE TRIGGER IF NOT EXISTS trg_action_log_no_delete
        BEFORE DELETE ON action_log
        BEGIN
            SELECT RAISE(ABORT, 'los registros de auditoría no se pueden eliminar');
        END;

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotente() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        // Una segunda pasada no debe fallar
        init_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(1));
    }

    #[test]
    fn test_trigger_bloquea_delete_de_auditoria() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO action_log (action_id, action_ts, actor, action_type) \
             VALUES ('a1', datetime('now'), 'test', 'Transfer')",
            [],
        )
        .unwrap();

        let result = conn.execute("DELETE FROM action_log WHERE action_id = 'a1'", []);
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM action_log", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}

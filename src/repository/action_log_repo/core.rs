use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// ActionLogRepository - Auditoría
// ==========================================
// Línea roja: el repository no hace lógica de negocio, sólo mapeo
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    /// Crea el repositorio de auditoría
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Obtiene la conexión
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // Escritura
    // ==========================================

    /// Inserta una entrada de auditoría
    ///
    /// # Retorno
    /// - `Ok(action_id)`: insertada, devuelve el action_id
    /// - `Err(...)`: error de base de datos
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_ts, actor, action_type,
                member_id, squad_id, payload_json, detail
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                log.action_id,
                log.action_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                log.actor,
                log.action_type,
                log.member_id,
                log.squad_id,
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.detail,
            ],
        )?;

        Ok(log.action_id.clone())
    }

    /// Inserta un lote de entradas en una transacción
    pub fn batch_insert(&self, logs: Vec<ActionLog>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for log in logs {
            tx.execute(
                r#"
                INSERT INTO action_log (
                    action_id, action_ts, actor, action_type,
                    member_id, squad_id, payload_json, detail
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    log.action_id,
                    log.action_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                    log.actor,
                    log.action_type,
                    log.member_id,
                    log.squad_id,
                    log.payload_json.as_ref().map(|v| v.to_string()),
                    log.detail,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }
}

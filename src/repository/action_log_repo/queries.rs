use rusqlite::{params, Result as SqliteResult, Row};

use super::core::ActionLogRepository;
use crate::domain::action_log::ActionLog;
use crate::repository::error::RepositoryResult;

impl ActionLogRepository {
    // ==========================================
    // Consultas
    // ==========================================

    fn map_row(&self, row: &Row<'_>) -> SqliteResult<ActionLog> {
        let ts: String = row.get(1)?;
        let action_ts = chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|_| chrono::Utc::now().naive_utc());
        let payload: Option<String> = row.get(6)?;
        Ok(ActionLog {
            action_id: row.get(0)?,
            action_ts,
            actor: row.get(2)?,
            action_type: row.get(3)?,
            member_id: row.get(4)?,
            squad_id: row.get(5)?,
            payload_json: payload.and_then(|s| serde_json::from_str(&s).ok()),
            detail: row.get(7)?,
        })
    }

    /// Busca una entrada por action_id
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_ts, actor, action_type,
                   member_id, squad_id, payload_json, detail
            FROM action_log
            WHERE action_id = ?
            "#,
        )?;

        match stmt.query_row(params![action_id], |row| self.map_row(row)) {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entradas que afectan a un miembro, de más reciente a más antigua
    pub fn find_by_member_id(&self, member_id: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_ts, actor, action_type,
                   member_id, squad_id, payload_json, detail
            FROM action_log
            WHERE member_id = ?
            ORDER BY action_ts DESC, action_id
            "#,
        )?;

        let logs = stmt
            .query_map(params![member_id], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// Últimas N entradas del registro
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_ts, actor, action_type,
                   member_id, squad_id, payload_json, detail
            FROM action_log
            ORDER BY action_ts DESC, action_id
            LIMIT ?
            "#,
        )?;

        let logs = stmt
            .query_map(params![limit as i64], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// Recuento total de entradas
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM action_log", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

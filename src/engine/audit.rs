// ==========================================
// Gestión ORBAT Milsim - Sumidero de auditoría
// ==========================================
// El motor emite eventos de auditoría pero no posee su almacenamiento:
// el colaborador externo se modela como trait en la costura del motor.
// ==========================================
// Semántica fire-and-forget: un fallo al escribir auditoría se registra
// en el log y NUNCA revierte ni hace fallar un traslado ya confirmado.
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::error::RepositoryResult;

/// Sumidero de auditoría consumido por el Transfer Engine
pub trait AuditSink: Send + Sync {
    /// Registra una entrada (una por miembro afectado y mutación)
    fn record(&self, log: &ActionLog) -> RepositoryResult<()>;
}

impl AuditSink for ActionLogRepository {
    fn record(&self, log: &ActionLog) -> RepositoryResult<()> {
        self.insert(log)?;
        Ok(())
    }
}

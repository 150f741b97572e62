use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::instrument;

use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::member::{Assignment, SquadOccupant};
use crate::domain::unit::SQUAD_CAPACITY;
use crate::engine::audit::AuditSink;
use crate::repository::error::RepositoryError;
use crate::repository::member_repo::MemberRepository;
use crate::repository::unit_repo::UnitRepository;

// ==========================================
// TransferOutcome - Resultado de un traslado
// ==========================================
// CapacityConflict NO es un error: es un desenlace esperado que requiere
// decisión humana (elegir a quién intercambiar), por eso viaja en el
// resultado y no en el error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Traslado directo (incluye el movimiento no-op a la escuadra actual)
    Moved {
        member_id: i64,
        destination_squad_id: i64,
    },
    /// Intercambio atómico: el reemplazado hereda el ORIGEN del trasladado
    /// (posiblemente "sin destino" si el trasladado no tenía asignación)
    Swapped {
        moved_member_id: i64,
        destination_squad_id: i64,
        replaced_member_id: i64,
        replaced_destination: Assignment,
    },
    /// Destino lleno y sin reemplazo designado: se devuelven los 5
    /// ocupantes actuales y no se muta nada
    CapacityConflict { occupants: Vec<SquadOccupant> },
}

// ==========================================
// TransferError - Errores del traslado
// ==========================================
// NotFound / InvalidReplacement son errores de entrada del llamante;
// Storage transporta el fallo de almacenamiento subyacente. Ninguno se
// reintenta internamente: la política de reintento es del llamante.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("miembro no encontrado: id={0}")]
    MemberNotFound(i64),

    #[error("escuadra no encontrada: id={0}")]
    SquadNotFound(i64),

    #[error("reemplazo inválido: el miembro {replacement_id} no está destinado en la escuadra {squad_id}")]
    InvalidReplacement { replacement_id: i64, squad_id: i64 },

    #[error("fallo de almacenamiento: {0}")]
    Storage(#[from] RepositoryError),
}

// ==========================================
// TransferEngine
// ==========================================
// Concurrencia: toda la secuencia leer-contar-mutar se ejecuta bajo el
// mutex de la conexión compartida MÁS una transacción IMMEDIATE, de modo
// que dos traslados concurrentes al mismo destino se serializan y el
// recuento de ocupantes nunca es obsoleto. Prohibido cachear recuentos.
pub struct TransferEngine {
    conn: Arc<Mutex<Connection>>,
    audit: Arc<dyn AuditSink>,
}

impl TransferEngine {
    /// Crea el motor sobre la conexión compartida y el sumidero de auditoría
    pub fn new(conn: Arc<Mutex<Connection>>, audit: Arc<dyn AuditSink>) -> Self {
        Self { conn, audit }
    }

    // ==========================================
    // Operación central
    // ==========================================

    /// Solicita el traslado de un miembro a una escuadra destino.
    ///
    /// # Parámetros
    /// - `actor`: quién ordena el traslado (para auditoría)
    /// - `member_id`: miembro a trasladar
    /// - `destination_squad_id`: escuadra destino
    /// - `replacement_member_id`: ocupante del destino a intercambiar,
    ///   sólo al resolver un conflicto de capacidad
    ///
    /// # Retorno
    /// - `Ok(Moved)`: había hueco (o el movimiento era no-op)
    /// - `Ok(Swapped)`: intercambio atómico confirmado
    /// - `Ok(CapacityConflict)`: destino lleno, nada mutado, el llamante
    ///   debe designar reemplazo
    /// - `Err(...)`: entrada inválida o fallo de almacenamiento
    #[instrument(skip(self), fields(actor = %actor))]
    pub fn request_transfer(
        &self,
        actor: &str,
        member_id: i64,
        destination_squad_id: i64,
        replacement_member_id: Option<i64>,
    ) -> Result<TransferOutcome, TransferError> {
        // Las entradas de auditoría se acumulan dentro de la transacción y
        // se emiten tras el commit: un fallo de auditoría no debe revertir
        // un traslado ya confirmado.
        let mut audit_entries: Vec<ActionLog> = Vec::new();

        let outcome = {
            let mut conn = self
                .conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(RepositoryError::from)?;

            // 1. Cargar miembro y registrar su asignación de origen
            let member = MemberRepository::find_by_id_tx(&tx, member_id)?
                .ok_or(TransferError::MemberNotFound(member_id))?;
            let origin = member.assignment;

            // 2. Resolver destino y su ascendencia (el destino debe ser escuadra)
            let destination = UnitRepository::squad_ancestry_tx(&tx, destination_squad_id)?
                .ok_or(TransferError::SquadNotFound(destination_squad_id))?;

            // 3. Auto-transición: mover a la escuadra actual es válido y
            //    cuenta como Moved, pero no muta filas ni genera auditoría
            if member.is_in_squad(destination_squad_id) {
                drop(tx);
                return Ok(TransferOutcome::Moved {
                    member_id,
                    destination_squad_id,
                });
            }

            // 4. Recuento de ocupantes, leído dentro de la transacción
            let occupants = MemberRepository::list_occupants_tx(&tx, destination_squad_id)?;

            if occupants.len() < SQUAD_CAPACITY {
                // 5. Hay hueco: traslado directo, reescribiendo la
                //    ascendencia desnormalizada del miembro
                MemberRepository::update_assignment_tx(
                    &tx,
                    member_id,
                    Assignment::Squad(destination.squad_id),
                )?;
                tx.commit().map_err(RepositoryError::from)?;

                audit_entries.push(
                    ActionLog::new(ActionType::Transfer, actor)
                        .with_member(member_id)
                        .with_squad(destination_squad_id)
                        .with_payload(&serde_json::json!({
                            "persona_id": member_id,
                            "escuadra_destino_id": destination_squad_id,
                            "origen": origin,
                        }))
                        .with_detail(format!(
                            "traslado de {} a la escuadra {}",
                            member.nickname, destination_squad_id
                        )),
                );

                TransferOutcome::Moved {
                    member_id,
                    destination_squad_id,
                }
            } else {
                match replacement_member_id {
                    None => {
                        // 6. Lleno y sin reemplazo: rollback y conflicto con
                        //    la lista de ocupantes para decisión humana
                        drop(tx);
                        TransferOutcome::CapacityConflict { occupants }
                    }
                    Some(replacement_id) => {
                        // 7. Lleno con reemplazo designado: validar que el
                        //    reemplazo es ocupante actual del destino
                        if !occupants.iter().any(|o| o.id == replacement_id) {
                            drop(tx);
                            return Err(TransferError::InvalidReplacement {
                                replacement_id,
                                squad_id: destination_squad_id,
                            });
                        }

                        // Intercambio de dos miembros en la misma transacción:
                        // el trasladado entra en el destino y el reemplazado
                        // hereda el origen del trasladado, que puede ser
                        // "sin destino" (comportamiento preservado a propósito)
                        MemberRepository::update_assignment_tx(
                            &tx,
                            member_id,
                            Assignment::Squad(destination.squad_id),
                        )?;
                        MemberRepository::update_assignment_tx(&tx, replacement_id, origin)?;
                        tx.commit().map_err(RepositoryError::from)?;

                        audit_entries.push(
                            ActionLog::new(ActionType::Swap, actor)
                                .with_member(member_id)
                                .with_squad(destination_squad_id)
                                .with_payload(&serde_json::json!({
                                    "persona_id": member_id,
                                    "escuadra_destino_id": destination_squad_id,
                                    "persona_a_reemplazar_id": replacement_id,
                                }))
                                .with_detail(format!(
                                    "intercambio: {} entra en la escuadra {}",
                                    member.nickname, destination_squad_id
                                )),
                        );
                        audit_entries.push(
                            ActionLog::new(ActionType::Swap, actor)
                                .with_member(replacement_id)
                                .with_squad(destination_squad_id)
                                .with_payload(&serde_json::json!({
                                    "persona_id": replacement_id,
                                    "destino_heredado": origin,
                                }))
                                .with_detail(format!(
                                    "intercambio: el miembro {} hereda el origen de {}",
                                    replacement_id, member.nickname
                                )),
                        );

                        TransferOutcome::Swapped {
                            moved_member_id: member_id,
                            destination_squad_id,
                            replaced_member_id: replacement_id,
                            replaced_destination: origin,
                        }
                    }
                }
            }
            // El guard del mutex se libera aquí, antes de tocar auditoría
        };

        self.emit_audit(audit_entries);
        Ok(outcome)
    }

    /// Emite las entradas de auditoría tras el commit (fire-and-forget)
    fn emit_audit(&self, entries: Vec<ActionLog>) {
        for entry in entries {
            if let Err(e) = self.audit.record(&entry) {
                tracing::warn!(
                    action_id = %entry.action_id,
                    error = %e,
                    "fallo al escribir auditoría; el traslado ya está confirmado"
                );
            }
        }
    }
}

// ==========================================
// Gestión ORBAT Milsim - Registro de acciones
// ==========================================
// Línea roja: toda mutación queda registrada; los registros son
// inmutables (el borrado está prohibido, ver trigger en db.rs)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - Entrada de auditoría
// ==========================================
// Uso: trazabilidad de mutaciones del roster
// Alineado con la tabla action_log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,        // UUID de la entrada
    pub action_ts: NaiveDateTime, // momento de la acción (UTC)
    pub actor: String,            // quién ejecutó la acción
    pub action_type: String,      // tipo (almacenado como texto)

    // ===== Referencias afectadas =====
    pub member_id: Option<i64>, // miembro afectado
    pub squad_id: Option<i64>,  // escuadra implicada (destino del movimiento)

    // ===== Carga de la operación =====
    pub payload_json: Option<JsonValue>, // parámetros de la operación (JSON)
    pub detail: Option<String>,          // descripción libre
}

// ==========================================
// ActionType - Tipo de acción
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Transfer, // traslado directo a escuadra con hueco
    Swap,     // intercambio atómico por conflicto de capacidad
}

impl ActionType {
    /// Representación de texto (para almacenamiento)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Transfer => "Transfer",
            ActionType::Swap => "Swap",
        }
    }

    /// Parseo desde texto
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Transfer" => Some(ActionType::Transfer),
            "Swap" => Some(ActionType::Swap),
            _ => None,
        }
    }
}

// ==========================================
// ActionLog - Constructores
// ==========================================
impl ActionLog {
    /// Crea una entrada nueva con timestamp actual
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_ts: chrono::Utc::now().naive_utc(),
            actor: actor.to_string(),
            action_type: action_type.as_str().to_string(),
            member_id: None,
            squad_id: None,
            payload_json: None,
            detail: None,
        }
    }

    /// Asocia el miembro afectado
    pub fn with_member(mut self, member_id: i64) -> Self {
        self.member_id = Some(member_id);
        self
    }

    /// Asocia la escuadra implicada
    pub fn with_squad(mut self, squad_id: i64) -> Self {
        self.squad_id = Some(squad_id);
        self
    }

    /// Adjunta la carga de la operación (serializada a JSON)
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload_json = serde_json::to_value(payload).ok();
        self
    }

    /// Adjunta descripción libre
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

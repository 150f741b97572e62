// ==========================================
// Gestión ORBAT Milsim - API de traslados
// ==========================================
// Responsabilidad: superficie estrecha que monta la capa HTTP externa
// (endpoint /api/transferir_personal/). La autenticación y el routing
// son colaboradores externos; aquí sólo viven el contrato wire y el
// mapeo motor → respuesta.
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::member::SquadOccupant;
use crate::engine::transfer::{TransferEngine, TransferOutcome};

// ==========================================
// TransferRequest - Payload de entrada
// ==========================================
// Nombres de campo según el contrato del endpoint original
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub persona_id: i64,
    pub escuadra_destino_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_a_reemplazar_id: Option<i64>,
}

// ==========================================
// TransferApiResponse - Respuesta del endpoint
// ==========================================
// Tres formas, alineadas con lo que consume el tablero drag-and-drop:
// - movido:        { moved, escuadra_destino_id }                       → 200
// - intercambiado: { moved, ..., replaced, replaced_moved_to }          → 200
//   (replaced_moved_to es null si el reemplazado queda sin destino)
// - conflicto:     { miembros: [{id, nombre_milsim, rango}, ...] }      → 409
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransferApiResponse {
    Swapped {
        moved: i64,
        escuadra_destino_id: i64,
        replaced: i64,
        replaced_moved_to: Option<i64>,
    },
    Conflict {
        miembros: Vec<SquadOccupant>,
    },
    Moved {
        moved: i64,
        escuadra_destino_id: i64,
    },
}

impl TransferApiResponse {
    /// Categoría de estado HTTP que corresponde a la respuesta
    pub fn http_status(&self) -> u16 {
        match self {
            TransferApiResponse::Conflict { .. } => 409,
            _ => 200,
        }
    }

    /// ¿Es un conflicto de capacidad pendiente de decisión humana?
    pub fn is_conflict(&self) -> bool {
        matches!(self, TransferApiResponse::Conflict { .. })
    }
}

// ==========================================
// TransferApi
// ==========================================
pub struct TransferApi {
    engine: Arc<TransferEngine>,
}

impl TransferApi {
    /// Crea la API sobre el motor de traslados
    pub fn new(engine: Arc<TransferEngine>) -> Self {
        Self { engine }
    }

    /// Traslada (o intercambia) personal según el contrato del endpoint.
    ///
    /// # Parámetros
    /// - `actor`: usuario autenticado que ordena el movimiento (lo aporta
    ///   la capa de serving; la autenticación es externa)
    /// - `request`: payload wire
    ///
    /// # Retorno
    /// - `Ok(respuesta)`: movido / intercambiado / conflicto (409)
    /// - `Err(...)`: NotFound, reemplazo inválido o fallo de almacenamiento
    pub fn transferir_personal(
        &self,
        actor: &str,
        request: &TransferRequest,
    ) -> ApiResult<TransferApiResponse> {
        if request.persona_id <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "persona_id inválido: {}",
                request.persona_id
            )));
        }
        if request.escuadra_destino_id <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "escuadra_destino_id inválido: {}",
                request.escuadra_destino_id
            )));
        }

        let outcome = self.engine.request_transfer(
            actor,
            request.persona_id,
            request.escuadra_destino_id,
            request.persona_a_reemplazar_id,
        )?;

        Ok(match outcome {
            TransferOutcome::Moved {
                member_id,
                destination_squad_id,
            } => TransferApiResponse::Moved {
                moved: member_id,
                escuadra_destino_id: destination_squad_id,
            },
            TransferOutcome::Swapped {
                moved_member_id,
                destination_squad_id,
                replaced_member_id,
                replaced_destination,
            } => TransferApiResponse::Swapped {
                moved: moved_member_id,
                escuadra_destino_id: destination_squad_id,
                replaced: replaced_member_id,
                // El tablero sólo sabe pintar columnas de escuadra: si el
                // reemplazado queda agregado a un mando o sin destino, viaja null
                replaced_moved_to: replaced_destination.squad_id(),
            },
            TransferOutcome::CapacityConflict { occupants } => TransferApiResponse::Conflict {
                miembros: occupants,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_acepta_payload_wire() {
        let json = r#"{"persona_id": 12, "escuadra_destino_id": 3}"#;
        let req: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.persona_id, 12);
        assert_eq!(req.escuadra_destino_id, 3);
        assert_eq!(req.persona_a_reemplazar_id, None);

        let json = r#"{"persona_id": 12, "escuadra_destino_id": 3, "persona_a_reemplazar_id": 9}"#;
        let req: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.persona_a_reemplazar_id, Some(9));
    }

    #[test]
    fn test_respuesta_movido_serializa_contrato() {
        let resp = TransferApiResponse::Moved {
            moved: 12,
            escuadra_destino_id: 3,
        };
        assert_eq!(resp.http_status(), 200);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["moved"], 12);
        assert_eq!(v["escuadra_destino_id"], 3);
        assert!(v.get("replaced").is_none());
    }

    #[test]
    fn test_respuesta_intercambio_serializa_contrato() {
        let resp = TransferApiResponse::Swapped {
            moved: 12,
            escuadra_destino_id: 3,
            replaced: 9,
            replaced_moved_to: None,
        };
        assert_eq!(resp.http_status(), 200);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["replaced"], 9);
        // null explícito: el tablero retira la tarjeta del reemplazado
        assert!(v["replaced_moved_to"].is_null());
    }

    #[test]
    fn test_respuesta_conflicto_es_409() {
        let resp = TransferApiResponse::Conflict {
            miembros: vec![SquadOccupant {
                id: 1,
                nickname: "bravo-0".to_string(),
                rank: "PVT".to_string(),
            }],
        };
        assert_eq!(resp.http_status(), 409);
        assert!(resp.is_conflict());
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["miembros"][0]["nombre_milsim"], "bravo-0");
        assert_eq!(v["miembros"][0]["rango"], "PVT");
    }
}

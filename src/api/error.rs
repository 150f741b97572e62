// ==========================================
// Gestión ORBAT Milsim - Errores de la capa API
// ==========================================
// Responsabilidad: traducir errores técnicos de las capas inferiores a
// mensajes aptos para el llamante. El detalle de almacenamiento viaja
// opaco: nunca se exponen credenciales ni trazas internas.
// ==========================================

use thiserror::Error;

use crate::engine::transfer::TransferError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;

/// Error de la capa API
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Errores de entrada del llamante =====
    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    #[error("recurso no encontrado: {0}")]
    NotFound(String),

    #[error("reemplazo inválido: {0}")]
    InvalidReplacement(String),

    // ===== Errores de acceso a datos =====
    #[error("error de base de datos: {0}")]
    DatabaseError(String),

    // ===== Errores genéricos =====
    #[error("error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// Conversión desde RepositoryError
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={}) no existe", entity, id))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::BusinessRuleViolation(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            // El resto son fallos de almacenamiento: detalle opaco
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// ==========================================
// Conversión desde TransferError
// ==========================================
impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::MemberNotFound(id) => ApiError::NotFound(t_with_args(
                "transfer.member_not_found",
                &[("id", &id.to_string())],
            )),
            TransferError::SquadNotFound(id) => ApiError::NotFound(t_with_args(
                "transfer.squad_not_found",
                &[("id", &id.to_string())],
            )),
            TransferError::InvalidReplacement {
                replacement_id,
                squad_id,
            } => ApiError::InvalidReplacement(t_with_args(
                "transfer.invalid_replacement",
                &[
                    ("id", &replacement_id.to_string()),
                    ("escuadra", &squad_id.to_string()),
                ],
            )),
            TransferError::Storage(e) => e.into(),
        }
    }
}

/// Alias de Result
pub type ApiResult<T> = Result<T, ApiError>;

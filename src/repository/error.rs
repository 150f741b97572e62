// ==========================================
// Gestión ORBAT Milsim - Errores de la capa repository
// ==========================================
// Herramienta: macro derive de thiserror
// ==========================================

use thiserror::Error;

/// Error de la capa repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Errores de base de datos =====
    #[error("registro no encontrado: {entity} con id={id}")]
    NotFound { entity: String, id: String },

    #[error("fallo de conexión a la base de datos: {0}")]
    DatabaseConnectionError(String),

    #[error("fallo al adquirir el lock de la base de datos: {0}")]
    LockError(String),

    #[error("fallo de transacción: {0}")]
    DatabaseTransactionError(String),

    #[error("fallo de consulta: {0}")]
    DatabaseQueryError(String),

    #[error("violación de restricción única: {0}")]
    UniqueConstraintViolation(String),

    #[error("violación de clave foránea: {0}")]
    ForeignKeyViolation(String),

    // ===== Errores de reglas de negocio =====
    #[error("violación de regla de negocio: {0}")]
    BusinessRuleViolation(String),

    // ===== Errores de calidad de datos =====
    #[error("validación fallida: {0}")]
    ValidationError(String),

    // ===== Errores genéricos =====
    #[error("error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// Implementación From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Alias de Result
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// Gestión ORBAT Milsim - Librería central
// ==========================================
// Dominio: roster de una comunidad milsim
// Stack: Rust + SQLite
// Núcleo: Transfer Engine (traslados con invariante de capacidad)
// ==========================================

// Inicializa el sistema de internacionalización
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// Declaración de módulos
// ==========================================

// Capa de dominio - entidades y tipos
pub mod domain;

// Capa de repositorios - acceso a datos
pub mod repository;

// Capa de motores - reglas de negocio
pub mod engine;

// Capa de configuración
pub mod config;

// Infraestructura de base de datos (conexión / PRAGMA unificados)
pub mod db;

// Sistema de logs
pub mod logging;

// Internacionalización
pub mod i18n;

// Capa API - interfaz de negocio
pub mod api;

// Capa de aplicación - cableado del estado
pub mod app;

// ==========================================
// Reexporta los tipos centrales
// ==========================================

// Dominio
pub use domain::{
    ActionLog, ActionType, Assignment, Company, Member, Platoon, Regiment, Squad, SquadAncestry,
    SquadOccupant, SQUAD_CAPACITY,
};

// Motor
pub use engine::{AuditSink, TransferEngine, TransferError, TransferOutcome};

// API
pub use api::{RosterApi, TransferApi, TransferApiResponse, TransferRequest};

// ==========================================
// Constantes del sistema
// ==========================================

// Versión del sistema
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nombre del sistema
pub const APP_NAME: &str = "Gestión ORBAT Milsim";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

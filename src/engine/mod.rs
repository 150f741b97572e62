// ==========================================
// Gestión ORBAT Milsim - Capa de motores
// ==========================================
// Responsabilidad: reglas de negocio del roster
// Línea roja: el Transfer Engine es el único guardián de la capacidad
// ==========================================

pub mod audit;
pub mod transfer;

// Reexporta el motor y sus tipos
pub use audit::AuditSink;
pub use transfer::{TransferEngine, TransferError, TransferOutcome};

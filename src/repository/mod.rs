// ==========================================
// Gestión ORBAT Milsim - Capa de repositorios
// ==========================================
// Línea roja: los repository no contienen lógica de negocio
// ==========================================
// Responsabilidad: acceso a datos, ocultando el detalle de la base
// Restricción: todas las consultas van parametrizadas (sin inyección SQL)
// ==========================================

pub mod action_log_repo;
pub mod error;
pub mod member_repo;
pub mod unit_repo;

// Reexporta los repositorios centrales
pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use member_repo::MemberRepository;
pub use unit_repo::UnitRepository;

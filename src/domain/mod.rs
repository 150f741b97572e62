// ==========================================
// Gestión ORBAT Milsim - Capa de dominio
// ==========================================
// Responsabilidad: entidades y tipos del roster
// Línea roja: sin acceso a datos, sin lógica de motor
// ==========================================

pub mod action_log;
pub mod member;
pub mod unit;

// Reexporta los tipos centrales
pub use action_log::{ActionLog, ActionType};
pub use member::{Assignment, Member, SquadOccupant};
pub use unit::{Company, Platoon, Regiment, Squad, SquadAncestry, SQUAD_CAPACITY};

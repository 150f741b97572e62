// ==========================================
// Gestión ORBAT Milsim - Repositorio de auditoría
// ==========================================
// Línea roja: toda escritura queda registrada; este repositorio no
// expone borrado (y el trigger de db.rs lo bloquea a nivel de schema)
// ==========================================

mod core;
mod queries;


pub use self::core::ActionLogRepository;

// ==========================================
// Gestión ORBAT Milsim - Capa de aplicación
// ==========================================
// Responsabilidad: estado compartido que monta la capa de serving
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};

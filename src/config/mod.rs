// ==========================================
// Gestión ORBAT Milsim - Capa de configuración
// ==========================================
// Responsabilidad: configuración del sistema sobre config_kv
// ==========================================

pub mod config_manager;

// Reexporta el gestor
pub use config_manager::{config_keys, ConfigManager};

// ==========================================
// Gestión ORBAT Milsim - Transfer Engine
// ==========================================
// Responsabilidad: recolocar atómicamente a un miembro en una escuadra
// destino aplicando el invariante de capacidad (5) y ofreciendo el
// intercambio controlado cuando el destino está lleno
// ==========================================
// Línea roja: este motor es el ÚNICO guardián de la regla de capacidad
// ==========================================

mod core;


pub use self::core::{TransferEngine, TransferError, TransferOutcome};

// ==========================================
// Gestión ORBAT Milsim - Jerarquía de unidades
// ==========================================
// Jerarquía fija de 4 niveles: Regimiento → Compañía → Pelotón → Escuadra
// Las escuadras son hoja; la cadena de padres es acíclica y finita
// ==========================================
// Línea roja: el Transfer Engine nunca muta estas entidades
// ==========================================

use serde::{Deserialize, Serialize};

/// Capacidad máxima de una escuadra (miembros asignados directamente)
///
/// Invariante duro: lo aplica exclusivamente el Transfer Engine; el
/// almacenamiento no lo impone con constraints pasivos porque las rutas
/// administrativas heredadas no lo respetaban.
pub const SQUAD_CAPACITY: usize = 5;

// ==========================================
// Regiment - Regimiento (raíz del árbol)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regiment {
    pub regiment_id: i64,
    pub name: String, // p.ej. "75th Ranger RGT"
}

// ==========================================
// Company - Compañía
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub company_id: i64,
    pub name: String,
    pub regiment_id: i64, // padre
}

// ==========================================
// Platoon - Pelotón
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platoon {
    pub platoon_id: i64,
    pub name: String,
    pub company_id: i64, // padre
}

// ==========================================
// Squad - Escuadra (hoja)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squad {
    pub squad_id: i64,
    pub name: String,
    pub platoon_id: i64, // padre
}

// ==========================================
// SquadAncestry - Ascendencia resuelta de una escuadra
// ==========================================
// Uso: el Transfer Engine la necesita para mantener coherentes las
// referencias desnormalizadas (pelotón/compañía/regimiento) del miembro
// en cada movimiento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadAncestry {
    pub squad_id: i64,
    pub platoon_id: i64,
    pub company_id: i64,
    pub regiment_id: i64,
}

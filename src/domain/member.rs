// ==========================================
// Gestión ORBAT Milsim - Personal
// ==========================================
// Un miembro tiene como mucho UNA asignación, a un nodo de cualquier
// nivel de la jerarquía ("destinado en la escuadra Y" o "agregado al
// mando de la compañía X").
// ==========================================
// Línea roja: la asignación sólo la muta el Transfer Engine
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Assignment - Asignación (unión etiquetada)
// ==========================================
// El almacenamiento guarda columnas desnormalizadas por nivel
// (squad_id/platoon_id/company_id/regiment_id) por eficiencia de consulta;
// internamente se modela como variante única para que el invariante no
// pueda derivar. El mapeo a columnas vive sólo en la capa repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nivel", content = "id", rename_all = "snake_case")]
pub enum Assignment {
    /// Sin destino (reserva / sin asignar)
    Unassigned,
    /// Agregado al mando del regimiento
    Regiment(i64),
    /// Agregado al mando de una compañía
    Company(i64),
    /// Agregado al mando de un pelotón
    Platoon(i64),
    /// Destinado en una escuadra (único nivel con regla de capacidad)
    Squad(i64),
}

impl Assignment {
    /// Id de escuadra si la asignación es a nivel escuadra
    pub fn squad_id(&self) -> Option<i64> {
        match self {
            Assignment::Squad(id) => Some(*id),
            _ => None,
        }
    }

    /// ¿Es una asignación a la escuadra dada?
    pub fn is_squad(&self, squad_id: i64) -> bool {
        matches!(self, Assignment::Squad(id) if *id == squad_id)
    }
}

impl Default for Assignment {
    fn default() -> Self {
        Assignment::Unassigned
    }
}

// ==========================================
// Member - Miembro del roster
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub member_id: i64,
    pub nickname: String, // nick milsim, único en el roster
    pub rank: String,     // código de rango ("SGT", "CPL", ...)
    pub active: bool,
    pub assignment: Assignment,
}

impl Member {
    /// ¿Está destinado en la escuadra dada?
    pub fn is_in_squad(&self, squad_id: i64) -> bool {
        self.assignment.is_squad(squad_id)
    }
}

// ==========================================
// SquadOccupant - Ocupante de escuadra
// ==========================================
// Proyección (id, nick, rango) que viaja en el payload de conflicto de
// capacidad para que un humano elija a quién intercambiar.
// Nombres wire según el contrato del endpoint original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadOccupant {
    pub id: i64,
    #[serde(rename = "nombre_milsim")]
    pub nickname: String,
    #[serde(rename = "rango")]
    pub rank: String,
}
